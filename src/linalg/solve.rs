use crate::linalg::{require_square, LinalgError};
use crate::traits::{ComplexExt, Z};
use crate::zmatrix::{PsdMatrix, Triangle, TriangularMatrix};
use crate::ZMatrix;

// ── Triangular substitution ─────────────────────────────────────────

/// Solve `M X = B` in place in `x`, where `M = T` or `M = Tᴴ`.
///
/// Every diagonal entry is checked, in substitution order, before any
/// arithmetic. `T` must be square with `x.nrows() == T.nrows()`.
fn substitute(
    t: &ZMatrix,
    triangle: Triangle,
    conj_t: bool,
    x: &mut ZMatrix,
) -> Result<(), LinalgError> {
    let n = t.nrows();
    let m = |i: usize, k: usize| -> Z {
        if conj_t {
            t[(k, i)].conj()
        } else {
            t[(i, k)]
        }
    };
    // Tᴴ of a lower triangle is upper and vice versa
    let forward = (triangle == Triangle::Lower) != conj_t;
    let order: Vec<usize> = if forward {
        (0..n).collect()
    } else {
        (0..n).rev().collect()
    };

    if let Some(&index) = order.iter().find(|&&i| t[(i, i)].is_exact_zero()) {
        return Err(LinalgError::ZeroDiagonal { index });
    }

    for c in 0..x.ncols() {
        for (pos, &i) in order.iter().enumerate() {
            let mut s = x[(i, c)];
            for &k in &order[..pos] {
                s.sub_prod(m(i, k), x[(k, c)]);
            }
            x[(i, c)] = s / m(i, i);
        }
    }
    Ok(())
}

impl TriangularMatrix {
    fn check_left(&self, b: &ZMatrix) -> Result<usize, LinalgError> {
        require_square(self.nrows(), self.ncols())?;
        let n = self.nrows();
        if b.nrows() != n {
            return Err(LinalgError::nonconformity((n, b.ncols()), (b.nrows(), b.ncols())));
        }
        Ok(n)
    }

    fn check_right(&self, b: &ZMatrix) -> Result<usize, LinalgError> {
        require_square(self.nrows(), self.ncols())?;
        let n = self.nrows();
        if b.ncols() != n {
            return Err(LinalgError::nonconformity((b.nrows(), n), (b.nrows(), b.ncols())));
        }
        Ok(n)
    }

    /// Solve `T X = B`.
    ///
    /// ```
    /// use zdense::{TriangularMatrix, ZMatrix, Z};
    ///
    /// let l = TriangularMatrix::lower(ZMatrix::from_rows(2, 2, &[
    ///     Z::new(2.0, 0.0), Z::new(0.0, 0.0),
    ///     Z::new(1.0, 1.0), Z::new(0.0, 1.0),
    /// ]));
    /// let b = ZMatrix::column(&[Z::new(4.0, 0.0), Z::new(2.0, 3.0)]);
    /// let x = l.solve(&b).unwrap();
    /// assert!((x[(0, 0)] - Z::new(2.0, 0.0)).norm() < 1e-12);
    /// assert!((x[(1, 0)] - Z::new(1.0, 0.0)).norm() < 1e-12);
    /// ```
    pub fn solve(&self, b: &ZMatrix) -> Result<ZMatrix, LinalgError> {
        self.check_left(b)?;
        let mut x = b.clone().with_base(self.as_matrix().base());
        substitute(self.as_matrix(), self.triangle(), false, &mut x)?;
        Ok(x)
    }

    /// Solve `Tᴴ X = B`.
    pub fn solve_h(&self, b: &ZMatrix) -> Result<ZMatrix, LinalgError> {
        self.check_left(b)?;
        let mut x = b.clone().with_base(self.as_matrix().base());
        substitute(self.as_matrix(), self.triangle(), true, &mut x)?;
        Ok(x)
    }

    /// Solve `X T = B`.
    pub fn solve_right(&self, b: &ZMatrix) -> Result<ZMatrix, LinalgError> {
        self.check_right(b)?;
        // X T = B  <=>  Tᴴ Xᴴ = Bᴴ
        let mut xh = b.h().with_base(self.as_matrix().base());
        substitute(self.as_matrix(), self.triangle(), true, &mut xh)?;
        Ok(xh.h())
    }

    /// Solve `X Tᴴ = B`.
    pub fn solve_right_h(&self, b: &ZMatrix) -> Result<ZMatrix, LinalgError> {
        self.check_right(b)?;
        // X Tᴴ = B  <=>  T Xᴴ = Bᴴ
        let mut xh = b.h().with_base(self.as_matrix().base());
        substitute(self.as_matrix(), self.triangle(), false, &mut xh)?;
        Ok(xh.h())
    }
}

// ── General solves through the cached LU ────────────────────────────

impl ZMatrix {
    fn check_solve_left(&self, b: &ZMatrix) -> Result<(), LinalgError> {
        require_square(self.nrows(), self.ncols())?;
        if b.nrows() != self.nrows() {
            return Err(LinalgError::nonconformity(
                (self.nrows(), b.ncols()),
                (b.nrows(), b.ncols()),
            ));
        }
        Ok(())
    }

    fn check_solve_right(&self, b: &ZMatrix) -> Result<(), LinalgError> {
        require_square(self.nrows(), self.ncols())?;
        if b.ncols() != self.ncols() {
            return Err(LinalgError::nonconformity(
                (b.nrows(), self.ncols()),
                (b.nrows(), b.ncols()),
            ));
        }
        Ok(())
    }

    /// Solve `A X = B` using the cached LU factorization.
    ///
    /// ```
    /// use zdense::{ZMatrix, Z};
    ///
    /// let mut a = ZMatrix::from_rows(2, 2, &[
    ///     Z::new(0.0, 1.0), Z::new(1.0, 0.0),
    ///     Z::new(2.0, 0.0), Z::new(0.0, 0.0),
    /// ]);
    /// let b = ZMatrix::column(&[Z::new(1.0, 1.0), Z::new(2.0, 0.0)]);
    /// let x = a.solve(&b).unwrap();
    /// let r = &(&a * &x) - &b;
    /// assert!(r.norm_fro() < 1e-12);
    /// ```
    pub fn solve(&mut self, b: &ZMatrix) -> Result<ZMatrix, LinalgError> {
        self.check_solve_left(b)?;
        self.cached_lu().solve(b)
    }

    /// Solve `Aᴴ X = B` using the cached LU factorization.
    pub fn solve_h(&mut self, b: &ZMatrix) -> Result<ZMatrix, LinalgError> {
        self.check_solve_left(b)?;
        self.cached_lu().solve_h(b)
    }

    /// Solve `X A = B` using the cached LU factorization.
    pub fn solve_right(&mut self, b: &ZMatrix) -> Result<ZMatrix, LinalgError> {
        self.check_solve_right(b)?;
        // X A = B  <=>  Aᴴ Xᴴ = Bᴴ
        Ok(self.cached_lu().solve_h(&b.h())?.h())
    }

    /// Solve `X Aᴴ = B` using the cached LU factorization.
    pub fn solve_right_h(&mut self, b: &ZMatrix) -> Result<ZMatrix, LinalgError> {
        self.check_solve_right(b)?;
        // X Aᴴ = B  <=>  A Xᴴ = Bᴴ
        Ok(self.cached_lu().solve(&b.h())?.h())
    }
}

// ── Positive definite solves through the cached Cholesky factor ─────

impl PsdMatrix {
    /// Solve `A X = B` using the cached Cholesky factor.
    pub fn solve(&mut self, b: &ZMatrix) -> Result<ZMatrix, LinalgError> {
        self.as_matrix().check_solve_left(b)?;
        self.cholesky()?.solve(b)
    }

    /// Solve `X A = B` using the cached Cholesky factor.
    pub fn solve_right(&mut self, b: &ZMatrix) -> Result<ZMatrix, LinalgError> {
        self.as_matrix().check_solve_right(b)?;
        // A is Hermitian: X A = B  <=>  A Xᴴ = Bᴴ
        Ok(self.cholesky()?.solve(&b.h())?.h())
    }
}
