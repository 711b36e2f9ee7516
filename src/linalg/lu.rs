use num_traits::{One, Zero};

use crate::linalg::{require_square, LinalgError};
use crate::traits::{ComplexExt, MatrixMut, Z};
use crate::zmatrix::{Triangle, TriangularMatrix};
use crate::ZMatrix;

/// LU factorization with partial pivoting, in place.
///
/// Works on rectangular matrices. On return, `a` holds `U` in its upper
/// trapezoid and the multipliers of `L` below the diagonal (the unit
/// diagonal of `L` is implicit). `pivot[k]` is the row exchanged with row
/// `k` at step `k`; `pivot.len()` must be `min(nrows, ncols)`.
///
/// A column whose largest remaining entry is exactly zero is skipped, so
/// the factorization always completes; singularity shows up as a zero on
/// the diagonal of `U`.
///
/// Returns `true` if the number of row exchanges was even.
pub fn lu_in_place(a: &mut impl MatrixMut, pivot: &mut [usize]) -> bool {
    let nr = a.nrows();
    let nc = a.ncols();
    let n = nr.min(nc);
    assert_eq!(pivot.len(), n, "pivot slice length must be min(nrows, ncols)");

    let mut even = true;

    for k in 0..n {
        // Partial pivoting: row with the largest magnitude in column k
        let mut max_row = k;
        let mut max_val = a.at(k, k).abs_scaled();
        for i in (k + 1)..nr {
            let val = a.at(i, k).abs_scaled();
            if val > max_val {
                max_val = val;
                max_row = i;
            }
        }
        pivot[k] = max_row;

        if max_val == 0.0 {
            continue;
        }

        if max_row != k {
            a.swap_rows(k, max_row);
            even = !even;
        }

        let pk = a.at(k, k);
        for i in (k + 1)..nr {
            let m = a.at(i, k) / pk;
            a.set(i, k, m);
        }

        // Rank-1 update of the trailing block
        for j in (k + 1)..nc {
            let akj = a.at(k, j);
            if akj.is_zero() {
                continue;
            }
            for i in (k + 1)..nr {
                let lik = a.at(i, k);
                a.at_mut(i, j).sub_prod(lik, akj);
            }
        }
    }

    even
}

/// Replay the exchanges of `pivot` in order on the rows of `b`.
///
/// For `A = P L U` this computes `Pᵀ B`.
pub fn pivot_rows(pivot: &[usize], b: &mut impl MatrixMut) {
    for (k, &p) in pivot.iter().enumerate() {
        b.swap_rows(k, p);
    }
}

/// Replay the exchanges of `pivot` in reverse on the rows of `b`.
///
/// For `A = P L U` this computes `P B`, undoing [`pivot_rows`].
pub fn pivot_rows_inv(pivot: &[usize], b: &mut impl MatrixMut) {
    for (k, &p) in pivot.iter().enumerate().rev() {
        b.swap_rows(k, p);
    }
}

/// LU decomposition `A = P L U` of an `nr x nc` matrix.
///
/// `L` is `nr x min(nr, nc)` unit lower triangular and `U` is
/// `min(nr, nc) x nc` upper triangular.
///
/// # Example
///
/// ```
/// use zdense::{ZMatrix, Z};
///
/// let a = ZMatrix::from_rows(2, 2, &[
///     Z::new(2.0, 0.0), Z::new(1.0, 0.0),
///     Z::new(5.0, 0.0), Z::new(3.0, 0.0),
/// ]);
/// let lu = a.lu();
///
/// let b = ZMatrix::column(&[Z::new(4.0, 0.0), Z::new(11.0, 0.0)]);
/// let x = lu.solve(&b).unwrap();
/// assert!((x[(0, 0)] - Z::new(1.0, 0.0)).norm() < 1e-12);
/// assert!((x[(1, 0)] - Z::new(2.0, 0.0)).norm() < 1e-12);
///
/// assert!((lu.det().unwrap() - Z::new(1.0, 0.0)).norm() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct ZLu {
    pivot: Vec<usize>,
    l: TriangularMatrix,
    u: TriangularMatrix,
    even: bool,
}

impl ZLu {
    /// Factor `a`. Never fails; see [`lu_in_place`].
    pub fn new(a: &ZMatrix) -> Self {
        let nr = a.nrows();
        let nc = a.ncols();
        let n = nr.min(nc);

        let mut w = a.clone();
        let mut pivot = vec![0usize; n];
        let even = lu_in_place(&mut w, &mut pivot);

        let mut l = a.zeros_like(nr, n);
        for j in 0..n {
            l[(j, j)] = Z::one();
            for i in (j + 1)..nr {
                l[(i, j)] = w[(i, j)];
            }
        }
        let mut u = a.zeros_like(n, nc);
        for j in 0..nc {
            for i in 0..n.min(j + 1) {
                u[(i, j)] = w[(i, j)];
            }
        }

        Self {
            pivot,
            l: TriangularMatrix::from_triangular(Triangle::Lower, l),
            u: TriangularMatrix::from_triangular(Triangle::Upper, u),
            even,
        }
    }

    /// Row exchanges, one per elimination step.
    #[inline]
    pub fn pivot(&self) -> &[usize] {
        &self.pivot
    }

    /// Unit lower triangular factor.
    #[inline]
    pub fn l(&self) -> &TriangularMatrix {
        &self.l
    }

    /// Upper triangular factor.
    #[inline]
    pub fn u(&self) -> &TriangularMatrix {
        &self.u
    }

    fn require_square(&self) -> Result<usize, LinalgError> {
        let (nr, nc) = (self.l.nrows(), self.u.ncols());
        require_square(nr, nc)?;
        Ok(nr)
    }

    /// Solve `A X = B`.
    pub fn solve(&self, b: &ZMatrix) -> Result<ZMatrix, LinalgError> {
        let n = self.require_square()?;
        if b.nrows() != n {
            return Err(LinalgError::nonconformity((n, b.ncols()), (b.nrows(), b.ncols())));
        }
        let mut x = b.clone();
        pivot_rows(&self.pivot, &mut x);
        let y = self.l.solve(&x)?;
        self.u.solve(&y)
    }

    /// Solve `Aᴴ X = B`.
    pub fn solve_h(&self, b: &ZMatrix) -> Result<ZMatrix, LinalgError> {
        let n = self.require_square()?;
        if b.nrows() != n {
            return Err(LinalgError::nonconformity((n, b.ncols()), (b.nrows(), b.ncols())));
        }
        let y = self.u.solve_h(b)?;
        let mut x = self.l.solve_h(&y)?;
        pivot_rows_inv(&self.pivot, &mut x);
        Ok(x)
    }

    /// Determinant of a square matrix.
    pub fn det(&self) -> Result<Z, LinalgError> {
        let n = self.require_square()?;
        let mut d = if self.even { Z::one() } else { -Z::one() };
        for i in 0..n {
            d *= self.u.get0(i, i);
        }
        Ok(d)
    }

    /// `P L U`, which equals the factored matrix up to rounding.
    pub fn reconstruct(&self) -> ZMatrix {
        let mut a = self.l.as_matrix() * self.u.as_matrix();
        pivot_rows_inv(&self.pivot, &mut a);
        a
    }
}

impl ZMatrix {
    /// LU decomposition with partial pivoting, computed fresh.
    ///
    /// Use [`ZMatrix::cached_lu`] to keep the factorization on the matrix.
    pub fn lu(&self) -> ZLu {
        ZLu::new(self)
    }
}
