use num_traits::Zero;

use crate::linalg::householder::{reflect_left, Reflector};
use crate::linalg::LinalgError;
use crate::traits::{MatrixMut, Z};
use crate::zmatrix::{Triangle, TriangularMatrix};
use crate::ZMatrix;

/// Householder reduction in place.
///
/// Applies `min(nr - 1, nc)` column reflectors from the left. On return `a`
/// is upper trapezoidal (entries below the diagonal are exactly zero) and
/// the returned reflectors satisfy `H[n-1] ··· H[0] · A = R`.
///
/// Reflector `k` acts on rows `k..nr`.
pub fn householder_qr_in_place(a: &mut impl MatrixMut) -> Vec<Reflector> {
    let nr = a.nrows();
    let nc = a.ncols();
    let ntran = nr.saturating_sub(1).min(nc);

    let mut work = vec![Z::zero(); nc];
    let mut reflectors = Vec::with_capacity(ntran);
    for k in 0..ntran {
        let h = Reflector::from_column(a, k..nr, k);
        reflect_left(a, &h, k..nr, (k + 1)..nc, &mut work);
        reflectors.push(h);
    }
    reflectors
}

/// Householder reduction `Qᴴ A = R` with `Q` kept in factored form.
///
/// `R` is `nc x nc` when `nr > nc` and `nr x nc` otherwise.
///
/// # Example
///
/// ```
/// use zdense::linalg::ZHqr;
/// use zdense::{ZMatrix, Z};
///
/// // Least-squares fit of y = c0 + c1*x to (0,1), (1,2), (2,4)
/// let a = ZMatrix::from_rows(3, 2, &[
///     Z::new(1.0, 0.0), Z::new(0.0, 0.0),
///     Z::new(1.0, 0.0), Z::new(1.0, 0.0),
///     Z::new(1.0, 0.0), Z::new(2.0, 0.0),
/// ]);
/// let b = ZMatrix::column(&[Z::new(1.0, 0.0), Z::new(2.0, 0.0), Z::new(4.0, 0.0)]);
/// let x = ZHqr::new(&a).solve_least_squares(&b).unwrap();
/// assert!((x[(0, 0)].re - 5.0 / 6.0).abs() < 1e-12);
/// assert!((x[(1, 0)].re - 1.5).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct ZHqr {
    reflectors: Vec<Reflector>,
    r: TriangularMatrix,
    nrows: usize,
    ncols: usize,
}

impl ZHqr {
    pub fn new(a: &ZMatrix) -> Self {
        let nr = a.nrows();
        let nc = a.ncols();

        let mut w = a.clone();
        let reflectors = householder_qr_in_place(&mut w);

        let rr = if nr > nc { nc } else { nr };
        let mut r = a.zeros_like(rr, nc);
        for j in 0..nc {
            for i in 0..rr.min(j + 1) {
                r[(i, j)] = w[(i, j)];
            }
        }

        Self {
            reflectors,
            r: TriangularMatrix::from_triangular(Triangle::Upper, r),
            nrows: nr,
            ncols: nc,
        }
    }

    #[inline]
    pub fn r(&self) -> &TriangularMatrix {
        &self.r
    }

    /// Reflectors in the order they were applied.
    #[inline]
    pub fn reflectors(&self) -> &[Reflector] {
        &self.reflectors
    }

    fn check_rows(&self, b: &ZMatrix) -> Result<(), LinalgError> {
        if b.nrows() != self.nrows {
            return Err(LinalgError::nonconformity(
                (self.nrows, b.ncols()),
                (b.nrows(), b.ncols()),
            ));
        }
        Ok(())
    }

    /// `Qᴴ B`.
    pub fn apply_qh(&self, b: &ZMatrix) -> Result<ZMatrix, LinalgError> {
        self.check_rows(b)?;
        let nr = self.nrows;
        let nc = b.ncols();
        let mut x = b.clone();
        let mut work = vec![Z::zero(); nc];
        for (k, h) in self.reflectors.iter().enumerate() {
            reflect_left(&mut x, h, k..nr, 0..nc, &mut work);
        }
        Ok(x)
    }

    /// `Q B`.
    pub fn apply_q(&self, b: &ZMatrix) -> Result<ZMatrix, LinalgError> {
        self.check_rows(b)?;
        let nr = self.nrows;
        let nc = b.ncols();
        let mut x = b.clone();
        let mut work = vec![Z::zero(); nc];
        for (k, h) in self.reflectors.iter().enumerate().rev() {
            reflect_left(&mut x, h, k..nr, 0..nc, &mut work);
        }
        Ok(x)
    }

    /// Minimize `‖A X - B‖` in the Frobenius norm.
    ///
    /// Needs `nr >= nc`. A rank-deficient `A` surfaces as `ZeroDiagonal`
    /// from the back substitution.
    pub fn solve_least_squares(&self, b: &ZMatrix) -> Result<ZMatrix, LinalgError> {
        if self.nrows < self.ncols {
            return Err(LinalgError::NotOverdetermined {
                rows: self.nrows,
                cols: self.ncols,
            });
        }
        let y = self.apply_qh(b)?;
        let top = y.block(0, 0, self.ncols, y.ncols());
        self.r.solve(&top)
    }
}

/// Explicit QR decomposition: `Q` is `nr x nr` unitary and `R` is the
/// `nr x nc` upper trapezoid with `Qᴴ A = R`.
#[derive(Debug, Clone)]
pub struct ZQr {
    q: ZMatrix,
    r: TriangularMatrix,
}

impl ZQr {
    pub fn new(a: &ZMatrix) -> Self {
        Self::from_hqr(&ZHqr::new(a))
    }

    /// Expand a Householder reduction.
    pub fn from_hqr(hqr: &ZHqr) -> Self {
        let nr = hqr.nrows;
        let nc = hqr.ncols;
        let rm = hqr.r.as_matrix();

        // Q = H[0] ··· H[n-1] I, built from the right end
        let mut q = rm.eye_like(nr);
        let mut work = vec![Z::zero(); nr];
        for (k, h) in hqr.reflectors.iter().enumerate().rev() {
            reflect_left(&mut q, h, k..nr, k..nr, &mut work);
        }

        let mut r = rm.zeros_like(nr, nc);
        r.set_block(0, 0, rm);

        Self {
            q,
            r: TriangularMatrix::from_triangular(Triangle::Upper, r),
        }
    }

    #[inline]
    pub fn q(&self) -> &ZMatrix {
        &self.q
    }

    #[inline]
    pub fn r(&self) -> &TriangularMatrix {
        &self.r
    }
}

impl ZMatrix {
    /// QR decomposition, reusing the cached Householder reduction.
    ///
    /// ```
    /// use zdense::{ZMatrix, Z};
    ///
    /// let mut a = ZMatrix::from_fn(3, 2, |i, j| Z::new(i as f64 + 1.0, j as f64));
    /// let qr = a.qr();
    /// let back = qr.q() * qr.r().as_matrix();
    /// assert!((&back - &a).norm_fro() < 1e-12);
    /// ```
    pub fn qr(&mut self) -> ZQr {
        ZQr::from_hqr(self.cached_hqr())
    }
}
