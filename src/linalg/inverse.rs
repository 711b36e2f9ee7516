use num_traits::{One, Zero};

use crate::linalg::cholesky::hermitize_from_upper;
use crate::linalg::{require_square, LinalgError};
use crate::traits::{ComplexExt, Z};
use crate::zmatrix::{DiagMatrix, PsdMatrix, TriangularMatrix};
use crate::ZMatrix;

impl ZMatrix {
    /// Inverse through the cached LU factorization.
    ///
    /// Fails with `Rectangular` before any factorization when `self` is not
    /// square. A singular matrix surfaces as `ZeroDiagonal` from the `U`
    /// substitution.
    ///
    /// ```
    /// use zdense::{ZMatrix, Z};
    ///
    /// let mut a = ZMatrix::from_rows(2, 2, &[
    ///     Z::new(0.0, 2.0), Z::new(0.0, 0.0),
    ///     Z::new(1.0, 0.0), Z::new(4.0, 0.0),
    /// ]);
    /// let ai = a.inverse().unwrap();
    /// assert!((ai[(0, 0)] - Z::new(0.0, -0.5)).norm() < 1e-12);
    /// assert!((&(&a * &ai) - &ZMatrix::eye(2)).norm_fro() < 1e-12);
    /// ```
    pub fn inverse(&mut self) -> Result<ZMatrix, LinalgError> {
        require_square(self.nrows(), self.ncols())?;
        let eye = self.eye_like(self.nrows());
        self.cached_lu().solve(&eye)
    }

    /// Sum of the diagonal.
    pub fn trace(&self) -> Result<Z, LinalgError> {
        require_square(self.nrows(), self.ncols())?;
        Ok((0..self.nrows()).map(|i| self[(i, i)]).sum())
    }
}

impl TriangularMatrix {
    /// Inverse by substitution against the identity; stays triangular.
    pub fn inverse(&self) -> Result<TriangularMatrix, LinalgError> {
        require_square(self.nrows(), self.ncols())?;
        let x = self.solve(&self.as_matrix().eye_like(self.nrows()))?;
        Ok(TriangularMatrix::new(self.triangle(), x))
    }
}

impl DiagMatrix {
    /// Element-wise reciprocal; `Singular` on an exact-zero entry.
    ///
    /// ```
    /// use zdense::{DiagMatrix, Z};
    /// use zdense::linalg::LinalgError;
    ///
    /// let d = DiagMatrix::from_slice(&[Z::new(0.0, 2.0), Z::new(4.0, 0.0)]);
    /// assert_eq!(d.inverse().unwrap().get0(0), Z::new(0.0, -0.5));
    ///
    /// let z = DiagMatrix::from_slice(&[Z::new(1.0, 0.0), Z::new(0.0, 0.0)]);
    /// assert_eq!(z.inverse().unwrap_err(), LinalgError::Singular);
    /// ```
    pub fn inverse(&self) -> Result<DiagMatrix, LinalgError> {
        if self.as_slice().iter().any(|z| z.is_exact_zero()) {
            return Err(LinalgError::Singular);
        }
        let d = self.as_slice().iter().map(|&z| Z::one() / z).collect();
        Ok(DiagMatrix::from_vec(d).with_base(self.base()))
    }

    /// Sum of the diagonal.
    pub fn trace(&self) -> Z {
        self.as_slice().iter().fold(Z::zero(), |acc, &z| acc + z)
    }
}

impl PsdMatrix {
    /// Inverse through the cached Cholesky factor, made exactly Hermitian.
    pub fn inverse(&mut self) -> Result<PsdMatrix, LinalgError> {
        let eye = self.as_matrix().eye_like(self.order());
        let mut x = self.cholesky()?.solve(&eye)?;
        hermitize_from_upper(&mut x);
        PsdMatrix::new(x)
    }
}
