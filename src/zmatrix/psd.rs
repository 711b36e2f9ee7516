use crate::linalg::{require_square, LinalgError, ZCholesky};
use crate::traits::{MatrixRef, Z};

use super::ZMatrix;

/// Square matrix tagged Hermitian positive semidefinite.
///
/// The tag is a promise made by the caller, not checked on construction.
/// Factorizations read only the upper triangle and are cached on the
/// underlying [`ZMatrix`].
///
/// ```
/// use zdense::{PsdMatrix, ZMatrix, Z};
///
/// let a = ZMatrix::from_rows(2, 2, &[
///     Z::new(4.0, 0.0), Z::new(2.0, 2.0),
///     Z::new(2.0, -2.0), Z::new(6.0, 0.0),
/// ]);
/// let mut p = PsdMatrix::new(a).unwrap();
/// let r = p.cholesky().unwrap().r().as_matrix().clone();
/// assert!((r[(0, 0)].re - 2.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PsdMatrix {
    m: ZMatrix,
}

impl PsdMatrix {
    /// Tag `m`; fails with `Rectangular` unless it is square.
    pub fn new(m: ZMatrix) -> Result<Self, LinalgError> {
        require_square(m.nrows, m.ncols)?;
        Ok(Self { m })
    }

    #[inline]
    pub fn order(&self) -> usize {
        self.m.nrows
    }

    #[inline]
    pub fn as_matrix(&self) -> &ZMatrix {
        &self.m
    }

    pub fn into_matrix(self) -> ZMatrix {
        self.m
    }

    #[inline]
    pub fn get(&self, ii: usize, jj: usize) -> Z {
        self.m.get(ii, jj)
    }

    /// Write at user indices. Invalidates the cached factor.
    #[inline]
    pub fn put(&mut self, ii: usize, jj: usize, value: Z) {
        self.m.put(ii, jj, value);
    }

    #[inline]
    pub fn get0(&self, i: usize, j: usize) -> Z {
        self.m.get0(i, j)
    }

    #[inline]
    pub fn put0(&mut self, i: usize, j: usize, value: Z) {
        self.m.put0(i, j, value);
    }

    /// Cholesky factor `R` with `A = Rᴴ R`, computed once per contents.
    pub fn cholesky(&mut self) -> Result<&ZCholesky, LinalgError> {
        self.m.cached_cholesky()
    }

    /// Remove the cached factor, if still valid.
    pub fn take_cached_cholesky(&mut self) -> Option<ZCholesky> {
        self.m.take_cached_cholesky()
    }
}

impl MatrixRef for PsdMatrix {
    #[inline]
    fn nrows(&self) -> usize {
        self.m.nrows
    }

    #[inline]
    fn ncols(&self) -> usize {
        self.m.ncols
    }

    #[inline]
    fn at(&self, row: usize, col: usize) -> Z {
        self.m.at(row, col)
    }
}
