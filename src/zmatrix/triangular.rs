use num_traits::Zero;

use crate::linalg::LinalgError;
use crate::traits::{MatrixRef, Z};

use super::ZMatrix;

/// Which triangle of a [`TriangularMatrix`] is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Triangle {
    Lower,
    Upper,
}

impl Triangle {
    /// Whether zero-based `(i, j)` lies inside this triangle (diagonal included).
    #[inline]
    pub fn contains(self, i: usize, j: usize) -> bool {
        match self {
            Triangle::Lower => i >= j,
            Triangle::Upper => i <= j,
        }
    }

    /// The triangle holding the conjugate transpose.
    #[inline]
    pub fn flip(self) -> Triangle {
        match self {
            Triangle::Lower => Triangle::Upper,
            Triangle::Upper => Triangle::Lower,
        }
    }
}

/// Lower or upper triangular matrix over [`ZMatrix`] storage.
///
/// Entries outside the triangle are always zero: construction clears them
/// and non-zero writes there are rejected.
///
/// ```
/// use zdense::{Triangle, TriangularMatrix, ZMatrix, Z};
/// use zdense::linalg::LinalgError;
///
/// let a = ZMatrix::from_fn(3, 3, |_, _| Z::new(1.0, 0.0));
/// let mut l = TriangularMatrix::new(Triangle::Lower, a);
/// assert_eq!(l.get(1, 3), Z::new(0.0, 0.0));
/// assert_eq!(
///     l.put(1, 3, Z::new(2.0, 0.0)),
///     Err(LinalgError::OutsideTriangle { row: 1, col: 3 })
/// );
/// assert!(l.put(1, 3, Z::new(0.0, 0.0)).is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct TriangularMatrix {
    triangle: Triangle,
    m: ZMatrix,
}

impl TriangularMatrix {
    /// Take the given triangle of `m`, zeroing the opposite strict triangle.
    pub fn new(triangle: Triangle, mut m: ZMatrix) -> Self {
        for j in 0..m.ncols {
            for i in 0..m.nrows {
                if !triangle.contains(i, j) {
                    m.data[j * m.nrows + i] = Z::zero();
                }
            }
        }
        Self { triangle, m }
    }

    /// Lower triangle of `m`.
    pub fn lower(m: ZMatrix) -> Self {
        Self::new(Triangle::Lower, m)
    }

    /// Upper triangle of `m`.
    pub fn upper(m: ZMatrix) -> Self {
        Self::new(Triangle::Upper, m)
    }

    /// Wrap storage already known to be triangular.
    pub(crate) fn from_triangular(triangle: Triangle, m: ZMatrix) -> Self {
        debug_assert!((0..m.ncols).all(|j| (0..m.nrows)
            .all(|i| triangle.contains(i, j) || m[(i, j)].is_zero())));
        Self { triangle, m }
    }

    #[inline]
    pub fn triangle(&self) -> Triangle {
        self.triangle
    }

    #[inline]
    pub fn nrows(&self) -> usize {
        self.m.nrows
    }

    #[inline]
    pub fn ncols(&self) -> usize {
        self.m.ncols
    }

    /// Underlying dense storage.
    #[inline]
    pub fn as_matrix(&self) -> &ZMatrix {
        &self.m
    }

    pub fn into_matrix(self) -> ZMatrix {
        self.m
    }

    /// Entry at user indices.
    #[inline]
    pub fn get(&self, ii: usize, jj: usize) -> Z {
        self.m.get(ii, jj)
    }

    /// Entry at zero-based indices.
    #[inline]
    pub fn get0(&self, i: usize, j: usize) -> Z {
        self.m.get0(i, j)
    }

    /// Write at user indices; non-zero values outside the triangle fail.
    pub fn put(&mut self, ii: usize, jj: usize, value: Z) -> Result<(), LinalgError> {
        let b = self.m.base.offset();
        if !self.triangle.contains(ii - b, jj - b) {
            if value.is_zero() {
                return Ok(());
            }
            return Err(LinalgError::OutsideTriangle { row: ii, col: jj });
        }
        self.m.put(ii, jj, value);
        Ok(())
    }

    /// Write at zero-based indices; non-zero values outside the triangle fail.
    pub fn put0(&mut self, i: usize, j: usize, value: Z) -> Result<(), LinalgError> {
        if !self.triangle.contains(i, j) {
            if value.is_zero() {
                return Ok(());
            }
            return Err(LinalgError::OutsideTriangle { row: i, col: j });
        }
        self.m.put0(i, j, value);
        Ok(())
    }

    /// Conjugate transpose, stored in the opposite triangle.
    pub fn h(&self) -> TriangularMatrix {
        Self::from_triangular(self.triangle.flip(), self.m.h())
    }
}

impl MatrixRef for TriangularMatrix {
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

impl From<TriangularMatrix> for ZMatrix {
    fn from(t: TriangularMatrix) -> ZMatrix {
        t.m
    }
}
