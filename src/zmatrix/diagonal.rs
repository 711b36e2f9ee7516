use core::ops::Mul;

use num_traits::Zero;

use crate::linalg::LinalgError;
use crate::traits::{MatrixRef, Z};

use super::{BaseIndex, ZMatrix};

/// Square diagonal matrix storing only its diagonal.
///
/// ```
/// use zdense::{DiagMatrix, ZMatrix, Z};
///
/// let d = DiagMatrix::from_slice(&[Z::new(2.0, 0.0), Z::new(0.0, 1.0)]);
/// assert_eq!(d.get(2), Z::new(0.0, 1.0));
/// let dense = ZMatrix::from(&d);
/// assert_eq!(dense[(0, 1)], Z::new(0.0, 0.0));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DiagMatrix {
    d: Vec<Z>,
    base: BaseIndex,
}

impl DiagMatrix {
    /// Zero diagonal of order `n`.
    pub fn zeros(n: usize) -> Self {
        Self::from_vec(vec![Z::zero(); n])
    }

    /// Identity of order `n`.
    pub fn eye(n: usize) -> Self {
        Self::from_vec(vec![Z::new(1.0, 0.0); n])
    }

    pub fn from_slice(d: &[Z]) -> Self {
        Self::from_vec(d.to_vec())
    }

    pub fn from_vec(d: Vec<Z>) -> Self {
        Self { d, base: BaseIndex::default() }
    }

    /// Diagonal from separate real and imaginary parts of equal length.
    pub fn from_parts(re: &[f64], im: &[f64]) -> Result<Self, LinalgError> {
        if re.len() != im.len() {
            return Err(LinalgError::nonconformity((re.len(), 1), (im.len(), 1)));
        }
        Ok(Self::from_vec(
            re.iter().zip(im).map(|(&r, &i)| Z::new(r, i)).collect(),
        ))
    }

    /// Real diagonal.
    pub fn from_real(re: &[f64]) -> Self {
        Self::from_vec(re.iter().map(|&r| Z::new(r, 0.0)).collect())
    }

    /// Main diagonal of `a` (length `min(nrows, ncols)`), keeping its base.
    pub fn diagonal_of(a: &ZMatrix) -> Self {
        let n = a.nrows.min(a.ncols);
        Self::from_vec((0..n).map(|i| a[(i, i)]).collect()).with_base(a.base)
    }

    pub(crate) fn with_base(mut self, base: BaseIndex) -> Self {
        self.base = base;
        self
    }

    /// Order of the matrix.
    #[inline]
    pub fn order(&self) -> usize {
        self.d.len()
    }

    #[inline]
    pub fn base(&self) -> BaseIndex {
        self.base
    }

    /// Diagonal entries, zero-based.
    #[inline]
    pub fn as_slice(&self) -> &[Z] {
        &self.d
    }

    /// Diagonal entry `ii` at the base index.
    #[inline]
    pub fn get(&self, ii: usize) -> Z {
        self.d[ii - self.base.offset()]
    }

    #[inline]
    pub fn put(&mut self, ii: usize, value: Z) {
        let b = self.base.offset();
        self.d[ii - b] = value;
    }

    #[inline]
    pub fn get0(&self, i: usize) -> Z {
        self.d[i]
    }

    #[inline]
    pub fn put0(&mut self, i: usize, value: Z) {
        self.d[i] = value;
    }

    /// Conjugate transpose (element-wise conjugate of the diagonal).
    pub fn h(&self) -> DiagMatrix {
        Self::from_vec(self.d.iter().map(|z| z.conj()).collect()).with_base(self.base)
    }
}

impl MatrixRef for DiagMatrix {
    #[inline]
    fn nrows(&self) -> usize {
        self.d.len()
    }

    #[inline]
    fn ncols(&self) -> usize {
        self.d.len()
    }

    #[inline]
    fn at(&self, row: usize, col: usize) -> Z {
        if row == col {
            self.d[row]
        } else {
            Z::zero()
        }
    }
}

impl From<&DiagMatrix> for ZMatrix {
    fn from(d: &DiagMatrix) -> ZMatrix {
        let n = d.order();
        let mut m = ZMatrix::zeros(n, n).with_base(d.base);
        for (i, &z) in d.d.iter().enumerate() {
            m.data[i * n + i] = z;
        }
        m
    }
}

/// `D * A` scales the rows of `A`.
impl Mul<&ZMatrix> for &DiagMatrix {
    type Output = ZMatrix;

    fn mul(self, rhs: &ZMatrix) -> ZMatrix {
        assert_eq!(
            self.order(), rhs.nrows,
            "dimension mismatch: {}x{} * {}x{}",
            self.order(), self.order(), rhs.nrows, rhs.ncols,
        );
        let mut out = ZMatrix::from_vec(rhs.nrows, rhs.ncols, rhs.data.clone()).with_base(self.base);
        for j in 0..rhs.ncols {
            for (i, &d) in self.d.iter().enumerate() {
                out.data[j * rhs.nrows + i] *= d;
            }
        }
        out
    }
}

/// `A * D` scales the columns of `A`.
impl Mul<&DiagMatrix> for &ZMatrix {
    type Output = ZMatrix;

    fn mul(self, rhs: &DiagMatrix) -> ZMatrix {
        assert_eq!(
            self.ncols, rhs.order(),
            "dimension mismatch: {}x{} * {}x{}",
            self.nrows, self.ncols, rhs.order(), rhs.order(),
        );
        let mut out = self.clone();
        for (j, &d) in rhs.d.iter().enumerate() {
            for x in &mut out.data[j * self.nrows..(j + 1) * self.nrows] {
                *x *= d;
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_parts_lengths() {
        let d = DiagMatrix::from_parts(&[1.0, 2.0], &[0.0, -1.0]).unwrap();
        assert_eq!(d.get0(1), Z::new(2.0, -1.0));
        assert!(matches!(
            DiagMatrix::from_parts(&[1.0, 2.0], &[0.0]),
            Err(LinalgError::Nonconformity { .. })
        ));
    }

    #[test]
    fn implicit_zeros() {
        let d = DiagMatrix::from_real(&[1.0, 2.0, 3.0]);
        assert_eq!(d.at(0, 1), Z::zero());
        assert_eq!(d.at(2, 2), Z::new(3.0, 0.0));
        assert_eq!(d.get(1), Z::new(1.0, 0.0));
    }

    #[test]
    fn diagonal_of_rectangular() {
        let a = ZMatrix::from_fn(2, 3, |i, j| Z::new((i * 3 + j) as f64, 0.0));
        let d = DiagMatrix::diagonal_of(&a);
        assert_eq!(d.order(), 2);
        assert_eq!(d.get0(1), Z::new(4.0, 0.0));
    }

    #[test]
    fn scaling_products() {
        let d = DiagMatrix::from_real(&[2.0, 3.0]);
        let a = ZMatrix::from_fn(2, 2, |_, _| Z::new(1.0, 1.0));
        let da = &d * &a;
        assert_eq!(da[(1, 0)], Z::new(3.0, 3.0));
        let ad = &a * &d;
        assert_eq!(ad[(1, 0)], Z::new(2.0, 2.0));
        assert_eq!(&ZMatrix::from(&d) * &a, da);
    }
}
