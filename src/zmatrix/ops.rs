use core::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use num_traits::Zero;

use crate::traits::Z;

use super::ZMatrix;

impl ZMatrix {
    fn zip_with(&self, rhs: &ZMatrix, op: &str, f: impl Fn(Z, Z) -> Z) -> ZMatrix {
        assert_eq!(
            (self.nrows, self.ncols),
            (rhs.nrows, rhs.ncols),
            "dimension mismatch: {}x{} {} {}x{}",
            self.nrows, self.ncols, op, rhs.nrows, rhs.ncols,
        );
        let data = self
            .data
            .iter()
            .zip(rhs.data.iter())
            .map(|(&a, &b)| f(a, b))
            .collect();
        ZMatrix::from_vec(self.nrows, self.ncols, data).with_base(self.base)
    }

    fn map(&self, f: impl Fn(Z) -> Z) -> ZMatrix {
        let data = self.data.iter().map(|&a| f(a)).collect();
        ZMatrix::from_vec(self.nrows, self.ncols, data).with_base(self.base)
    }

    /// Conjugate transpose.
    ///
    /// ```
    /// use zdense::{ZMatrix, Z};
    /// let a = ZMatrix::from_rows(1, 2, &[Z::new(1.0, 2.0), Z::new(3.0, -4.0)]);
    /// let ah = a.h();
    /// assert_eq!(ah.nrows(), 2);
    /// assert_eq!(ah[(1, 0)], Z::new(3.0, 4.0));
    /// ```
    pub fn h(&self) -> ZMatrix {
        let mut out = self.zeros_like(self.ncols, self.nrows);
        for j in 0..self.ncols {
            for i in 0..self.nrows {
                out.data[i * self.ncols + j] = self.data[j * self.nrows + i].conj();
            }
        }
        out
    }

    /// Transpose without conjugation.
    pub fn t(&self) -> ZMatrix {
        let mut out = self.zeros_like(self.ncols, self.nrows);
        for j in 0..self.ncols {
            for i in 0..self.nrows {
                out.data[i * self.ncols + j] = self.data[j * self.nrows + i];
            }
        }
        out
    }

    /// Element-wise conjugate.
    pub fn conj(&self) -> ZMatrix {
        self.map(|a| a.conj())
    }

    /// Multiply every entry by a real factor.
    pub fn scale(&self, factor: f64) -> ZMatrix {
        self.map(|a| a * factor)
    }
}

// ── Addition / subtraction ──────────────────────────────────────────

impl Add<&ZMatrix> for &ZMatrix {
    type Output = ZMatrix;
    fn add(self, rhs: &ZMatrix) -> ZMatrix {
        self.zip_with(rhs, "+", |a, b| a + b)
    }
}

impl Add for ZMatrix {
    type Output = ZMatrix;
    fn add(self, rhs: ZMatrix) -> ZMatrix {
        &self + &rhs
    }
}

impl Add<&ZMatrix> for ZMatrix {
    type Output = ZMatrix;
    fn add(self, rhs: &ZMatrix) -> ZMatrix {
        &self + rhs
    }
}

impl AddAssign<&ZMatrix> for ZMatrix {
    fn add_assign(&mut self, rhs: &ZMatrix) {
        assert_eq!(
            (self.nrows, self.ncols),
            (rhs.nrows, rhs.ncols),
            "dimension mismatch: {}x{} += {}x{}",
            self.nrows, self.ncols, rhs.nrows, rhs.ncols,
        );
        self.touch();
        for (a, &b) in self.data.iter_mut().zip(rhs.data.iter()) {
            *a += b;
        }
    }
}

impl Sub<&ZMatrix> for &ZMatrix {
    type Output = ZMatrix;
    fn sub(self, rhs: &ZMatrix) -> ZMatrix {
        self.zip_with(rhs, "-", |a, b| a - b)
    }
}

impl Sub for ZMatrix {
    type Output = ZMatrix;
    fn sub(self, rhs: ZMatrix) -> ZMatrix {
        &self - &rhs
    }
}

impl Sub<&ZMatrix> for ZMatrix {
    type Output = ZMatrix;
    fn sub(self, rhs: &ZMatrix) -> ZMatrix {
        &self - rhs
    }
}

impl SubAssign<&ZMatrix> for ZMatrix {
    fn sub_assign(&mut self, rhs: &ZMatrix) {
        assert_eq!(
            (self.nrows, self.ncols),
            (rhs.nrows, rhs.ncols),
            "dimension mismatch: {}x{} -= {}x{}",
            self.nrows, self.ncols, rhs.nrows, rhs.ncols,
        );
        self.touch();
        for (a, &b) in self.data.iter_mut().zip(rhs.data.iter()) {
            *a -= b;
        }
    }
}

impl Neg for &ZMatrix {
    type Output = ZMatrix;
    fn neg(self) -> ZMatrix {
        self.map(|a| -a)
    }
}

impl Neg for ZMatrix {
    type Output = ZMatrix;
    fn neg(self) -> ZMatrix {
        -&self
    }
}

// ── Matrix product ──────────────────────────────────────────────────

impl Mul<&ZMatrix> for &ZMatrix {
    type Output = ZMatrix;

    fn mul(self, rhs: &ZMatrix) -> ZMatrix {
        assert_eq!(
            self.ncols, rhs.nrows,
            "dimension mismatch: {}x{} * {}x{}",
            self.nrows, self.ncols, rhs.nrows, rhs.ncols,
        );
        let m = self.nrows;
        let mut out = self.zeros_like(m, rhs.ncols);
        for j in 0..rhs.ncols {
            let dst = &mut out.data[j * m..(j + 1) * m];
            for k in 0..self.ncols {
                let b = rhs.data[j * rhs.nrows + k];
                if b.is_zero() {
                    continue;
                }
                let col = &self.data[k * m..(k + 1) * m];
                for (d, &a) in dst.iter_mut().zip(col.iter()) {
                    *d += a * b;
                }
            }
        }
        out
    }
}

impl Mul for ZMatrix {
    type Output = ZMatrix;
    fn mul(self, rhs: ZMatrix) -> ZMatrix {
        &self * &rhs
    }
}

impl Mul<&ZMatrix> for ZMatrix {
    type Output = ZMatrix;
    fn mul(self, rhs: &ZMatrix) -> ZMatrix {
        &self * rhs
    }
}

impl Mul<ZMatrix> for &ZMatrix {
    type Output = ZMatrix;
    fn mul(self, rhs: ZMatrix) -> ZMatrix {
        self * &rhs
    }
}

// ── Scalar product ──────────────────────────────────────────────────

impl Mul<Z> for &ZMatrix {
    type Output = ZMatrix;
    fn mul(self, rhs: Z) -> ZMatrix {
        self.map(|a| a * rhs)
    }
}

impl Mul<Z> for ZMatrix {
    type Output = ZMatrix;
    fn mul(self, rhs: Z) -> ZMatrix {
        &self * rhs
    }
}

impl Mul<&ZMatrix> for Z {
    type Output = ZMatrix;
    fn mul(self, rhs: &ZMatrix) -> ZMatrix {
        rhs * self
    }
}

impl MulAssign<Z> for ZMatrix {
    fn mul_assign(&mut self, rhs: Z) {
        self.touch();
        for a in self.data.iter_mut() {
            *a *= rhs;
        }
    }
}
