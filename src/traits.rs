use num_complex::Complex;
use num_traits::One;

use crate::linalg::LinalgError;

/// Double-precision complex scalar used by every matrix in the crate.
pub type Z = Complex<f64>;

/// Extra operations on [`Z`] that `num-complex` does not provide.
///
/// The value-returning methods are the default. The `*_prod` / `scale_by`
/// methods mutate the receiver and exist for elimination and reflection
/// inner loops, where they avoid a temporary per element. Their arguments
/// are taken by value, so the receiver can never alias an operand.
pub trait ComplexExt: Sized {
    /// Magnitude `s * sqrt((re/s)^2 + (im/s)^2)` with `s = max(|re|, |im|)`.
    ///
    /// Scaling keeps the squares from overflowing for large entries.
    ///
    /// ```
    /// use zdense::{ComplexExt, Z};
    /// let z = Z::new(3.0e200, 4.0e200);
    /// assert!((z.abs_scaled() / 5.0e200 - 1.0).abs() < 1e-15);
    /// ```
    fn abs_scaled(self) -> f64;

    /// Unit-magnitude phase `z / |z|`, or `1` for zero.
    fn phase(self) -> Self;

    /// Division that refuses an exact `0 + 0i` divisor.
    ///
    /// ```
    /// use zdense::{ComplexExt, Z};
    /// use zdense::linalg::LinalgError;
    /// let q = Z::new(1.0, 1.0).try_div(Z::new(0.0, 2.0)).unwrap();
    /// assert_eq!(q, Z::new(0.5, -0.5));
    /// assert_eq!(Z::new(1.0, 0.0).try_div(Z::new(0.0, 0.0)), Err(LinalgError::DivisionByZero));
    /// ```
    fn try_div(self, rhs: Self) -> Result<Self, LinalgError>;

    /// Swap contents with `other`.
    fn exchange(&mut self, other: &mut Self);

    /// `self -= a * b`
    fn sub_prod(&mut self, a: Self, b: Self);

    /// `self -= conj(a) * b`
    fn sub_conj_prod(&mut self, a: Self, b: Self);

    /// `self *= factor`
    fn scale_by(&mut self, factor: Self);

    /// Whether both parts are exactly zero.
    fn is_exact_zero(self) -> bool;
}

impl ComplexExt for Z {
    #[inline]
    fn abs_scaled(self) -> f64 {
        let s = self.re.abs().max(self.im.abs());
        if s == 0.0 {
            return 0.0;
        }
        let (r, i) = (self.re / s, self.im / s);
        s * (r * r + i * i).sqrt()
    }

    #[inline]
    fn phase(self) -> Z {
        let a = self.abs_scaled();
        if a == 0.0 {
            Z::one()
        } else {
            self / a
        }
    }

    #[inline]
    fn try_div(self, rhs: Z) -> Result<Z, LinalgError> {
        if rhs.is_exact_zero() {
            return Err(LinalgError::DivisionByZero);
        }
        Ok(self / rhs)
    }

    #[inline]
    fn exchange(&mut self, other: &mut Z) {
        core::mem::swap(self, other);
    }

    #[inline]
    fn sub_prod(&mut self, a: Z, b: Z) {
        self.re -= a.re * b.re - a.im * b.im;
        self.im -= a.re * b.im + a.im * b.re;
    }

    #[inline]
    fn sub_conj_prod(&mut self, a: Z, b: Z) {
        self.re -= a.re * b.re + a.im * b.im;
        self.im -= a.re * b.im - a.im * b.re;
    }

    #[inline]
    fn scale_by(&mut self, factor: Z) {
        *self = *self * factor;
    }

    #[inline]
    fn is_exact_zero(self) -> bool {
        self.re == 0.0 && self.im == 0.0
    }
}

/// Read-only zero-based access to a matrix-like type.
///
/// Implemented by [`ZMatrix`](crate::ZMatrix), the triangular and diagonal
/// variants, so norms and formatting work on all of them.
pub trait MatrixRef {
    fn nrows(&self) -> usize;
    fn ncols(&self) -> usize;
    /// Entry `(row, col)`, zero-based.
    fn at(&self, row: usize, col: usize) -> Z;
}

/// Mutable zero-based access, used by the in-place decomposition kernels.
///
/// Writing through this trait marks a [`ZMatrix`](crate::ZMatrix) dirty.
pub trait MatrixMut: MatrixRef {
    fn at_mut(&mut self, row: usize, col: usize) -> &mut Z;

    #[inline]
    fn set(&mut self, row: usize, col: usize, value: Z) {
        *self.at_mut(row, col) = value;
    }

    /// Exchange two rows across all columns.
    fn swap_rows(&mut self, r1: usize, r2: usize) {
        if r1 == r2 {
            return;
        }
        for j in 0..self.ncols() {
            let a = self.at(r1, j);
            let b = self.at(r2, j);
            self.set(r1, j, b);
            self.set(r2, j, a);
        }
    }

    /// Exchange two columns across all rows.
    fn swap_cols(&mut self, c1: usize, c2: usize) {
        if c1 == c2 {
            return;
        }
        for i in 0..self.nrows() {
            let a = self.at(i, c1);
            let b = self.at(i, c2);
            self.set(i, c1, b);
            self.set(i, c2, a);
        }
    }
}
