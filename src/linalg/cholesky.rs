use crate::linalg::{require_square, LinalgError};
use crate::traits::{ComplexExt, MatrixMut, Z};
use crate::zmatrix::TriangularMatrix;
use crate::ZMatrix;

/// Cholesky factorization `A = Rᴴ R` in place.
///
/// Reads only the upper triangle of `a` and overwrites it with the upper
/// triangular factor `R`; the strict lower triangle is left unchanged.
///
/// Fails with `NotPositiveDefinite` when a pivot is not strictly positive.
pub fn cholesky_in_place(a: &mut impl MatrixMut) -> Result<(), LinalgError> {
    let n = a.nrows();
    assert_eq!(n, a.ncols(), "Cholesky decomposition requires a square matrix");

    for j in 0..n {
        // Row i of R above the diagonal in column j
        for i in 0..j {
            let mut s = a.at(i, j);
            for k in 0..i {
                s.sub_conj_prod(a.at(k, i), a.at(k, j));
            }
            let rii = a.at(i, i);
            a.set(i, j, s / rii);
        }

        let mut d = a.at(j, j).re;
        for k in 0..j {
            d -= a.at(k, j).norm_sqr();
        }
        if d <= 0.0 || d.is_nan() {
            return Err(LinalgError::NotPositiveDefinite);
        }
        a.set(j, j, Z::new(d.sqrt(), 0.0));
    }

    Ok(())
}

/// Cholesky decomposition of a Hermitian positive definite matrix.
///
/// # Example
///
/// ```
/// use zdense::linalg::ZCholesky;
/// use zdense::{ZMatrix, Z};
///
/// let a = ZMatrix::from_rows(2, 2, &[
///     Z::new(4.0, 0.0), Z::new(2.0, 0.0),
///     Z::new(2.0, 0.0), Z::new(3.0, 0.0),
/// ]);
/// let chol = ZCholesky::new(&a).unwrap();
/// let x = chol.solve(&ZMatrix::column(&[Z::new(8.0, 0.0), Z::new(7.0, 0.0)])).unwrap();
/// assert!((x[(0, 0)] - Z::new(1.25, 0.0)).norm() < 1e-12);
/// assert!((chol.det() - 8.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct ZCholesky {
    /// Upper triangular factor with real positive diagonal.
    r: TriangularMatrix,
}

impl ZCholesky {
    /// Factor `a`, reading its upper triangle.
    pub fn new(a: &ZMatrix) -> Result<Self, LinalgError> {
        require_square(a.nrows(), a.ncols())?;
        let mut w = a.clone();
        cholesky_in_place(&mut w)?;
        Ok(Self {
            r: TriangularMatrix::upper(w),
        })
    }

    /// The factor `R` with `A = Rᴴ R`.
    #[inline]
    pub fn r(&self) -> &TriangularMatrix {
        &self.r
    }

    /// Solve `A X = B` as `R⁻¹ (R⁻ᴴ B)`.
    pub fn solve(&self, b: &ZMatrix) -> Result<ZMatrix, LinalgError> {
        let y = self.r.solve_h(b)?;
        self.r.solve(&y)
    }

    /// Determinant of `A`, the squared product of the diagonal of `R`.
    pub fn det(&self) -> f64 {
        let n = self.r.nrows();
        let p: f64 = (0..n).map(|i| self.r.get0(i, i).re).product();
        p * p
    }

    /// `Rᴴ R`.
    pub fn reconstruct(&self) -> ZMatrix {
        let r = self.r.as_matrix();
        &r.h() * r
    }
}

impl ZMatrix {
    /// Cholesky factorization of the upper triangle, computed fresh.
    pub fn cholesky(&self) -> Result<ZCholesky, LinalgError> {
        ZCholesky::new(self)
    }

    /// Whether `self` equals its conjugate transpose within `tol`.
    pub fn is_hermitian(&self, tol: f64) -> bool {
        if !self.is_square() {
            return false;
        }
        let n = self.nrows();
        for j in 0..n {
            for i in 0..=j {
                let d = self[(i, j)] - self[(j, i)].conj();
                if d.abs_scaled() > tol {
                    return false;
                }
            }
        }
        true
    }
}

/// Hermitian part of the upper triangle: lower = conj(upper), real diagonal.
pub(crate) fn hermitize_from_upper(a: &mut ZMatrix) {
    let n = a.nrows();
    for j in 0..n {
        a[(j, j)].im = 0.0;
        for i in 0..j {
            a[(j, i)] = a[(i, j)].conj();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_traits::Zero;

    const TOL: f64 = 1e-12;

    fn assert_near(a: Z, b: Z, tol: f64, msg: &str) {
        assert!((a - b).norm() < tol, "{}: {} vs {}", msg, a, b);
    }

    fn hpd() -> ZMatrix {
        // Bᴴ B + I for a fixed complex B
        let b = ZMatrix::from_fn(3, 3, |i, j| Z::new((i + j) as f64 * 0.5, i as f64 - j as f64));
        &(&b.h() * &b) + &ZMatrix::eye(3)
    }

    #[test]
    fn reconstruct_hpd() {
        let a = hpd();
        let chol = a.cholesky().unwrap();
        let back = chol.reconstruct();
        for i in 0..3 {
            for j in 0..3 {
                assert_near(back[(i, j)], a[(i, j)], 1e-10, "Rᴴ R");
            }
        }
        for i in 0..3 {
            assert!(chol.r().get0(i, i).re > 0.0);
            assert_eq!(chol.r().get0(i, i).im, 0.0);
        }
    }

    #[test]
    fn reads_only_upper() {
        let mut a = hpd();
        let reference = a.cholesky().unwrap();
        for j in 0..3 {
            for i in (j + 1)..3 {
                a[(i, j)] = Z::new(99.0, -99.0);
            }
        }
        let chol = a.cholesky().unwrap();
        assert_eq!(chol.r(), reference.r());
    }

    #[test]
    fn not_positive_definite() {
        let a = ZMatrix::from_rows(2, 2, &[
            Z::new(1.0, 0.0), Z::new(5.0, 0.0),
            Z::new(5.0, 0.0), Z::new(1.0, 0.0),
        ]);
        assert_eq!(a.cholesky().unwrap_err(), LinalgError::NotPositiveDefinite);
        let z = ZMatrix::zeros(2, 2);
        assert_eq!(z.cholesky().unwrap_err(), LinalgError::NotPositiveDefinite);
    }

    #[test]
    fn rectangular_rejected() {
        assert_eq!(
            ZMatrix::zeros(2, 3).cholesky().unwrap_err(),
            LinalgError::Rectangular { rows: 2, cols: 3 }
        );
    }

    #[test]
    fn solve_and_det() {
        let a = hpd();
        let chol = a.cholesky().unwrap();
        let b = ZMatrix::from_fn(3, 2, |i, j| Z::new(i as f64, 1.0 + j as f64));
        let x = chol.solve(&b).unwrap();
        let r = &(&a * &x) - &b;
        assert!(r.norm_fro() < 1e-10);
        let d = a.lu().det().unwrap();
        assert!((d.re - chol.det()).abs() < 1e-8 * d.norm());
        assert!(d.im.abs() < 1e-8 * d.norm());
    }

    #[test]
    fn hermitize() {
        let mut a = ZMatrix::from_rows(2, 2, &[
            Z::new(1.0, 0.5), Z::new(2.0, 3.0),
            Z::zero(), Z::new(4.0, -1.0),
        ]);
        hermitize_from_upper(&mut a);
        assert!(a.is_hermitian(TOL));
        assert_eq!(a[(1, 0)], Z::new(2.0, -3.0));
        assert_eq!(a[(0, 0)], Z::new(1.0, 0.0));
    }
}
