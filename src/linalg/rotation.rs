use core::ops::Range;

use num_traits::{One, Zero};

use crate::traits::{ComplexExt, MatrixMut, Z};

/// Plane rotation
///
/// ```text
/// P = |    c      s |
///     | -conj(s)  c |
/// ```
///
/// with real cosine `c` and complex sine `s`, together with the surviving
/// component `z` of the vector it was generated from.
///
/// ```
/// use zdense::linalg::Rotation;
/// use zdense::Z;
///
/// let (x, y) = (Z::new(3.0, 0.0), Z::new(0.0, 4.0));
/// let p = Rotation::column(x, y);
/// // P [x; y] = [z; 0]
/// let top = x * p.c + p.s * y;
/// let bottom = -p.s.conj() * x + y * p.c;
/// assert!((top - p.z).norm() < 1e-12);
/// assert!(bottom.norm() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rotation {
    pub c: f64,
    pub s: Z,
    pub z: Z,
}

impl Rotation {
    /// Rotation with `P [x; y] = [z; 0]`.
    pub fn column(x: Z, y: Z) -> Self {
        if x.is_exact_zero() {
            return Self { c: 0.0, s: Z::one(), z: y };
        }
        let absx = x.abs_scaled();
        let n = absx.hypot(y.abs_scaled());
        let xh = x / absx;
        Self {
            c: absx / n,
            s: xh * y.conj() / n,
            z: xh * n,
        }
    }

    /// Rotation with `[x y] P = [z 0]`.
    pub fn row(x: Z, y: Z) -> Self {
        if x.is_exact_zero() {
            return Self { c: 0.0, s: -Z::one(), z: y };
        }
        let absx = x.abs_scaled();
        let n = absx.hypot(y.abs_scaled());
        let xh = x / absx;
        Self {
            c: absx / n,
            s: -(xh.conj() * y) / n,
            z: xh * n,
        }
    }

    /// Real rotation with `P [x; y] = [z; 0]`.
    pub fn column_real(x: f64, y: f64) -> Self {
        if x == 0.0 && y == 0.0 {
            return Self { c: 1.0, s: Z::zero(), z: Z::zero() };
        }
        let z = x.hypot(y);
        Self {
            c: x / z,
            s: Z::new(y / z, 0.0),
            z: Z::new(z, 0.0),
        }
    }

    /// Real rotation with `[x y] P = [z 0]`.
    pub fn row_real(x: f64, y: f64) -> Self {
        if x.abs() + y.abs() == 0.0 {
            return Self { c: 1.0, s: Z::zero(), z: Z::zero() };
        }
        let z = x.hypot(y);
        Self {
            c: x / z,
            s: Z::new(-y / z, 0.0),
            z: Z::new(z, 0.0),
        }
    }

    /// Generate from `a[i1, j]`, `a[i2, j]`; write `z` and `0` back.
    pub fn annihilate_column(a: &mut impl MatrixMut, i1: usize, i2: usize, j: usize) -> Self {
        let p = Self::column(a.at(i1, j), a.at(i2, j));
        a.set(i1, j, p.z);
        a.set(i2, j, Z::zero());
        p
    }

    /// Generate from `a[i, j1]`, `a[i, j2]`; write `z` and `0` back.
    pub fn annihilate_row(a: &mut impl MatrixMut, i: usize, j1: usize, j2: usize) -> Self {
        let p = Self::row(a.at(i, j1), a.at(i, j2));
        a.set(i, j1, p.z);
        a.set(i, j2, Z::zero());
        p
    }

    /// `A = P A` on rows `i1`, `i2` over `cols`.
    pub fn apply_rows(&self, a: &mut impl MatrixMut, i1: usize, i2: usize, cols: Range<usize>) {
        let sc = self.s.conj();
        for j in cols {
            let (a1, a2) = (a.at(i1, j), a.at(i2, j));
            a.set(i1, j, a1 * self.c + self.s * a2);
            a.set(i2, j, a2 * self.c - sc * a1);
        }
    }

    /// `A = Pᴴ A` on rows `i1`, `i2` over `cols`.
    pub fn apply_rows_h(&self, a: &mut impl MatrixMut, i1: usize, i2: usize, cols: Range<usize>) {
        let sc = self.s.conj();
        for j in cols {
            let (a1, a2) = (a.at(i1, j), a.at(i2, j));
            a.set(i1, j, a1 * self.c - self.s * a2);
            a.set(i2, j, a2 * self.c + sc * a1);
        }
    }

    /// `A = A P` on columns `j1`, `j2` over `rows`.
    pub fn apply_cols(&self, a: &mut impl MatrixMut, rows: Range<usize>, j1: usize, j2: usize) {
        let sc = self.s.conj();
        for i in rows {
            let (a1, a2) = (a.at(i, j1), a.at(i, j2));
            a.set(i, j1, a1 * self.c - sc * a2);
            a.set(i, j2, a2 * self.c + self.s * a1);
        }
    }

    /// `A = A Pᴴ` on columns `j1`, `j2` over `rows`.
    pub fn apply_cols_h(&self, a: &mut impl MatrixMut, rows: Range<usize>, j1: usize, j2: usize) {
        let sc = self.s.conj();
        for i in rows {
            let (a1, a2) = (a.at(i, j1), a.at(i, j2));
            a.set(i, j1, a1 * self.c + sc * a2);
            a.set(i, j2, a2 * self.c - self.s * a1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ZMatrix;

    const TOL: f64 = 1e-12;

    fn assert_near(a: Z, b: Z, tol: f64, msg: &str) {
        assert!((a - b).norm() < tol, "{}: {} vs {} (diff {})", msg, a, b, (a - b).norm());
    }

    fn as_matrix(p: &Rotation) -> ZMatrix {
        ZMatrix::from_rows(2, 2, &[
            Z::new(p.c, 0.0), p.s,
            -p.s.conj(), Z::new(p.c, 0.0),
        ])
    }

    #[test]
    fn column_annihilates() {
        for (x, y) in [
            (Z::new(1.0, 2.0), Z::new(-3.0, 0.5)),
            (Z::new(0.0, 0.0), Z::new(2.0, -1.0)),
            (Z::new(-4.0, 0.0), Z::new(0.0, 0.0)),
        ] {
            let p = Rotation::column(x, y);
            let r = &as_matrix(&p) * &ZMatrix::column(&[x, y]);
            assert_near(r[(0, 0)], p.z, TOL, "top");
            assert_near(r[(1, 0)], Z::zero(), TOL, "bottom");
        }
    }

    #[test]
    fn row_annihilates() {
        for (x, y) in [
            (Z::new(1.0, 2.0), Z::new(-3.0, 0.5)),
            (Z::new(0.0, 0.0), Z::new(2.0, -1.0)),
        ] {
            let p = Rotation::row(x, y);
            let r = &ZMatrix::from_rows(1, 2, &[x, y]) * &as_matrix(&p);
            assert_near(r[(0, 0)], p.z, TOL, "left");
            assert_near(r[(0, 1)], Z::zero(), TOL, "right");
        }
    }

    #[test]
    fn real_rotations() {
        let p = Rotation::column_real(3.0, 4.0);
        assert!((p.c - 0.6).abs() < TOL);
        assert!((p.z.re - 5.0).abs() < TOL);
        let q = Rotation::row_real(3.0, 4.0);
        assert!((q.s.re + 0.8).abs() < TOL);
        assert_eq!(Rotation::column_real(0.0, 0.0).c, 1.0);
        assert_eq!(Rotation::row_real(0.0, 0.0).s, Z::zero());
    }

    #[test]
    fn unitary() {
        let p = Rotation::column(Z::new(1.0, -1.0), Z::new(0.5, 2.0));
        let m = as_matrix(&p);
        let i = &m.h() * &m;
        assert_near(i[(0, 0)], Z::one(), TOL, "(0,0)");
        assert_near(i[(0, 1)], Z::zero(), TOL, "(0,1)");
        assert_near(i[(1, 1)], Z::one(), TOL, "(1,1)");
    }

    #[test]
    fn apply_matches_products() {
        let a = ZMatrix::from_fn(3, 3, |i, j| Z::new(i as f64 + 1.0, j as f64 - i as f64));
        let p = Rotation::column(Z::new(2.0, 1.0), Z::new(-1.0, 3.0));
        let pm = as_matrix(&p);

        // embed P in rows/cols 0 and 2 of a 3x3 identity
        let mut full = ZMatrix::eye(3);
        full[(0, 0)] = pm[(0, 0)];
        full[(0, 2)] = pm[(0, 1)];
        full[(2, 0)] = pm[(1, 0)];
        full[(2, 2)] = pm[(1, 1)];

        let mut r = a.clone();
        p.apply_rows(&mut r, 0, 2, 0..3);
        let expected = &full * &a;
        let mut rh = a.clone();
        p.apply_rows_h(&mut rh, 0, 2, 0..3);
        let expected_h = &full.h() * &a;
        let mut c = a.clone();
        p.apply_cols(&mut c, 0..3, 0, 2);
        let expected_c = &a * &full;
        let mut ch = a.clone();
        p.apply_cols_h(&mut ch, 0..3, 0, 2);
        let expected_ch = &a * &full.h();

        for i in 0..3 {
            for j in 0..3 {
                assert_near(r[(i, j)], expected[(i, j)], TOL, "P A");
                assert_near(rh[(i, j)], expected_h[(i, j)], TOL, "Pᴴ A");
                assert_near(c[(i, j)], expected_c[(i, j)], TOL, "A P");
                assert_near(ch[(i, j)], expected_ch[(i, j)], TOL, "A Pᴴ");
            }
        }
    }

    #[test]
    fn annihilate_in_matrix() {
        let mut a = ZMatrix::from_rows(2, 2, &[
            Z::new(1.0, 1.0), Z::new(2.0, 0.0),
            Z::new(3.0, -1.0), Z::new(0.0, 1.0),
        ]);
        let p = Rotation::annihilate_column(&mut a, 0, 1, 0);
        assert_eq!(a[(1, 0)], Z::zero());
        p.apply_rows(&mut a, 0, 1, 1..2);
        let mut b = a.clone();
        let q = Rotation::annihilate_row(&mut b, 0, 0, 1);
        assert_eq!(b[(0, 1)], Z::zero());
        assert!(q.c >= 0.0);
    }
}
