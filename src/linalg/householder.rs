use core::ops::Range;

use num_traits::Zero;

use crate::traits::{ComplexExt, MatrixMut, Z};

/// Householder reflector `H = I - tau · v vᴴ`.
///
/// `v[0]` is real and at least one, `‖v‖² = 2 v[0]` and `tau = 1 / v[0]`,
/// which makes `H` unitary and Hermitian. A zero source vector yields
/// `tau = 0`, the identity.
#[derive(Debug, Clone, PartialEq)]
pub struct Reflector {
    pub v: Vec<Z>,
    pub tau: f64,
}

/// Euclidean norm of a complex vector without intermediate overflow.
pub(crate) fn norm2(x: &[Z]) -> f64 {
    x.iter().fold(0.0_f64, |acc, z| acc.hypot(z.abs_scaled()))
}

impl Reflector {
    /// Reflector sending `a[rows, col]` to a multiple of the first unit vector.
    ///
    /// The pivot `a[rows.start, col]` becomes `-phase(x0)·‖x‖` and the
    /// entries below it become zero.
    ///
    /// ```
    /// use zdense::linalg::Reflector;
    /// use zdense::{ZMatrix, Z};
    ///
    /// let mut a = ZMatrix::column(&[Z::new(3.0, 0.0), Z::new(0.0, 4.0)]);
    /// let h = Reflector::from_column(&mut a, 0..2, 0);
    /// assert!((a[(0, 0)] - Z::new(-5.0, 0.0)).norm() < 1e-12);
    /// assert_eq!(a[(1, 0)], Z::new(0.0, 0.0));
    /// assert!((h.tau - 1.0 / h.v[0].re).abs() < 1e-12);
    /// ```
    pub fn from_column(a: &mut impl MatrixMut, rows: Range<usize>, col: usize) -> Self {
        let x: Vec<Z> = rows.clone().map(|i| a.at(i, col)).collect();
        let Some((v, tau, pivot)) = Self::generate(&x, false) else {
            return Self::identity(x.len());
        };
        a.set(rows.start, col, pivot);
        for i in rows.skip(1) {
            a.set(i, col, Z::zero());
        }
        Self { v, tau }
    }

    /// Reflector sending the row segment `a[row, cols]` to a multiple of
    /// the first unit row vector, applied from the right.
    pub fn from_row(a: &mut impl MatrixMut, row: usize, cols: Range<usize>) -> Self {
        let x: Vec<Z> = cols.clone().map(|j| a.at(row, j)).collect();
        let Some((v, tau, pivot)) = Self::generate(&x, true) else {
            return Self::identity(x.len());
        };
        a.set(row, cols.start, pivot);
        for j in cols.skip(1) {
            a.set(row, j, Z::zero());
        }
        Self { v, tau }
    }

    fn identity(n: usize) -> Self {
        Self { v: vec![Z::zero(); n], tau: 0.0 }
    }

    /// `(v, tau, pivot)` for `x`, or `None` when `x` is zero.
    fn generate(x: &[Z], row: bool) -> Option<(Vec<Z>, f64, Z)> {
        let nu = norm2(x);
        if nu == 0.0 {
            return None;
        }
        let rho = x[0].phase();
        let mut v: Vec<Z> = if row {
            x.iter().map(|&xi| rho * xi.conj() / nu).collect()
        } else {
            let rc = rho.conj();
            x.iter().map(|&xi| rc * xi / nu).collect()
        };
        // v[0] = |x0|/nu + 1, real up to rounding
        v[0] = Z::new(v[0].re + 1.0, 0.0);
        let tau = 1.0 / v[0].re;
        Some((v, tau, -rho * nu))
    }

    #[inline]
    pub fn is_identity(&self) -> bool {
        self.tau == 0.0
    }
}

/// `A[rows, cols] = H · A[rows, cols]`. `work` needs `cols.len()` entries.
pub fn reflect_left(
    a: &mut impl MatrixMut,
    h: &Reflector,
    rows: Range<usize>,
    cols: Range<usize>,
    work: &mut [Z],
) {
    if h.is_identity() || cols.is_empty() {
        return;
    }
    debug_assert_eq!(rows.len(), h.v.len());
    let work = &mut work[..cols.len()];
    for (w, j) in work.iter_mut().zip(cols.clone()) {
        *w = Z::zero();
        for (k, i) in rows.clone().enumerate() {
            *w += h.v[k].conj() * a.at(i, j);
        }
    }
    for (&w, j) in work.iter().zip(cols) {
        let tw = w * h.tau;
        for (k, i) in rows.clone().enumerate() {
            a.at_mut(i, j).sub_prod(h.v[k], tw);
        }
    }
}

/// `A[rows, cols] = A[rows, cols] · H`. `work` needs `rows.len()` entries.
pub fn reflect_right(
    a: &mut impl MatrixMut,
    h: &Reflector,
    rows: Range<usize>,
    cols: Range<usize>,
    work: &mut [Z],
) {
    if h.is_identity() || rows.is_empty() {
        return;
    }
    debug_assert_eq!(cols.len(), h.v.len());
    let work = &mut work[..rows.len()];
    for (w, i) in work.iter_mut().zip(rows.clone()) {
        *w = Z::zero();
        for (k, j) in cols.clone().enumerate() {
            *w += a.at(i, j) * h.v[k];
        }
    }
    for (k, j) in cols.enumerate() {
        let vc = h.v[k].conj() * h.tau;
        for (&w, i) in work.iter().zip(rows.clone()) {
            a.at_mut(i, j).sub_prod(w, vc);
        }
    }
}
