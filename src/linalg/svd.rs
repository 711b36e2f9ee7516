use num_traits::Zero;

use crate::linalg::householder::{reflect_left, reflect_right, Reflector};
use crate::linalg::rotation::Rotation;
use crate::linalg::{LinalgError, MAXITER, SVD_TOL};
use crate::traits::{ComplexExt, MatrixMut, Z};
use crate::zmatrix::DiagMatrix;
use crate::ZMatrix;

// ── Reduction to a real bidiagonal ──────────────────────────────────

/// Multiply column `j` of `a` by `f`.
fn scale_col(a: &mut ZMatrix, j: usize, f: Z) {
    for i in 0..a.nrows() {
        a[(i, j)].scale_by(f);
    }
}

/// Reduce `x` to upper bidiagonal form `Uᴴ X V = B`.
///
/// Returns the complex diagonal and superdiagonal of `B`, both of length
/// `min(nr, nc)`. The last superdiagonal entry is non-zero only when
/// `nc > nr`.
fn bidiagonalize(x: &mut ZMatrix, u: &mut ZMatrix, v: &mut ZMatrix) -> (Vec<Z>, Vec<Z>) {
    let nr = x.nrows();
    let nc = x.ncols();
    let m = nr.min(nc);
    let mut work = vec![Z::zero(); nr.max(nc)];

    for k in 0..m {
        let h = Reflector::from_column(x, k..nr, k);
        reflect_left(x, &h, k..nr, (k + 1)..nc, &mut work);
        reflect_right(u, &h, 0..nr, k..nr, &mut work);

        if k + 1 < nc {
            let h = Reflector::from_row(x, k, (k + 1)..nc);
            reflect_right(x, &h, (k + 1)..nr, (k + 1)..nc, &mut work);
            reflect_right(v, &h, 0..nc, (k + 1)..nc, &mut work);
        }
    }

    let d = (0..m).map(|k| x[(k, k)]).collect();
    let e = (0..m)
        .map(|k| if k + 1 < nc { x[(k, k + 1)] } else { Z::zero() })
        .collect();
    (d, e)
}

/// Rotate phases out of the bidiagonal so that every entry is real and
/// non-negative, moving the unit factors into the columns of `U` and `V`.
fn normalize_phases(
    dz: &mut [Z],
    ez: &mut [Z],
    u: &mut ZMatrix,
    v: &mut ZMatrix,
) -> (Vec<f64>, Vec<f64>) {
    let m = dz.len();
    let nc = v.ncols();
    let mut d = vec![0.0; m];
    let mut e = vec![0.0; m];

    for k in 0..m {
        if !dz[k].is_exact_zero() {
            let sigma = dz[k].phase();
            d[k] = dz[k].abs_scaled();
            ez[k] *= sigma.conj();
            scale_col(u, k, sigma);
        }
        if k + 1 < nc && !ez[k].is_exact_zero() {
            let tau = ez[k].phase();
            e[k] = ez[k].abs_scaled();
            if k + 1 < m {
                dz[k + 1] *= tau.conj();
            }
            scale_col(v, k + 1, tau.conj());
        }
    }
    (d, e)
}

/// For `nc > nr`, fold the superdiagonal entry in column `m` into `V` so
/// that the bidiagonal becomes square.
fn fold_trailing_column(d: &mut [f64], e: &mut [f64], v: &mut ZMatrix) {
    let m = d.len();
    let nc = v.ncols();
    let mut t = e[m - 1];
    e[m - 1] = 0.0;
    for k in (0..m).rev() {
        let p = Rotation::row_real(d[k], t);
        d[k] = p.z.re;
        if k > 0 {
            t = p.s.re * e[k - 1];
            e[k - 1] *= p.c;
        }
        p.apply_cols(v, 0..nc, k, m);
    }
}

// ── Implicit-shift QR on the bidiagonal ─────────────────────────────

/// Smaller singular value of `[f g; 0 h]`, zero when `min(|f|, |h|)` is.
fn smaller_singular_value(f: f64, g: f64, h: f64) -> f64 {
    let fa = f.abs();
    let ga = g.abs();
    let ha = h.abs();
    let fhmn = fa.min(ha);
    let fhmx = fa.max(ha);
    if fhmn == 0.0 {
        return 0.0;
    }
    if ga < fhmx {
        let as_ = 1.0 + fhmn / fhmx;
        let at = (fhmx - fhmn) / fhmx;
        let au = (ga / fhmx).powi(2);
        let c = 2.0 / ((as_ * as_ + au).sqrt() + (at * at + au).sqrt());
        fhmn * c
    } else {
        let au = fhmx / ga;
        if au == 0.0 {
            // ga overflows the ratio; fhmx / ga underflowed
            (fhmn * fhmx) / ga
        } else {
            let as_ = 1.0 + fhmn / fhmx;
            let at = (fhmx - fhmn) / fhmx;
            let c = 1.0 / ((1.0 + (as_ * au).powi(2)).sqrt() + (1.0 + (at * au).powi(2)).sqrt());
            2.0 * (fhmn * c) * au
        }
    }
}

/// `d[idx]` is negligible: zero it and chase `e[idx]` down to `iu` with
/// left rotations, splitting the block at `idx`.
fn chase_zero_diagonal(d: &mut [f64], e: &mut [f64], u: &mut ZMatrix, idx: usize, iu: usize) {
    log::trace!("negligible diagonal at {} in block ending at {}, chasing", idx, iu);
    let nr = u.nrows();
    d[idx] = 0.0;
    let mut z = e[idx];
    e[idx] = 0.0;
    for j in (idx + 1)..=iu {
        let p = Rotation::column_real(d[j], z);
        d[j] = p.z.re;
        if j < iu {
            z = -p.s.re * e[j];
            e[j] *= p.c;
        }
        p.apply_cols_h(u, 0..nr, j, idx);
    }
}

/// One shifted sweep over the block `il..=iu`.
fn qr_sweep(
    d: &mut [f64],
    e: &mut [f64],
    u: &mut ZMatrix,
    v: &mut ZMatrix,
    il: usize,
    iu: usize,
) {
    let nr = u.nrows();
    let nc = v.ncols();
    let shift = smaller_singular_value(d[iu - 1], e[iu - 1], d[iu]);

    let mut f = (d[il].abs() - shift) * (1.0_f64.copysign(d[il]) + shift / d[il]);
    let mut g = e[il];

    for k in il..iu {
        // Right rotation on columns k, k+1
        let p = Rotation::row_real(f, g);
        if k > il {
            e[k - 1] = p.z.re;
        }
        let (c, s) = (p.c, p.s.re);
        f = c * d[k] - s * e[k];
        e[k] = s * d[k] + c * e[k];
        g = -s * d[k + 1];
        d[k + 1] *= c;
        p.apply_cols(v, 0..nc, k, k + 1);

        // Left rotation on rows k, k+1 removes the bulge at (k+1, k)
        let q = Rotation::column_real(f, g);
        d[k] = q.z.re;
        let (c, s) = (q.c, q.s.re);
        f = c * e[k] + s * d[k + 1];
        d[k + 1] = c * d[k + 1] - s * e[k];
        if k + 1 < iu {
            g = s * e[k + 1];
            e[k + 1] *= c;
        }
        q.apply_cols_h(u, 0..nr, k, k + 1);
    }
    e[iu - 1] = f;
}

/// Diagonalize the real bidiagonal `(d, e)`, accumulating into `U` and `V`.
fn diagonalize(
    d: &mut [f64],
    e: &mut [f64],
    u: &mut ZMatrix,
    v: &mut ZMatrix,
    max_iter: usize,
) -> Result<(), LinalgError> {
    let m = d.len();
    let bnorm = d
        .iter()
        .zip(e.iter())
        .map(|(a, b)| a.abs() + b.abs())
        .fold(0.0_f64, f64::max);
    let negligible = |x: f64, y: f64| SVD_TOL * (x.abs() + y.abs());

    let mut iu = m - 1;
    let mut iter = 0usize;
    loop {
        while iu > 0 && e[iu - 1].abs() <= negligible(d[iu], d[iu - 1]) {
            e[iu - 1] = 0.0;
            iu -= 1;
            iter = 0;
            log::trace!("SVD deflated singular value {}", iu + 1);
        }

        iter += 1;
        if iter > max_iter {
            log::debug!("SVD block ending at {} not deflated after {} iterations", iu, max_iter);
            return Err(LinalgError::ConvergenceFailure { max_iter });
        }
        if iu == 0 {
            break;
        }

        let mut il = iu - 1;
        while il > 0 && e[il - 1].abs() > negligible(d[il], d[il - 1]) {
            il -= 1;
        }
        if il > 0 {
            e[il - 1] = 0.0;
        }

        if let Some(idx) = (il..iu).find(|&i| d[i].abs() <= SVD_TOL * bnorm) {
            chase_zero_diagonal(d, e, u, idx, iu);
            continue;
        }

        qr_sweep(d, e, u, v, il, iu);
    }
    Ok(())
}

/// Make `d` non-negative and sort it in decreasing order, permuting the
/// columns of `U` and `V` alongside.
fn sort_singular_values(d: &mut [f64], u: &mut ZMatrix, v: &mut ZMatrix) {
    let m = d.len();
    for (k, dk) in d.iter_mut().enumerate() {
        if *dk < 0.0 {
            *dk = -*dk;
            scale_col(v, k, -Z::new(1.0, 0.0));
        }
    }
    for i in 0..m {
        let mut max_idx = i;
        for j in (i + 1)..m {
            if d[j] > d[max_idx] {
                max_idx = j;
            }
        }
        if max_idx != i {
            d.swap(i, max_idx);
            u.swap_cols(i, max_idx);
            v.swap_cols(i, max_idx);
        }
    }
}

// ── Decomposition ───────────────────────────────────────────────────

/// Singular value decomposition `Uᴴ A V = [S 0; 0 0]`.
///
/// `U` is `nr x nr` and `V` is `nc x nc`, both unitary. `S` holds the
/// `min(nr, nc)` singular values, non-negative and non-increasing.
///
/// # Example
///
/// ```
/// use zdense::{ZMatrix, Z};
///
/// let a = ZMatrix::from_rows(2, 2, &[
///     Z::new(0.0, 3.0), Z::new(0.0, 0.0),
///     Z::new(0.0, 0.0), Z::new(-4.0, 0.0),
/// ]);
/// let svd = a.svd().unwrap();
/// assert!((svd.s().get0(0).re - 4.0).abs() < 1e-12);
/// assert!((svd.s().get0(1).re - 3.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct ZSvd {
    u: ZMatrix,
    v: ZMatrix,
    s: DiagMatrix,
}

impl ZSvd {
    /// Decompose with the default iteration cap [`MAXITER`].
    pub fn new(a: &ZMatrix) -> Result<Self, LinalgError> {
        Self::with_max_iter(a, MAXITER)
    }

    /// Decompose, allowing at most `max_iter` iterations per deflation.
    ///
    /// Fails with `ConvergenceFailure` once the counter passes the cap;
    /// a cap of zero therefore always fails.
    pub fn with_max_iter(a: &ZMatrix, max_iter: usize) -> Result<Self, LinalgError> {
        let nr = a.nrows();
        let nc = a.ncols();
        let m = nr.min(nc);

        let mut u = a.eye_like(nr);
        let mut v = a.eye_like(nc);
        if m == 0 {
            return Ok(Self {
                u,
                v,
                s: DiagMatrix::zeros(0).with_base(a.base()),
            });
        }

        let mut x = a.clone();
        let (mut dz, mut ez) = bidiagonalize(&mut x, &mut u, &mut v);
        let (mut d, mut e) = normalize_phases(&mut dz, &mut ez, &mut u, &mut v);
        if nc > nr {
            fold_trailing_column(&mut d, &mut e, &mut v);
        }

        diagonalize(&mut d, &mut e, &mut u, &mut v, max_iter)?;
        sort_singular_values(&mut d, &mut u, &mut v);

        Ok(Self {
            u,
            v,
            s: DiagMatrix::from_real(&d).with_base(a.base()),
        })
    }

    /// Left singular vectors (`nr x nr`).
    #[inline]
    pub fn u(&self) -> &ZMatrix {
        &self.u
    }

    /// Right singular vectors (`nc x nc`).
    #[inline]
    pub fn v(&self) -> &ZMatrix {
        &self.v
    }

    /// Singular values on the diagonal, real parts only.
    #[inline]
    pub fn s(&self) -> &DiagMatrix {
        &self.s
    }

    /// Number of singular values above `tol`.
    pub fn rank(&self, tol: f64) -> usize {
        self.s.as_slice().iter().filter(|z| z.re > tol).count()
    }

    /// Ratio of the largest to the smallest singular value.
    ///
    /// Infinite when the smallest singular value is zero.
    pub fn condition_number(&self) -> f64 {
        let s = self.s.as_slice();
        let (Some(first), Some(last)) = (s.first(), s.last()) else {
            return 1.0;
        };
        if last.re == 0.0 {
            f64::INFINITY
        } else {
            first.re / last.re
        }
    }
}

impl ZMatrix {
    /// Singular value decomposition with the default iteration cap.
    pub fn svd(&self) -> Result<ZSvd, LinalgError> {
        ZSvd::new(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BaseIndex;

    const TOL: f64 = 1e-10;

    fn assert_near(a: Z, b: Z, tol: f64, msg: &str) {
        assert!((a - b).norm() < tol, "{}: {} vs {} (diff {})", msg, a, b, (a - b).norm());
    }

    fn assert_unitary(q: &ZMatrix, name: &str) {
        let n = q.nrows();
        let p = &q.h() * q;
        for i in 0..n {
            for j in 0..n {
                let e = if i == j { 1.0 } else { 0.0 };
                assert_near(p[(i, j)], Z::new(e, 0.0), TOL, &format!("{}ᴴ{}[({},{})]", name, name, i, j));
            }
        }
    }

    /// Unitarity, ordering and `Uᴴ A V = [S 0; 0 0]`.
    fn check_svd(a: &ZMatrix) -> ZSvd {
        let svd = a.svd().unwrap();
        let (nr, nc) = (a.nrows(), a.ncols());
        assert_eq!(svd.u().nrows(), nr);
        assert_eq!(svd.v().nrows(), nc);
        assert_eq!(svd.s().order(), nr.min(nc));
        assert_unitary(svd.u(), "U");
        assert_unitary(svd.v(), "V");

        let s = svd.s().as_slice();
        for k in 0..s.len() {
            assert_eq!(s[k].im, 0.0);
            assert!(s[k].re >= 0.0, "s[{}] = {}", k, s[k]);
            if k > 0 {
                assert!(s[k - 1].re >= s[k].re, "not sorted at {}", k);
            }
        }

        let scale = 1.0 + a.norm_fro();
        let b = &(&svd.u().h() * a) * svd.v();
        for i in 0..nr {
            for j in 0..nc {
                let expected = if i == j { s[i] } else { Z::zero() };
                assert_near(b[(i, j)], expected, TOL * scale, &format!("UᴴAV[({},{})]", i, j));
            }
        }
        svd
    }

    fn sample(nr: usize, nc: usize) -> ZMatrix {
        ZMatrix::from_fn(nr, nc, |i, j| {
            let t = (i * 7 + j * 3) as f64;
            Z::new((t * 0.37).sin() * 2.0, (t * 0.91).cos() - 0.25 * j as f64)
        })
    }

    #[test]
    fn identity() {
        let svd = check_svd(&ZMatrix::eye(3));
        for k in 0..3 {
            assert_near(svd.s().get0(k), Z::new(1.0, 0.0), TOL, "s");
        }
    }

    #[test]
    fn known_2x2() {
        // AᴴA has eigenvalues 45 and 5
        let a = ZMatrix::from_rows(2, 2, &[
            Z::new(3.0, 0.0), Z::new(0.0, 0.0),
            Z::new(4.0, 0.0), Z::new(5.0, 0.0),
        ]);
        let svd = check_svd(&a);
        assert!((svd.s().get0(0).re - 45.0_f64.sqrt()).abs() < TOL);
        assert!((svd.s().get0(1).re - 5.0_f64.sqrt()).abs() < TOL);
    }

    #[test]
    fn complex_square() {
        check_svd(&sample(4, 4));
    }

    #[test]
    fn complex_tall() {
        check_svd(&sample(6, 3));
        check_svd(&sample(4, 1));
    }

    #[test]
    fn complex_wide() {
        check_svd(&sample(3, 5));
        check_svd(&sample(1, 4));
    }

    #[test]
    fn nilpotent_converges() {
        let a = ZMatrix::from_rows(2, 2, &[
            Z::new(0.0, 0.0), Z::new(1.0, 0.0),
            Z::new(0.0, 0.0), Z::new(0.0, 0.0),
        ]);
        let svd = check_svd(&a);
        assert_near(svd.s().get0(0), Z::new(1.0, 0.0), TOL, "s0");
        assert_near(svd.s().get0(1), Z::zero(), TOL, "s1");
    }

    #[test]
    fn zero_diagonal_inside_block() {
        let a = ZMatrix::from_rows(3, 3, &[
            Z::new(1.0, 0.0), Z::new(2.0, 0.0), Z::new(0.0, 0.0),
            Z::new(0.0, 0.0), Z::new(0.0, 0.0), Z::new(0.0, 3.0),
            Z::new(0.0, 0.0), Z::new(0.0, 0.0), Z::new(4.0, 0.0),
        ]);
        check_svd(&a);
    }

    #[test]
    fn zero_matrix() {
        let svd = check_svd(&ZMatrix::zeros(3, 2));
        assert_eq!(svd.rank(0.0), 0);
        assert_eq!(svd.condition_number(), f64::INFINITY);
    }

    #[test]
    fn rank_deficient() {
        let x = ZMatrix::column(&[Z::new(1.0, 1.0), Z::new(0.0, 2.0), Z::new(-1.0, 0.5)]);
        let y = ZMatrix::column(&[Z::new(2.0, 0.0), Z::new(1.0, -1.0), Z::new(0.0, 3.0), Z::new(1.0, 0.0)]);
        let a = &x * &y.h();
        let svd = check_svd(&a);
        assert_eq!(svd.rank(1e-10), 1);
        let expected = x.norm_fro() * y.norm_fro();
        assert!((svd.s().get0(0).re - expected).abs() < 1e-10);
    }

    #[test]
    fn rank_and_condition() {
        let a = ZMatrix::from(&DiagMatrix::from_slice(&[
            Z::new(0.0, 2.0),
            Z::new(0.5, 0.0),
            Z::new(-4.0, 0.0),
        ]));
        let svd = check_svd(&a);
        assert_eq!(svd.rank(1e-10), 3);
        assert_eq!(svd.rank(1.0), 2);
        assert!((svd.condition_number() - 8.0).abs() < TOL);
    }

    #[test]
    fn iteration_cap() {
        // Dense and well conditioned: one sweep cannot deflate the 4x4 block
        let a = &sample(4, 4) + &ZMatrix::eye(4).scale(3.0);
        assert_eq!(
            ZSvd::with_max_iter(&a, 1).unwrap_err(),
            LinalgError::ConvergenceFailure { max_iter: 1 }
        );
        check_svd(&a);

        // Zero cap fails before the first pass, even for a 1x1
        assert_eq!(
            ZSvd::with_max_iter(&ZMatrix::eye(1), 0).unwrap_err(),
            LinalgError::ConvergenceFailure { max_iter: 0 }
        );
    }

    #[test]
    fn diagonal_input_deflates_without_sweeps() {
        let d = DiagMatrix::from_slice(&[Z::new(0.0, 3.0), Z::new(-2.0, 0.0), Z::new(1.0, 1.0)]);
        let a = ZMatrix::from(&d);
        let svd = ZSvd::with_max_iter(&a, 1).unwrap();
        let expected = [3.0, 2.0, 2.0_f64.sqrt()];
        for (k, &s) in expected.iter().enumerate() {
            assert_near(svd.s().get0(k), Z::new(s, 0.0), TOL, "s");
        }
    }

    #[test]
    fn empty_matrix() {
        let svd = ZMatrix::zeros(0, 3).svd().unwrap();
        assert_eq!(svd.s().order(), 0);
        assert_eq!(svd.v().nrows(), 3);
        assert_eq!(svd.condition_number(), 1.0);
    }

    #[test]
    fn keeps_base_index() {
        let a = sample(2, 2).with_base(BaseIndex::Zero);
        let svd = a.svd().unwrap();
        assert_eq!(svd.u().base(), BaseIndex::Zero);
        assert_eq!(svd.s().base(), BaseIndex::Zero);
    }

    #[test]
    fn smaller_singular_value_cases() {
        // [3 0; 0 4] and [1 1; 0 1] (golden ratio pair)
        assert!((smaller_singular_value(3.0, 0.0, 4.0) - 3.0).abs() < 1e-15);
        let phi = (1.0 + 5.0_f64.sqrt()) / 2.0;
        assert!((smaller_singular_value(1.0, 1.0, 1.0) - 1.0 / phi).abs() < 1e-15);
        // [1 1000; 0 2]: product of singular values is |det| = 2
        let small = smaller_singular_value(1.0, 1e3, 2.0);
        let big = (1e6 + 5.0 - small * small).sqrt();
        assert!((small * big - 2.0).abs() < 1e-9);
        assert_eq!(smaller_singular_value(0.0, 5.0, 2.0), 0.0);
    }
}
