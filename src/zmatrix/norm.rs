use crate::traits::{ComplexExt, MatrixRef};

use super::ZMatrix;

// ── Generic norms ───────────────────────────────────────────────────

/// Frobenius norm, accumulated with a running scale so large entries do
/// not overflow the sum of squares.
pub fn norm_fro(a: &impl MatrixRef) -> f64 {
    let mut scale = 0.0_f64;
    let mut ssq = 1.0_f64;
    for j in 0..a.ncols() {
        for i in 0..a.nrows() {
            let z = a.at(i, j);
            for part in [z.re.abs(), z.im.abs()] {
                if part == 0.0 {
                    continue;
                }
                if scale < part {
                    ssq = 1.0 + ssq * (scale / part) * (scale / part);
                    scale = part;
                } else {
                    ssq += (part / scale) * (part / scale);
                }
            }
        }
    }
    scale * ssq.sqrt()
}

/// Maximum column sum of magnitudes.
pub fn norm_one(a: &impl MatrixRef) -> f64 {
    (0..a.ncols())
        .map(|j| (0..a.nrows()).map(|i| a.at(i, j).abs_scaled()).sum::<f64>())
        .fold(0.0, f64::max)
}

/// Maximum row sum of magnitudes.
pub fn norm_inf(a: &impl MatrixRef) -> f64 {
    (0..a.nrows())
        .map(|i| (0..a.ncols()).map(|j| a.at(i, j).abs_scaled()).sum::<f64>())
        .fold(0.0, f64::max)
}

impl ZMatrix {
    /// Frobenius norm.
    ///
    /// ```
    /// use zdense::{ZMatrix, Z};
    /// let a = ZMatrix::from_rows(1, 2, &[Z::new(3.0, 0.0), Z::new(0.0, 4.0)]);
    /// assert!((a.norm_fro() - 5.0).abs() < 1e-12);
    /// ```
    pub fn norm_fro(&self) -> f64 {
        norm_fro(self)
    }

    /// 1-norm (maximum absolute column sum).
    pub fn norm_one(&self) -> f64 {
        norm_one(self)
    }

    /// Infinity norm (maximum absolute row sum).
    pub fn norm_inf(&self) -> f64 {
        norm_inf(self)
    }
}
