pub(crate) mod cholesky;
pub(crate) mod householder;
pub(crate) mod inverse;
pub(crate) mod lu;
pub(crate) mod merge;
pub(crate) mod qr;
pub(crate) mod rotation;
pub(crate) mod solve;
pub(crate) mod svd;

pub use cholesky::{cholesky_in_place, ZCholesky};
pub use householder::{reflect_left, reflect_right, Reflector};
pub use lu::{lu_in_place, pivot_rows, pivot_rows_inv, ZLu};
pub use merge::{
    merge, merge_12, merge_13, merge_21, merge_22, merge_23, merge_31, merge_32, merge_33,
};
pub use qr::{householder_qr_in_place, ZHqr, ZQr};
pub use rotation::Rotation;
pub use svd::ZSvd;

/// Relative tolerance below which a superdiagonal entry of the bidiagonal
/// form is treated as zero during the SVD iteration.
pub const SVD_TOL: f64 = 1.0e-16;

/// Default cap on SVD QR iterations between two deflations.
pub const MAXITER: usize = 30;

/// Errors from matrix construction and linear algebra operations.
///
/// Every fallible operation in the crate returns this type; failed
/// constructors never hand back a partially built value.
///
/// ```
/// use zdense::{ZMatrix, Z};
/// use zdense::linalg::LinalgError;
///
/// let a = ZMatrix::zeros(2, 3);
/// assert_eq!(a.trace().unwrap_err(), LinalgError::Rectangular { rows: 2, cols: 3 });
///
/// let err = LinalgError::ZeroDiagonal { index: 1 };
/// assert_eq!(err.to_string(), "zero diagonal element at index 1");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum LinalgError {
    /// Operand shapes do not conform.
    #[error("nonconforming dimensions: expected {expected_rows}x{expected_cols}, got {rows}x{cols}")]
    Nonconformity {
        expected_rows: usize,
        expected_cols: usize,
        rows: usize,
        cols: usize,
    },
    /// A square matrix was required.
    #[error("matrix is not square ({rows}x{cols})")]
    Rectangular { rows: usize, cols: usize },
    /// A diagonal entry is exactly zero.
    #[error("matrix is singular")]
    Singular,
    /// Triangular substitution met an exact-zero pivot.
    #[error("zero diagonal element at index {index}")]
    ZeroDiagonal { index: usize },
    /// Cholesky met a non-positive pivot.
    #[error("matrix is not positive definite")]
    NotPositiveDefinite,
    /// The SVD iteration ran past its cap without deflating.
    #[error("SVD iteration did not converge within {max_iter} iterations")]
    ConvergenceFailure { max_iter: usize },
    /// Complex division by exact zero.
    #[error("division by zero")]
    DivisionByZero,
    /// Non-zero write outside the stored triangle.
    #[error("entry ({row}, {col}) lies outside the triangle")]
    OutsideTriangle { row: usize, col: usize },
    /// Least squares needs at least as many rows as columns.
    #[error("least squares needs rows >= cols, got {rows}x{cols}")]
    NotOverdetermined { rows: usize, cols: usize },
}

impl LinalgError {
    /// `Nonconformity` from an expected and an actual `(rows, cols)` pair.
    pub fn nonconformity(expected: (usize, usize), actual: (usize, usize)) -> Self {
        LinalgError::Nonconformity {
            expected_rows: expected.0,
            expected_cols: expected.1,
            rows: actual.0,
            cols: actual.1,
        }
    }
}

/// `Rectangular` unless `rows == cols`.
#[inline]
pub(crate) fn require_square(rows: usize, cols: usize) -> Result<(), LinalgError> {
    if rows != cols {
        return Err(LinalgError::Rectangular { rows, cols });
    }
    Ok(())
}
