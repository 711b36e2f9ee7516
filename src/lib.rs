//! # zdense
//!
//! Dense complex matrix algebra with LU, Householder QR, SVD and Cholesky
//! decompositions. Every entry is a `Complex<f64>`; real matrices are just
//! complex matrices with zero imaginary parts.
//!
//! ## Quick start
//!
//! ```
//! use zdense::{ZMatrix, Z};
//!
//! // Solve A x = b through the cached LU factorization
//! let mut a = ZMatrix::from_rows(3, 3, &[
//!     Z::new(2.0, 0.0), Z::new(1.0, 0.0), Z::new(-1.0, 0.0),
//!     Z::new(-3.0, 0.0), Z::new(-1.0, 0.0), Z::new(2.0, 0.0),
//!     Z::new(-2.0, 0.0), Z::new(1.0, 0.0), Z::new(2.0, 0.0),
//! ]);
//! let b = ZMatrix::column(&[Z::new(8.0, 0.0), Z::new(-11.0, 0.0), Z::new(-3.0, 0.0)]);
//! let x = a.solve(&b).unwrap(); // x = [2, 3, -1]
//! assert!((x[(1, 0)] - Z::new(3.0, 0.0)).norm() < 1e-12);
//!
//! let svd = a.svd().unwrap();
//! assert!(svd.s().get0(0).re >= svd.s().get0(2).re);
//! ```
//!
//! ## Modules
//!
//! - [`zmatrix`]: `ZMatrix`, a heap-allocated column-major complex matrix
//!   carrying its base index (0 or 1 for the `get` / `put` accessors) and a
//!   cache of its own decompositions that any write invalidates. Tagged
//!   variants [`TriangularMatrix`], [`DiagMatrix`] and [`PsdMatrix`], block
//!   access, arithmetic, norms and paged text output.
//!
//! - [`linalg`]: Householder reflectors and plane rotations, LU with
//!   partial pivoting ([`linalg::ZLu`]), Householder QR ([`linalg::ZHqr`],
//!   [`linalg::ZQr`]), SVD ([`linalg::ZSvd`]), Cholesky, triangular and
//!   general solves, inverse, trace and block merging. Free functions work
//!   in place on `&mut impl MatrixMut`; wrapper structs hold the factors.
//!
//! - [`traits`]: the scalar type [`Z`], [`ComplexExt`] and the
//!   [`MatrixRef`] / [`MatrixMut`] access traits.
//!
//! ## Errors and logging
//!
//! Fallible operations return [`linalg::LinalgError`]. Index and operator
//! shape violations are programming errors and panic. The SVD iteration and
//! the decomposition cache report through the `log` facade at `trace` and
//! `debug` level; no logger is installed by the crate.

pub mod linalg;
pub mod traits;
pub mod zmatrix;

pub use linalg::LinalgError;
pub use traits::{ComplexExt, MatrixMut, MatrixRef, Z};
pub use zmatrix::{
    BaseIndex, DiagMatrix, FormatOptions, MatrixContext, PsdMatrix, Triangle, TriangularMatrix,
    ZMatrix,
};

pub use num_complex::Complex;
