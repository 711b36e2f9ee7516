mod block;
mod cache;
mod diagonal;
mod format;
mod norm;
mod ops;
mod psd;
mod triangular;

pub use diagonal::DiagMatrix;
pub use format::{e_format, z_format, FormatOptions, Formatted};
pub use norm::{norm_fro, norm_inf, norm_one};
pub use psd::PsdMatrix;
pub use triangular::{Triangle, TriangularMatrix};

pub(crate) use cache::DecompCache;

use core::ops::{Index, IndexMut};

use num_traits::{One, Zero};

use crate::linalg::LinalgError;
use crate::traits::{MatrixMut, MatrixRef, Z};

/// Offset between user-facing indices and storage indices.
///
/// `One` (the default) makes `get(1, 1)` the top-left entry; `Zero` makes
/// `get` agree with `get0` and with `Index<(usize, usize)>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BaseIndex {
    Zero,
    #[default]
    One,
}

impl BaseIndex {
    /// Numeric offset subtracted from user indices.
    #[inline]
    pub const fn offset(self) -> usize {
        match self {
            BaseIndex::Zero => 0,
            BaseIndex::One => 1,
        }
    }
}

/// Factory fixing the base index of every matrix it creates.
///
/// The base index is chosen once, when the context is built, and each
/// matrix keeps the base it was created with. Matrices produced by
/// operations inherit the base of their first operand.
///
/// ```
/// use zdense::{BaseIndex, MatrixContext, Z};
///
/// let ctx = MatrixContext::new(BaseIndex::Zero);
/// let mut a = ctx.zeros(2, 2);
/// a.put(0, 1, Z::new(5.0, 0.0));
/// assert_eq!(a.get0(0, 1), Z::new(5.0, 0.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MatrixContext {
    base: BaseIndex,
}

impl MatrixContext {
    pub const fn new(base: BaseIndex) -> Self {
        Self { base }
    }

    #[inline]
    pub fn base(&self) -> BaseIndex {
        self.base
    }

    /// Zero-filled `nrows x ncols` matrix.
    pub fn zeros(&self, nrows: usize, ncols: usize) -> ZMatrix {
        ZMatrix::zeros(nrows, ncols).with_base(self.base)
    }

    /// `n x n` identity.
    pub fn eye(&self, n: usize) -> ZMatrix {
        ZMatrix::eye(n).with_base(self.base)
    }

    /// Matrix from separate real and imaginary 2-D arrays.
    pub fn from_parts(&self, re: &[Vec<f64>], im: &[Vec<f64>]) -> Result<ZMatrix, LinalgError> {
        Ok(ZMatrix::from_parts(re, im)?.with_base(self.base))
    }

    /// Matrix from a real 2-D array.
    pub fn from_real(&self, re: &[Vec<f64>]) -> Result<ZMatrix, LinalgError> {
        Ok(ZMatrix::from_real(re)?.with_base(self.base))
    }

    /// Matrix from rows of complex entries.
    pub fn from_complex_rows(&self, rows: &[Vec<Z>]) -> Result<ZMatrix, LinalgError> {
        Ok(ZMatrix::from_complex_rows(rows)?.with_base(self.base))
    }

    /// Single-column matrix holding `v`.
    pub fn column(&self, v: &[Z]) -> ZMatrix {
        ZMatrix::column(v).with_base(self.base)
    }

    /// Zero diagonal matrix of order `n`.
    pub fn diag(&self, n: usize) -> DiagMatrix {
        DiagMatrix::zeros(n).with_base(self.base)
    }

    /// Diagonal matrix holding `d`.
    pub fn diag_from_slice(&self, d: &[Z]) -> DiagMatrix {
        DiagMatrix::from_slice(d).with_base(self.base)
    }
}

/// Dense complex matrix.
///
/// Column-major `Vec<Z>` storage with runtime dimensions. Besides the
/// values, a matrix carries its [`BaseIndex`] and a cache holding at most
/// one LU factorization, one Householder reduction and one Cholesky factor
/// of its current contents. Every write marks the matrix dirty; the next
/// cache access drops the stale factors.
///
/// # Examples
///
/// ```
/// use zdense::{ZMatrix, Z};
///
/// let mut a = ZMatrix::from_rows(2, 2, &[
///     Z::new(1.0, 0.0), Z::new(2.0, 1.0),
///     Z::new(0.0, -1.0), Z::new(4.0, 0.0),
/// ]);
/// assert_eq!(a.get(1, 2), Z::new(2.0, 1.0)); // one-based by default
/// assert_eq!(a[(1, 0)], Z::new(0.0, -1.0));  // zero-based indexing
///
/// a.put(2, 2, Z::new(0.0, 0.0));
/// assert!(a.is_dirty());
/// ```
#[derive(Debug)]
pub struct ZMatrix {
    data: Vec<Z>,
    nrows: usize,
    ncols: usize,
    base: BaseIndex,
    cache: DecompCache,
}

// ── Constructors ────────────────────────────────────────────────────

impl ZMatrix {
    /// Zero-filled `nrows x ncols` matrix.
    ///
    /// ```
    /// use zdense::ZMatrix;
    /// let m = ZMatrix::zeros(2, 3);
    /// assert_eq!(m.nrows(), 2);
    /// assert_eq!(m.ncols(), 3);
    /// ```
    pub fn zeros(nrows: usize, ncols: usize) -> Self {
        Self::from_vec(nrows, ncols, vec![Z::zero(); nrows * ncols])
    }

    /// `n x n` identity.
    pub fn eye(n: usize) -> Self {
        let mut m = Self::zeros(n, n);
        for i in 0..n {
            m.data[i * n + i] = Z::one();
        }
        m
    }

    /// Create a matrix by calling `f(row, col)` for each element.
    pub fn from_fn(nrows: usize, ncols: usize, f: impl Fn(usize, usize) -> Z) -> Self {
        let mut data = Vec::with_capacity(nrows * ncols);
        for j in 0..ncols {
            for i in 0..nrows {
                data.push(f(i, j));
            }
        }
        Self::from_vec(nrows, ncols, data)
    }

    /// Create a matrix from a flat slice in row-major order.
    ///
    /// Panics if `row_major.len() != nrows * ncols`.
    pub fn from_rows(nrows: usize, ncols: usize, row_major: &[Z]) -> Self {
        assert_eq!(
            row_major.len(),
            nrows * ncols,
            "slice length {} does not match {}x{} matrix",
            row_major.len(),
            nrows,
            ncols,
        );
        Self::from_fn(nrows, ncols, |i, j| row_major[i * ncols + j])
    }

    /// Create a matrix from an owned column-major `Vec<Z>`.
    ///
    /// Panics if `data.len() != nrows * ncols`.
    pub fn from_vec(nrows: usize, ncols: usize, data: Vec<Z>) -> Self {
        assert_eq!(
            data.len(),
            nrows * ncols,
            "vec length {} does not match {}x{} matrix",
            data.len(),
            nrows,
            ncols,
        );
        Self {
            data,
            nrows,
            ncols,
            base: BaseIndex::default(),
            cache: DecompCache::default(),
        }
    }

    /// Matrix from separate real and imaginary 2-D arrays.
    ///
    /// Both arrays must be rectangular and of identical shape.
    ///
    /// ```
    /// use zdense::ZMatrix;
    /// use zdense::linalg::LinalgError;
    ///
    /// let re = vec![vec![1.0, 2.0], vec![3.0, 4.0]];
    /// let im = vec![vec![0.0, 1.0], vec![0.0, -1.0]];
    /// let a = ZMatrix::from_parts(&re, &im).unwrap();
    /// assert_eq!(a[(0, 1)].im, 1.0);
    ///
    /// let short = vec![vec![0.0, 1.0]];
    /// assert!(matches!(
    ///     ZMatrix::from_parts(&re, &short),
    ///     Err(LinalgError::Nonconformity { .. })
    /// ));
    /// ```
    pub fn from_parts(re: &[Vec<f64>], im: &[Vec<f64>]) -> Result<Self, LinalgError> {
        let (nr, nc) = rect_shape(re)?;
        let (ni, nci) = rect_shape(im)?;
        if (ni, nci) != (nr, nc) {
            return Err(LinalgError::nonconformity((nr, nc), (ni, nci)));
        }
        Ok(Self::from_fn(nr, nc, |i, j| Z::new(re[i][j], im[i][j])))
    }

    /// Matrix from a real 2-D array (imaginary parts zero).
    pub fn from_real(re: &[Vec<f64>]) -> Result<Self, LinalgError> {
        let (nr, nc) = rect_shape(re)?;
        Ok(Self::from_fn(nr, nc, |i, j| Z::new(re[i][j], 0.0)))
    }

    /// Matrix from rows of complex entries.
    pub fn from_complex_rows(rows: &[Vec<Z>]) -> Result<Self, LinalgError> {
        let (nr, nc) = rect_shape(rows)?;
        Ok(Self::from_fn(nr, nc, |i, j| rows[i][j]))
    }

    /// Single-column matrix holding `v`.
    pub fn column(v: &[Z]) -> Self {
        Self::from_vec(v.len(), 1, v.to_vec())
    }

    /// Same values, different base index. Only used while constructing.
    pub(crate) fn with_base(mut self, base: BaseIndex) -> Self {
        self.base = base;
        self
    }

    /// Zero matrix of the given shape sharing this matrix's base index.
    pub(crate) fn zeros_like(&self, nrows: usize, ncols: usize) -> Self {
        Self::zeros(nrows, ncols).with_base(self.base)
    }

    /// Identity sharing this matrix's base index.
    pub(crate) fn eye_like(&self, n: usize) -> Self {
        Self::eye(n).with_base(self.base)
    }
}

/// Shape of a rectangular 2-D array; ragged rows are a nonconformity.
fn rect_shape<T>(rows: &[Vec<T>]) -> Result<(usize, usize), LinalgError> {
    let nr = rows.len();
    let nc = rows.first().map_or(0, Vec::len);
    for row in rows {
        if row.len() != nc {
            return Err(LinalgError::nonconformity((nr, nc), (nr, row.len())));
        }
    }
    Ok((nr, nc))
}

impl Clone for ZMatrix {
    /// Copies the values and base index. The copy starts with an empty cache.
    fn clone(&self) -> Self {
        Self {
            data: self.data.clone(),
            nrows: self.nrows,
            ncols: self.ncols,
            base: self.base,
            cache: DecompCache::default(),
        }
    }
}

impl PartialEq for ZMatrix {
    /// Shape and entries; the base index and cache do not take part.
    fn eq(&self, other: &Self) -> bool {
        self.nrows == other.nrows && self.ncols == other.ncols && self.data == other.data
    }
}

// ── Accessors ───────────────────────────────────────────────────────

impl ZMatrix {
    #[inline]
    pub fn nrows(&self) -> usize {
        self.nrows
    }

    #[inline]
    pub fn ncols(&self) -> usize {
        self.ncols
    }

    #[inline]
    pub fn is_square(&self) -> bool {
        self.nrows == self.ncols
    }

    #[inline]
    pub fn base(&self) -> BaseIndex {
        self.base
    }

    /// Entry at user indices `(ii, jj)` relative to the base index.
    #[inline]
    pub fn get(&self, ii: usize, jj: usize) -> Z {
        let b = self.base.offset();
        self.get0(ii - b, jj - b)
    }

    /// Write the entry at user indices `(ii, jj)`.
    #[inline]
    pub fn put(&mut self, ii: usize, jj: usize, value: Z) {
        let b = self.base.offset();
        self.put0(ii - b, jj - b, value);
    }

    /// Entry at zero-based `(i, j)`.
    #[inline]
    pub fn get0(&self, i: usize, j: usize) -> Z {
        self[(i, j)]
    }

    /// Write the entry at zero-based `(i, j)`.
    #[inline]
    pub fn put0(&mut self, i: usize, j: usize, value: Z) {
        self[(i, j)] = value;
    }

    /// Column-major view of the entries.
    #[inline]
    pub fn as_slice(&self) -> &[Z] {
        &self.data
    }

    /// Separate real and imaginary 2-D arrays, row by row.
    pub fn to_parts(&self) -> (Vec<Vec<f64>>, Vec<Vec<f64>>) {
        let re = (0..self.nrows)
            .map(|i| (0..self.ncols).map(|j| self[(i, j)].re).collect())
            .collect();
        let im = (0..self.nrows)
            .map(|i| (0..self.ncols).map(|j| self[(i, j)].im).collect())
            .collect();
        (re, im)
    }

    /// Column `j` (zero-based) as a vector.
    pub fn col_vec(&self, j: usize) -> Vec<Z> {
        self.data[j * self.nrows..(j + 1) * self.nrows].to_vec()
    }

    /// Mark the contents as changed so cached decompositions are dropped.
    #[inline]
    fn touch(&mut self) {
        self.cache.mark_dirty();
    }
}

// ── MatrixRef / MatrixMut ───────────────────────────────────────────

impl MatrixRef for ZMatrix {
    #[inline]
    fn nrows(&self) -> usize {
        self.nrows
    }

    #[inline]
    fn ncols(&self) -> usize {
        self.ncols
    }

    #[inline]
    fn at(&self, row: usize, col: usize) -> Z {
        self.data[col * self.nrows + row]
    }
}

impl MatrixMut for ZMatrix {
    #[inline]
    fn at_mut(&mut self, row: usize, col: usize) -> &mut Z {
        self.touch();
        &mut self.data[col * self.nrows + row]
    }
}

// ── Index ───────────────────────────────────────────────────────────

impl Index<(usize, usize)> for ZMatrix {
    type Output = Z;

    #[inline]
    fn index(&self, (row, col): (usize, usize)) -> &Z {
        assert!(
            row < self.nrows && col < self.ncols,
            "index ({}, {}) out of bounds for {}x{} matrix",
            row,
            col,
            self.nrows,
            self.ncols,
        );
        &self.data[col * self.nrows + row]
    }
}

impl IndexMut<(usize, usize)> for ZMatrix {
    #[inline]
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut Z {
        assert!(
            row < self.nrows && col < self.ncols,
            "index ({}, {}) out of bounds for {}x{} matrix",
            row,
            col,
            self.nrows,
            self.ncols,
        );
        self.touch();
        &mut self.data[col * self.nrows + row]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn z(re: f64, im: f64) -> Z {
        Z::new(re, im)
    }

    #[test]
    fn zeros() {
        let m = ZMatrix::zeros(3, 4);
        assert_eq!(m.nrows(), 3);
        assert_eq!(m.ncols(), 4);
        for i in 0..3 {
            for j in 0..4 {
                assert_eq!(m[(i, j)], z(0.0, 0.0));
            }
        }
    }

    #[test]
    fn eye() {
        let m = ZMatrix::eye(3);
        for i in 0..3 {
            for j in 0..3 {
                let expected = if i == j { z(1.0, 0.0) } else { z(0.0, 0.0) };
                assert_eq!(m[(i, j)], expected);
            }
        }
    }

    #[test]
    fn from_rows() {
        let m = ZMatrix::from_rows(2, 3, &[
            z(1.0, 0.0), z(2.0, 0.0), z(3.0, 0.0),
            z(4.0, 0.0), z(5.0, 0.0), z(6.0, 1.0),
        ]);
        assert_eq!(m[(0, 2)], z(3.0, 0.0));
        assert_eq!(m[(1, 0)], z(4.0, 0.0));
        assert_eq!(m[(1, 2)], z(6.0, 1.0));
    }

    #[test]
    #[should_panic(expected = "slice length")]
    fn from_rows_wrong_length() {
        let _ = ZMatrix::from_rows(2, 2, &[z(1.0, 0.0); 3]);
    }

    #[test]
    fn from_parts_roundtrip() {
        let re = vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]];
        let im = vec![vec![-1.0, 0.0, 1.0], vec![0.5, 0.0, -0.5]];
        let m = ZMatrix::from_parts(&re, &im).unwrap();
        assert_eq!(m.nrows(), 2);
        assert_eq!(m.ncols(), 3);
        assert_eq!(m[(1, 0)], z(4.0, 0.5));
        let (re2, im2) = m.to_parts();
        assert_eq!(re2, re);
        assert_eq!(im2, im);
    }

    #[test]
    fn from_parts_mismatch() {
        let re = vec![vec![1.0, 2.0], vec![3.0, 4.0]];
        let im = vec![vec![1.0, 2.0, 3.0], vec![3.0, 4.0, 5.0]];
        let err = ZMatrix::from_parts(&re, &im).unwrap_err();
        assert_eq!(err, LinalgError::nonconformity((2, 2), (2, 3)));
    }

    #[test]
    fn from_real_ragged() {
        let re = vec![vec![1.0, 2.0], vec![3.0]];
        assert!(matches!(
            ZMatrix::from_real(&re),
            Err(LinalgError::Nonconformity { .. })
        ));
    }

    #[test]
    fn column_vector() {
        let c = ZMatrix::column(&[z(1.0, 1.0), z(2.0, 2.0)]);
        assert_eq!(c.nrows(), 2);
        assert_eq!(c.ncols(), 1);
        assert_eq!(c[(1, 0)], z(2.0, 2.0));
    }

    #[test]
    fn one_based_addressing() {
        let mut m = ZMatrix::zeros(2, 2);
        m.put(2, 1, z(7.0, -1.0));
        assert_eq!(m.get0(1, 0), z(7.0, -1.0));
        assert_eq!(m.get(2, 1), z(7.0, -1.0));
    }

    #[test]
    fn zero_based_context() {
        let ctx = MatrixContext::new(BaseIndex::Zero);
        let mut m = ctx.zeros(2, 2);
        m.put(1, 0, z(3.0, 0.0));
        assert_eq!(m[(1, 0)], z(3.0, 0.0));
        assert_eq!(m.base(), BaseIndex::Zero);
        assert_eq!(ctx.eye(3).base(), BaseIndex::Zero);
    }

    #[test]
    fn clone_drops_cache() {
        let mut a = ZMatrix::eye(2);
        let _ = a.cached_lu();
        let mut b = a.clone();
        assert_eq!(a, b);
        assert!(b.take_cached_lu().is_none());
        assert!(a.take_cached_lu().is_some());
    }

    #[test]
    fn writes_mark_dirty() {
        let mut m = ZMatrix::zeros(2, 2);
        assert!(!m.is_dirty());
        m[(0, 0)] = z(1.0, 0.0);
        assert!(m.is_dirty());
        m.clean();
        assert!(!m.is_dirty());
        m.set(1, 1, z(2.0, 0.0));
        assert!(m.is_dirty());
    }
}
