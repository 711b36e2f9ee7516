use crate::linalg::LinalgError;

use super::ZMatrix;

// Base-indexed accessors use inclusive bounds, like `get`/`put`.

impl ZMatrix {
    /// Zero-based index range for inclusive user bounds `lo..=hi`.
    fn span(&self, lo: usize, hi: usize) -> core::ops::Range<usize> {
        let b = self.base.offset();
        assert!(
            lo >= b && hi + 1 >= lo,
            "invalid index range {}..={} for base {}",
            lo,
            hi,
            b,
        );
        (lo - b)..(hi + 1 - b)
    }

    /// Zero-based positions for a list of user indices.
    fn positions(&self, idx: &[usize]) -> Vec<usize> {
        let b = self.base.offset();
        idx.iter()
            .map(|&i| {
                assert!(i >= b, "index {} below base {}", i, b);
                i - b
            })
            .collect()
    }

    fn gather(&self, rows: &[usize], cols: &[usize]) -> ZMatrix {
        let mut out = self.zeros_like(rows.len(), cols.len());
        for (c, &j) in cols.iter().enumerate() {
            for (r, &i) in rows.iter().enumerate() {
                out.data[c * rows.len() + r] = self[(i, j)];
            }
        }
        out
    }

    fn scatter(&mut self, rows: &[usize], cols: &[usize], src: &ZMatrix) -> Result<(), LinalgError> {
        if src.nrows != rows.len() || src.ncols != cols.len() {
            return Err(LinalgError::nonconformity(
                (rows.len(), cols.len()),
                (src.nrows, src.ncols),
            ));
        }
        for (c, &j) in cols.iter().enumerate() {
            for (r, &i) in rows.iter().enumerate() {
                self[(i, j)] = src[(r, c)];
            }
        }
        Ok(())
    }

    /// Sub-matrix of rows `ii1..=ii2` and columns `jj1..=jj2`.
    ///
    /// ```
    /// use zdense::{ZMatrix, Z};
    /// let m = ZMatrix::from_fn(3, 3, |i, j| Z::new((i * 3 + j) as f64, 0.0));
    /// let b = m.get_block(2, 3, 2, 3);
    /// assert_eq!(b.get(1, 1), Z::new(4.0, 0.0));
    /// assert_eq!(b.get(2, 2), Z::new(8.0, 0.0));
    /// ```
    pub fn get_block(&self, ii1: usize, ii2: usize, jj1: usize, jj2: usize) -> ZMatrix {
        let rows: Vec<usize> = self.span(ii1, ii2).collect();
        let cols: Vec<usize> = self.span(jj1, jj2).collect();
        self.gather(&rows, &cols)
    }

    /// Listed rows, columns `jj1..=jj2`.
    pub fn get_rows(&self, rows: &[usize], jj1: usize, jj2: usize) -> ZMatrix {
        let rows = self.positions(rows);
        let cols: Vec<usize> = self.span(jj1, jj2).collect();
        self.gather(&rows, &cols)
    }

    /// Rows `ii1..=ii2`, listed columns.
    pub fn get_cols(&self, ii1: usize, ii2: usize, cols: &[usize]) -> ZMatrix {
        let rows: Vec<usize> = self.span(ii1, ii2).collect();
        let cols = self.positions(cols);
        self.gather(&rows, &cols)
    }

    /// Listed rows and listed columns.
    pub fn get_indexed(&self, rows: &[usize], cols: &[usize]) -> ZMatrix {
        let rows = self.positions(rows);
        let cols = self.positions(cols);
        self.gather(&rows, &cols)
    }

    /// Overwrite rows `ii1..=ii2`, columns `jj1..=jj2` with `src`.
    pub fn put_block(
        &mut self,
        ii1: usize,
        ii2: usize,
        jj1: usize,
        jj2: usize,
        src: &ZMatrix,
    ) -> Result<(), LinalgError> {
        let rows: Vec<usize> = self.span(ii1, ii2).collect();
        let cols: Vec<usize> = self.span(jj1, jj2).collect();
        self.scatter(&rows, &cols, src)
    }

    /// Overwrite the listed rows, columns `jj1..=jj2`, with `src`.
    pub fn put_rows(
        &mut self,
        rows: &[usize],
        jj1: usize,
        jj2: usize,
        src: &ZMatrix,
    ) -> Result<(), LinalgError> {
        let rows = self.positions(rows);
        let cols: Vec<usize> = self.span(jj1, jj2).collect();
        self.scatter(&rows, &cols, src)
    }

    /// Overwrite rows `ii1..=ii2` of the listed columns with `src`.
    pub fn put_cols(
        &mut self,
        ii1: usize,
        ii2: usize,
        cols: &[usize],
        src: &ZMatrix,
    ) -> Result<(), LinalgError> {
        let rows: Vec<usize> = self.span(ii1, ii2).collect();
        let cols = self.positions(cols);
        self.scatter(&rows, &cols, src)
    }

    /// Overwrite the entries at the listed rows and columns with `src`.
    pub fn put_indexed(
        &mut self,
        rows: &[usize],
        cols: &[usize],
        src: &ZMatrix,
    ) -> Result<(), LinalgError> {
        let rows = self.positions(rows);
        let cols = self.positions(cols);
        self.scatter(&rows, &cols, src)
    }

    /// Zero-based `rows x cols` sub-matrix starting at `(i, j)`.
    ///
    /// Panics if the block extends beyond the matrix bounds.
    pub fn block(&self, i: usize, j: usize, rows: usize, cols: usize) -> ZMatrix {
        assert!(
            i + rows <= self.nrows && j + cols <= self.ncols,
            "block ({},{}) size {}x{} out of bounds for {}x{} matrix",
            i, j, rows, cols, self.nrows, self.ncols,
        );
        let mut out = self.zeros_like(rows, cols);
        for c in 0..cols {
            let src = (j + c) * self.nrows + i;
            out.data[c * rows..(c + 1) * rows].copy_from_slice(&self.data[src..src + rows]);
        }
        out
    }

    /// Write `src` into self with its top-left corner at zero-based `(i, j)`.
    ///
    /// Panics if the block extends beyond the matrix bounds.
    pub fn set_block(&mut self, i: usize, j: usize, src: &ZMatrix) {
        assert!(
            i + src.nrows <= self.nrows && j + src.ncols <= self.ncols,
            "set_block ({},{}) size {}x{} out of bounds for {}x{} matrix",
            i, j, src.nrows, src.ncols, self.nrows, self.ncols,
        );
        self.touch();
        for c in 0..src.ncols {
            let dst = (j + c) * self.nrows + i;
            self.data[dst..dst + src.nrows]
                .copy_from_slice(&src.data[c * src.nrows..(c + 1) * src.nrows]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::Z;
    use crate::BaseIndex;

    fn mat4x5() -> ZMatrix {
        ZMatrix::from_fn(4, 5, |i, j| Z::new((i * 5 + j) as f64, -(i as f64)))
    }

    #[test]
    fn get_block_one_based() {
        let m = mat4x5();
        let b = m.get_block(2, 3, 2, 4);
        assert_eq!(b.nrows(), 2);
        assert_eq!(b.ncols(), 3);
        assert_eq!(b[(0, 0)], m[(1, 1)]);
        assert_eq!(b[(1, 2)], m[(2, 3)]);
    }

    #[test]
    fn get_rows_and_cols() {
        let m = mat4x5();
        let r = m.get_rows(&[4, 1], 1, 5);
        assert_eq!(r.nrows(), 2);
        assert_eq!(r[(0, 4)], m[(3, 4)]);
        assert_eq!(r[(1, 0)], m[(0, 0)]);

        let c = m.get_cols(1, 4, &[5, 2]);
        assert_eq!(c.ncols(), 2);
        assert_eq!(c[(2, 0)], m[(2, 4)]);
        assert_eq!(c[(3, 1)], m[(3, 1)]);

        let x = m.get_indexed(&[2, 3], &[1, 5]);
        assert_eq!(x[(1, 1)], m[(2, 4)]);
    }

    #[test]
    fn put_block_roundtrip() {
        let m = mat4x5();
        let b = m.get_block(1, 2, 3, 5);
        let mut z = ZMatrix::zeros(4, 5);
        z.put_block(1, 2, 3, 5, &b).unwrap();
        assert_eq!(z.get_block(1, 2, 3, 5), b);
        assert!(z.is_dirty());
    }

    #[test]
    fn put_block_wrong_shape() {
        let mut z = ZMatrix::zeros(4, 5);
        let src = ZMatrix::zeros(3, 3);
        let err = z.put_block(1, 2, 1, 3, &src).unwrap_err();
        assert_eq!(err, LinalgError::nonconformity((2, 3), (3, 3)));
    }

    #[test]
    fn put_indexed_scatters() {
        let mut z = ZMatrix::zeros(3, 3);
        let src = ZMatrix::from_rows(2, 2, &[
            Z::new(1.0, 0.0), Z::new(2.0, 0.0),
            Z::new(3.0, 0.0), Z::new(4.0, 0.0),
        ]);
        z.put_indexed(&[3, 1], &[1, 3], &src).unwrap();
        assert_eq!(z[(2, 0)], Z::new(1.0, 0.0));
        assert_eq!(z[(2, 2)], Z::new(2.0, 0.0));
        assert_eq!(z[(0, 0)], Z::new(3.0, 0.0));
        assert_eq!(z[(0, 2)], Z::new(4.0, 0.0));

        z.put_rows(&[2], 1, 3, &ZMatrix::from_fn(1, 3, |_, _| Z::new(9.0, 0.0)))
            .unwrap();
        assert_eq!(z[(1, 1)], Z::new(9.0, 0.0));
        z.put_cols(1, 3, &[2], &ZMatrix::zeros(3, 1)).unwrap();
        assert_eq!(z[(1, 1)], Z::new(0.0, 0.0));
    }

    #[test]
    fn zero_based_blocks() {
        let m = mat4x5().with_base(BaseIndex::Zero);
        let b = m.get_block(0, 1, 0, 1);
        assert_eq!(b[(1, 1)], m[(1, 1)]);
        assert_eq!(b.base(), BaseIndex::Zero);
    }

    #[test]
    fn block_and_set_block() {
        let m = mat4x5();
        let b = m.block(1, 2, 2, 3);
        assert_eq!(b[(0, 0)], m[(1, 2)]);
        let mut m2 = ZMatrix::zeros(4, 5);
        m2.set_block(1, 2, &b);
        assert_eq!(m2[(2, 4)], m[(2, 4)]);
        assert_eq!(m2[(0, 0)], Z::new(0.0, 0.0));
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn block_out_of_bounds() {
        let m = mat4x5();
        let _ = m.block(3, 3, 2, 3);
    }
}
