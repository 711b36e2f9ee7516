use crate::linalg::LinalgError;
use crate::ZMatrix;

/// Concatenate a grid of blocks into one matrix.
///
/// `grid[i][j]` lands in block row `i`, block column `j`. All blocks in a
/// grid row must share a row count and all blocks in a grid column a
/// column count. The result takes the base index of `grid[0][0]`.
///
/// Fails with `Nonconformity` on a mismatched block, on an empty grid, and
/// on a ragged grid (the error then carries block counts, not entry
/// counts).
///
/// ```
/// use zdense::linalg::merge;
/// use zdense::{ZMatrix, Z};
///
/// let a = ZMatrix::eye(2);
/// let b = ZMatrix::zeros(2, 1);
/// let c = ZMatrix::zeros(1, 2);
/// let d = ZMatrix::column(&[Z::new(5.0, 0.0)]);
/// let m = merge(&[&[&a, &b], &[&c, &d]]).unwrap();
/// assert_eq!((m.nrows(), m.ncols()), (3, 3));
/// assert_eq!(m[(2, 2)], Z::new(5.0, 0.0));
/// ```
pub fn merge(grid: &[&[&ZMatrix]]) -> Result<ZMatrix, LinalgError> {
    let nbr = grid.len();
    let nbc = grid.first().map_or(0, |row| row.len());
    if nbr == 0 || nbc == 0 {
        return Err(LinalgError::nonconformity((1, 1), (nbr, nbc)));
    }
    if let Some(row) = grid.iter().find(|row| row.len() != nbc) {
        return Err(LinalgError::nonconformity((nbr, nbc), (nbr, row.len())));
    }

    let heights: Vec<usize> = grid.iter().map(|row| row[0].nrows()).collect();
    let widths: Vec<usize> = grid[0].iter().map(|b| b.ncols()).collect();
    for (row, &h) in grid.iter().zip(&heights) {
        for (b, &w) in row.iter().zip(&widths) {
            if b.nrows() != h || b.ncols() != w {
                return Err(LinalgError::nonconformity((h, w), (b.nrows(), b.ncols())));
            }
        }
    }

    let mut out = grid[0][0].zeros_like(heights.iter().sum(), widths.iter().sum());
    let mut i0 = 0;
    for (row, &h) in grid.iter().zip(&heights) {
        let mut j0 = 0;
        for (b, &w) in row.iter().zip(&widths) {
            out.set_block(i0, j0, b);
            j0 += w;
        }
        i0 += h;
    }
    Ok(out)
}

/// `[a b]`
pub fn merge_12(a: &ZMatrix, b: &ZMatrix) -> Result<ZMatrix, LinalgError> {
    merge(&[&[a, b]])
}

/// `[a b c]`
pub fn merge_13(a: &ZMatrix, b: &ZMatrix, c: &ZMatrix) -> Result<ZMatrix, LinalgError> {
    merge(&[&[a, b, c]])
}

/// `[a; b]`
pub fn merge_21(a: &ZMatrix, b: &ZMatrix) -> Result<ZMatrix, LinalgError> {
    merge(&[&[a], &[b]])
}

/// `[a11 a12; a21 a22]`
pub fn merge_22(
    a11: &ZMatrix,
    a12: &ZMatrix,
    a21: &ZMatrix,
    a22: &ZMatrix,
) -> Result<ZMatrix, LinalgError> {
    merge(&[&[a11, a12], &[a21, a22]])
}

/// `[a11 a12 a13; a21 a22 a23]`
pub fn merge_23(
    a11: &ZMatrix,
    a12: &ZMatrix,
    a13: &ZMatrix,
    a21: &ZMatrix,
    a22: &ZMatrix,
    a23: &ZMatrix,
) -> Result<ZMatrix, LinalgError> {
    merge(&[&[a11, a12, a13], &[a21, a22, a23]])
}

/// `[a; b; c]`
pub fn merge_31(a: &ZMatrix, b: &ZMatrix, c: &ZMatrix) -> Result<ZMatrix, LinalgError> {
    merge(&[&[a], &[b], &[c]])
}

/// `[a11 a12; a21 a22; a31 a32]`
pub fn merge_32(
    a11: &ZMatrix,
    a12: &ZMatrix,
    a21: &ZMatrix,
    a22: &ZMatrix,
    a31: &ZMatrix,
    a32: &ZMatrix,
) -> Result<ZMatrix, LinalgError> {
    merge(&[&[a11, a12], &[a21, a22], &[a31, a32]])
}

/// Three by three grid, row by row.
#[allow(clippy::too_many_arguments)]
pub fn merge_33(
    a11: &ZMatrix,
    a12: &ZMatrix,
    a13: &ZMatrix,
    a21: &ZMatrix,
    a22: &ZMatrix,
    a23: &ZMatrix,
    a31: &ZMatrix,
    a32: &ZMatrix,
    a33: &ZMatrix,
) -> Result<ZMatrix, LinalgError> {
    merge(&[&[a11, a12, a13], &[a21, a22, a23], &[a31, a32, a33]])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::Z;
    use crate::BaseIndex;

    fn filled(nr: usize, nc: usize, tag: f64) -> ZMatrix {
        ZMatrix::from_fn(nr, nc, |i, j| Z::new(tag, (i * nc + j) as f64))
    }

    #[test]
    fn merge_2x2_boundaries() {
        let a = filled(2, 3, 1.0);
        let b = filled(2, 1, 2.0);
        let c = filled(1, 3, 3.0);
        let d = filled(1, 1, 4.0);
        let m = merge_22(&a, &b, &c, &d).unwrap();
        assert_eq!((m.nrows(), m.ncols()), (3, 4));
        assert_eq!(m[(0, 0)], a[(0, 0)]);
        assert_eq!(m[(1, 2)], a[(1, 2)]);
        assert_eq!(m[(0, 3)], b[(0, 0)]);
        assert_eq!(m[(1, 3)], b[(1, 0)]);
        assert_eq!(m[(2, 0)], c[(0, 0)]);
        assert_eq!(m[(2, 2)], c[(0, 2)]);
        assert_eq!(m[(2, 3)], d[(0, 0)]);
    }

    #[test]
    fn mismatched_rows_in_grid_row() {
        let a = filled(2, 2, 1.0);
        let b = filled(3, 2, 2.0);
        let c = filled(1, 2, 3.0);
        let d = filled(1, 2, 4.0);
        assert_eq!(
            merge_22(&a, &b, &c, &d).unwrap_err(),
            LinalgError::nonconformity((2, 2), (3, 2))
        );
    }

    #[test]
    fn mismatched_cols_in_grid_column() {
        let a = filled(2, 2, 1.0);
        let b = filled(1, 3, 2.0);
        assert_eq!(
            merge_21(&a, &b).unwrap_err(),
            LinalgError::nonconformity((1, 2), (1, 3))
        );
    }

    #[test]
    fn ragged_and_empty() {
        let a = filled(1, 1, 1.0);
        let ragged: [&[&ZMatrix]; 2] = [&[&a, &a], &[&a]];
        assert!(matches!(merge(&ragged), Err(LinalgError::Nonconformity { .. })));
        assert!(matches!(merge(&[]), Err(LinalgError::Nonconformity { .. })));
        let empty_row: [&[&ZMatrix]; 1] = [&[]];
        assert!(matches!(merge(&empty_row), Err(LinalgError::Nonconformity { .. })));
    }

    #[test]
    fn wrappers_shapes() {
        let a = filled(2, 2, 1.0);
        assert_eq!(merge_12(&a, &a).unwrap().ncols(), 4);
        assert_eq!(merge_13(&a, &a, &a).unwrap().ncols(), 6);
        assert_eq!(merge_31(&a, &a, &a).unwrap().nrows(), 6);
        let m = merge_23(&a, &a, &a, &a, &a, &a).unwrap();
        assert_eq!((m.nrows(), m.ncols()), (4, 6));
        let m = merge_32(&a, &a, &a, &a, &a, &a).unwrap();
        assert_eq!((m.nrows(), m.ncols()), (6, 4));
        let m = merge_33(&a, &a, &a, &a, &a, &a, &a, &a, &a).unwrap();
        assert_eq!((m.nrows(), m.ncols()), (6, 6));
        assert_eq!(m[(5, 5)], a[(1, 1)]);
    }

    #[test]
    fn takes_first_block_base() {
        let a = filled(1, 1, 1.0).with_base(BaseIndex::Zero);
        let b = filled(1, 1, 2.0);
        assert_eq!(merge_12(&a, &b).unwrap().base(), BaseIndex::Zero);
    }
}
