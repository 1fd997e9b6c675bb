//! Block layout helpers between two-site tensors and the SVD.
//!
//! A two-site gate update holds four matrices `A0..A3`, one per pair of
//! physical indices. They are laid out as the block matrix
//!
//! ```text
//! [ A0  A1 ]
//! [ A2  A3 ]
//! ```
//!
//! decomposed, and the factors cut back into per-index halves: the rows of
//! `U` and the columns of `V^H`.
//!
//! ```
//! use tnsvd::{c64, DynMatrix, NoDiagnostics, SvdSettings};
//! use tnsvd::reshape::decompose_two_site;
//!
//! let z = c64::new(0.0, 0.0);
//! let blocks = [
//!     DynMatrix::eye(1, z),
//!     DynMatrix::zeros(1, 1, z),
//!     DynMatrix::zeros(1, 1, z),
//!     DynMatrix::eye(1, z),
//! ];
//! let split = decompose_two_site(&blocks, &SvdSettings::default(), &mut NoDiagnostics).unwrap();
//! assert_eq!(split.singular_values, vec![1.0, 1.0]);
//! assert_eq!(split.left.0.nrows(), 1);
//! assert_eq!(split.right.1.ncols(), 1);
//! ```

use core::fmt;

use crate::c64;
use crate::diagnostics::Diagnostics;
use crate::dynmatrix::DimensionMismatch;
use crate::linalg::{solve_svd_robust_with, SvdError, SvdSettings};
use crate::DynMatrix;

/// Matrix axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Rows,
    Cols,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::Rows => write!(f, "rows"),
            Axis::Cols => write!(f, "columns"),
        }
    }
}

/// Errors from the block layout helpers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ReshapeError {
    /// Blocks do not fit together.
    Mismatch(DimensionMismatch),
    /// An axis to be halved has odd length.
    OddDimension { axis: Axis, len: usize },
    /// The decomposition itself failed.
    Svd(SvdError),
}

impl fmt::Display for ReshapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReshapeError::Mismatch(e) => write!(f, "block shapes do not fit: {}", e),
            ReshapeError::OddDimension { axis, len } => {
                write!(f, "cannot halve {} {}", len, axis)
            }
            ReshapeError::Svd(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for ReshapeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ReshapeError::Mismatch(e) => Some(e),
            ReshapeError::Svd(e) => Some(e),
            ReshapeError::OddDimension { .. } => None,
        }
    }
}

impl From<DimensionMismatch> for ReshapeError {
    fn from(e: DimensionMismatch) -> Self {
        ReshapeError::Mismatch(e)
    }
}

impl From<SvdError> for ReshapeError {
    fn from(e: SvdError) -> Self {
        ReshapeError::Svd(e)
    }
}

/// `[[a0, a1], [a2, a3]]`.
pub fn assemble_blocks(
    a0: &DynMatrix<c64>,
    a1: &DynMatrix<c64>,
    a2: &DynMatrix<c64>,
    a3: &DynMatrix<c64>,
) -> Result<DynMatrix<c64>, ReshapeError> {
    let top = a0.hstack(a1)?;
    let bottom = a2.hstack(a3)?;
    Ok(top.vstack(&bottom)?)
}

fn half(axis: Axis, len: usize) -> Result<usize, ReshapeError> {
    if len % 2 != 0 {
        return Err(ReshapeError::OddDimension { axis, len });
    }
    Ok(len / 2)
}

/// Top and bottom halves of `m`'s rows.
pub fn split_rows(m: &DynMatrix<c64>) -> Result<(DynMatrix<c64>, DynMatrix<c64>), ReshapeError> {
    let h = half(Axis::Rows, m.nrows())?;
    Ok(m.split_at_row(h))
}

/// Left and right halves of the columns of `m^H`.
pub fn split_cols_conjugate_transposed(
    m: &DynMatrix<c64>,
) -> Result<(DynMatrix<c64>, DynMatrix<c64>), ReshapeError> {
    let mh = m.adjoint();
    let h = half(Axis::Cols, mh.ncols())?;
    Ok(mh.split_at_col(h))
}

/// Inverse of [`assemble_blocks`] for four equally sized blocks.
pub fn split_quadrants(m: &DynMatrix<c64>) -> Result<[DynMatrix<c64>; 4], ReshapeError> {
    let r = half(Axis::Rows, m.nrows())?;
    let c = half(Axis::Cols, m.ncols())?;
    Ok([
        m.block(0, 0, r, c),
        m.block(0, c, r, c),
        m.block(r, 0, r, c),
        m.block(r, c, r, c),
    ])
}

/// Factors of a two-site block matrix, cut back into per-index halves.
#[derive(Debug, Clone)]
pub struct TwoSiteSplit {
    /// Top and bottom halves of the rows of `U`.
    pub left: (DynMatrix<c64>, DynMatrix<c64>),
    /// Singular values, descending.
    pub singular_values: Vec<f64>,
    /// Left and right halves of the columns of `V^H`.
    pub right: (DynMatrix<c64>, DynMatrix<c64>),
}

/// Assemble `blocks`, decompose with rescale retries, and split the factors.
pub fn decompose_two_site(
    blocks: &[DynMatrix<c64>; 4],
    settings: &SvdSettings,
    diagnostics: &mut dyn Diagnostics,
) -> Result<TwoSiteSplit, ReshapeError> {
    let [a0, a1, a2, a3] = blocks;
    let a = assemble_blocks(a0, a1, a2, a3)?;
    let (u, singular_values, v) = solve_svd_robust_with(&a, settings, diagnostics)?.into_parts();
    Ok(TwoSiteSplit {
        left: split_rows(&u)?,
        singular_values,
        right: split_cols_conjugate_transposed(&v)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::NoDiagnostics;

    fn filled(rows: usize, cols: usize, base: f64) -> DynMatrix<c64> {
        DynMatrix::from_fn(rows, cols, |i, j| c64::new(base + i as f64, j as f64))
    }

    #[test]
    fn assemble_layout() {
        let a = assemble_blocks(
            &filled(2, 2, 0.0),
            &filled(2, 2, 10.0),
            &filled(2, 2, 20.0),
            &filled(2, 2, 30.0),
        )
        .unwrap();
        assert_eq!((a.nrows(), a.ncols()), (4, 4));
        assert_eq!(a[(0, 0)], c64::new(0.0, 0.0));
        assert_eq!(a[(1, 3)], c64::new(11.0, 1.0));
        assert_eq!(a[(2, 0)], c64::new(20.0, 0.0));
        assert_eq!(a[(3, 2)], c64::new(31.0, 0.0));
    }

    #[test]
    fn quadrant_round_trip() {
        let blocks = [
            filled(2, 3, 0.0),
            filled(2, 3, 10.0),
            filled(2, 3, 20.0),
            filled(2, 3, 30.0),
        ];
        let a = assemble_blocks(&blocks[0], &blocks[1], &blocks[2], &blocks[3]).unwrap();
        let back = split_quadrants(&a).unwrap();
        assert_eq!(back, blocks);
    }

    #[test]
    fn mismatched_blocks() {
        let err = assemble_blocks(
            &filled(2, 2, 0.0),
            &filled(3, 2, 0.0),
            &filled(2, 2, 0.0),
            &filled(2, 2, 0.0),
        )
        .unwrap_err();
        assert!(matches!(err, ReshapeError::Mismatch(_)));
    }

    #[test]
    fn odd_split() {
        let err = split_rows(&filled(3, 2, 0.0)).unwrap_err();
        assert_eq!(err, ReshapeError::OddDimension { axis: Axis::Rows, len: 3 });
        assert_eq!(err.to_string(), "cannot halve 3 rows");
    }

    #[test]
    fn split_conjugate_transposed() {
        let m = DynMatrix::from_rows(2, 2, &[
            c64::new(1.0, 1.0), c64::new(2.0, 0.0),
            c64::new(3.0, 0.0), c64::new(4.0, -1.0),
        ]);
        let (left, right) = split_cols_conjugate_transposed(&m).unwrap();
        // m^H = [[1-i, 3], [2, 4+i]]
        assert_eq!(left, DynMatrix::from_rows(2, 1, &[c64::new(1.0, -1.0), c64::new(2.0, 0.0)]));
        assert_eq!(right, DynMatrix::from_rows(2, 1, &[c64::new(3.0, 0.0), c64::new(4.0, 1.0)]));
    }

    #[test]
    fn two_site_shapes() {
        let blocks = [
            filled(2, 2, 0.5),
            filled(2, 2, -1.0),
            filled(2, 2, 2.0),
            filled(2, 2, 0.25),
        ];
        let split =
            decompose_two_site(&blocks, &SvdSettings::default(), &mut NoDiagnostics).unwrap();
        assert_eq!((split.left.0.nrows(), split.left.0.ncols()), (2, 4));
        assert_eq!((split.left.1.nrows(), split.left.1.ncols()), (2, 4));
        assert_eq!((split.right.0.nrows(), split.right.0.ncols()), (4, 2));
        assert_eq!((split.right.1.nrows(), split.right.1.ncols()), (4, 2));
        assert_eq!(split.singular_values.len(), 4);
    }
}
