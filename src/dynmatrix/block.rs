use crate::traits::Scalar;

use super::{DimensionMismatch, DynMatrix};

impl<T: Scalar> DynMatrix<T> {
    /// Extract a sub-matrix of size `rows x cols` starting at `(i, j)`.
    ///
    /// Panics if the block extends beyond the matrix bounds.
    ///
    /// ```
    /// use tnsvd::DynMatrix;
    /// let m = DynMatrix::from_fn(3, 3, |i, j| (i * 3 + j) as f64);
    /// let b = m.block(1, 1, 2, 2);
    /// assert_eq!(b[(0, 0)], 4.0);
    /// assert_eq!(b[(1, 1)], 8.0);
    /// ```
    pub fn block(&self, i: usize, j: usize, rows: usize, cols: usize) -> Self {
        assert!(
            i + rows <= self.nrows && j + cols <= self.ncols,
            "block ({},{}) size {}x{} out of bounds for {}x{} matrix",
            i,
            j,
            rows,
            cols,
            self.nrows,
            self.ncols,
        );
        DynMatrix::from_fn(rows, cols, |r, c| self[(i + r, j + c)])
    }

    /// Write a sub-matrix into self starting at position `(i, j)`.
    ///
    /// Panics if the block extends beyond the matrix bounds.
    pub fn set_block(&mut self, i: usize, j: usize, src: &DynMatrix<T>) {
        assert!(
            i + src.nrows <= self.nrows && j + src.ncols <= self.ncols,
            "set_block ({},{}) size {}x{} out of bounds for {}x{} matrix",
            i,
            j,
            src.nrows,
            src.ncols,
            self.nrows,
            self.ncols,
        );
        for c in 0..src.ncols {
            for r in 0..src.nrows {
                self[(i + r, j + c)] = src[(r, c)];
            }
        }
    }

    /// Concatenate `rhs` to the right of `self` (`[self rhs]`).
    ///
    /// Both operands must have the same number of rows.
    ///
    /// ```
    /// use tnsvd::DynMatrix;
    /// let a = DynMatrix::from_rows(2, 1, &[1.0, 2.0]);
    /// let b = DynMatrix::from_rows(2, 2, &[3.0, 4.0, 5.0, 6.0]);
    /// let ab = a.hstack(&b).unwrap();
    /// assert_eq!(ab, DynMatrix::from_rows(2, 3, &[1.0, 3.0, 4.0, 2.0, 5.0, 6.0]));
    /// ```
    pub fn hstack(&self, rhs: &DynMatrix<T>) -> Result<Self, DimensionMismatch> {
        if self.nrows != rhs.nrows {
            return Err(DimensionMismatch {
                expected: (self.nrows, rhs.ncols),
                got: (rhs.nrows, rhs.ncols),
            });
        }
        // column-major: appending columns is appending storage
        let mut data = Vec::with_capacity(self.data.len() + rhs.data.len());
        data.extend_from_slice(&self.data);
        data.extend_from_slice(&rhs.data);
        Ok(DynMatrix {
            data,
            nrows: self.nrows,
            ncols: self.ncols + rhs.ncols,
        })
    }

    /// Concatenate `rhs` below `self` (`[self; rhs]`).
    ///
    /// Both operands must have the same number of columns.
    pub fn vstack(&self, rhs: &DynMatrix<T>) -> Result<Self, DimensionMismatch> {
        if self.ncols != rhs.ncols {
            return Err(DimensionMismatch {
                expected: (rhs.nrows, self.ncols),
                got: (rhs.nrows, rhs.ncols),
            });
        }
        let mut out = DynMatrix::zeros(self.nrows + rhs.nrows, self.ncols, T::zero());
        out.set_block(0, 0, self);
        out.set_block(self.nrows, 0, rhs);
        Ok(out)
    }

    /// Split into the first `row` rows and the remaining rows.
    ///
    /// Panics if `row > nrows`.
    pub fn split_at_row(&self, row: usize) -> (Self, Self) {
        assert!(row <= self.nrows, "split row {} out of bounds for {} rows", row, self.nrows);
        (
            self.block(0, 0, row, self.ncols),
            self.block(row, 0, self.nrows - row, self.ncols),
        )
    }

    /// Split into the first `col` columns and the remaining columns.
    ///
    /// Panics if `col > ncols`.
    pub fn split_at_col(&self, col: usize) -> (Self, Self) {
        assert!(col <= self.ncols, "split col {} out of bounds for {} cols", col, self.ncols);
        (
            self.block(0, 0, self.nrows, col),
            self.block(0, col, self.nrows, self.ncols - col),
        )
    }
}

impl<T: Copy> DynMatrix<T> {
    /// Swap two columns in place.
    pub fn swap_cols(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        for i in 0..self.nrows {
            self.data.swap(a * self.nrows + i, b * self.nrows + i);
        }
    }
}
