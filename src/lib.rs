//! # tnsvd
//!
//! Complex singular value decomposition for tensor-network simulation, after
//! the Businger–Golub formulation (Comm. ACM 12, 564, 1969). Pure Rust.
//!
//! ## Quick start
//!
//! ```
//! use tnsvd::{c64, solve_svd_robust, DynMatrix};
//!
//! let a = DynMatrix::from_rows(2, 3, &[
//!     c64::new(1.0, 0.0), c64::new(0.0, 1.0), c64::new(2.0, 0.0),
//!     c64::new(0.0, -1.0), c64::new(3.0, 0.0), c64::new(1.0, 1.0),
//! ]);
//! let svd = solve_svd_robust(&a).unwrap();
//!
//! // A = U · diag(σ) · V^H
//! let s: Vec<c64> = svd.singular_values().iter().map(|&x| c64::new(x, 0.0)).collect();
//! let recon = &(svd.u() * &DynMatrix::from_diag(2, 3, &s)) * &svd.vh();
//! assert!(recon.max_abs_diff(&a) < 1e-9);
//! ```
//!
//! ## Modules
//!
//! - [`dynmatrix`]: Heap-allocated `DynMatrix<T>` with runtime dimensions,
//!   column-major `Vec<T>` storage. Implements [`MatrixRef`] / [`MatrixMut`].
//!   Arithmetic, adjoint, block extraction and concatenation, norms.
//!
//! - [`linalg`]: The SVD pipeline: Householder bidiagonalization, implicitly
//!   shifted QR on the bidiagonal, sign/order normalization, back
//!   transformation and a reconstruction check. [`solve_svd`] runs one
//!   attempt; [`solve_svd_robust`] retries failed attempts on a rescaled
//!   input. Tuning lives in [`SvdSettings`].
//!
//! - [`reshape`]: Layout helpers for two-site tensor updates: assemble four
//!   blocks into one matrix and cut `U` and `V^H` back into halves.
//!
//! - [`diagnostics`]: [`SvdEvent`]s reported by the solver and the
//!   [`Diagnostics`] sinks receiving them ([`LogDiagnostics`] forwards to
//!   the `log` facade).
//!
//! - [`traits`]: Element trait hierarchy:
//!   - [`Scalar`]: all matrix elements (`Copy + PartialEq + Debug + Zero + One + Num`)
//!   - [`FloatScalar`]: real floats (`Scalar + Float`)
//!   - [`LinalgScalar`]: real floats and complex numbers, used by the adjoint and norms
//!   - [`MatrixRef`] / [`MatrixMut`]: generic read/write access for algorithms
//!
//! ## Failure handling
//!
//! A single attempt can fail on a degenerate Givens rotation or by running
//! out of QR sweeps; both are [recoverable](SvdError::is_recoverable) and
//! the robust entry points retry them with the input scaled by
//! [`linalg::RESCALE_FACTOR`]. Nothing is printed: events go to the
//! [`Diagnostics`] sink passed to the `_with` variants.

pub mod diagnostics;
pub mod dynmatrix;
pub mod linalg;
pub mod reshape;
pub mod traits;

pub use diagnostics::{Diagnostics, LogDiagnostics, NoDiagnostics, SvdEvent};
pub use dynmatrix::{c64, DimensionMismatch, DynMatrix};
pub use linalg::{
    solve_svd, solve_svd_robust, solve_svd_robust_with, solve_svd_with, ResidualPolicy, Svd,
    SvdError, SvdSettings,
};
pub use reshape::{
    assemble_blocks, decompose_two_site, split_cols_conjugate_transposed, split_quadrants,
    split_rows, ReshapeError, TwoSiteSplit,
};
pub use traits::{FloatScalar, LinalgScalar, MatrixMut, MatrixRef, Scalar};

pub use num_complex::Complex;
