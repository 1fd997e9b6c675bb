//! Complex SVD in the Businger–Golub formulation.
//!
//! The pipeline for one attempt is
//! [`bidiagonal`] → [`bidiagonal_qr`] → [`normalize`] → [`back_transform`]
//! → [`verify`]; [`retry`] wraps whole attempts with the rescale policy.
//! The public surface is [`solve_svd`], [`solve_svd_robust`] and their
//! `_with` variants taking explicit settings and a diagnostics sink.

pub(crate) mod back_transform;
pub(crate) mod bidiagonal;
pub(crate) mod bidiagonal_qr;
pub(crate) mod normalize;
pub(crate) mod retry;
pub mod rotation;
pub(crate) mod svd;
pub(crate) mod verify;

pub use svd::{
    solve_svd, solve_svd_robust, solve_svd_robust_with, solve_svd_with, ResidualPolicy, Svd,
    SvdSettings, CONVERGENCE_ETA, MAX_RETRIES, MAX_SWEEPS_PER_DIM, REFLECTION_TOL,
    RESCALE_FACTOR, RESIDUAL_TOL,
};
pub use rotation::{DEGENERATE_ROTATION_TOL, SHIFT_SIGN_TOL, UNDERFLOW_RESCALE};

/// Errors from the SVD routines.
///
/// [`is_recoverable`](SvdError::is_recoverable) separates a failed attempt
/// that a rescaled retry may fix from a final outcome.
///
/// ```
/// use tnsvd::SvdError;
///
/// assert!(SvdError::DegenerateRotation { index: 3 }.is_recoverable());
/// assert!(!SvdError::RetriesExhausted { attempts: 16 }.is_recoverable());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SvdError {
    /// A Givens rotation denominator collapsed to zero in the QR sweep.
    DegenerateRotation { index: usize },
    /// The QR sweep exceeded its iteration budget.
    NoConvergence { index: usize },
    /// Every rescaled retry failed.
    RetriesExhausted { attempts: u32 },
    /// The reconstruction check failed under [`ResidualPolicy::Reject`].
    ResidualMismatch { max_residual: f64 },
}

impl SvdError {
    /// Whether rescaling the input and trying again can help.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            SvdError::DegenerateRotation { .. } | SvdError::NoConvergence { .. }
        )
    }
}

impl core::fmt::Display for SvdError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            SvdError::DegenerateRotation { index } => {
                write!(f, "degenerate rotation at index {}", index)
            }
            SvdError::NoConvergence { index } => {
                write!(f, "singular value {} did not converge", index)
            }
            SvdError::RetriesExhausted { attempts } => {
                write!(f, "SVD failed after {} attempts", attempts)
            }
            SvdError::ResidualMismatch { max_residual } => {
                write!(f, "reconstruction residual {:e} exceeds tolerance", max_residual)
            }
        }
    }
}

impl std::error::Error for SvdError {}
