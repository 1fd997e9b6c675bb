//! Diagnostics sink for the SVD pipeline.
//!
//! The solver never prints and keeps no process-wide verbosity flag. Every
//! entry point takes a `&mut dyn Diagnostics` and reports [`SvdEvent`]s to
//! it; the caller decides what to do with them.
//!
//! ```
//! use tnsvd::{c64, DynMatrix, SvdEvent, SvdSettings};
//! use tnsvd::linalg::solve_svd_with;
//!
//! let a = DynMatrix::from_rows(1, 2, &[c64::new(1.0, 0.0), c64::new(0.0, 1.0)]);
//! let mut events: Vec<SvdEvent> = Vec::new();
//! solve_svd_with(&a, &SvdSettings::default(), &mut events).unwrap();
//! assert!(events.contains(&SvdEvent::Transposed { nrows: 1, ncols: 2 }));
//! ```

use core::fmt;

/// Something noteworthy that happened inside one SVD call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SvdEvent {
    /// The input was wider than tall and was decomposed as `A^H`.
    Transposed { nrows: usize, ncols: usize },
    /// Every bidiagonal entry was zero; diagonalization was skipped.
    ZeroMatrix,
    /// A chase step produced `f == 0`; the rescaled recomputation gave `rescaled`.
    RescuedRotation { index: usize, rescaled: f64 },
    /// A Givens denominator collapsed to exactly zero.
    DegenerateRotation { index: usize, h: f64, f: f64 },
    /// Singular value `index` did not converge within the sweep budget.
    SweepLimit { index: usize, sweeps: usize },
    /// One entry of `U·diag(S)·V^H` differs from the input by more than the tolerance.
    ResidualMismatch { row: usize, col: usize, diff: f64 },
    /// Outcome of the reconstruction check.
    Residual { max_abs: f64, mismatches: usize },
    /// An attempt failed and the input is retried with a larger scale.
    Retry { attempt: u32, scale: f64 },
}

impl SvdEvent {
    /// Whether the event signals a numerical problem rather than routine progress.
    pub fn is_warning(&self) -> bool {
        match self {
            SvdEvent::DegenerateRotation { .. }
            | SvdEvent::SweepLimit { .. }
            | SvdEvent::ResidualMismatch { .. }
            | SvdEvent::Retry { .. } => true,
            SvdEvent::Residual { mismatches, .. } => *mismatches > 0,
            SvdEvent::Transposed { .. }
            | SvdEvent::ZeroMatrix
            | SvdEvent::RescuedRotation { .. } => false,
        }
    }
}

impl fmt::Display for SvdEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SvdEvent::Transposed { nrows, ncols } => {
                write!(f, "decomposing adjoint of wide {}x{} input", nrows, ncols)
            }
            SvdEvent::ZeroMatrix => write!(f, "input is exactly zero"),
            SvdEvent::RescuedRotation { index, rescaled } => {
                write!(f, "rotation {} underflowed, rescaled value {:e}", index, rescaled)
            }
            SvdEvent::DegenerateRotation { index, h, f: fv } => {
                write!(f, "rotation {} is degenerate: h = {:e}, f = {:e}", index, h, fv)
            }
            SvdEvent::SweepLimit { index, sweeps } => {
                write!(f, "singular value {} not converged after {} sweeps", index, sweeps)
            }
            SvdEvent::ResidualMismatch { row, col, diff } => {
                write!(f, "reconstruction differs at ({}, {}) by {:e}", row, col, diff)
            }
            SvdEvent::Residual { max_abs, mismatches } => {
                write!(f, "max residual {:e}, {} entries over tolerance", max_abs, mismatches)
            }
            SvdEvent::Retry { attempt, scale } => {
                write!(f, "retry {} with input scaled by {:e}", attempt, scale)
            }
        }
    }
}

/// Receiver of [`SvdEvent`]s.
pub trait Diagnostics {
    fn record(&mut self, event: SvdEvent);
}

/// Forwards events to the `log` facade under the `tnsvd` target.
///
/// Warnings go to `warn!`, everything else to `debug!`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogDiagnostics;

impl Diagnostics for LogDiagnostics {
    fn record(&mut self, event: SvdEvent) {
        if event.is_warning() {
            log::warn!(target: "tnsvd", "{}", event);
        } else {
            log::debug!(target: "tnsvd", "{}", event);
        }
    }
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoDiagnostics;

impl Diagnostics for NoDiagnostics {
    fn record(&mut self, _event: SvdEvent) {}
}

impl Diagnostics for Vec<SvdEvent> {
    fn record(&mut self, event: SvdEvent) {
        self.push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vec_records_in_order() {
        let mut events: Vec<SvdEvent> = Vec::new();
        events.record(SvdEvent::ZeroMatrix);
        events.record(SvdEvent::Retry { attempt: 1, scale: 100.0 });
        assert_eq!(events.len(), 2);
        assert_eq!(events[0], SvdEvent::ZeroMatrix);
    }

    #[test]
    fn warning_classification() {
        assert!(SvdEvent::Retry { attempt: 1, scale: 1e2 }.is_warning());
        assert!(!SvdEvent::ZeroMatrix.is_warning());
        assert!(!SvdEvent::Residual { max_abs: 1e-15, mismatches: 0 }.is_warning());
        assert!(SvdEvent::Residual { max_abs: 1e-3, mismatches: 2 }.is_warning());
    }

    #[test]
    fn display() {
        let e = SvdEvent::ResidualMismatch { row: 1, col: 2, diff: 0.5 };
        assert_eq!(e.to_string(), "reconstruction differs at (1, 2) by 5e-1");
    }

    #[test]
    fn log_and_silent_sinks_accept_events() {
        LogDiagnostics.record(SvdEvent::ZeroMatrix);
        NoDiagnostics.record(SvdEvent::ZeroMatrix);
    }
}
