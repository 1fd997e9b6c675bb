use crate::c64;
use crate::diagnostics::{Diagnostics, SvdEvent};
use crate::DynMatrix;

/// Outcome of a reconstruction check.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Residual {
    /// Largest entrywise `|A − U·Σ·V^H|`.
    pub max_abs: f64,
    /// Number of entries over the tolerance.
    pub mismatches: usize,
}

impl Residual {
    pub fn is_clean(&self) -> bool {
        self.mismatches == 0
    }
}

/// Compare `U·diag(s)·V^H` against `a` entry by entry.
///
/// `u` is M×M, `v` is N×N and `s` holds `min(M, N)` values. When `a` is a
/// rescaled copy of the caller's matrix, `scale` is the factor applied;
/// deviations are divided by it so that `tol` and the reported values
/// refer to the caller's matrix. Every entry deviating by more than `tol`
/// is reported, followed by a [`SvdEvent::Residual`] summary.
pub(crate) fn verify(
    a: &DynMatrix<c64>,
    u: &DynMatrix<c64>,
    s: &[f64],
    v: &DynMatrix<c64>,
    scale: f64,
    tol: f64,
    diagnostics: &mut dyn Diagnostics,
) -> Residual {
    let (m, n) = (a.nrows(), a.ncols());
    let sc: Vec<c64> = s.iter().map(|&x| c64::new(x, 0.0)).collect();
    let sigma = DynMatrix::from_diag(m, n, &sc);
    let recon = &(u * &sigma) * &v.adjoint();

    let mut max_abs = 0.0_f64;
    let mut mismatches = 0;
    for i in 0..m {
        for j in 0..n {
            let diff = (a[(i, j)] - recon[(i, j)]).norm() / scale;
            max_abs = max_abs.max(diff);
            if diff > tol {
                mismatches += 1;
                diagnostics.record(SvdEvent::ResidualMismatch { row: i, col: j, diff });
            }
        }
    }

    diagnostics.record(SvdEvent::Residual { max_abs, mismatches });
    Residual { max_abs, mismatches }
}
