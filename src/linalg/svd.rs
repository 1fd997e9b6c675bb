use num_traits::Zero;

use crate::c64;
use crate::diagnostics::{Diagnostics, LogDiagnostics, SvdEvent};
use crate::DynMatrix;

use super::back_transform::back_transform;
use super::bidiagonal::bidiagonalize;
use super::bidiagonal_qr::bidiagonal_qr;
use super::normalize::normalize;
use super::retry::retry_with_rescale;
use super::verify::verify;
use super::SvdError;

// ── Defaults ────────────────────────────────────────────────────────

/// Factor the input is multiplied by before each retry.
pub const RESCALE_FACTOR: f64 = 1e2;
/// Rescaled retries after the first attempt.
pub const MAX_RETRIES: u32 = 15;
/// Entrywise reconstruction tolerance.
pub const RESIDUAL_TOL: f64 = 1e-9;
/// Relative threshold below which bidiagonal entries count as zero.
pub const CONVERGENCE_ETA: f64 = 1e-10;
/// Squared column/row norms at or below this skip their reflection.
pub const REFLECTION_TOL: f64 = 1.5e-34;
/// QR sweeps allowed per unit of `max(M, N)`.
pub const MAX_SWEEPS_PER_DIM: usize = 30;

/// What to do when the reconstruction check fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResidualPolicy {
    /// Report the mismatch to the diagnostics sink and return the result.
    #[default]
    Report,
    /// Fail with [`SvdError::ResidualMismatch`].
    Reject,
}

/// Settings for [`solve_svd_with`] and [`solve_svd_robust_with`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SvdSettings {
    /// Multiplier applied to the input on each retry.
    pub rescale_factor: f64,
    /// Maximum number of rescaled retries.
    pub max_retries: u32,
    /// Entrywise tolerance of the reconstruction check.
    pub residual_tol: f64,
    /// Relative zero threshold of the QR sweep.
    pub convergence_eta: f64,
    /// Squared-norm threshold below which a Householder step is skipped.
    pub reflection_tol: f64,
    /// QR sweep budget per unit of `max(M, N)`.
    pub max_sweeps_per_dim: usize,
    /// Outcome of a failed reconstruction check.
    pub residual_policy: ResidualPolicy,
}

impl Default for SvdSettings {
    fn default() -> Self {
        Self {
            rescale_factor: RESCALE_FACTOR,
            max_retries: MAX_RETRIES,
            residual_tol: RESIDUAL_TOL,
            convergence_eta: CONVERGENCE_ETA,
            reflection_tol: REFLECTION_TOL,
            max_sweeps_per_dim: MAX_SWEEPS_PER_DIM,
            residual_policy: ResidualPolicy::Report,
        }
    }
}

// ── Svd ─────────────────────────────────────────────────────────────

/// Singular value decomposition `A = U · diag(σ) · V^H` of a complex M×N matrix.
///
/// U is M×M, V is N×N and σ has `min(M, N)` non-negative entries in
/// non-increasing order.
///
/// ```
/// use tnsvd::{c64, solve_svd, DynMatrix};
///
/// let a = DynMatrix::from_rows(2, 2, &[
///     c64::new(0.0, 2.0), c64::new(0.0, 0.0),
///     c64::new(0.0, 0.0), c64::new(3.0, 0.0),
/// ]);
/// let svd = solve_svd(&a).unwrap();
/// assert!((svd.singular_values()[0] - 3.0).abs() < 1e-12);
/// assert!((svd.singular_values()[1] - 2.0).abs() < 1e-12);
/// assert!(svd.residual() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct Svd {
    u: DynMatrix<c64>,
    singular_values: Vec<f64>,
    v: DynMatrix<c64>,
    residual: f64,
    rescalings: u32,
}

impl Svd {
    /// Left singular vectors (M×M unitary).
    #[inline]
    pub fn u(&self) -> &DynMatrix<c64> {
        &self.u
    }

    /// Right singular vectors (N×N unitary), one per column.
    #[inline]
    pub fn v(&self) -> &DynMatrix<c64> {
        &self.v
    }

    /// `V^H`, whose rows are the right singular vectors.
    pub fn vh(&self) -> DynMatrix<c64> {
        self.v.adjoint()
    }

    /// The singular values, sorted descending.
    #[inline]
    pub fn singular_values(&self) -> &[f64] {
        &self.singular_values
    }

    /// Largest entrywise `|A − U·Σ·V^H|` measured by the reconstruction check,
    /// in the scale of the caller's input.
    #[inline]
    pub fn residual(&self) -> f64 {
        self.residual
    }

    /// How many times the input was rescaled before an attempt succeeded.
    #[inline]
    pub fn rescalings(&self) -> u32 {
        self.rescalings
    }

    /// Numerical rank: number of singular values above `tol`.
    pub fn rank(&self, tol: f64) -> usize {
        self.singular_values.iter().filter(|&&s| s > tol).count()
    }

    /// Condition number: σ_max / σ_min.
    ///
    /// Returns infinity if the smallest singular value is zero.
    pub fn condition_number(&self) -> f64 {
        match (self.singular_values.first(), self.singular_values.last()) {
            (Some(&s_max), Some(&s_min)) => {
                if s_min == 0.0 {
                    f64::INFINITY
                } else {
                    s_max / s_min
                }
            }
            _ => 1.0,
        }
    }

    /// `(U, σ, V)`.
    pub fn into_parts(self) -> (DynMatrix<c64>, Vec<f64>, DynMatrix<c64>) {
        (self.u, self.singular_values, self.v)
    }

    /// Undo `rescalings` multiplications of the input by a total of `scale`.
    pub(crate) fn unscale(&mut self, scale: f64, rescalings: u32) {
        for s in &mut self.singular_values {
            *s /= scale;
        }
        self.rescalings = rescalings;
    }
}

// ── Entry points ────────────────────────────────────────────────────

/// Single SVD attempt with default settings, reporting through `log`.
///
/// ```
/// use tnsvd::{c64, solve_svd, DynMatrix};
///
/// let a = DynMatrix::from_rows(1, 1, &[c64::new(3.0, 4.0)]);
/// let svd = solve_svd(&a).unwrap();
/// assert_eq!(svd.singular_values(), &[5.0]);
/// ```
pub fn solve_svd(a: &DynMatrix<c64>) -> Result<Svd, SvdError> {
    solve_svd_with(a, &SvdSettings::default(), &mut LogDiagnostics)
}

/// Single SVD attempt.
///
/// Wide inputs are decomposed through their adjoint and the factors
/// swapped back. Fails with a recoverable error when the QR sweep hits a
/// degenerate rotation or its sweep budget, and with
/// [`SvdError::ResidualMismatch`] when the reconstruction check fails under
/// [`ResidualPolicy::Reject`].
pub fn solve_svd_with(
    a: &DynMatrix<c64>,
    settings: &SvdSettings,
    diagnostics: &mut dyn Diagnostics,
) -> Result<Svd, SvdError> {
    solve_scaled(a, 1.0, settings, diagnostics)
}

/// Single attempt on `a`, which is the caller's matrix multiplied by `scale`.
///
/// The reconstruction check, its events and the residual policy all
/// measure deviations relative to the caller's matrix.
pub(crate) fn solve_scaled(
    a: &DynMatrix<c64>,
    scale: f64,
    settings: &SvdSettings,
    diagnostics: &mut dyn Diagnostics,
) -> Result<Svd, SvdError> {
    let (rows, cols) = (a.nrows(), a.ncols());
    if rows == 0 || cols == 0 {
        return Ok(Svd {
            u: DynMatrix::eye(rows, c64::zero()),
            singular_values: Vec::new(),
            v: DynMatrix::eye(cols, c64::zero()),
            residual: 0.0,
            rescalings: 0,
        });
    }

    let transposed = rows < cols;
    let mut reflectors = if transposed {
        diagnostics.record(SvdEvent::Transposed { nrows: rows, ncols: cols });
        a.adjoint()
    } else {
        a.clone()
    };
    let (m, n) = (reflectors.nrows(), reflectors.ncols());

    let mut diag = vec![0.0; n];
    let mut super_diag = vec![0.0; n];
    bidiagonalize(&mut reflectors, &mut diag, &mut super_diag, settings.reflection_tol);

    let mut s = diag.clone();
    let mut t = super_diag.clone();
    let mut u = DynMatrix::eye(m, c64::zero());
    let mut v = DynMatrix::eye(n, c64::zero());
    bidiagonal_qr(
        &mut s,
        &mut t,
        &mut u,
        &mut v,
        settings.convergence_eta,
        settings.max_sweeps_per_dim * m.max(n),
        diagnostics,
    )?;
    normalize(&mut s, &mut u, &mut v);
    back_transform(&reflectors, &diag, &super_diag, &mut u, &mut v);

    let (u, v) = if transposed { (v, u) } else { (u, v) };

    let residual = verify(a, &u, &s, &v, scale, settings.residual_tol, diagnostics);
    if !residual.is_clean() && settings.residual_policy == ResidualPolicy::Reject {
        return Err(SvdError::ResidualMismatch {
            max_residual: residual.max_abs,
        });
    }

    Ok(Svd {
        u,
        singular_values: s,
        v,
        residual: residual.max_abs,
        rescalings: 0,
    })
}

/// SVD that retries a failed attempt on a rescaled copy of the input.
///
/// Uses default settings and reports through `log`.
pub fn solve_svd_robust(a: &DynMatrix<c64>) -> Result<Svd, SvdError> {
    solve_svd_robust_with(a, &SvdSettings::default(), &mut LogDiagnostics)
}

/// SVD that retries a failed attempt on a rescaled copy of the input.
///
/// After a recoverable failure the input is multiplied by
/// `settings.rescale_factor` and decomposed again, up to
/// `settings.max_retries` times. The singular values of a successful retry
/// are divided by the accumulated scale, so they refer to `a` itself.
/// Returns [`SvdError::RetriesExhausted`] when every attempt fails.
///
/// ```
/// use tnsvd::{c64, solve_svd_robust, DynMatrix};
///
/// let a = DynMatrix::from_fn(3, 2, |i, j| c64::new((i + j) as f64, (i * j) as f64));
/// let svd = solve_svd_robust(&a).unwrap();
/// assert_eq!(svd.singular_values().len(), 2);
/// assert_eq!(svd.rescalings(), 0);
/// ```
pub fn solve_svd_robust_with(
    a: &DynMatrix<c64>,
    settings: &SvdSettings,
    diagnostics: &mut dyn Diagnostics,
) -> Result<Svd, SvdError> {
    retry_with_rescale(a, settings, diagnostics, solve_scaled)
}

// ── Tests ───────────────────────────────────────────────────────────
