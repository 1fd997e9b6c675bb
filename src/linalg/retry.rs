use crate::c64;
use crate::diagnostics::{Diagnostics, SvdEvent};
use crate::DynMatrix;

use super::svd::{Svd, SvdSettings};
use super::SvdError;

/// Run `attempt` on `a`, retrying on rescaled copies after recoverable failures.
///
/// Retry `t` decomposes `a · factorᵗ` and hands that scale to `attempt`,
/// which checks its reconstruction against `a` itself. A success after `t`
/// rescalings has its singular values divided by `factorᵗ`. Errors that
/// rescaling cannot fix are returned as they are.
pub(crate) fn retry_with_rescale<F>(
    a: &DynMatrix<c64>,
    settings: &SvdSettings,
    diagnostics: &mut dyn Diagnostics,
    mut attempt: F,
) -> Result<Svd, SvdError>
where
    F: FnMut(&DynMatrix<c64>, f64, &SvdSettings, &mut dyn Diagnostics) -> Result<Svd, SvdError>,
{
    match attempt(a, 1.0, settings, &mut *diagnostics) {
        Ok(svd) => return Ok(svd),
        Err(e) if !e.is_recoverable() => return Err(e),
        Err(_) => {}
    }

    let factor = settings.rescale_factor;
    let mut scaled = a.clone();
    for t in 1..=settings.max_retries {
        scaled *= c64::new(factor, 0.0);
        let scale = factor.powi(t as i32);
        diagnostics.record(SvdEvent::Retry { attempt: t, scale });

        match attempt(&scaled, scale, settings, &mut *diagnostics) {
            Ok(mut svd) => {
                svd.unscale(scale, t);
                return Ok(svd);
            }
            Err(e) if !e.is_recoverable() => return Err(e),
            Err(_) => {}
        }
    }

    Err(SvdError::RetriesExhausted {
        attempts: settings.max_retries + 1,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::NoDiagnostics;
    use crate::linalg::svd::solve_scaled;
    use crate::linalg::RESCALE_FACTOR;

    fn diag2(a: f64, b: f64) -> DynMatrix<c64> {
        DynMatrix::from_diag(2, 2, &[c64::new(a, 0.0), c64::new(b, 0.0)])
    }

    #[test]
    fn first_attempt_success_is_untouched() {
        let a = diag2(2.0, 1.0);
        let mut events: Vec<SvdEvent> = Vec::new();
        let svd = retry_with_rescale(&a, &SvdSettings::default(), &mut events, solve_scaled)
            .unwrap();
        assert_eq!(svd.singular_values(), &[2.0, 1.0]);
        assert_eq!(svd.rescalings(), 0);
        assert!(!events.iter().any(|e| matches!(e, SvdEvent::Retry { .. })));
    }

    #[test]
    fn rescaled_success_divides_singular_values() {
        // Fails until the input has been scaled past 1e3, i.e. twice by 1e2
        let a = diag2(2.0, 1.0);
        let mut calls = 0;
        let mut events: Vec<SvdEvent> = Vec::new();
        let svd = retry_with_rescale(&a, &SvdSettings::default(), &mut events, |m, k, s, d| {
            calls += 1;
            if m.max_modulus() < 1e3 {
                Err(SvdError::DegenerateRotation { index: 1 })
            } else {
                solve_scaled(m, k, s, d)
            }
        })
        .unwrap();

        assert_eq!(calls, 3);
        assert_eq!(svd.rescalings(), 2);
        assert_eq!(svd.singular_values(), &[2.0, 1.0]);
        let retries: Vec<SvdEvent> = events
            .into_iter()
            .filter(|e| matches!(e, SvdEvent::Retry { .. }))
            .collect();
        assert_eq!(
            retries,
            vec![
                SvdEvent::Retry { attempt: 1, scale: 1e2 },
                SvdEvent::Retry { attempt: 2, scale: 1e4 },
            ]
        );
    }

    #[test]
    fn exhaustion_is_an_error() {
        let settings = SvdSettings {
            max_retries: 3,
            ..SvdSettings::default()
        };
        let mut calls = 0;
        let err = retry_with_rescale(&diag2(1.0, 1.0), &settings, &mut NoDiagnostics, |_, _, _, _| {
            calls += 1;
            Err(SvdError::NoConvergence { index: 0 })
        })
        .unwrap_err();
        assert_eq!(err, SvdError::RetriesExhausted { attempts: 4 });
        assert_eq!(calls, 4);
    }

    #[test]
    fn unrecoverable_error_is_not_retried() {
        let mut calls = 0;
        let err = retry_with_rescale(
            &diag2(1.0, 1.0),
            &SvdSettings::default(),
            &mut NoDiagnostics,
            |_, _, _, _| {
                calls += 1;
                Err(SvdError::ResidualMismatch { max_residual: 1.0 })
            },
        )
        .unwrap_err();
        assert_eq!(err, SvdError::ResidualMismatch { max_residual: 1.0 });
        assert_eq!(calls, 1);
    }

    #[test]
    fn attempts_receive_accumulated_scale() {
        let a = diag2(2.0, 1.0);
        let mut seen = Vec::new();
        let svd = retry_with_rescale(&a, &SvdSettings::default(), &mut NoDiagnostics, |m, k, s, d| {
            seen.push(k);
            if k < 1e4 {
                return Err(SvdError::NoConvergence { index: 0 });
            }
            solve_scaled(m, k, s, d)
        })
        .unwrap();

        assert_eq!(seen, vec![1.0, RESCALE_FACTOR, RESCALE_FACTOR * RESCALE_FACTOR]);
        assert_eq!(svd.rescalings(), 2);
        assert_eq!(svd.residual(), 0.0);
        assert_eq!(svd.singular_values(), &[2.0, 1.0]);
    }
}
