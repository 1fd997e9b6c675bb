use crate::c64;
use crate::diagnostics::{Diagnostics, SvdEvent};
use crate::traits::MatrixMut;

use super::rotation::{chase_rotation, rescaled_combination, rotate_cols, shift_root};
use super::SvdError;

/// Diagonalize a real upper bidiagonal matrix by implicitly shifted QR sweeps.
///
/// `s` is the diagonal and `t` the superdiagonal, with `t[k]` coupling
/// `s[k-1]` and `s[k]` and `t[0] == 0`. Left rotations are accumulated into
/// the columns of `u`, right rotations into the columns of `v`, so that
/// `B = U·diag(s)·Vᵀ` holds throughout for the rotation parts.
///
/// On success `s` holds the singular values, unsorted and possibly
/// negative. Entries are treated as zero below `eta · max_k (s[k] + t[k])`.
///
/// At most `max_sweeps` shifted QR steps are taken over the whole matrix.
pub(crate) fn bidiagonal_qr(
    s: &mut [f64],
    t: &mut [f64],
    u: &mut impl MatrixMut<c64>,
    v: &mut impl MatrixMut<c64>,
    eta: f64,
    max_sweeps: usize,
    diagnostics: &mut dyn Diagnostics,
) -> Result<(), SvdError> {
    let n = s.len();
    debug_assert_eq!(t.len(), n);

    let mut eps = 0.0_f64;
    for k in 0..n {
        eps = eps.max(s[k] + t[k]);
    }
    eps *= eta;
    if eps == 0.0 {
        diagnostics.record(SvdEvent::ZeroMatrix);
        return Ok(());
    }

    let mut sweeps = 0usize;

    for k in (0..n).rev() {
        loop {
            // ── Split test ──
            // Walk up from k looking for a negligible superdiagonal (the
            // block below is decoupled) or a negligible diagonal (which
            // must first be chased out of the block).
            let mut l = k;
            let cancel = loop {
                if t[l].abs() < eps || l == 0 {
                    break false;
                }
                if s[l - 1].abs() < eps {
                    break true;
                }
                l -= 1;
            };

            if cancel {
                let l1 = l - 1;
                let mut cs = 0.0;
                let mut sn = 1.0;
                for i in l..=k {
                    let f = sn * t[i];
                    t[i] *= cs;
                    if f.abs() < eps {
                        break;
                    }
                    let h = s[i];
                    let w = (f * f + h * h).sqrt();
                    s[i] = w;
                    cs = h / w;
                    sn = -f / w;
                    rotate_cols(u, l1, i, cs, sn);
                }
            }

            if l == k {
                break;
            }

            sweeps += 1;
            if sweeps > max_sweeps {
                diagnostics.record(SvdEvent::SweepLimit {
                    index: k,
                    sweeps: max_sweeps,
                });
                return Err(SvdError::NoConvergence { index: k });
            }

            // ── Shift from the trailing 2×2 ──
            let mut x = s[l];
            let w = s[k];
            let y = s[k - 1];
            let g = t[k - 1];
            let h = t[k];
            let mut f = ((y - w) * (y + w) + (g - h) * (g + h)) / (2.0 * h * y);
            let g = shift_root(f);
            f = ((x - w) * (x + w) + (y / (f + g) - h) * h) / x;

            // ── Chase the bulge down to k ──
            let mut cs = 1.0;
            let mut sn = 1.0;
            for i in (l + 1)..=k {
                let mut g = t[i];
                let mut y = s[i];
                let mut h = sn * g;
                g *= cs;

                let w = (h * h + f * f).sqrt();
                if w == 0.0 {
                    diagnostics.record(SvdEvent::DegenerateRotation { index: i, h, f });
                    return Err(SvdError::DegenerateRotation { index: i });
                }
                t[i - 1] = w;
                cs = f / w;
                sn = h / w;
                f = x * cs + g * sn;

                let rescued = if f == 0.0 {
                    let rescaled = rescaled_combination(x, cs, g, sn);
                    diagnostics.record(SvdEvent::RescuedRotation { index: i, rescaled });
                    rescaled
                } else {
                    0.0
                };

                g = g * cs - x * sn;
                h = y * sn;
                y *= cs;
                rotate_cols(v, i - 1, i, cs, sn);

                let rot = match chase_rotation(h, f, rescued) {
                    Some(rot) => rot,
                    None => {
                        diagnostics.record(SvdEvent::DegenerateRotation { index: i, h, f });
                        return Err(SvdError::DegenerateRotation { index: i });
                    }
                };
                s[i - 1] = rot.w;
                cs = rot.cs;
                sn = rot.sn;
                f = cs * g + sn * y;
                x = cs * y - sn * g;
                rotate_cols(u, i - 1, i, cs, sn);
            }

            t[l] = 0.0;
            t[k] = f;
            s[k] = x;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::NoDiagnostics;
    use crate::linalg::{CONVERGENCE_ETA, MAX_SWEEPS_PER_DIM};
    use crate::DynMatrix;

    fn zero() -> c64 {
        c64::new(0.0, 0.0)
    }

    fn bidiagonal(s: &[f64], t: &[f64]) -> DynMatrix<c64> {
        let n = s.len();
        DynMatrix::from_fn(n, n, |i, j| {
            if i == j {
                c64::new(s[i], 0.0)
            } else if j == i + 1 {
                c64::new(t[j], 0.0)
            } else {
                zero()
            }
        })
    }

    fn diagonalize(s: &[f64], t: &[f64]) -> (Vec<f64>, DynMatrix<c64>, DynMatrix<c64>) {
        let n = s.len();
        let mut s = s.to_vec();
        let mut t = t.to_vec();
        let mut u = DynMatrix::eye(n, zero());
        let mut v = DynMatrix::eye(n, zero());
        bidiagonal_qr(
            &mut s,
            &mut t,
            &mut u,
            &mut v,
            CONVERGENCE_ETA,
            MAX_SWEEPS_PER_DIM * n,
            &mut NoDiagnostics,
        )
        .unwrap();
        (s, u, v)
    }

    fn reconstruct(s: &[f64], u: &DynMatrix<c64>, v: &DynMatrix<c64>) -> DynMatrix<c64> {
        let n = s.len();
        let sc: Vec<c64> = s.iter().map(|&x| c64::new(x, 0.0)).collect();
        &(u * &DynMatrix::from_diag(n, n, &sc)) * &v.adjoint()
    }

    #[test]
    fn already_diagonal() {
        let (s, u, v) = diagonalize(&[1.0, 3.0], &[0.0, 0.0]);
        assert_eq!(s, vec![1.0, 3.0]);
        assert_eq!(u, DynMatrix::eye(2, zero()));
        assert_eq!(v, DynMatrix::eye(2, zero()));
    }

    #[test]
    fn golden_ratio_pair() {
        // [[1, 1], [0, 1]] has singular values φ and 1/φ
        let (s, u, v) = diagonalize(&[1.0, 1.0], &[0.0, 1.0]);
        let phi = (1.0 + 5.0_f64.sqrt()) / 2.0;
        let mut mags: Vec<f64> = s.iter().map(|x| x.abs()).collect();
        mags.sort_by(|a, b| b.partial_cmp(a).unwrap());
        assert!((mags[0] - phi).abs() < 1e-12);
        assert!((mags[1] - 1.0 / phi).abs() < 1e-12);

        let b = bidiagonal(&[1.0, 1.0], &[0.0, 1.0]);
        assert!(reconstruct(&s, &u, &v).max_abs_diff(&b) < 1e-12);
    }

    #[test]
    fn reconstructs_larger_bidiagonal() {
        let s0 = [4.0, 3.0, 2.0, 1.0, 0.5];
        let t0 = [0.0, 1.0, -0.5, 2.0, 0.25];
        let (s, u, v) = diagonalize(&s0, &t0);
        let b = bidiagonal(&s0, &t0);
        assert!(reconstruct(&s, &u, &v).max_abs_diff(&b) < 1e-12);
        let vtv = &v.adjoint() * &v;
        assert!(vtv.max_abs_diff(&DynMatrix::eye(5, zero())) < 1e-12);
    }

    #[test]
    fn zero_diagonal_is_chased_out() {
        // A zero on the diagonal forces the cancellation path
        let s0 = [1.0, 0.0, 2.0];
        let t0 = [0.0, 1.0, 1.0];
        let (s, u, v) = diagonalize(&s0, &t0);
        let b = bidiagonal(&s0, &t0);
        assert!(reconstruct(&s, &u, &v).max_abs_diff(&b) < 1e-12);
        assert!(s.iter().any(|x| x.abs() < 1e-12), "rank 2 matrix keeps a zero");
    }

    #[test]
    fn zero_matrix_is_reported() {
        let mut s = vec![0.0; 2];
        let mut t = vec![0.0; 2];
        let mut u = DynMatrix::eye(2, zero());
        let mut v = DynMatrix::eye(2, zero());
        let mut events: Vec<SvdEvent> = Vec::new();
        bidiagonal_qr(&mut s, &mut t, &mut u, &mut v, CONVERGENCE_ETA, 60, &mut events).unwrap();
        assert_eq!(events, vec![SvdEvent::ZeroMatrix]);
        assert_eq!(s, vec![0.0, 0.0]);
    }

    #[test]
    fn sweep_budget_exhausted() {
        let mut s = vec![1.0, 1.0];
        let mut t = vec![0.0, 1.0];
        let mut u = DynMatrix::eye(2, zero());
        let mut v = DynMatrix::eye(2, zero());
        let mut events: Vec<SvdEvent> = Vec::new();
        let err = bidiagonal_qr(&mut s, &mut t, &mut u, &mut v, CONVERGENCE_ETA, 0, &mut events)
            .unwrap_err();
        assert_eq!(err, SvdError::NoConvergence { index: 1 });
        assert!(err.is_recoverable());
        assert_eq!(events, vec![SvdEvent::SweepLimit { index: 1, sweeps: 0 }]);
    }
}
