use num_traits::Zero;

use crate::c64;
use crate::traits::{MatrixMut, MatrixRef};

/// Fold the stored Householder reflections back into `u` (M×M) and `v` (N×N).
///
/// `reflectors`, `diag` and `super_diag` are the outputs of
/// [`bidiagonalize`](super::bidiagonal::bidiagonalize). Reflections are
/// applied last-to-first, each preceded by undoing its phase
/// transformation. A reflection whose norm was recorded as zero was never
/// applied and is skipped.
pub(crate) fn back_transform(
    reflectors: &impl MatrixRef<c64>,
    diag: &[f64],
    super_diag: &[f64],
    u: &mut impl MatrixMut<c64>,
    v: &mut impl MatrixMut<c64>,
) {
    let a = reflectors;
    let m = a.nrows();
    let n = a.ncols();

    // ── Left reflections into U ──
    for k in (0..n).rev() {
        if diag[k] == 0.0 {
            continue;
        }
        let akk = *a.get(k, k);
        let w = akk.norm();
        let phase = -akk / w;
        for j in 0..m {
            *u.get_mut(k, j) *= phase;
        }
        let denom = w * diag[k];
        for j in 0..m {
            let mut q = c64::zero();
            for i in k..m {
                q += a.get(i, k).conj() * *u.get(i, j);
            }
            q /= denom;
            for i in k..m {
                *u.get_mut(i, j) -= q * *a.get(i, k);
            }
        }
    }

    // ── Right reflections into V ──
    for k in (0..n.saturating_sub(1)).rev() {
        let k1 = k + 1;
        if super_diag[k1] == 0.0 {
            continue;
        }
        let ak_k1 = *a.get(k, k1);
        let w = ak_k1.norm();
        let phase = -ak_k1.conj() / w;
        for j in 0..n {
            *v.get_mut(k1, j) *= phase;
        }
        let denom = w * super_diag[k1];
        for j in 0..n {
            let mut q = c64::zero();
            for i in k1..n {
                q += *a.get(k, i) * *v.get(i, j);
            }
            q /= denom;
            for i in k1..n {
                *v.get_mut(i, j) -= q * a.get(k, i).conj();
            }
        }
    }
}
