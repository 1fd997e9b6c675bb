use num_traits::{One, Zero};

use crate::c64;
use crate::traits::MatrixMut;

// ── Householder bidiagonalization ───────────────────────────────────

/// Reduce an M×N complex matrix (M ≥ N) to real upper bidiagonal form.
///
/// Householder reflections are applied alternately from the left (zeroing
/// column `k` below the diagonal) and from the right (zeroing row `k` right
/// of the superdiagonal). A phase transformation after each reflection
/// keeps the bidiagonal entries real and non-negative.
///
/// On return:
/// - `diag[0..n]` holds the column reflection norms (the bidiagonal diagonal)
/// - `super_diag[0..n]` holds the row reflection norms, `super_diag[k]`
///   coupling `diag[k-1]` and `diag[k]`; `super_diag[0]` is always zero
/// - `reflectors` holds the Householder vectors: column `k` from row `k`
///   down for the left reflections, row `k` from column `k+1` right for
///   the right reflections. The remaining entries are scratch.
///
/// A column or row whose squared norm does not exceed `tol` is left alone
/// and its norm recorded as zero.
pub(crate) fn bidiagonalize(
    reflectors: &mut impl MatrixMut<c64>,
    diag: &mut [f64],
    super_diag: &mut [f64],
    tol: f64,
) {
    let m = reflectors.nrows();
    let n = reflectors.ncols();
    assert!(m >= n, "bidiagonalize requires M >= N");
    assert!(diag.len() >= n && super_diag.len() >= n);
    if n == 0 {
        return;
    }

    let a = reflectors;
    super_diag[0] = 0.0;

    let mut k = 0;
    loop {
        let k1 = k + 1;

        // ── Left reflection: zero out a[k+1:m, k] ──
        let mut z = 0.0;
        for i in k..m {
            z += a.get(i, k).norm_sqr();
        }
        diag[k] = 0.0;

        if tol < z {
            let z = z.sqrt();
            diag[k] = z;
            let akk = *a.get(k, k);
            let w = akk.norm();
            let q = if w == 0.0 { c64::one() } else { akk / w };
            *a.get_mut(k, k) = q * (z + w);

            if k != n - 1 {
                for j in k1..n {
                    let mut q = c64::zero();
                    for i in k..m {
                        q += a.get(i, k).conj() * *a.get(i, j);
                    }
                    q /= z * (z + w);
                    for i in k..m {
                        let vi = *a.get(i, k);
                        *a.get_mut(i, j) -= q * vi;
                    }
                }

                // Phase transformation of the rest of row k
                let akk = *a.get(k, k);
                let q = -akk.conj() / akk.norm();
                for j in k1..n {
                    *a.get_mut(k, j) *= q;
                }
            }
        }

        if k == n - 1 {
            break;
        }

        // ── Right reflection: zero out a[k, k+2:n] ──
        let mut z = 0.0;
        for j in k1..n {
            z += a.get(k, j).norm_sqr();
        }
        super_diag[k1] = 0.0;

        if tol < z {
            let z = z.sqrt();
            super_diag[k1] = z;
            let ak_k1 = *a.get(k, k1);
            let w = ak_k1.norm();
            let q = if w == 0.0 { c64::one() } else { ak_k1 / w };
            *a.get_mut(k, k1) = q * (z + w);

            for i in k1..m {
                let mut q = c64::zero();
                for j in k1..n {
                    q += a.get(k, j).conj() * *a.get(i, j);
                }
                q /= z * (z + w);
                for j in k1..n {
                    let vj = *a.get(k, j);
                    *a.get_mut(i, j) -= q * vj;
                }
            }

            // Phase transformation of the rest of column k1
            let ak_k1 = *a.get(k, k1);
            let q = -ak_k1.conj() / ak_k1.norm();
            for i in k1..m {
                *a.get_mut(i, k1) *= q;
            }
        }

        k = k1;
    }
}
