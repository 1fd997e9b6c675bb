//! Givens rotations and the floating-point safeguards of the QR sweep.
//!
//! The thresholds here are empirical: they stop round-off noise near a
//! degenerate shift or an underflowed rotation from being read as exact
//! structure. They are not part of the textbook algorithm.

use crate::c64;
use crate::traits::MatrixMut;

/// Shift parameters `f` above `-SHIFT_SIGN_TOL` take the positive root.
///
/// A plain `f < 0` test flips the root for values that are zero up to
/// rounding, which sends the sweep towards the wrong singular value.
pub const SHIFT_SIGN_TOL: f64 = 1e-13;

/// Both rotation components below this magnitude make a rotation suspect.
pub const DEGENERATE_ROTATION_TOL: f64 = 1e-13;

/// Factor applied to every operand before recomputing an underflowed product.
pub const UNDERFLOW_RESCALE: f64 = 1e30;

/// A plane rotation `[cs sn; -sn cs]` together with the norm `w` it produces.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Rotation {
    pub w: f64,
    pub cs: f64,
    pub sn: f64,
}

/// `±√(f² + 1)`, negative only when `f < -SHIFT_SIGN_TOL`.
#[inline]
pub(crate) fn shift_root(f: f64) -> f64 {
    let g = (f * f + 1.0).sqrt();
    if f < -SHIFT_SIGN_TOL {
        -g
    } else {
        g
    }
}

/// `x·cs + g·sn` evaluated with each operand scaled by [`UNDERFLOW_RESCALE`].
///
/// Non-zero when the unscaled value vanished only because the products
/// were subnormal.
#[inline]
pub(crate) fn rescaled_combination(x: f64, cs: f64, g: f64, sn: f64) -> f64 {
    let r = UNDERFLOW_RESCALE;
    (x * r) * (cs * r) + (g * r) * (sn * r)
}

/// Left rotation of a chase step, annihilating `h` against `f`.
///
/// `rescued` is the result of [`rescaled_combination`] when `f` came out
/// exactly zero, and `0.0` otherwise. When both components are tiny but the
/// rescued value shows `f` only underflowed, the identity rotation is used.
/// Returns `None` when the denominator is genuinely zero.
pub(crate) fn chase_rotation(h: f64, f: f64, rescued: f64) -> Option<Rotation> {
    let tiny = h.abs() < DEGENERATE_ROTATION_TOL
        && f.abs() < DEGENERATE_ROTATION_TOL
        && rescued != 0.0;
    let w = (h * h + f * f).sqrt();
    if tiny {
        Some(Rotation { w, cs: 1.0, sn: 0.0 })
    } else if w == 0.0 {
        None
    } else {
        Some(Rotation { w, cs: f / w, sn: h / w })
    }
}

/// Rotate columns `a` and `b`: `(x, y) ← (x·cs + y·sn, y·cs − x·sn)`.
pub(crate) fn rotate_cols(m: &mut impl MatrixMut<c64>, a: usize, b: usize, cs: f64, sn: f64) {
    for row in 0..m.nrows() {
        let x = *m.get(row, a);
        let y = *m.get(row, b);
        *m.get_mut(row, a) = x * cs + y * sn;
        *m.get_mut(row, b) = y * cs - x * sn;
    }
}
