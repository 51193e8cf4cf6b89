/// Clamp `t` into `[0, 1]`. NaN maps to `0`.
pub fn clamp01(t: f64) -> f64 {
    if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) }
}

/// Linear interpolation from `a` to `b` (unclamped).
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Inverse of [`lerp`]: where `v` sits between `a` and `b`.
///
/// A degenerate span (`a == b`) returns `0` for `v < a` and `1` otherwise.
pub fn inverse_lerp(a: f64, b: f64, v: f64) -> f64 {
    let span = b - a;
    if span == 0.0 {
        return if v < a { 0.0 } else { 1.0 };
    }
    (v - a) / span
}

/// Map `v` from `[in_lo, in_hi]` to `[out_lo, out_hi]`, clamping to the output range.
pub fn remap_clamped(v: f64, in_lo: f64, in_hi: f64, out_lo: f64, out_hi: f64) -> f64 {
    lerp(out_lo, out_hi, clamp01(inverse_lerp(in_lo, in_hi, v)))
}

/// Round half toward positive infinity (`floor(x + 0.5)`).
pub(crate) fn round_half_up(x: f64) -> f64 {
    (x + 0.5).floor()
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
