/// Tolerance used when comparing sampled animation values.
pub const EPSILON: f64 = 1e-9;

pub(crate) fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

pub(crate) fn approx_eq(a: f64, b: f64, eps: f64) -> bool {
    (a - b).abs() <= eps
}

/// Clamp to `[0, 1]`, mapping NaN to 0.
pub(crate) fn unit(t: f64) -> f64 {
    if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) }
}

pub(crate) fn finite_non_negative(v: f64) -> bool {
    v.is_finite() && v >= 0.0
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
