//! Log-linear fitting primitives.
//!
//! Exponential growth `y(t) = exp(m·t + b)` is a straight line in `(t, ln y)`:
//!
//! ```text
//! m = (ln y1 - ln y0) / (t1 - t0)
//! b = ln y0 - m·t0
//! ```
//!
//! Only the two supplied points determine the line. Callers choose which points
//! to pass (the window endpoints).

use std::f64::consts::LN_2;

/// Natural log of a strictly positive, finite value.
///
/// Returns `None` for zero, negative, or non-finite inputs.
pub fn ln_positive(v: f64) -> Option<f64> {
    if v.is_finite() && v > 0.0 {
        Some(v.ln())
    } else {
        None
    }
}

/// Slope and intercept of the line through `(t0, ln_y0)` and `(t1, ln_y1)`.
///
/// Returns `None` if `t0 == t1` (vertical line) or the result is not finite.
pub fn two_point_line(t0: f64, ln_y0: f64, t1: f64, ln_y1: f64) -> Option<(f64, f64)> {
    let dt = t1 - t0;
    if dt == 0.0 {
        return None;
    }
    let slope = (ln_y1 - ln_y0) / dt;
    let intercept = ln_y0 - slope * t0;
    if slope.is_finite() && intercept.is_finite() {
        Some((slope, intercept))
    } else {
        None
    }
}

/// Time for an exponential with rate `rate` to double: `ln 2 / rate`.
///
/// Undefined (`None`) unless the rate is strictly positive.
pub fn doubling_time(rate: f64) -> Option<f64> {
    if rate.is_finite() && rate > 0.0 {
        Some(LN_2 / rate)
    } else {
        None
    }
}
