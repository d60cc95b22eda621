//! Evaluation of a fitted `GrowthModel`.
//!
//! The fitter produces `(slope, intercept)` in log space; everything that
//! draws or exports the curve goes through `predict` to get back to OD600 units.

use crate::domain::GrowthModel;
use crate::math::doubling_time as doubling_time_for_rate;

/// `ln OD600(t)` under the model.
pub fn predict_ln(model: &GrowthModel, t: f64) -> f64 {
    model.slope * t + model.intercept
}

/// `OD600(t) = exp(slope·t + intercept)`.
pub fn predict(model: &GrowthModel, t: f64) -> f64 {
    predict_ln(model, t).exp()
}

/// Evaluate the model at each time, returning `(t, OD600)` pairs.
pub fn trendline(model: &GrowthModel, times: &[f64]) -> Vec<(f64, f64)> {
    times.iter().map(|&t| (t, predict(model, t))).collect()
}

/// Doubling time in minutes, or `None` for non-positive growth.
pub fn doubling_time(model: &GrowthModel) -> Option<f64> {
    doubling_time_for_rate(model.slope)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn predict_inverts_log_space() {
        let model = GrowthModel {
            slope: 0.02,
            intercept: -3.0,
        };
        let y = predict(&model, 50.0);
        assert!((y.ln() - (-2.0)).abs() < 1e-12);
    }

    #[test]
    fn trendline_keeps_time_order() {
        let model = GrowthModel {
            slope: 0.0,
            intercept: 0.0,
        };
        let line = trendline(&model, &[30.0, 60.0, 90.0]);
        assert_eq!(line, vec![(30.0, 1.0), (60.0, 1.0), (90.0, 1.0)]);
        assert!(doubling_time(&model).is_none());
    }
}
