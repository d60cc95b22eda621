//! Fitting routine for a single dataset.
//!
//! Given:
//! - measured `(t_i, OD600_i)` pairs
//! - the trendline window (a list of measured time points)
//!
//! we:
//! - look up the OD600 reading at each window time (exact value match)
//! - take `ln` of every reading (all must be positive)
//! - draw the straight line through them in `(t, ln OD600)` space
//! - map the line back to OD600 units at every window time
//!
//! Interior window points are returned in `trend_values` and drawn on the
//! trendline, but they do not influence slope or intercept.

use tracing::debug;

use crate::domain::{Dataset, FitResult, GrowthModel};
use crate::error::FitError;
use crate::math::{ln_positive, two_point_line};
use crate::models::{doubling_time, trendline};

/// OD600 readings at each trend time point, in trend order.
///
/// Each trend time must match exactly one measured time point. Zero matches or
/// several matches (duplicate time points) are both errors; we never guess.
pub fn extract_trend_values(dataset: &Dataset) -> Result<Vec<f64>, FitError> {
    dataset
        .trend_time_points
        .iter()
        .map(|&t| {
            let mut matches = dataset
                .time_points
                .iter()
                .zip(dataset.density_values.iter())
                .filter(|&(&time, _)| time == t)
                .map(|(_, &density)| density);

            match (matches.next(), matches.count()) {
                (None, _) => Err(FitError::TrendPointNotFound { time: t }),
                (Some(density), 0) => Ok(density),
                (Some(_), extra) => Err(FitError::AmbiguousTrendPoint {
                    time: t,
                    matches: extra + 1,
                }),
            }
        })
        .collect()
}

/// Fit the exponential growth model for one dataset.
pub fn fit_dataset(dataset: &Dataset) -> Result<FitResult, FitError> {
    let trend_values = extract_trend_values(dataset)?;
    let times = &dataset.trend_time_points;

    let (Some(&t_first), Some(&t_last)) = (times.first(), times.last()) else {
        return Err(FitError::EmptyWindow);
    };
    // Interior window points sit on a log axis too, so all of them must be positive.
    let mut ln_values = Vec::with_capacity(trend_values.len());
    for (&time, &value) in times.iter().zip(trend_values.iter()) {
        ln_values.push(ln_positive(value).ok_or(FitError::NonPositiveDensity { time, value })?);
    }
    let (Some(&ln_first), Some(&ln_last)) = (ln_values.first(), ln_values.last()) else {
        return Err(FitError::EmptyWindow);
    };

    if t_first == t_last {
        return Err(FitError::DegenerateWindow { time: t_first });
    }
    let (slope, intercept) =
        two_point_line(t_first, ln_first, t_last, ln_last).ok_or(FitError::NonFiniteFit)?;

    let model = GrowthModel { slope, intercept };
    let trendline = trendline(&model, times);
    let doubling_time = doubling_time(&model);

    debug!(
        dataset = %dataset.name,
        slope,
        intercept,
        doubling_time,
        "fitted growth model"
    );

    Ok(FitResult {
        model,
        trend_values,
        trendline,
        doubling_time,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SeriesColor;

    fn dataset(time: &[f64], density: &[f64], trend: &[f64]) -> Dataset {
        Dataset {
            index: 0,
            name: "test".to_string(),
            color: SeriesColor::Blue,
            time_points: time.to_vec(),
            density_values: density.to_vec(),
            trend_time_points: trend.to_vec(),
            std_devs: None,
        }
    }

    fn lb_culture(trend: &[f64]) -> Dataset {
        dataset(
            &[0.0, 30.0, 60.0, 90.0, 120.0, 150.0, 180.0, 1440.0],
            &[0.038, 0.042, 0.066, 0.112, 0.2, 0.3, 0.37, 2.6],
            trend,
        )
    }

    #[test]
    fn extracts_in_trend_order() {
        let d = lb_culture(&[150.0, 30.0, 90.0]);
        assert_eq!(extract_trend_values(&d).unwrap(), vec![0.3, 0.042, 0.112]);
    }

    #[test]
    fn duplicate_time_point_is_ambiguous() {
        let d = dataset(&[0.0, 30.0, 30.0, 60.0], &[0.1, 0.2, 0.21, 0.4], &[0.0, 30.0]);
        assert_eq!(
            extract_trend_values(&d).unwrap_err(),
            FitError::AmbiguousTrendPoint { time: 30.0, matches: 2 }
        );
    }

    #[test]
    fn unmatched_trend_point_is_an_error() {
        let d = dataset(&[0.0, 30.0], &[0.1, 0.2], &[0.0, 45.0]);
        assert_eq!(
            fit_dataset(&d).unwrap_err(),
            FitError::TrendPointNotFound { time: 45.0 }
        );
    }

    #[test]
    fn lb_culture_window_30_to_150() {
        let fit = fit_dataset(&lb_culture(&[30.0, 150.0])).unwrap();

        let expected_slope = (0.3_f64.ln() - 0.042_f64.ln()) / 120.0;
        assert_eq!(fit.trend_values, vec![0.042, 0.3]);
        assert!((fit.slope() - expected_slope).abs() < 1e-15);
        assert!((fit.slope() - 0.016384).abs() < 1e-6);

        let td = fit.doubling_time.unwrap();
        assert!((td - 42.3056).abs() < 1e-3);
        assert!(((fit.slope() * td).exp() - 2.0).abs() < 1e-12);
    }

    #[test]
    fn trendline_passes_through_window_endpoints() {
        let fit = fit_dataset(&lb_culture(&[30.0, 60.0, 90.0, 120.0, 150.0])).unwrap();

        assert_eq!(fit.trendline.len(), 5);
        let (t0, v0) = fit.trendline[0];
        let (t1, v1) = fit.trendline[4];
        assert_eq!((t0, t1), (30.0, 150.0));
        assert!((v0 - 0.042).abs() < 1e-12);
        assert!((v1 - 0.3).abs() < 1e-12);
    }

    #[test]
    fn interior_points_do_not_change_the_fit() {
        let endpoints = fit_dataset(&lb_culture(&[30.0, 150.0])).unwrap();
        let full = fit_dataset(&lb_culture(&[30.0, 60.0, 90.0, 120.0, 150.0])).unwrap();
        assert_eq!(endpoints.model, full.model);
    }

    #[test]
    fn declining_density_has_no_doubling_time() {
        let d = dataset(&[0.0, 60.0], &[0.5, 0.25], &[0.0, 60.0]);
        let fit = fit_dataset(&d).unwrap();
        assert!(fit.slope() < 0.0);
        assert!(fit.doubling_time.is_none());
        assert_eq!(fit.status(), crate::domain::GrowthStatus::NonPositive);
    }

    #[test]
    fn flat_density_has_no_doubling_time() {
        let d = dataset(&[0.0, 60.0], &[0.2, 0.2], &[0.0, 60.0]);
        let fit = fit_dataset(&d).unwrap();
        assert_eq!(fit.slope(), 0.0);
        assert!(fit.doubling_time.is_none());
    }

    #[test]
    fn non_positive_density_is_an_error() {
        let d = dataset(&[0.0, 30.0, 60.0], &[0.0, 0.1, 0.2], &[0.0, 60.0]);
        assert_eq!(
            fit_dataset(&d).unwrap_err(),
            FitError::NonPositiveDensity { time: 0.0, value: 0.0 }
        );
    }

    #[test]
    fn identical_window_endpoints_are_degenerate() {
        let d = dataset(&[0.0, 30.0, 60.0], &[0.1, 0.2, 0.4], &[30.0, 60.0, 30.0]);
        assert_eq!(
            fit_dataset(&d).unwrap_err(),
            FitError::DegenerateWindow { time: 30.0 }
        );
    }
}
