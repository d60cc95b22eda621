//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during parsing, validation, and fitting
//! - exported to JSON/CSV
//! - reloaded later for plotting

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::SeriesColor;
use crate::error::DatasetError;

/// Lower bound of the (log-scale) OD600 axis.
pub const Y_AXIS_MIN: f64 = 0.01;
/// Upper bound of the (log-scale) OD600 axis.
pub const Y_AXIS_MAX: f64 = 6.0;
/// Left edge of the time axis (minutes). The right edge follows the data.
pub const X_AXIS_MIN: f64 = -50.0;

/// Which text field a numeric token came from (for error messages).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputField {
    Time,
    Density,
    TrendTime,
    StdDev,
}

impl InputField {
    pub fn label(self) -> &'static str {
        match self {
            InputField::Time => "time",
            InputField::Density => "OD600",
            InputField::TrendTime => "trendline time",
            InputField::StdDev => "standard deviation",
        }
    }
}

impl std::fmt::Display for InputField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// The five raw text fields, exactly as typed or pasted.
///
/// `;` separates datasets and `,` separates values within a dataset. `std_dev`
/// and `names` may be blank.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawSeriesText {
    pub time: String,
    pub density: String,
    pub trend_time: String,
    #[serde(default)]
    pub std_dev: String,
    #[serde(default)]
    pub names: String,
}

/// Numeric series after parsing, before any alignment checks.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedSeries {
    pub time_sets: Vec<Vec<f64>>,
    pub density_sets: Vec<Vec<f64>>,
    pub trend_time_sets: Vec<Vec<f64>>,
    /// `None` when the std-dev field was blank.
    pub std_dev_sets: Option<Vec<Vec<f64>>>,
    /// `None` when the names field was blank. Blank segments are kept as empty
    /// strings and defaulted during validation.
    pub names: Option<Vec<String>>,
}

/// One observed measurement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObservedPoint {
    /// Minutes since inoculation.
    pub time: f64,
    /// OD600 reading.
    pub density: f64,
    pub std_dev: Option<f64>,
}

/// One experimental run that passed alignment checks.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    /// Position in the batch (0-based).
    pub index: usize,
    pub name: String,
    pub color: SeriesColor,
    pub time_points: Vec<f64>,
    pub density_values: Vec<f64>,
    /// Subset of `time_points` selecting the fit window.
    pub trend_time_points: Vec<f64>,
    /// Same length as `density_values` when present.
    pub std_devs: Option<Vec<f64>>,
}

impl Dataset {
    pub fn observed(&self) -> Vec<ObservedPoint> {
        observed_points(&self.time_points, &self.density_values, self.std_devs.as_deref())
    }
}

/// A dataset skipped by the validator; siblings are unaffected.
#[derive(Debug, Clone, PartialEq)]
pub struct RejectedDataset {
    pub index: usize,
    pub name: String,
    pub color: SeriesColor,
    pub observed: Vec<ObservedPoint>,
    pub trend_time_points: Vec<f64>,
    pub error: DatasetError,
}

pub(crate) fn observed_points(times: &[f64], densities: &[f64], std_devs: Option<&[f64]>) -> Vec<ObservedPoint> {
    times
        .iter()
        .zip(densities.iter())
        .enumerate()
        .map(|(i, (&time, &density))| ObservedPoint {
            time,
            density,
            std_dev: std_devs.and_then(|s| s.get(i).copied()),
        })
        .collect()
}

/// Exponential growth model `OD600(t) = exp(slope * t + intercept)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GrowthModel {
    /// Growth rate, per minute.
    pub slope: f64,
    /// Intercept in natural-log space.
    pub intercept: f64,
}

/// Whether a doubling time exists for the fitted growth rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrowthStatus {
    Positive,
    /// Growth rate is zero or negative; doubling time is undefined.
    NonPositive,
}

/// Fit output for a single dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct FitResult {
    pub model: GrowthModel,
    /// OD600 readings at each trend time point, in trend order.
    pub trend_values: Vec<f64>,
    /// `(time, fitted OD600)` at every trend time point.
    pub trendline: Vec<(f64, f64)>,
    /// Minutes; `None` when the growth rate is not positive.
    pub doubling_time: Option<f64>,
}

impl FitResult {
    pub fn slope(&self) -> f64 {
        self.model.slope
    }

    pub fn intercept(&self) -> f64 {
        self.model.intercept
    }

    pub fn status(&self) -> GrowthStatus {
        if self.doubling_time.is_some() {
            GrowthStatus::Positive
        } else {
            GrowthStatus::NonPositive
        }
    }
}

/// Everything the presentation layer needs about one dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetOutcome {
    pub index: usize,
    pub name: String,
    pub color: SeriesColor,
    pub observed: Vec<ObservedPoint>,
    pub trend_time_points: Vec<f64>,
    /// `Err` means the dataset is excluded from the plot.
    pub result: Result<FitResult, DatasetError>,
}

impl DatasetOutcome {
    pub fn fit(&self) -> Option<&FitResult> {
        self.result.as_ref().ok()
    }

    pub fn is_plotted(&self) -> bool {
        self.result.is_ok()
    }
}

/// A full run's configuration as understood by the front-ends.
///
/// This is derived from CLI flags (plus defaults).
#[derive(Debug, Clone)]
pub struct GrowthConfig {
    /// Forward trendlines to the plot (does not change the fit).
    pub show_trendlines: bool,
    pub plot: bool,
    pub plot_width: usize,
    pub plot_height: usize,
    pub export_results: Option<PathBuf>,
    pub export_curve: Option<PathBuf>,
    pub debug_bundle: bool,
}

impl Default for GrowthConfig {
    fn default() -> Self {
        Self {
            show_trendlines: true,
            plot: true,
            plot_width: 100,
            plot_height: 25,
            export_results: None,
            export_curve: None,
            debug_bundle: false,
        }
    }
}

/// A saved growth-curve file (JSON).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrowthFile {
    pub tool: String,
    pub generated: DateTime<Utc>,
    pub datasets: Vec<CurveEntry>,
}

/// One fitted dataset inside a `GrowthFile`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurveEntry {
    pub name: String,
    pub color: SeriesColor,
    pub model: GrowthModel,
    pub doubling_time_min: Option<f64>,
    pub observed: Vec<ObservedPoint>,
    pub grid: CurveGrid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurveGrid {
    pub time_min: Vec<f64>,
    pub od600: Vec<f64>,
}
