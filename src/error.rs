//! Error types.
//!
//! `AppError` is the boundary type: a message plus the process exit code the
//! binary should return. The pipeline stages use typed enums so each stage can
//! be tested on its own; batch-fatal ones convert into `AppError`.
//!
//! Exit codes:
//! - 2: malformed input text (parse)
//! - 3: misaligned datasets (validation)
//! - 4: I/O, terminal, or export failures

use thiserror::Error;

use crate::domain::InputField;

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

impl From<ParseError> for AppError {
    fn from(err: ParseError) -> Self {
        AppError::new(
            2,
            format!("Error: Please ensure all inputs are valid numbers and properly formatted ({err})."),
        )
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::new(3, format!("Error: {err}"))
    }
}

/// Failure to turn the raw text fields into numbers. Always batch-fatal.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("the {field} field is required")]
    MissingField { field: InputField },

    #[error("{field} set {dataset}, value {position}: '{token}' is not a number")]
    InvalidNumber {
        field: InputField,
        dataset: usize,
        position: usize,
        token: String,
    },

    #[error("{field} set {dataset}, value {position}: '{token}' is not a finite number")]
    NonFinite {
        field: InputField,
        dataset: usize,
        position: usize,
        token: String,
    },
}

/// Cross-series alignment failure. Always batch-fatal: nothing is plotted.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error(
        "Each dataset must have the same number of time, density, and trendline sets \
         (time={time}, density={density}, trendline={trend})."
    )]
    SetCountMismatch {
        time: usize,
        density: usize,
        trend: usize,
    },

    #[error(
        "If provided, standard deviations must match the number of OD600 datasets \
         (std-dev={std_dev}, density={density})."
    )]
    StdDevCountMismatch { std_dev: usize, density: usize },

    #[error("Number of dataset names must match the number of datasets (names={names}, datasets={datasets}).")]
    NameCountMismatch { names: usize, datasets: usize },

    #[error("Dataset {dataset} has {time} time points but {density} OD600 values.")]
    PointCountMismatch {
        dataset: String,
        time: usize,
        density: usize,
    },

    #[error("Dataset {dataset} has {std_dev} standard deviations but {density} OD600 values.")]
    StdDevLengthMismatch {
        dataset: String,
        std_dev: usize,
        density: usize,
    },
}

/// Fitting failure for a single dataset. Never fatal to the batch.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FitError {
    #[error("trendline time point {time} does not match any measured time point")]
    TrendPointNotFound { time: f64 },

    #[error("trendline time point {time} matches {matches} measured time points")]
    AmbiguousTrendPoint { time: f64, matches: usize },

    #[error("OD600 value {value} at t={time} is not positive, so its logarithm is undefined")]
    NonPositiveDensity { time: f64, value: f64 },

    #[error("the trendline window starts and ends at t={time}, so the growth rate is undefined")]
    DegenerateWindow { time: f64 },

    #[error("the trendline window is empty")]
    EmptyWindow,

    #[error("the fitted growth model is not finite")]
    NonFiniteFit,
}

/// Why a single dataset was excluded from plotting.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DatasetError {
    #[error("a trendline needs at least 2 time points, got {found}")]
    TooFewTrendPoints { found: usize },

    #[error("trendline time point {time} does not match valid OD600 data points")]
    TrendPointNotFound { time: f64 },

    #[error(transparent)]
    Fit(#[from] FitError),
}
