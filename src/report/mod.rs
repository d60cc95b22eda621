//! Reporting utilities: per-dataset messages and legend labels.
//!
//! Every front-end (CLI printout, TUI message panel, debug bundle) goes through
//! `outcome_message` so the wording stays identical everywhere.

pub mod format;

pub use format::*;

use crate::domain::DatasetOutcome;

/// Severity of a per-dataset message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageLevel {
    /// Doubling time computed.
    Success,
    /// Fitted, but growth rate is not positive.
    Warning,
    /// Dataset skipped.
    Error,
}

/// A user-facing line about one dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub level: MessageLevel,
    pub text: String,
}

/// The message shown for a dataset after an update.
pub fn outcome_message(outcome: &DatasetOutcome) -> Message {
    match &outcome.result {
        Ok(fit) => match fit.doubling_time {
            Some(td) => Message {
                level: MessageLevel::Success,
                text: format!("{} Doubling Time (Td): {td:.2} minutes", outcome.name),
            },
            None => Message {
                level: MessageLevel::Warning,
                text: format!(
                    "{}: Growth rate is non-positive; doubling time cannot be calculated.",
                    outcome.name
                ),
            },
        },
        Err(err) => Message {
            level: MessageLevel::Error,
            text: format!("Error: {err} in dataset {}.", outcome.name),
        },
    }
}

/// Legend label for the observed points.
pub fn observed_label(outcome: &DatasetOutcome) -> String {
    format!("{} (Observed)", outcome.name)
}

/// Legend label for the trendline, or `None` if the fit failed.
pub fn trend_label(outcome: &DatasetOutcome) -> Option<String> {
    outcome
        .fit()
        .map(|fit| format!("{} Trend (m={:.4})", outcome.name, fit.slope()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FitResult, GrowthModel, SeriesColor};
    use crate::error::DatasetError;

    fn outcome(result: Result<FitResult, DatasetError>) -> DatasetOutcome {
        DatasetOutcome {
            index: 0,
            name: "Sample E (LB)".to_string(),
            color: SeriesColor::Blue,
            observed: Vec::new(),
            trend_time_points: vec![30.0, 150.0],
            result,
        }
    }

    fn fit(slope: f64, doubling_time: Option<f64>) -> FitResult {
        FitResult {
            model: GrowthModel { slope, intercept: -3.0 },
            trend_values: vec![0.05, 0.3],
            trendline: vec![(30.0, 0.05), (150.0, 0.3)],
            doubling_time,
        }
    }

    #[test]
    fn success_message_has_two_decimals() {
        let msg = outcome_message(&outcome(Ok(fit(0.0147, Some(46.911733)))));
        assert_eq!(msg.level, MessageLevel::Success);
        assert_eq!(msg.text, "Sample E (LB) Doubling Time (Td): 46.91 minutes");
    }

    #[test]
    fn non_positive_growth_is_a_warning() {
        let msg = outcome_message(&outcome(Ok(fit(-0.01, None))));
        assert_eq!(msg.level, MessageLevel::Warning);
        assert_eq!(
            msg.text,
            "Sample E (LB): Growth rate is non-positive; doubling time cannot be calculated."
        );
    }

    #[test]
    fn skipped_dataset_is_an_error_naming_the_dataset() {
        let msg = outcome_message(&outcome(Err(DatasetError::TrendPointNotFound { time: 45.0 })));
        assert_eq!(msg.level, MessageLevel::Error);
        assert_eq!(
            msg.text,
            "Error: trendline time point 45 does not match valid OD600 data points in dataset Sample E (LB)."
        );
    }

    #[test]
    fn legend_labels() {
        let o = outcome(Ok(fit(0.016384, Some(42.3))));
        assert_eq!(observed_label(&o), "Sample E (LB) (Observed)");
        assert_eq!(trend_label(&o).as_deref(), Some("Sample E (LB) Trend (m=0.0164)"));
    }
}
