//! Batch fitting: one outcome per dataset, in input order.
//!
//! A dataset that was rejected by the validator, or whose fit fails, becomes an
//! outcome carrying the diagnostic. Its siblings are fitted regardless.

use tracing::warn;

use crate::domain::{Dataset, DatasetOutcome, RejectedDataset};
use crate::error::DatasetError;
use crate::fit::fitter::fit_dataset;

/// Fit every validated dataset.
pub fn fit_batch(validated: Vec<Result<Dataset, RejectedDataset>>) -> Vec<DatasetOutcome> {
    validated.into_iter().map(outcome_for).collect()
}

fn outcome_for(entry: Result<Dataset, RejectedDataset>) -> DatasetOutcome {
    match entry {
        Ok(dataset) => {
            let result: Result<_, DatasetError> = fit_dataset(&dataset).map_err(Into::into);
            if let Err(error) = &result {
                warn!(dataset = %dataset.name, %error, "growth fit failed");
            }
            DatasetOutcome {
                index: dataset.index,
                observed: dataset.observed(),
                name: dataset.name,
                color: dataset.color,
                trend_time_points: dataset.trend_time_points,
                result,
            }
        }
        Err(rejected) => DatasetOutcome {
            index: rejected.index,
            name: rejected.name,
            color: rejected.color,
            observed: rejected.observed,
            trend_time_points: rejected.trend_time_points,
            result: Err(rejected.error),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SeriesColor;
    use crate::error::FitError;

    fn dataset(index: usize, density: &[f64]) -> Dataset {
        Dataset {
            index,
            name: format!("D{index}"),
            color: SeriesColor::for_index(index),
            time_points: vec![0.0, 30.0, 60.0],
            density_values: density.to_vec(),
            trend_time_points: vec![0.0, 60.0],
            std_devs: None,
        }
    }

    #[test]
    fn failing_fit_does_not_stop_siblings() {
        let outcomes = fit_batch(vec![
            Ok(dataset(0, &[-0.1, 0.2, 0.4])),
            Ok(dataset(1, &[0.1, 0.2, 0.4])),
        ]);

        assert_eq!(outcomes.len(), 2);
        assert!(matches!(
            outcomes[0].result,
            Err(DatasetError::Fit(FitError::NonPositiveDensity { .. }))
        ));
        assert!(!outcomes[0].is_plotted());
        assert!(outcomes[1].fit().unwrap().doubling_time.is_some());
        assert_eq!(outcomes[1].color, SeriesColor::Red);
    }

    #[test]
    fn rejected_dataset_keeps_its_diagnostic() {
        let rejected = RejectedDataset {
            index: 0,
            name: "bad".to_string(),
            color: SeriesColor::Blue,
            observed: Vec::new(),
            trend_time_points: vec![15.0, 60.0],
            error: DatasetError::TrendPointNotFound { time: 15.0 },
        };
        let outcomes = fit_batch(vec![Err(rejected), Ok(dataset(1, &[0.1, 0.2, 0.4]))]);

        assert_eq!(
            outcomes[0].result,
            Err(DatasetError::TrendPointNotFound { time: 15.0 })
        );
        assert!(outcomes[1].is_plotted());
    }
}
