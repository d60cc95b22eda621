//! Dataset alignment checks.
//!
//! Batch-level rules (any failure rejects the whole update, nothing is plotted):
//! 1. time, density and trendline set counts are equal
//! 2. std-dev set count matches the density set count (when supplied)
//! 3. name count matches the density set count (after defaulting)
//!
//! plus the structural per-dataset lengths (time vs. density, std-dev vs.
//! density), which are also batch-fatal.
//!
//! Per-dataset rule (only that dataset is skipped):
//! 4. the trendline window has at least two points and every one of them is a
//!    measured time point

use tracing::{debug, warn};

use crate::domain::{observed_points, Dataset, ParsedSeries, RejectedDataset, SeriesColor};
use crate::error::{DatasetError, ValidationError};

/// Validate parsed series and build datasets.
///
/// The outer `Result` carries batch-fatal failures. Each inner entry is either
/// a dataset ready for fitting or a rejected one, in input order.
pub fn validate(parsed: ParsedSeries) -> Result<Vec<Result<Dataset, RejectedDataset>>, ValidationError> {
    let ParsedSeries {
        time_sets,
        density_sets,
        trend_time_sets,
        std_dev_sets,
        names,
    } = parsed;

    let n = density_sets.len();
    if time_sets.len() != n || trend_time_sets.len() != n {
        return Err(ValidationError::SetCountMismatch {
            time: time_sets.len(),
            density: n,
            trend: trend_time_sets.len(),
        });
    }

    if let Some(std_dev_sets) = &std_dev_sets {
        if std_dev_sets.len() != n {
            return Err(ValidationError::StdDevCountMismatch {
                std_dev: std_dev_sets.len(),
                density: n,
            });
        }
    }

    let names = resolve_names(names, n)?;

    for (i, name) in names.iter().enumerate() {
        if time_sets[i].len() != density_sets[i].len() {
            return Err(ValidationError::PointCountMismatch {
                dataset: name.clone(),
                time: time_sets[i].len(),
                density: density_sets[i].len(),
            });
        }
        if let Some(std_devs) = std_dev_sets.as_ref().map(|s| &s[i]) {
            if std_devs.len() != density_sets[i].len() {
                return Err(ValidationError::StdDevLengthMismatch {
                    dataset: name.clone(),
                    std_dev: std_devs.len(),
                    density: density_sets[i].len(),
                });
            }
        }
    }

    let mut std_dev_iter = std_dev_sets.map(Vec::into_iter);
    let datasets = time_sets
        .into_iter()
        .zip(density_sets)
        .zip(trend_time_sets)
        .zip(names)
        .enumerate()
        .map(|(index, (((time_points, density_values), trend_time_points), name))| {
            let std_devs = std_dev_iter.as_mut().and_then(Iterator::next);
            let color = SeriesColor::for_index(index);

            match check_trend_window(&time_points, &trend_time_points) {
                Ok(()) => Ok(Dataset {
                    index,
                    name,
                    color,
                    time_points,
                    density_values,
                    trend_time_points,
                    std_devs,
                }),
                Err(error) => {
                    warn!(dataset = %name, %error, "skipping dataset");
                    Err(RejectedDataset {
                        index,
                        observed: observed_points(&time_points, &density_values, std_devs.as_deref()),
                        name,
                        color,
                        trend_time_points,
                        error,
                    })
                }
            }
        })
        .collect::<Vec<_>>();

    debug!(
        datasets = datasets.len(),
        rejected = datasets.iter().filter(|d| d.is_err()).count(),
        "validated datasets"
    );

    Ok(datasets)
}

/// Names for each dataset: the supplied list (blank entries defaulted) or
/// `Dataset 1..=n`.
fn resolve_names(names: Option<Vec<String>>, n: usize) -> Result<Vec<String>, ValidationError> {
    let Some(names) = names else {
        return Ok((1..=n).map(default_name).collect());
    };

    if names.len() != n {
        return Err(ValidationError::NameCountMismatch {
            names: names.len(),
            datasets: n,
        });
    }

    Ok(names
        .into_iter()
        .enumerate()
        .map(|(i, name)| if name.is_empty() { default_name(i + 1) } else { name })
        .collect())
}

fn default_name(one_based: usize) -> String {
    format!("Dataset {one_based}")
}

/// Rule 4: at least two trend points, each one a measured time point.
fn check_trend_window(time_points: &[f64], trend_time_points: &[f64]) -> Result<(), DatasetError> {
    if trend_time_points.len() < 2 {
        return Err(DatasetError::TooFewTrendPoints {
            found: trend_time_points.len(),
        });
    }
    for &t in trend_time_points {
        if !time_points.contains(&t) {
            return Err(DatasetError::TrendPointNotFound { time: t });
        }
    }
    Ok(())
}
