//! Export per-point results to CSV.
//!
//! The export is meant to be easy to consume in spreadsheets or downstream scripts.
//! Every observed point of every dataset is written, including datasets that
//! were skipped (their `fitted_od600` column is empty).

use std::path::Path;

use crate::app::pipeline::GrowthRun;
use crate::error::AppError;
use crate::models::predict;

const HEADER: [&str; 6] = [
    "dataset",
    "time_min",
    "od600",
    "std_dev",
    "in_trend_window",
    "fitted_od600",
];

/// Write per-point results to a CSV file.
pub fn write_results_csv(path: &Path, run: &GrowthRun) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_path(path)
        .map_err(|e| AppError::new(4, format!("Failed to create export CSV '{}': {e}", path.display())))?;

    writer
        .write_record(HEADER)
        .map_err(|e| AppError::new(4, format!("Failed to write export CSV header: {e}")))?;

    for o in &run.outcomes {
        for p in &o.observed {
            let in_window = o.trend_time_points.contains(&p.time);
            let fitted = o
                .fit()
                .map(|fit| format!("{:.6}", predict(&fit.model, p.time)))
                .unwrap_or_default();
            writer
                .write_record([
                    o.name.clone(),
                    p.time.to_string(),
                    p.density.to_string(),
                    p.std_dev.map(|v| v.to_string()).unwrap_or_default(),
                    in_window.to_string(),
                    fitted,
                ])
                .map_err(|e| AppError::new(4, format!("Failed to write export CSV row: {e}")))?;
        }
    }

    writer
        .flush()
        .map_err(|e| AppError::new(4, format!("Failed to flush export CSV: {e}")))?;

    Ok(())
}
