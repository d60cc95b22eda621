//! Read/write growth-curve JSON files.
//!
//! Curve JSON is the "portable" representation of a run:
//! - one entry per fitted dataset (skipped datasets are left out)
//! - model parameters (slope/intercept in `ln OD600` space) and doubling time
//! - the observed points, so `growth plot` can redraw them
//! - a precomputed trendline grid across the trend window for quick plotting
//!
//! The schema is defined by `domain::GrowthFile`.

use std::fs::File;
use std::path::Path;

use chrono::Utc;

use crate::app::pipeline::GrowthRun;
use crate::domain::{CurveEntry, CurveGrid, DatasetOutcome, FitResult, GrowthFile};
use crate::error::AppError;
use crate::models::predict;

const GRID_POINTS: usize = 101;

/// Write a curve JSON file.
pub fn write_curve_json(path: &Path, run: &GrowthRun) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(4, format!("Failed to create curve JSON '{}': {e}", path.display())))?;

    let curve = growth_file(run);

    serde_json::to_writer_pretty(file, &curve)
        .map_err(|e| AppError::new(4, format!("Failed to write curve JSON: {e}")))?;

    Ok(())
}

/// Read a curve JSON file.
pub fn read_curve_json(path: &Path) -> Result<GrowthFile, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(4, format!("Failed to open curve JSON '{}': {e}", path.display())))?;
    let curve: GrowthFile =
        serde_json::from_reader(file).map_err(|e| AppError::new(4, format!("Invalid curve JSON: {e}")))?;
    Ok(curve)
}

/// Build the serializable view of a run.
pub fn growth_file(run: &GrowthRun) -> GrowthFile {
    let datasets = run
        .outcomes
        .iter()
        .filter_map(|o| o.fit().map(|fit| curve_entry(o, fit)))
        .collect();

    GrowthFile {
        tool: "growth".to_string(),
        generated: Utc::now(),
        datasets,
    }
}

fn curve_entry(outcome: &DatasetOutcome, fit: &FitResult) -> CurveEntry {
    let (t0, t1) = match (outcome.trend_time_points.first(), outcome.trend_time_points.last()) {
        (Some(&a), Some(&b)) => (a, b),
        _ => (0.0, 0.0),
    };
    CurveEntry {
        name: outcome.name.clone(),
        color: outcome.color,
        model: fit.model,
        doubling_time_min: fit.doubling_time,
        observed: outcome.observed.clone(),
        grid: build_grid(fit, t0, t1, GRID_POINTS),
    }
}

fn build_grid(fit: &FitResult, t0: f64, t1: f64, n: usize) -> CurveGrid {
    let n = n.max(2);
    let mut time_min = Vec::with_capacity(n);
    let mut od600 = Vec::with_capacity(n);

    for i in 0..n {
        let u = i as f64 / (n as f64 - 1.0);
        let t = t0 + u * (t1 - t0);
        time_min.push(t);
        od600.push(predict(&fit.model, t));
    }

    CurveGrid { time_min, od600 }
}
