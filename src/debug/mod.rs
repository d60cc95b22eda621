//! Debug bundle writer for inspecting raw inputs and per-dataset fits.
//!
//! A bundle is a single Markdown file under `./debug/` holding everything needed
//! to reproduce an update: the five raw text fields verbatim, then for each
//! dataset its message, observed points, trend window, and fitted model.

use std::fs::{create_dir_all, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Local;

use crate::app::pipeline::GrowthRun;
use crate::error::AppError;
use crate::models::predict;
use crate::report::outcome_message;

pub fn write_debug_bundle(run: &GrowthRun) -> Result<PathBuf, AppError> {
    write_debug_bundle_in(Path::new("debug"), run)
}

pub fn write_debug_bundle_in(dir: &Path, run: &GrowthRun) -> Result<PathBuf, AppError> {
    create_dir_all(dir).map_err(|e| AppError::new(4, format!("Failed to create debug dir: {e}")))?;

    let ts = Local::now().format("%Y%m%d_%H%M%S");
    let path = dir.join(format!("growth_debug_{ts}.md"));

    let mut file = File::create(&path).map_err(|e| AppError::new(4, format!("Failed to create debug file: {e}")))?;
    write_bundle(&mut file, run).map_err(|e| AppError::new(4, format!("Failed to write debug: {e}")))?;

    Ok(path)
}

fn write_bundle(out: &mut impl Write, run: &GrowthRun) -> std::io::Result<()> {
    writeln!(out, "# growth debug bundle")?;
    writeln!(out, "- generated: {}", Local::now().to_rfc3339())?;
    writeln!(out, "- datasets: {}", run.outcomes.len())?;
    writeln!(out, "- plotted: {}", run.plotted().count())?;
    writeln!(out, "- show_trendlines: {}", run.show_trendlines)?;

    writeln!(out, "\n## Raw input")?;
    writeln!(out, "```text")?;
    writeln!(out, "time:       {}", run.raw.time)?;
    writeln!(out, "od600:      {}", run.raw.density)?;
    writeln!(out, "trend_time: {}", run.raw.trend_time)?;
    writeln!(out, "std_dev:    {}", run.raw.std_dev)?;
    writeln!(out, "names:      {}", run.raw.names)?;
    writeln!(out, "```")?;

    for o in &run.outcomes {
        writeln!(out, "\n## Dataset {}: {} ({})", o.index + 1, o.name, o.color)?;
        writeln!(out, "{}", outcome_message(o).text)?;
        writeln!(out, "- trend window: {}", fmt_vec(&o.trend_time_points))?;

        if let Some(fit) = o.fit() {
            writeln!(
                out,
                "- model: slope={:.6}/min, intercept={:.6}, Td={}",
                fit.slope(),
                fit.intercept(),
                fmt_opt(fit.doubling_time)
            )?;
            writeln!(out, "- trend values: {}", fmt_vec(&fit.trend_values))?;
        }

        writeln!(out, "\n| time_min | od600 | std_dev | fitted |")?;
        writeln!(out, "| - | - | - | - |")?;
        for p in &o.observed {
            let fitted = o.fit().map(|fit| predict(&fit.model, p.time));
            writeln!(
                out,
                "| {} | {} | {} | {} |",
                p.time,
                p.density,
                p.std_dev.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string()),
                fmt_opt(fitted)
            )?;
        }
    }

    Ok(())
}

fn fmt_vec(values: &[f64]) -> String {
    let parts: Vec<String> = values.iter().map(|v| v.to_string()).collect();
    format!("[{}]", parts.join(", "))
}

fn fmt_opt(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{v:.3}"),
        _ => "-".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::pipeline::run_growth;
    use crate::data::demo_input;

    #[test]
    fn bundle_contains_inputs_and_fits() {
        let run = run_growth(&demo_input(), true).unwrap();
        let dir = tempfile::tempdir().unwrap();

        let path = write_debug_bundle_in(dir.path(), &run).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();

        assert!(path.file_name().unwrap().to_string_lossy().starts_with("growth_debug_"));
        assert!(text.starts_with("# growth debug bundle\n"));
        assert!(text.contains("trend_time: 30,60,90,120,150; 30,60,90,120,150"));
        assert!(text.contains("## Dataset 1: Sample C (LB + ara + Glu) (blue)"));
        assert!(text.contains("Sample C (LB + ara + Glu) Doubling Time (Td): 42.31 minutes"));
        assert!(text.contains("- trend window: [30, 60, 90, 120, 150]"));
        assert!(text.contains("| 1440 | 2.6 | 0.07 |"));
    }

    #[test]
    fn skipped_dataset_has_no_model_line() {
        let raw = crate::domain::RawSeriesText {
            time: "0,30".to_string(),
            density: "0.1,0.2".to_string(),
            trend_time: "0,45".to_string(),
            ..Default::default()
        };
        let run = run_growth(&raw, true).unwrap();
        let mut buf = Vec::new();
        write_bundle(&mut buf, &run).unwrap();
        let text = String::from_utf8(buf).unwrap();

        assert!(text.contains("Error: trendline time point 45 does not match valid OD600 data points"));
        assert!(!text.contains("- model:"));
        assert!(text.contains("| 30 | 0.2 | - | - |"));
    }
}
