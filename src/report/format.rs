//! Formatted terminal output: run summary, per-dataset messages, fit table.
//!
//! We keep formatting code in one place so:
//! - the parsing/fitting code stays clean and testable
//! - output changes are localized (important for snapshot tests)

use crate::app::pipeline::GrowthRun;
use crate::domain::DatasetOutcome;
use crate::report::{outcome_message, MessageLevel};

/// Format the run summary (dataset counts + display settings).
pub fn format_run_summary(run: &GrowthRun) -> String {
    let total = run.outcomes.len();
    let plotted = run.plotted().count();
    let [x0, x1] = run.x_bounds();
    let [y0, y1] = run.y_bounds();

    let mut out = String::new();
    out.push_str("=== growth - OD600 Growth Curves ===\n");
    out.push_str(&format!(
        "Datasets: {total} | plotted: {plotted} | skipped: {}\n",
        total - plotted
    ));
    out.push_str(&format!(
        "Trend lines: {}\n",
        if run.show_trendlines { "shown" } else { "hidden" }
    ));
    out.push_str(&format!(
        "Axes: time=[{x0:.1}, {x1:.1}] min | OD600=[{y0}, {y1}] (log)\n"
    ));
    out.push('\n');
    out.push_str(&format_fit_table(&run.outcomes));

    out
}

/// Format one message line per dataset, in input order.
pub fn format_outcomes(run: &GrowthRun) -> String {
    let mut out = String::new();
    out.push_str("Doubling times:\n");
    for outcome in &run.outcomes {
        let msg = outcome_message(outcome);
        let tag = match msg.level {
            MessageLevel::Success => "ok",
            MessageLevel::Warning => "warn",
            MessageLevel::Error => "skip",
        };
        out.push_str(&format!("[{tag:<4}] {}\n", msg.text));
    }
    out
}

/// Format the per-dataset fit table.
pub fn format_fit_table(outcomes: &[DatasetOutcome]) -> String {
    let mut out = String::new();
    out.push_str(
        format!(
            "{:<28} {:<7} {:>3} {:>13} {:>10} {:>10} {:>9}\n",
            "dataset", "color", "n", "window (min)", "slope/min", "intercept", "Td (min)"
        )
        .trim_end(),
    );
    out.push('\n');

    out.push_str(
        format!(
            "{:-<28} {:-<7} {:-<3} {:-<13} {:-<10} {:-<10} {:-<9}\n",
            "", "", "", "", "", "", ""
        )
        .trim_end(),
    );
    out.push('\n');

    for o in outcomes {
        let (slope, intercept, td) = match o.fit() {
            Some(fit) => (
                format!("{:.6}", fit.slope()),
                format!("{:.4}", fit.intercept()),
                fit.doubling_time
                    .map(|v| format!("{v:.2}"))
                    .unwrap_or_else(|| "-".to_string()),
            ),
            None => ("-".to_string(), "-".to_string(), "-".to_string()),
        };
        out.push_str(
            format!(
                "{:<28} {:<7} {:>3} {:>13} {:>10} {:>10} {:>9}\n",
                truncate(&o.name, 28),
                o.color.name(),
                o.observed.len(),
                fmt_window(&o.trend_time_points),
                slope,
                intercept,
                td,
            )
            .trim_end(),
        );
        out.push('\n');
    }

    out
}

fn fmt_window(times: &[f64]) -> String {
    match (times.first(), times.last()) {
        (Some(a), Some(b)) => format!("{a}-{b}"),
        _ => "-".to_string(),
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::pipeline::run_growth;
    use crate::data::demo_input;
    use crate::domain::RawSeriesText;

    #[test]
    fn summary_counts_and_axes() {
        let run = run_growth(&demo_input(), false).unwrap();
        let txt = format_run_summary(&run);

        assert!(txt.contains("Datasets: 2 | plotted: 2 | skipped: 0\n"));
        assert!(txt.contains("Trend lines: hidden\n"));
        assert!(txt.contains("Axes: time=[-50.0, 1514.5] min | OD600=[0.01, 6] (log)\n"));
    }

    #[test]
    fn fit_table_rows() {
        let run = run_growth(&demo_input(), true).unwrap();
        let table = format_fit_table(&run.outcomes);
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("dataset"));
        assert!(lines[2].starts_with("Sample C (LB + ara + Glu)    blue"));
        assert!(lines[2].contains("30-150"));
        assert!(lines[2].contains("0.016384"));
        assert!(lines[2].ends_with("42.31"));
        assert!(lines[3].starts_with("Sample E (LB)"));
        assert!(lines[3].ends_with("46.91"));
    }

    #[test]
    fn outcomes_list_skipped_datasets_inline() {
        let raw = RawSeriesText {
            time: "0,30,60;0,30,60".to_string(),
            density: "0.1,0.2,0.4;0.4,0.2,0.1".to_string(),
            trend_time: "0,90;0,60".to_string(),
            ..RawSeriesText::default()
        };
        let run = run_growth(&raw, true).unwrap();
        let txt = format_outcomes(&run);

        assert_eq!(
            txt,
            concat!(
                "Doubling times:\n",
                "[skip] Error: trendline time point 90 does not match valid OD600 data points in dataset Dataset 1.\n",
                "[warn] Dataset 2: Growth rate is non-positive; doubling time cannot be calculated.\n",
            )
        );
    }

    #[test]
    fn truncate_long_names() {
        assert_eq!(truncate("abcdef", 4), "abc.");
        assert_eq!(truncate("abc", 4), "abc");
    }
}
