//! Shared growth pipeline used by both CLI and TUI front-ends.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! raw text -> parse -> validate -> fit each dataset -> outcomes
//!
//! The CLI and the TUI can then focus on presentation (printing vs widgets).
//! Nothing here is cached: every update recomputes from the raw text.

use tracing::{debug, info};

use crate::domain::{DatasetOutcome, RawSeriesText, X_AXIS_MIN, Y_AXIS_MAX, Y_AXIS_MIN};
use crate::error::AppError;
use crate::fit::fit_batch;
use crate::io::{parse_raw, validate};

/// Right edge used when nothing can be plotted.
const FALLBACK_X_MAX: f64 = 200.0;

/// Fraction of the data span added to the right of the last time point.
const X_PAD_FRAC: f64 = 0.05;

/// All computed outputs of a single update action.
#[derive(Debug, Clone)]
pub struct GrowthRun {
    pub raw: RawSeriesText,
    pub outcomes: Vec<DatasetOutcome>,
    /// Whether trendlines are forwarded to rendering. Fits are computed either way.
    pub show_trendlines: bool,
}

impl GrowthRun {
    /// Outcomes that made it onto the plot (fit succeeded).
    pub fn plotted(&self) -> impl Iterator<Item = &DatasetOutcome> {
        self.outcomes.iter().filter(|o| o.is_plotted())
    }

    /// The trendline to draw for `outcome`, honoring `show_trendlines`.
    pub fn visible_trendline<'a>(&self, outcome: &'a DatasetOutcome) -> Option<&'a [(f64, f64)]> {
        if !self.show_trendlines {
            return None;
        }
        outcome.fit().map(|fit| fit.trendline.as_slice())
    }

    /// Time axis: fixed left edge, right edge from the plotted data.
    pub fn x_bounds(&self) -> [f64; 2] {
        let t_max = self
            .plotted()
            .flat_map(|o| o.observed.iter().map(|p| p.time))
            .fold(f64::NEG_INFINITY, f64::max);
        x_bounds_for(t_max)
    }

    /// OD600 axis bounds (log scale, fixed).
    pub fn y_bounds(&self) -> [f64; 2] {
        [Y_AXIS_MIN, Y_AXIS_MAX]
    }
}

pub(crate) fn x_bounds_for(t_max: f64) -> [f64; 2] {
    if !t_max.is_finite() || t_max <= X_AXIS_MIN {
        return [X_AXIS_MIN, FALLBACK_X_MAX];
    }
    let pad = (t_max - X_AXIS_MIN) * X_PAD_FRAC;
    [X_AXIS_MIN, t_max + pad]
}

/// Execute the full pipeline for one update action.
///
/// Batch-fatal problems (bad numbers, misaligned sets) come back as `Err`;
/// per-dataset problems are inside the returned outcomes.
pub fn run_growth(raw: &RawSeriesText, show_trendlines: bool) -> Result<GrowthRun, AppError> {
    // 1) Parse text into numbers.
    let parsed = parse_raw(raw)?;

    // 2) Check alignment and build datasets.
    let validated = validate(parsed)?;

    // 3) Fit each dataset independently.
    let outcomes = fit_batch(validated);

    let plotted = outcomes.iter().filter(|o| o.is_plotted()).count();
    info!(
        datasets = outcomes.len(),
        plotted,
        skipped = outcomes.len() - plotted,
        "growth update complete"
    );
    debug!(show_trendlines, "trendline forwarding");

    Ok(GrowthRun {
        raw: raw.clone(),
        outcomes,
        show_trendlines,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::demo_input;
    use crate::error::DatasetError;

    fn raw(time: &str, density: &str, trend: &str) -> RawSeriesText {
        RawSeriesText {
            time: time.to_string(),
            density: density.to_string(),
            trend_time: trend.to_string(),
            ..RawSeriesText::default()
        }
    }

    #[test]
    fn demo_run_fits_both_samples() {
        let run = run_growth(&demo_input(), true).unwrap();
        assert_eq!(run.outcomes.len(), 2);
        assert_eq!(run.plotted().count(), 2);

        let td_c = run.outcomes[0].fit().unwrap().doubling_time.unwrap();
        let td_e = run.outcomes[1].fit().unwrap().doubling_time.unwrap();
        assert!((td_c - 42.3056).abs() < 1e-3);
        assert!((td_e - 46.9117).abs() < 1e-3);
    }

    #[test]
    fn count_mismatch_rejects_the_batch() {
        let err = run_growth(&raw("0,30;0,30", "0.1,0.2;0.1,0.2;0.1,0.2", "0,30;0,30"), true).unwrap_err();
        assert_eq!(err.exit_code(), 3);
        assert!(err.message().contains("same number of time, density, and trendline sets"));
    }

    #[test]
    fn bad_number_rejects_the_batch() {
        let err = run_growth(&raw("0,30", "0.1,zero", "0,30"), true).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn bad_trend_window_skips_only_that_dataset() {
        let run = run_growth(&raw("0,30,60;0,30,60", "0.1,0.2,0.4;0.1,0.2,0.4", "0,45;0,60"), true).unwrap();

        assert_eq!(
            run.outcomes[0].result,
            Err(DatasetError::TrendPointNotFound { time: 45.0 })
        );
        assert!(run.outcomes[1].fit().is_some());
        assert_eq!(run.plotted().count(), 1);
    }

    #[test]
    fn trendline_flag_only_affects_forwarding() {
        let shown = run_growth(&demo_input(), true).unwrap();
        let hidden = run_growth(&demo_input(), false).unwrap();

        assert_eq!(shown.outcomes, hidden.outcomes);
        assert!(shown.visible_trendline(&shown.outcomes[0]).is_some());
        assert!(hidden.visible_trendline(&hidden.outcomes[0]).is_none());
    }

    #[test]
    fn x_axis_starts_at_minus_fifty() {
        let run = run_growth(&demo_input(), true).unwrap();
        let [x0, x1] = run.x_bounds();
        assert_eq!(x0, -50.0);
        assert!((x1 - (1440.0 + 1490.0 * 0.05)).abs() < 1e-9);
        assert_eq!(run.y_bounds(), [0.01, 6.0]);
    }
}
