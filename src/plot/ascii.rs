//! ASCII plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! The OD600 axis is logarithmic with fixed bounds, the time axis is linear.
//!
//! Plot elements (drawn in this order, later ones win):
//! - trendlines: `-` line through the window points
//! - error bars: `|` spanning `OD600 ± std dev`
//! - observed points: the dataset's palette marker (`o`, `x`, `+`, ...)

use crate::app::pipeline::{x_bounds_for, GrowthRun};
use crate::domain::{GrowthFile, ObservedPoint, Y_AXIS_MAX, Y_AXIS_MIN};
use crate::report::{observed_label, trend_label};

/// One dataset as the grid renderer sees it.
struct PlotSeries<'a> {
    marker: char,
    observed: &'a [ObservedPoint],
    trendline: Option<Vec<(f64, f64)>>,
    observed_label: String,
    trend_label: Option<String>,
}

/// Render the plotted datasets of an in-memory run.
///
/// Skipped datasets are left out entirely; trendlines follow `run.show_trendlines`.
pub fn render_ascii_plot(run: &GrowthRun, width: usize, height: usize) -> String {
    let series: Vec<PlotSeries<'_>> = run
        .plotted()
        .map(|o| {
            let trendline = run.visible_trendline(o).map(<[(f64, f64)]>::to_vec);
            PlotSeries {
                marker: o.color.marker(),
                observed: &o.observed,
                trend_label: trendline.as_ref().and_then(|_| trend_label(o)),
                trendline,
                observed_label: observed_label(o),
            }
        })
        .collect();

    let [t_min, t_max] = run.x_bounds();
    render_plot(&series, t_min, t_max, width, height)
}

/// Render a saved growth-curve file (observed points + sampled trend grid).
pub fn render_ascii_plot_from_curve_file(curve: &GrowthFile, width: usize, height: usize) -> String {
    let series: Vec<PlotSeries<'_>> = curve
        .datasets
        .iter()
        .map(|entry| PlotSeries {
            marker: entry.color.marker(),
            observed: &entry.observed,
            trendline: Some(
                entry
                    .grid
                    .time_min
                    .iter()
                    .zip(entry.grid.od600.iter())
                    .map(|(&t, &y)| (t, y))
                    .collect(),
            ),
            observed_label: format!("{} (Observed)", entry.name),
            trend_label: Some(format!("{} Trend (m={:.4})", entry.name, entry.model.slope)),
        })
        .collect();

    let t_max = series
        .iter()
        .flat_map(|s| {
            s.observed
                .iter()
                .map(|p| p.time)
                .chain(s.trendline.iter().flatten().map(|&(t, _)| t))
        })
        .fold(f64::NEG_INFINITY, f64::max);
    let [t_min, t_max] = x_bounds_for(t_max);
    render_plot(&series, t_min, t_max, width, height)
}

fn render_plot(series: &[PlotSeries<'_>], t_min: f64, t_max: f64, width: usize, height: usize) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let mut grid = vec![vec![' '; width]; height];

    // Trendlines first so points and bars can overlay.
    for s in series {
        if let Some(line) = &s.trendline {
            draw_curve(&mut grid, line, t_min, t_max);
        }
    }

    for s in series {
        for p in s.observed {
            if let Some(sd) = p.std_dev {
                draw_error_bar(&mut grid, p, sd, t_min, t_max);
            }
        }
    }

    for s in series {
        for p in s.observed {
            // Nothing to place on a log axis.
            if p.density <= 0.0 {
                continue;
            }
            let x = map_x(p.time, t_min, t_max, width);
            let y = map_y(p.density, height);
            grid[y][x] = s.marker;
        }
    }

    let mut out = String::new();
    out.push_str(&format!(
        "Plot: time=[{t_min:.1}, {t_max:.1}] min | OD600=[{Y_AXIS_MIN}, {Y_AXIS_MAX}] (log)\n"
    ));

    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }

    for s in series {
        out.push_str(&format!("  {} {}\n", s.marker, s.observed_label));
        if let Some(label) = &s.trend_label {
            out.push_str(&format!("  - {label}\n"));
        }
    }

    out
}

fn map_x(t: f64, t_min: f64, t_max: f64, width: usize) -> usize {
    let width = width.max(2);
    let u = ((t - t_min) / (t_max - t_min)).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

/// Row for an OD600 value on the fixed log axis. Out-of-range values clamp to the edges.
fn map_y(y: f64, height: usize) -> usize {
    let height = height.max(2);
    let (lo, hi) = (Y_AXIS_MIN.ln(), Y_AXIS_MAX.ln());
    let ln_y = if y > 0.0 { y.ln() } else { lo };
    let u = ((ln_y - lo) / (hi - lo)).clamp(0.0, 1.0);
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

fn draw_curve(grid: &mut [Vec<char>], curve: &[(f64, f64)], t_min: f64, t_max: f64) {
    if curve.len() < 2 {
        return;
    }
    let height = grid.len();
    let width = grid[0].len();

    let mut prev = None;
    for &(t, y) in curve {
        let x = map_x(t, t_min, t_max, width);
        let yy = map_y(y, height);
        if let Some((x0, y0)) = prev {
            draw_line(grid, x0, y0, x, yy, '-');
        } else {
            grid[yy][x] = '-';
        }
        prev = Some((x, yy));
    }
}

fn draw_error_bar(grid: &mut [Vec<char>], p: &ObservedPoint, sd: f64, t_min: f64, t_max: f64) {
    let height = grid.len();
    let x = map_x(p.time, t_min, t_max, grid[0].len());
    // The lower end may fall to or below zero; clamp it to the axis floor.
    let lower = (p.density - sd).max(Y_AXIS_MIN);
    let top = map_y(p.density + sd, height);
    let bottom = map_y(lower, height);
    draw_line(grid, x, top, x, bottom, '|');
}

/// Integer line drawing (Bresenham-ish).
fn draw_line(grid: &mut [Vec<char>], x0: usize, y0: usize, x1: usize, y1: usize, ch: char) {
    let mut x0 = x0 as isize;
    let mut y0 = y0 as isize;
    let x1 = x1 as isize;
    let y1 = y1 as isize;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if y0 >= 0
            && (y0 as usize) < grid.len()
            && x0 >= 0
            && (x0 as usize) < grid[0].len()
            && grid[y0 as usize][x0 as usize] == ' '
        {
            grid[y0 as usize][x0 as usize] = ch;
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}
