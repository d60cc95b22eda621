//! Plotters-powered growth-curve chart widget for Ratatui.
//!
//! Why Plotters instead of Ratatui's built-in `Chart` widget?
//! - a real logarithmic OD600 axis (`log_scale()`)
//! - less manual work for ticks/labels
//! - error bars are plain path elements
//!
//! We render Plotters output into the Ratatui buffer using `plotters-ratatui-backend`.

use plotters::prelude::*;
use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

use crate::domain::ObservedPoint;

/// One dataset as drawn on the chart.
pub struct ChartSeries<'a> {
    pub rgb: (u8, u8, u8),
    pub points: &'a [ObservedPoint],
    /// `None` when trendlines are hidden.
    pub trendline: Option<&'a [(f64, f64)]>,
}

/// A lightweight, render-only chart description.
///
/// All series and bounds are computed outside the render call, so `render()`
/// only draws.
pub struct GrowthPlottersChart<'a> {
    pub series: &'a [ChartSeries<'a>],
    /// X bounds (minutes).
    pub x_bounds: [f64; 2],
    /// Y bounds (OD600, log scale; both must be positive).
    pub y_bounds: [f64; 2],
    pub x_label: &'a str,
    pub y_label: &'a str,
    pub fmt_x: fn(f64) -> String,
    pub fmt_y: fn(f64) -> String,
}

impl<'a> Widget for GrowthPlottersChart<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // When the available area is too small, Plotters may fail to build a chart.
        // In that case, we render a small hint rather than panicking.
        if area.width < 20 || area.height < 8 {
            buf.set_string(
                area.x,
                area.y,
                "Chart area too small (resize terminal).",
                Style::default().fg(Color::Yellow),
            );
            return;
        }

        let [x0, x1] = self.x_bounds;
        let [y0, y1] = self.y_bounds;

        if !(x0.is_finite() && x1.is_finite() && y0.is_finite() && y1.is_finite())
            || x1 <= x0
            || y0 <= 0.0
            || y1 <= y0
        {
            return;
        }

        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root)
                .margin(1)
                // Terminal cells are low-res, so keep label areas compact.
                .set_label_area_size(LabelAreaPosition::Left, 6)
                .set_label_area_size(LabelAreaPosition::Bottom, 3)
                .build_cartesian_2d(x0..x1, (y0..y1).log_scale())?;

            chart
                .configure_mesh()
                .disable_x_mesh()
                .disable_y_mesh()
                .x_desc(self.x_label)
                .y_desc(self.y_label)
                .x_labels(5)
                .y_labels(4)
                .x_label_formatter(&|v| (self.fmt_x)(*v))
                .y_label_formatter(&|v| (self.fmt_y)(*v))
                .label_style(("sans-serif", 10).into_font().color(&WHITE))
                .axis_style(&WHITE)
                .bold_line_style(&WHITE)
                .draw()?;

            // 1) Trendlines underneath everything else.
            for s in self.series {
                let color = RGBColor(s.rgb.0, s.rgb.1, s.rgb.2);
                if let Some(line) = s.trendline {
                    chart.draw_series(LineSeries::new(line.iter().copied(), &color))?;
                }
            }

            // 2) Error bars, clamped to the axis floor.
            for s in self.series {
                let color = RGBColor(s.rgb.0, s.rgb.1, s.rgb.2);
                chart.draw_series(s.points.iter().filter_map(|p| {
                    let sd = p.std_dev?;
                    let lo = (p.density - sd).max(y0);
                    let hi = p.density + sd;
                    Some(PathElement::new(vec![(p.time, lo), (p.time, hi)], &color))
                }))?;
            }

            // 3) Observed points.
            //
            // `Pixel` rather than `Circle`: the backend maps circle radii to
            // canvas units incorrectly and draws huge circles.
            for s in self.series {
                let color = RGBColor(s.rgb.0, s.rgb.1, s.rgb.2);
                chart.draw_series(
                    s.points
                        .iter()
                        .filter(|p| p.density > 0.0)
                        .map(|p| Pixel::new((p.time, p.density), color)),
                )?;
            }

            Ok(())
        });

        widget.render(area, buf);
    }
}
