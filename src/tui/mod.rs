//! Ratatui-based terminal UI.
//!
//! The TUI provides an input panel with the five text fields, a "show trend
//! lines" checkbox and an "update graph" action, then renders the log-scale
//! growth chart and one message per dataset.

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
    Terminal,
};
use tracing::debug;

use crate::app::pipeline::{run_growth, GrowthRun};
use crate::domain::{RawSeriesText, Y_AXIS_MAX, Y_AXIS_MIN};
use crate::error::AppError;
use crate::report::{observed_label, outcome_message, trend_label, Message, MessageLevel};

mod plotters_chart;

use plotters_chart::{ChartSeries, GrowthPlottersChart};

/// Log-axis tick values drawn beside the chart.
const Y_TICKS: [f64; 4] = [0.01, 0.1, 1.0, 6.0];

/// Start the TUI with `raw` preloaded into the input fields.
pub fn run(raw: RawSeriesText) -> Result<(), AppError> {
    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::new(4, format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(raw);
    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::new(4, format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::new(4, format!("Failed to enter alternate screen: {e}")));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

/// One selectable row of the input panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Item {
    Time,
    Density,
    TrendTime,
    StdDev,
    Names,
    ShowTrendlines,
    Update,
}

impl Item {
    const ALL: [Item; 7] = [
        Item::Time,
        Item::Density,
        Item::TrendTime,
        Item::StdDev,
        Item::Names,
        Item::ShowTrendlines,
        Item::Update,
    ];

    fn label(self) -> &'static str {
        match self {
            Item::Time => "Time (min)",
            Item::Density => "OD600",
            Item::TrendTime => "Trend times",
            Item::StdDev => "Std dev",
            Item::Names => "Names",
            Item::ShowTrendlines => "Show trend lines",
            Item::Update => "Update graph",
        }
    }

    /// Longer prompt shown above the editor.
    fn prompt(self) -> &'static str {
        match self {
            Item::Time => "Time points in minutes (semicolon-separated sets)",
            Item::Density => "OD600 values for each dataset (semicolon-separated sets)",
            Item::TrendTime => "Time points for the trendline in minutes (semicolon-separated sets)",
            Item::StdDev => "Standard deviations for OD600 (semicolon-separated sets, optional)",
            Item::Names => "Dataset names (semicolon-separated, optional)",
            Item::ShowTrendlines | Item::Update => "",
        }
    }

    fn is_text(self) -> bool {
        !matches!(self, Item::ShowTrendlines | Item::Update)
    }
}

struct App {
    raw: RawSeriesText,
    show_trendlines: bool,
    selected: usize,
    /// Edit buffer while a text field is being edited.
    editing: Option<String>,
    status: String,
    run: Option<GrowthRun>,
    /// Batch-fatal error from the last update.
    error: Option<String>,
}

impl App {
    fn new(raw: RawSeriesText) -> Self {
        let mut app = Self {
            raw,
            show_trendlines: true,
            selected: 0,
            editing: None,
            status: String::new(),
            run: None,
            error: None,
        };
        app.update();
        app
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::new(4, format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::new(4, format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| AppError::new(4, format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code) {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Returns `true` when the app should quit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        if self.editing.is_some() {
            self.handle_edit(code);
            return false;
        }

        match code {
            KeyCode::Char('q') => return true,
            KeyCode::Up => {
                if self.selected > 0 {
                    self.selected -= 1;
                }
            }
            KeyCode::Down => {
                if self.selected + 1 < Item::ALL.len() {
                    self.selected += 1;
                }
            }
            KeyCode::Enter => match self.selected_item() {
                Item::ShowTrendlines => self.toggle_trendlines(),
                Item::Update => self.update(),
                item => {
                    self.editing = Some(self.field(item).to_string());
                    self.status = format!("Editing {}. Enter to apply, Esc to cancel.", item.label());
                }
            },
            KeyCode::Char(' ') if self.selected_item() == Item::ShowTrendlines => self.toggle_trendlines(),
            KeyCode::Char('t') => self.toggle_trendlines(),
            KeyCode::Char('u') => self.update(),
            KeyCode::Char('r') => {
                self.raw = crate::data::demo_input();
                self.update();
                self.status = "Reset inputs to demo data.".to_string();
            }
            KeyCode::Char('d') => {
                if let Some(run) = &self.run {
                    match crate::debug::write_debug_bundle(run) {
                        Ok(path) => {
                            self.status = format!("Wrote debug bundle: {}", path.display());
                        }
                        Err(err) => {
                            self.status = format!("Debug write failed: {err}");
                        }
                    }
                } else {
                    self.status = "Nothing to dump: the last update failed.".to_string();
                }
            }
            _ => {}
        }

        false
    }

    fn handle_edit(&mut self, code: KeyCode) {
        let item = self.selected_item();
        match code {
            KeyCode::Esc => {
                self.editing = None;
                self.status = "Edit canceled.".to_string();
            }
            KeyCode::Enter => {
                if let (Some(text), Some(field)) = (self.editing.take(), self.field_mut(item)) {
                    *field = text;
                }
                self.status = format!("{} updated. Press u to update the graph.", item.label());
            }
            KeyCode::Backspace => {
                if let Some(buffer) = self.editing.as_mut() {
                    buffer.pop();
                }
            }
            KeyCode::Char(c) => {
                if let Some(buffer) = self.editing.as_mut() {
                    buffer.push(c);
                }
            }
            _ => {}
        }
    }

    fn selected_item(&self) -> Item {
        Item::ALL[self.selected.min(Item::ALL.len() - 1)]
    }

    fn field(&self, item: Item) -> &str {
        match item {
            Item::Time => &self.raw.time,
            Item::Density => &self.raw.density,
            Item::TrendTime => &self.raw.trend_time,
            Item::StdDev => &self.raw.std_dev,
            Item::Names => &self.raw.names,
            Item::ShowTrendlines | Item::Update => "",
        }
    }

    /// The text field behind `item`, or `None` for the checkbox and button rows.
    fn field_mut(&mut self, item: Item) -> Option<&mut String> {
        match item {
            Item::Time => Some(&mut self.raw.time),
            Item::Density => Some(&mut self.raw.density),
            Item::TrendTime => Some(&mut self.raw.trend_time),
            Item::StdDev => Some(&mut self.raw.std_dev),
            Item::Names => Some(&mut self.raw.names),
            Item::ShowTrendlines | Item::Update => None,
        }
    }

    /// Trendline visibility only affects forwarding, so it applies to the
    /// current graph without recomputing.
    fn toggle_trendlines(&mut self) {
        self.show_trendlines = !self.show_trendlines;
        if let Some(run) = &mut self.run {
            run.show_trendlines = self.show_trendlines;
        }
        self.status = format!(
            "Trend lines {}.",
            if self.show_trendlines { "shown" } else { "hidden" }
        );
    }

    /// The "update graph" action: recompute everything from the raw text.
    fn update(&mut self) {
        match run_growth(&self.raw, self.show_trendlines) {
            Ok(run) => {
                self.status = format!(
                    "Updated: {} dataset(s), {} plotted.",
                    run.outcomes.len(),
                    run.plotted().count()
                );
                self.run = Some(run);
                self.error = None;
            }
            Err(err) => {
                debug!(exit_code = err.exit_code(), "update rejected");
                self.status = "Update failed.".to_string();
                self.run = None;
                self.error = Some(err.message().to_string());
            }
        }
    }

    fn messages(&self) -> Vec<Message> {
        if let Some(err) = &self.error {
            return vec![Message {
                level: MessageLevel::Error,
                text: err.clone(),
            }];
        }
        self.run
            .as_ref()
            .map(|run| run.outcomes.iter().map(outcome_message).collect())
            .unwrap_or_default()
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_body(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let mut lines: Vec<Line> = Vec::new();
        lines.push(Line::from(vec![
            Span::styled("growth", Style::default().fg(Color::Cyan)),
            Span::raw(" - Multi-Plot OD600 Growth Curve Visualization"),
        ]));

        let summary = match &self.run {
            Some(run) => format!(
                "datasets: {} | plotted: {} | trend lines: {}",
                run.outcomes.len(),
                run.plotted().count(),
                if run.show_trendlines { "on" } else { "off" }
            ),
            None => "no graph".to_string(),
        };
        lines.push(Line::from(Span::styled(summary, Style::default().fg(Color::Gray))));

        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_body(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
            .split(area);

        let left = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(Item::ALL.len() as u16 + 2),
                Constraint::Length(6),
                Constraint::Min(0),
            ])
            .split(cols[0]);

        self.draw_inputs(frame, left[0]);
        self.draw_editor(frame, left[1]);
        self.draw_messages(frame, left[2]);
        self.draw_chart(frame, cols[1]);
    }

    fn draw_inputs(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let items: Vec<ListItem> = Item::ALL
            .iter()
            .map(|&item| match item {
                Item::ShowTrendlines => ListItem::new(format!(
                    "[{}] {}",
                    if self.show_trendlines { "x" } else { " " },
                    item.label()
                )),
                Item::Update => ListItem::new(Span::styled(
                    format!("< {} >", item.label()),
                    Style::default().add_modifier(Modifier::BOLD),
                )),
                _ => ListItem::new(format!("{:<12} {}", item.label(), self.field(item))),
            })
            .collect();

        let list = List::new(items)
            .block(Block::default().title("Inputs").borders(Borders::ALL))
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
            .highlight_symbol("» ");

        let mut state = ratatui::widgets::ListState::default();
        state.select(Some(self.selected));
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn draw_editor(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let item = self.selected_item();
        let (title, body, style) = match &self.editing {
            Some(buffer) => (
                format!("Editing: {}", item.prompt()),
                format!("{buffer}_"),
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
            None if item.is_text() => (item.prompt().to_string(), self.field(item).to_string(), Style::default()),
            None => (String::new(), String::new(), Style::default()),
        };

        let p = Paragraph::new(body)
            .style(style)
            .wrap(Wrap { trim: false })
            .block(Block::default().title(title).borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_messages(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let lines: Vec<Line> = self
            .messages()
            .into_iter()
            .map(|m| Line::from(Span::styled(m.text, Style::default().fg(level_color(m.level)))))
            .collect();

        let p = Paragraph::new(Text::from(lines))
            .wrap(Wrap { trim: true })
            .block(Block::default().title("Results").borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_chart(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default().title("OD600 Growth Curves").borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        let Some(run) = &self.run else {
            let msg = Paragraph::new("No graph. Fix the inputs and press u to update.")
                .style(Style::default().fg(Color::Yellow))
                .block(Block::default());
            frame.render_widget(msg, inner);
            return;
        };

        let legend = legend_lines(run);
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(legend.len() as u16)])
            .split(inner);

        let series: Vec<ChartSeries<'_>> = run
            .plotted()
            .map(|o| ChartSeries {
                rgb: o.color.rgb(),
                points: &o.observed,
                trendline: run.visible_trendline(o),
            })
            .collect();
        let x_bounds = run.x_bounds();
        let y_bounds = run.y_bounds();

        let (chart_rect, insets) = chart_layout(rows[0]);
        let widget = GrowthPlottersChart {
            series: &series,
            x_bounds,
            y_bounds,
            x_label: "time (min)",
            y_label: "OD600",
            fmt_x: fmt_axis_x,
            fmt_y: fmt_axis_y_od,
        };

        frame.render_widget(widget, chart_rect);
        if let Some(insets) = insets {
            draw_axis_ticks(frame, rows[0], chart_rect, insets, x_bounds);
        }
        frame.render_widget(Paragraph::new(Text::from(legend)), rows[1]);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = if self.editing.is_some() {
            "type to edit  Backspace delete  Enter apply  Esc cancel"
        } else {
            "↑/↓ select  Enter edit/toggle/update  u update  t trend lines  r demo data  d debug  q quit"
        };
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

fn level_color(level: MessageLevel) -> Color {
    match level {
        MessageLevel::Success => Color::Green,
        MessageLevel::Warning => Color::Yellow,
        MessageLevel::Error => Color::Red,
    }
}

/// Legend: one line per plotted dataset, observed label plus trend label when shown.
fn legend_lines(run: &GrowthRun) -> Vec<Line<'static>> {
    run.plotted()
        .map(|o| {
            let (r, g, b) = o.color.rgb();
            let style = Style::default().fg(Color::Rgb(r, g, b));
            let mut spans = vec![Span::styled(format!("● {}", observed_label(o)), style)];
            if run.visible_trendline(o).is_some() {
                if let Some(label) = trend_label(o) {
                    spans.push(Span::styled(format!("  ─ {label}"), style));
                }
            }
            Line::from(spans)
        })
        .collect()
}

fn fmt_axis_x(v: f64) -> String {
    format!("{v:.0}")
}

fn fmt_axis_y_od(v: f64) -> String {
    format!("{v}")
}

#[derive(Debug, Clone, Copy)]
struct AxisInsets {
    left: u16,
    right: u16,
    top: u16,
    bottom: u16,
}

fn chart_layout(inner: Rect) -> (Rect, Option<AxisInsets>) {
    let insets = AxisInsets {
        left: 7,
        right: 2,
        top: 1,
        bottom: 2,
    };

    if inner.width <= insets.left + insets.right + 10
        || inner.height <= insets.top + insets.bottom + 5
    {
        return (inner, None);
    }

    let rect = Rect {
        x: inner.x + insets.left,
        y: inner.y + insets.top,
        width: inner.width - insets.left - insets.right,
        height: inner.height - insets.top - insets.bottom,
    };

    (rect, Some(insets))
}

/// Fraction of the chart height (0 = bottom, 1 = top) for an OD600 value.
fn log_fraction(y: f64) -> f64 {
    let (lo, hi) = (Y_AXIS_MIN.ln(), Y_AXIS_MAX.ln());
    ((y.ln() - lo) / (hi - lo)).clamp(0.0, 1.0)
}

fn draw_axis_ticks(
    frame: &mut ratatui::Frame<'_>,
    inner: Rect,
    chart: Rect,
    insets: AxisInsets,
    x_bounds: [f64; 2],
) {
    let ticks = 5usize;
    let style = Style::default().fg(Color::Gray);

    for i in 0..ticks {
        let u = i as f64 / (ticks as f64 - 1.0);
        let x_val = x_bounds[0] + u * (x_bounds[1] - x_bounds[0]);
        let x = chart.x + ((chart.width - 1) as f64 * u).round() as u16;
        let label = fmt_axis_x(x_val);
        let label_len = label.len() as u16;
        let start = x.saturating_sub((label.len() / 2) as u16);
        let y = chart.y + chart.height;
        if y >= inner.y + inner.height - 1 {
            continue;
        }
        frame.render_widget(
            Paragraph::new(label).style(style),
            Rect {
                x: start,
                y,
                width: label_len,
                height: 1,
            },
        );
    }

    for y_val in Y_TICKS {
        let u = log_fraction(y_val);
        let y = chart.y + (chart.height - 1) - ((chart.height - 1) as f64 * u).round() as u16;
        let label = fmt_axis_y_od(y_val);
        let label_len = label.len() as u16;
        let x = inner.x + insets.left.saturating_sub(1);
        let start = x.saturating_sub(label.len() as u16);
        if start < inner.x {
            continue;
        }
        frame.render_widget(
            Paragraph::new(label).style(style),
            Rect {
                x: start,
                y,
                width: label_len,
                height: 1,
            },
        );
    }

    let x_label = Paragraph::new("time (min)")
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Gray));
    let x_rect = Rect {
        x: chart.x,
        y: chart.y + chart.height + 1,
        width: chart.width,
        height: 1,
    };
    if x_rect.y < inner.y + inner.height {
        frame.render_widget(x_label, x_rect);
    }

    let y_label = Paragraph::new("OD600")
        .style(Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD));
    let y_rect = Rect {
        x: inner.x,
        y: inner.y,
        width: insets.left.saturating_sub(1),
        height: 1,
    };
    frame.render_widget(y_label, y_rect);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::demo_input;

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.handle_key(KeyCode::Char(c));
        }
    }

    #[test]
    fn starts_with_a_graph_for_demo_data() {
        let app = App::new(demo_input());
        let run = app.run.as_ref().unwrap();
        assert_eq!(run.plotted().count(), 2);

        let msgs = app.messages();
        assert_eq!(msgs.len(), 2);
        assert!(msgs.iter().all(|m| m.level == MessageLevel::Success));
    }

    #[test]
    fn edit_then_update_recomputes() {
        let mut app = App::new(demo_input());

        // Replace the names field.
        app.selected = 4;
        app.handle_key(KeyCode::Enter);
        for _ in 0..app.raw.names.len() {
            app.handle_key(KeyCode::Backspace);
        }
        type_text(&mut app, "q; p");
        assert!(!app.handle_key(KeyCode::Enter));
        assert_eq!(app.raw.names, "q; p");

        // The graph is stale until the update action runs.
        assert_eq!(app.run.as_ref().unwrap().outcomes[0].name, "Sample C (LB + ara + Glu)");
        app.handle_key(KeyCode::Char('u'));
        assert_eq!(app.run.as_ref().unwrap().outcomes[0].name, "q");
    }

    #[test]
    fn escape_discards_the_edit() {
        let mut app = App::new(demo_input());
        app.handle_key(KeyCode::Enter);
        type_text(&mut app, ",2000");
        app.handle_key(KeyCode::Esc);
        assert_eq!(app.raw.time, crate::data::DEMO_TIME);
        assert!(app.editing.is_none());
    }

    #[test]
    fn batch_error_clears_the_graph() {
        let mut app = App::new(demo_input());
        app.raw.trend_time = "30,150".to_string();
        app.update();

        assert!(app.run.is_none());
        let msgs = app.messages();
        assert_eq!(msgs.len(), 1);
        assert_eq!(msgs[0].level, MessageLevel::Error);
        assert!(msgs[0].text.contains("same number of time, density, and trendline sets"));
    }

    #[test]
    fn toggling_trendlines_applies_without_update() {
        let mut app = App::new(demo_input());
        app.handle_key(KeyCode::Char('t'));

        let run = app.run.as_ref().unwrap();
        assert!(!run.show_trendlines);
        assert!(run.visible_trendline(&run.outcomes[0]).is_none());
        assert!(legend_lines(run)[0].spans.len() == 1);

        app.selected = 5;
        app.handle_key(KeyCode::Enter);
        assert!(app.show_trendlines);
    }

    #[test]
    fn non_text_rows_never_write_a_field() {
        let mut app = App::new(demo_input());
        assert!(app.field_mut(Item::ShowTrendlines).is_none());
        assert!(app.field_mut(Item::Update).is_none());

        // A stray edit buffer committed on the button row leaves names alone.
        app.selected = 6;
        app.editing = Some("overwritten".to_string());
        app.handle_key(KeyCode::Enter);
        assert_eq!(app.raw.names, crate::data::DEMO_NAMES);
        assert!(app.editing.is_none());
    }

    #[test]
    fn q_quits_only_outside_edit_mode() {
        let mut app = App::new(demo_input());
        app.handle_key(KeyCode::Enter);
        assert!(!app.handle_key(KeyCode::Char('q')));
        app.handle_key(KeyCode::Esc);
        assert!(app.handle_key(KeyCode::Char('q')));
    }

    #[test]
    fn log_ticks_span_the_axis() {
        assert_eq!(log_fraction(Y_AXIS_MIN), 0.0);
        assert!((log_fraction(Y_AXIS_MAX) - 1.0).abs() < 1e-12);
        assert!(log_fraction(0.1) < log_fraction(1.0));
    }
}
