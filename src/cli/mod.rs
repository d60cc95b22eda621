//! Command-line parsing for the OD600 growth-curve tool.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the parsing/fitting code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "growth", version, about = "OD600 growth curves and doubling times")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fit growth curves, print doubling times, and optionally plot/export.
    Fit(FitArgs),
    /// Plot a previously exported growth-curve JSON.
    Plot(PlotArgs),
    /// Launch the interactive TUI.
    ///
    /// This uses the same underlying pipeline as `growth fit`, but lets you edit
    /// the input text and re-run it in a terminal UI using Ratatui.
    Tui(InputArgs),
}

/// Where the five raw text fields come from.
///
/// With no flags at all, the bundled demo data is used.
#[derive(Debug, Args, Clone, Default)]
pub struct InputArgs {
    /// Time points in minutes (`;` between datasets, `,` between values).
    #[arg(short = 't', long)]
    pub time: Option<String>,

    /// OD600 readings, aligned with `--time`.
    #[arg(short = 'd', long)]
    pub density: Option<String>,

    /// Time points (minutes) selecting each dataset's trendline window.
    #[arg(long = "trend-time")]
    pub trend_time: Option<String>,

    /// Standard deviations of the OD600 readings (optional).
    #[arg(long = "std-dev")]
    pub std_dev: Option<String>,

    /// Dataset names (optional; defaults to `Dataset 1`, `Dataset 2`, ...).
    #[arg(long)]
    pub names: Option<String>,

    /// Read all fields from a JSON file instead (`time`, `density`, `trend_time`, `std_dev`, `names`).
    #[arg(long, value_name = "JSON", conflicts_with_all = ["time", "density", "trend_time", "std_dev", "names"])]
    pub input: Option<PathBuf>,
}

/// Options for fitting.
#[derive(Debug, Args, Clone)]
pub struct FitArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Do not draw trend lines (fits and doubling times are still reported).
    #[arg(long)]
    pub no_trendlines: bool,

    /// Disable the terminal plot.
    #[arg(long)]
    pub no_plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,

    /// Export per-point results to CSV.
    #[arg(long)]
    pub export: Option<PathBuf>,

    /// Export fitted curves (model + trendline grid) to JSON.
    #[arg(long = "export-curve")]
    pub export_curve: Option<PathBuf>,

    /// Write a Markdown debug bundle under `./debug`.
    #[arg(long)]
    pub debug_bundle: bool,

    /// Verbose logging (same as `RUST_LOG=growth_curves=debug`).
    #[arg(short = 'v', long)]
    pub verbose: bool,
}

/// Options for plotting a saved curve file.
#[derive(Debug, Parser)]
pub struct PlotArgs {
    /// Curve JSON file produced by `growth fit --export-curve`.
    #[arg(long, value_name = "JSON")]
    pub curve: PathBuf,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,
}

impl InputArgs {
    /// Whether any of the per-field flags were given.
    pub fn has_fields(&self) -> bool {
        self.time.is_some()
            || self.density.is_some()
            || self.trend_time.is_some()
            || self.std_dev.is_some()
            || self.names.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_fit_with_fields() {
        let cli = Cli::parse_from([
            "growth",
            "fit",
            "--time",
            "0,30",
            "--density",
            "0.1,0.2",
            "--trend-time",
            "0,30",
            "--no-plot",
        ]);
        let Command::Fit(args) = cli.command else {
            panic!("expected fit");
        };
        assert_eq!(args.input.time.as_deref(), Some("0,30"));
        assert!(args.input.has_fields());
        assert!(args.no_plot);
        assert!(!args.no_trendlines);
    }

    #[test]
    fn input_file_conflicts_with_fields() {
        let res = Cli::try_parse_from(["growth", "fit", "--input", "x.json", "--time", "0,30"]);
        assert!(res.is_err());
    }
}
