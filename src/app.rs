//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - sets up logging
//! - resolves the raw input text (flags, JSON file, or demo data)
//! - runs the growth pipeline
//! - prints reports/plots
//! - writes optional exports

use std::io;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::cli::{Command, FitArgs, InputArgs, PlotArgs};
use crate::domain::{GrowthConfig, RawSeriesText};
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `growth` binary.
pub fn run() -> Result<(), AppError> {
    // We want `growth` and `growth --time ...` to behave like `growth tui ...`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of the
    // argv list before parsing.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Fit(args) => {
            init_logging(if args.verbose { "debug" } else { "info" });
            handle_fit(args)
        }
        Command::Plot(args) => {
            init_logging("info");
            handle_plot(args)
        }
        Command::Tui(args) => {
            // Log lines on stderr would scribble over the alternate screen, so
            // the TUI stays quiet unless RUST_LOG asks otherwise.
            init_logging("off");
            handle_tui(args)
        }
    }
}

fn init_logging(default_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    // Fails only when a global subscriber is already set (e.g. by a test
    // harness); that subscriber keeps working, so the error is dropped.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .try_init();
}

fn handle_fit(args: FitArgs) -> Result<(), AppError> {
    let config = growth_config_from_args(&args);
    let raw = raw_input_from_args(&args.input)?;
    let run = pipeline::run_growth(&raw, config.show_trendlines)?;

    println!("{}", crate::report::format_run_summary(&run));
    println!("{}", crate::report::format_outcomes(&run));

    if config.plot {
        let plot = crate::plot::render_ascii_plot(&run, config.plot_width, config.plot_height);
        println!("{plot}");
    }

    // Optional exports.
    if let Some(path) = &config.export_results {
        crate::io::export::write_results_csv(path, &run)?;
        info!("Wrote results CSV: {}", path.display());
    }
    if let Some(path) = &config.export_curve {
        crate::io::curve::write_curve_json(path, &run)?;
        info!("Wrote curve JSON: {}", path.display());
    }
    if config.debug_bundle {
        let path = crate::debug::write_debug_bundle(&run)?;
        info!("Wrote debug bundle: {}", path.display());
    }

    Ok(())
}

fn handle_tui(args: InputArgs) -> Result<(), AppError> {
    let raw = raw_input_from_args(&args)?;
    crate::tui::run(raw)
}

fn handle_plot(args: PlotArgs) -> Result<(), AppError> {
    let curve = crate::io::curve::read_curve_json(&args.curve)?;
    let plot = crate::plot::render_ascii_plot_from_curve_file(&curve, args.width, args.height);

    println!("{plot}");
    Ok(())
}

pub fn growth_config_from_args(args: &FitArgs) -> GrowthConfig {
    GrowthConfig {
        show_trendlines: !args.no_trendlines,
        plot: !args.no_plot,
        plot_width: args.width,
        plot_height: args.height,
        export_results: args.export.clone(),
        export_curve: args.export_curve.clone(),
        debug_bundle: args.debug_bundle,
    }
}

/// Resolve the raw text fields.
///
/// Priority: `--input` JSON file, then individual field flags (missing ones
/// are blank), then the bundled demo data.
pub fn raw_input_from_args(args: &InputArgs) -> Result<RawSeriesText, AppError> {
    if let Some(path) = &args.input {
        return crate::io::ingest::load_raw_json(path);
    }
    if !args.has_fields() {
        return Ok(crate::data::demo_input());
    }
    Ok(RawSeriesText {
        time: args.time.clone().unwrap_or_default(),
        density: args.density.clone().unwrap_or_default(),
        trend_time: args.trend_time.clone().unwrap_or_default(),
        std_dev: args.std_dev.clone().unwrap_or_default(),
        names: args.names.clone().unwrap_or_default(),
    })
}

/// Rewrite argv so `growth` defaults to `growth tui`.
///
/// Rules:
/// - `growth`                          -> `growth tui`
/// - `growth --time ... ...`           -> `growth tui --time ... ...`
/// - `growth --help/--version/-h`      -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "fit" | "plot" | "tui");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "tui flags".
    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}
