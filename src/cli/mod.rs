//! Command-line parsing for the `funnel` binary.
//!
//! The goal of this module is to keep **argument parsing** separate from the
//! comparison code. Every option can also be supplied through a `FUNNEL_*`
//! environment variable (a `.env` file is honoured).

use std::path::PathBuf;

use clap::{ArgGroup, Args, Parser, Subcommand};

use crate::domain::ToleranceSpec;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "funnel",
    version,
    about = "Validate a test time-series against a reference within a tolerance tube"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[command(flatten)]
    pub log: LogArgs,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Compare a test curve against a reference curve and write CSV artifacts.
    Compare(CompareArgs),
    /// Plot the CSV artifacts of a previous comparison in the terminal.
    Plot(PlotArgs),
}

/// Diagnostic output options (shared by all subcommands).
#[derive(Debug, Args, Clone)]
pub struct LogArgs {
    /// Show debug diagnostics.
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only show warnings and errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Write diagnostics to this file instead of stderr.
    #[arg(long, global = true, value_name = "PATH", env = "FUNNEL_LOG_FILE")]
    pub log_file: Option<PathBuf>,
}

/// Options for `funnel compare`.
///
/// At least one tolerance per axis is required; omitted ones are zero.
#[derive(Debug, Args, Clone)]
#[command(group(
    ArgGroup::new("x_tolerance")
        .required(true)
        .multiple(true)
        .args(["atolx", "rtolx"])
))]
#[command(group(
    ArgGroup::new("y_tolerance")
        .required(true)
        .multiple(true)
        .args(["atoly", "rtoly"])
))]
pub struct CompareArgs {
    /// Reference curve CSV (`x,y`, header optional).
    #[arg(long, value_name = "CSV", env = "FUNNEL_REFERENCE")]
    pub reference: PathBuf,

    /// Test curve CSV (`x,y`, header optional).
    #[arg(long, value_name = "CSV", env = "FUNNEL_TEST")]
    pub test: PathBuf,

    /// Directory for the CSV artifacts (created if missing).
    #[arg(short, long, value_name = "DIR", default_value = "results", env = "FUNNEL_OUTPUT")]
    pub output: PathBuf,

    /// Absolute tolerance along x.
    #[arg(long, value_parser = parse_tolerance, env = "FUNNEL_ATOLX")]
    pub atolx: Option<f64>,

    /// Absolute tolerance along y.
    #[arg(long, value_parser = parse_tolerance, env = "FUNNEL_ATOLY")]
    pub atoly: Option<f64>,

    /// Relative tolerance along x (scaled by |x| of each reference sample).
    #[arg(long, value_parser = parse_tolerance, env = "FUNNEL_RTOLX")]
    pub rtolx: Option<f64>,

    /// Relative tolerance along y (scaled by |y| of each reference sample).
    #[arg(long, value_parser = parse_tolerance, env = "FUNNEL_RTOLY")]
    pub rtoly: Option<f64>,

    /// Print the run summary as JSON.
    #[arg(long)]
    pub json: bool,

    /// Render a terminal plot of the tube and the test curve.
    #[arg(long)]
    pub plot: bool,

    /// Number of largest deviations to list.
    #[arg(long, default_value_t = 10)]
    pub top: usize,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,
}

impl CompareArgs {
    pub fn tolerances(&self) -> ToleranceSpec {
        ToleranceSpec::new(
            self.atolx.unwrap_or(0.0),
            self.atoly.unwrap_or(0.0),
            self.rtolx.unwrap_or(0.0),
            self.rtoly.unwrap_or(0.0),
        )
    }
}

/// Options for `funnel plot`.
#[derive(Debug, Args, Clone)]
pub struct PlotArgs {
    /// Directory written by `funnel compare`.
    #[arg(long, value_name = "DIR", default_value = "results", env = "FUNNEL_OUTPUT")]
    pub dir: PathBuf,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,
}

fn parse_tolerance(s: &str) -> Result<f64, String> {
    let v: f64 = s.trim().parse().map_err(|e| format!("not a number: {e}"))?;
    if !v.is_finite() || v < 0.0 {
        return Err(format!("tolerance must be finite and >= 0, got {v}"));
    }
    Ok(v)
}
