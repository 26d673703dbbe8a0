//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and parses CLI arguments
//! - installs the diagnostic sink
//! - runs the comparison pipeline
//! - prints the summary / JSON / plot

use clap::Parser;
use tracing::error;

use crate::cli::{Cli, Command, CompareArgs, PlotArgs};
use crate::error::AppError;
use crate::plot::PlotLayers;

pub mod logging;
pub mod pipeline;

/// Entry point for the `funnel` binary.
///
/// Returns `Ok` both for valid and for invalid test curves; the verdict is part
/// of the printed report. Errors mean no (complete) report was produced.
pub fn run() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    logging::init(&cli.log)?;

    let result = match cli.command {
        Command::Compare(args) => handle_compare(args),
        Command::Plot(args) => handle_plot(args),
    };

    if let Err(err) = &result {
        // stderr already gets the message from `main`.
        if cli.log.log_file.is_some() {
            error!(exit_code = err.exit_code(), "{err}");
        }
    }
    result
}

fn handle_compare(args: CompareArgs) -> Result<(), AppError> {
    let run = pipeline::run_compare(&args)?;

    if args.json {
        let json = serde_json::to_string_pretty(&run.summary)
            .map_err(|e| AppError::new(1, format!("Failed to serialize summary: {e}")))?;
        println!("{json}");
    } else {
        println!("{}", crate::report::format_summary(&run.summary));
        let worst = crate::report::rank_violations(&run.comparison.errors, args.top);
        let table = crate::report::format_violations(&worst);
        if !table.is_empty() {
            println!("{table}");
        }
    }

    if args.plot {
        let plot = crate::plot::render_comparison(&run.comparison, args.width, args.height);
        println!("{plot}");
    }

    Ok(())
}

fn handle_plot(args: PlotArgs) -> Result<(), AppError> {
    let saved = pipeline::load_saved_run(&args.dir)?;

    let layers = PlotLayers {
        reference: saved.reference.points(),
        lower: saved.lower.points(),
        upper: saved.upper.points(),
        test: saved.test.points(),
        violations: &saved.violations,
    };
    println!("{}", crate::plot::render_plot(&layers, args.width, args.height));
    Ok(())
}
