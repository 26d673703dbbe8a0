//! Diagnostic sink setup for the binary.
//!
//! The library only emits `tracing` events; this is the one place that decides
//! where they go. `RUST_LOG` overrides the level chosen by `-v` / `-q`.

use std::fs::File;
use std::sync::Mutex;

use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::cli::LogArgs;
use crate::error::AppError;

pub fn init(args: &LogArgs) -> Result<(), AppError> {
    let level = if args.verbose {
        LevelFilter::DEBUG
    } else if args.quiet {
        LevelFilter::WARN
    } else {
        LevelFilter::INFO
    };

    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    let installed = match &args.log_file {
        Some(path) => {
            let file = File::create(path).map_err(|e| {
                AppError::new(5, format!("Failed to create log file '{}': {e}", path.display()))
            })?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).try_init()
        }
        None => builder.with_writer(std::io::stderr).try_init(),
    };

    installed.map_err(|e| AppError::new(1, format!("Failed to initialize logging: {e}")))
}
