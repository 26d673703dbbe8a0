//! `funnel` library crate.
//!
//! Validates a test curve against a reference curve inside a tolerance tube:
//!
//! - `tube`: lower/upper bounding curves from absolute and relative tolerances
//! - `validate`: band interpolation and violation report
//! - `compare`: input checks + tube + validation (+ CSV artifacts)
//!
//! The binary (`funnel`) is a thin wrapper around this library so that the
//! core logic is testable without spawning processes.

pub mod app;
pub mod cli;
pub mod compare;
pub mod domain;
pub mod error;
pub mod io;
pub mod plot;
pub mod report;
pub mod tube;
pub mod validate;

pub use compare::{Comparison, ComparisonSummary, compare, compare_and_report, compare_slices};
pub use domain::{Band, Curve, ErrorReport, Point, ToleranceSpec};
pub use error::{FunnelError, Result};
