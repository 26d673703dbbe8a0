//! Shared "compare pipeline" logic used by the CLI front-end.
//!
//! Workflow:
//! CSV ingest -> comparison (tube + validation) -> CSV artifacts
//!
//! The CLI then only deals with presentation (text, JSON, plot).

use std::path::Path;

use tracing::{info, warn};

use crate::cli::CompareArgs;
use crate::compare::{Comparison, ComparisonSummary, compare};
use crate::domain::{Curve, Point};
use crate::error::AppError;
use crate::io::{
    ERRORS_FILE, LOWER_BOUND_FILE, REFERENCE_FILE, TEST_FILE, UPPER_BOUND_FILE, read_curve_csv,
    write_artifacts,
};
use crate::validate::validate;

/// All computed outputs of a single `funnel compare` run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub comparison: Comparison,
    pub summary: ComparisonSummary,
}

/// Execute the full comparison pipeline for CLI arguments.
pub fn run_compare(args: &CompareArgs) -> Result<RunOutput, AppError> {
    let reference = read_curve_csv(&args.reference, "reference")?;
    let test = read_curve_csv(&args.test, "test")?;

    let comparison = compare(reference, test, args.tolerances())?;
    write_artifacts(&args.output, &comparison)?;
    info!(dir = %args.output.display(), "wrote results");

    let mut summary = comparison.summary();
    summary.output_dir = Some(args.output.clone());

    Ok(RunOutput {
        comparison,
        summary,
    })
}

/// Curves read back from a results directory.
#[derive(Debug, Clone)]
pub struct SavedRun {
    pub reference: Curve,
    pub lower: Curve,
    pub upper: Curve,
    pub test: Curve,
    /// Test samples outside the saved band.
    pub violations: Vec<Point>,
}

/// Load the CSV artifacts written by [`run_compare`].
pub fn load_saved_run(dir: &Path) -> Result<SavedRun, AppError> {
    let reference = read_curve_csv(&dir.join(REFERENCE_FILE), "reference")?;
    let lower = read_curve_csv(&dir.join(LOWER_BOUND_FILE), "lower bound")?;
    let upper = read_curve_csv(&dir.join(UPPER_BOUND_FILE), "upper bound")?;
    let test = read_curve_csv(&dir.join(TEST_FILE), "test")?;
    let errors = read_curve_csv(&dir.join(ERRORS_FILE), "errors")?;

    // Repeated test x values make `errors.csv` ambiguous; re-evaluate each
    // sample against the saved band instead.
    let report = validate(&lower, &upper, &test)?;
    if report.violation_count() != errors.len() {
        warn!(
            saved = errors.len(),
            recomputed = report.violation_count(),
            "errors.csv disagrees with the saved band"
        );
    }
    let violations = report.original().points().to_vec();

    Ok(SavedRun {
        reference,
        lower,
        upper,
        test,
        violations,
    })
}
