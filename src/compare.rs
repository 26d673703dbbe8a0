//! Comparison of a test curve against a reference curve.
//!
//! Workflow:
//! input checks -> domain alignment -> tube -> validation -> (optional) CSV artifacts
//!
//! Any failing step aborts the rest and surfaces its error.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info};

use crate::domain::{Band, Curve, EPS, ErrorReport, ToleranceSpec};
use crate::error::{FunnelError, Result};

/// All computed outputs of a single comparison run.
#[derive(Debug, Clone)]
pub struct Comparison {
    pub reference: Curve,
    pub test: Curve,
    pub tolerances: ToleranceSpec,
    pub band: Band,
    pub errors: ErrorReport,
}

/// Compact, serializable outcome of a run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonSummary {
    pub valid: bool,
    pub reference_samples: usize,
    pub test_samples: usize,
    pub violations: usize,
    pub max_abs_diff: f64,
    pub tolerances: ToleranceSpec,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,
}

impl Comparison {
    pub fn is_valid(&self) -> bool {
        self.errors.is_valid()
    }

    pub fn summary(&self) -> ComparisonSummary {
        ComparisonSummary {
            valid: self.is_valid(),
            reference_samples: self.reference.len(),
            test_samples: self.test.len(),
            violations: self.errors.violation_count(),
            max_abs_diff: self.errors.max_abs_diff(),
            tolerances: self.tolerances,
            output_dir: None,
        }
    }
}

/// Compare two curves that are already in memory.
pub fn compare(reference: Curve, test: Curve, tolerances: ToleranceSpec) -> Result<Comparison> {
    reference.ensure_non_empty("reference")?;
    test.ensure_non_empty("test")?;
    reference.ensure_sorted("reference")?;
    test.ensure_sorted("test")?;
    check_alignment(&reference, &test)?;

    let band = crate::tube::build_band(&reference, &tolerances)?;
    let errors = crate::validate::validate_band(&band, &test)?;

    info!(
        valid = errors.is_valid(),
        violations = errors.violation_count(),
        reference_samples = reference.len(),
        test_samples = test.len(),
        "comparison finished"
    );

    Ok(Comparison {
        reference,
        test,
        tolerances,
        band,
        errors,
    })
}

/// Compare raw coordinate arrays.
pub fn compare_slices(
    x_reference: &[f64],
    y_reference: &[f64],
    x_test: &[f64],
    y_test: &[f64],
    tolerances: ToleranceSpec,
) -> Result<Comparison> {
    let reference = Curve::from_slices("reference", x_reference, y_reference)?;
    let test = Curve::from_slices("test", x_test, y_test)?;
    compare(reference, test, tolerances)
}

/// Compare raw coordinate arrays and write the CSV artifacts to `output_dir`.
///
/// Files: `reference.csv`, `lowerBound.csv`, `upperBound.csv`, `test.csv`,
/// `errors.csv`. Partially written output is left in place on failure.
pub fn compare_and_report(
    x_reference: &[f64],
    y_reference: &[f64],
    x_test: &[f64],
    y_test: &[f64],
    output_dir: &Path,
    tolerances: ToleranceSpec,
) -> Result<Comparison> {
    let comparison = compare_slices(x_reference, y_reference, x_test, y_test, tolerances)?;
    crate::io::export::write_artifacts(output_dir, &comparison)?;
    Ok(comparison)
}

/// Integer status for callers that only want `0` / non-zero.
pub fn compare_and_report_status(
    x_reference: &[f64],
    y_reference: &[f64],
    x_test: &[f64],
    y_test: &[f64],
    output_dir: &Path,
    tolerances: ToleranceSpec,
) -> i32 {
    match compare_and_report(x_reference, y_reference, x_test, y_test, output_dir, tolerances) {
        Ok(_) => 0,
        Err(err) => {
            tracing::error!("Error: {err}");
            i32::from(err.exit_code())
        }
    }
}

fn check_alignment(reference: &Curve, test: &Curve) -> Result<()> {
    let (Some(r0), Some(t0), Some(r1), Some(t1)) =
        (reference.first(), test.first(), reference.last(), test.last())
    else {
        return Err(FunnelError::EmptyCurve { label: "reference" });
    };

    if (r0.x - t0.x).abs() >= EPS {
        return Err(FunnelError::DomainMismatch {
            which: "minimum",
            reference: r0.x,
            test: t0.x,
        });
    }
    if (r1.x - t1.x).abs() >= EPS {
        return Err(FunnelError::DomainMismatch {
            which: "maximum",
            reference: r1.x,
            test: t1.x,
        });
    }

    debug!(x_min = r0.x, x_max = r1.x, "reference and test domains aligned");
    Ok(())
}
