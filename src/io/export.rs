//! Write comparison artifacts to CSV.
//!
//! Every file has the header `x,y` and one row per sample. Values are written
//! with the shortest decimal representation that round-trips to the same
//! `f64`, so downstream tools see the exact numbers used in the comparison.

use std::fs::create_dir_all;
use std::path::Path;

use tracing::debug;

use crate::compare::Comparison;
use crate::domain::Curve;
use crate::error::{FunnelError, Result};

pub const REFERENCE_FILE: &str = "reference.csv";
pub const LOWER_BOUND_FILE: &str = "lowerBound.csv";
pub const UPPER_BOUND_FILE: &str = "upperBound.csv";
pub const TEST_FILE: &str = "test.csv";
pub const ERRORS_FILE: &str = "errors.csv";

/// Write the five CSV artifacts of a run into `dir`, creating it if needed.
pub fn write_artifacts(dir: &Path, comparison: &Comparison) -> Result<()> {
    create_dir_all(dir).map_err(|source| FunnelError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    write_curve_csv(&dir.join(REFERENCE_FILE), &comparison.reference)?;
    write_curve_csv(&dir.join(LOWER_BOUND_FILE), comparison.band.lower())?;
    write_curve_csv(&dir.join(UPPER_BOUND_FILE), comparison.band.upper())?;
    write_curve_csv(&dir.join(TEST_FILE), &comparison.test)?;
    write_curve_csv(&dir.join(ERRORS_FILE), comparison.errors.diff())?;

    debug!(dir = %dir.display(), "wrote comparison artifacts");
    Ok(())
}

/// Write one curve as `x,y` CSV. The header is written even for empty curves.
pub fn write_curve_csv(path: &Path, curve: &Curve) -> Result<()> {
    let csv_err = |source| FunnelError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .map_err(csv_err)?;

    writer.write_record(["x", "y"]).map_err(csv_err)?;
    for point in curve.points() {
        writer.serialize(point).map_err(csv_err)?;
    }

    writer.flush().map_err(|source| FunnelError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(())
}
