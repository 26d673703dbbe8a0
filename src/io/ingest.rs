//! CSV ingest for reference and test curves.
//!
//! Accepted layout:
//! - the first two columns are `x` and `y`; further columns are ignored
//! - an optional header row: the first non-blank record, when neither of its
//!   first two cells is a number
//! - blank lines are skipped
//!
//! Values must parse as finite numbers; the first bad cell fails the whole
//! file with its line number.

use std::path::Path;

use tracing::debug;

use crate::domain::Curve;
use crate::error::{FunnelError, Result};

/// Read a two-column `x,y` CSV file into a curve.
pub fn read_curve_csv(path: &Path, label: &'static str) -> Result<Curve> {
    let csv_err = |source| FunnelError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(csv_err)?;

    let mut x = Vec::new();
    let mut y = Vec::new();
    let mut first_record = true;

    for (idx, result) in reader.records().enumerate() {
        let record = result.map_err(csv_err)?;
        let line = record.position().map(|p| p.line()).unwrap_or(idx as u64 + 1);

        if record.iter().all(str::is_empty) {
            continue;
        }

        let xs = record.get(0).map(normalize_cell).unwrap_or_default();
        let ys = record.get(1).map(normalize_cell).unwrap_or_default();

        if std::mem::take(&mut first_record) && is_header(xs, ys) {
            debug!(path = %path.display(), header = ?record, "skipping header row");
            continue;
        }

        x.push(parse_cell(path, line, "x", xs)?);
        y.push(parse_cell(path, line, "y", ys)?);
    }

    debug!(path = %path.display(), samples = x.len(), "read {label} curve");
    Curve::from_slices(label, &x, &y)
}

fn normalize_cell(cell: &str) -> &str {
    // Spreadsheet exports sometimes prefix the first cell with a UTF-8 BOM.
    cell.trim().trim_start_matches('\u{feff}')
}

fn is_header(xs: &str, ys: &str) -> bool {
    xs.parse::<f64>().is_err() && ys.parse::<f64>().is_err()
}

fn parse_cell(path: &Path, line: u64, column: &str, cell: &str) -> Result<f64> {
    let parse_err = |message: String| FunnelError::Parse {
        path: path.to_path_buf(),
        line,
        message,
    };

    if cell.is_empty() {
        return Err(parse_err(format!("missing `{column}` value")));
    }
    let v = cell
        .parse::<f64>()
        .map_err(|e| parse_err(format!("`{column}` = '{cell}': {e}")))?;
    if !v.is_finite() {
        return Err(parse_err(format!("`{column}` = '{cell}' is not finite")));
    }
    Ok(v)
}
