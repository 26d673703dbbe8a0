//! Reporting utilities: violation rankings and formatted terminal output.

pub mod format;

pub use format::*;

use crate::domain::ErrorReport;

/// One test sample outside the band.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Violation {
    pub x: f64,
    pub y: f64,
    /// Signed distance from the band (positive above, negative below).
    pub diff: f64,
}

/// Collect violations, largest absolute deviation first (ties keep x order).
pub fn rank_violations(errors: &ErrorReport, top_n: usize) -> Vec<Violation> {
    let mut out: Vec<Violation> = errors
        .original()
        .points()
        .iter()
        .zip(errors.diff().points())
        .map(|(o, d)| Violation {
            x: o.x,
            y: o.y,
            diff: d.y,
        })
        .collect();

    out.sort_by(|a, b| {
        b.diff
            .abs()
            .partial_cmp(&a.diff.abs())
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    out.truncate(top_n);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Curve, ToleranceSpec};
    use crate::tube::build_band;
    use crate::validate::validate_band;

    #[test]
    fn violations_sorted_by_magnitude() {
        let reference = Curve::from_slices("reference", &[0.0, 1.0, 2.0, 3.0], &[0.0; 4]).unwrap();
        let test = Curve::from_slices("test", &[0.0, 1.0, 2.0, 3.0], &[0.5, -2.0, 0.0, 1.0]).unwrap();
        let band = build_band(&reference, &ToleranceSpec::new(0.0, 0.25, 0.0, 0.0)).unwrap();
        let errors = validate_band(&band, &test).unwrap();

        let ranked = rank_violations(&errors, 2);
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].x, 1.0);
        assert!((ranked[0].diff + 1.75).abs() < 1e-12);
        assert_eq!(ranked[1].x, 3.0);
        assert!((ranked[1].diff - 0.75).abs() < 1e-12);
    }
}
