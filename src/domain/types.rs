//! Shared domain types.
//!
//! These types are kept small and serializable so they can be:
//!
//! - built from caller slices or CSV input
//! - passed by value between the tube builder and the validator
//! - written out as the `x,y` CSV artifacts

use serde::Serialize;

use crate::error::{FunnelError, Result};

/// Absolute tolerance for coordinate equality (domain alignment, band edges).
pub const EPS: f64 = 1e-10;

/// One sample of a curve. Field order is the CSV column order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// An ordered sequence of `(x, y)` samples.
///
/// A `Curve` only guarantees that it holds finite values. Input curves
/// (reference and test) are additionally required to be sorted by x, which is
/// checked with [`Curve::ensure_sorted`]; the bounding curves of a [`Band`]
/// may legitimately be non-monotonic in x.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Curve {
    points: Vec<Point>,
}

impl Curve {
    /// Copy caller-owned coordinate arrays into a new curve.
    ///
    /// Fails when the arrays differ in length, when a value is not finite, or
    /// when the sample buffer cannot be allocated.
    pub fn from_slices(label: &'static str, x: &[f64], y: &[f64]) -> Result<Self> {
        if x.len() != y.len() {
            return Err(FunnelError::LengthMismatch {
                label,
                x_len: x.len(),
                y_len: y.len(),
            });
        }

        let mut points = Vec::new();
        points
            .try_reserve_exact(x.len())
            .map_err(|_| FunnelError::AllocationFailure { label, len: x.len() })?;

        for (index, (&xi, &yi)) in x.iter().zip(y).enumerate() {
            if !(xi.is_finite() && yi.is_finite()) {
                return Err(FunnelError::NonFiniteValue { label, index });
            }
            points.push(Point::new(xi, yi));
        }

        Ok(Self { points })
    }

    /// Build a curve from points that are already known to be finite.
    pub(crate) fn from_points(points: Vec<Point>) -> Self {
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn x(&self, i: usize) -> f64 {
        self.points[i].x
    }

    pub fn y(&self, i: usize) -> f64 {
        self.points[i].y
    }

    pub fn xs(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.x)
    }

    pub fn ys(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.y)
    }

    pub fn first(&self) -> Option<Point> {
        self.points.first().copied()
    }

    pub fn last(&self) -> Option<Point> {
        self.points.last().copied()
    }

    /// Fail with `EmptyCurve` if there are no samples.
    pub fn ensure_non_empty(&self, label: &'static str) -> Result<()> {
        if self.is_empty() {
            return Err(FunnelError::EmptyCurve { label });
        }
        Ok(())
    }

    /// Fail with `UnsortedCurve` unless x is non-decreasing.
    pub fn ensure_sorted(&self, label: &'static str) -> Result<()> {
        for (index, pair) in self.points.windows(2).enumerate() {
            if pair[1].x < pair[0].x {
                return Err(FunnelError::UnsortedCurve {
                    label,
                    index: index + 1,
                    prev: pair[0].x,
                    x: pair[1].x,
                });
            }
        }
        Ok(())
    }

    pub(crate) fn push(&mut self, point: Point) {
        self.points.push(point);
    }
}

/// Absolute and relative tolerances for both axes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ToleranceSpec {
    pub atolx: f64,
    pub atoly: f64,
    pub rtolx: f64,
    pub rtoly: f64,
}

impl ToleranceSpec {
    pub fn new(atolx: f64, atoly: f64, rtolx: f64, rtoly: f64) -> Self {
        Self {
            atolx,
            atoly,
            rtolx,
            rtoly,
        }
    }

    /// Check that every parameter is finite and non-negative.
    pub fn validate(&self) -> Result<()> {
        let params = [
            ("atolx", self.atolx),
            ("atoly", self.atoly),
            ("rtolx", self.rtolx),
            ("rtoly", self.rtoly),
        ];
        for (name, value) in params {
            if !(value.is_finite() && value >= 0.0) {
                return Err(FunnelError::InvalidTolerance { name, value });
            }
        }
        Ok(())
    }

    /// Half-width of the tube around a reference sample.
    pub fn half_width(&self, x: f64) -> f64 {
        self.atolx + self.rtolx * x.abs()
    }

    /// Half-height of the tube around a reference sample.
    pub fn half_height(&self, y: f64) -> f64 {
        self.atoly + self.rtoly * y.abs()
    }
}

/// The tolerance tube: lower and upper bounding curves around a reference.
///
/// Both curves share the reference's sample count and index order. `knots`
/// holds the untouched reference x-coordinates, which the validator uses as
/// its interpolation domain.
#[derive(Debug, Clone, PartialEq)]
pub struct Band {
    pub(crate) lower: Curve,
    pub(crate) upper: Curve,
    pub(crate) knots: Vec<f64>,
}

impl Band {
    pub fn lower(&self) -> &Curve {
        &self.lower
    }

    pub fn upper(&self) -> &Curve {
        &self.upper
    }

    pub fn knots(&self) -> &[f64] {
        &self.knots
    }

    pub fn len(&self) -> usize {
        self.knots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.knots.is_empty()
    }

    pub fn into_curves(self) -> (Curve, Curve) {
        (self.lower, self.upper)
    }
}

/// Test samples found outside the band, and how far outside they are.
///
/// `original` and `diff` are co-indexed: `diff[i]` is `(x, signed distance)`
/// for the sample `original[i]`. Positive distances lie above the upper
/// bound, negative ones below the lower bound.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ErrorReport {
    pub(crate) original: Curve,
    pub(crate) diff: Curve,
}

impl ErrorReport {
    pub fn original(&self) -> &Curve {
        &self.original
    }

    pub fn diff(&self) -> &Curve {
        &self.diff
    }

    pub fn is_valid(&self) -> bool {
        self.original.is_empty()
    }

    pub fn violation_count(&self) -> usize {
        self.original.len()
    }

    /// Largest absolute deviation from the band (0 when valid).
    pub fn max_abs_diff(&self) -> f64 {
        self.diff.ys().map(f64::abs).fold(0.0, f64::max)
    }

    pub(crate) fn record(&mut self, sample: Point, distance: f64) {
        self.original.push(sample);
        self.diff.push(Point::new(sample.x, distance));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_slices_rejects_length_mismatch() {
        let err = Curve::from_slices("reference", &[0.0, 1.0], &[0.0]).unwrap_err();
        assert!(matches!(
            err,
            FunnelError::LengthMismatch { x_len: 2, y_len: 1, .. }
        ));
    }

    #[test]
    fn from_slices_rejects_nan() {
        let err = Curve::from_slices("test", &[0.0, 1.0], &[0.0, f64::NAN]).unwrap_err();
        assert!(matches!(err, FunnelError::NonFiniteValue { index: 1, .. }));
    }

    #[test]
    fn ensure_sorted_allows_repeated_x() {
        let curve = Curve::from_slices("reference", &[0.0, 1.0, 1.0, 2.0], &[0.0, 0.0, 1.0, 1.0]).unwrap();
        assert!(curve.ensure_sorted("reference").is_ok());
    }

    #[test]
    fn ensure_sorted_reports_first_offending_index() {
        let curve = Curve::from_slices("test", &[0.0, 2.0, 1.0], &[0.0, 0.0, 0.0]).unwrap();
        let err = curve.ensure_sorted("test").unwrap_err();
        assert!(matches!(err, FunnelError::UnsortedCurve { index: 2, .. }));
    }

    #[test]
    fn tolerance_rejects_negative_and_nan() {
        assert!(ToleranceSpec::new(0.0, 0.1, 0.0, 0.0).validate().is_ok());
        let err = ToleranceSpec::new(0.0, -0.1, 0.0, 0.0).validate().unwrap_err();
        assert!(matches!(err, FunnelError::InvalidTolerance { name: "atoly", .. }));
        let err = ToleranceSpec::new(0.0, 0.0, f64::INFINITY, 0.0).validate().unwrap_err();
        assert!(matches!(err, FunnelError::InvalidTolerance { name: "rtolx", .. }));
    }

    #[test]
    fn half_sizes_combine_absolute_and_relative() {
        let tol = ToleranceSpec::new(0.5, 0.1, 0.01, 0.2);
        assert!((tol.half_width(-10.0) - 0.6).abs() < 1e-12);
        assert!((tol.half_height(2.0) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn error_report_tracks_max_abs_diff() {
        let mut report = ErrorReport::default();
        assert!(report.is_valid());
        report.record(Point::new(1.0, 2.0), 0.5);
        report.record(Point::new(2.0, -3.0), -1.5);
        assert!(!report.is_valid());
        assert_eq!(report.violation_count(), 2);
        assert_eq!(report.diff().len(), report.original().len());
        assert!((report.max_abs_diff() - 1.5).abs() < 1e-12);
    }
}
