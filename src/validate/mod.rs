//! Band validation.
//!
//! The band is evaluated at each test x over the reference knots, not over
//! the (possibly non-monotonic) x-coordinates of the bounding curves:
//!
//! - `xt` on one or more knots (within `EPS`): envelope of every coincident sample
//!   (`min lower.y`, `max upper.y`), so step discontinuities keep the full
//!   vertical extent of the tube
//! - `x_i < xt < x_{i+1}`: linear interpolation of `lower.y` / `upper.y`
//!   between indices `i` and `i+1`
//! - before the first / after the last knot (but inside the x half-width):
//!   the endpoint bounds
//!
//! A sample is valid when `lower - EPS <= yt <= upper + EPS`.

use tracing::{debug, warn};

use crate::domain::{Band, Curve, EPS, ErrorReport, Point};
use crate::error::{FunnelError, Result};

/// Lower and upper bound of the band at one abscissa.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub lower: f64,
    pub upper: f64,
}

impl Bounds {
    pub fn contains(&self, y: f64) -> bool {
        self.lower - EPS <= y && y <= self.upper + EPS
    }

    /// Signed distance from the nearest violated edge.
    pub fn signed_distance(&self, y: f64) -> f64 {
        if y > self.upper { y - self.upper } else { y - self.lower }
    }
}

/// Validate `test` against a band built by [`crate::tube::build_band`].
pub fn validate_band(band: &Band, test: &Curve) -> Result<ErrorReport> {
    check_band(band.lower(), band.upper())?;
    test.ensure_non_empty("test")?;
    check_coverage(band, test)?;

    let mut report = ErrorReport::default();
    for &sample in test.points() {
        let bounds = bounds_at(band, sample.x);
        if !bounds.contains(sample.y) {
            report.record(sample, bounds.signed_distance(sample.y));
        }
    }

    if report.is_valid() {
        debug!(samples = test.len(), "test curve lies inside the band");
    } else {
        warn!(
            violations = report.violation_count(),
            samples = test.len(),
            max_abs_diff = report.max_abs_diff(),
            "test curve leaves the band"
        );
    }

    Ok(report)
}

/// Validate `test` against bare bounding curves.
///
/// The reference knots are recovered as the per-index midpoint of the lower
/// and upper x-coordinates (the tube is symmetric in x).
pub fn validate(lower: &Curve, upper: &Curve, test: &Curve) -> Result<ErrorReport> {
    check_band(lower, upper)?;

    let knots = lower
        .xs()
        .zip(upper.xs())
        .map(|(lo, hi)| 0.5 * (lo + hi))
        .collect();
    let band = Band {
        lower: lower.clone(),
        upper: upper.clone(),
        knots,
    };

    validate_band(&band, test)
}

/// Evaluate the band at `x`.
///
/// The band must not be empty. `x` is expected to lie within the band's
/// x-coverage; outside of it the endpoint bounds are returned.
pub fn bounds_at(band: &Band, x: f64) -> Bounds {
    let knots = band.knots();
    let lower = band.lower();
    let upper = band.upper();

    // Knots within EPS of `x` count as coincident.
    let lo = knots.partition_point(|&k| k < x - EPS);
    let hi = knots.partition_point(|&k| k <= x + EPS);

    if lo < hi {
        // Shared coordinate: take the envelope of every coincident sample.
        let (mut l, mut u) = (f64::INFINITY, f64::NEG_INFINITY);
        for i in lo..hi {
            l = l.min(lower.y(i));
            u = u.max(upper.y(i));
        }
        return Bounds { lower: l, upper: u };
    }

    if lo == 0 {
        return Bounds {
            lower: lower.y(0),
            upper: upper.y(0),
        };
    }
    if lo == knots.len() {
        let last = knots.len() - 1;
        return Bounds {
            lower: lower.y(last),
            upper: upper.y(last),
        };
    }

    let (i, j) = (lo - 1, lo);
    let t = (x - knots[i]) / (knots[j] - knots[i]);
    Bounds {
        lower: lerp(lower.y(i), lower.y(j), t),
        upper: lerp(upper.y(i), upper.y(j), t),
    }
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + t * (b - a)
}

fn check_band(lower: &Curve, upper: &Curve) -> Result<()> {
    if lower.is_empty() || upper.is_empty() || lower.len() != upper.len() {
        return Err(FunnelError::BandCollapsed {
            lower: lower.len(),
            upper: upper.len(),
        });
    }
    Ok(())
}

/// Every test x must fall inside `[lower.x(0), upper.x(n-1)]` (within `EPS`).
fn check_coverage(band: &Band, test: &Curve) -> Result<()> {
    let (Some(start), Some(end)) = (band.lower().first(), band.upper().last()) else {
        return Err(FunnelError::BandCollapsed {
            lower: band.lower().len(),
            upper: band.upper().len(),
        });
    };

    for Point { x, .. } in test.points() {
        if *x < start.x - EPS {
            return Err(FunnelError::DomainMismatch {
                which: "minimum",
                reference: start.x,
                test: *x,
            });
        }
        if *x > end.x + EPS {
            return Err(FunnelError::DomainMismatch {
                which: "maximum",
                reference: end.x,
                test: *x,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ToleranceSpec;
    use crate::tube::build_band;

    fn curve(x: &[f64], y: &[f64]) -> Curve {
        Curve::from_slices("test", x, y).unwrap()
    }

    fn triangle_band() -> Band {
        let reference = curve(&[0.0, 1.0, 2.0], &[0.0, 1.0, 0.0]);
        build_band(&reference, &ToleranceSpec::new(0.0, 0.1, 0.0, 0.0)).unwrap()
    }

    #[test]
    fn small_deviation_inside_band_is_valid() {
        let band = triangle_band();
        let test = curve(&[0.0, 1.0, 2.0], &[0.0, 1.05, 0.0]);
        let report = validate_band(&band, &test).unwrap();
        assert!(report.is_valid());
        assert!(report.original().is_empty());
        assert!(report.diff().is_empty());
    }

    #[test]
    fn sample_above_band_reports_positive_distance() {
        let band = triangle_band();
        let test = curve(&[0.0, 1.0, 2.0], &[0.0, 1.2, 0.0]);
        let report = validate_band(&band, &test).unwrap();

        assert_eq!(report.violation_count(), 1);
        assert_eq!(report.original().points(), &[Point::new(1.0, 1.2)]);
        assert_eq!(report.diff().x(0), 1.0);
        assert!((report.diff().y(0) - 0.1).abs() < 1e-9);
    }

    #[test]
    fn sample_below_band_reports_negative_distance() {
        let band = triangle_band();
        let test = curve(&[0.0, 1.0, 2.0], &[0.0, 0.7, 0.0]);
        let report = validate_band(&band, &test).unwrap();
        assert_eq!(report.violation_count(), 1);
        assert!((report.diff().y(0) + 0.2).abs() < 1e-9);
    }

    #[test]
    fn band_is_interpolated_between_knots() {
        let band = triangle_band();
        let b = bounds_at(&band, 0.5);
        assert!((b.lower - 0.4).abs() < 1e-12);
        assert!((b.upper - 0.6).abs() < 1e-12);

        let test = curve(&[0.0, 0.5, 2.0], &[0.0, 0.65, 0.0]);
        let report = validate_band(&band, &test).unwrap();
        assert_eq!(report.violation_count(), 1);
        assert!((report.diff().y(0) - 0.05).abs() < 1e-9);
    }

    #[test]
    fn boundary_exact_sample_passes() {
        let band = triangle_band();
        let upper = band.upper().y(1);
        let test = curve(&[0.0, 1.0, 2.0], &[0.0, upper + 0.5 * EPS, 0.0]);
        assert!(validate_band(&band, &test).unwrap().is_valid());

        let lower = band.lower().y(1);
        let test = curve(&[0.0, 1.0, 2.0], &[0.0, lower - 0.5 * EPS, 0.0]);
        assert!(validate_band(&band, &test).unwrap().is_valid());
    }

    #[test]
    fn bare_curves_keep_step_envelope_with_x_tolerance() {
        // Midpoint recovery of x = 0.1 with atolx = 0.3 is not bit-exact.
        let reference = curve(&[0.0, 0.1, 0.1, 1.0], &[0.0, 0.0, 1.0, 1.0]);
        let band = build_band(&reference, &ToleranceSpec::new(0.3, 0.1, 0.0, 0.0)).unwrap();
        let test = curve(&[0.0, 0.1, 1.0], &[0.0, 0.5, 1.0]);

        let from_band = validate_band(&band, &test).unwrap();
        let (lower, upper) = band.into_curves();
        let from_curves = validate(&lower, &upper, &test).unwrap();

        assert!(from_band.is_valid());
        assert_eq!(from_curves, from_band);
    }

    #[test]
    fn test_x_within_eps_of_step_uses_envelope() {
        let reference = curve(&[0.0, 1.0, 1.0, 2.0], &[0.0, 0.0, 1.0, 1.0]);
        let band = build_band(&reference, &ToleranceSpec::new(0.0, 0.1, 0.0, 0.0)).unwrap();

        let b = bounds_at(&band, 1.0 + 0.5 * EPS);
        assert!((b.lower + 0.1).abs() < 1e-12);
        assert!((b.upper - 1.1).abs() < 1e-12);

        let test = curve(&[0.0, 1.0 - 0.5 * EPS, 2.0], &[0.0, 0.5, 1.0]);
        assert!(validate_band(&band, &test).unwrap().is_valid());
    }

    #[test]
    fn shared_coordinate_uses_envelope_of_coincident_samples() {
        // Step from 0 to 1 at x = 1.
        let reference = curve(&[0.0, 1.0, 1.0, 2.0], &[0.0, 0.0, 1.0, 1.0]);
        let band = build_band(&reference, &ToleranceSpec::new(0.0, 0.1, 0.0, 0.0)).unwrap();

        let b = bounds_at(&band, 1.0);
        assert!((b.lower + 0.1).abs() < 1e-12);
        assert!((b.upper - 1.1).abs() < 1e-12);

        let test = curve(&[0.0, 1.0, 2.0], &[0.0, 0.5, 1.0]);
        assert!(validate_band(&band, &test).unwrap().is_valid());
    }

    #[test]
    fn x_tolerance_extends_endpoints() {
        let reference = curve(&[0.0, 1.0], &[1.0, 1.0]);
        let band = build_band(&reference, &ToleranceSpec::new(0.1, 0.0, 0.0, 0.0)).unwrap();

        let test = curve(&[-0.05, 1.05], &[1.0, 1.0]);
        assert!(validate_band(&band, &test).unwrap().is_valid());

        let test = curve(&[-0.2, 1.0], &[1.0, 1.0]);
        let err = validate_band(&band, &test).unwrap_err();
        assert!(matches!(err, FunnelError::DomainMismatch { which: "minimum", .. }));

        let test = curve(&[0.0, 1.2], &[1.0, 1.0]);
        let err = validate_band(&band, &test).unwrap_err();
        assert!(matches!(err, FunnelError::DomainMismatch { which: "maximum", .. }));
    }

    #[test]
    fn bare_curves_recover_reference_knots() {
        let reference = curve(&[0.0, 1.0, 2.0], &[0.0, 1.0, 0.0]);
        let band = build_band(&reference, &ToleranceSpec::new(0.05, 0.1, 0.0, 0.0)).unwrap();
        let (lower, upper) = band.into_curves();

        let test = curve(&[0.0, 1.0, 2.0], &[0.0, 1.2, 0.0]);
        let report = validate(&lower, &upper, &test).unwrap();
        assert_eq!(report.violation_count(), 1);
        assert!((report.diff().y(0) - 0.1).abs() < 1e-9);
    }

    #[test]
    fn empty_bounds_collapse() {
        let empty = Curve::default();
        let test = curve(&[0.0], &[0.0]);
        let err = validate(&empty, &empty, &test).unwrap_err();
        assert!(matches!(err, FunnelError::BandCollapsed { lower: 0, upper: 0 }));
    }

    #[test]
    fn mismatched_bound_lengths_collapse() {
        let lower = curve(&[0.0, 1.0], &[0.0, 0.0]);
        let upper = curve(&[0.0], &[1.0]);
        let test = curve(&[0.0], &[0.5]);
        let err = validate(&lower, &upper, &test).unwrap_err();
        assert!(matches!(err, FunnelError::BandCollapsed { lower: 2, upper: 1 }));
    }

    #[test]
    fn single_sample_reference() {
        let reference = curve(&[3.0], &[2.0]);
        let band = build_band(&reference, &ToleranceSpec::new(0.0, 0.5, 0.0, 0.0)).unwrap();
        assert!(validate_band(&band, &curve(&[3.0], &[2.4])).unwrap().is_valid());
        let report = validate_band(&band, &curve(&[3.0], &[1.0])).unwrap();
        assert!((report.diff().y(0) + 0.5).abs() < 1e-12);
    }
}
