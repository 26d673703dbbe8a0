//! Tolerance tube construction.
//!
//! Every reference sample `(x, y)` is surrounded by an axis-aligned rectangle
//! with half-width `wx = atolx + rtolx * |x|` and half-height
//! `wy = atoly + rtoly * |y|`. The lower bounding curve joins the bottom-left
//! corners, the upper one the top-right corners:
//!
//! ```text
//! lower(i) = (x_i - wx_i, y_i - wy_i)
//! upper(i) = (x_i + wx_i, y_i + wy_i)
//! ```
//!
//! When `wx` varies between neighbours the bounding curves are not
//! necessarily sorted by x. The validator therefore never searches them by x;
//! it interpolates over the reference knots stored alongside.

use tracing::debug;

use crate::domain::{Band, Curve, Point, ToleranceSpec};
use crate::error::{FunnelError, Result};

/// Half-width and half-height of the tube at one reference sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TubeSize {
    pub wx: f64,
    pub wy: f64,
}

/// Compute the per-sample tube size for a reference curve.
pub fn tube_size(reference: &Curve, tol: &ToleranceSpec) -> Result<Vec<TubeSize>> {
    reference.ensure_non_empty("reference")?;
    tol.validate()?;

    reference
        .points()
        .iter()
        .map(|p| {
            let wx = tol.half_width(p.x);
            let wy = tol.half_height(p.y);
            if !wx.is_finite() {
                return Err(FunnelError::InvalidTolerance {
                    name: "half-width",
                    value: wx,
                });
            }
            if !wy.is_finite() {
                return Err(FunnelError::InvalidTolerance {
                    name: "half-height",
                    value: wy,
                });
            }
            Ok(TubeSize { wx, wy })
        })
        .collect()
}

/// Build the lower and upper bounding curves around `reference`.
pub fn build_band(reference: &Curve, tol: &ToleranceSpec) -> Result<Band> {
    let sizes = tube_size(reference, tol)?;

    let n = reference.len();
    let mut lower = Vec::with_capacity(n);
    let mut upper = Vec::with_capacity(n);
    let mut knots = Vec::with_capacity(n);

    for (p, size) in reference.points().iter().zip(&sizes) {
        let lo = Point::new(p.x - size.wx, p.y - size.wy);
        let hi = Point::new(p.x + size.wx, p.y + size.wy);
        check_corner(lo, size)?;
        check_corner(hi, size)?;
        lower.push(lo);
        upper.push(hi);
        knots.push(p.x);
    }

    debug!(samples = n, ?tol, "built tolerance band");

    Ok(Band {
        lower: Curve::from_points(lower),
        upper: Curve::from_points(upper),
        knots,
    })
}

/// A tube corner must stay finite even when `wx` / `wy` are.
fn check_corner(corner: Point, size: &TubeSize) -> Result<()> {
    if !corner.x.is_finite() {
        return Err(FunnelError::InvalidTolerance {
            name: "half-width",
            value: size.wx,
        });
    }
    if !corner.y.is_finite() {
        return Err(FunnelError::InvalidTolerance {
            name: "half-height",
            value: size.wy,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn curve(x: &[f64], y: &[f64]) -> Curve {
        Curve::from_slices("reference", x, y).unwrap()
    }

    #[test]
    fn band_offsets_each_sample_by_its_tube_size() {
        let reference = curve(&[0.0, 1.0, 2.0], &[0.0, 1.0, 0.0]);
        let tol = ToleranceSpec::new(0.0, 0.1, 0.0, 0.0);
        let band = build_band(&reference, &tol).unwrap();

        assert_eq!(band.len(), 3);
        assert_eq!(band.knots(), &[0.0, 1.0, 2.0]);
        assert!((band.lower().y(1) - 0.9).abs() < 1e-12);
        assert!((band.upper().y(1) - 1.1).abs() < 1e-12);
        assert_eq!(band.lower().x(1), 1.0);
        assert_eq!(band.upper().x(1), 1.0);
    }

    #[test]
    fn relative_tolerance_scales_with_magnitude() {
        let reference = curve(&[-2.0, 4.0], &[-10.0, 5.0]);
        let tol = ToleranceSpec::new(0.0, 0.0, 0.5, 0.1);
        let sizes = tube_size(&reference, &tol).unwrap();

        assert!((sizes[0].wx - 1.0).abs() < 1e-12);
        assert!((sizes[0].wy - 1.0).abs() < 1e-12);
        assert!((sizes[1].wx - 2.0).abs() < 1e-12);
        assert!((sizes[1].wy - 0.5).abs() < 1e-12);
    }

    #[test]
    fn bounding_x_may_lose_monotonicity() {
        let reference = curve(&[-10.0, 1.0], &[0.0, 0.0]);
        let tol = ToleranceSpec::new(0.0, 0.0, 1.5, 0.0);
        let band = build_band(&reference, &tol).unwrap();
        // upper.x(0) = -10 + 15 = 5 > upper.x(1) = 1 + 1.5 = 2.5
        assert!(band.upper().x(0) > band.upper().x(1));
    }

    #[test]
    fn empty_reference_is_rejected() {
        let reference = Curve::default();
        let err = build_band(&reference, &ToleranceSpec::default()).unwrap_err();
        assert!(matches!(err, FunnelError::EmptyCurve { .. }));
    }

    #[test]
    fn negative_tolerance_is_rejected() {
        let reference = curve(&[0.0], &[0.0]);
        let tol = ToleranceSpec::new(-1.0, 0.0, 0.0, 0.0);
        let err = build_band(&reference, &tol).unwrap_err();
        assert!(matches!(err, FunnelError::InvalidTolerance { name: "atolx", .. }));
    }

    #[test]
    fn overflowing_tube_size_is_rejected() {
        let reference = curve(&[0.0], &[f64::MAX]);
        let tol = ToleranceSpec::new(0.0, 0.0, 0.0, 10.0);
        let err = build_band(&reference, &tol).unwrap_err();
        assert!(matches!(err, FunnelError::InvalidTolerance { name: "half-height", .. }));
    }

    #[test]
    fn overflowing_corner_is_rejected() {
        // wx = MAX / 2 is finite, but MAX + wx is not.
        let reference = curve(&[0.0, f64::MAX], &[0.0, 0.0]);
        let tol = ToleranceSpec::new(0.0, 0.0, 0.5, 0.0);
        let err = build_band(&reference, &tol).unwrap_err();
        assert!(matches!(err, FunnelError::InvalidTolerance { name: "half-width", .. }));

        let reference = curve(&[0.0], &[-f64::MAX]);
        let tol = ToleranceSpec::new(0.0, 0.0, 0.0, 0.5);
        let err = build_band(&reference, &tol).unwrap_err();
        assert!(matches!(err, FunnelError::InvalidTolerance { name: "half-height", .. }));
    }

    #[test]
    fn build_band_is_bit_identical_across_calls() {
        let reference = curve(&[0.0, 0.3, 0.7, 1.0], &[0.1, -0.2, 3.3, 1e-9]);
        let tol = ToleranceSpec::new(1e-3, 2e-2, 0.1, 0.05);
        let a = build_band(&reference, &tol).unwrap();
        let b = build_band(&reference, &tol).unwrap();
        for (p, q) in a.lower().points().iter().zip(b.lower().points()) {
            assert_eq!(p.x.to_bits(), q.x.to_bits());
            assert_eq!(p.y.to_bits(), q.y.to_bits());
        }
        for (p, q) in a.upper().points().iter().zip(b.upper().points()) {
            assert_eq!(p.x.to_bits(), q.x.to_bits());
            assert_eq!(p.y.to_bits(), q.y.to_bits());
        }
    }
}
