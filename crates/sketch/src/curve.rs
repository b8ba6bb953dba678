//! Curve fitting for the stroke smoother
//!
//! A segment is fitted from a window of four samples. Only the middle two
//! samples are joined; the outer ones supply the tangents, which keeps
//! consecutive segments continuous at their shared end points.

use glam::Vec2;

use crate::constants::CURVE_LENGTH_CHORDS;
use crate::types::{CurveSegment, Sample};

/// Fit one cubic segment from `p1` to `p2`, using `p0` and `p3` for tangents.
pub fn fit(p0: &Sample, p1: &Sample, p2: &Sample, p3: &Sample) -> CurveSegment {
    let (_, control1) = control_points(p0.position(), p1.position(), p2.position());
    let (control2, _) = control_points(p1.position(), p2.position(), p3.position());
    CurveSegment::new(p1.position(), control1, control2, p2.position())
}

/// Candidate control points anchored at `b` for the triple `(a, b, c)`.
///
/// The midpoints of `ab` and `bc` are blended by the ratio of the segment
/// lengths, then both are shifted so the blend lands on `b`. Coincident
/// points give a zero ratio instead of NaN.
pub fn control_points(a: Vec2, b: Vec2, c: Vec2) -> (Vec2, Vec2) {
    let m1 = (a + b) / 2.0;
    let m2 = (b + c) / 2.0;

    let l1 = a.distance(b);
    let l2 = b.distance(c);

    let total = l1 + l2;
    let mut k = if total > 0.0 { l2 / total } else { 0.0 };
    if !k.is_finite() {
        k = 0.0;
    }

    let cm = m2 + (m1 - m2) * k;
    let shift = b - cm;
    (m1 + shift, m2 + shift)
}

/// Position on the curve at parameter `t` (Bernstein form)
#[inline]
pub fn point_at(curve: &CurveSegment, t: f32) -> Vec2 {
    let u = 1.0 - t;
    let uu = u * u;
    let tt = t * t;
    curve.start * (uu * u)
        + curve.control1 * (3.0 * uu * t)
        + curve.control2 * (3.0 * u * tt)
        + curve.end * (tt * t)
}

/// Approximate arc length from 11 evenly spaced evaluations.
///
/// Only used to pick a raster step count.
pub fn length(curve: &CurveSegment) -> f32 {
    let mut total = 0.0;
    let mut previous = curve.start;
    for i in 1..=CURVE_LENGTH_CHORDS {
        let t = i as f32 / CURVE_LENGTH_CHORDS as f32;
        let current = point_at(curve, t);
        total += current.distance(previous);
        previous = current;
    }
    if total.is_finite() { total } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(x: f32, y: f32, t: u64) -> Sample {
        Sample::new(x, y, t)
    }

    #[test]
    fn test_fit_collinear_input_gives_collinear_controls() {
        let p0 = sample(0.0, 0.0, 0);
        let p1 = sample(10.0, 0.0, 10);
        let p2 = sample(20.0, 0.0, 20);
        let p3 = sample(30.0, 0.0, 30);

        let curve = fit(&p0, &p1, &p2, &p3);

        assert_eq!(curve.start, Vec2::new(10.0, 0.0));
        assert_eq!(curve.end, Vec2::new(20.0, 0.0));
        assert_eq!(curve.control1.y, 0.0);
        assert_eq!(curve.control2.y, 0.0);
        // Evenly spaced input: both controls land on the segment midpoint
        assert!((curve.control1.x - 15.0).abs() < 0.001);
        assert!((curve.control2.x - 15.0).abs() < 0.001);
    }

    #[test]
    fn test_control_points_anchored_at_middle() {
        let (c1, c2) = control_points(
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 10.0),
            Vec2::new(20.0, 0.0),
        );
        // Symmetric triple: the tangent at b is horizontal
        assert!((c1.y - 10.0).abs() < 0.001);
        assert!((c2.y - 10.0).abs() < 0.001);
        assert!(c1.x < 10.0 && c2.x > 10.0);
    }

    #[test]
    fn test_control_points_coincident() {
        let p = Vec2::new(5.0, 5.0);
        let (c1, c2) = control_points(p, p, p);
        assert_eq!(c1, p);
        assert_eq!(c2, p);
    }

    #[test]
    fn test_fit_coincident_is_finite() {
        let s = sample(42.0, 17.0, 5);
        let curve = fit(&s, &s, &s, &s);
        assert!(curve.is_finite());
        // Bernstein evaluation leaves rounding residue, well below one step
        assert!(length(&curve) < 1e-3);
        assert_eq!(length(&curve).floor(), 0.0);
        let steps = crate::raster::expand(
            &curve,
            3.0,
            7.0,
            crate::types::DrawMode::Draw,
            &sketchpad_config::PenParams::default(),
        );
        assert!(steps.is_empty());
    }

    #[test]
    fn test_point_at_endpoints() {
        let curve = CurveSegment::new(
            Vec2::new(0.0, 0.0),
            Vec2::new(5.0, 5.0),
            Vec2::new(10.0, 10.0),
            Vec2::new(15.0, 15.0),
        );
        assert_eq!(point_at(&curve, 0.0), curve.start);
        assert!((point_at(&curve, 1.0) - curve.end).length() < 0.001);
        assert!((point_at(&curve, 0.5) - Vec2::new(7.5, 7.5)).length() < 0.001);
    }

    #[test]
    fn test_length_straight_line() {
        let curve = CurveSegment::new(
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(20.0, 0.0),
            Vec2::new(30.0, 0.0),
        );
        assert!((length(&curve) - 30.0).abs() < 0.01);
    }
}
