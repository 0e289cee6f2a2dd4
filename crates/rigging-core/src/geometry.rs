//! Quadratic cable curves and the distance queries run against them.
//!
//! Everything here is pure. Coordinates are canvas pixels with `y` growing
//! downwards, so a positive sag pulls the control point towards the floor.

use glam::Vec2;

/// Axis-aligned box in canvas space. `contains` is inclusive on every edge.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    pub fn from_pos_size(pos: Vec2, size: Vec2) -> Self {
        Self {
            min: pos,
            max: pos + size.max(Vec2::ZERO),
        }
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }
}

/// Point at parameter `t` on the quadratic Bézier `p0 → control → p1`.
#[inline]
pub fn sample_quadratic(p0: Vec2, control: Vec2, p1: Vec2, t: f32) -> Vec2 {
    let u = 1.0 - t;
    p0 * (u * u) + control * (2.0 * u * t) + p1 * (t * t)
}

/// Vertical droop for a cable spanning `distance` with `sag_percent` in \[0, 100\].
///
/// Out-of-range inputs are clamped: a negative or non-finite span gives zero
/// sag and the percentage is held to \[0, 100\].
#[inline]
pub fn compute_sag(distance: f32, sag_percent: f32) -> f32 {
    let d = if distance.is_finite() { distance.max(0.0) } else { 0.0 };
    let s = if sag_percent.is_finite() {
        sag_percent.clamp(0.0, 100.0)
    } else {
        0.0
    };
    d * s / 100.0
}

/// How a cable's span is measured before its sag percentage is applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SagSpan {
    /// Straight-line distance between the ends. Cables strung between gear.
    Direct,
    /// Horizontal distance only, so a vertical cable hangs straight.
    /// Cables drawn from a background layout.
    Horizontal,
}

impl SagSpan {
    #[inline]
    pub fn measure(self, a: Vec2, b: Vec2) -> f32 {
        match self {
            SagSpan::Direct => a.distance(b),
            SagSpan::Horizontal => (b.x - a.x).abs(),
        }
    }
}

/// A quadratic cable segment.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct QuadCurve {
    pub start: Vec2,
    pub control: Vec2,
    pub end: Vec2,
}

impl QuadCurve {
    pub fn new(start: Vec2, control: Vec2, end: Vec2) -> Self {
        Self {
            start,
            control,
            end,
        }
    }

    /// Cable between two points whose control point sits `sag` below their midpoint.
    pub fn sagging(start: Vec2, end: Vec2, sag: f32) -> Self {
        let mid = (start + end) * 0.5;
        Self::new(start, mid + Vec2::new(0.0, sag), end)
    }

    /// Cable with `sag_percent` of its straight span as droop.
    pub fn with_sag_percent(start: Vec2, end: Vec2, sag_percent: f32) -> Self {
        Self::with_sag(start, end, sag_percent, SagSpan::Direct)
    }

    /// Cable with `sag_percent` of its span, measured as `span`, as droop.
    pub fn with_sag(start: Vec2, end: Vec2, sag_percent: f32, span: SagSpan) -> Self {
        Self::sagging(start, end, compute_sag(span.measure(start, end), sag_percent))
    }

    #[inline]
    pub fn point_at(&self, t: f32) -> Vec2 {
        sample_quadratic(self.start, self.control, self.end, t)
    }

    pub fn span(&self) -> f32 {
        self.start.distance(self.end)
    }

    /// SVG path data, `M x1 y1 Q cx cy x2 y2`.
    pub fn to_svg_path(&self) -> String {
        format!(
            "M {} {} Q {} {} {} {}",
            self.start.x, self.start.y, self.control.x, self.control.y, self.end.x, self.end.y
        )
    }
}

/// Closest sampled point of a curve to some query point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CurveHit {
    pub t: f32,
    pub point: Vec2,
    pub distance: f32,
}

/// Scan `sample_count + 1` evenly spaced parameters (both ends included) and
/// return the sample nearest to `query`. Ties keep the earliest parameter.
pub fn nearest_point_on_curve(curve: &QuadCurve, query: Vec2, sample_count: usize) -> CurveHit {
    let steps = sample_count.max(1);
    let mut best = CurveHit {
        t: 0.0,
        point: curve.start,
        distance: curve.start.distance(query),
    };
    for i in 1..=steps {
        let t = i as f32 / steps as f32;
        let point = curve.point_at(t);
        let distance = point.distance(query);
        if distance < best.distance {
            best = CurveHit { t, point, distance };
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_contains_its_edges() {
        let r = Rect::from_pos_size(Vec2::new(10.0, 10.0), Vec2::new(20.0, 10.0));
        assert!(r.contains(Vec2::new(10.0, 10.0)));
        assert!(r.contains(Vec2::new(30.0, 20.0)));
        assert!(!r.contains(Vec2::new(30.1, 15.0)));
        assert_eq!(r.center(), Vec2::new(20.0, 15.0));
    }

    #[test]
    fn degenerate_curve_collapses_to_a_point() {
        let p = Vec2::new(4.0, 4.0);
        let c = QuadCurve::with_sag_percent(p, p, 50.0);
        assert_eq!(c.control, p);
        assert_eq!(c.point_at(0.5), p);
    }
}
