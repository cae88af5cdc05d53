use std::fmt::Write as _;

use crate::document::{Point, Viewport};
use crate::viewport::to_screen_space;

/// Cubic bezier curve used to draw and hit-test connections
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicBezier {
    pub p0: Point, // Start point
    pub p1: Point, // Control point 1
    pub p2: Point, // Control point 2
    pub p3: Point, // End point
}

impl CubicBezier {
    /// Create a horizontal-biased bezier between two port anchors
    ///
    /// Control points extend horizontally from start and end by
    /// `max(|dx| / 2, min_offset)`. If the endpoints are closer than
    /// `straight_threshold` the curve collapses to a straight segment to
    /// avoid zig-zags.
    pub fn from_endpoints(start: Point, end: Point, min_offset: f64, straight_threshold: f64) -> Self {
        if start.distance_sq(end) < straight_threshold * straight_threshold {
            return CubicBezier {
                p0: start,
                p1: start,
                p2: end,
                p3: end,
            };
        }

        let offset = ((end.x - start.x).abs() * 0.5).max(min_offset);

        CubicBezier {
            p0: start,
            p1: Point::new(start.x + offset, start.y),
            p2: Point::new(end.x - offset, end.y),
            p3: end,
        }
    }

    /// Whether the control points coincide with the endpoints
    pub fn is_straight(&self) -> bool {
        self.p1 == self.p0 && self.p2 == self.p3
    }

    pub fn start(&self) -> Point {
        self.p0
    }

    pub fn end(&self) -> Point {
        self.p3
    }

    /// Evaluate the bezier curve at parameter t (0.0 to 1.0)
    pub fn eval(&self, t: f64) -> Point {
        let t2 = t * t;
        let t3 = t2 * t;
        let mt = 1.0 - t;
        let mt2 = mt * mt;
        let mt3 = mt2 * mt;

        let x = mt3 * self.p0.x
            + 3.0 * mt2 * t * self.p1.x
            + 3.0 * mt * t2 * self.p2.x
            + t3 * self.p3.x;
        let y = mt3 * self.p0.y
            + 3.0 * mt2 * t * self.p1.y
            + 3.0 * mt * t2 * self.p2.y
            + t3 * self.p3.y;

        Point::new(x, y)
    }

    /// Apply a point mapping to all four control points.
    ///
    /// Beziers are affine invariant, so mapping through the viewport yields
    /// exactly the screen-space curve.
    pub fn map(&self, f: impl Fn(Point) -> Point) -> Self {
        CubicBezier {
            p0: f(self.p0),
            p1: f(self.p1),
            p2: f(self.p2),
            p3: f(self.p3),
        }
    }

    /// The same curve in screen space
    pub fn to_screen(&self, viewport: &Viewport) -> Self {
        self.map(|p| to_screen_space(viewport, p))
    }

    /// SVG path commands (e.g. "M 10 20 C 60 20 90 80 140 80")
    pub fn to_svg_path(&self) -> String {
        let mut out = String::with_capacity(64);
        if self.is_straight() {
            let _ = write!(out, "M {} {} L {} {}", self.p0.x, self.p0.y, self.p3.x, self.p3.y);
        } else {
            let _ = write!(
                out,
                "M {} {} C {} {} {} {} {} {}",
                self.p0.x, self.p0.y, self.p1.x, self.p1.y, self.p2.x, self.p2.y, self.p3.x, self.p3.y
            );
        }
        out
    }

    /// Minimum distance from a point to the curve
    ///
    /// Samples the curve into `num_samples` segments (20 when zero is given).
    pub fn distance_to(&self, point: Point, num_samples: usize) -> f64 {
        let num_samples = if num_samples == 0 { 20 } else { num_samples };

        let mut min_dist_sq = f64::MAX;
        let mut prev_point = self.eval(0.0);

        for i in 1..=num_samples {
            let t = i as f64 / num_samples as f64;
            let curr_point = self.eval(t);

            let dist_sq = distance_to_line_segment_sq(point, prev_point, curr_point);
            if dist_sq < min_dist_sq {
                min_dist_sq = dist_sq;
            }

            prev_point = curr_point;
        }

        min_dist_sq.sqrt()
    }
}

/// Squared distance from a point to a line segment
fn distance_to_line_segment_sq(point: Point, a: Point, b: Point) -> f64 {
    let ab = b - a;
    let ap = point - a;

    let ab_len_sq = ab.x * ab.x + ab.y * ab.y;

    if ab_len_sq < f64::EPSILON {
        // a == b
        return ap.x * ap.x + ap.y * ap.y;
    }

    // Project onto the line, clamped to the segment
    let t = ((ap.x * ab.x + ap.y * ab.y) / ab_len_sq).clamp(0.0, 1.0);
    let closest = Point::new(a.x + t * ab.x, a.y + t * ab.y);

    point.distance_sq(closest)
}
