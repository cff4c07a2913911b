//! Geometry helpers - distances, interpolation and projection
//!
//! All coordinates live on the logical canvas (x to the right, y down).
//! Points are `nalgebra::Point2<f64>` so the usual vector arithmetic applies.

use nalgebra::Point2;

/// A point on the logical canvas
pub type Point = Point2<f64>;

/// Euclidean distance between two points
pub fn distance(a: &Point, b: &Point) -> f64 {
    nalgebra::distance(a, b)
}

/// Point at fraction `t` along the segment `a -> b`
///
/// With `snap_axis` set, the coordinate perpendicular to travel is pinned to
/// the start point so that floating point drift never pulls the result off an
/// axis-aligned segment:
///
/// - horizontal segment: `y` is forced to `a.y`
/// - vertical segment: `x` is forced to `a.x`
/// - anything else (diagonal or zero-length): treated as horizontal, `y = a.y`
///
/// The last rule is a simplification. Diagonal segments do not really get
/// diagonal support when snapping.
pub fn interpolate(a: &Point, b: &Point, t: f64, snap_axis: bool) -> Point {
    let mut p = *a + (*b - *a) * t;

    if snap_axis {
        let dx = b.x - a.x;
        let dy = b.y - a.y;
        if dx != 0.0 && dy == 0.0 {
            p.y = a.y;
        } else if dx == 0.0 && dy != 0.0 {
            p.x = a.x;
        } else {
            p.y = a.y;
        }
    }

    p
}

/// Result of projecting a point onto a segment
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projection {
    /// Fraction along the segment, clamped to [0, 1]
    pub t: f64,
    /// The projected point on the segment
    pub point: Point,
    /// Distance from the original point to `point`
    pub distance: f64,
}

/// Project `p` onto the segment `a -> b`
///
/// Returns `None` for a zero-length segment, which has no direction to
/// project onto.
pub fn project_onto_segment(p: &Point, a: &Point, b: &Point) -> Option<Projection> {
    let v = *b - *a;
    let len_sq = v.norm_squared();
    if len_sq == 0.0 {
        return None;
    }

    // Project onto the infinite line, then clamp to the segment
    let t = ((*p - *a).dot(&v) / len_sq).clamp(0.0, 1.0);
    let point = *a + v * t;

    Some(Projection {
        t,
        point,
        distance: distance(p, &point),
    })
}
