//! Connector label placement.

use crate::geometry::{Point, edge_normal};

/// Picks the anchor point for a connector label on a simplified path.
///
/// The longest straight segment wins (the earliest on ties). If it is longer
/// than twice `min_clearance` the label sits beside the segment midpoint,
/// pushed `offset` along the segment normal so it does not overlap the
/// stroke; shorter segments get the plain midpoint. The offset is purely
/// perpendicular, so the label stays centred along the segment. Returns
/// `None` for a path with fewer than two points.
///
/// # Examples
///
/// ```
/// use trellis_core::geometry::Point;
/// use trellis_core::routing::label_anchor;
///
/// let path = [Point::new(0.0, 0.0), Point::new(100.0, 0.0)];
/// let anchor = label_anchor(&path, 12.0, 8.0).unwrap();
/// assert_eq!(anchor, Point::new(50.0, -8.0));
/// ```
pub fn label_anchor(points: &[Point], min_clearance: f32, offset: f32) -> Option<Point> {
    let (a, b) = points
        .windows(2)
        .map(|w| (w[0], w[1]))
        .fold(None, |best: Option<(Point, Point)>, (a, b)| match best {
            Some((ba, bb)) if bb.sub_point(ba).hypot() >= b.sub_point(a).hypot() => best,
            _ => Some((a, b)),
        })?;

    let midpoint = a.midpoint(b);
    if b.sub_point(a).hypot() <= 2.0 * min_clearance {
        return Some(midpoint);
    }
    match edge_normal(a, b) {
        Ok(normal) => Some(midpoint.add_point(normal.scale(offset))),
        Err(_) => Some(midpoint),
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    #[test]
    fn test_label_on_longest_segment() {
        let path = [
            Point::new(0.0, 0.0),
            Point::new(0.0, 20.0),
            Point::new(100.0, 20.0),
            Point::new(100.0, 40.0),
        ];
        assert_eq!(label_anchor(&path, 12.0, 8.0), Some(Point::new(50.0, 12.0)));
    }

    #[test]
    fn test_short_segment_uses_plain_midpoint() {
        let path = [Point::new(0.0, 0.0), Point::new(0.0, 20.0)];
        assert_eq!(label_anchor(&path, 12.0, 8.0), Some(Point::new(0.0, 10.0)));
    }

    #[test]
    fn test_offset_is_perpendicular_on_diagonal() {
        let (a, b) = (Point::new(0.0, 0.0), Point::new(60.0, 80.0));
        let anchor = label_anchor(&[a, b], 12.0, 10.0).unwrap();
        let from_mid = anchor.sub_point(a.midpoint(b));
        let along = b.sub_point(a);

        assert_approx_eq!(f32, from_mid.hypot(), 10.0, epsilon = 1e-4);
        let dot = from_mid.x() * along.x() + from_mid.y() * along.y();
        assert_approx_eq!(f32, dot, 0.0, epsilon = 1e-3);
    }

    #[test]
    fn test_degenerate_paths() {
        assert_eq!(label_anchor(&[], 12.0, 8.0), None);
        assert_eq!(label_anchor(&[Point::new(1.0, 1.0)], 12.0, 8.0), None);

        let p = Point::new(5.0, 5.0);
        assert_eq!(label_anchor(&[p, p], 0.0, 8.0), Some(p));
    }
}
