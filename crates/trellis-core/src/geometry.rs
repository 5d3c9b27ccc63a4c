//! Geometric primitives for diagram layout and positioning.
//!
//! This module provides the fundamental geometric types used throughout
//! Trellis for resolving positions, sizes, and bounding boxes of elements.
//!
//! # Overview
//!
//! - [`Point`] - A 2D coordinate or vector in diagram space
//! - [`Size`] - Width and height dimensions
//! - [`Bounds`] - An axis-aligned rectangle defined by minimum and maximum coordinates
//! - [`Insets`] - Per-side values for margin, border and padding
//! - [`Affine`] - A 2D affine transform used to compose rotations and offsets
//!
//! # Coordinate System
//!
//! Trellis uses a coordinate system consistent with SVG:
//!
//! ```text
//!   (0,0) ────────► +X
//!     │
//!     │
//!     ▼
//!    +Y
//! ```
//!
//! Positive rotation angles turn clockwise on screen, matching SVG's
//! `rotate()` transform.

use crate::error::Error;

/// Lengths below this are treated as zero when normalizing vectors.
const LENGTH_EPSILON: f32 = 1e-6;

/// A 2D point representing a position (or a displacement) in diagram space.
///
/// # Examples
///
/// ```
/// # use trellis_core::geometry::Point;
/// let p1 = Point::new(10.0, 20.0);
/// let p2 = Point::new(5.0, 5.0);
///
/// let sum = p1.add_point(p2);
/// assert_eq!(sum.x(), 15.0);
/// assert_eq!(sum.y(), 25.0);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    x: f32,
    y: f32,
}

impl Point {
    /// Creates a new point with the specified coordinates
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Returns the x-coordinate of the point
    pub fn x(self) -> f32 {
        self.x
    }

    /// Returns the y-coordinate of the point
    pub fn y(self) -> f32 {
        self.y
    }

    /// Returns a copy of this point with a new x-coordinate
    pub fn with_x(mut self, x: f32) -> Self {
        self.x = x;
        self
    }

    /// Returns a copy of this point with a new y-coordinate
    pub fn with_y(mut self, y: f32) -> Self {
        self.y = y;
        self
    }

    /// Checks if both x and y coordinates are zero
    pub fn is_zero(self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }

    /// Adds another point to this point, returning a new point
    pub fn add_point(self, other: Point) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }

    /// Subtracts another point from this point, returning a new point
    pub fn sub_point(self, other: Point) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }

    /// Calculates the midpoint between this point and another point
    pub fn midpoint(self, other: Point) -> Self {
        Self {
            x: (self.x + other.x) / 2.0,
            y: (self.y + other.y) / 2.0,
        }
    }

    /// Calculates the hypotenuse (Euclidean length of the vector)
    pub fn hypot(self) -> f32 {
        self.x.hypot(self.y)
    }

    /// Multiplies both coordinates by the given factor
    pub fn scale(self, factor: f32) -> Self {
        Self {
            x: self.x * factor,
            y: self.y * factor,
        }
    }

    /// Manhattan (L1) distance to another point
    pub fn manhattan_distance(self, other: Point) -> f32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }

    /// Returns the unit vector pointing in the same direction.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Geometry`] when the vector has zero (or non-finite)
    /// length, since it has no direction.
    pub fn normalize(self, operation: &'static str) -> Result<Self, Error> {
        let length = self.hypot();
        if !length.is_finite() || length < LENGTH_EPSILON {
            return Err(Error::geometry(
                operation,
                format!(
                    "direction vector ({}, {}) has zero length",
                    self.x, self.y
                ),
            ));
        }
        Ok(self.scale(1.0 / length))
    }
}

/// Returns the unit normal of the edge `a → b`.
///
/// The normal points to the left of the direction of travel in screen
/// coordinates (a 90° counter-clockwise turn on screen).
///
/// # Errors
///
/// Returns [`Error::Geometry`] when `a` and `b` coincide.
pub fn edge_normal(a: Point, b: Point) -> Result<Point, Error> {
    let direction = b.sub_point(a).normalize("edge_normal")?;
    Ok(Point::new(direction.y(), -direction.x()))
}

/// Represents the dimensions of an element with width and height
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Size {
    width: f32,
    height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Returns the width dimension of this size
    pub fn width(self) -> f32 {
        self.width
    }

    /// Returns the height dimension of this size
    pub fn height(self) -> f32 {
        self.height
    }

    /// Returns a copy with a new width
    pub fn with_width(mut self, width: f32) -> Self {
        self.width = width;
        self
    }

    /// Returns a copy with a new height
    pub fn with_height(mut self, height: f32) -> Self {
        self.height = height;
        self
    }

    /// Returns a new Size with the maximum width and height between this size and another
    pub fn max(self, other: Size) -> Self {
        Self {
            width: self.width.max(other.width),
            height: self.height.max(other.height),
        }
    }

    /// Returns a new Size grown by the horizontal and vertical sums of `insets`
    pub fn add_padding(self, insets: Insets) -> Self {
        Self {
            width: self.width + insets.horizontal_sum(),
            height: self.height + insets.vertical_sum(),
        }
    }

    /// Returns true if both width and height are zero
    pub fn is_zero(self) -> bool {
        self.width == 0.0 && self.height == 0.0
    }

    /// Returns the center of a box of this size whose top-left is at the origin
    pub fn center(self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }
}

/// Represents a rectangular bounding box with minimum and maximum coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bounds {
    min_x: f32,
    min_y: f32,
    max_x: f32,
    max_y: f32,
}

impl Bounds {
    /// Creates bounds from a top-left corner and a size
    pub fn new_from_top_left(top_left: Point, size: Size) -> Self {
        Self {
            min_x: top_left.x,
            min_y: top_left.y,
            max_x: top_left.x + size.width,
            max_y: top_left.y + size.height,
        }
    }

    /// Creates bounds centered on `center` with the given size
    pub fn new_from_center(center: Point, size: Size) -> Self {
        Self::new_from_top_left(
            Point::new(center.x - size.width / 2.0, center.y - size.height / 2.0),
            size,
        )
    }

    /// Returns the smallest bounds enclosing every point, or `None` for an empty input
    pub fn from_points(points: impl IntoIterator<Item = Point>) -> Option<Self> {
        let mut points = points.into_iter();
        let first = points.next()?;
        let seed = Self {
            min_x: first.x,
            min_y: first.y,
            max_x: first.x,
            max_y: first.y,
        };
        Some(points.fold(seed, |acc, p| Self {
            min_x: acc.min_x.min(p.x),
            min_y: acc.min_y.min(p.y),
            max_x: acc.max_x.max(p.x),
            max_y: acc.max_y.max(p.y),
        }))
    }

    /// Returns the minimum x-coordinate of the bounds
    pub fn min_x(self) -> f32 {
        self.min_x
    }

    /// Returns the minimum y-coordinate of the bounds
    pub fn min_y(self) -> f32 {
        self.min_y
    }

    /// Returns the maximum x-coordinate of the bounds
    pub fn max_x(self) -> f32 {
        self.max_x
    }

    /// Returns the maximum y-coordinate of the bounds
    pub fn max_y(self) -> f32 {
        self.max_y
    }

    /// Returns the width of the bounds
    pub fn width(self) -> f32 {
        self.max_x - self.min_x
    }

    /// Returns the height of the bounds
    pub fn height(self) -> f32 {
        self.max_y - self.min_y
    }

    /// Returns the center point of the bounds
    pub fn center(self) -> Point {
        Point::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    /// Returns the top-left corner as a Point
    pub fn min_point(self) -> Point {
        Point::new(self.min_x, self.min_y)
    }

    /// Converts bounds to a Size object
    pub fn to_size(self) -> Size {
        Size::new(self.width(), self.height())
    }

    /// Returns the four corners clockwise from the top-left
    pub fn corners(self) -> [Point; 4] {
        [
            Point::new(self.min_x, self.min_y),
            Point::new(self.max_x, self.min_y),
            Point::new(self.max_x, self.max_y),
            Point::new(self.min_x, self.max_y),
        ]
    }

    /// Merges two bounds to create a larger bounds that contains both
    pub fn merge(&self, other: &Self) -> Self {
        Self {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }

    /// Moves the bounds by the specified offset
    pub fn translate(&self, offset: Point) -> Self {
        Self {
            min_x: self.min_x + offset.x,
            min_y: self.min_y + offset.y,
            max_x: self.max_x + offset.x,
            max_y: self.max_y + offset.y,
        }
    }

    /// Moves the bounds in the opposite direction of the specified offset
    pub fn inverse_translate(&self, offset: Point) -> Self {
        self.translate(offset.scale(-1.0))
    }

    /// Grows the bounds outward by `insets` on each side.
    pub fn add_padding(&self, insets: Insets) -> Self {
        Self {
            min_x: self.min_x - insets.left(),
            min_y: self.min_y - insets.top(),
            max_x: self.max_x + insets.right(),
            max_y: self.max_y + insets.bottom(),
        }
    }

    /// Shrinks the bounds inward by `insets` on each side.
    ///
    /// The result may be inverted (negative width or height) when the insets
    /// exceed the available space; callers that care must check.
    pub fn shrink(&self, insets: Insets) -> Self {
        Self {
            min_x: self.min_x + insets.left(),
            min_y: self.min_y + insets.top(),
            max_x: self.max_x - insets.right(),
            max_y: self.max_y - insets.bottom(),
        }
    }

    /// Checks whether the point lies inside or on the edge of the bounds
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.min_x
            && point.x <= self.max_x
            && point.y >= self.min_y
            && point.y <= self.max_y
    }
}

/// Represents spacing around an element (padding, margin, border, etc.)
/// with potentially different values for each side
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Insets {
    top: f32,
    right: f32,
    bottom: f32,
    left: f32,
}

impl Insets {
    /// Creates new insets with specified values for each side
    pub fn new(top: f32, right: f32, bottom: f32, left: f32) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    /// Creates uniform insets with the same value for all sides
    pub fn uniform(value: f32) -> Self {
        Self::new(value, value, value, value)
    }

    /// Returns the top inset value
    pub fn top(self) -> f32 {
        self.top
    }

    /// Returns the right inset value
    pub fn right(self) -> f32 {
        self.right
    }

    /// Returns the bottom inset value
    pub fn bottom(self) -> f32 {
        self.bottom
    }

    /// Returns the left inset value
    pub fn left(self) -> f32 {
        self.left
    }

    /// Returns the sum of left and right insets
    pub fn horizontal_sum(self) -> f32 {
        self.left + self.right
    }

    /// Returns the sum of top and bottom insets
    pub fn vertical_sum(self) -> f32 {
        self.top + self.bottom
    }

    /// Adds two insets side by side
    pub fn add(self, other: Insets) -> Self {
        Self {
            top: self.top + other.top,
            right: self.right + other.right,
            bottom: self.bottom + other.bottom,
            left: self.left + other.left,
        }
    }

    /// Returns the top-left offset these insets produce
    pub fn origin(self) -> Point {
        Point::new(self.left, self.top)
    }

    /// Returns true if any side is negative or not finite
    pub fn has_invalid_side(self) -> bool {
        [self.top, self.right, self.bottom, self.left]
            .iter()
            .any(|v| !v.is_finite() || *v < 0.0)
    }
}

/// A 2D affine transform `[a c e; b d f; 0 0 1]`, matching SVG's `matrix()`.
///
/// Used to compose an element's offset and rotation with those of its
/// ancestors. Composition with [`Affine::then`] applies `self` first.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Affine {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32,
    f: f32,
}

impl Default for Affine {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Affine {
    /// The identity transform.
    pub const IDENTITY: Self = Self {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    /// Creates a pure translation.
    pub fn translation(offset: Point) -> Self {
        Self {
            e: offset.x,
            f: offset.y,
            ..Self::IDENTITY
        }
    }

    /// Creates a rotation by `degrees` about the origin.
    pub fn rotation(degrees: f32) -> Self {
        let (s, c) = degrees.to_radians().sin_cos();
        Self {
            a: c,
            b: s,
            c: -s,
            d: c,
            e: 0.0,
            f: 0.0,
        }
    }

    /// Creates a rotation by `degrees` about `pivot`.
    pub fn rotation_about(degrees: f32, pivot: Point) -> Self {
        Self::translation(pivot.scale(-1.0))
            .then(Self::rotation(degrees))
            .then(Self::translation(pivot))
    }

    /// Returns the transform that applies `self` and then `next`.
    pub fn then(self, next: Affine) -> Self {
        Self {
            a: next.a * self.a + next.c * self.b,
            b: next.b * self.a + next.d * self.b,
            c: next.a * self.c + next.c * self.d,
            d: next.b * self.c + next.d * self.d,
            e: next.a * self.e + next.c * self.f + next.e,
            f: next.b * self.e + next.d * self.f + next.f,
        }
    }

    /// Maps a point through this transform.
    pub fn apply(self, point: Point) -> Point {
        Point::new(
            self.a * point.x + self.c * point.y + self.e,
            self.b * point.x + self.d * point.y + self.f,
        )
    }

    /// Returns the six matrix coefficients `[a, b, c, d, e, f]`.
    pub fn coefficients(self) -> [f32; 6] {
        [self.a, self.b, self.c, self.d, self.e, self.f]
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    #[test]
    fn test_point_default() {
        let point = Point::default();
        assert_eq!(point.x(), 0.0);
        assert_eq!(point.y(), 0.0);
        assert!(point.is_zero());
    }

    #[test]
    fn test_point_add_sub() {
        let p1 = Point::new(5.0, 8.0);
        let p2 = Point::new(2.0, 3.0);
        assert_eq!(p1.add_point(p2), Point::new(7.0, 11.0));
        assert_eq!(p1.sub_point(p2), Point::new(3.0, 5.0));
    }

    #[test]
    fn test_point_normalize() {
        let unit = Point::new(3.0, 4.0).normalize("test").unwrap();
        assert_approx_eq!(f32, unit.x(), 0.6);
        assert_approx_eq!(f32, unit.y(), 0.8);
    }

    #[test]
    fn test_point_normalize_zero_is_error() {
        let err = Point::new(0.0, 0.0).normalize("translate").unwrap_err();
        assert!(matches!(
            err,
            Error::Geometry {
                operation: "translate",
                ..
            }
        ));
    }

    #[test]
    fn test_edge_normal() {
        let normal = edge_normal(Point::new(0.0, 0.0), Point::new(10.0, 0.0)).unwrap();
        assert_approx_eq!(f32, normal.x(), 0.0);
        assert_approx_eq!(f32, normal.y(), -1.0);
    }

    #[test]
    fn test_edge_normal_degenerate_edge() {
        let p = Point::new(4.0, 4.0);
        assert!(edge_normal(p, p).is_err());
    }

    #[test]
    fn test_bounds_from_points() {
        let bounds = Bounds::from_points([
            Point::new(3.0, -1.0),
            Point::new(-2.0, 5.0),
            Point::new(0.0, 0.0),
        ])
        .unwrap();
        assert_eq!(bounds.min_point(), Point::new(-2.0, -1.0));
        assert_eq!(bounds.max_x(), 3.0);
        assert_eq!(bounds.max_y(), 5.0);
        assert!(Bounds::from_points(Vec::new()).is_none());
    }

    #[test]
    fn test_bounds_contains_edges() {
        let bounds = Bounds::new_from_top_left(Point::new(0.0, 0.0), Size::new(10.0, 10.0));
        assert!(bounds.contains(Point::new(10.0, 5.0)));
        assert!(!bounds.contains(Point::new(10.1, 5.0)));
    }

    #[test]
    fn test_bounds_padding_and_shrink() {
        let bounds = Bounds::new_from_top_left(Point::new(10.0, 10.0), Size::new(20.0, 20.0));
        let insets = Insets::new(1.0, 2.0, 3.0, 4.0);
        let grown = bounds.add_padding(insets);
        assert_eq!(grown.min_point(), Point::new(6.0, 9.0));
        assert_eq!(grown.shrink(insets), bounds);
    }

    #[test]
    fn test_insets_sums() {
        let insets = Insets::new(1.0, 2.0, 3.0, 4.0);
        assert_eq!(insets.horizontal_sum(), 6.0);
        assert_eq!(insets.vertical_sum(), 4.0);
        assert_eq!(insets.origin(), Point::new(4.0, 1.0));
        assert!(!insets.has_invalid_side());
        assert!(Insets::new(-1.0, 0.0, 0.0, 0.0).has_invalid_side());
    }

    #[test]
    fn test_affine_rotation_quarter_turn() {
        let p = Affine::rotation(90.0).apply(Point::new(10.0, 0.0));
        assert_approx_eq!(f32, p.x(), 0.0, epsilon = 1e-5);
        assert_approx_eq!(f32, p.y(), 10.0, epsilon = 1e-5);
    }

    #[test]
    fn test_affine_rotation_about_pivot_keeps_pivot() {
        let pivot = Point::new(7.0, -3.0);
        let mapped = Affine::rotation_about(33.0, pivot).apply(pivot);
        assert_approx_eq!(f32, mapped.x(), pivot.x(), epsilon = 1e-4);
        assert_approx_eq!(f32, mapped.y(), pivot.y(), epsilon = 1e-4);
    }

    #[test]
    fn test_affine_then_applies_in_order() {
        let t = Affine::translation(Point::new(5.0, 0.0)).then(Affine::rotation(90.0));
        let p = t.apply(Point::default());
        assert_approx_eq!(f32, p.x(), 0.0, epsilon = 1e-5);
        assert_approx_eq!(f32, p.y(), 5.0, epsilon = 1e-5);
    }
}
