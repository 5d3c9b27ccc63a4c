//! Obstacle-avoiding orthogonal connector routing.
//!
//! [`route`] finds a path between two world-space points that keeps clear of
//! a set of rectangular [`Obstacle`]s, moving only horizontally and
//! vertically on a regular grid:
//!
//! 1. Every obstacle is expanded by the clearance padding on all sides.
//! 2. Start and end are snapped to the nearest grid node.
//! 3. A* searches the grid inside the bounding box of start, end and all
//!    obstacles grown by a search margin.
//! 4. The resulting node sequence is simplified to the vertices where the
//!    direction of travel changes.
//!
//! If the search cannot reach the goal (an enclosed endpoint, or the
//! expansion bound is hit) the router does not fail: it returns the direct
//! start-to-end segment and reports [`RouteKind::Direct`].

mod grid;
mod label;

use log::debug;

use crate::{
    error::Error,
    geometry::{Bounds, Insets, Point},
};

use grid::Grid;

pub use label::label_anchor;

/// Tolerance for treating two coordinates as equal when simplifying paths.
const COORD_EPSILON: f32 = 1e-3;

/// Router settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouterConfig {
    cell_size: f32,
    clearance: f32,
    max_expansions: usize,
    search_margin: f32,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            cell_size: 10.0,
            clearance: 10.0,
            max_expansions: 50_000,
            search_margin: 40.0,
        }
    }
}

impl RouterConfig {
    /// Creates a router configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if `cell_size` is not positive or
    /// `clearance` / `search_margin` are negative.
    pub fn new(
        cell_size: f32,
        clearance: f32,
        max_expansions: usize,
        search_margin: f32,
    ) -> Result<Self, Error> {
        if !cell_size.is_finite() || cell_size <= 0.0 {
            return Err(Error::configuration(
                "router",
                format!("cell size {cell_size} must be a positive number"),
            ));
        }
        for (name, value) in [("clearance", clearance), ("search margin", search_margin)] {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::configuration(
                    "router",
                    format!("{name} {value} must be a non-negative number"),
                ));
            }
        }
        Ok(Self {
            cell_size,
            clearance,
            max_expansions,
            search_margin,
        })
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    pub fn clearance(&self) -> f32 {
        self.clearance
    }

    pub fn max_expansions(&self) -> usize {
        self.max_expansions
    }

    pub fn search_margin(&self) -> f32 {
        self.search_margin
    }
}

/// An axis-aligned rectangle the router must avoid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Obstacle {
    bounds: Bounds,
}

impl Obstacle {
    pub fn new(bounds: Bounds) -> Self {
        Self { bounds }
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// The obstacle grown by `clearance` on every side.
    pub fn expanded(&self, clearance: f32) -> Bounds {
        self.bounds.add_padding(Insets::uniform(clearance))
    }
}

impl From<Bounds> for Obstacle {
    fn from(bounds: Bounds) -> Self {
        Self::new(bounds)
    }
}

/// How a [`Route`] was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteKind {
    /// An obstacle-avoiding path found by grid search.
    Grid,
    /// The straight start-to-end fallback after the search was exhausted.
    Direct,
}

/// A routed connector path.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    points: Vec<Point>,
    kind: RouteKind,
}

impl Route {
    pub fn new(points: Vec<Point>, kind: RouteKind) -> Self {
        Self { points, kind }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn into_points(self) -> Vec<Point> {
        self.points
    }

    pub fn kind(&self) -> RouteKind {
        self.kind
    }

    /// Total length of the polyline.
    pub fn length(&self) -> f32 {
        self.points
            .windows(2)
            .map(|w| w[1].sub_point(w[0]).hypot())
            .sum()
    }
}

/// Routes an orthogonal path from `start` to `end` around `obstacles`.
///
/// Grid routes run between the snapped endpoints; joining them to the exact
/// endpoints is left to the caller.
///
/// # Errors
///
/// Returns [`Error::Geometry`] for non-finite endpoints. An unreachable goal
/// is not an error; see [`RouteKind::Direct`].
///
/// # Examples
///
/// ```
/// use trellis_core::geometry::Point;
/// use trellis_core::routing::{route, RouteKind, RouterConfig};
///
/// let path = route(
///     Point::new(0.0, 0.0),
///     Point::new(50.0, 30.0),
///     &[],
///     &RouterConfig::default(),
/// )
/// .unwrap();
///
/// assert_eq!(path.kind(), RouteKind::Grid);
/// assert!((path.length() - 80.0).abs() < 1e-3);
/// ```
pub fn route(
    start: Point,
    end: Point,
    obstacles: &[Obstacle],
    config: &RouterConfig,
) -> Result<Route, Error> {
    for point in [start, end] {
        if !point.x().is_finite() || !point.y().is_finite() {
            return Err(Error::geometry(
                "route",
                format!("endpoint ({}, {}) is not finite", point.x(), point.y()),
            ));
        }
    }

    let expanded: Vec<Bounds> = obstacles
        .iter()
        .map(|o| o.expanded(config.clearance))
        .collect();

    let area = expanded
        .iter()
        .fold(
            Bounds::from_points([start, end]).unwrap_or_default(),
            |acc, b| acc.merge(b),
        )
        .add_padding(Insets::uniform(config.search_margin + config.cell_size));

    let Some(grid) = Grid::new(config.cell_size, area, &expanded) else {
        debug!(
            start:?,
            end:?,
            cell_size = config.cell_size;
            "Routing area exceeds the addressable grid, falling back to direct segment"
        );
        return Ok(Route::new(vec![start, end], RouteKind::Direct));
    };
    let start_cell = grid.snap(start);
    let goal_cell = grid.snap(end);

    match grid.search(start_cell, goal_cell, config.max_expansions) {
        Some(cells) => {
            let points: Vec<Point> = cells.into_iter().map(|c| grid.point(c)).collect();
            let points = if points.len() < 2 {
                vec![grid.point(start_cell), grid.point(goal_cell)]
            } else {
                simplify_path(points)
            };
            Ok(Route::new(points, RouteKind::Grid))
        }
        None => {
            debug!(
                start:?,
                end:?,
                obstacles = obstacles.len(),
                grid_nodes = grid.cell_count();
                "Routing exhausted, falling back to direct segment"
            );
            Ok(Route::new(vec![start, end], RouteKind::Direct))
        }
    }
}

/// Removes repeated points and collapses colinear runs so only the
/// vertices where the direction of travel changes remain, plus both ends.
pub fn simplify_path(points: Vec<Point>) -> Vec<Point> {
    let mut deduped: Vec<Point> = Vec::with_capacity(points.len());
    for point in points {
        if deduped.last().is_some_and(|last| same_point(*last, point)) {
            continue;
        }
        deduped.push(point);
    }

    let mut simplified: Vec<Point> = Vec::with_capacity(deduped.len());
    for point in deduped {
        while simplified.len() >= 2 {
            let a = simplified[simplified.len() - 2];
            let b = simplified[simplified.len() - 1];
            if is_colinear(a, b, point) {
                simplified.pop();
            } else {
                break;
            }
        }
        simplified.push(point);
    }
    simplified
}

fn same_point(a: Point, b: Point) -> bool {
    (a.x() - b.x()).abs() < COORD_EPSILON && (a.y() - b.y()).abs() < COORD_EPSILON
}

/// True when `b` lies on the straight run from `a` to `c` without reversing.
fn is_colinear(a: Point, b: Point, c: Point) -> bool {
    let ab = b.sub_point(a);
    let bc = c.sub_point(b);
    let cross = ab.x() * bc.y() - ab.y() * bc.x();
    let dot = ab.x() * bc.x() + ab.y() * bc.y();
    cross.abs() < COORD_EPSILON && dot > 0.0
}

/// Returns where the ray from the center of `bounds` toward `target` leaves
/// `bounds`. A target at the center yields the center itself.
pub fn boundary_point_toward(bounds: Bounds, target: Point) -> Point {
    let center = bounds.center();
    let direction = target.sub_point(center);
    if direction.hypot() < COORD_EPSILON {
        return center;
    }

    let half_width = bounds.width() / 2.0;
    let half_height = bounds.height() / 2.0;
    let t_x = if direction.x().abs() > f32::EPSILON {
        half_width / direction.x().abs()
    } else {
        f32::MAX
    };
    let t_y = if direction.y().abs() > f32::EPSILON {
        half_height / direction.y().abs()
    } else {
        f32::MAX
    };

    center.add_point(direction.scale(t_x.min(t_y)))
}
