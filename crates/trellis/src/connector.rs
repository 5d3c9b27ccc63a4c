//! Connector routing between diagram elements.
//!
//! Each [`Edge`] is routed from the boundary of its source element to the
//! boundary of its target, around every other leaf element of the diagram.

use log::{debug, info};

use trellis_core::{
    element::ElementId,
    geometry::{Bounds, Point, edge_normal},
    routing::{self, Obstacle, RouteKind, RouterConfig, boundary_point_toward, label_anchor},
    style::Style,
};

use crate::{
    config::RoutingConfig,
    diagram::{Diagram, Edge},
    error::TrellisError,
};

/// Length of an arrowhead along the path.
const ARROW_LENGTH: f32 = 10.0;

/// Half the width of an arrowhead's base.
const ARROW_HALF_WIDTH: f32 = 4.0;

const ALIGN_EPSILON: f32 = 1e-3;

/// A fully routed connector, in world coordinates.
#[derive(Debug, Clone)]
pub struct RoutedConnector {
    from: ElementId,
    to: ElementId,
    points: Vec<Point>,
    kind: RouteKind,
    label: Option<String>,
    label_anchor: Option<Point>,
    arrowhead: Option<[Point; 3]>,
    style: Style,
}

impl RoutedConnector {
    pub fn from(&self) -> ElementId {
        self.from
    }

    pub fn to(&self) -> ElementId {
        self.to
    }

    /// Path vertices from the source boundary to the target boundary.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Whether the path came from the grid search or the direct fallback.
    pub fn kind(&self) -> RouteKind {
        self.kind
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn label_anchor(&self) -> Option<Point> {
        self.label_anchor
    }

    /// Tip, then the two base corners, of the arrowhead at the target end.
    pub fn arrowhead(&self) -> Option<[Point; 3]> {
        self.arrowhead
    }

    pub fn style(&self) -> &Style {
        &self.style
    }
}

/// Routes every edge of `diagram`.
///
/// # Errors
///
/// Returns [`TrellisError::Layout`] if the routing configuration is invalid
/// or an endpoint element cannot be resolved. Routing exhaustion is not an
/// error; such connectors come back as [`RouteKind::Direct`].
pub fn route_all(
    diagram: &Diagram,
    config: &RoutingConfig,
) -> Result<Vec<RoutedConnector>, TrellisError> {
    if diagram.edges().is_empty() {
        return Ok(Vec::new());
    }

    let router = config.router_config()?;
    let tree = diagram.tree();
    let leaves = tree
        .paint_order(diagram.root())?
        .into_iter()
        .filter(|id| tree.get(*id).is_ok_and(|element| !element.is_container()))
        .map(|id| Ok((id, tree.world_bounds(id)?)))
        .collect::<Result<Vec<(ElementId, Bounds)>, TrellisError>>()?;

    info!(connectors = diagram.edges().len(), obstacles = leaves.len(); "Routing connectors");

    diagram
        .edges()
        .iter()
        .map(|edge| route_edge(diagram, edge, &leaves, &router, config))
        .collect()
}

fn route_edge(
    diagram: &Diagram,
    edge: &Edge,
    leaves: &[(ElementId, Bounds)],
    router: &RouterConfig,
    config: &RoutingConfig,
) -> Result<RoutedConnector, TrellisError> {
    let tree = diagram.tree();
    let from_bounds = tree.world_bounds(edge.from())?;
    let to_bounds = tree.world_bounds(edge.to())?;
    let start = boundary_point_toward(from_bounds, to_bounds.center());
    let end = boundary_point_toward(to_bounds, from_bounds.center());

    let obstacles: Vec<Obstacle> = leaves
        .iter()
        .filter(|(id, _)| {
            !tree.is_ancestor_or_self(edge.from(), *id) && !tree.is_ancestor_or_self(edge.to(), *id)
        })
        .map(|(_, bounds)| Obstacle::from(*bounds))
        .collect();

    let route = routing::route(start, end, &obstacles, router)?;
    let kind = route.kind();
    let points = match kind {
        RouteKind::Grid => join_endpoints(start, route.into_points(), end),
        RouteKind::Direct => route.into_points(),
    };

    let anchor = edge
        .label()
        .and_then(|_| label_anchor(&points, config.label_clearance(), config.label_offset()));
    let arrowhead = arrowhead(&points);

    debug!(
        from = tree.label(edge.from()),
        to = tree.label(edge.to()),
        kind:?,
        vertices = points.len();
        "Routed connector"
    );

    Ok(RoutedConnector {
        from: edge.from(),
        to: edge.to(),
        points,
        kind,
        label: edge.label().map(str::to_string),
        label_anchor: anchor,
        arrowhead,
        style: edge.style().clone(),
    })
}

/// Connects the exact boundary points to the snapped grid path with
/// axis-aligned elbows, then drops redundant vertices.
fn join_endpoints(start: Point, grid: Vec<Point>, end: Point) -> Vec<Point> {
    let mut points = Vec::with_capacity(grid.len() + 4);
    points.push(start);
    if let Some(first) = grid.first().copied().filter(|first| !is_aligned(start, *first)) {
        points.push(Point::new(first.x(), start.y()));
    }
    points.extend(grid);
    if let Some(last) = points.last().copied().filter(|last| !is_aligned(*last, end)) {
        points.push(Point::new(end.x(), last.y()));
    }
    points.push(end);
    routing::simplify_path(points)
}

fn is_aligned(a: Point, b: Point) -> bool {
    (a.x() - b.x()).abs() < ALIGN_EPSILON || (a.y() - b.y()).abs() < ALIGN_EPSILON
}

/// Arrowhead triangle pointing along the last segment of `points`.
fn arrowhead(points: &[Point]) -> Option<[Point; 3]> {
    let [.., a, b] = points else {
        return None;
    };
    let normal = edge_normal(*a, *b).ok()?;
    let direction = b.sub_point(*a).normalize("arrowhead").ok()?;
    let base = b.sub_point(direction.scale(ARROW_LENGTH));
    Some([
        *b,
        base.add_point(normal.scale(ARROW_HALF_WIDTH)),
        base.sub_point(normal.scale(ARROW_HALF_WIDTH)),
    ])
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;
    use crate::scene::Scene;

    fn diagram(source: &str) -> Diagram {
        Diagram::from_scene(&Scene::from_json(source).unwrap()).unwrap()
    }

    fn is_orthogonal(points: &[Point]) -> bool {
        points.windows(2).all(|w| is_aligned(w[0], w[1]))
    }

    #[test]
    fn test_join_endpoints_adds_elbows() {
        let points = join_endpoints(
            Point::new(0.0, 3.0),
            vec![Point::new(10.0, 0.0), Point::new(50.0, 0.0)],
            Point::new(53.0, 4.0),
        );
        assert!(is_orthogonal(&points));
        assert_eq!(points.first(), Some(&Point::new(0.0, 3.0)));
        assert_eq!(points.last(), Some(&Point::new(53.0, 4.0)));
    }

    #[test]
    fn test_arrowhead_points_along_last_segment() {
        let head = arrowhead(&[Point::new(0.0, 0.0), Point::new(100.0, 0.0)]).unwrap();
        assert_eq!(head[0], Point::new(100.0, 0.0));
        assert_approx_eq!(f32, head[1].x(), 90.0);
        assert_approx_eq!(f32, (head[1].y() - head[2].y()).abs(), 2.0 * ARROW_HALF_WIDTH);
        assert!(arrowhead(&[Point::new(1.0, 1.0)]).is_none());
    }

    #[test]
    fn test_route_between_side_by_side_boxes() {
        let diagram = diagram(
            r#"{
                "root": { "type": "group", "layout": { "direction": "stack-horizontal", "spacing": 100 },
                    "children": [
                        { "id": "a", "type": "rect", "width": 40, "height": 40 },
                        { "id": "b", "type": "rect", "width": 40, "height": 40 }
                    ] },
                "connectors": [{ "from": "a", "to": "b", "label": "calls" }]
            }"#,
        );

        let routed = route_all(&diagram, &RoutingConfig::default()).unwrap();
        assert_eq!(routed.len(), 1);
        let connector = &routed[0];
        assert_eq!(connector.kind(), RouteKind::Grid);
        let first = connector.points()[0];
        let last = connector.points()[connector.points().len() - 1];
        assert_approx_eq!(f32, first.x(), 40.0, epsilon = 1e-3);
        assert_approx_eq!(f32, first.y(), 20.0, epsilon = 1e-3);
        assert_approx_eq!(f32, last.x(), 140.0, epsilon = 1e-3);
        assert_approx_eq!(f32, last.y(), 20.0, epsilon = 1e-3);
        assert!(is_orthogonal(connector.points()));
        assert!(connector.label_anchor().is_some());
        assert!(connector.arrowhead().is_some());
    }

    #[test]
    fn test_route_avoids_blocking_element() {
        let diagram = diagram(
            r#"{
                "root": { "type": "group", "layout": { "direction": "bounded" }, "children": [
                    { "id": "a", "type": "rect", "x": 0, "y": 100, "width": 20, "height": 20 },
                    { "id": "wall", "type": "rect", "x": 80, "y": 40, "width": 20, "height": 140 },
                    { "id": "b", "type": "rect", "x": 180, "y": 100, "width": 20, "height": 20 }
                ] },
                "connectors": [{ "from": "a", "to": "b" }]
            }"#,
        );

        let routed = route_all(&diagram, &RoutingConfig::default()).unwrap();
        let connector = &routed[0];
        assert_eq!(connector.kind(), RouteKind::Grid);
        assert!(connector.label_anchor().is_none());

        let wall = diagram
            .tree()
            .world_bounds(diagram.element("wall").unwrap())
            .unwrap();
        for point in connector.points() {
            assert!(!wall.contains(*point), "{point:?} inside {wall:?}");
        }
    }

    #[test]
    fn test_enclosed_target_falls_back_to_direct() {
        let diagram = diagram(
            r#"{
                "root": { "type": "group", "layout": { "direction": "bounded" }, "children": [
                    { "id": "a", "type": "rect", "x": 0, "y": 0, "width": 20, "height": 20 },
                    { "type": "rect", "x": 200, "y": 180, "width": 100, "height": 10 },
                    { "type": "rect", "x": 200, "y": 290, "width": 100, "height": 10 },
                    { "type": "rect", "x": 180, "y": 180, "width": 10, "height": 120 },
                    { "type": "rect", "x": 310, "y": 180, "width": 10, "height": 120 },
                    { "id": "b", "type": "rect", "x": 240, "y": 230, "width": 20, "height": 20 }
                ] },
                "connectors": [{ "from": "a", "to": "b" }]
            }"#,
        );

        let routed = route_all(&diagram, &RoutingConfig::default()).unwrap();
        assert_eq!(routed[0].kind(), RouteKind::Direct);
        assert_eq!(routed[0].points().len(), 2);
    }
}
