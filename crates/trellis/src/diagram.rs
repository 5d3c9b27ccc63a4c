//! Scene to element tree construction.
//!
//! [`Diagram::from_scene`] walks the scene depth first, creating one element
//! per node, configuring box model, size and container settings before the
//! node's children are attached, and positioning each child only after it has
//! been added so insertion-time placement sees the final parent. The whole
//! tree is laid out once at the end, then connector endpoints are resolved
//! against the node ids.

use indexmap::IndexMap;
use log::{debug, info, trace};

use trellis_core::{
    box_model::BoxModel,
    color::Color,
    element::{BarChart, Column, ElementId, ElementKind, ElementTree, estimate_text_size},
    geometry::{Bounds, Point, Size},
    layout::{Alignment, ContainerConfig, Direction, SizeMode},
    style::{Style, StyleProperty},
};

use crate::{
    error::TrellisError,
    scene::{Dimension, LayoutSpec, Node, NodeKind, Scene},
};

/// A connector resolved to element handles.
#[derive(Debug, Clone)]
pub struct Edge {
    from: ElementId,
    to: ElementId,
    label: Option<String>,
    style: Style,
}

impl Edge {
    pub fn from(&self) -> ElementId {
        self.from
    }

    pub fn to(&self) -> ElementId {
        self.to
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn style(&self) -> &Style {
        &self.style
    }
}

/// A laid-out element tree together with its connectors.
#[derive(Debug, Clone)]
pub struct Diagram {
    tree: ElementTree,
    root: ElementId,
    edges: Vec<Edge>,
}

impl Diagram {
    /// Builds and lays out the element tree described by `scene`.
    ///
    /// # Errors
    ///
    /// Returns [`TrellisError::Build`] for duplicate node ids or connectors
    /// naming unknown nodes, and [`TrellisError::Layout`] for any invalid
    /// geometry or configuration value in the scene.
    pub fn from_scene(scene: &Scene) -> Result<Self, TrellisError> {
        info!(
            nodes = scene.node_count(),
            connectors = scene.connectors().len();
            "Building element tree"
        );

        let mut builder = TreeBuilder::default();
        let (root, offset) = builder.build_node(scene.root())?;
        builder.apply_position(root, scene.root(), offset, None)?;

        let TreeBuilder { mut tree, ids } = builder;
        tree.layout(root)?;

        let edges = scene
            .connectors()
            .iter()
            .enumerate()
            .map(|(index, connector)| {
                let lookup = |name: &str| {
                    ids.get(name).copied().ok_or_else(|| {
                        TrellisError::Build(format!(
                            "connector {index} references unknown element id `{name}`"
                        ))
                    })
                };
                let from = lookup(&connector.from)?;
                let to = lookup(&connector.to)?;
                if from == to {
                    return Err(TrellisError::Build(format!(
                        "connector {index} connects `{}` to itself",
                        connector.from
                    )));
                }
                Ok(Edge {
                    from,
                    to,
                    label: connector.label.clone(),
                    style: connector.style.clone(),
                })
            })
            .collect::<Result<Vec<_>, TrellisError>>()?;

        debug!(elements = tree.len(), edges = edges.len(); "Element tree built");
        Ok(Self { tree, root, edges })
    }

    pub fn tree(&self) -> &ElementTree {
        &self.tree
    }

    pub fn root(&self) -> ElementId {
        self.root
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Looks up an element by its scene id.
    pub fn element(&self, id: &str) -> Option<ElementId> {
        self.tree.find_by_name(id)
    }

    /// World-space bounds of the root element.
    pub fn bounds(&self) -> Result<Bounds, TrellisError> {
        Ok(self.tree.world_bounds(self.root)?)
    }
}

#[derive(Default)]
struct TreeBuilder {
    tree: ElementTree,
    ids: IndexMap<String, ElementId>,
}

impl TreeBuilder {
    /// Creates the element for `node` and its subtree. Returns the element
    /// and the offset its vertices were normalized by.
    fn build_node(&mut self, node: &Node) -> Result<(ElementId, Point), TrellisError> {
        let (kind, offset) = element_kind(&node.kind)?;
        let id = match &node.id {
            Some(name) => {
                if self.ids.contains_key(name) {
                    return Err(TrellisError::Build(format!("duplicate element id `{name}`")));
                }
                let id = self.tree.create_named(name.clone(), kind);
                self.ids.insert(name.clone(), id);
                id
            }
            None => self.tree.create(kind),
        };

        let box_model = node
            .box_model
            .map(BoxModel::try_from)
            .transpose()?
            .unwrap_or_default();
        self.tree.set_style(id, node.style.clone())?;

        match container_config(node)? {
            Some(config) => {
                self.tree.set_box_model(id, box_model)?;
                self.tree.set_container(id, config)?;
            }
            None => {
                let size = self.leaf_size(id, node, &box_model)?;
                self.tree.set_size(id, size)?;
                self.tree.set_box_model(id, box_model)?;
            }
        }

        if let Some(rotation) = node.rotation {
            self.tree.rotate(id, rotation)?;
        }
        self.tree.set_z_index(id, node.z_index)?;

        for child in &node.children {
            let (child_id, child_offset) = self.build_node(child)?;
            self.tree.add_child(id, child_id)?;
            self.apply_position(child_id, child, child_offset, Some(id))?;
        }

        trace!(element = self.tree.label(id), kind = node_type(&node.kind); "Built element");
        Ok((id, offset))
    }

    /// Border-box size of a non-container element: explicit dimensions win,
    /// otherwise the natural size of its kind plus border and padding.
    fn leaf_size(
        &self,
        id: ElementId,
        node: &Node,
        box_model: &BoxModel,
    ) -> Result<Size, TrellisError> {
        let element = self.tree.get(id)?;
        let natural = match element.kind() {
            ElementKind::Text { content } => estimate_text_size(
                content,
                element
                    .style()
                    .number(StyleProperty::FontSize)
                    .unwrap_or(trellis_core::element::DEFAULT_FONT_SIZE),
            ),
            kind => kind.natural_size(),
        }
        .add_padding(box_model.content_insets());

        let width = resolve_dimension(node.width.as_ref(), natural.width())?;
        let height = resolve_dimension(node.height.as_ref(), natural.height())?;
        Ok(Size::new(width, height))
    }

    /// Applies explicit coordinates and the directional translate of a node
    /// once it sits in its parent.
    fn apply_position(
        &mut self,
        id: ElementId,
        node: &Node,
        offset: Point,
        parent: Option<ElementId>,
    ) -> Result<(), TrellisError> {
        let explicit = node.x.is_some() || node.y.is_some() || !offset.is_zero();
        if explicit {
            let stacked = match parent {
                Some(parent) => self
                    .tree
                    .get(parent)?
                    .container()
                    .is_some_and(|c| c.config().direction().is_stack()),
                None => false,
            };
            if stacked {
                debug!(element = self.tree.label(id); "Ignoring explicit position of stacked element");
            } else {
                let position = Point::new(node.x.unwrap_or(0.0), node.y.unwrap_or(0.0));
                self.tree.set_position(id, position.add_point(offset))?;
            }
        }

        if let Some(translate) = node.translate {
            self.tree
                .translate(id, translate.direction_point(), translate.magnitude)?;
        }
        Ok(())
    }
}

/// Converts a node kind into an element kind. Vertex-based kinds are shifted
/// so their smallest coordinates sit at the local origin; the returned offset
/// moves the element back to where its vertices were declared.
fn element_kind(kind: &NodeKind) -> Result<(ElementKind, Point), TrellisError> {
    let converted = match kind {
        NodeKind::Group => (ElementKind::Group, Point::default()),
        NodeKind::Rect => (ElementKind::Rectangle, Point::default()),
        NodeKind::Ellipse => (ElementKind::Ellipse, Point::default()),
        NodeKind::Polygon { points } => {
            if points.len() < 3 {
                return Err(trellis_core::Error::configuration(
                    "polygon",
                    format!("needs at least 3 points, got {}", points.len()),
                )
                .into());
            }
            let points: Vec<Point> = points.iter().map(|[x, y]| Point::new(*x, *y)).collect();
            let (points, offset) = normalize_vertices(points);
            (ElementKind::Polygon { points }, offset)
        }
        NodeKind::Line { from, to } => {
            let (points, offset) = normalize_vertices(vec![
                Point::new(from[0], from[1]),
                Point::new(to[0], to[1]),
            ]);
            (
                ElementKind::Line {
                    from: points[0],
                    to: points[1],
                },
                offset,
            )
        }
        NodeKind::Text { content } => (
            ElementKind::Text {
                content: content.clone(),
            },
            Point::default(),
        ),
        NodeKind::BarChart {
            columns,
            background,
            grid,
            bar,
            grid_lines,
        } => {
            let columns = columns
                .iter()
                .map(|c| Column::new(c.label.clone(), c.value))
                .collect();
            let mut chart = BarChart::new(columns)?;
            if let Some(color) = background {
                chart = chart.with_background(chart_color(color)?);
            }
            if let Some(color) = grid {
                chart = chart.with_grid(chart_color(color)?);
            }
            if let Some(color) = bar {
                chart = chart.with_bar(chart_color(color)?);
            }
            if let Some(grid_lines) = grid_lines {
                chart = chart.with_grid_lines(*grid_lines);
            }
            (ElementKind::BarChart(chart), Point::default())
        }
    };
    Ok(converted)
}

fn normalize_vertices(points: Vec<Point>) -> (Vec<Point>, Point) {
    let Some(bounds) = Bounds::from_points(points.iter().copied()) else {
        return (points, Point::default());
    };
    let offset = bounds.min_point();
    let shifted = points.into_iter().map(|p| p.sub_point(offset)).collect();
    (shifted, offset)
}

fn chart_color(value: &str) -> Result<Color, TrellisError> {
    Color::new(value).map_err(|reason| trellis_core::Error::configuration("bar chart", reason).into())
}

fn resolve_dimension(dimension: Option<&Dimension>, natural: f32) -> Result<f32, TrellisError> {
    match size_mode(dimension)? {
        SizeMode::Fixed(value) => Ok(value),
        SizeMode::Auto => Ok(natural),
    }
}

fn size_mode(dimension: Option<&Dimension>) -> Result<SizeMode, TrellisError> {
    match dimension {
        Some(dimension) => Ok(dimension.as_size_mode_str().parse::<SizeMode>()?),
        None => Ok(SizeMode::Auto),
    }
}

/// Container settings of a node: its explicit layout, or an auto-sized
/// freeform container when it only has children.
fn container_config(node: &Node) -> Result<Option<ContainerConfig>, TrellisError> {
    let config = match &node.layout {
        Some(spec) => layout_config(spec, node)?,
        None if !node.children.is_empty() => ContainerConfig::new(Direction::Freeform)
            .with_width(size_mode(node.width.as_ref())?)
            .with_height(size_mode(node.height.as_ref())?),
        None => return Ok(None),
    };
    Ok(Some(config))
}

fn layout_config(spec: &LayoutSpec, node: &Node) -> Result<ContainerConfig, TrellisError> {
    let mut config = ContainerConfig::new(spec.direction.parse::<Direction>()?)
        .with_width(size_mode(spec.width.as_ref().or(node.width.as_ref()))?)
        .with_height(size_mode(spec.height.as_ref().or(node.height.as_ref()))?);
    if let Some(spacing) = spec.spacing {
        config = config.with_spacing(spacing)?;
    }
    if let Some(alignment) = &spec.main_axis_alignment {
        config = config.with_main_axis_alignment(alignment.parse::<Alignment>()?);
    }
    if let Some(alignment) = &spec.cross_axis_alignment {
        config = config.with_cross_axis_alignment(alignment.parse::<Alignment>()?);
    }
    Ok(config)
}

fn node_type(kind: &NodeKind) -> &'static str {
    match kind {
        NodeKind::Group => "group",
        NodeKind::Rect => "rect",
        NodeKind::Ellipse => "ellipse",
        NodeKind::Polygon { .. } => "polygon",
        NodeKind::Line { .. } => "line",
        NodeKind::Text { .. } => "text",
        NodeKind::BarChart { .. } => "bar-chart",
    }
}
