//! Declarative scene descriptions.
//!
//! A scene is a JSON document holding one root [`Node`] and a list of
//! [`Connector`]s between identified nodes:
//!
//! ```json
//! {
//!   "root": {
//!     "type": "group",
//!     "layout": { "direction": "stack-vertical", "spacing": 20 },
//!     "box_model": { "padding": 10 },
//!     "children": [
//!       { "id": "a", "type": "rect", "width": 80, "height": 40 },
//!       { "id": "b", "type": "text", "content": "hello" }
//!     ]
//!   },
//!   "connectors": [{ "from": "a", "to": "b", "label": "greets" }]
//! }
//! ```
//!
//! Decoding only checks the shape of the document. Values such as container
//! directions, negative content boxes or zero-length translate directions are
//! validated when the scene is built into an element tree.

use serde::Deserialize;

use trellis_core::{box_model::BoxModelConfig, geometry::Point, style::Style};

use crate::error::TrellisError;

/// A complete scene: the element tree and the connectors drawn over it.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scene {
    root: Node,
    #[serde(default)]
    connectors: Vec<Connector>,
}

impl Scene {
    /// Decodes a scene from JSON source.
    ///
    /// # Errors
    ///
    /// Returns [`TrellisError::Scene`] with the line and column of the first
    /// decode failure.
    pub fn from_json(source: &str) -> Result<Self, TrellisError> {
        serde_json::from_str(source).map_err(|err| TrellisError::new_scene_error(&err, source))
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    pub fn connectors(&self) -> &[Connector] {
        &self.connectors
    }

    /// Total number of nodes in the scene.
    pub fn node_count(&self) -> usize {
        fn count(node: &Node) -> usize {
            1 + node.children.iter().map(count).sum::<usize>()
        }
        count(&self.root)
    }
}

/// One element of the scene tree.
#[derive(Debug, Clone, Deserialize)]
pub struct Node {
    /// Identifier referenced by connectors and emitted as `data-id`.
    #[serde(default)]
    pub id: Option<String>,

    #[serde(flatten)]
    pub kind: NodeKind,

    #[serde(default)]
    pub x: Option<f32>,
    #[serde(default)]
    pub y: Option<f32>,

    #[serde(default)]
    pub width: Option<Dimension>,
    #[serde(default)]
    pub height: Option<Dimension>,

    /// Rotation about the element's own center, in degrees.
    #[serde(default)]
    pub rotation: Option<f32>,

    #[serde(default)]
    pub z_index: Option<i32>,

    #[serde(default)]
    pub translate: Option<Translate>,

    #[serde(default)]
    pub box_model: Option<BoxModelConfig>,

    /// Container settings. Nodes with children but no layout become
    /// auto-sized freeform containers.
    #[serde(default)]
    pub layout: Option<LayoutSpec>,

    #[serde(default)]
    pub style: Style,

    #[serde(default)]
    pub children: Vec<Node>,
}

/// The element kind of a node, selected by its `type` field.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum NodeKind {
    Group,
    Rect,
    Ellipse,
    Polygon {
        points: Vec<[f32; 2]>,
    },
    Line {
        from: [f32; 2],
        to: [f32; 2],
    },
    Text {
        content: String,
    },
    BarChart {
        columns: Vec<ColumnSpec>,
        #[serde(default)]
        background: Option<String>,
        #[serde(default)]
        grid: Option<String>,
        #[serde(default)]
        bar: Option<String>,
        #[serde(default)]
        grid_lines: Option<usize>,
    },
}

/// A bar chart column.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ColumnSpec {
    pub label: String,
    pub value: f32,
}

/// A size given either as a number or as the keyword `"auto"`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Dimension {
    Fixed(f32),
    Keyword(String),
}

impl Dimension {
    /// The textual form accepted by [`trellis_core::layout::SizeMode`]'s parser.
    pub fn as_size_mode_str(&self) -> String {
        match self {
            Self::Fixed(value) => value.to_string(),
            Self::Keyword(keyword) => keyword.clone(),
        }
    }
}

/// A directional move: `direction` is normalized, then scaled by `magnitude`.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Translate {
    pub direction: [f32; 2],
    pub magnitude: f32,
}

impl Translate {
    pub fn direction_point(&self) -> Point {
        Point::new(self.direction[0], self.direction[1])
    }
}

/// Container settings of a node.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LayoutSpec {
    pub direction: String,
    #[serde(default)]
    pub spacing: Option<f32>,
    #[serde(default)]
    pub main_axis_alignment: Option<String>,
    #[serde(default)]
    pub cross_axis_alignment: Option<String>,
    #[serde(default)]
    pub width: Option<Dimension>,
    #[serde(default)]
    pub height: Option<Dimension>,
}

/// A routed connection between two identified nodes.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Connector {
    pub from: String,
    pub to: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub style: Style,
}
