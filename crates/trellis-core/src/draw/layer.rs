//! Layer-based collection of SVG nodes.
//!
//! # Example
//!
//! ```
//! # use trellis_core::draw::{LayeredOutput, RenderLayer};
//! # use svg::node::element::{Path, Rectangle, Text};
//! let mut output = LayeredOutput::new();
//!
//! output.add_to_layer(RenderLayer::Label, Box::new(Text::new("depends on")));
//! output.add_to_layer(RenderLayer::Connector, Box::new(Path::new()));
//! output.add_to_layer(RenderLayer::Content, Box::new(Rectangle::new()));
//!
//! // Content, then connectors, then labels.
//! let groups = output.render();
//! assert_eq!(groups.len(), 3);
//! ```

use svg::node::element as svg_element;

/// Type alias for boxed SVG nodes.
pub type SvgNode = Box<dyn svg::Node>;

/// Rendering layers, bottom to top in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RenderLayer {
    /// Canvas background.
    Background,
    /// Element shapes, text and charts in paint order.
    Content,
    /// Routed connector paths and arrowheads.
    Connector,
    /// Connector labels, kept above every path.
    Label,
}

impl RenderLayer {
    /// Returns the name used for the `data-layer` attribute.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Background => "background",
            Self::Content => "content",
            Self::Connector => "connector",
            Self::Label => "label",
        }
    }
}

/// SVG nodes grouped by rendering layer.
#[derive(Debug, Default)]
pub struct LayeredOutput {
    items: Vec<(RenderLayer, SvgNode)>,
}

impl LayeredOutput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a node to `layer`.
    pub fn add_to_layer(&mut self, layer: RenderLayer, node: SvgNode) {
        self.items.push((layer, node));
    }

    /// Appends every node of `other`, keeping its per-layer order.
    pub fn merge(&mut self, other: LayeredOutput) {
        self.items.extend(other.items);
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of nodes across all layers.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Renders every non-empty layer into a `<g data-layer="...">` group,
    /// bottom layer first, consuming the output.
    pub fn render(mut self) -> Vec<SvgNode> {
        // Stable: nodes keep insertion order inside a layer.
        self.items.sort_by_key(|(layer, _)| *layer);

        let mut result: Vec<SvgNode> = Vec::new();
        let mut current: Option<(RenderLayer, svg_element::Group)> = None;

        for (layer, node) in self.items {
            current = match current {
                Some((current_layer, group)) if current_layer == layer => {
                    Some((layer, group.add(node)))
                }
                previous => {
                    if let Some((_, group)) = previous {
                        result.push(Box::new(group));
                    }
                    let group = svg_element::Group::new().set("data-layer", layer.name());
                    Some((layer, group.add(node)))
                }
            };
        }

        if let Some((_, group)) = current {
            result.push(Box::new(group));
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use svg::node::element::Rectangle;

    #[test]
    fn test_layered_output_empty() {
        let output = LayeredOutput::new();
        assert!(output.is_empty());
        assert!(output.render().is_empty());
    }

    #[test]
    fn test_layered_output_groups_by_layer() {
        let mut output = LayeredOutput::new();
        output.add_to_layer(RenderLayer::Label, Box::new(Rectangle::new()));
        output.add_to_layer(RenderLayer::Content, Box::new(Rectangle::new()));
        output.add_to_layer(RenderLayer::Content, Box::new(Rectangle::new()));
        assert_eq!(output.len(), 3);

        let nodes = output.render();
        assert_eq!(nodes.len(), 2);
        assert!(nodes[0].to_string().contains("data-layer=\"content\""));
        assert!(nodes[1].to_string().contains("data-layer=\"label\""));
    }

    #[test]
    fn test_layered_output_keeps_insertion_order_within_layer() {
        let mut output = LayeredOutput::new();
        output.add_to_layer(RenderLayer::Content, Box::new(Rectangle::new().set("id", "first")));
        output.add_to_layer(RenderLayer::Connector, Box::new(Rectangle::new()));
        output.add_to_layer(RenderLayer::Content, Box::new(Rectangle::new().set("id", "second")));

        let nodes = output.render();
        let content = nodes[0].to_string();
        let first = content.find("first").unwrap();
        let second = content.find("second").unwrap();
        assert!(first < second);
    }

    #[test]
    fn test_layered_output_merge() {
        let mut a = LayeredOutput::new();
        a.add_to_layer(RenderLayer::Background, Box::new(Rectangle::new()));
        let mut b = LayeredOutput::new();
        b.add_to_layer(RenderLayer::Background, Box::new(Rectangle::new()));

        a.merge(b);
        assert_eq!(a.render().len(), 1);
    }
}
