//! SVG rendering of laid-out diagrams.
//!
//! Elements are emitted in paint order into the content layer, connector
//! paths and arrowheads into the connector layer and labels into the label
//! layer, so every label stays readable above every path.

use log::{debug, info};
use svg::{Document, node::element as svg_element};

use trellis_core::{
    apply_style,
    color::Color,
    draw::{LayeredOutput, RenderLayer, SvgNode},
    element::{BarChart, DEFAULT_FONT_SIZE, ElementId, ElementKind, ElementTree},
    geometry::{Bounds, Point},
    style::{Style, StyleProperty},
};

use super::Error;
use crate::{connector::RoutedConnector, diagram::Diagram};

const CONNECTOR_STROKE_WIDTH: f32 = 1.5;
const LABEL_FONT_SIZE: f32 = 12.0;

/// Share of a bar chart column slot taken by its bar.
const BAR_WIDTH_RATIO: f32 = 0.6;

/// Sets each `(name, value)` attribute on an SVG element.
macro_rules! with_attributes {
    ($element:expr, $attributes:expr) => {{
        let mut elem = $element;
        for (name, value) in $attributes.iter() {
            elem = elem.set(*name, value.clone());
        }
        elem
    }};
}

/// Builder for [`Svg`] renderers.
#[derive(Debug, Clone)]
pub struct SvgBuilder {
    background: Option<Color>,
    connector_color: Color,
    font_family: String,
}

impl Default for SvgBuilder {
    fn default() -> Self {
        Self {
            background: None,
            connector_color: Color::default(),
            font_family: "sans-serif".to_string(),
        }
    }
}

impl SvgBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the canvas background. `None` leaves the canvas transparent.
    pub fn with_background(mut self, background: Option<Color>) -> Self {
        self.background = background;
        self
    }

    pub fn with_connector_color(mut self, color: Color) -> Self {
        self.connector_color = color;
        self
    }

    /// Sets the font family of labels and of text elements without their own.
    pub fn with_font_family(mut self, font_family: impl Into<String>) -> Self {
        self.font_family = font_family.into();
        self
    }

    pub fn build(self) -> Svg {
        Svg {
            background: self.background,
            connector_color: self.connector_color,
            font_family: self.font_family,
        }
    }
}

/// Renders diagrams to SVG documents.
#[derive(Debug, Clone)]
pub struct Svg {
    background: Option<Color>,
    connector_color: Color,
    font_family: String,
}

impl Svg {
    /// Renders the diagram and its routed connectors into one document.
    ///
    /// The document spans the root element's world bounds, grown to include
    /// any connector geometry routed outside of it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Render`] if an element's geometry cannot be resolved.
    pub fn render_document(
        &self,
        diagram: &Diagram,
        connectors: &[RoutedConnector],
    ) -> Result<Document, Error> {
        let tree = diagram.tree();
        let bounds = self.document_bounds(tree, diagram.root(), connectors)?;
        info!(
            width = bounds.width(),
            height = bounds.height(),
            elements = tree.len(),
            connectors = connectors.len();
            "Rendering SVG document"
        );

        let mut output = LayeredOutput::new();
        if let Some(background) = self.background {
            let rect = svg_element::Rectangle::new()
                .set("x", bounds.min_x())
                .set("y", bounds.min_y())
                .set("width", bounds.width())
                .set("height", bounds.height())
                .set("fill", background);
            output.add_to_layer(RenderLayer::Background, Box::new(rect));
        }

        for id in tree.paint_order(diagram.root())? {
            if let Some(node) = self.render_element(tree, id)? {
                output.add_to_layer(RenderLayer::Content, node);
            }
        }

        for connector in connectors {
            output.merge(self.render_connector(connector));
        }
        debug!(nodes = output.len(); "SVG nodes rendered");

        let doc = Document::new()
            .set(
                "viewBox",
                format!(
                    "{} {} {} {}",
                    bounds.min_x(),
                    bounds.min_y(),
                    bounds.width(),
                    bounds.height()
                ),
            )
            .set("width", bounds.width())
            .set("height", bounds.height());

        Ok(output
            .render()
            .into_iter()
            .fold(doc, |doc, group| doc.add(group)))
    }

    fn document_bounds(
        &self,
        tree: &ElementTree,
        root: ElementId,
        connectors: &[RoutedConnector],
    ) -> Result<Bounds, Error> {
        let root_bounds = tree.world_bounds(root)?;
        let connector_points = connectors.iter().flat_map(|connector| {
            connector
                .points()
                .iter()
                .copied()
                .chain(connector.arrowhead().into_iter().flatten())
                .chain(connector.label_anchor())
        });
        Ok(Bounds::from_points(connector_points)
            .map_or(root_bounds, |extra| root_bounds.merge(&extra)))
    }

    /// Renders one element at its world geometry. Unstyled groups have no
    /// visual and yield `None`.
    fn render_element(&self, tree: &ElementTree, id: ElementId) -> Result<Option<SvgNode>, Error> {
        let element = tree.get(id)?;
        let size = element.size();
        let center = tree.world_center(id)?;
        let top_left = center.sub_point(size.center());
        let rotation = tree.world_rotation(id)?;
        let style = element.style();

        let mut attributes: Vec<(&'static str, String)> = Vec::new();
        if let Some(name) = element.name() {
            attributes.push(("data-id", name.to_string()));
        }
        let vertex_based = matches!(
            element.kind(),
            ElementKind::Polygon { .. } | ElementKind::Line { .. }
        );
        if !vertex_based && rotation.rem_euclid(360.0) != 0.0 {
            attributes.push((
                "transform",
                format!("rotate({} {} {})", rotation, center.x(), center.y()),
            ));
        }

        let node: SvgNode = match element.kind() {
            ElementKind::Group => {
                if style.is_empty() {
                    return Ok(None);
                }
                let rect = apply_style!(rectangle(top_left, size.width(), size.height(), style), style)
                    .set("fill", style.get(StyleProperty::Fill).unwrap_or("none"));
                Box::new(with_attributes!(rect, attributes))
            }
            ElementKind::Rectangle => {
                let rect = rectangle(top_left, size.width(), size.height(), style);
                Box::new(with_attributes!(apply_style!(rect, style), attributes))
            }
            ElementKind::Ellipse => {
                let ellipse = svg_element::Ellipse::new()
                    .set("cx", center.x())
                    .set("cy", center.y())
                    .set("rx", size.width() / 2.0)
                    .set("ry", size.height() / 2.0);
                Box::new(with_attributes!(apply_style!(ellipse, style), attributes))
            }
            ElementKind::Polygon { .. } => {
                let points = tree
                    .transformed_corners(id)?
                    .iter()
                    .map(|p| format!("{},{}", p.x(), p.y()))
                    .collect::<Vec<_>>()
                    .join(" ");
                let polygon = svg_element::Polygon::new().set("points", points);
                Box::new(with_attributes!(apply_style!(polygon, style), attributes))
            }
            ElementKind::Line { .. } => {
                let corners = tree.transformed_corners(id)?;
                let [from, to] = corners.as_slice() else {
                    return Err(Error::Render(format!(
                        "line {} resolved to {} points",
                        tree.label(id),
                        corners.len()
                    )));
                };
                let line = svg_element::Line::new()
                    .set("x1", from.x())
                    .set("y1", from.y())
                    .set("x2", to.x())
                    .set("y2", to.y());
                Box::new(with_attributes!(apply_style!(line, style), attributes))
            }
            ElementKind::Text { content } => {
                let text = svg_element::Text::new(content.as_str())
                    .set("x", center.x())
                    .set("y", center.y())
                    .set("text-anchor", "middle")
                    .set("dominant-baseline", "central")
                    .set("font-family", self.font_family.as_str())
                    .set("font-size", DEFAULT_FONT_SIZE);
                Box::new(with_attributes!(apply_style!(text, style), attributes))
            }
            ElementKind::BarChart(chart) => {
                let content = tree.box_geometry(id)?.content_box().translate(top_left);
                let group = render_bar_chart(chart, content);
                Box::new(with_attributes!(apply_style!(group, style), attributes))
            }
        };
        Ok(Some(node))
    }

    fn render_connector(&self, connector: &RoutedConnector) -> LayeredOutput {
        let mut output = LayeredOutput::new();
        let color = connector
            .style()
            .get(StyleProperty::Stroke)
            .map_or_else(|| self.connector_color.to_string(), str::to_string);

        let path = svg_element::Path::new()
            .set("d", path_data(connector.points()))
            .set("fill", "none")
            .set("stroke", color.as_str())
            .set("stroke-width", CONNECTOR_STROKE_WIDTH);
        output.add_to_layer(
            RenderLayer::Connector,
            Box::new(apply_style!(path, connector.style())),
        );

        if let Some(head) = connector.arrowhead() {
            let points = head
                .iter()
                .map(|p| format!("{},{}", p.x(), p.y()))
                .collect::<Vec<_>>()
                .join(" ");
            let polygon = svg_element::Polygon::new()
                .set("points", points)
                .set("fill", color.as_str());
            output.add_to_layer(RenderLayer::Connector, Box::new(polygon));
        }

        if let (Some(label), Some(anchor)) = (connector.label(), connector.label_anchor()) {
            let text = svg_element::Text::new(label)
                .set("x", anchor.x())
                .set("y", anchor.y())
                .set("text-anchor", "middle")
                .set("dominant-baseline", "central")
                .set("font-family", self.font_family.as_str())
                .set("font-size", LABEL_FONT_SIZE)
                .set("fill", color.as_str());
            output.add_to_layer(RenderLayer::Label, Box::new(text));
        }

        output
    }
}

fn rectangle(top_left: Point, width: f32, height: f32, style: &Style) -> svg_element::Rectangle {
    let rect = svg_element::Rectangle::new()
        .set("x", top_left.x())
        .set("y", top_left.y())
        .set("width", width)
        .set("height", height);
    match style.number(StyleProperty::CornerRadius) {
        Some(radius) => rect.set(StyleProperty::CornerRadius.svg_attribute(), radius),
        None => rect,
    }
}

fn path_data(points: &[Point]) -> String {
    points
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let command = if i == 0 { "M" } else { "L" };
            format!("{command} {} {}", p.x(), p.y())
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Background, horizontal grid lines and one bar per column, all inside the
/// chart's content box. Bars scale to the largest column value.
fn render_bar_chart(chart: &BarChart, content: Bounds) -> svg_element::Group {
    let mut group = svg_element::Group::new().add(
        svg_element::Rectangle::new()
            .set("x", content.min_x())
            .set("y", content.min_y())
            .set("width", content.width())
            .set("height", content.height())
            .set("fill", chart.background()),
    );

    let lines = chart.grid_lines();
    for i in 1..=lines {
        let y = content.max_y() - content.height() * i as f32 / lines as f32;
        group = group.add(
            svg_element::Line::new()
                .set("x1", content.min_x())
                .set("y1", y)
                .set("x2", content.max_x())
                .set("y2", y)
                .set("stroke", chart.grid()),
        );
    }

    let columns = chart.columns();
    if columns.is_empty() {
        return group;
    }
    let max = chart.max_value();
    let slot = content.width() / columns.len() as f32;
    let bar_width = slot * BAR_WIDTH_RATIO;
    for (i, column) in columns.iter().enumerate() {
        let height = if max > 0.0 {
            content.height() * column.value() / max
        } else {
            0.0
        };
        group = group.add(
            svg_element::Rectangle::new()
                .set("x", content.min_x() + slot * i as f32 + (slot - bar_width) / 2.0)
                .set("y", content.max_y() - height)
                .set("width", bar_width)
                .set("height", height)
                .set("fill", chart.bar())
                .set("data-label", column.label()),
        );
    }
    group
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::RoutingConfig, connector, scene::Scene};

    fn render(source: &str, svg: &Svg) -> String {
        let diagram = Diagram::from_scene(&Scene::from_json(source).unwrap()).unwrap();
        let connectors = connector::route_all(&diagram, &RoutingConfig::default()).unwrap();
        svg.render_document(&diagram, &connectors).unwrap().to_string()
    }

    #[test]
    fn test_document_size_from_root() {
        let output = render(
            r#"{ "root": { "type": "group", "layout": { "direction": "stack-vertical", "spacing": 20 },
                "children": [
                    { "id": "a", "type": "rect", "width": 100, "height": 50 },
                    { "id": "b", "type": "rect", "width": 100, "height": 80 }
                ] } }"#,
            &SvgBuilder::new().build(),
        );
        assert!(output.contains("viewBox=\"0 0 100 150\""), "{output}");
        assert!(output.contains("data-id=\"a\""));
        assert!(output.contains("data-layer=\"content\""));
        // Unstyled groups are not drawn.
        assert_eq!(output.matches("<rect").count(), 2);
    }

    #[test]
    fn test_background_and_style_attributes() {
        let svg = SvgBuilder::new()
            .with_background(Some(Color::new("white").unwrap()))
            .build();
        let output = render(
            r#"{ "root": { "id": "card", "type": "rect", "width": 40, "height": 20,
                "style": { "fill": "tomato", "stroke-width": 2, "corner-radius": 4 } } }"#,
            &svg,
        );
        assert!(output.contains("data-layer=\"background\""));
        assert!(output.contains("fill=\"tomato\""));
        assert!(output.contains("stroke-width=\"2\""));
        assert!(output.contains("rx=\"4\""));
        assert!(!output.contains("corner-radius"));
    }

    #[test]
    fn test_rotation_transform() {
        let output = render(
            r#"{ "root": { "type": "rect", "width": 20, "height": 10, "rotation": 45 } }"#,
            &SvgBuilder::new().build(),
        );
        assert!(output.contains("transform=\"rotate(45 "), "{output}");
    }

    #[test]
    fn test_connector_layers() {
        let output = render(
            r#"{
                "root": { "type": "group", "layout": { "direction": "stack-horizontal", "spacing": 100 },
                    "children": [
                        { "id": "a", "type": "ellipse", "width": 40, "height": 40 },
                        { "id": "b", "type": "ellipse", "width": 40, "height": 40 }
                    ] },
                "connectors": [{ "from": "a", "to": "b", "label": "ping" }]
            }"#,
            &SvgBuilder::new().build(),
        );
        let connector = output.find("data-layer=\"connector\"").unwrap();
        let label = output.find("data-layer=\"label\"").unwrap();
        assert!(connector < label);
        assert!(output.contains("ping"));
        assert!(output.contains("<path"));
    }

    #[test]
    fn test_bar_chart_rendering() {
        let output = render(
            r#"{ "root": { "type": "bar-chart", "width": 100, "height": 40, "grid_lines": 2,
                "columns": [{ "label": "a", "value": 1 }, { "label": "b", "value": 2 }] } }"#,
            &SvgBuilder::new().build(),
        );
        assert!(output.contains("data-label=\"a\""));
        assert!(output.contains("data-label=\"b\""));
        assert_eq!(output.matches("<line").count(), 2);
    }

    #[test]
    fn test_path_data() {
        let data = path_data(&[Point::new(0.0, 0.0), Point::new(10.0, 0.0), Point::new(10.0, 5.0)]);
        assert_eq!(data, "M 0 0 L 10 0 L 10 5");
    }
}
