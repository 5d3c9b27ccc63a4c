//! Integration tests for the DiagramBuilder API
//!
//! These tests verify that the public API works and is usable.

use trellis::{
    DiagramBuilder, TrellisError,
    config::AppConfig,
    routing::RouteKind,
};

const PIPELINE: &str = r##"{
    "root": {
        "type": "group",
        "layout": { "direction": "stack-horizontal", "spacing": 80, "cross_axis_alignment": "center" },
        "box_model": { "padding": 20 },
        "children": [
            { "id": "source", "type": "rect", "width": 80, "height": 40, "style": { "fill": "#dde" } },
            { "id": "sink", "type": "ellipse", "width": 60, "height": 60 }
        ]
    },
    "connectors": [{ "from": "source", "to": "sink", "label": "feeds" }]
}"##;

#[test]
fn test_builder_api_exists() {
    let _builder = DiagramBuilder::default();
}

#[test]
fn test_parse_simple_scene() {
    let builder = DiagramBuilder::default();
    let result = builder.parse(r#"{ "root": { "type": "rect" } }"#);
    assert!(result.is_ok(), "Should parse valid scene: {:?}", result.err());
}

#[test]
fn test_render_simple_scene() {
    let builder = DiagramBuilder::default();
    let scene = builder.parse(PIPELINE).expect("Failed to parse scene");
    let svg = builder.render_svg(&scene).expect("Failed to render");

    assert!(svg.contains("<svg"), "Output should contain SVG tag");
    assert!(svg.contains("</svg>"), "Output should be complete SVG");
    assert!(svg.contains("data-id=\"source\""));
    assert!(svg.contains("data-id=\"sink\""));
    assert!(svg.contains("feeds"));
}

#[test]
fn test_build_exposes_layout() {
    let builder = DiagramBuilder::default();
    let scene = builder.parse(PIPELINE).unwrap();
    let diagram = builder.build(&scene).unwrap();
    let tree = diagram.tree();

    let root = tree.get(diagram.root()).unwrap();
    // 20 + 80 + 80 + 60 + 20 wide, 20 + 60 + 20 high.
    assert_eq!(root.size().width(), 260.0);
    assert_eq!(root.size().height(), 100.0);

    let source = tree.get(diagram.element("source").unwrap()).unwrap();
    assert_eq!(source.position().x(), 20.0);
    assert_eq!(source.position().y(), 30.0);

    let routed = builder.route(&diagram).unwrap();
    assert_eq!(routed.len(), 1);
    assert_eq!(routed[0].kind(), RouteKind::Grid);
}

#[test]
fn test_parse_invalid_json_returns_scene_error() {
    let builder = DiagramBuilder::default();
    let result = builder.parse("{ \"root\": ");
    assert!(matches!(result, Err(TrellisError::Scene { .. })));
}

#[test]
fn test_invalid_background_color_is_config_error() {
    let config: AppConfig =
        config_from_json(r#"{ "style": { "background_color": "definitely-not-a-color" } }"#);
    let builder = DiagramBuilder::new(config);
    let scene = builder.parse(r#"{ "root": { "type": "rect" } }"#).unwrap();
    assert!(matches!(builder.render_svg(&scene), Err(TrellisError::Config(_))));
}

#[test]
fn test_layout_errors_surface() {
    let builder = DiagramBuilder::default();
    let scene = builder
        .parse(r#"{ "root": { "type": "group", "layout": { "direction": "spiral" } } }"#)
        .unwrap();
    let err = builder.render_svg(&scene).unwrap_err();
    assert!(matches!(err, TrellisError::Layout(_)));
    assert!(err.to_string().contains("spiral"));
}

#[test]
fn test_builder_reusability() {
    let builder = DiagramBuilder::default();

    let scene1 = builder.parse(r#"{ "root": { "type": "rect", "width": 5, "height": 5 } }"#).unwrap();
    let svg1 = builder.render_svg(&scene1).expect("Failed to render scene1");

    let scene2 = builder.parse(PIPELINE).unwrap();
    let svg2 = builder.render_svg(&scene2).expect("Failed to render scene2");

    assert!(svg1.contains("<svg"), "First SVG should be valid");
    assert!(svg2.contains("<svg"), "Second SVG should be valid");
}

fn config_from_json(json: &str) -> AppConfig {
    serde_json::from_str(json).expect("valid config")
}
