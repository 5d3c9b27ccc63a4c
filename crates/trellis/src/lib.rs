//! Trellis - Declarative vector diagrams with automatic layout and connector routing.
//!
//! A scene is described as a JSON tree of shapes, text, charts and
//! containers plus a list of connectors between named elements. Trellis
//! resolves container layout, box models and transforms into world
//! geometry, routes each connector around the other shapes and renders the
//! result to SVG.

pub mod config;
pub mod connector;
pub mod diagram;
pub mod scene;

mod error;
mod export;

pub use trellis_core::{color, element, geometry, layout, routing, style};

pub use error::TrellisError;

use log::{debug, info, trace};

use config::AppConfig;
use connector::RoutedConnector;
use diagram::Diagram;
use scene::Scene;

/// Builder for parsing and rendering Trellis diagrams.
///
/// This provides an API for processing Trellis scenes through decoding,
/// layout, routing and rendering stages.
///
/// # Examples
///
/// ```rust,no_run
/// use trellis::{DiagramBuilder, config::AppConfig};
///
/// let source = r#"{ "root": { "type": "rect", "width": 80, "height": 40 } }"#;
///
/// // With custom config
/// let config = AppConfig::default();
/// let builder = DiagramBuilder::new(config);
///
/// // Decode the scene description
/// let scene = builder.parse(source)
///     .expect("Failed to parse");
///
/// // Lay out, route and render to SVG
/// let svg = builder.render_svg(&scene)
///     .expect("Failed to render");
///
/// // Or use default config
/// let builder = DiagramBuilder::default();
/// ```
#[derive(Default)]
pub struct DiagramBuilder {
    config: AppConfig,
}

impl DiagramBuilder {
    /// Create a new diagram builder with the given configuration.
    ///
    /// # Arguments
    ///
    /// * `config` - Application configuration including routing and style settings
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    /// Decode JSON source into a scene description.
    ///
    /// # Errors
    ///
    /// Returns [`TrellisError::Scene`] with the line and column of the first
    /// decode failure.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use trellis::DiagramBuilder;
    ///
    /// let builder = DiagramBuilder::default();
    /// let scene = builder
    ///     .parse(r#"{ "root": { "type": "ellipse", "width": 30, "height": 20 } }"#)
    ///     .expect("Failed to parse scene");
    /// ```
    pub fn parse(&self, source: &str) -> Result<Scene, TrellisError> {
        info!("Parsing scene");

        let scene = Scene::from_json(source)?;

        debug!(nodes = scene.node_count(); "Scene parsed successfully");
        trace!(scene:?; "Parsed scene");

        Ok(scene)
    }

    /// Build the element tree of a scene and lay it out.
    ///
    /// # Errors
    ///
    /// Returns [`TrellisError::Layout`] for invalid geometry or configuration
    /// values and [`TrellisError::Build`] for inconsistent ids.
    pub fn build(&self, scene: &Scene) -> Result<Diagram, TrellisError> {
        Diagram::from_scene(scene)
    }

    /// Route every connector of a laid-out diagram.
    ///
    /// # Errors
    ///
    /// Returns [`TrellisError::Layout`] if the routing configuration is invalid.
    pub fn route(&self, diagram: &Diagram) -> Result<Vec<RoutedConnector>, TrellisError> {
        connector::route_all(diagram, self.config.routing())
    }

    /// Render a scene to an SVG string.
    ///
    /// This builds the element tree, lays it out, routes the connectors and
    /// renders the result.
    ///
    /// # Errors
    ///
    /// Returns [`TrellisError`] for build, layout, configuration or rendering
    /// errors.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use trellis::DiagramBuilder;
    ///
    /// let builder = DiagramBuilder::default();
    /// let scene = builder
    ///     .parse(r#"{ "root": { "type": "text", "content": "hello" } }"#)
    ///     .expect("Failed to parse");
    ///
    /// let svg = builder.render_svg(&scene)
    ///     .expect("Failed to render scene");
    ///
    /// println!("{}", svg);
    /// ```
    pub fn render_svg(&self, scene: &Scene) -> Result<String, TrellisError> {
        let diagram = self.build(scene)?;
        let connectors = self.route(&diagram)?;

        let style = self.config.style();
        let svg = export::svg::SvgBuilder::new()
            .with_background(style.background_color().map_err(TrellisError::Config)?)
            .with_connector_color(style.connector_color().map_err(TrellisError::Config)?)
            .with_font_family(style.font_family())
            .build();

        let document = svg.render_document(&diagram, &connectors)?;

        info!("SVG rendered successfully");
        Ok(document.to_string())
    }
}
