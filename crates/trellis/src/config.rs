//! Configuration types for Trellis diagram rendering.
//!
//! This module provides configuration structures that control how connectors
//! are routed and how diagrams are styled. All types implement
//! [`serde::Deserialize`] for flexible loading from external sources.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level application configuration combining routing and style settings.
//! - [`RoutingConfig`] - Grid resolution, clearance and search bounds of the connector router.
//! - [`StyleConfig`] - Visual styling options such as background and connector colors.
//!
//! # Example
//!
//! ```
//! # use trellis::config::AppConfig;
//! // Use default configuration
//! let config = AppConfig::default();
//! assert!(config.style().background_color().is_ok());
//! assert!(config.routing().router_config().is_ok());
//! ```

use serde::Deserialize;

use trellis_core::{color::Color, routing::RouterConfig};

/// Top-level application configuration combining routing and style settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Routing configuration section.
    #[serde(default)]
    routing: RoutingConfig,

    /// Style configuration section.
    #[serde(default)]
    style: StyleConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] with the specified routing and style configurations.
    pub fn new(routing: RoutingConfig, style: StyleConfig) -> Self {
        Self { routing, style }
    }

    /// Returns the routing configuration.
    pub fn routing(&self) -> &RoutingConfig {
        &self.routing
    }

    /// Returns the style configuration.
    pub fn style(&self) -> &StyleConfig {
        &self.style
    }
}

/// Connector routing configuration.
///
/// Values are validated when converted into a [`RouterConfig`], not at
/// decode time, so a partially written config file still loads.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RoutingConfig {
    /// Grid cell size in diagram units.
    cell_size: f32,
    /// Minimum distance kept between a path and any obstacle.
    clearance: f32,
    /// Upper bound on A* node expansions before falling back to a direct segment.
    max_expansions: usize,
    /// Extra space around the endpoints and obstacles searched for a path.
    search_margin: f32,
    /// Segments at most twice this long get their label on the midpoint.
    label_clearance: f32,
    /// Distance a label is pushed off its segment.
    label_offset: f32,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            cell_size: 10.0,
            clearance: 10.0,
            max_expansions: 50_000,
            search_margin: 40.0,
            label_clearance: 12.0,
            label_offset: 8.0,
        }
    }
}

impl RoutingConfig {
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

    pub fn label_clearance(&self) -> f32 {
        self.label_clearance
    }

    pub fn label_offset(&self) -> f32 {
        self.label_offset
    }

    /// Builds the engine's [`RouterConfig`] from this section.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the cell size is not positive or a
    /// distance is negative.
    pub fn router_config(&self) -> Result<RouterConfig, trellis_core::Error> {
        RouterConfig::new(
            self.cell_size,
            self.clearance,
            self.max_expansions,
            self.search_margin,
        )
    }
}

/// Visual styling configuration for rendered diagrams.
///
/// Controls appearance options such as background color. Fields that are
/// not set fall back to renderer defaults.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    /// Default background [`Color`] for diagrams, as a color string.
    background_color: Option<String>,

    /// Stroke and arrowhead color of connectors.
    connector_color: String,

    /// Font family of connector labels and text elements without their own.
    font_family: String,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            background_color: None,
            connector_color: "#333333".to_string(),
            font_family: "sans-serif".to_string(),
        }
    }
}

impl StyleConfig {
    /// Returns the parsed background [`Color`], or `None` if no color is configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured color string cannot be parsed
    /// into a valid [`Color`].
    pub fn background_color(&self) -> Result<Option<Color>, String> {
        self.background_color
            .as_ref()
            .map(|color| Color::new(color))
            .transpose()
            .map_err(|err| format!("Invalid background color in config: {err}"))
    }

    /// Returns the parsed connector [`Color`].
    ///
    /// # Errors
    ///
    /// Returns an error if the configured color string is not a valid color.
    pub fn connector_color(&self) -> Result<Color, String> {
        Color::new(&self.connector_color)
            .map_err(|err| format!("Invalid connector color in config: {err}"))
    }

    pub fn font_family(&self) -> &str {
        &self.font_family
    }
}
