//! Per-element style property maps.
//!
//! A [`Style`] maps a fixed set of recognized [`StyleProperty`] keys to
//! values. Only properties that were set are emitted; there is no cascade or
//! inheritance between elements. Component defaults (for example chart
//! background colors) are layered explicitly with [`Style::with_defaults`].
//!
//! # SVG Attribute Mapping
//!
//! | Property | SVG Attribute |
//! |----------|---------------|
//! | `fill` | `fill` |
//! | `fill-opacity` | `fill-opacity` |
//! | `stroke` | `stroke` |
//! | `stroke-width` | `stroke-width` |
//! | `stroke-opacity` | `stroke-opacity` |
//! | `stroke-dasharray` | `stroke-dasharray` |
//! | `opacity` | `opacity` |
//! | `font-size` | `font-size` |
//! | `font-family` | `font-family` |
//! | `font-weight` | `font-weight` |
//! | `text-anchor` | `text-anchor` |
//! | `corner-radius` | `rx` (rectangles only) |

use std::fmt;

use indexmap::IndexMap;
use serde::Deserialize;

use crate::{color::Color, error::Error};

/// The recognized style properties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StyleProperty {
    Fill,
    FillOpacity,
    Stroke,
    StrokeWidth,
    StrokeOpacity,
    StrokeDasharray,
    Opacity,
    FontSize,
    FontFamily,
    FontWeight,
    TextAnchor,
    CornerRadius,
}

impl StyleProperty {
    /// Returns the property name as written in scene descriptions.
    pub fn name(self) -> &'static str {
        match self {
            Self::Fill => "fill",
            Self::FillOpacity => "fill-opacity",
            Self::Stroke => "stroke",
            Self::StrokeWidth => "stroke-width",
            Self::StrokeOpacity => "stroke-opacity",
            Self::StrokeDasharray => "stroke-dasharray",
            Self::Opacity => "opacity",
            Self::FontSize => "font-size",
            Self::FontFamily => "font-family",
            Self::FontWeight => "font-weight",
            Self::TextAnchor => "text-anchor",
            Self::CornerRadius => "corner-radius",
        }
    }

    /// Returns the SVG attribute this property maps to.
    pub fn svg_attribute(self) -> &'static str {
        match self {
            Self::CornerRadius => "rx",
            other => other.name(),
        }
    }

    fn validate(self, value: &str) -> Result<(), String> {
        match self {
            Self::Fill | Self::Stroke => {
                if value == "none" {
                    Ok(())
                } else {
                    Color::new(value).map(|_| ())
                }
            }
            Self::FillOpacity | Self::StrokeOpacity | Self::Opacity => {
                let number = parse_number(value)?;
                if (0.0..=1.0).contains(&number) {
                    Ok(())
                } else {
                    Err(format!("opacity `{value}` must be between 0 and 1"))
                }
            }
            Self::StrokeWidth | Self::FontSize | Self::CornerRadius => {
                let number = parse_number(value)?;
                if number >= 0.0 {
                    Ok(())
                } else {
                    Err(format!("`{value}` must not be negative"))
                }
            }
            Self::TextAnchor => match value {
                "start" | "middle" | "end" => Ok(()),
                _ => Err(format!(
                    "invalid text anchor `{value}`, valid values: start, middle, end"
                )),
            },
            Self::StrokeDasharray | Self::FontFamily | Self::FontWeight => Ok(()),
        }
    }
}

impl fmt::Display for StyleProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn parse_number(value: &str) -> Result<f32, String> {
    value
        .trim()
        .parse::<f32>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| format!("`{value}` is not a number"))
}

/// A raw style value as it appears in a scene description.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum StyleValue {
    Number(f64),
    Text(String),
}

impl StyleValue {
    fn into_string(self) -> String {
        match self {
            Self::Number(n) => n.to_string(),
            Self::Text(s) => s,
        }
    }
}

/// An insertion-ordered map of style properties to values.
///
/// # Examples
///
/// ```
/// use trellis_core::style::{Style, StyleProperty};
///
/// let mut style = Style::new();
/// style.set(StyleProperty::Fill, "#4a90d9").unwrap();
/// style.set(StyleProperty::StrokeWidth, "2").unwrap();
///
/// assert_eq!(style.get(StyleProperty::Fill), Some("#4a90d9"));
/// assert!(style.set(StyleProperty::Stroke, "not-a-color").is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(try_from = "IndexMap<StyleProperty, StyleValue>")]
pub struct Style {
    properties: IndexMap<StyleProperty, String>,
}

impl Style {
    /// Creates an empty style.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a property after validating its value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] naming the property and the rejected
    /// value when the value does not suit the property.
    pub fn set(&mut self, property: StyleProperty, value: impl Into<String>) -> Result<(), Error> {
        let value = value.into();
        property
            .validate(&value)
            .map_err(|reason| Error::configuration(format!("style property `{property}`"), reason))?;
        self.properties.insert(property, value);
        Ok(())
    }

    /// Builder-style variant of [`Style::set`].
    pub fn with(mut self, property: StyleProperty, value: impl Into<String>) -> Result<Self, Error> {
        self.set(property, value)?;
        Ok(self)
    }

    /// Returns the value for a property, if set.
    pub fn get(&self, property: StyleProperty) -> Option<&str> {
        self.properties.get(&property).map(String::as_str)
    }

    /// Returns a property parsed as a number, if set and numeric.
    pub fn number(&self, property: StyleProperty) -> Option<f32> {
        self.get(property).and_then(|v| parse_number(v).ok())
    }

    /// Returns true if no property is set.
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Iterates over the set properties in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (StyleProperty, &str)> {
        self.properties.iter().map(|(k, v)| (*k, v.as_str()))
    }

    /// Returns a style where `defaults` fill in any property this style leaves unset.
    pub fn with_defaults(&self, defaults: &Style) -> Style {
        let mut merged = defaults.clone();
        for (property, value) in &self.properties {
            merged.properties.insert(*property, value.clone());
        }
        merged
    }
}

impl TryFrom<IndexMap<StyleProperty, StyleValue>> for Style {
    type Error = String;

    fn try_from(raw: IndexMap<StyleProperty, StyleValue>) -> Result<Self, Self::Error> {
        let mut style = Style::new();
        for (property, value) in raw {
            style
                .set(property, value.into_string())
                .map_err(|err| err.to_string())?;
        }
        Ok(style)
    }
}

/// Apply every set style attribute to an SVG element.
///
/// `corner-radius` is skipped here because `rx` only means a corner radius
/// on rectangles; rectangle rendering applies it explicitly.
///
/// # Examples
///
/// ```
/// use trellis_core::style::{Style, StyleProperty};
/// use svg::node::element as svg_element;
///
/// let style = Style::new().with(StyleProperty::Fill, "red").unwrap();
/// let rect = trellis_core::apply_style!(svg_element::Rectangle::new(), &style);
/// assert!(rect.to_string().contains("fill=\"red\""));
/// ```
#[macro_export]
macro_rules! apply_style {
    ($element:expr, $style:expr) => {{
        let mut elem = $element;
        for (property, value) in $style.iter() {
            if property != $crate::style::StyleProperty::CornerRadius {
                elem = elem.set(property.svg_attribute(), value);
            }
        }
        elem
    }};
}
