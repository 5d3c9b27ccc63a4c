//! Box model: margin, border, padding and content boxes.
//!
//! An element stores only its border-box size and a [`BoxModel`] of per-side
//! insets. The four boxes are derived on demand by successive inset
//! subtraction from the border-box origin, so they can never drift apart:
//!
//! ```text
//! margin box ⊇ border box ⊇ padding box ⊇ content box
//! ```
//!
//! All derived boxes are expressed relative to the element's own border-box
//! top-left corner.

use serde::Deserialize;

use crate::{
    error::Error,
    geometry::{Bounds, Insets, Point, Size},
};

/// Inset configuration: either a single number applied to all four sides,
/// or a per-side object. Missing sides default to zero.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum InsetsConfig {
    Uniform(f32),
    PerSide {
        #[serde(default)]
        top: f32,
        #[serde(default)]
        right: f32,
        #[serde(default)]
        bottom: f32,
        #[serde(default)]
        left: f32,
    },
}

impl Default for InsetsConfig {
    fn default() -> Self {
        Self::Uniform(0.0)
    }
}

impl From<InsetsConfig> for Insets {
    fn from(config: InsetsConfig) -> Self {
        match config {
            InsetsConfig::Uniform(value) => Insets::uniform(value),
            InsetsConfig::PerSide {
                top,
                right,
                bottom,
                left,
            } => Insets::new(top, right, bottom, left),
        }
    }
}

/// Box model configuration `{ margin, border, padding }`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub struct BoxModelConfig {
    #[serde(default)]
    pub margin: InsetsConfig,
    #[serde(default)]
    pub border: InsetsConfig,
    #[serde(default)]
    pub padding: InsetsConfig,
}

/// Resolved per-side insets for margin, border and padding.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BoxModel {
    margin: Insets,
    border: Insets,
    padding: Insets,
}

impl BoxModel {
    /// Creates a box model from resolved insets.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if any side of any inset is negative
    /// or not finite.
    pub fn new(margin: Insets, border: Insets, padding: Insets) -> Result<Self, Error> {
        for (name, insets) in [("margin", margin), ("border", border), ("padding", padding)] {
            if insets.has_invalid_side() {
                return Err(Error::configuration(
                    "box model",
                    format!("{name} {insets:?} has a negative or non-finite side"),
                ));
            }
        }
        Ok(Self {
            margin,
            border,
            padding,
        })
    }

    /// Creates a box model with only padding set.
    pub fn with_padding(padding: Insets) -> Result<Self, Error> {
        Self::new(Insets::default(), Insets::default(), padding)
    }

    pub fn margin(&self) -> Insets {
        self.margin
    }

    pub fn border(&self) -> Insets {
        self.border
    }

    pub fn padding(&self) -> Insets {
        self.padding
    }

    /// Border and padding combined: the distance from the border box to the content box.
    pub fn content_insets(&self) -> Insets {
        self.border.add(self.padding)
    }

    /// Offset of the content box from the border-box origin.
    pub fn content_origin(&self) -> Point {
        self.content_insets().origin()
    }

    /// The smallest border box that yields a non-negative content box.
    pub fn min_border_box(&self) -> Size {
        Size::default().add_padding(self.content_insets())
    }

    /// Derives the four boxes for a border box of the given size.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] naming `element` when border plus
    /// padding exceed the border box on either axis. A negative content box
    /// means the configuration is invalid, not that the element is empty.
    pub fn resolve(&self, border_box: Size, element: &str) -> Result<BoxGeometry, Error> {
        let insets = self.content_insets();
        let content_width = border_box.width() - insets.horizontal_sum();
        let content_height = border_box.height() - insets.vertical_sum();

        if content_width < 0.0 || content_height < 0.0 {
            return Err(Error::configuration(
                element,
                format!(
                    "border box {}x{} leaves a negative content box {}x{} (clamped to {}x{})",
                    border_box.width(),
                    border_box.height(),
                    content_width,
                    content_height,
                    content_width.max(0.0),
                    content_height.max(0.0),
                ),
            ));
        }

        let border = Bounds::new_from_top_left(Point::default(), border_box);
        let margin = border.add_padding(self.margin);
        let padding = border.shrink(self.border);
        let content = padding.shrink(self.padding);

        Ok(BoxGeometry {
            margin,
            border,
            padding,
            content,
        })
    }
}

impl TryFrom<BoxModelConfig> for BoxModel {
    type Error = Error;

    fn try_from(config: BoxModelConfig) -> Result<Self, Self::Error> {
        Self::new(
            config.margin.into(),
            config.border.into(),
            config.padding.into(),
        )
    }
}

/// The derived boxes of an element, relative to its border-box origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxGeometry {
    margin: Bounds,
    border: Bounds,
    padding: Bounds,
    content: Bounds,
}

impl BoxGeometry {
    pub fn margin_box(&self) -> Bounds {
        self.margin
    }

    pub fn border_box(&self) -> Bounds {
        self.border
    }

    pub fn padding_box(&self) -> Bounds {
        self.padding
    }

    pub fn content_box(&self) -> Bounds {
        self.content
    }
}


#[cfg(test)]
mod proptest_tests {
    use float_cmp::approx_eq;
    use proptest::prelude::*;

    use super::*;

    /// For non-negative uniform border/padding, content + 2×(border+padding) == border box.
    fn check_round_trip(
        width: f32,
        height: f32,
        border: f32,
        padding: f32,
    ) -> Result<(), TestCaseError> {
        let model = BoxModel::new(
            Insets::default(),
            Insets::uniform(border),
            Insets::uniform(padding),
        )
        .map_err(|e| TestCaseError::fail(e.to_string()))?;
        let inset = 2.0 * (border + padding);
        prop_assume!(width >= inset && height >= inset);

        let geometry = model
            .resolve(Size::new(width, height), "prop")
            .map_err(|e| TestCaseError::fail(e.to_string()))?;
        let content = geometry.content_box();
        let outer = geometry.border_box();

        prop_assert!(approx_eq!(f32, content.width() + inset, outer.width(), epsilon = 1e-3));
        prop_assert!(approx_eq!(f32, content.height() + inset, outer.height(), epsilon = 1e-3));
        Ok(())
    }

    proptest! {
        #[test]
        fn box_model_round_trip(
            width in 0.0f32..500.0,
            height in 0.0f32..500.0,
            border in 0.0f32..20.0,
            padding in 0.0f32..40.0,
        ) {
            check_round_trip(width, height, border, padding)?;
        }
    }
}
