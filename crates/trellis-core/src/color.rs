//! CSS colors.
//!
//! [`Color`] is a parsed CSS color. Color-valued style properties, chart
//! palettes and the configured canvas/connector colors all go through it, so
//! an unparsable value is rejected where it is declared rather than emitted
//! into the SVG output.

use std::{fmt, str::FromStr};

use color::DynamicColor;

/// A parsed CSS color. Displays in CSS syntax, keeping named colors named.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Color(DynamicColor);

impl Color {
    /// Parses a CSS color such as `"#4a90d9"`, `"rgb(74, 144, 217)"` or
    /// `"steelblue"`.
    ///
    /// # Errors
    ///
    /// Returns a message naming the rejected value.
    ///
    /// # Examples
    ///
    /// ```
    /// use trellis_core::color::Color;
    ///
    /// assert!(Color::new("#4a90d9").is_ok());
    /// assert!(Color::new("blurple").is_err());
    /// ```
    pub fn new(value: &str) -> Result<Self, String> {
        value.parse()
    }
}

impl FromStr for Color {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        DynamicColor::from_str(value.trim())
            .map(Self)
            .map_err(|err| format!("invalid color `{value}`: {err}"))
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::new("black").expect("'black' is a valid CSS color")
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Color> for svg::node::Value {
    fn from(color: Color) -> Self {
        Self::from(color.to_string())
    }
}
