//! Element kinds and their intrinsic geometry.

use crate::{
    color::Color,
    error::Error,
    geometry::{Bounds, Point, Size},
};

/// Default font size used when a text element carries no `font-size` style.
pub const DEFAULT_FONT_SIZE: f32 = 16.0;

/// Average glyph advance as a fraction of the font size.
const TEXT_ADVANCE_RATIO: f32 = 0.6;

/// Line height as a fraction of the font size.
const TEXT_LINE_HEIGHT_RATIO: f32 = 1.2;

/// Estimates the border-box size of a single-line text run.
///
/// There is no font shaping: the estimate is `chars × 0.6 × font_size` wide
/// by `1.2 × font_size` tall.
pub fn estimate_text_size(content: &str, font_size: f32) -> Size {
    let chars = content.chars().count() as f32;
    Size::new(
        chars * TEXT_ADVANCE_RATIO * font_size,
        TEXT_LINE_HEIGHT_RATIO * font_size,
    )
}

/// What an element draws.
#[derive(Debug, Clone, PartialEq)]
pub enum ElementKind {
    /// Invisible unless styled. Containers are usually groups.
    Group,
    Rectangle,
    Ellipse,
    /// A closed polygon with vertices local to the border-box top-left.
    Polygon { points: Vec<Point> },
    /// A straight line with endpoints local to the border-box top-left.
    Line { from: Point, to: Point },
    Text { content: String },
    BarChart(BarChart),
}

impl ElementKind {
    /// Short kind name used in logs and diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Group => "group",
            Self::Rectangle => "rect",
            Self::Ellipse => "ellipse",
            Self::Polygon { .. } => "polygon",
            Self::Line { .. } => "line",
            Self::Text { .. } => "text",
            Self::BarChart(_) => "bar-chart",
        }
    }

    /// The size an element of this kind has before any explicit sizing.
    ///
    /// Vertex-based kinds extend from the local origin to their furthest
    /// vertex; text uses [`estimate_text_size`] at [`DEFAULT_FONT_SIZE`].
    pub fn natural_size(&self) -> Size {
        match self {
            Self::Polygon { points } => extent_from_origin(points.iter().copied()),
            Self::Line { from, to } => extent_from_origin([*from, *to]),
            Self::Text { content } => estimate_text_size(content, DEFAULT_FONT_SIZE),
            Self::Group | Self::Rectangle | Self::Ellipse | Self::BarChart(_) => Size::default(),
        }
    }

    /// The element's outline in local border-box coordinates.
    ///
    /// Polygons yield their vertices, lines their two endpoints and every
    /// other kind the four corners of its border box.
    pub fn outline(&self, size: Size) -> Vec<Point> {
        match self {
            Self::Polygon { points } => points.clone(),
            Self::Line { from, to } => vec![*from, *to],
            _ => Bounds::new_from_top_left(Point::default(), size)
                .corners()
                .to_vec(),
        }
    }
}

fn extent_from_origin(points: impl IntoIterator<Item = Point>) -> Size {
    Bounds::from_points(points)
        .map(|b| Size::new(b.max_x().max(0.0), b.max_y().max(0.0)))
        .unwrap_or_default()
}

/// A single bar of a [`BarChart`].
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    label: String,
    value: f32,
}

impl Column {
    pub fn new(label: impl Into<String>, value: f32) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn value(&self) -> f32 {
        self.value
    }
}

/// A simple vertical bar chart drawn inside its element's content box.
#[derive(Debug, Clone, PartialEq)]
pub struct BarChart {
    columns: Vec<Column>,
    background: Color,
    grid: Color,
    bar: Color,
    grid_lines: usize,
}

impl BarChart {
    pub const DEFAULT_BACKGROUND: &'static str = "#f8f9fa";
    pub const DEFAULT_GRID: &'static str = "#e0e0e0";
    pub const DEFAULT_BAR: &'static str = "#4a90d9";
    pub const DEFAULT_GRID_LINES: usize = 4;

    /// Creates a chart with the documented default colors.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if any column value is negative or
    /// not finite.
    pub fn new(columns: Vec<Column>) -> Result<Self, Error> {
        if let Some(bad) = columns
            .iter()
            .find(|c| !c.value.is_finite() || c.value < 0.0)
        {
            return Err(Error::configuration(
                "bar chart",
                format!("column `{}` has invalid value {}", bad.label, bad.value),
            ));
        }

        Ok(Self {
            columns,
            background: chart_color(Self::DEFAULT_BACKGROUND)?,
            grid: chart_color(Self::DEFAULT_GRID)?,
            bar: chart_color(Self::DEFAULT_BAR)?,
            grid_lines: Self::DEFAULT_GRID_LINES,
        })
    }

    pub fn with_background(mut self, color: Color) -> Self {
        self.background = color;
        self
    }

    pub fn with_grid(mut self, color: Color) -> Self {
        self.grid = color;
        self
    }

    pub fn with_bar(mut self, color: Color) -> Self {
        self.bar = color;
        self
    }

    pub fn with_grid_lines(mut self, grid_lines: usize) -> Self {
        self.grid_lines = grid_lines;
        self
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Returns the column at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Lookup`] when `index` is out of range.
    pub fn column(&self, index: usize) -> Result<&Column, Error> {
        self.columns
            .get(index)
            .ok_or_else(|| Error::lookup("bar chart column", index, self.columns.len()))
    }

    /// The largest column value, or zero for an empty chart.
    pub fn max_value(&self) -> f32 {
        self.columns.iter().map(|c| c.value).fold(0.0, f32::max)
    }

    pub fn background(&self) -> Color {
        self.background
    }

    pub fn grid(&self) -> Color {
        self.grid
    }

    pub fn bar(&self) -> Color {
        self.bar
    }

    pub fn grid_lines(&self) -> usize {
        self.grid_lines
    }
}

fn chart_color(value: &str) -> Result<Color, Error> {
    Color::new(value).map_err(|reason| Error::configuration("bar chart", reason))
}
