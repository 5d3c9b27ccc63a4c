//! Diagram elements and their ownership tree.
//!
//! Elements live in an [`ElementTree`] arena and are addressed by
//! [`ElementId`] handles. A parent exclusively owns the ordered sequence of
//! its children; each child holds only its parent's id as a back-reference,
//! used for reparenting and for walking up the position chain.

mod kind;
mod tree;

use std::fmt;

use crate::{
    box_model::BoxModel,
    geometry::{Point, Size},
    layout::Container,
    style::Style,
};

pub use kind::{BarChart, Column, DEFAULT_FONT_SIZE, ElementKind, estimate_text_size};
pub use tree::ElementTree;

/// Handle of an element inside one [`ElementTree`].
///
/// Ids are scoped to the tree that created them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(usize);

impl ElementId {
    /// Returns the arena slot index of this id.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A node of the element tree.
///
/// `position` is the offset of the border-box top-left from the parent's
/// border-box top-left, before the parent's rotation is applied. `size` is
/// the border-box size. `rotation` is in degrees about the element's own
/// center.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    name: Option<String>,
    kind: ElementKind,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
    position: Point,
    explicitly_positioned: bool,
    size: Size,
    box_model: BoxModel,
    rotation: f32,
    z_index: Option<i32>,
    style: Style,
    container: Option<Container>,
}

impl Element {
    fn new(kind: ElementKind) -> Self {
        Self {
            name: None,
            size: kind.natural_size(),
            kind,
            parent: None,
            children: Vec::new(),
            position: Point::default(),
            explicitly_positioned: false,
            box_model: BoxModel::default(),
            rotation: 0.0,
            z_index: None,
            style: Style::default(),
            container: None,
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn kind(&self) -> &ElementKind {
        &self.kind
    }

    pub fn parent(&self) -> Option<ElementId> {
        self.parent
    }

    pub fn children(&self) -> &[ElementId] {
        &self.children
    }

    /// Offset from the parent's border-box origin.
    pub fn position(&self) -> Point {
        self.position
    }

    /// True once the caller placed this element; bounded containers then
    /// leave it where it is instead of defaulting it to the content origin.
    pub fn is_explicitly_positioned(&self) -> bool {
        self.explicitly_positioned
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn box_model(&self) -> &BoxModel {
        &self.box_model
    }

    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    pub fn z_index(&self) -> Option<i32> {
        self.z_index
    }

    pub fn style(&self) -> &Style {
        &self.style
    }

    pub fn container(&self) -> Option<&Container> {
        self.container.as_ref()
    }

    pub fn is_container(&self) -> bool {
        self.container.is_some()
    }

    /// Moves the element without marking it as explicitly positioned.
    pub(crate) fn place(&mut self, position: Point) {
        self.position = position;
    }

    pub(crate) fn set_rotation(&mut self, degrees: f32) {
        self.rotation = degrees;
    }

    /// Resizes the element as a layout result, bypassing box model checks
    /// that the caller already performed.
    pub(crate) fn set_layout_size(&mut self, size: Size) {
        self.size = size;
    }

    pub(crate) fn container_mut(&mut self) -> Option<&mut Container> {
        self.container.as_mut()
    }
}
