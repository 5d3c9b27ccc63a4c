//! The element arena and its ownership operations.

use log::trace;

use super::{Element, ElementId, ElementKind};
use crate::{
    box_model::{BoxGeometry, BoxModel},
    error::Error,
    geometry::{Point, Size},
    layout::{self, ArrangeState, Container, ContainerConfig, SizeMode},
    style::Style,
};

/// Arena of elements forming one diagram.
///
/// The tree enforces the one-parent invariant: an element appears in at most
/// one parent's children sequence, and reparenting moves it rather than
/// copying it. Elements are never freed individually; a detached element
/// stays in the arena as a parentless root until the tree is dropped.
///
/// # Examples
///
/// ```
/// use trellis_core::element::{ElementKind, ElementTree};
///
/// let mut tree = ElementTree::new();
/// let a = tree.create(ElementKind::Group);
/// let b = tree.create(ElementKind::Group);
/// let child = tree.create(ElementKind::Rectangle);
///
/// tree.add_child(a, child).unwrap();
/// tree.add_child(b, child).unwrap();
///
/// assert!(tree.children(a).unwrap().is_empty());
/// assert_eq!(tree.children(b).unwrap(), &[child]);
/// assert_eq!(tree.parent(child).unwrap(), Some(b));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ElementTree {
    elements: Vec<Element>,
}

impl ElementTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of elements allocated in this tree, attached or not.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Allocates a new parentless element and returns its id.
    pub fn create(&mut self, kind: ElementKind) -> ElementId {
        let id = ElementId(self.elements.len());
        self.elements.push(Element::new(kind));
        id
    }

    /// Allocates a new named element.
    pub fn create_named(&mut self, name: impl Into<String>, kind: ElementKind) -> ElementId {
        let id = self.create(kind);
        self.elements[id.0].name = Some(name.into());
        id
    }

    pub fn contains(&self, id: ElementId) -> bool {
        id.0 < self.elements.len()
    }

    /// Returns the element for `id`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownElement`] if `id` does not belong to this tree.
    pub fn get(&self, id: ElementId) -> Result<&Element, Error> {
        self.elements.get(id.0).ok_or(Error::UnknownElement(id))
    }

    pub(crate) fn get_mut(&mut self, id: ElementId) -> Result<&mut Element, Error> {
        self.elements.get_mut(id.0).ok_or(Error::UnknownElement(id))
    }

    pub(crate) fn container_mut(&mut self, id: ElementId) -> Result<&mut Container, Error> {
        let label = self.label(id);
        self.get_mut(id)?
            .container_mut()
            .ok_or_else(|| Error::configuration(label, "element is not a container"))
    }

    /// Human-readable label used in diagnostics: `"name" (#id)` or `#id`.
    pub fn label(&self, id: ElementId) -> String {
        match self.elements.get(id.0).and_then(Element::name) {
            Some(name) => format!("\"{name}\" ({id})"),
            None => id.to_string(),
        }
    }

    /// Returns the first element (in creation order) with the given name.
    pub fn find_by_name(&self, name: &str) -> Option<ElementId> {
        self.elements
            .iter()
            .position(|e| e.name() == Some(name))
            .map(ElementId)
    }

    pub fn set_name(&mut self, id: ElementId, name: impl Into<String>) -> Result<(), Error> {
        self.get_mut(id)?.name = Some(name.into());
        Ok(())
    }

    pub fn set_style(&mut self, id: ElementId, style: Style) -> Result<(), Error> {
        self.get_mut(id)?.style = style;
        Ok(())
    }

    pub fn set_z_index(&mut self, id: ElementId, z_index: Option<i32>) -> Result<(), Error> {
        self.get_mut(id)?.z_index = z_index;
        Ok(())
    }

    /// Sets the border-box size.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if the current box model would leave
    /// a negative content box; the element is left unchanged.
    pub fn set_size(&mut self, id: ElementId, size: Size) -> Result<(), Error> {
        let label = self.label(id);
        let element = self.get(id)?;
        if !size.width().is_finite() || !size.height().is_finite() {
            return Err(Error::configuration(
                label,
                format!("size {}x{} is not finite", size.width(), size.height()),
            ));
        }
        element.box_model.resolve(size, &label)?;

        let element = self.get_mut(id)?;
        element.size = size;
        if let Some(container) = element.container_mut() {
            container.set_state(ArrangeState::Unarranged);
        }
        self.invalidate_parent(id);
        Ok(())
    }

    /// Replaces the box model.
    ///
    /// Auto-sized container axes are grown to at least the new border and
    /// padding before validation, since their final size is only known after
    /// layout.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if the box model leaves a negative
    /// content box for a fixed size; the element is left unchanged.
    pub fn set_box_model(&mut self, id: ElementId, box_model: BoxModel) -> Result<(), Error> {
        let label = self.label(id);
        let element = self.get(id)?;

        let mut size = element.size;
        if let Some(config) = element.container().map(Container::config) {
            let min = box_model.min_border_box();
            if config.width().is_auto() {
                size = size.with_width(size.width().max(min.width()));
            }
            if config.height().is_auto() {
                size = size.with_height(size.height().max(min.height()));
            }
        }
        box_model.resolve(size, &label)?;

        let element = self.get_mut(id)?;
        element.box_model = box_model;
        element.size = size;
        if let Some(container) = element.container_mut() {
            container.set_state(ArrangeState::Unarranged);
        }
        self.invalidate_parent(id);
        Ok(())
    }

    /// Derives the margin, border, padding and content boxes of an element.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] for a negative content box.
    pub fn box_geometry(&self, id: ElementId) -> Result<BoxGeometry, Error> {
        let element = self.get(id)?;
        element.box_model.resolve(element.size, &self.label(id))
    }

    /// Sets the position relative to the parent and marks it explicit.
    pub fn set_position(&mut self, id: ElementId, position: Point) -> Result<(), Error> {
        let element = self.get_mut(id)?;
        element.position = position;
        element.explicitly_positioned = true;
        self.invalidate_parent(id);
        Ok(())
    }

    /// Turns an element into a container with the given configuration.
    ///
    /// Fixed axes are applied to the element size immediately; auto axes
    /// start degenerate (border and padding only) and are resolved by layout.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if a fixed axis leaves a negative
    /// content box.
    pub fn set_container(&mut self, id: ElementId, config: ContainerConfig) -> Result<(), Error> {
        let label = self.label(id);
        let element = self.get(id)?;
        let min = element.box_model.min_border_box();
        let size = Size::new(
            config.width().resolve(min.width()),
            config.height().resolve(min.height()),
        );
        element.box_model.resolve(size, &label)?;

        let element = self.get_mut(id)?;
        element.size = size;
        element.container = Some(Container::new(config));
        self.invalidate_parent(id);
        Ok(())
    }

    /// Changes the size mode of a container's axes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if `id` is not a container or a fixed
    /// axis leaves a negative content box.
    pub fn set_size_modes(
        &mut self,
        id: ElementId,
        width: SizeMode,
        height: SizeMode,
    ) -> Result<(), Error> {
        let label = self.label(id);
        let element = self.get(id)?;
        let size = Size::new(
            width.resolve(element.size.width()),
            height.resolve(element.size.height()),
        );
        element.box_model.resolve(size, &label)?;

        self.container_mut(id)?.set_size_modes(width, height);
        self.get_mut(id)?.size = size;
        self.invalidate_parent(id);
        Ok(())
    }

    /// Returns true if `ancestor` is `id` itself or lies on its parent chain.
    pub fn is_ancestor_or_self(&self, ancestor: ElementId, id: ElementId) -> bool {
        let mut current = Some(id);
        while let Some(cur) = current {
            if cur == ancestor {
                return true;
            }
            current = self.elements.get(cur.0).and_then(Element::parent);
        }
        false
    }

    /// Appends `child` to `parent`'s children, moving it from its previous
    /// parent if it had one.
    ///
    /// Re-adding a child to its current parent moves it to the end. Stack
    /// containers place the child at their running offset immediately;
    /// bounded containers default an unpositioned child to their content
    /// origin; freeform containers leave it where it is.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownElement`] for a foreign id and
    /// [`Error::Configuration`] if the insertion would create a cycle.
    pub fn add_child(&mut self, parent: ElementId, child: ElementId) -> Result<(), Error> {
        self.get(parent)?;
        self.get(child)?;
        if self.is_ancestor_or_self(child, parent) {
            return Err(Error::configuration(
                self.label(parent),
                format!(
                    "cannot add {} beneath itself or its own descendant",
                    self.label(child)
                ),
            ));
        }

        self.detach(child)?;
        self.elements[parent.0].children.push(child);
        self.elements[child.0].parent = Some(parent);

        layout::place_inserted_child(self, parent, child)?;

        trace!(
            parent = self.label(parent),
            child = self.label(child),
            position:? = self.elements[child.0].position;
            "Added child"
        );
        Ok(())
    }

    /// Removes `child` from `parent`'s children, leaving it parentless.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if `child` is not a child of `parent`.
    pub fn remove_child(&mut self, parent: ElementId, child: ElementId) -> Result<(), Error> {
        if self.get(child)?.parent != Some(parent) {
            return Err(Error::configuration(
                self.label(parent),
                format!("{} is not a child of this element", self.label(child)),
            ));
        }
        self.detach(child).map(|_| ())
    }

    /// Removes `child` from its parent, if any, and returns the former parent.
    pub fn detach(&mut self, child: ElementId) -> Result<Option<ElementId>, Error> {
        let Some(old_parent) = self.get(child)?.parent else {
            return Ok(None);
        };
        self.invalidate_parent(child);
        self.elements[old_parent.0].children.retain(|c| *c != child);
        self.elements[child.0].parent = None;
        Ok(Some(old_parent))
    }

    pub fn children(&self, id: ElementId) -> Result<&[ElementId], Error> {
        Ok(self.get(id)?.children())
    }

    /// Returns the child at `index` in ownership order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Lookup`] when `index` is out of range.
    pub fn child_at(&self, id: ElementId, index: usize) -> Result<ElementId, Error> {
        let children = self.children(id)?;
        children
            .get(index)
            .copied()
            .ok_or_else(|| Error::lookup(format!("child of {}", self.label(id)), index, children.len()))
    }

    pub fn parent(&self, id: ElementId) -> Result<Option<ElementId>, Error> {
        Ok(self.get(id)?.parent())
    }

    /// Returns the subtree rooted at `root` in paint order.
    ///
    /// Parents paint before their children. Siblings are stably sorted by
    /// `z_index`, with elements lacking one taking their sibling index, and
    /// ties broken by sibling index.
    pub fn paint_order(&self, root: ElementId) -> Result<Vec<ElementId>, Error> {
        self.get(root)?;
        let mut order = Vec::with_capacity(self.elements.len());
        let mut stack = vec![root];

        while let Some(id) = stack.pop() {
            order.push(id);
            let mut siblings: Vec<(usize, ElementId)> =
                self.elements[id.0].children.iter().copied().enumerate().collect();
            siblings.sort_by_key(|(index, child)| {
                let z = self.elements[child.0]
                    .z_index
                    .map(i64::from)
                    .unwrap_or(*index as i64);
                (z, *index)
            });
            stack.extend(siblings.into_iter().rev().map(|(_, child)| child));
        }

        Ok(order)
    }

    /// Returns the subtree rooted at `root` with every child before its parent.
    pub(crate) fn post_order(&self, root: ElementId) -> Result<Vec<ElementId>, Error> {
        self.get(root)?;
        let mut order = Vec::new();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            order.push(id);
            stack.extend(self.elements[id.0].children.iter().copied());
        }
        order.reverse();
        Ok(order)
    }

    /// Marks the parent container of `id` as needing a new arrangement.
    pub(crate) fn invalidate_parent(&mut self, id: ElementId) {
        let Some(parent) = self.elements.get(id.0).and_then(Element::parent) else {
            return;
        };
        if let Some(container) = self.elements[parent.0].container_mut() {
            container.set_state(ArrangeState::Unarranged);
        }
    }
}


#[cfg(test)]
mod proptest_tests {
    use proptest::prelude::*;

    use super::*;

    /// A sequence of (parent, child) reparent operations over a fixed pool.
    fn operations_strategy() -> impl Strategy<Value = Vec<(usize, usize)>> {
        prop::collection::vec((0usize..6, 0usize..6), 1..40)
    }

    /// Every element appears in at most one children sequence, exactly once,
    /// and its parent link agrees with the sequence holding it.
    fn check_one_parent_invariant(ops: Vec<(usize, usize)>) -> Result<(), TestCaseError> {
        let mut tree = ElementTree::new();
        let ids: Vec<ElementId> = (0..6).map(|_| tree.create(ElementKind::Group)).collect();

        for (parent, child) in ops {
            // Cycles are rejected; the tree must be unchanged in that case.
            let _ = tree.add_child(ids[parent], ids[child]);

            for &id in &ids {
                let holders: Vec<ElementId> = ids
                    .iter()
                    .copied()
                    .filter(|p| tree.children(*p).unwrap().contains(&id))
                    .collect();
                prop_assert!(holders.len() <= 1);

                if let Some(&holder) = holders.first() {
                    let count = tree
                        .children(holder)
                        .unwrap()
                        .iter()
                        .filter(|c| **c == id)
                        .count();
                    prop_assert_eq!(count, 1);
                }
                prop_assert_eq!(tree.parent(id).unwrap(), holders.first().copied());
            }
        }
        Ok(())
    }

    proptest! {
        #[test]
        fn one_parent_invariant(ops in operations_strategy()) {
            check_one_parent_invariant(ops)?;
        }
    }
}
