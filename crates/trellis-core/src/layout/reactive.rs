//! Reactive sizing for bounded and freeform containers.

use log::{debug, trace};

use crate::{
    element::{ElementId, ElementTree},
    error::Error,
    geometry::{Bounds, Point, Size},
};

/// Moves an unpositioned child of a bounded container to its content origin.
pub(super) fn place_default(
    tree: &mut ElementTree,
    parent: ElementId,
    child: ElementId,
) -> Result<(), Error> {
    if tree.get(child)?.is_explicitly_positioned() {
        return Ok(());
    }
    let origin = tree.get(parent)?.box_model().content_origin();
    tree.get_mut(child)?.place(origin);
    Ok(())
}

/// Sizes the container to the union of its children and normalizes bounds.
///
/// The union is taken over each child's rotated outline in the container's
/// coordinate space. If it extends into negative coordinates on an axis,
/// every child is shifted by the negated minimum on that axis so the
/// occupied space starts at zero. Auto axes then span from zero to the
/// furthest child edge plus the trailing border and padding.
pub(super) fn arrange(tree: &mut ElementTree, id: ElementId) -> Result<(), Error> {
    let label = tree.label(id);
    let element = tree.get(id)?;
    let config = *element
        .container()
        .ok_or_else(|| Error::configuration(label.as_str(), "element is not a container"))?
        .config();
    let box_model = *element.box_model();
    let children = element.children().to_vec();

    let mut union: Option<Bounds> = None;
    for child in &children {
        let bounds = tree.local_bounds(*child)?;
        union = Some(match union {
            Some(acc) => acc.merge(&bounds),
            None => bounds,
        });
    }

    let chrome = box_model.min_border_box();
    let measured = match union {
        Some(union) => {
            let shift = Point::new((-union.min_x()).max(0.0), (-union.min_y()).max(0.0));
            if !shift.is_zero() {
                debug!(container = label.as_str(), shift:?; "Normalizing container bounds");
                for child in &children {
                    let element = tree.get_mut(*child)?;
                    let position = element.position().add_point(shift);
                    element.place(position);
                    trace!(container = label.as_str(), child:?, position:?; "Shifted child");
                }
            }
            let insets = box_model.content_insets();
            let union = union.translate(shift);
            Size::new(
                (union.max_x() + insets.right()).max(chrome.width()),
                (union.max_y() + insets.bottom()).max(chrome.height()),
            )
        }
        None => chrome,
    };

    let size = Size::new(
        config.width().resolve(measured.width()),
        config.height().resolve(measured.height()),
    );
    box_model.resolve(size, &label)?;
    tree.get_mut(id)?.set_layout_size(size);
    Ok(())
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use crate::{
        box_model::BoxModel,
        element::{ElementId, ElementKind, ElementTree},
        geometry::{Insets, Point, Size},
        layout::{ArrangeState, ContainerConfig, Direction, SizeMode},
    };

    fn container(tree: &mut ElementTree, direction: Direction) -> ElementId {
        let root = tree.create_named("canvas", ElementKind::Group);
        tree.set_container(root, ContainerConfig::new(direction))
            .unwrap();
        root
    }

    fn rect(tree: &mut ElementTree, parent: ElementId, position: Option<Point>, size: Size) -> ElementId {
        let id = tree.create(ElementKind::Rectangle);
        tree.set_size(id, size).unwrap();
        if let Some(position) = position {
            tree.set_position(id, position).unwrap();
        }
        tree.add_child(parent, id).unwrap();
        id
    }

    #[test]
    fn test_bounded_defaults_to_content_origin() {
        let mut tree = ElementTree::new();
        let root = container(&mut tree, Direction::Bounded);
        tree.set_box_model(root, BoxModel::with_padding(Insets::uniform(8.0)).unwrap())
            .unwrap();

        let placed = rect(&mut tree, root, None, Size::new(10.0, 10.0));
        let explicit = rect(&mut tree, root, Some(Point::new(50.0, 0.0)), Size::new(10.0, 20.0));
        assert_eq!(tree.get(placed).unwrap().position(), Point::new(8.0, 8.0));

        tree.finalize(root).unwrap();
        assert_eq!(tree.get(explicit).unwrap().position(), Point::new(50.0, 0.0));
        assert_eq!(tree.get(root).unwrap().size(), Size::new(68.0, 28.0));
    }

    #[test]
    fn test_freeform_keeps_degenerate_box_until_finalize() {
        let mut tree = ElementTree::new();
        let root = container(&mut tree, Direction::Freeform);
        rect(&mut tree, root, Some(Point::new(30.0, 40.0)), Size::new(10.0, 10.0));

        assert_eq!(tree.get(root).unwrap().size(), Size::default());
        assert_eq!(
            tree.get(root).unwrap().container().unwrap().state(),
            ArrangeState::Unarranged
        );

        tree.finalize(root).unwrap();
        assert_eq!(tree.get(root).unwrap().size(), Size::new(40.0, 50.0));
    }

    #[test]
    fn test_normalization_shifts_negative_children() {
        let mut tree = ElementTree::new();
        let root = container(&mut tree, Direction::Freeform);
        let a = rect(&mut tree, root, Some(Point::new(-20.0, 5.0)), Size::new(10.0, 10.0));
        let b = rect(&mut tree, root, Some(Point::new(10.0, -15.0)), Size::new(10.0, 10.0));

        tree.finalize(root).unwrap();
        assert_eq!(tree.get(a).unwrap().position(), Point::new(0.0, 20.0));
        assert_eq!(tree.get(b).unwrap().position(), Point::new(30.0, 0.0));
        assert_eq!(tree.get(root).unwrap().size(), Size::new(40.0, 30.0));
    }

    #[test]
    fn test_rotated_child_counts_with_its_rotated_extent() {
        let mut tree = ElementTree::new();
        let root = container(&mut tree, Direction::Freeform);
        let bar = rect(&mut tree, root, Some(Point::new(0.0, 0.0)), Size::new(40.0, 10.0));
        tree.rotate(bar, 90.0).unwrap();

        // Rotated about its center (20, 5) the bar spans x 15..25 and y -15..25.
        tree.finalize(root).unwrap();
        let size = tree.get(root).unwrap().size();
        assert_approx_eq!(f32, size.width(), 25.0, epsilon = 1e-4);
        assert_approx_eq!(f32, size.height(), 40.0, epsilon = 1e-4);
        assert_approx_eq!(f32, tree.get(bar).unwrap().position().y(), 15.0, epsilon = 1e-4);
    }

    #[test]
    fn test_fixed_axis_is_kept() {
        let mut tree = ElementTree::new();
        let root = tree.create(ElementKind::Group);
        let config = ContainerConfig::new(Direction::Bounded).with_width(SizeMode::Fixed(300.0));
        tree.set_container(root, config).unwrap();
        rect(&mut tree, root, Some(Point::new(0.0, 0.0)), Size::new(500.0, 60.0));

        tree.finalize(root).unwrap();
        assert_eq!(tree.get(root).unwrap().size(), Size::new(300.0, 60.0));
    }

    #[test]
    fn test_empty_container_sizes_to_insets() {
        let mut tree = ElementTree::new();
        let root = container(&mut tree, Direction::Bounded);
        tree.set_box_model(root, BoxModel::with_padding(Insets::new(1.0, 2.0, 3.0, 4.0)).unwrap())
            .unwrap();
        tree.finalize(root).unwrap();
        assert_eq!(tree.get(root).unwrap().size(), Size::new(6.0, 4.0));
    }

    #[test]
    fn test_layout_measures_nested_before_parent() {
        let mut tree = ElementTree::new();
        let outer = container(&mut tree, Direction::StackVertical);
        let inner = tree.create(ElementKind::Group);
        tree.set_container(inner, ContainerConfig::new(Direction::Freeform))
            .unwrap();
        rect(&mut tree, inner, Some(Point::new(0.0, 0.0)), Size::new(30.0, 30.0));
        tree.add_child(outer, inner).unwrap();
        let below = rect(&mut tree, outer, None, Size::new(10.0, 10.0));

        tree.layout(outer).unwrap();
        assert_eq!(tree.get(below).unwrap().position(), Point::new(0.0, 30.0));
        assert_eq!(tree.get(outer).unwrap().size(), Size::new(30.0, 40.0));
    }
}
