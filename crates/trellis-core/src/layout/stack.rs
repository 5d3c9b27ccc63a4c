//! Proactive stacking along one main axis.

use log::trace;

use crate::{
    element::{ElementId, ElementTree},
    error::Error,
    geometry::{Point, Size},
    layout::Direction,
};

/// Main/cross axis view of sizes and points for one stack direction.
#[derive(Debug, Clone, Copy)]
struct Axes {
    horizontal: bool,
}

impl Axes {
    fn new(direction: Direction) -> Self {
        Self {
            horizontal: direction == Direction::StackHorizontal,
        }
    }

    fn main(self, size: Size) -> f32 {
        if self.horizontal { size.width() } else { size.height() }
    }

    fn cross(self, size: Size) -> f32 {
        if self.horizontal { size.height() } else { size.width() }
    }

    fn main_of(self, point: Point) -> f32 {
        if self.horizontal { point.x() } else { point.y() }
    }

    fn point(self, main: f32, cross: f32) -> Point {
        if self.horizontal {
            Point::new(main, cross)
        } else {
            Point::new(cross, main)
        }
    }

    fn size(self, main: f32, cross: f32) -> Size {
        if self.horizontal {
            Size::new(main, cross)
        } else {
            Size::new(cross, main)
        }
    }
}

/// Places the last child of `parent` right after its previous sibling.
pub(super) fn place_next(
    tree: &mut ElementTree,
    parent: ElementId,
    child: ElementId,
) -> Result<(), Error> {
    let container = tree.get(parent)?;
    let config = *container
        .container()
        .ok_or_else(|| Error::configuration(tree.label(parent), "element is not a container"))?
        .config();
    let axes = Axes::new(config.direction());
    let origin = container.box_model().content_origin();

    let children = container.children();
    let previous = children
        .len()
        .checked_sub(2)
        .and_then(|index| children.get(index).copied());

    let main = match previous {
        Some(previous) => {
            let previous = tree.get(previous)?;
            axes.main_of(previous.position()) + axes.main(previous.size()) + config.spacing()
        }
        None => axes.main_of(origin),
    };
    let cross_origin = if axes.horizontal { origin.y() } else { origin.x() };

    tree.get_mut(child)?.place(axes.point(main, cross_origin));
    Ok(())
}

/// Two-pass arrangement: measure the auto size from the full child set, then
/// place every child with main and cross alignment against the final
/// content box.
pub(super) fn arrange(tree: &mut ElementTree, id: ElementId) -> Result<(), Error> {
    let label = tree.label(id);
    let element = tree.get(id)?;
    let config = *element
        .container()
        .ok_or_else(|| Error::configuration(label.as_str(), "element is not a container"))?
        .config();
    let box_model = *element.box_model();
    let axes = Axes::new(config.direction());

    let children = element
        .children()
        .iter()
        .map(|child| Ok((*child, tree.get(*child)?.size())))
        .collect::<Result<Vec<(ElementId, Size)>, Error>>()?;

    // Measure
    let gaps = children.len().saturating_sub(1) as f32;
    let main_total: f32 =
        children.iter().map(|(_, s)| axes.main(*s)).sum::<f32>() + config.spacing() * gaps;
    let cross_max = children
        .iter()
        .map(|(_, s)| axes.cross(*s))
        .fold(0.0, f32::max);

    let chrome = box_model.min_border_box();
    let measured = axes.size(main_total, cross_max);
    let size = Size::new(
        config.width().resolve(measured.width() + chrome.width()),
        config.height().resolve(measured.height() + chrome.height()),
    );
    let content = box_model.resolve(size, &label)?.content_box();
    let content_size = content.to_size();

    // Arrange
    let mut cursor = config
        .main_axis_alignment()
        .offset(axes.main(content_size), main_total);
    for (child, child_size) in children {
        let cross = config
            .cross_axis_alignment()
            .offset(axes.cross(content_size), axes.cross(child_size));
        let position = content.min_point().add_point(axes.point(cursor, cross));
        tree.get_mut(child)?.place(position);
        trace!(container = label.as_str(), child = tree.label(child), position:?; "Stacked child");
        cursor += axes.main(child_size) + config.spacing();
    }

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
        layout::{Alignment, ArrangeState, ContainerConfig, Direction, SizeMode},
    };

    fn stack(
        tree: &mut ElementTree,
        config: ContainerConfig,
        sizes: &[(f32, f32)],
    ) -> (ElementId, Vec<ElementId>) {
        let root = tree.create_named("stack", ElementKind::Group);
        tree.set_container(root, config).unwrap();
        let children = sizes
            .iter()
            .map(|(w, h)| {
                let child = tree.create(ElementKind::Rectangle);
                tree.set_size(child, Size::new(*w, *h)).unwrap();
                tree.add_child(root, child).unwrap();
                child
            })
            .collect();
        (root, children)
    }

    #[test]
    fn test_vertical_stack_spacing_at_insertion() {
        let mut tree = ElementTree::new();
        let config = ContainerConfig::new(Direction::StackVertical)
            .with_spacing(20.0)
            .unwrap();
        let (root, children) = stack(&mut tree, config, &[(40.0, 50.0), (40.0, 80.0)]);

        // Placed proactively, before any layout pass.
        assert_eq!(tree.get(children[1]).unwrap().position(), Point::new(0.0, 70.0));
        assert_eq!(
            tree.get(root).unwrap().container().unwrap().state(),
            ArrangeState::Arranging
        );

        tree.finalize(root).unwrap();
        assert_eq!(tree.get(children[1]).unwrap().position(), Point::new(0.0, 70.0));
        assert_eq!(tree.get(root).unwrap().size(), Size::new(40.0, 150.0));
    }

    #[test]
    fn test_horizontal_stack_with_padding() {
        let mut tree = ElementTree::new();
        let config = ContainerConfig::new(Direction::StackHorizontal)
            .with_spacing(5.0)
            .unwrap();
        let (root, children) = stack(&mut tree, config, &[]);
        assert!(children.is_empty());
        tree.set_box_model(root, BoxModel::with_padding(Insets::uniform(10.0)).unwrap())
            .unwrap();

        let a = tree.create(ElementKind::Rectangle);
        tree.set_size(a, Size::new(30.0, 10.0)).unwrap();
        tree.add_child(root, a).unwrap();
        let b = tree.create(ElementKind::Rectangle);
        tree.set_size(b, Size::new(20.0, 40.0)).unwrap();
        tree.add_child(root, b).unwrap();

        assert_eq!(tree.get(b).unwrap().position(), Point::new(45.0, 10.0));

        tree.finalize(root).unwrap();
        assert_eq!(tree.get(root).unwrap().size(), Size::new(75.0, 60.0));
    }

    #[test]
    fn test_auto_cross_axis_center_alignment() {
        let mut tree = ElementTree::new();
        let config = ContainerConfig::new(Direction::StackVertical)
            .with_cross_axis_alignment(Alignment::Center);
        let (root, children) = stack(&mut tree, config, &[(100.0, 10.0), (40.0, 10.0)]);

        tree.finalize(root).unwrap();
        // Cross size is measured from the widest child before aligning.
        assert_approx_eq!(f32, tree.get(children[1]).unwrap().position().x(), 30.0);
        assert_approx_eq!(f32, tree.get(children[0]).unwrap().position().x(), 0.0);
    }

    #[test]
    fn test_fixed_main_axis_end_alignment() {
        let mut tree = ElementTree::new();
        let config = ContainerConfig::new(Direction::StackHorizontal)
            .with_spacing(10.0)
            .unwrap()
            .with_width(SizeMode::Fixed(200.0))
            .with_main_axis_alignment(Alignment::End)
            .with_cross_axis_alignment(Alignment::End);
        let (root, children) = stack(&mut tree, config, &[(50.0, 20.0), (40.0, 30.0)]);

        tree.finalize(root).unwrap();
        assert_eq!(tree.get(root).unwrap().size(), Size::new(200.0, 30.0));
        assert_eq!(tree.get(children[0]).unwrap().position(), Point::new(100.0, 10.0));
        assert_eq!(tree.get(children[1]).unwrap().position(), Point::new(160.0, 0.0));
    }

    #[test]
    fn test_removal_closes_gap_on_arrange() {
        let mut tree = ElementTree::new();
        let config = ContainerConfig::new(Direction::StackVertical)
            .with_spacing(10.0)
            .unwrap();
        let (root, children) = stack(&mut tree, config, &[(10.0, 10.0), (10.0, 20.0), (10.0, 30.0)]);
        tree.finalize(root).unwrap();

        tree.remove_child(root, children[1]).unwrap();
        assert_eq!(
            tree.get(root).unwrap().container().unwrap().state(),
            ArrangeState::Unarranged
        );
        tree.finalize(root).unwrap();
        assert_eq!(tree.get(children[2]).unwrap().position(), Point::new(0.0, 20.0));
        assert_eq!(tree.get(root).unwrap().size(), Size::new(10.0, 50.0));
    }

    #[test]
    fn test_fixed_size_too_small_for_padding_is_error() {
        let mut tree = ElementTree::new();
        let root = tree.create(ElementKind::Group);
        tree.set_size(root, Size::new(30.0, 30.0)).unwrap();
        tree.set_box_model(root, BoxModel::with_padding(Insets::uniform(10.0)).unwrap())
            .unwrap();
        let config = ContainerConfig::new(Direction::StackVertical).with_width(SizeMode::Fixed(5.0));
        assert!(tree.set_container(root, config).is_err());
    }
}
