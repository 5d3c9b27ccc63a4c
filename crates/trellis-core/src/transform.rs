//! Transform engine: rotation, directional translation and world-space
//! geometry resolved through the ownership chain.
//!
//! Each element contributes a local transform
//!
//! ```text
//! local = rotate_about(own center, rotation) then translate(position)
//! ```
//!
//! and its world transform is its local transform followed by its parent's
//! world transform. Nothing is cached; every query walks the chain from the
//! element to the root, so results always reflect the current relative
//! positions and rotations.

use crate::{
    element::{ElementId, ElementTree},
    error::Error,
    geometry::{Affine, Bounds, Point},
};

impl ElementTree {
    /// Sets the rotation of an element about its own center, in degrees.
    ///
    /// The value replaces any previous rotation rather than compounding it.
    pub fn rotate(&mut self, id: ElementId, degrees: f32) -> Result<(), Error> {
        if !degrees.is_finite() {
            return Err(Error::geometry(
                "rotate",
                format!("rotation {degrees} of {} is not finite", self.label(id)),
            ));
        }
        self.get_mut(id)?.set_rotation(degrees);
        self.invalidate_parent(id);
        Ok(())
    }

    /// Moves an element by `magnitude` along `direction`.
    ///
    /// The direction is normalized first, so only its orientation matters.
    /// The resulting position counts as explicitly set.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Geometry`] for a zero-length direction or a
    /// non-finite magnitude.
    ///
    /// # Examples
    ///
    /// ```
    /// use trellis_core::element::{ElementKind, ElementTree};
    /// use trellis_core::geometry::Point;
    ///
    /// let mut tree = ElementTree::new();
    /// let id = tree.create(ElementKind::Rectangle);
    /// tree.translate(id, Point::new(3.0, 4.0), 100.0).unwrap();
    ///
    /// let position = tree.get(id).unwrap().position();
    /// assert!((position.x() - 60.0).abs() < 1e-4);
    /// assert!((position.y() - 80.0).abs() < 1e-4);
    ///
    /// assert!(tree.translate(id, Point::default(), 10.0).is_err());
    /// ```
    pub fn translate(&mut self, id: ElementId, direction: Point, magnitude: f32) -> Result<(), Error> {
        if !magnitude.is_finite() {
            return Err(Error::geometry(
                "translate",
                format!("magnitude {magnitude} for {} is not finite", self.label(id)),
            ));
        }
        let unit = direction.normalize("translate")?;
        let position = self.get(id)?.position().add_point(unit.scale(magnitude));
        self.set_position(id, position)
    }

    /// The element's transform into its parent's coordinate space.
    pub fn local_transform(&self, id: ElementId) -> Result<Affine, Error> {
        let element = self.get(id)?;
        Ok(
            Affine::rotation_about(element.rotation(), element.size().center())
                .then(Affine::translation(element.position())),
        )
    }

    /// The element's transform into world space.
    pub fn world_transform(&self, id: ElementId) -> Result<Affine, Error> {
        let mut transform = self.local_transform(id)?;
        let mut current = self.get(id)?.parent();
        while let Some(ancestor) = current {
            transform = transform.then(self.local_transform(ancestor)?);
            current = self.get(ancestor)?.parent();
        }
        Ok(transform)
    }

    /// World-space position of the element's stored offset: its unrotated
    /// border-box top-left as placed by all of its ancestors.
    pub fn absolute_position(&self, id: ElementId) -> Result<Point, Error> {
        let element = self.get(id)?;
        let position = element.position();
        match element.parent() {
            Some(parent) => Ok(self.world_transform(parent)?.apply(position)),
            None => Ok(position),
        }
    }

    /// The element's outline in world space.
    ///
    /// Polygons yield their vertices, lines their endpoints and every other
    /// kind its four border-box corners clockwise from the top-left, each
    /// mapped through the element's own rotation and then every ancestor.
    pub fn transformed_corners(&self, id: ElementId) -> Result<Vec<Point>, Error> {
        let transform = self.world_transform(id)?;
        let element = self.get(id)?;
        Ok(element
            .kind()
            .outline(element.size())
            .into_iter()
            .map(|p| transform.apply(p))
            .collect())
    }

    /// World-space center of the element's border box.
    pub fn world_center(&self, id: ElementId) -> Result<Point, Error> {
        let center = self.get(id)?.size().center();
        Ok(self.world_transform(id)?.apply(center))
    }

    /// Sum of the rotations along the chain from the root to the element.
    pub fn world_rotation(&self, id: ElementId) -> Result<f32, Error> {
        let mut rotation = 0.0;
        let mut current = Some(id);
        while let Some(cur) = current {
            let element = self.get(cur)?;
            rotation += element.rotation();
            current = element.parent();
        }
        Ok(rotation)
    }

    /// Axis-aligned world bounds of the transformed outline.
    pub fn world_bounds(&self, id: ElementId) -> Result<Bounds, Error> {
        let corners = self.transformed_corners(id)?;
        match Bounds::from_points(corners) {
            Some(bounds) => Ok(bounds),
            None => Ok(Bounds::new_from_top_left(
                self.absolute_position(id)?,
                Default::default(),
            )),
        }
    }

    /// Axis-aligned bounds of the transformed outline in the parent's space.
    pub(crate) fn local_bounds(&self, id: ElementId) -> Result<Bounds, Error> {
        let transform = self.local_transform(id)?;
        let element = self.get(id)?;
        let outline = element.kind().outline(element.size());
        Ok(
            Bounds::from_points(outline.into_iter().map(|p| transform.apply(p)))
                .unwrap_or_else(|| Bounds::new_from_top_left(element.position(), Default::default())),
        )
    }
}
