//! Trellis Core: Geometry and Layout Engine
//!
//! This crate resolves a declaratively built tree of diagram elements into
//! final world-space geometry and draw order. It includes:
//!
//! - **Geometry**: Points, sizes, bounds, insets and affine transforms ([`geometry`] module)
//! - **Box Model**: Margin/border/padding/content boxes ([`box_model`] module)
//! - **Element Tree**: Exclusive parent/child ownership and z-order ([`element`] module)
//! - **Layout**: Stacking, bounded and freeform container strategies ([`layout`] module)
//! - **Transforms**: Rotation, directional translation, transformed corners ([`transform`] module)
//! - **Routing**: Obstacle-avoiding orthogonal connector paths ([`routing`] module)
//! - **Draw**: Colors, styles and layered SVG output ([`color`], [`style`], [`draw`] modules)

pub mod box_model;
pub mod color;
pub mod draw;
pub mod element;
pub mod error;
pub mod geometry;
pub mod layout;
pub mod routing;
pub mod style;
pub mod transform;

pub use error::Error;
