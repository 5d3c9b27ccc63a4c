//! Z-ordered SVG output.
//!
//! Renderers push SVG nodes into a [`LayeredOutput`] tagged with a
//! [`RenderLayer`]; the output then emits one `<g data-layer="...">` group
//! per non-empty layer, bottom to top. Within a layer, nodes keep the order
//! they were added in, so element content pushed in paint order stays in
//! paint order.

mod layer;

pub use layer::{LayeredOutput, RenderLayer, SvgNode};
