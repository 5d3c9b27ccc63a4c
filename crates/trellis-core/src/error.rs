//! Error types for the layout engine.
//!
//! Configuration and geometry errors fail fast at the call that would
//! introduce the invalid state. Routing exhaustion is not an error: the
//! router degrades to a direct segment instead (see [`crate::routing`]).

use thiserror::Error;

use crate::element::ElementId;

/// The engine error type.
///
/// Every variant carries enough context to name the offending element or
/// operation together with the invalid value.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// An invalid box model, container setting or style value.
    #[error("configuration error on {element}: {reason}")]
    Configuration { element: String, reason: String },

    /// A degenerate geometric input, such as a zero-length direction vector.
    #[error("geometry error in `{operation}`: {reason}")]
    Geometry {
        operation: &'static str,
        reason: String,
    },

    /// An out-of-range index access.
    #[error("lookup error: {what} index {index} is out of range (length {len})")]
    Lookup {
        what: String,
        index: usize,
        len: usize,
    },

    /// An element handle that does not belong to the tree.
    #[error("unknown element {0}")]
    UnknownElement(ElementId),
}

impl Error {
    /// Creates a [`Error::Configuration`] for the given element label.
    pub fn configuration(element: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Configuration {
            element: element.into(),
            reason: reason.into(),
        }
    }

    /// Creates a [`Error::Geometry`] for the given operation.
    pub fn geometry(operation: &'static str, reason: impl Into<String>) -> Self {
        Self::Geometry {
            operation,
            reason: reason.into(),
        }
    }

    /// Creates a [`Error::Lookup`].
    pub fn lookup(what: impl Into<String>, index: usize, len: usize) -> Self {
        Self::Lookup {
            what: what.into(),
            index,
            len,
        }
    }
}
