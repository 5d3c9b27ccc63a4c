//! Export functionality for Trellis diagrams.
//!
//! Export is the last stage of the pipeline:
//!
//! ```text
//! Scene (JSON)
//!     ↓ decode
//! Scene description
//!     ↓ build + layout
//! Diagram (element tree)
//!     ↓ route
//! Routed connectors
//!     ↓ export (this module)
//! SVG document
//! ```
//!
//! # Error Handling
//!
//! Export operations return [`Error`], which converts into
//! [`TrellisError::Export`] at the crate boundary.
//!
//! [`TrellisError::Export`]: crate::TrellisError::Export

/// SVG export backend.
pub mod svg;

/// Errors that can occur during diagram export.
#[derive(Debug)]
pub enum Error {
    /// A rendering failure described by `message`.
    Render(String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Render(msg) => write!(f, "Render error: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<trellis_core::Error> for Error {
    fn from(err: trellis_core::Error) -> Self {
        Self::Render(err.to_string())
    }
}

impl From<Error> for crate::TrellisError {
    fn from(error: Error) -> Self {
        Self::Export(Box::new(error))
    }
}
