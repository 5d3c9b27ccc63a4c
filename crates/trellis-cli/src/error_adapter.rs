//! Error adapter for converting TrellisError to miette diagnostics.
//!
//! This module provides the bridge between the library's standard error types
//! and miette's rich diagnostic formatting used in the CLI.

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan, SourceSpan};

use trellis::TrellisError;

/// Adapter for a scene decode failure.
///
/// Points a labelled span at the line and column reported by the decoder so
/// miette can render the offending snippet.
pub struct SceneDiagnostic<'a> {
    message: &'a str,
    line: usize,
    column: usize,
    src: &'a str,
}

impl<'a> SceneDiagnostic<'a> {
    /// Create a new scene diagnostic adapter.
    pub fn new(message: &'a str, line: usize, column: usize, src: &'a str) -> Self {
        Self {
            message,
            line,
            column,
            src,
        }
    }

    /// Byte span of the character the decoder stopped at.
    fn span(&self) -> SourceSpan {
        let offset = byte_offset(self.src, self.line, self.column);
        let len = usize::from(offset < self.src.len());
        SourceSpan::new(offset.into(), len)
    }
}

impl fmt::Debug for SceneDiagnostic<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SceneDiagnostic")
            .field("message", &self.message)
            .field("line", &self.line)
            .field("column", &self.column)
            .finish()
    }
}

impl fmt::Display for SceneDiagnostic<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for SceneDiagnostic<'_> {}

impl MietteDiagnostic for SceneDiagnostic<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new("trellis::scene"))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new("scene files are JSON documents with a `root` node"))
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        Some(&self.src as &dyn miette::SourceCode)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let label = LabeledSpan::new_primary_with_span(Some("here".to_string()), self.span());
        Some(Box::new(std::iter::once(label)))
    }
}

/// Adapter for non-diagnostic [`TrellisError`] variants.
///
/// This adapter handles errors that don't carry source locations, such as
/// I/O errors, build errors, layout errors, and export errors.
pub struct ErrorAdapter<'a>(pub &'a TrellisError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match &self.0 {
            TrellisError::Io(_) => "trellis::io",
            TrellisError::Scene { .. } => "trellis::scene",
            TrellisError::Build(_) => "trellis::build",
            TrellisError::Config(_) => "trellis::config",
            TrellisError::Layout(_) => "trellis::layout",
            TrellisError::Export(_) => "trellis::export",
        };
        Some(Box::new(code))
    }
}

/// A reportable error that can be rendered by miette.
#[derive(Debug)]
pub enum Reportable<'a> {
    /// A scene diagnostic with source location information.
    Diagnostic(SceneDiagnostic<'a>),
    /// A simple error without source location.
    Error(ErrorAdapter<'a>),
}

impl fmt::Display for Reportable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reportable::Diagnostic(d) => fmt::Display::fmt(d, f),
            Reportable::Error(e) => fmt::Display::fmt(e, f),
        }
    }
}

impl std::error::Error for Reportable<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Reportable::Diagnostic(_) => None,
            Reportable::Error(e) => e.source(),
        }
    }
}

impl MietteDiagnostic for Reportable<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Diagnostic(d) => d.code(),
            Reportable::Error(e) => e.code(),
        }
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Diagnostic(d) => d.help(),
            Reportable::Error(e) => e.help(),
        }
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        match self {
            Reportable::Diagnostic(d) => d.source_code(),
            Reportable::Error(e) => e.source_code(),
        }
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        match self {
            Reportable::Diagnostic(d) => d.labels(),
            Reportable::Error(e) => e.labels(),
        }
    }
}

/// Convert a [`TrellisError`] into a list of reportable errors.
///
/// [`TrellisError::Scene`] becomes a [`Reportable::Diagnostic`] pointing into
/// the source; every other variant becomes a single [`Reportable::Error`].
pub fn to_reportables(err: &TrellisError) -> Vec<Reportable<'_>> {
    match err {
        TrellisError::Scene {
            message,
            line,
            column,
            src,
        } => vec![Reportable::Diagnostic(SceneDiagnostic::new(
            message, *line, *column, src,
        ))],
        _ => vec![Reportable::Error(ErrorAdapter(err))],
    }
}

/// Byte offset of a 1-based `line`/`column` position, clamped to `src`.
fn byte_offset(src: &str, line: usize, column: usize) -> usize {
    let line_start: usize = src
        .split_inclusive('\n')
        .take(line.saturating_sub(1))
        .map(str::len)
        .sum();
    (line_start + column.saturating_sub(1)).min(src.len())
}

#[cfg(test)]
mod tests {
    use trellis::DiagramBuilder;

    use super::*;

    #[test]
    fn test_byte_offset() {
        let src = "{\n  \"root\": x\n}";
        assert_eq!(byte_offset(src, 1, 1), 0);
        assert_eq!(byte_offset(src, 2, 11), 12);
        assert_eq!(&src[12..13], "x");
        assert_eq!(byte_offset(src, 9, 9), src.len());
        assert_eq!(byte_offset(src, 0, 0), 0);
    }

    #[test]
    fn test_scene_error_becomes_diagnostic() {
        let src = "{\n  \"root\": x\n}";
        let err = DiagramBuilder::default().parse(src).unwrap_err();

        let reportables = to_reportables(&err);
        assert_eq!(reportables.len(), 1);

        match &reportables[0] {
            Reportable::Diagnostic(d) => {
                assert_eq!(d.to_string(), err.to_string());
                let labels: Vec<_> = d.labels().unwrap().collect();
                assert_eq!(labels.len(), 1);
                assert!(labels[0].primary());
                assert_eq!(labels[0].offset(), 12);
            }
            Reportable::Error(_) => panic!("Expected Diagnostic"),
        }
    }

    #[test]
    fn test_non_scene_error() {
        let err = TrellisError::Build("connector 0 references unknown element id `x`".to_string());

        let reportables = to_reportables(&err);

        assert_eq!(reportables.len(), 1);
        match &reportables[0] {
            Reportable::Error(e) => {
                assert_eq!(
                    e.to_string(),
                    "Build error: connector 0 references unknown element id `x`"
                );
                assert_eq!(e.code().unwrap().to_string(), "trellis::build");
                assert!(e.labels().is_none());
            }
            Reportable::Diagnostic(_) => panic!("Expected Error"),
        }
    }

    #[test]
    fn test_error_codes() {
        let io = TrellisError::Io(std::io::Error::other("disk"));
        assert_eq!(ErrorAdapter(&io).code().unwrap().to_string(), "trellis::io");

        let config = TrellisError::Config("bad color".to_string());
        assert_eq!(
            ErrorAdapter(&config).code().unwrap().to_string(),
            "trellis::config"
        );
    }
}
