use miette::Diagnostic;
use smol_str::SmolStr;
use thiserror::Error;

/// Failure reported by a surface implementation (DOM call rejected, offset
/// that cannot be mapped onto a node, and so on).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct SurfaceError(pub String);

impl From<&str> for SurfaceError {
    fn from(s: &str) -> Self {
        SurfaceError(s.to_string())
    }
}

impl From<String> for SurfaceError {
    fn from(s: String) -> Self {
        SurfaceError(s)
    }
}

/// Errors raised by the editing engines.
///
/// None of these is fatal. The editor facade logs them and carries on as if
/// nothing happened; they exist so the engines can bail out before touching
/// the document.
#[derive(Debug, Error, Diagnostic)]
pub enum EditError {
    #[error("no active selection")]
    #[diagnostic(code(quire::editor::no_selection))]
    NoSelection,

    #[error("selection lies outside the editable surface")]
    #[diagnostic(code(quire::editor::outside_surface))]
    OutsideSurface,

    #[error("snippet `{trigger}` is malformed: {reason}")]
    #[diagnostic(
        code(quire::editor::malformed_snippet),
        help("snippet bodies need at least one `$` placeholder and a non-empty trigger")
    )]
    MalformedSnippet { trigger: SmolStr, reason: String },

    #[error("surface operation failed: {0}")]
    #[diagnostic(code(quire::editor::surface))]
    Surface(#[from] SurfaceError),
}

impl EditError {
    /// True for the routine "nothing to act on" conditions.
    pub fn is_benign(&self) -> bool {
        matches!(self, Self::NoSelection | Self::OutsideSurface)
    }
}
