//! Error types for the persistence boundary.

use miette::Diagnostic;

/// Failure reported by a document store.
///
/// `Rejected` carries the store's own message, which is shown to the user
/// verbatim.
#[derive(thiserror::Error, Debug, Diagnostic)]
pub enum StoreError {
    #[error("{0}")]
    #[diagnostic(code(quire::store::rejected))]
    Rejected(String),

    #[error("document not found: {0}")]
    #[diagnostic(code(quire::store::not_found))]
    NotFound(String),

    #[error("invalid payload: {0}")]
    #[diagnostic(code(quire::store::serde))]
    Serde(#[from] serde_json::Error),
}

impl StoreError {
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected(message.into())
    }
}
