//! Shapes shared across the persistence boundary: stored documents and
//! categories, the payloads the editor's output is serialized into, the
//! response envelope, and markdown rendering.

pub mod document;
pub mod envelope;
pub mod error;
pub mod render;
pub mod request;
pub mod store;

pub use crate::document::{Accessibility, Category, Document, DocumentNode, children_of};
pub use crate::envelope::Envelope;
pub use crate::error::StoreError;
pub use crate::render::{CmarkRenderer, MarkdownRenderer};
pub use crate::request::{ArticleDraft, ArticleMeta, ArticleUpdate, DeleteRequest};
pub use crate::store::{DocumentStore, MemoryStore};
