//! Document store interface and an in-memory implementation.

use std::collections::BTreeMap;

use crate::document::{Accessibility, Document};
use crate::error::StoreError;
use crate::request::{ArticleDraft, ArticleUpdate};

/// Create/read/update/delete of documents.
pub trait DocumentStore {
    /// All documents, or those in `category`.
    fn list(&self, category: Option<&str>) -> Result<Vec<Document>, StoreError>;

    fn get(&self, id: &str) -> Result<Document, StoreError>;

    fn create(&mut self, draft: ArticleDraft) -> Result<Document, StoreError>;

    fn update(&mut self, update: ArticleUpdate) -> Result<(), StoreError>;

    fn delete(&mut self, id: &str) -> Result<(), StoreError>;
}

/// Store that keeps everything in a map. Useful offline and in tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    documents: BTreeMap<String, Document>,
    next_id: u64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

fn now() -> String {
    chrono::Utc::now().to_rfc3339()
}

fn non_empty(s: String) -> Option<String> {
    if s.is_empty() { None } else { Some(s) }
}

impl DocumentStore for MemoryStore {
    fn list(&self, category: Option<&str>) -> Result<Vec<Document>, StoreError> {
        Ok(self
            .documents
            .values()
            .filter(|d| category.is_none() || d.category.as_deref() == category)
            .cloned()
            .collect())
    }

    fn get(&self, id: &str) -> Result<Document, StoreError> {
        self.documents
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    fn create(&mut self, draft: ArticleDraft) -> Result<Document, StoreError> {
        if draft.name.trim().is_empty() {
            return Err(StoreError::rejected("name is required"));
        }
        if self
            .documents
            .values()
            .any(|d| !draft.path.is_empty() && d.path.as_deref() == Some(draft.path.as_str()))
        {
            return Err(StoreError::rejected(format!("path already in use: {}", draft.path)));
        }
        self.next_id += 1;
        let id = format!("doc-{}", self.next_id);
        let stamp = now();
        let document = Document {
            id: id.clone(),
            name: draft.name,
            path: non_empty(draft.path),
            description: non_empty(draft.description),
            tags: None,
            category: non_empty(draft.main_category),
            parent_id: non_empty(draft.sub_category),
            accessibility: Accessibility::Private,
            content_markdown: Some(draft.content_markdown),
            content_html: Some(draft.content_html),
            author_id: draft.author_id,
            created_timestamp: stamp.clone(),
            updated_timestamp: stamp,
            partial: None,
        };
        tracing::debug!(target: "quire::store", %id, "created document");
        self.documents.insert(id, document.clone());
        Ok(document)
    }

    fn update(&mut self, update: ArticleUpdate) -> Result<(), StoreError> {
        let doc = self
            .documents
            .get_mut(&update.id)
            .ok_or_else(|| StoreError::NotFound(update.id.clone()))?;
        doc.name = update.name;
        doc.path = non_empty(update.path);
        doc.description = non_empty(update.description);
        doc.category = non_empty(update.main_category);
        doc.parent_id = non_empty(update.sub_category);
        doc.content_markdown = Some(update.content_markdown);
        doc.content_html = Some(update.content_html);
        doc.updated_timestamp = now();
        Ok(())
    }

    fn delete(&mut self, id: &str) -> Result<(), StoreError> {
        self.documents
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }
}
