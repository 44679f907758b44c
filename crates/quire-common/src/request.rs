//! Payloads sent to the document store.

use serde::{Deserialize, Serialize};

use crate::render::MarkdownRenderer;

/// Descriptive fields the view collects alongside the editor content.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArticleMeta {
    pub name: String,
    pub path: String,
    pub main_category: String,
    pub sub_category: String,
    pub description: String,
}

/// Create payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleDraft {
    pub name: String,
    pub path: String,
    pub main_category: String,
    pub sub_category: String,
    pub description: String,
    pub content_markdown: String,
    pub content_html: String,
    pub author_id: String,
}

impl ArticleDraft {
    /// Build a draft from editor output, rendering the HTML half of the pair.
    pub fn from_markdown(
        meta: ArticleMeta,
        markdown: impl Into<String>,
        author_id: impl Into<String>,
        renderer: &impl MarkdownRenderer,
    ) -> Self {
        let content_markdown = markdown.into();
        let content_html = renderer.render(&content_markdown);
        Self {
            name: meta.name,
            path: meta.path,
            main_category: meta.main_category,
            sub_category: meta.sub_category,
            description: meta.description,
            content_markdown,
            content_html,
            author_id: author_id.into(),
        }
    }

    /// Turn this draft into an update of an existing document.
    pub fn into_update(self, id: impl Into<String>) -> ArticleUpdate {
        ArticleUpdate {
            id: id.into(),
            name: self.name,
            path: self.path,
            main_category: self.main_category,
            sub_category: self.sub_category,
            description: self.description,
            content_markdown: self.content_markdown,
            content_html: self.content_html,
        }
    }
}

/// Update payload. The author never changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleUpdate {
    pub id: String,
    pub name: String,
    pub path: String,
    pub main_category: String,
    pub sub_category: String,
    pub description: String,
    pub content_markdown: String,
    pub content_html: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteRequest {
    pub id: String,
}
