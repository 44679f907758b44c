//! Types exposed to JavaScript via wasm-bindgen.

use serde::{Deserialize, Serialize};
use tsify_next::Tsify;
use wasm_bindgen::prelude::*;

use quire_common::{ArticleDraft, ArticleMeta};
use quire_editor_core::{KeydownResult, Selection, ToolbarState};

/// Result of handling a keydown.
#[wasm_bindgen]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResult {
    /// The editor consumed the key; default was prevented.
    Handled,
    /// Navigation or modifier key, left to the browser.
    PassThrough,
    /// Ordinary typing, left to the browser.
    NotHandled,
}

impl From<KeydownResult> for EventResult {
    fn from(r: KeydownResult) -> Self {
        match r {
            KeydownResult::Handled => EventResult::Handled,
            KeydownResult::PassThrough => EventResult::PassThrough,
            KeydownResult::NotHandled => EventResult::NotHandled,
        }
    }
}

/// Current selection in char offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
#[serde(rename_all = "camelCase")]
pub struct JsSelection {
    pub anchor: usize,
    pub head: usize,
    pub start: usize,
    pub end: usize,
    pub collapsed: bool,
}

impl From<Selection> for JsSelection {
    fn from(sel: Selection) -> Self {
        Self {
            anchor: sel.anchor,
            head: sel.head,
            start: sel.start(),
            end: sel.end(),
            collapsed: sel.is_collapsed(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
#[serde(rename_all = "camelCase")]
pub struct JsToolbarState {
    pub visible: bool,
    pub top: Option<f64>,
    pub left: Option<f64>,
}

impl From<ToolbarState> for JsToolbarState {
    fn from(state: ToolbarState) -> Self {
        Self {
            visible: state.visible,
            top: state.position.map(|p| p.top),
            left: state.position.map(|p| p.left),
        }
    }
}

/// Fields the host form collects next to the editor.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
#[serde(default, rename_all = "camelCase")]
pub struct JsArticleMeta {
    pub name: String,
    pub path: String,
    pub main_category: String,
    pub sub_category: String,
    pub description: String,
}

impl From<JsArticleMeta> for ArticleMeta {
    fn from(meta: JsArticleMeta) -> Self {
        Self {
            name: meta.name,
            path: meta.path,
            main_category: meta.main_category,
            sub_category: meta.sub_category,
            description: meta.description,
        }
    }
}

/// Create payload ready to hand to the document store.
#[derive(Debug, Clone, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
#[serde(rename_all = "camelCase")]
pub struct JsArticleDraft {
    pub name: String,
    pub path: String,
    pub main_category: String,
    pub sub_category: String,
    pub description: String,
    pub content_markdown: String,
    pub content_html: String,
    pub author_id: String,
}

impl From<ArticleDraft> for JsArticleDraft {
    fn from(draft: ArticleDraft) -> Self {
        Self {
            name: draft.name,
            path: draft.path,
            main_category: draft.main_category,
            sub_category: draft.sub_category,
            description: draft.description,
            content_markdown: draft.content_markdown,
            content_html: draft.content_html,
            author_id: draft.author_id,
        }
    }
}
