//! JsEditor - the editor session wrapper for JavaScript.

use wasm_bindgen::prelude::*;
use web_sys::HtmlElement;

use quire_common::{ArticleDraft, CmarkRenderer, MarkdownRenderer};
use quire_editor_browser::BrowserEditor;
use quire_editor_core::{EditorConfig, EditorEvent, SubscriptionId};

use crate::types::{EventResult, JsArticleDraft, JsArticleMeta, JsSelection, JsToolbarState};

/// An editing session exposed to JavaScript.
///
/// Created over an existing contenteditable element and the toolbar element
/// that floats above selections. Call `attach()` to start listening.
#[wasm_bindgen]
pub struct JsEditor {
    inner: BrowserEditor,
    renderer: CmarkRenderer,
    on_save: Option<SubscriptionId>,
    on_preview_change: Option<SubscriptionId>,
}

#[wasm_bindgen]
impl JsEditor {
    /// Create an editor. `config` is an optional `EditorConfig` object;
    /// missing fields take their defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(area: HtmlElement, toolbar: HtmlElement, config: JsValue) -> Result<JsEditor, JsError> {
        let config: EditorConfig = if config.is_undefined() || config.is_null() {
            EditorConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)
                .map_err(|e| JsError::new(&format!("Invalid config: {}", e)))?
        };
        let inner = BrowserEditor::new(area, toolbar, config)
            .map_err(|e| JsError::new(&e.to_string()))?;
        Ok(Self {
            inner,
            renderer: CmarkRenderer::default(),
            on_save: None,
            on_preview_change: None,
        })
    }

    /// Start listening to keydown and selection events.
    pub fn attach(&mut self) {
        self.inner.attach();
    }

    /// Stop listening. Pending toolbar updates are cancelled.
    pub fn detach(&mut self) {
        self.inner.detach();
    }

    // === Formatting ===

    /// Apply a formatting action by name (`"bold"`, `"orderedList"`, ...).
    /// Unknown names are ignored.
    pub fn format(&self, action: &str) {
        self.inner.format_named(action);
    }

    // === Events ===

    /// Handle a keydown the host intercepted itself. Default is already
    /// prevented when the result is `Handled`.
    #[wasm_bindgen(js_name = handleKeydown)]
    pub fn handle_keydown(&self, event: &web_sys::KeyboardEvent) -> EventResult {
        self.inner.handle_keydown(event).into()
    }

    /// Schedule a toolbar update for the current selection.
    #[wasm_bindgen(js_name = updateContextMenu)]
    pub fn update_context_menu(&self) {
        self.inner.update_context_menu();
    }

    #[wasm_bindgen(js_name = toolbarState)]
    pub fn toolbar_state(&self) -> JsToolbarState {
        self.inner.toolbar_state().into()
    }

    /// Called with no arguments on Ctrl+S. Pass `undefined` to clear.
    #[wasm_bindgen(js_name = onSave)]
    pub fn on_save(&mut self, callback: Option<js_sys::Function>) {
        if let Some(id) = self.on_save.take() {
            self.inner.unsubscribe(id);
        }
        let Some(callback) = callback else {
            return;
        };
        self.on_save = Some(self.inner.subscribe(move |event| {
            if let EditorEvent::Save = event {
                if let Err(e) = callback.call0(&JsValue::NULL) {
                    tracing::error!(target: "quire::events", error = ?e, "save callback threw");
                }
            }
        }));
    }

    /// Called with the new visibility whenever the preview flag changes.
    #[wasm_bindgen(js_name = onPreviewChange)]
    pub fn on_preview_change(&mut self, callback: Option<js_sys::Function>) {
        if let Some(id) = self.on_preview_change.take() {
            self.inner.unsubscribe(id);
        }
        let Some(callback) = callback else {
            return;
        };
        self.on_preview_change = Some(self.inner.subscribe(move |event| {
            if let EditorEvent::PreviewChanged { visible } = event {
                if let Err(e) = callback.call1(&JsValue::NULL, &JsValue::from_bool(*visible)) {
                    tracing::error!(target: "quire::events", error = ?e, "preview callback threw");
                }
            }
        }));
    }

    // === Preview ===

    #[wasm_bindgen(getter = showPreview)]
    pub fn show_preview(&self) -> bool {
        self.inner.preview()
    }

    #[wasm_bindgen(setter = showPreview)]
    pub fn set_show_preview(&self, visible: bool) {
        self.inner.set_preview(visible);
    }

    #[wasm_bindgen(js_name = togglePreview)]
    pub fn toggle_preview(&self) -> bool {
        self.inner.toggle_preview()
    }

    /// HTML for the preview pane.
    #[wasm_bindgen(js_name = renderPreview)]
    pub fn render_preview(&self) -> String {
        self.renderer.render(&self.inner.markdown())
    }

    // === Content ===

    #[wasm_bindgen(js_name = getMarkdown)]
    pub fn get_markdown(&self) -> String {
        self.inner.markdown()
    }

    #[wasm_bindgen(js_name = getSelection)]
    pub fn get_selection(&self) -> Option<JsSelection> {
        self.inner.selection().map(Into::into)
    }

    /// Package the current content as a create payload.
    #[wasm_bindgen(js_name = toDraft)]
    pub fn to_draft(&self, meta: JsArticleMeta, author_id: &str) -> JsArticleDraft {
        ArticleDraft::from_markdown(meta.into(), self.inner.markdown(), author_id, &self.renderer)
            .into()
    }
}
