//! WASM browser tests for quire-editor-js.
//!
//! Run with: `wasm-pack test --headless --firefox` or `--chrome`

use std::cell::Cell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

use quire_editor_js::{EventResult, JsArticleMeta, JsEditor};
use web_sys::HtmlElement;

fn element(text: &str) -> HtmlElement {
    let document = web_sys::window().unwrap().document().unwrap();
    let el: HtmlElement = document.create_element("div").unwrap().dyn_into().unwrap();
    el.set_text_content(Some(text));
    document.body().unwrap().append_child(&el).unwrap();
    el
}

#[wasm_bindgen_test]
fn test_config_fields_default() {
    let config = js_sys::JSON::parse(r#"{"tabWidth": 2}"#).unwrap();
    let editor = JsEditor::new(element("x"), element(""), config);
    assert!(editor.is_ok());
}

#[wasm_bindgen_test]
fn test_malformed_snippet_config_rejected() {
    let config =
        js_sys::JSON::parse(r#"{"snippets": [{"trigger": "!x", "body": "no placeholder"}]}"#)
            .unwrap();
    assert!(JsEditor::new(element("x"), element(""), config).is_err());
}

#[wasm_bindgen_test]
fn test_preview_callback_fires_on_change_only() {
    let mut editor = JsEditor::new(element("# Title"), element(""), JsValue::UNDEFINED).unwrap();
    let calls = Rc::new(Cell::new(0));
    let counter = calls.clone();
    let callback = Closure::<dyn FnMut(bool)>::new(move |_visible: bool| {
        counter.set(counter.get() + 1);
    });
    editor.on_preview_change(Some(callback.as_ref().unchecked_ref::<js_sys::Function>().clone()));

    editor.set_show_preview(true);
    editor.set_show_preview(true);
    assert!(editor.show_preview());
    assert!(!editor.toggle_preview());
    assert_eq!(calls.get(), 2);
    assert_eq!(editor.render_preview().trim_end(), "<h1>Title</h1>");
}

#[wasm_bindgen_test]
fn test_draft_carries_markdown_and_html() {
    let editor = JsEditor::new(element("Some ~~old~~ text"), element(""), JsValue::NULL).unwrap();
    let meta = JsArticleMeta {
        name: "Notes".into(),
        ..Default::default()
    };
    let draft = editor.to_draft(meta, "author-1");
    assert_eq!(draft.content_markdown, "Some ~~old~~ text");
    assert_eq!(draft.content_html.trim_end(), "<p>Some <del>old</del> text</p>");
    assert_eq!(draft.author_id, "author-1");
}

#[wasm_bindgen_test]
fn test_unbound_key_is_not_handled() {
    let area = element("abc");
    let editor = JsEditor::new(area, element(""), JsValue::UNDEFINED).unwrap();
    let init = web_sys::KeyboardEventInit::new();
    init.set_key("q");
    let event = web_sys::KeyboardEvent::new_with_keyboard_event_init_dict("keydown", &init).unwrap();
    assert_eq!(editor.handle_keydown(&event), EventResult::NotHandled);
}
