//! Keydown translation and handling.

use quire_editor_core::{Editor, EditableSurface, Key, KeyCombo, KeydownResult, Modifiers, Toolbar};

/// Build a [`KeyCombo`] from a DOM keyboard event.
pub fn combo_from_event(event: &web_sys::KeyboardEvent) -> KeyCombo {
    KeyCombo::with_modifiers(
        Key::from_dom(&event.key()),
        Modifiers::new(
            event.ctrl_key(),
            event.alt_key(),
            event.shift_key(),
            event.meta_key(),
        ),
    )
}

/// Run a keydown through the editor and suppress the browser default when
/// the editor consumed it.
///
/// Keys pressed mid-composition belong to the IME and pass straight through.
pub fn handle_keydown_event<S, T>(
    editor: &mut Editor<S, T>,
    event: &web_sys::KeyboardEvent,
) -> KeydownResult
where
    S: EditableSurface,
    T: Toolbar,
{
    if event.is_composing() {
        return KeydownResult::PassThrough;
    }
    let combo = combo_from_event(event);
    let result = editor.handle_keydown(&combo);
    if result == KeydownResult::Handled {
        event.prevent_default();
    }
    tracing::trace!(target: "quire::keys", key = %event.key(), ?result, "keydown");
    result
}
