//! The editor facade.
//!
//! `Editor` owns the surface (through its [`RangeAdapter`]) and the toolbar
//! for one editing session. Everything the view layer can do goes through
//! here, so no engine ever touches the surface on its own.

use crate::config::EditorConfig;
use crate::error::EditError;
use crate::events::{EditorEvent, EditorInput, EventBus, SubscriptionId};
use crate::formatting::{FormatAction, apply_format};
use crate::keymap::{Command, KeyCombo, KeybindingConfig, KeydownResult};
use crate::range::RangeAdapter;
use crate::snippet::SnippetEngine;
use crate::surface::EditableSurface;
use crate::toolbar::{Toolbar, ToolbarPositioner, ToolbarState, ToolbarTicket};
use crate::types::Selection;

/// What [`Editor::dispatch`] did with an input.
#[derive(Debug, Clone, PartialEq)]
pub enum Dispatched {
    Key(KeydownResult),
    /// A toolbar update was scheduled; run it with [`Editor::run_toolbar_update`].
    Toolbar(ToolbarTicket),
    Formatted,
}

pub struct Editor<S, T> {
    range: RangeAdapter<S>,
    toolbar: T,
    toolbar_state: ToolbarState,
    positioner: ToolbarPositioner,
    keybindings: KeybindingConfig,
    snippets: SnippetEngine,
    events: EventBus,
    preview: bool,
    config: EditorConfig,
}

impl<S: EditableSurface, T: Toolbar> Editor<S, T> {
    pub fn new(surface: S, toolbar: T, config: EditorConfig) -> Self {
        Self {
            range: RangeAdapter::new(surface),
            toolbar,
            toolbar_state: ToolbarState::hidden(),
            positioner: ToolbarPositioner::new(config.toolbar.gutter_px),
            keybindings: config.keybindings(),
            snippets: config.snippet_engine(),
            events: EventBus::new(),
            preview: false,
            config,
        }
    }

    pub fn with_defaults(surface: S, toolbar: T) -> Self {
        Self::new(surface, toolbar, EditorConfig::default())
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn keybindings_mut(&mut self) -> &mut KeybindingConfig {
        &mut self.keybindings
    }

    pub fn surface(&self) -> &S {
        self.range.surface()
    }

    pub fn surface_mut(&mut self) -> &mut S {
        self.range.surface_mut()
    }

    pub fn toolbar(&self) -> &T {
        &self.toolbar
    }

    pub fn toolbar_state(&self) -> ToolbarState {
        self.toolbar_state
    }

    pub fn selection(&self) -> Option<Selection> {
        self.range.get_selection()
    }

    /// Markdown source of the document.
    pub fn markdown(&self) -> String {
        self.range.text()
    }

    pub fn into_parts(self) -> (S, T) {
        (self.range.into_inner(), self.toolbar)
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&EditorEvent) + 'static) -> SubscriptionId {
        self.events.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.events.unsubscribe(id)
    }

    pub fn preview(&self) -> bool {
        self.preview
    }

    pub fn set_preview(&mut self, visible: bool) {
        if self.preview != visible {
            self.preview = visible;
            self.events.emit(EditorEvent::PreviewChanged { visible });
        }
    }

    pub fn toggle_preview(&mut self) -> bool {
        self.set_preview(!self.preview);
        self.preview
    }

    /// Apply a formatting action to the current selection.
    pub fn format(&mut self, action: FormatAction) {
        if let Err(e) = apply_format(&mut self.range, action) {
            log_edit_error("format", &e);
        }
    }

    /// Format by wire name. Unknown names are ignored.
    pub fn format_named(&mut self, name: &str) {
        match name.parse::<FormatAction>() {
            Ok(action) => self.format(action),
            Err(e) => tracing::debug!(target: "quire::format", %e, "ignoring format request"),
        }
    }

    /// Handle a keydown. `Handled` means the caller must suppress the
    /// platform's default behaviour.
    pub fn handle_keydown(&mut self, combo: &KeyCombo) -> KeydownResult {
        if !combo.modifiers.any_command() {
            self.hide_toolbar();

            let at_boundary = combo
                .key
                .as_char()
                .is_some_and(|c| self.snippets.is_boundary(c));
            if at_boundary {
                match self.snippets.try_expand(&mut self.range) {
                    Ok(true) => return KeydownResult::Handled,
                    Ok(false) => {}
                    Err(e) => log_edit_error("snippet", &e),
                }
            }
        }

        if let Some(command) = self.keybindings.lookup(combo) {
            tracing::debug!(target: "quire::keys", ?combo, ?command, "keybinding");
            self.execute(command);
            return KeydownResult::Handled;
        }

        if combo.key.is_navigation() || combo.key.is_modifier() {
            KeydownResult::PassThrough
        } else {
            KeydownResult::NotHandled
        }
    }

    pub fn execute(&mut self, command: Command) {
        let result = match command {
            Command::InsertLineBreak => self.insert_line_break(),
            Command::InsertTab => {
                let tab = self.config.tab();
                self.replace_selection(&tab)
            }
            Command::Format(action) => apply_format(&mut self.range, action).map(|_| ()),
            Command::Save => {
                self.events.emit(EditorEvent::Save);
                Ok(())
            }
            Command::TogglePreview => {
                self.toggle_preview();
                Ok(())
            }
        };
        if let Err(e) = result {
            log_edit_error("command", &e);
        }
    }

    fn insert_line_break(&mut self) -> Result<(), EditError> {
        let sel = self.range.require_selection()?;
        self.range.delete(sel.to_range())?;
        let at = sel.start();
        // A single trailing newline doesn't render as a new line, so the end
        // of a line gets two.
        let text = if self.range.line_end(at) == at {
            "\n\n"
        } else {
            "\n"
        };
        let end = self.range.insert(at, text)?;
        self.range.select(Selection::collapsed(end))
    }

    fn replace_selection(&mut self, text: &str) -> Result<(), EditError> {
        let sel = self.range.require_selection()?;
        let end = self.range.replace(sel.to_range(), text)?;
        self.range.select(Selection::collapsed(end))
    }

    /// Schedule a toolbar update for the current selection. Any update
    /// scheduled earlier is superseded.
    pub fn update_context_menu(&mut self) -> ToolbarTicket {
        self.positioner.schedule()
    }

    /// Run a deferred toolbar update. Returns None if a newer one was
    /// scheduled in the meantime.
    pub fn run_toolbar_update(&mut self, ticket: ToolbarTicket) -> Option<ToolbarState> {
        if !self.positioner.is_current(ticket) {
            tracing::trace!(
                target: "quire::toolbar",
                stale = ticket.generation(),
                "dropping superseded toolbar update"
            );
            return None;
        }
        let state = self.positioner.compute(&self.range);
        match state.position {
            Some(position) if state.visible => self.toolbar.show(position),
            _ => self.toolbar.hide(),
        }
        self.toolbar_state = state;
        Some(state)
    }

    /// Schedule and run a toolbar update at once.
    pub fn refresh_toolbar(&mut self) -> ToolbarState {
        let ticket = self.update_context_menu();
        self.run_toolbar_update(ticket).unwrap_or(self.toolbar_state)
    }

    pub fn hide_toolbar(&mut self) {
        if self.toolbar_state.visible {
            self.toolbar.hide();
            self.toolbar_state = ToolbarState::hidden();
        }
    }

    /// Single entry point for hosts that queue their inputs.
    pub fn dispatch(&mut self, input: EditorInput) -> Dispatched {
        match input {
            EditorInput::Key(combo) => Dispatched::Key(self.on_key(&combo)),
            EditorInput::SelectionChange => Dispatched::Toolbar(self.on_selection_change()),
            EditorInput::Format(action) => {
                self.format(action);
                Dispatched::Formatted
            }
        }
    }

    pub fn on_key(&mut self, combo: &KeyCombo) -> KeydownResult {
        self.handle_keydown(combo)
    }

    pub fn on_selection_change(&mut self) -> ToolbarTicket {
        self.update_context_menu()
    }
}

fn log_edit_error(op: &str, e: &EditError) {
    if e.is_benign() {
        tracing::debug!(target: "quire::editor", op, reason = %e, "nothing to do");
    } else {
        tracing::warn!(target: "quire::editor", op, error = %e, "edit aborted");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::HeadlessSurface;
    use crate::keymap::Key;
    use crate::toolbar::RecordingToolbar;

    fn make_editor(text: &str, sel: Selection) -> Editor<HeadlessSurface, RecordingToolbar> {
        Editor::with_defaults(
            HeadlessSurface::with_selection(text, sel),
            RecordingToolbar::default(),
        )
    }

    #[test]
    fn test_enter_mid_line_inserts_one_break() {
        let mut ed = make_editor("abcd", Selection::collapsed(2));
        assert_eq!(ed.handle_keydown(&KeyCombo::new(Key::Enter)), KeydownResult::Handled);
        assert_eq!(ed.markdown(), "ab\ncd");
        assert_eq!(ed.selection(), Some(Selection::collapsed(3)));
    }

    #[test]
    fn test_enter_at_line_end_inserts_two() {
        let mut ed = make_editor("ab\ncd", Selection::collapsed(2));
        ed.handle_keydown(&KeyCombo::new(Key::Enter));
        assert_eq!(ed.markdown(), "ab\n\n\ncd");
        assert_eq!(ed.selection(), Some(Selection::collapsed(4)));

        let mut ed = make_editor("ab", Selection::collapsed(2));
        ed.handle_keydown(&KeyCombo::new(Key::Enter));
        assert_eq!(ed.markdown(), "ab\n\n");
    }

    #[test]
    fn test_tab_inserts_spaces_over_selection() {
        let mut ed = make_editor("a-b", Selection::new(1, 2));
        assert_eq!(ed.handle_keydown(&KeyCombo::new(Key::Tab)), KeydownResult::Handled);
        assert_eq!(ed.markdown(), "a    b");
        assert_eq!(ed.selection(), Some(Selection::collapsed(5)));
    }

    #[test]
    fn test_unbound_keys_fall_through() {
        let mut ed = make_editor("a", Selection::collapsed(1));
        assert_eq!(
            ed.handle_keydown(&KeyCombo::new(Key::character("x"))),
            KeydownResult::NotHandled
        );
        assert_eq!(
            ed.handle_keydown(&KeyCombo::new(Key::ArrowLeft)),
            KeydownResult::PassThrough
        );
        assert_eq!(ed.markdown(), "a");
    }

    #[test]
    fn test_format_named_ignores_unknown() {
        let mut ed = make_editor("word", Selection::new(0, 4));
        ed.format_named("sparkle");
        assert_eq!(ed.markdown(), "word");
        ed.format_named("strike");
        assert_eq!(ed.markdown(), "~~word~~");
    }

    #[test]
    fn test_set_preview_only_emits_on_change() {
        use std::cell::Cell;
        use std::rc::Rc;

        let count = Rc::new(Cell::new(0));
        let mut ed = make_editor("", Selection::collapsed(0));
        let c = count.clone();
        ed.subscribe(move |_| c.set(c.get() + 1));
        ed.set_preview(false);
        ed.set_preview(true);
        ed.set_preview(true);
        assert_eq!(count.get(), 1);
        assert!(!ed.toggle_preview());
        assert_eq!(count.get(), 2);
    }
}
