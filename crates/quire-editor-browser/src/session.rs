//! A live editing session bound to page elements.
//!
//! [`BrowserEditor`] owns an [`Editor`] over a [`DomSurface`] and a
//! [`DomToolbar`], installs the DOM listeners that drive it, and runs the
//! deferred toolbar updates. Editor events are queued while the editor is
//! borrowed and delivered to host subscribers once it has been released, so
//! a subscriber may call back into the session.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::{Rc, Weak};

use gloo_events::{EventListener, EventListenerOptions};
use quire_editor_core::{
    DeferMode, EditError, Editor, EditorConfig, EditorEvent, EventBus, FormatAction,
    KeydownResult, Selection, SubscriptionId, ToolbarState,
};
use wasm_bindgen::JsCast;
use web_sys::HtmlElement;

use crate::keyboard::handle_keydown_event;
use crate::platform::platform;
use crate::schedule::Deferred;
use crate::surface::DomSurface;
use crate::toolbar::DomToolbar;

pub type DomEditor = Editor<DomSurface, DomToolbar>;

struct Shared {
    editor: RefCell<DomEditor>,
    deferred: RefCell<Deferred>,
    queue: Rc<RefCell<VecDeque<EditorEvent>>>,
    subscribers: RefCell<EventBus>,
    defer: DeferMode,
}

impl Shared {
    /// Deliver queued editor events to subscribers.
    ///
    /// A flush started from inside a subscriber returns at once; the outer
    /// flush picks up whatever was queued in the meantime.
    fn flush(&self) {
        let Ok(mut subscribers) = self.subscribers.try_borrow_mut() else {
            return;
        };
        loop {
            let next = self.queue.borrow_mut().pop_front();
            let Some(event) = next else {
                break;
            };
            tracing::debug!(target: "quire::events", ?event, "emit");
            subscribers.emit(event);
        }
    }

    fn with_editor<R>(&self, f: impl FnOnce(&mut DomEditor) -> R) -> Option<R> {
        let result = match self.editor.try_borrow_mut() {
            Ok(mut editor) => Some(f(&mut editor)),
            Err(_) => {
                tracing::debug!(target: "quire::editor", "editor busy, dropping re-entrant call");
                None
            }
        };
        self.flush();
        result
    }
}

/// Schedule a deferred toolbar update for the current selection.
fn schedule_toolbar(shared: &Rc<Shared>) {
    let Some(ticket) = shared.with_editor(|editor| editor.update_context_menu()) else {
        return;
    };
    let weak: Weak<Shared> = Rc::downgrade(shared);
    let scheduled = shared.deferred.borrow_mut().schedule(shared.defer, move || {
        let Some(shared) = weak.upgrade() else {
            return;
        };
        if let Ok(mut deferred) = shared.deferred.try_borrow_mut() {
            deferred.fired();
        }
        shared.with_editor(|editor| editor.run_toolbar_update(ticket));
    });
    if let Err(e) = scheduled {
        tracing::warn!(target: "quire::toolbar", error = ?e, "could not defer toolbar update, running now");
        shared.with_editor(|editor| editor.run_toolbar_update(ticket));
    }
}

/// Editor session over a contenteditable element and its toolbar.
pub struct BrowserEditor {
    shared: Rc<Shared>,
    listeners: Vec<EventListener>,
}

impl BrowserEditor {
    /// Build a session. Listeners are not installed until [`attach`](Self::attach).
    ///
    /// Cmd shortcuts are added on Apple platforms regardless of config.
    pub fn new(
        area: HtmlElement,
        toolbar: HtmlElement,
        mut config: EditorConfig,
    ) -> Result<Self, EditError> {
        config.validate()?;
        config.mac_bindings |= platform().uses_meta_shortcuts();
        let defer = config.toolbar.defer;

        let surface = DomSurface::new(area)?;
        let mut editor = Editor::new(surface, DomToolbar::new(toolbar), config);

        let queue = Rc::new(RefCell::new(VecDeque::new()));
        let sink = queue.clone();
        editor.subscribe(move |event| sink.borrow_mut().push_back(*event));

        tracing::debug!(target: "quire::editor", ?defer, "editor session created");
        Ok(Self {
            shared: Rc::new(Shared {
                editor: RefCell::new(editor),
                deferred: RefCell::new(Deferred::new()),
                queue,
                subscribers: RefCell::new(EventBus::new()),
                defer,
            }),
            listeners: Vec::new(),
        })
    }

    /// Install keydown and selection listeners. Calling twice is a no-op.
    pub fn attach(&mut self) {
        if !self.listeners.is_empty() {
            return;
        }
        let area = self.shared.editor.borrow().surface().area().clone();

        let weak = Rc::downgrade(&self.shared);
        let keydown = EventListener::new_with_options(
            &area,
            "keydown",
            EventListenerOptions::enable_prevent_default(),
            move |event| {
                let (Some(shared), Some(event)) =
                    (weak.upgrade(), event.dyn_ref::<web_sys::KeyboardEvent>())
                else {
                    return;
                };
                shared.with_editor(|editor| handle_keydown_event(editor, event));
            },
        );

        let weak = Rc::downgrade(&self.shared);
        let mouseup = EventListener::new(&area, "mouseup", move |_| {
            if let Some(shared) = weak.upgrade() {
                schedule_toolbar(&shared);
            }
        });

        let weak = Rc::downgrade(&self.shared);
        let selection = EventListener::new(&gloo_utils::document(), "selectionchange", move |_| {
            if let Some(shared) = weak.upgrade() {
                schedule_toolbar(&shared);
            }
        });

        self.listeners = vec![keydown, mouseup, selection];
        tracing::debug!(target: "quire::editor", "listeners attached");
    }

    /// Remove every listener and cancel any pending toolbar update.
    pub fn detach(&mut self) {
        self.listeners.clear();
        self.shared.deferred.borrow_mut().cancel();
        tracing::debug!(target: "quire::editor", "listeners detached");
    }

    pub fn is_attached(&self) -> bool {
        !self.listeners.is_empty()
    }

    pub fn format(&self, action: FormatAction) {
        self.shared.with_editor(|editor| editor.format(action));
    }

    pub fn format_named(&self, name: &str) {
        self.shared.with_editor(|editor| editor.format_named(name));
    }

    /// Handle a keydown the host received itself.
    pub fn handle_keydown(&self, event: &web_sys::KeyboardEvent) -> KeydownResult {
        self.shared
            .with_editor(|editor| handle_keydown_event(editor, event))
            .unwrap_or(KeydownResult::NotHandled)
    }

    /// Schedule a deferred toolbar update.
    pub fn update_context_menu(&self) {
        schedule_toolbar(&self.shared);
    }

    /// Position the toolbar immediately.
    pub fn refresh_toolbar(&self) -> ToolbarState {
        self.shared
            .with_editor(|editor| editor.refresh_toolbar())
            .unwrap_or_default()
    }

    pub fn toolbar_state(&self) -> ToolbarState {
        self.shared.editor.borrow().toolbar_state()
    }

    pub fn selection(&self) -> Option<Selection> {
        self.shared.editor.borrow().selection()
    }

    pub fn markdown(&self) -> String {
        self.shared.editor.borrow().markdown()
    }

    pub fn preview(&self) -> bool {
        self.shared.editor.borrow().preview()
    }

    pub fn set_preview(&self, visible: bool) {
        self.shared.with_editor(|editor| editor.set_preview(visible));
    }

    pub fn toggle_preview(&self) -> bool {
        self.shared
            .with_editor(|editor| editor.toggle_preview())
            .unwrap_or_default()
    }

    /// Register a host listener for editor events.
    pub fn subscribe(&self, listener: impl FnMut(&EditorEvent) + 'static) -> SubscriptionId {
        self.shared.subscribers.borrow_mut().subscribe(listener)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.shared.subscribers.borrow_mut().unsubscribe(id)
    }
}

impl Drop for BrowserEditor {
    fn drop(&mut self) {
        self.detach();
    }
}
