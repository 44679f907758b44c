//! Events the editor emits to the surrounding view, and the inputs it accepts.

use serde::{Deserialize, Serialize};

use crate::formatting::FormatAction;
use crate::keymap::KeyCombo;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum EditorEvent {
    /// The user asked to save.
    Save,
    /// Preview visibility changed.
    PreviewChanged { visible: bool },
}

/// Input delivered to [`crate::Editor::dispatch`].
#[derive(Debug, Clone, PartialEq)]
pub enum EditorInput {
    Key(KeyCombo),
    SelectionChange,
    Format(FormatAction),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&EditorEvent)>;

/// Synchronous fan-out of editor events. Listeners run in subscription order.
#[derive(Default)]
pub struct EventBus {
    listeners: Vec<(SubscriptionId, Listener)>,
    next_id: u64,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&EditorEvent) + 'static) -> SubscriptionId {
        self.next_id += 1;
        let id = SubscriptionId(self.next_id);
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Returns false if `id` was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sub, _)| *sub != id);
        self.listeners.len() != before
    }

    pub fn emit(&mut self, event: EditorEvent) {
        tracing::debug!(target: "quire::events", ?event, listeners = self.listeners.len(), "emit");
        for (_, listener) in self.listeners.iter_mut() {
            listener(&event);
        }
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_subscribe_emit_unsubscribe() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut bus = EventBus::new();
        let sink = seen.clone();
        let id = bus.subscribe(move |e| sink.borrow_mut().push(*e));

        bus.emit(EditorEvent::Save);
        assert!(bus.unsubscribe(id));
        assert!(!bus.unsubscribe(id));
        bus.emit(EditorEvent::Save);

        assert_eq!(*seen.borrow(), vec![EditorEvent::Save]);
    }

    #[test]
    fn test_event_json() {
        let json = serde_json::to_string(&EditorEvent::PreviewChanged { visible: true }).unwrap();
        assert_eq!(json, r#"{"type":"previewChanged","visible":true}"#);
    }
}
