//! One-shot deferred callbacks.
//!
//! The toolbar reads layout after the browser has had a chance to settle, so
//! its updates run either from a short timer or from the next animation
//! frame. Scheduling again cancels whatever was pending.

use quire_editor_core::DeferMode;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

enum Pending {
    Timeout(i32),
    Frame(i32),
}

/// Holds at most one pending callback.
///
/// The closure stays owned here until the next schedule or drop. It is never
/// released from inside its own invocation.
#[derive(Default)]
pub struct Deferred {
    pending: Option<Pending>,
    closure: Option<Closure<dyn FnMut()>>,
}

impl Deferred {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Schedule `callback`, cancelling any earlier one.
    pub fn schedule(&mut self, mode: DeferMode, callback: impl FnOnce() + 'static) -> Result<(), JsValue> {
        self.cancel();
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let closure: Closure<dyn FnMut()> = Closure::once(callback);
        let handle = match mode {
            DeferMode::Timeout { ms } => Pending::Timeout(
                window.set_timeout_with_callback_and_timeout_and_arguments_0(
                    closure.as_ref().unchecked_ref(),
                    ms as i32,
                )?,
            ),
            DeferMode::NextFrame => {
                Pending::Frame(window.request_animation_frame(closure.as_ref().unchecked_ref())?)
            }
        };
        self.pending = Some(handle);
        self.closure = Some(closure);
        Ok(())
    }

    /// Cancel the pending callback, if any.
    pub fn cancel(&mut self) {
        if let (Some(handle), Some(window)) = (self.pending.take(), web_sys::window()) {
            match handle {
                Pending::Timeout(id) => window.clear_timeout_with_handle(id),
                Pending::Frame(id) => {
                    if let Err(e) = window.cancel_animation_frame(id) {
                        tracing::debug!(target: "quire::toolbar", error = ?e, "cancel_animation_frame failed");
                    }
                }
            }
        }
        self.closure = None;
    }

    /// Mark the pending callback as run.
    pub(crate) fn fired(&mut self) {
        self.pending = None;
    }
}

impl Drop for Deferred {
    fn drop(&mut self) {
        self.cancel();
    }
}
