//! Browser DOM layer for the quire markdown editor.
//!
//! This crate binds the platform-free engine in `quire-editor-core` to a
//! real page. It assumes a `wasm32-unknown-unknown` target environment.
//!
//! # Architecture
//!
//! - `surface`: contenteditable element as an `EditableSurface`
//! - `toolbar`: the floating toolbar element
//! - `keyboard`: keydown translation and default suppression
//! - `schedule`: timer / animation-frame deferral for toolbar updates
//! - `session`: listener wiring and event delivery for one editor
//! - `platform`: OS detection for the shortcut modifier
//!
//! # Re-exports
//!
//! This crate re-exports `quire-editor-core` for convenience, so consumers
//! only need to depend on `quire-editor-browser`.

pub use quire_editor_core;
pub use quire_editor_core::*;

pub mod keyboard;
pub mod platform;
pub mod schedule;
pub mod session;
pub mod surface;
pub mod toolbar;

pub use keyboard::{combo_from_event, handle_keydown_event};
pub use platform::{Platform, platform};
pub use schedule::Deferred;
pub use session::{BrowserEditor, DomEditor};
pub use surface::DomSurface;
pub use toolbar::DomToolbar;
