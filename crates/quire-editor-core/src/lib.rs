//! quire-editor-core: markdown editing engine without platform dependencies.
//!
//! This crate provides:
//! - `EditableSurface` - the text surface abstraction, with `HeadlessSurface`
//!   as an in-memory implementation
//! - `RangeAdapter` - selection-guarded reads and writes against a surface
//! - Formatting, snippet expansion, keybindings and toolbar placement
//! - `Editor` - the facade tying them together for one editing session

pub mod config;
pub mod editor;
pub mod error;
pub mod events;
pub mod formatting;
pub mod headless;
pub mod keymap;
pub mod range;
pub mod snippet;
pub mod surface;
pub mod text;
pub mod toolbar;
pub mod types;

pub use config::{DeferMode, EditorConfig, ToolbarConfig};
pub use editor::{Dispatched, Editor};
pub use error::{EditError, SurfaceError};
pub use events::{EditorEvent, EditorInput, EventBus, SubscriptionId};
pub use formatting::{Delimiters, FormatAction, UnknownFormat, apply_format, strip_markers};
pub use headless::HeadlessSurface;
pub use keymap::{Command, Key, KeyCombo, KeybindingConfig, KeydownResult, Modifiers};
pub use range::RangeAdapter;
pub use smol_str::SmolStr;
pub use snippet::{PLACEHOLDER, SnippetEngine, SnippetTemplate};
pub use surface::EditableSurface;
pub use text::{EditorRope, TextBuffer};
pub use toolbar::{
    RecordingToolbar, Toolbar, ToolbarPosition, ToolbarPositioner, ToolbarState, ToolbarTicket,
};
pub use types::{MarkerToken, Rect, Selection, SelectionProbe};
