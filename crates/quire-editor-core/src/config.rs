use serde::{Deserialize, Serialize};

use crate::error::EditError;
use crate::keymap::KeybindingConfig;
use crate::snippet::{SnippetEngine, SnippetTemplate};
use crate::toolbar::{DEFAULT_DELAY_MS, DEFAULT_GUTTER_PX};

/// How the deferred toolbar update is scheduled by the host.
#[derive(Deserialize, Serialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum DeferMode {
    /// One-shot timer with the given delay.
    Timeout { ms: u32 },
    /// After the next rendered frame.
    NextFrame,
}

impl Default for DeferMode {
    fn default() -> Self {
        Self::Timeout {
            ms: DEFAULT_DELAY_MS,
        }
    }
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct ToolbarConfig {
    pub gutter_px: f64,
    pub defer: DeferMode,
}

impl Default for ToolbarConfig {
    fn default() -> Self {
        Self {
            gutter_px: DEFAULT_GUTTER_PX,
            defer: DeferMode::default(),
        }
    }
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorConfig {
    /// Spaces inserted by Tab.
    pub tab_width: usize,
    pub toolbar: ToolbarConfig,
    pub snippets: Vec<SnippetTemplate>,
    /// Characters that end a snippet trigger.
    pub boundary_chars: Vec<char>,
    /// Also bind Cmd shortcuts.
    pub mac_bindings: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            tab_width: 4,
            toolbar: ToolbarConfig::default(),
            snippets: vec![SnippetTemplate::definition()],
            boundary_chars: vec![' '],
            mac_bindings: false,
        }
    }
}

impl EditorConfig {
    /// Reject snippet templates that could never expand cleanly.
    pub fn validate(&self) -> Result<(), EditError> {
        for snippet in &self.snippets {
            snippet.validate(&self.boundary_chars)?;
        }
        Ok(())
    }

    pub fn keybindings(&self) -> KeybindingConfig {
        KeybindingConfig::default_for_platform(self.mac_bindings)
    }

    pub fn snippet_engine(&self) -> SnippetEngine {
        SnippetEngine::new(self.snippets.clone(), self.boundary_chars.clone())
    }

    pub fn tab(&self) -> String {
        " ".repeat(self.tab_width)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_fills_defaults() {
        let config: EditorConfig =
            serde_json::from_str(r#"{"tabWidth": 2, "toolbar": {"defer": {"kind": "nextFrame"}}}"#)
                .unwrap();
        assert_eq!(config.tab_width, 2);
        assert_eq!(config.toolbar.defer, DeferMode::NextFrame);
        assert_eq!(config.toolbar.gutter_px, 25.0);
        assert_eq!(config.snippets, vec![SnippetTemplate::definition()]);
        assert_eq!(config.tab(), "  ");
    }

    #[test]
    fn test_validate_rejects_bad_snippet() {
        let mut config = EditorConfig::default();
        assert!(config.validate().is_ok());
        config.snippets.push(SnippetTemplate::new("!oops", "nothing to fill"));
        assert!(matches!(config.validate(), Err(EditError::MalformedSnippet { .. })));
    }

    #[test]
    fn test_default_defer_is_short_timeout() {
        assert_eq!(DeferMode::default(), DeferMode::Timeout { ms: 10 });
    }
}
