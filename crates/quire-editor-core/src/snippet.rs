//! Snippet expansion.
//!
//! A snippet is a short trigger (`!def`) that, typed right before the cursor
//! and followed by a boundary character, is replaced by a multi-line block.
//! The cursor comes to rest where the first placeholder was.

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use crate::error::EditError;
use crate::range::RangeAdapter;
use crate::surface::EditableSurface;
use crate::types::Selection;

/// Character marking the split points in a snippet body.
pub const PLACEHOLDER: char = '$';

/// Trigger text plus the body it expands to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnippetTemplate {
    pub trigger: SmolStr,
    /// Body with `$` placeholders. The cursor lands on the first one.
    pub body: String,
}

impl SnippetTemplate {
    pub fn new(trigger: impl Into<SmolStr>, body: impl Into<String>) -> Self {
        Self {
            trigger: trigger.into(),
            body: body.into(),
        }
    }

    /// The definition block snippet.
    pub fn definition() -> Self {
        Self::new("!def", ":::definition Définition: $\n$\n:::")
    }

    /// Check the template can be expanded, without touching any document.
    pub fn validate(&self, boundary: &[char]) -> Result<(), EditError> {
        let malformed = |reason: &str| EditError::MalformedSnippet {
            trigger: self.trigger.clone(),
            reason: reason.to_string(),
        };
        if self.trigger.is_empty() {
            return Err(malformed("empty trigger"));
        }
        if self.trigger.contains(PLACEHOLDER) {
            return Err(malformed("trigger contains the placeholder character"));
        }
        if self.trigger.chars().any(|c| c == '\n' || boundary.contains(&c)) {
            return Err(malformed("trigger contains a boundary character"));
        }
        if !self.body.contains(PLACEHOLDER) {
            return Err(malformed("body has no placeholder"));
        }
        Ok(())
    }

    /// Body split at placeholders.
    pub fn segments(&self) -> Vec<&str> {
        self.body.split(PLACEHOLDER).collect()
    }

    /// Body with placeholders removed, and the char offset of the first one.
    pub fn expansion(&self) -> (String, usize) {
        let segments = self.segments();
        let cursor = segments.first().map(|s| s.chars().count()).unwrap_or(0);
        (segments.concat(), cursor)
    }
}

impl Default for SnippetTemplate {
    fn default() -> Self {
        Self::definition()
    }
}

/// Matches triggers before the cursor and expands them.
#[derive(Debug, Clone)]
pub struct SnippetEngine {
    templates: Vec<SnippetTemplate>,
    boundary: Vec<char>,
}

impl Default for SnippetEngine {
    fn default() -> Self {
        Self::new(vec![SnippetTemplate::definition()], vec![' '])
    }
}

impl SnippetEngine {
    pub fn new(templates: Vec<SnippetTemplate>, boundary: Vec<char>) -> Self {
        Self {
            templates,
            boundary,
        }
    }

    pub fn templates(&self) -> &[SnippetTemplate] {
        &self.templates
    }

    /// Whether typing `c` should trigger a snippet check.
    pub fn is_boundary(&self, c: char) -> bool {
        self.boundary.contains(&c)
    }

    /// Template whose trigger ends the line text before `cursor`.
    pub fn find_match<S: EditableSurface>(
        &self,
        range: &RangeAdapter<S>,
        cursor: usize,
    ) -> Option<&SnippetTemplate> {
        let line = range.line_start(cursor);
        let before = range.slice(line..cursor)?;
        self.templates
            .iter()
            .filter(|t| !t.trigger.is_empty())
            .find(|t| before.ends_with(t.trigger.as_str()))
    }

    /// Expand a trigger ending at the cursor.
    ///
    /// Returns `Ok(false)` when nothing matched. Either the whole expansion
    /// lands or the document is left exactly as it was.
    pub fn try_expand<S: EditableSurface>(
        &self,
        range: &mut RangeAdapter<S>,
    ) -> Result<bool, EditError> {
        let sel = range.require_selection()?;
        if !sel.is_collapsed() {
            return Ok(false);
        }
        let cursor = sel.head;
        let Some(template) = self.find_match(range, cursor) else {
            return Ok(false);
        };
        template.validate(&self.boundary)?;

        let trigger_len = template.trigger.chars().count();
        let start = cursor - trigger_len;
        let (expansion, cursor_at) = template.expansion();

        tracing::debug!(
            target: "quire::snippet",
            trigger = %template.trigger,
            offset = start,
            "expanding snippet"
        );

        range.delete(start..cursor)?;
        match place_expansion(range, start, &expansion, cursor_at) {
            Ok(()) => Ok(true),
            Err(e) => {
                roll_back(range, start, &expansion, &template.trigger, sel);
                Err(e)
            }
        }
    }
}

/// Put the trigger back after a failed expansion. Each step runs even when an
/// earlier one failed.
fn roll_back<S: EditableSurface>(
    range: &mut RangeAdapter<S>,
    start: usize,
    expansion: &str,
    trigger: &str,
    sel: Selection,
) {
    let end = start + expansion.chars().count();
    if range.slice(start..end).is_some_and(|s| s == expansion) {
        if let Err(e) = range.delete(start..end) {
            tracing::warn!(target: "quire::snippet", error = %e, "rollback could not remove expansion");
        }
    }
    if let Err(e) = range.insert(start, trigger) {
        tracing::warn!(target: "quire::snippet", error = %e, %trigger, "rollback could not restore trigger");
    }
    if let Err(e) = range.select(sel) {
        tracing::warn!(target: "quire::snippet", error = %e, ?sel, "rollback could not restore selection");
    }
}

fn place_expansion<S: EditableSurface>(
    range: &mut RangeAdapter<S>,
    start: usize,
    expansion: &str,
    cursor_at: usize,
) -> Result<(), EditError> {
    range.insert(start, expansion)?;
    let marker = range.insert_marker(start + cursor_at)?;
    let result = match range.marker_offset(marker) {
        Some(at) => range.select(Selection::collapsed(at)),
        None => Err(EditError::Surface("cursor marker vanished".into())),
    };
    // The marker never stays in the document, even when selecting failed.
    range.remove_marker(marker)?;
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::HeadlessSurface;

    fn engine() -> SnippetEngine {
        SnippetEngine::default()
    }

    #[test]
    fn test_expands_definition_block() {
        let mut r = RangeAdapter::new(HeadlessSurface::with_cursor_at_end("intro\n!def"));
        assert!(engine().try_expand(&mut r).unwrap());
        assert_eq!(r.text(), "intro\n:::definition Définition: \n\n:::");
        let cursor = "intro\n:::definition Définition: ".chars().count();
        assert_eq!(r.get_selection(), Some(Selection::collapsed(cursor)));
        assert_eq!(r.surface().marker_count(), 0);
    }

    #[test]
    fn test_trigger_must_end_at_cursor() {
        let mut r = RangeAdapter::new(HeadlessSurface::with_selection(
            "!defx",
            Selection::collapsed(5),
        ));
        assert!(!engine().try_expand(&mut r).unwrap());
        assert_eq!(r.text(), "!defx");
    }

    #[test]
    fn test_trigger_mid_text() {
        let mut r = RangeAdapter::new(HeadlessSurface::with_selection(
            "a !def b",
            Selection::collapsed(6),
        ));
        assert!(engine().try_expand(&mut r).unwrap());
        assert_eq!(r.text(), "a :::definition Définition: \n\n::: b");
    }

    #[test]
    fn test_no_selection_leaves_text() {
        let mut r = RangeAdapter::new(HeadlessSurface::new("!def"));
        let err = engine().try_expand(&mut r).unwrap_err();
        assert!(matches!(err, EditError::NoSelection));
        assert_eq!(r.text(), "!def");
    }

    #[test]
    fn test_malformed_template_is_rejected_before_mutation() {
        let bad = SnippetEngine::new(vec![SnippetTemplate::new("!x", "no placeholder")], vec![' ']);
        let mut r = RangeAdapter::new(HeadlessSurface::with_cursor_at_end("!x"));
        let err = bad.try_expand(&mut r).unwrap_err();
        assert!(matches!(err, EditError::MalformedSnippet { .. }));
        assert_eq!(r.text(), "!x");
    }

    #[test]
    fn test_failed_marker_rolls_back() {
        let mut surface = HeadlessSurface::with_cursor_at_end("go !def");
        surface.reject_markers(true);
        let mut r = RangeAdapter::new(surface);
        assert!(engine().try_expand(&mut r).is_err());
        assert_eq!(r.text(), "go !def");
        assert_eq!(r.get_selection(), Some(Selection::collapsed(7)));
    }

    #[test]
    fn test_rollback_restores_text_when_selecting_fails() {
        let mut surface = HeadlessSurface::with_cursor_at_end("go !def");
        surface.reject_markers(true);
        surface.reject_selects(true);
        let mut r = RangeAdapter::new(surface);
        let err = engine().try_expand(&mut r).unwrap_err();
        assert!(matches!(err, EditError::Surface(_)));
        assert_eq!(r.text(), "go !def");
        assert_eq!(r.surface().marker_count(), 0);
    }

    #[test]
    fn test_custom_template_with_two_placeholders() {
        let e = SnippetEngine::new(vec![SnippetTemplate::new("!t", "[$]($)")], vec![' ']);
        let mut r = RangeAdapter::new(HeadlessSurface::with_cursor_at_end("!t"));
        assert!(e.try_expand(&mut r).unwrap());
        assert_eq!(r.text(), "[]()");
        assert_eq!(r.get_selection(), Some(Selection::collapsed(1)));
    }

    #[test]
    fn test_validate() {
        assert!(SnippetTemplate::definition().validate(&[' ']).is_ok());
        assert!(SnippetTemplate::new("", "$").validate(&[' ']).is_err());
        assert!(SnippetTemplate::new("a b", "$").validate(&[' ']).is_err());
        assert!(SnippetTemplate::new("$x", "$").validate(&[' ']).is_err());
    }
}
