//! Selection/range adapter over an [`EditableSurface`].
//!
//! Every read and write the engines make against the document goes through
//! here. The plain methods (`wrap`, `insert_at`, `set_cursor`) are no-ops
//! when there is no selection inside the surface; the `try_` variants report
//! why instead, for callers that must abort before mutating anything.

use std::ops::Range;

use smol_str::SmolStr;

use crate::error::EditError;
use crate::surface::EditableSurface;
use crate::types::{MarkerToken, Selection, SelectionProbe};

pub struct RangeAdapter<S> {
    surface: S,
}

impl<S: EditableSurface> RangeAdapter<S> {
    pub fn new(surface: S) -> Self {
        Self { surface }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn into_inner(self) -> S {
        self.surface
    }

    pub fn probe(&self) -> SelectionProbe {
        self.surface.selection()
    }

    /// Current selection, if one exists inside the surface.
    pub fn get_selection(&self) -> Option<Selection> {
        self.probe().selection()
    }

    /// Current selection, or the reason there is none to act on.
    pub fn require_selection(&self) -> Result<Selection, EditError> {
        match self.probe() {
            SelectionProbe::Inside(sel) => Ok(sel),
            SelectionProbe::Missing => Err(EditError::NoSelection),
            SelectionProbe::Outside => Err(EditError::OutsideSurface),
        }
    }

    pub fn is_collapsed(&self, selection: &Selection) -> bool {
        selection.is_collapsed()
    }

    /// Text covered by `selection`.
    pub fn text_under(&self, selection: &Selection) -> Option<SmolStr> {
        self.surface.slice(self.clamp_range(selection.to_range()))
    }

    pub fn len_chars(&self) -> usize {
        self.surface.len_chars()
    }

    pub fn char_at(&self, offset: usize) -> Option<char> {
        self.surface.char_at(offset)
    }

    pub fn slice(&self, range: Range<usize>) -> Option<SmolStr> {
        self.surface.slice(self.clamp_range(range))
    }

    pub fn text(&self) -> String {
        self.surface.text()
    }

    pub fn line_start(&self, offset: usize) -> usize {
        self.surface.line_start(offset)
    }

    pub fn line_end(&self, offset: usize) -> usize {
        self.surface.line_end(offset)
    }

    /// Wrap `selection` in `prefix`/`suffix`, keeping the original text selected.
    pub fn wrap(&mut self, selection: &Selection, prefix: &str, suffix: &str) {
        let result = self
            .require_selection()
            .and_then(|_| self.try_wrap(selection, prefix, suffix));
        log_skipped("wrap", result.err());
    }

    /// Insert `text` at `offset`.
    pub fn insert_at(&mut self, offset: usize, text: &str) {
        let result = self
            .require_selection()
            .and_then(|_| self.insert(offset, text).map(|_| ()));
        log_skipped("insert_at", result.err());
    }

    /// Collapse the selection to `offset`.
    pub fn set_cursor(&mut self, offset: usize) {
        let result = self
            .require_selection()
            .and_then(|_| self.select(Selection::collapsed(offset)));
        log_skipped("set_cursor", result.err());
    }

    /// Wrap without checking for a live selection. Returns the new selection,
    /// which covers the original text in the original direction.
    pub fn try_wrap(
        &mut self,
        selection: &Selection,
        prefix: &str,
        suffix: &str,
    ) -> Result<Selection, EditError> {
        let range = self.clamp_range(selection.to_range());
        // Suffix first so the start offset stays valid.
        self.insert(range.end, suffix)?;
        if let Err(e) = self.insert(range.start, prefix) {
            let suffix_len = suffix.chars().count();
            let _ = self.delete(range.end..range.end + suffix_len);
            return Err(e);
        }
        let shift = prefix.chars().count();
        let wrapped = selection.with_bounds(range.start + shift, range.end + shift);
        self.select(wrapped)?;
        Ok(wrapped)
    }

    /// Insert `text` at `offset` (clamped to the document). Returns the
    /// offset just past the inserted text.
    pub fn insert(&mut self, offset: usize, text: &str) -> Result<usize, EditError> {
        let at = offset.min(self.surface.len_chars());
        if !text.is_empty() {
            self.surface.insert_text(at, text)?;
        }
        tracing::trace!(target: "quire::range", offset = at, len = text.len(), "insert");
        Ok(at + text.chars().count())
    }

    pub fn delete(&mut self, range: Range<usize>) -> Result<(), EditError> {
        let range = self.clamp_range(range);
        if !range.is_empty() {
            tracing::trace!(target: "quire::range", ?range, "delete");
            self.surface.delete_text(range)?;
        }
        Ok(())
    }

    pub fn replace(&mut self, range: Range<usize>, text: &str) -> Result<usize, EditError> {
        let range = self.clamp_range(range);
        self.surface.replace_text(range.clone(), text)?;
        Ok(range.start + text.chars().count())
    }

    pub fn select(&mut self, selection: Selection) -> Result<(), EditError> {
        let len = self.surface.len_chars();
        let clamped = Selection::new(selection.anchor.min(len), selection.head.min(len));
        self.surface.select(clamped)?;
        Ok(())
    }

    pub fn insert_marker(&mut self, offset: usize) -> Result<MarkerToken, EditError> {
        let token = MarkerToken::fresh();
        let at = offset.min(self.surface.len_chars());
        self.surface.insert_marker(at, token)?;
        Ok(token)
    }

    pub fn marker_offset(&self, token: MarkerToken) -> Option<usize> {
        self.surface.marker_offset(token)
    }

    pub fn remove_marker(&mut self, token: MarkerToken) -> Result<(), EditError> {
        self.surface.remove_marker(token)?;
        Ok(())
    }

    fn clamp_range(&self, range: Range<usize>) -> Range<usize> {
        let len = self.surface.len_chars();
        let end = range.end.min(len);
        range.start.min(end)..end
    }
}

fn log_skipped(op: &str, err: Option<EditError>) {
    match err {
        None => {}
        Some(e) if e.is_benign() => {
            tracing::debug!(target: "quire::range", op, reason = %e, "skipped");
        }
        Some(e) => {
            tracing::warn!(target: "quire::range", op, error = %e, "range operation failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::HeadlessSurface;

    fn adapter(text: &str, sel: Selection) -> RangeAdapter<HeadlessSurface> {
        RangeAdapter::new(HeadlessSurface::with_selection(text, sel))
    }

    #[test]
    fn test_wrap_keeps_text_selected() {
        let mut r = adapter("say hello there", Selection::new(4, 9));
        let sel = r.get_selection().unwrap();
        r.wrap(&sel, "~~", "~~");
        assert_eq!(r.text(), "say ~~hello~~ there");
        let after = r.get_selection().unwrap();
        assert_eq!(r.text_under(&after).as_deref(), Some("hello"));
    }

    #[test]
    fn test_wrap_preserves_backwards_selection() {
        let mut r = adapter("abc", Selection::new(3, 0));
        let sel = r.get_selection().unwrap();
        r.wrap(&sel, "<b>", "</b>");
        assert_eq!(r.get_selection(), Some(Selection::new(6, 3)));
    }

    #[test]
    fn test_noop_without_selection() {
        let mut r = RangeAdapter::new(HeadlessSurface::new("text"));
        r.insert_at(0, "x");
        r.wrap(&Selection::new(0, 4), "[", "]");
        r.set_cursor(2);
        assert_eq!(r.text(), "text");
        assert_eq!(r.get_selection(), None);
        assert!(matches!(r.require_selection(), Err(EditError::NoSelection)));
    }

    #[test]
    fn test_noop_when_outside() {
        let mut surface = HeadlessSurface::new("text");
        surface.select_outside();
        let mut r = RangeAdapter::new(surface);
        r.insert_at(0, "x");
        assert_eq!(r.text(), "text");
        assert!(matches!(r.require_selection(), Err(EditError::OutsideSurface)));
    }

    #[test]
    fn test_insert_and_cursor() {
        let mut r = adapter("ab", Selection::collapsed(1));
        r.insert_at(1, "--");
        r.set_cursor(3);
        assert_eq!(r.text(), "a--b");
        assert_eq!(r.get_selection(), Some(Selection::collapsed(3)));
    }

    #[test]
    fn test_offsets_clamp_to_document() {
        let mut r = adapter("ab", Selection::collapsed(0));
        assert_eq!(r.insert(50, "c").unwrap(), 3);
        assert_eq!(r.text(), "abc");
        r.set_cursor(99);
        assert_eq!(r.get_selection(), Some(Selection::collapsed(3)));
        assert_eq!(r.slice(1..99).as_deref(), Some("bc"));
    }
}
