//! In-memory surface for tests and hosts without a rendering tree.
//!
//! Selection and markers follow the same adjustment rules the DOM applies to
//! live ranges when text data changes: positions after an insertion point
//! move right, positions inside a deleted span collapse onto its start.

use std::collections::HashMap;
use std::ops::Range;

use smol_str::SmolStr;

use crate::error::SurfaceError;
use crate::surface::EditableSurface;
use crate::text::{EditorRope, TextBuffer};
use crate::types::{MarkerToken, Rect, Selection, SelectionProbe};

/// Rope-backed [`EditableSurface`] with a scriptable layout.
#[derive(Clone, Debug)]
pub struct HeadlessSurface {
    text: EditorRope,
    selection: SelectionProbe,
    markers: HashMap<MarkerToken, usize>,
    container: Option<Rect>,
    rects: Vec<Rect>,
    reject_markers: bool,
    reject_selects: bool,
}

impl Default for HeadlessSurface {
    fn default() -> Self {
        Self::new("")
    }
}

impl HeadlessSurface {
    /// Surface holding `text` with no selection.
    pub fn new(text: &str) -> Self {
        Self {
            text: EditorRope::from_str(text),
            selection: SelectionProbe::Missing,
            markers: HashMap::new(),
            container: Some(Rect::default()),
            rects: Vec::new(),
            reject_markers: false,
            reject_selects: false,
        }
    }

    /// Surface holding `text` with the cursor at the end.
    pub fn with_cursor_at_end(text: &str) -> Self {
        let mut surface = Self::new(text);
        let end = surface.len_chars();
        surface.selection = SelectionProbe::Inside(Selection::collapsed(end));
        surface
    }

    /// Surface holding `text` with the given selection.
    pub fn with_selection(text: &str, selection: Selection) -> Self {
        let mut surface = Self::new(text);
        surface.selection = SelectionProbe::Inside(selection);
        surface
    }

    /// Drop the selection, as if focus left the page.
    pub fn clear_selection(&mut self) {
        self.selection = SelectionProbe::Missing;
    }

    /// Report a selection that extends outside the surface.
    pub fn select_outside(&mut self) {
        self.selection = SelectionProbe::Outside;
    }

    /// Set the geometry reported to the toolbar positioner.
    pub fn set_layout(&mut self, container: Rect, selection_rects: Vec<Rect>) {
        self.container = Some(container);
        self.rects = selection_rects;
    }

    /// Make every subsequent marker insertion fail.
    pub fn reject_markers(&mut self, reject: bool) {
        self.reject_markers = reject;
    }

    /// Make every subsequent `select` call fail.
    pub fn reject_selects(&mut self, reject: bool) {
        self.reject_selects = reject;
    }

    pub fn marker_count(&self) -> usize {
        self.markers.len()
    }

    fn shift_for_insert(&mut self, at: usize, len: usize) {
        let shift = |pos: &mut usize| {
            if *pos > at {
                *pos += len;
            }
        };
        if let SelectionProbe::Inside(sel) = &mut self.selection {
            shift(&mut sel.anchor);
            shift(&mut sel.head);
        }
        self.markers.values_mut().for_each(shift);
    }

    fn shift_for_delete(&mut self, range: &Range<usize>) {
        let removed = range.end - range.start;
        let shift = |pos: &mut usize| {
            if *pos >= range.end {
                *pos -= removed;
            } else if *pos > range.start {
                *pos = range.start;
            }
        };
        if let SelectionProbe::Inside(sel) = &mut self.selection {
            shift(&mut sel.anchor);
            shift(&mut sel.head);
        }
        self.markers.values_mut().for_each(shift);
    }
}

impl EditableSurface for HeadlessSurface {
    fn len_chars(&self) -> usize {
        self.text.len_chars()
    }

    fn char_at(&self, offset: usize) -> Option<char> {
        self.text.char_at(offset)
    }

    fn slice(&self, range: Range<usize>) -> Option<SmolStr> {
        self.text.slice(range)
    }

    fn text(&self) -> String {
        self.text.to_string()
    }

    fn selection(&self) -> SelectionProbe {
        self.selection
    }

    fn select(&mut self, selection: Selection) -> Result<(), SurfaceError> {
        if self.reject_selects {
            return Err("selection rejected".into());
        }
        let len = self.len_chars();
        if selection.anchor > len || selection.head > len {
            return Err(format!("selection {selection:?} past end of document ({len})").into());
        }
        self.selection = SelectionProbe::Inside(selection);
        Ok(())
    }

    fn insert_text(&mut self, offset: usize, text: &str) -> Result<(), SurfaceError> {
        let len = self.len_chars();
        if offset > len {
            return Err(format!("insert offset {offset} past end of document ({len})").into());
        }
        self.text.insert(offset, text);
        self.shift_for_insert(offset, text.chars().count());
        Ok(())
    }

    fn delete_text(&mut self, range: Range<usize>) -> Result<(), SurfaceError> {
        let len = self.len_chars();
        if range.start > range.end || range.end > len {
            return Err(format!("delete range {range:?} out of bounds ({len})").into());
        }
        self.text.delete(range.clone());
        self.shift_for_delete(&range);
        Ok(())
    }

    fn insert_marker(&mut self, offset: usize, token: MarkerToken) -> Result<(), SurfaceError> {
        if self.reject_markers {
            return Err("marker insertion rejected".into());
        }
        if offset > self.len_chars() {
            return Err(format!("marker offset {offset} past end of document").into());
        }
        self.markers.insert(token, offset);
        Ok(())
    }

    fn marker_offset(&self, token: MarkerToken) -> Option<usize> {
        self.markers.get(&token).copied()
    }

    fn remove_marker(&mut self, token: MarkerToken) -> Result<(), SurfaceError> {
        self.markers.remove(&token);
        Ok(())
    }

    fn container_rect(&self) -> Option<Rect> {
        self.container
    }

    fn selection_rects(&self) -> Vec<Rect> {
        match self.selection {
            SelectionProbe::Inside(sel) if !sel.is_collapsed() => self.rects.clone(),
            _ => Vec::new(),
        }
    }

    fn line_start(&self, offset: usize) -> usize {
        self.text.line_start(offset)
    }
}
