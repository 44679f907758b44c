//! The editable surface abstraction.
//!
//! An `EditableSurface` is whatever the user is typing into: a
//! contenteditable element in the browser, or an in-memory buffer with a
//! fake layout in tests. The engines never see nodes. They address the
//! surface through char offsets into its textual projection, and the
//! implementation maps those back onto its own structure.

use std::ops::Range;

use smol_str::SmolStr;

use crate::error::SurfaceError;
use crate::types::{MarkerToken, Rect, Selection, SelectionProbe};

/// Platform text surface with a live selection.
pub trait EditableSurface {
    /// Length of the textual projection in chars.
    fn len_chars(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len_chars() == 0
    }

    /// Character at `offset`, or None past the end.
    fn char_at(&self, offset: usize) -> Option<char>;

    /// Text in `range`, or None if the range is out of bounds.
    fn slice(&self, range: Range<usize>) -> Option<SmolStr>;

    /// Full textual projection. This is the markdown source of the document.
    fn text(&self) -> String;

    /// Read the current platform selection.
    fn selection(&self) -> SelectionProbe;

    /// Replace the platform selection.
    fn select(&mut self, selection: Selection) -> Result<(), SurfaceError>;

    /// Insert `text` at `offset`, leaving the rest of the content untouched.
    fn insert_text(&mut self, offset: usize, text: &str) -> Result<(), SurfaceError>;

    /// Remove the chars in `range`.
    fn delete_text(&mut self, range: Range<usize>) -> Result<(), SurfaceError>;

    /// Replace `range` with `text`.
    fn replace_text(&mut self, range: Range<usize>, text: &str) -> Result<(), SurfaceError> {
        if !range.is_empty() {
            self.delete_text(range.clone())?;
        }
        if !text.is_empty() {
            self.insert_text(range.start, text)?;
        }
        Ok(())
    }

    /// Place a zero-width marker identified by `token` at `offset`.
    ///
    /// Markers contribute nothing to the textual projection.
    fn insert_marker(&mut self, offset: usize, token: MarkerToken) -> Result<(), SurfaceError>;

    /// Current offset of the marker, if it is still present.
    fn marker_offset(&self, token: MarkerToken) -> Option<usize>;

    /// Remove the marker. Removing a marker that is already gone is not an error.
    fn remove_marker(&mut self, token: MarkerToken) -> Result<(), SurfaceError>;

    /// Bounding rectangle of the editable container, in viewport coordinates.
    fn container_rect(&self) -> Option<Rect>;

    /// Client rectangles of the current selection, one per rendered line box,
    /// in viewport coordinates and document order.
    fn selection_rects(&self) -> Vec<Rect>;

    /// Offset of the first character on the line containing `offset`.
    fn line_start(&self, offset: usize) -> usize {
        let mut pos = offset.min(self.len_chars());
        while pos > 0 {
            if let Some('\n') = self.char_at(pos - 1) {
                return pos;
            }
            pos -= 1;
        }
        0
    }

    /// Offset of the newline ending the line containing `offset`, or the end
    /// of the document.
    fn line_end(&self, offset: usize) -> usize {
        let len = self.len_chars();
        let mut pos = offset.min(len);
        while pos < len {
            if let Some('\n') = self.char_at(pos) {
                return pos;
            }
            pos += 1;
        }
        len
    }
}
