//! Core editor value types: selection, geometry and marker tokens.
//!
//! These types carry no references into any content tree. Positions are
//! char offsets into the surface's textual projection.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Text selection with anchor and head positions.
///
/// The anchor is where the selection started, the head is where the cursor is now.
/// They may be in any order - use `start()` and `end()` for ordered bounds.
#[derive(Clone, Debug, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    /// Where selection started
    pub anchor: usize,
    /// Where cursor is now (the platform's "focus")
    pub head: usize,
}

impl Selection {
    pub fn new(anchor: usize, head: usize) -> Self {
        Self { anchor, head }
    }

    /// Create a collapsed selection (cursor position).
    pub fn collapsed(offset: usize) -> Self {
        Self {
            anchor: offset,
            head: offset,
        }
    }

    pub fn start(&self) -> usize {
        self.anchor.min(self.head)
    }

    pub fn end(&self) -> usize {
        self.anchor.max(self.head)
    }

    pub fn is_collapsed(&self) -> bool {
        self.anchor == self.head
    }

    pub fn len(&self) -> usize {
        self.end() - self.start()
    }

    pub fn is_empty(&self) -> bool {
        self.is_collapsed()
    }

    /// Get as a std Range (start..end).
    pub fn to_range(&self) -> std::ops::Range<usize> {
        self.start()..self.end()
    }

    /// True if the head sits before the anchor.
    pub fn is_backwards(&self) -> bool {
        self.head < self.anchor
    }

    /// Build a selection over `start..end` that keeps this selection's direction.
    pub fn with_bounds(&self, start: usize, end: usize) -> Self {
        if self.is_backwards() {
            Self::new(end, start)
        } else {
            Self::new(start, end)
        }
    }
}

/// What the platform reports about the current selection.
///
/// `Missing` and `Outside` are both routine (focus loss, clicks elsewhere on
/// the page) and are kept apart only so logs can tell them apart.
#[derive(Clone, Debug, Copy, PartialEq, Eq)]
pub enum SelectionProbe {
    /// No selection exists at all.
    Missing,
    /// A selection exists but one of its ends lies outside the editable surface.
    Outside,
    /// A selection fully inside the surface.
    Inside(Selection),
}

impl SelectionProbe {
    pub fn selection(&self) -> Option<Selection> {
        match self {
            Self::Inside(sel) => Some(*sel),
            _ => None,
        }
    }
}

/// Axis-aligned rectangle in CSS pixels.
#[derive(Clone, Debug, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Express this rect relative to `origin`'s top-left corner.
    pub fn relative_to(&self, origin: &Rect) -> Rect {
        Rect::new(self.x - origin.x, self.y - origin.y, self.width, self.height)
    }
}

static NEXT_MARKER: AtomicU64 = AtomicU64::new(1);

/// Identity of a zero-width cursor marker placed in the surface.
///
/// Every call to [`MarkerToken::fresh`] yields a token no other live marker
/// shares, so surfaces look markers up by token rather than by class name.
#[derive(Clone, Debug, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MarkerToken(u64);

impl MarkerToken {
    pub fn fresh() -> Self {
        Self(NEXT_MARKER.fetch_add(1, Ordering::Relaxed))
    }

    pub fn id(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for MarkerToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "m{}", self.0)
    }
}
