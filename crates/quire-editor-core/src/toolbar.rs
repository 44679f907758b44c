//! Floating context toolbar placement.
//!
//! Updates are deferred so layout has settled before geometry is read.
//! Each scheduled update takes a [`ToolbarTicket`]; scheduling again
//! invalidates every earlier ticket, so only the newest update ever lands.

use serde::{Deserialize, Serialize};

use crate::range::RangeAdapter;
use crate::surface::EditableSurface;
use crate::types::{Rect, SelectionProbe};

/// Vertical offset between the selection's last line and the toolbar.
pub const DEFAULT_GUTTER_PX: f64 = 25.0;
/// Delay before geometry is read after a selection change.
pub const DEFAULT_DELAY_MS: u32 = 10;

/// Toolbar position in container-relative CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ToolbarPosition {
    pub top: f64,
    pub left: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ToolbarState {
    pub visible: bool,
    pub position: Option<ToolbarPosition>,
}

impl ToolbarState {
    pub fn hidden() -> Self {
        Self::default()
    }

    pub fn shown(position: ToolbarPosition) -> Self {
        Self {
            visible: true,
            position: Some(position),
        }
    }
}

/// The toolbar element as the editor sees it.
pub trait Toolbar {
    fn show(&mut self, position: ToolbarPosition);
    fn hide(&mut self);
}

/// Toolbar that only remembers its last state. Used headless and in tests.
#[derive(Debug, Clone, Default)]
pub struct RecordingToolbar {
    pub state: ToolbarState,
    pub shows: usize,
    pub hides: usize,
}

impl Toolbar for RecordingToolbar {
    fn show(&mut self, position: ToolbarPosition) {
        self.state = ToolbarState::shown(position);
        self.shows += 1;
    }

    fn hide(&mut self) {
        self.state = ToolbarState::hidden();
        self.hides += 1;
    }
}

/// Handle for one deferred toolbar update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolbarTicket(u64);

impl ToolbarTicket {
    pub fn generation(&self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone)]
pub struct ToolbarPositioner {
    gutter: f64,
    generation: u64,
}

impl Default for ToolbarPositioner {
    fn default() -> Self {
        Self::new(DEFAULT_GUTTER_PX)
    }
}

impl ToolbarPositioner {
    pub fn new(gutter: f64) -> Self {
        Self {
            gutter,
            generation: 0,
        }
    }

    pub fn gutter(&self) -> f64 {
        self.gutter
    }

    /// Start a new update, superseding any pending one.
    pub fn schedule(&mut self) -> ToolbarTicket {
        self.generation += 1;
        ToolbarTicket(self.generation)
    }

    /// Whether `ticket` is still the newest update.
    pub fn is_current(&self, ticket: ToolbarTicket) -> bool {
        ticket.0 == self.generation
    }

    /// Work out where the toolbar belongs for the current selection.
    pub fn compute<S: EditableSurface>(&self, range: &RangeAdapter<S>) -> ToolbarState {
        let sel = match range.probe() {
            SelectionProbe::Inside(sel) if !sel.is_collapsed() => sel,
            probe => {
                tracing::trace!(target: "quire::toolbar", ?probe, "no ranged selection, hiding");
                return ToolbarState::hidden();
            }
        };
        let surface = range.surface();
        let Some(container) = surface.container_rect() else {
            return ToolbarState::hidden();
        };
        let Some(last) = surface.selection_rects().last().copied() else {
            tracing::trace!(target: "quire::toolbar", ?sel, "selection has no client rects");
            return ToolbarState::hidden();
        };
        ToolbarState::shown(self.place(&last, &container))
    }

    /// Position for a last-line rect, both in viewport coordinates.
    pub fn place(&self, last_line: &Rect, container: &Rect) -> ToolbarPosition {
        let rel = last_line.relative_to(container);
        ToolbarPosition {
            top: rel.y + self.gutter,
            left: rel.x,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::HeadlessSurface;
    use crate::types::Selection;

    fn laid_out(sel: Selection) -> RangeAdapter<HeadlessSurface> {
        let mut s = HeadlessSurface::with_selection("line one\nline two", sel);
        s.set_layout(
            Rect::new(100.0, 200.0, 600.0, 400.0),
            vec![
                Rect::new(110.0, 210.0, 300.0, 18.0),
                Rect::new(110.0, 230.0, 120.0, 18.0),
            ],
        );
        RangeAdapter::new(s)
    }

    #[test]
    fn test_positions_under_last_line() {
        let p = ToolbarPositioner::default();
        let state = p.compute(&laid_out(Selection::new(2, 14)));
        assert_eq!(
            state,
            ToolbarState::shown(ToolbarPosition {
                top: 30.0 + 25.0,
                left: 10.0
            })
        );
    }

    #[test]
    fn test_hidden_for_collapsed_missing_or_outside() {
        let p = ToolbarPositioner::default();
        assert_eq!(p.compute(&laid_out(Selection::collapsed(3))), ToolbarState::hidden());

        let mut r = laid_out(Selection::new(0, 4));
        r.surface_mut().clear_selection();
        assert_eq!(p.compute(&r), ToolbarState::hidden());

        r.surface_mut().select_outside();
        assert_eq!(p.compute(&r), ToolbarState::hidden());
    }

    #[test]
    fn test_hidden_without_rects() {
        let p = ToolbarPositioner::default();
        let r = RangeAdapter::new(HeadlessSurface::with_selection("abc", Selection::new(0, 2)));
        assert_eq!(p.compute(&r), ToolbarState::hidden());
    }

    #[test]
    fn test_newer_ticket_supersedes() {
        let mut p = ToolbarPositioner::default();
        let first = p.schedule();
        let second = p.schedule();
        assert!(!p.is_current(first));
        assert!(p.is_current(second));
    }
}
