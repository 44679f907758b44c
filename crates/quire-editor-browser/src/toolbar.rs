//! The floating toolbar element.

use quire_editor_core::{Toolbar, ToolbarPosition};
use web_sys::HtmlElement;

/// Toolbar backed by an absolutely positioned element inside the editor
/// container.
pub struct DomToolbar {
    element: HtmlElement,
}

impl DomToolbar {
    /// Wraps `element` and hides it.
    pub fn new(element: HtmlElement) -> Self {
        let mut toolbar = Self { element };
        toolbar.hide();
        toolbar
    }

    pub fn element(&self) -> &HtmlElement {
        &self.element
    }

    fn set_style(&self, property: &str, value: &str) {
        if let Err(e) = self.element.style().set_property(property, value) {
            tracing::warn!(target: "quire::toolbar", property, error = ?e, "failed to set style");
        }
    }
}

impl Toolbar for DomToolbar {
    fn show(&mut self, position: ToolbarPosition) {
        self.set_style("top", &format!("{}px", position.top));
        self.set_style("left", &format!("{}px", position.left));
        self.set_style("display", "flex");
    }

    fn hide(&mut self) {
        self.set_style("display", "none");
    }
}
