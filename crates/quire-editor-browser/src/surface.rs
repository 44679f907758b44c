//! Contenteditable implementation of [`EditableSurface`].
//!
//! The textual projection is the concatenation of every text node under the
//! editable element, in document order. The element is expected to render
//! with `white-space: pre-wrap` so that `\n` in text nodes is a line break;
//! markers are empty `<span>`s and contribute nothing to the projection.
//!
//! DOM offsets are UTF-16 code units; the editor works in chars. Conversion
//! happens at this boundary and nowhere else.

use std::ops::Range;

use quire_editor_core::{
    EditableSurface, MarkerToken, Rect, Selection, SelectionProbe, SmolStr, SurfaceError,
};
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlElement, Node};

const SHOW_TEXT: u32 = 0x4;
const MARKER_ATTR: &str = "data-quire-marker";

/// A DOM boundary point: node plus UTF-16 offset.
type Boundary = (Node, u32);

pub struct DomSurface {
    area: HtmlElement,
    document: Document,
}

impl DomSurface {
    pub fn new(area: HtmlElement) -> Result<Self, SurfaceError> {
        let document = area
            .owner_document()
            .ok_or("editable element is not attached to a document")?;
        Ok(Self { area, document })
    }

    pub fn area(&self) -> &HtmlElement {
        &self.area
    }

    fn dom_selection(&self) -> Option<web_sys::Selection> {
        web_sys::window()?.get_selection().ok().flatten()
    }

    /// Text nodes under the area, in document order.
    fn text_nodes(&self) -> Result<Vec<web_sys::Text>, SurfaceError> {
        let walker = self
            .document
            .create_tree_walker_with_what_to_show(&self.area, SHOW_TEXT)
            .map_err(|e| format!("create_tree_walker failed: {:?}", e))?;
        let mut nodes = Vec::new();
        while let Ok(Some(node)) = walker.next_node() {
            if let Ok(text) = node.dyn_into::<web_sys::Text>() {
                nodes.push(text);
            }
        }
        Ok(nodes)
    }

    /// Map a char offset onto a boundary point inside a text node.
    ///
    /// Offsets on a node seam resolve to the end of the earlier node. An
    /// area with no text nodes maps everything to `(area, 0)`.
    fn boundary_at(&self, char_offset: usize) -> Result<Boundary, SurfaceError> {
        let mut remaining = char_offset;
        let mut last: Option<(web_sys::Text, String)> = None;
        for node in self.text_nodes()? {
            let data = node.data();
            let len = data.chars().count();
            if remaining <= len {
                let utf16: usize = data.chars().take(remaining).map(char::len_utf16).sum();
                return Ok((node.into(), utf16 as u32));
            }
            remaining -= len;
            last = Some((node, data));
        }
        match last {
            Some((node, data)) => {
                let end = data.encode_utf16().count() as u32;
                Ok((node.into(), end))
            }
            None => Ok((self.area.clone().into(), 0)),
        }
    }

    /// Char offset of a DOM boundary point, measured from the area start.
    fn offset_of(&self, node: &Node, offset: u32) -> Result<usize, SurfaceError> {
        let range = self
            .document
            .create_range()
            .map_err(|e| format!("create_range failed: {:?}", e))?;
        range
            .set_start(&self.area, 0)
            .map_err(|e| format!("set_start failed: {:?}", e))?;
        range
            .set_end(node, offset)
            .map_err(|e| format!("set_end failed: {:?}", e))?;
        Ok(String::from(range.to_string()).chars().count())
    }

    fn range_between(&self, start: &Boundary, end: &Boundary) -> Result<web_sys::Range, SurfaceError> {
        let range = self
            .document
            .create_range()
            .map_err(|e| format!("create_range failed: {:?}", e))?;
        range
            .set_start(&start.0, start.1)
            .map_err(|e| format!("set_start failed: {:?}", e))?;
        range
            .set_end(&end.0, end.1)
            .map_err(|e| format!("set_end failed: {:?}", e))?;
        Ok(range)
    }

    fn find_marker(&self, token: MarkerToken) -> Option<web_sys::Element> {
        let selector = format!("[{}='{}']", MARKER_ATTR, token);
        self.area.query_selector(&selector).ok().flatten()
    }

    fn check_bounds(&self, offset: usize) -> Result<(), SurfaceError> {
        let len = self.len_chars();
        if offset > len {
            return Err(format!("offset {offset} past end of document ({len})").into());
        }
        Ok(())
    }
}

impl EditableSurface for DomSurface {
    fn len_chars(&self) -> usize {
        self.text().chars().count()
    }

    fn char_at(&self, offset: usize) -> Option<char> {
        self.text().chars().nth(offset)
    }

    fn slice(&self, range: Range<usize>) -> Option<SmolStr> {
        let text = self.text();
        if range.start > range.end || range.end > text.chars().count() {
            return None;
        }
        Some(text.chars().skip(range.start).take(range.len()).collect())
    }

    fn text(&self) -> String {
        self.area.text_content().unwrap_or_default()
    }

    fn selection(&self) -> SelectionProbe {
        let Some(sel) = self.dom_selection() else {
            return SelectionProbe::Missing;
        };
        if sel.range_count() == 0 {
            return SelectionProbe::Missing;
        }
        let (Some(anchor), Some(focus)) = (sel.anchor_node(), sel.focus_node()) else {
            return SelectionProbe::Missing;
        };
        if !self.area.contains(Some(&anchor)) || !self.area.contains(Some(&focus)) {
            return SelectionProbe::Outside;
        }
        let anchor = self.offset_of(&anchor, sel.anchor_offset());
        let head = self.offset_of(&focus, sel.focus_offset());
        match (anchor, head) {
            (Ok(anchor), Ok(head)) => SelectionProbe::Inside(Selection::new(anchor, head)),
            (Err(e), _) | (_, Err(e)) => {
                tracing::warn!(target: "quire::dom", error = %e, "could not map selection");
                SelectionProbe::Missing
            }
        }
    }

    fn select(&mut self, selection: Selection) -> Result<(), SurfaceError> {
        let sel = self.dom_selection().ok_or("no selection object")?;
        let (anchor_node, anchor_offset) = self.boundary_at(selection.anchor)?;
        let (focus_node, focus_offset) = self.boundary_at(selection.head)?;
        tracing::trace!(target: "quire::dom", ?selection, "select");
        sel.set_base_and_extent(&anchor_node, anchor_offset, &focus_node, focus_offset)
            .map_err(|e| format!("set_base_and_extent failed: {:?}", e))?;
        Ok(())
    }

    fn insert_text(&mut self, offset: usize, text: &str) -> Result<(), SurfaceError> {
        self.check_bounds(offset)?;
        let (node, at) = self.boundary_at(offset)?;
        match node.dyn_ref::<web_sys::Text>() {
            Some(text_node) => text_node
                .insert_data(at, text)
                .map_err(|e| format!("insert_data failed: {:?}", e))?,
            None => {
                let fresh = self.document.create_text_node(text);
                self.area
                    .append_child(&fresh)
                    .map_err(|e| format!("append_child failed: {:?}", e))?;
            }
        }
        Ok(())
    }

    fn delete_text(&mut self, range: Range<usize>) -> Result<(), SurfaceError> {
        if range.start > range.end {
            return Err(format!("inverted delete range {range:?}").into());
        }
        self.check_bounds(range.end)?;
        if range.is_empty() {
            return Ok(());
        }
        let start = self.boundary_at(range.start)?;
        let end = self.boundary_at(range.end)?;
        self.range_between(&start, &end)?
            .delete_contents()
            .map_err(|e| format!("delete_contents failed: {:?}", e))?;
        Ok(())
    }

    fn insert_marker(&mut self, offset: usize, token: MarkerToken) -> Result<(), SurfaceError> {
        self.check_bounds(offset)?;
        let marker = self
            .document
            .create_element("span")
            .map_err(|e| format!("create_element failed: {:?}", e))?;
        marker
            .set_attribute(MARKER_ATTR, &token.to_string())
            .map_err(|e| format!("set_attribute failed: {:?}", e))?;
        let at = self.boundary_at(offset)?;
        let range = self.range_between(&at, &at)?;
        range
            .insert_node(&marker)
            .map_err(|e| format!("insert_node failed: {:?}", e))?;
        Ok(())
    }

    fn marker_offset(&self, token: MarkerToken) -> Option<usize> {
        let marker = self.find_marker(token)?;
        let marker: &Node = marker.as_ref();
        let parent = marker.parent_node()?;
        let children = parent.child_nodes();
        let index = (0..children.length()).find(|&i| {
            children
                .item(i)
                .is_some_and(|child| child.is_same_node(Some(marker)))
        })?;
        self.offset_of(&parent, index).ok()
    }

    fn remove_marker(&mut self, token: MarkerToken) -> Result<(), SurfaceError> {
        if let Some(marker) = self.find_marker(token) {
            marker.remove();
            // Rejoin the text node the marker split.
            self.area.normalize();
        }
        Ok(())
    }

    fn container_rect(&self) -> Option<Rect> {
        let r = self.area.get_bounding_client_rect();
        Some(Rect::new(r.x(), r.y(), r.width(), r.height()))
    }

    fn selection_rects(&self) -> Vec<Rect> {
        let Some(sel) = self.dom_selection() else {
            return vec![];
        };
        if sel.range_count() == 0 {
            return vec![];
        }
        let Ok(range) = sel.get_range_at(0) else {
            return vec![];
        };
        let Some(rects) = range.get_client_rects() else {
            return vec![];
        };
        (0..rects.length())
            .filter_map(|i| rects.get(i))
            .map(|r| Rect::new(r.x(), r.y(), r.width(), r.height()))
            .collect()
    }

    fn line_start(&self, offset: usize) -> usize {
        let chars: Vec<char> = self.text().chars().collect();
        let mut pos = offset.min(chars.len());
        while pos > 0 && chars[pos - 1] != '\n' {
            pos -= 1;
        }
        pos
    }

    fn line_end(&self, offset: usize) -> usize {
        let chars: Vec<char> = self.text().chars().collect();
        let mut pos = offset.min(chars.len());
        while pos < chars.len() && chars[pos] != '\n' {
            pos += 1;
        }
        pos
    }
}
