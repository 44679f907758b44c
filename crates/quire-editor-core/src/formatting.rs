//! Markdown formatting actions.
//!
//! Each action maps to a fixed delimiter pair. Inline actions wrap the
//! selection; list and quote actions prefix every affected line. `Clear`
//! strips whatever markers it can find around and inside the selection.

use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::EditError;
use crate::range::RangeAdapter;
use crate::surface::EditableSurface;
use crate::types::Selection;

/// Symbolic formatting action, as named by the toolbar buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FormatAction {
    Bold,
    Italic,
    Underline,
    Strike,
    Link,
    Image,
    Code,
    Quote,
    List,
    OrderedList,
    Blue,
    Green,
    Red,
    Yellow,
    Pink,
    Clear,
}

/// Prefix/suffix inserted around (or before) the selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delimiters {
    pub prefix: &'static str,
    pub suffix: &'static str,
}

impl Delimiters {
    const fn new(prefix: &'static str, suffix: &'static str) -> Self {
        Self { prefix, suffix }
    }
}

impl FormatAction {
    pub const ALL: [FormatAction; 16] = [
        Self::Bold,
        Self::Italic,
        Self::Underline,
        Self::Strike,
        Self::Link,
        Self::Image,
        Self::Code,
        Self::Quote,
        Self::List,
        Self::OrderedList,
        Self::Blue,
        Self::Green,
        Self::Red,
        Self::Yellow,
        Self::Pink,
        Self::Clear,
    ];

    /// Wire name of the action.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Bold => "bold",
            Self::Italic => "italic",
            Self::Underline => "underline",
            Self::Strike => "strike",
            Self::Link => "link",
            Self::Image => "image",
            Self::Code => "code",
            Self::Quote => "quote",
            Self::List => "list",
            Self::OrderedList => "orderedList",
            Self::Blue => "blue",
            Self::Green => "green",
            Self::Red => "red",
            Self::Yellow => "yellow",
            Self::Pink => "pink",
            Self::Clear => "clear",
        }
    }

    /// Delimiter pair for this action. `Clear` has none.
    pub fn delimiters(&self) -> Option<Delimiters> {
        let d = match self {
            Self::Bold => Delimiters::new("<b>", "</b>"),
            Self::Italic => Delimiters::new("<em>", "</em>"),
            Self::Underline => Delimiters::new("__", "__"),
            Self::Strike => Delimiters::new("~~", "~~"),
            Self::Link => Delimiters::new("[](", ")"),
            Self::Image => Delimiters::new("![](", ")"),
            Self::Code => Delimiters::new("`", "`"),
            Self::Quote => Delimiters::new("> ", ""),
            Self::List => Delimiters::new("* ", ""),
            Self::OrderedList => Delimiters::new("1. ", ""),
            Self::Blue => Delimiters::new("<blue>", "</blue>"),
            Self::Green => Delimiters::new("<green>", "</green>"),
            Self::Red => Delimiters::new("<red>", "</red>"),
            Self::Yellow => Delimiters::new("<yellow>", "</yellow>"),
            Self::Pink => Delimiters::new("<pink>", "</pink>"),
            Self::Clear => return None,
        };
        Some(d)
    }

    /// Whether the action prefixes lines instead of wrapping.
    pub fn is_line_prefix(&self) -> bool {
        matches!(self, Self::Quote | Self::List | Self::OrderedList)
    }
}

impl std::fmt::Display for FormatAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown format action: {0}")]
pub struct UnknownFormat(pub String);

impl FromStr for FormatAction {
    type Err = UnknownFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|a| a.name() == s)
            .ok_or_else(|| UnknownFormat(s.to_string()))
    }
}

/// Apply `action` to the current selection. Returns the selection afterwards.
pub fn apply_format<S: EditableSurface>(
    range: &mut RangeAdapter<S>,
    action: FormatAction,
) -> Result<Selection, EditError> {
    let sel = range.require_selection()?;
    tracing::debug!(target: "quire::format", %action, ?sel, "apply format");

    match action.delimiters() {
        None => clear_formatting(range, sel),
        Some(d) if action.is_line_prefix() => prefix_lines(range, sel, d.prefix),
        Some(d) if sel.is_collapsed() => {
            let at = sel.head;
            range.insert(at, &format!("{}{}", d.prefix, d.suffix))?;
            let cursor = Selection::collapsed(at + d.prefix.chars().count());
            range.select(cursor)?;
            Ok(cursor)
        }
        Some(d) => range.try_wrap(&sel, d.prefix, d.suffix),
    }
}

/// Insert `prefix` at the start of every line the selection touches.
///
/// A selection that ends exactly at a line start does not reach into that line.
fn prefix_lines<S: EditableSurface>(
    range: &mut RangeAdapter<S>,
    sel: Selection,
    prefix: &str,
) -> Result<Selection, EditError> {
    let plen = prefix.chars().count();
    let (start, end) = (sel.start(), sel.end());

    let mut starts = vec![range.line_start(start)];
    for pos in start + 1..end {
        if range.char_at(pos - 1) == Some('\n') {
            starts.push(pos);
        }
    }

    for &line in starts.iter().rev() {
        range.insert(line, prefix)?;
    }

    let result = if sel.is_collapsed() {
        Selection::collapsed(start + plen)
    } else {
        sel.with_bounds(start + plen, end + plen * starts.len())
    };
    range.select(result)?;
    Ok(result)
}

/// Wrap delimiters with the regex matching one span of each, longest prefix
/// first so `![](` wins over `[](`.
static PAIRED: LazyLock<Vec<(Delimiters, Regex)>> = LazyLock::new(|| {
    let mut all: Vec<(Delimiters, Regex)> = FormatAction::ALL
        .iter()
        .filter(|a| !a.is_line_prefix())
        .filter_map(|a| a.delimiters())
        .map(|d| {
            let pattern = format!(
                "(?s){}(.*?){}",
                regex::escape(d.prefix),
                regex::escape(d.suffix)
            );
            (d, Regex::new(&pattern).unwrap())
        })
        .collect();
    all.sort_by_key(|(d, _)| std::cmp::Reverse(d.prefix.len()));
    all
});

static STRAY_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"</?(?:b|em|blue|green|red|yellow|pink)>").unwrap());

static LINE_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^(?:> |[*-] |\d+\. )").unwrap());

static WHOLE_LINE_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:> |[*-] |\d+\. )$").unwrap());

/// Byte offset of char offset `at` in `text`, clamped to the end.
fn byte_offset(text: &str, at: usize) -> usize {
    text.char_indices().nth(at).map_or(text.len(), |(i, _)| i)
}

/// Whether one span of `re` covers exactly `span` (char offsets) in `text`.
/// Spans are matched left to right over the whole text.
fn is_single_span(text: &str, re: &Regex, span: std::ops::Range<usize>) -> bool {
    let (from, to) = (byte_offset(text, span.start), byte_offset(text, span.end));
    re.find_iter(text)
        .take_while(|m| m.start() <= from)
        .any(|m| m.start() == from && m.end() == to)
}

/// Remove inline markers and line prefixes from `text`.
///
/// `at_line_start` says whether the first char of `text` begins a line in
/// the document; if not, the first line keeps whatever it starts with.
pub fn strip_markers(text: &str, at_line_start: bool) -> String {
    let mut out = text.to_string();
    loop {
        let before = out.clone();
        for (_, re) in PAIRED.iter() {
            out = re.replace_all(&out, "$1").into_owned();
        }
        if out == before {
            break;
        }
    }
    out = STRAY_TAG.replace_all(&out, "").into_owned();
    if at_line_start {
        LINE_PREFIX.replace_all(&out, "").into_owned()
    } else {
        match out.split_once('\n') {
            Some((first, rest)) => format!("{first}\n{}", LINE_PREFIX.replace_all(rest, "")),
            None => out,
        }
    }
}

fn clear_formatting<S: EditableSurface>(
    range: &mut RangeAdapter<S>,
    sel: Selection,
) -> Result<Selection, EditError> {
    let (mut start, mut end) = (sel.start(), sel.end());

    // Peel delimiter pairs hugging the selection, but only when the opener
    // and closer belong to the same span.
    'peel: loop {
        let text = range.text();
        let len = text.chars().count();
        for (d, re) in PAIRED.iter() {
            let plen = d.prefix.chars().count();
            let slen = d.suffix.chars().count();
            if start < plen || end + slen > len {
                continue;
            }
            if is_single_span(&text, re, start - plen..end + slen) {
                range.delete(end..end + slen)?;
                range.delete(start - plen..start)?;
                start -= plen;
                end -= plen;
                continue 'peel;
            }
        }
        break;
    }

    // A line prefix sitting between the line start and the selection.
    let line = range.line_start(start);
    if line < start {
        let lead = range.slice(line..start).unwrap_or_default();
        if WHOLE_LINE_PREFIX.is_match(&lead) {
            let removed = start - line;
            range.delete(line..start)?;
            start -= removed;
            end -= removed;
        }
    }

    if start < end {
        let inner = range.slice(start..end).unwrap_or_default();
        let cleaned = strip_markers(&inner, range.line_start(start) == start);
        if cleaned != inner.as_str() {
            range.replace(start..end, &cleaned)?;
            end = start + cleaned.chars().count();
        }
    }

    let result = if sel.is_collapsed() {
        Selection::collapsed(start)
    } else {
        sel.with_bounds(start, end)
    };
    range.select(result)?;
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::HeadlessSurface;

    fn run(text: &str, sel: Selection, action: FormatAction) -> (String, Selection) {
        let mut r = RangeAdapter::new(HeadlessSurface::with_selection(text, sel));
        let after = apply_format(&mut r, action).unwrap();
        (r.text(), after)
    }

    #[test]
    fn test_collapsed_inserts_pair_with_cursor_between() {
        for action in FormatAction::ALL {
            let Some(d) = action.delimiters() else {
                continue;
            };
            if action.is_line_prefix() {
                continue;
            }
            let (text, sel) = run("ab", Selection::collapsed(1), action);
            assert_eq!(text, format!("a{}{}b", d.prefix, d.suffix), "{action}");
            let cursor = 1 + d.prefix.chars().count();
            assert_eq!(sel, Selection::collapsed(cursor), "{action}");
        }
    }

    #[test]
    fn test_wrap_keeps_original_text_selected() {
        for action in FormatAction::ALL {
            let Some(d) = action.delimiters() else {
                continue;
            };
            if action.is_line_prefix() {
                continue;
            }
            let mut r = RangeAdapter::new(HeadlessSurface::with_selection(
                "x word y",
                Selection::new(2, 6),
            ));
            let sel = apply_format(&mut r, action).unwrap();
            assert_eq!(r.text(), format!("x {}word{} y", d.prefix, d.suffix));
            assert_eq!(r.text_under(&sel).as_deref(), Some("word"));
        }
    }

    #[test]
    fn test_line_prefix_collapsed_moves_with_line() {
        let (text, sel) = run("first\nsecond", Selection::collapsed(9), FormatAction::Quote);
        assert_eq!(text, "first\n> second");
        assert_eq!(sel, Selection::collapsed(11));

        let (text, sel) = run("", Selection::collapsed(0), FormatAction::OrderedList);
        assert_eq!(text, "1. ");
        assert_eq!(sel, Selection::collapsed(3));
    }

    #[test]
    fn test_line_prefix_applies_to_every_line() {
        let (text, sel) = run("one\ntwo\nthree", Selection::new(1, 9), FormatAction::List);
        assert_eq!(text, "* one\n* two\n* three");
        assert_eq!(sel, Selection::new(3, 15));
    }

    #[test]
    fn test_line_prefix_stops_at_trailing_line_start() {
        let (text, _) = run("one\ntwo\nthree", Selection::new(0, 8), FormatAction::Quote);
        assert_eq!(text, "> one\n> two\nthree");
    }

    #[test]
    fn test_multiline_wrap_is_textual() {
        let (text, sel) = run("one\ntwo", Selection::new(0, 7), FormatAction::Bold);
        assert_eq!(text, "<b>one\ntwo</b>");
        assert_eq!(sel, Selection::new(3, 10));
    }

    #[test]
    fn test_bold_then_clear_round_trips() {
        let mut r = RangeAdapter::new(HeadlessSurface::with_selection(
            "hello world",
            Selection::new(6, 11),
        ));
        apply_format(&mut r, FormatAction::Bold).unwrap();
        assert_eq!(r.text(), "hello <b>world</b>");
        let sel = apply_format(&mut r, FormatAction::Clear).unwrap();
        assert_eq!(r.text(), "hello world");
        assert_eq!(sel, Selection::new(6, 11));
    }

    #[test]
    fn test_clear_nested_and_inner_markers() {
        let mut r = RangeAdapter::new(HeadlessSurface::with_selection(
            "a b c",
            Selection::new(0, 5),
        ));
        apply_format(&mut r, FormatAction::Italic).unwrap();
        apply_format(&mut r, FormatAction::Red).unwrap();
        assert_eq!(r.text(), "<em><red>a b c</red></em>");
        apply_format(&mut r, FormatAction::Clear).unwrap();
        assert_eq!(r.text(), "a b c");

        let (text, sel) = run(
            "x <b>bold</b> and ~~gone~~ y",
            Selection::new(0, 28),
            FormatAction::Clear,
        );
        assert_eq!(text, "x bold and gone y");
        assert_eq!(sel, Selection::new(0, 17));
    }

    #[test]
    fn test_clear_leaves_neighbouring_spans_alone() {
        let (text, sel) = run("`a` b `c`", Selection::new(3, 6), FormatAction::Clear);
        assert_eq!(text, "`a` b `c`");
        assert_eq!(sel, Selection::new(3, 6));

        let (text, sel) = run("~~a~~~~b~~", Selection::collapsed(5), FormatAction::Clear);
        assert_eq!(text, "~~a~~~~b~~");
        assert_eq!(sel, Selection::collapsed(5));

        let (text, _) = run("<b>a</b> <b>b</b>", Selection::new(8, 9), FormatAction::Clear);
        assert_eq!(text, "<b>a</b> <b>b</b>");
    }

    #[test]
    fn test_clear_line_prefixes() {
        let mut r = RangeAdapter::new(HeadlessSurface::with_selection(
            "alpha\nbeta",
            Selection::new(0, 10),
        ));
        apply_format(&mut r, FormatAction::Quote).unwrap();
        assert_eq!(r.text(), "> alpha\n> beta");
        apply_format(&mut r, FormatAction::Clear).unwrap();
        assert_eq!(r.text(), "alpha\nbeta");
    }

    #[test]
    fn test_clear_collapsed_removes_empty_pair() {
        let (text, sel) = run("a<b></b>b", Selection::collapsed(4), FormatAction::Clear);
        assert_eq!(text, "ab");
        assert_eq!(sel, Selection::collapsed(1));
    }

    #[test]
    fn test_image_is_not_mistaken_for_link() {
        let mut r = RangeAdapter::new(HeadlessSurface::with_selection(
            "pic",
            Selection::new(0, 3),
        ));
        apply_format(&mut r, FormatAction::Image).unwrap();
        assert_eq!(r.text(), "![](pic)");
        apply_format(&mut r, FormatAction::Clear).unwrap();
        assert_eq!(r.text(), "pic");
    }

    #[test]
    fn test_no_selection_is_reported() {
        let mut r = RangeAdapter::new(HeadlessSurface::new("abc"));
        let err = apply_format(&mut r, FormatAction::Bold).unwrap_err();
        assert!(err.is_benign());
        assert_eq!(r.text(), "abc");
    }

    #[test]
    fn test_names_round_trip_through_from_str() {
        assert_eq!("orderedList".parse::<FormatAction>(), Ok(FormatAction::OrderedList));
        let err = "heading".parse::<FormatAction>().unwrap_err();
        assert_eq!(err.to_string(), "unknown format action: heading");
        let json = serde_json::to_string(&FormatAction::OrderedList).unwrap();
        assert_eq!(json, "\"orderedList\"");
    }

    #[test]
    fn test_strip_markers_snapshot() {
        let input = "> <b>one</b> [](two)\n* `three` __four__\n12. <pink>five</pink>";
        insta::assert_snapshot!(strip_markers(input, true), @r"
        one two
        three four
        five
        ");
        insta::assert_snapshot!(strip_markers(input, false), @r"
        > one two
        three four
        five
        ");
    }
}
