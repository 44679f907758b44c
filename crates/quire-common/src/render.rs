//! Markdown to HTML.

use pulldown_cmark::{Options, Parser, html};

/// Pure markdown to HTML conversion.
pub trait MarkdownRenderer {
    fn render(&self, markdown: &str) -> String;
}

/// CommonMark renderer. Inline HTML such as `<b>` or `<blue>` passes through.
#[derive(Debug, Clone, Copy)]
pub struct CmarkRenderer {
    options: Options,
}

impl Default for CmarkRenderer {
    fn default() -> Self {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_TABLES);
        Self { options }
    }
}

impl CmarkRenderer {
    pub fn with_options(options: Options) -> Self {
        Self { options }
    }
}

impl MarkdownRenderer for CmarkRenderer {
    fn render(&self, markdown: &str) -> String {
        let parser = Parser::new_ext(markdown, self.options);
        let mut out = String::with_capacity(markdown.len() * 3 / 2);
        html::push_html(&mut out, parser);
        tracing::trace!(target: "quire::render", input = markdown.len(), output = out.len(), "rendered");
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inline_tags_pass_through() {
        let html = CmarkRenderer::default().render("a <b>bold</b> and <blue>blue</blue> ~~gone~~");
        insta::assert_snapshot!(html.trim_end(), @"<p>a <b>bold</b> and <blue>blue</blue> <del>gone</del></p>");
    }

    #[test]
    fn test_lists_and_quotes() {
        let html = CmarkRenderer::default().render("> quoted\n\n* one\n* two\n");
        insta::assert_snapshot!(html.trim_end(), @r"
        <blockquote>
        <p>quoted</p>
        </blockquote>
        <ul>
        <li>one</li>
        <li>two</li>
        </ul>
        ");
    }
}
