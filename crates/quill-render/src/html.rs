//! HTML renderer.
//!
//! Produces the classic markdown-to-HTML output: one element per construct,
//! block elements followed by a newline, footnotes collected in a trailing
//! `<div class="footnotes">`.

use std::fmt::Write;

use bitflags::bitflags;

use crate::escape::escape_html;
use crate::renderer::{AutolinkType, ListFlags, Renderer, TableFlags};

bitflags! {
    /// Output options for [`HtmlRenderer`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct HtmlFlags: u8 {
        /// Drop raw HTML from the input.
        const SKIP_HTML      = 1 << 0;
        /// Escape raw HTML from the input instead of passing it through.
        const ESCAPE         = 1 << 1;
        /// Turn every newline inside a paragraph into a line break.
        const HARD_WRAP      = 1 << 2;
        /// Self-close void elements (`<br/>`, `<hr/>`, `<img .../>`).
        const USE_XHTML      = 1 << 3;
        /// Wrap a full document in `<div>`...`</div>`.
        const ROOT_CONTAINER = 1 << 4;
    }
}

const FLAG_NAMES: [(&str, HtmlFlags); 5] = [
    ("skip-html", HtmlFlags::SKIP_HTML),
    ("escape", HtmlFlags::ESCAPE),
    ("hard-wrap", HtmlFlags::HARD_WRAP),
    ("use-xhtml", HtmlFlags::USE_XHTML),
    ("root-container", HtmlFlags::ROOT_CONTAINER),
];

impl HtmlFlags {
    /// Look up a flag by its kebab-case name.
    #[must_use]
    pub fn from_config_name(name: &str) -> Option<Self> {
        FLAG_NAMES
            .iter()
            .find(|(candidate, _)| *candidate == name)
            .map(|(_, flag)| *flag)
    }

    /// Names of all known flags.
    pub fn names() -> impl Iterator<Item = &'static str> {
        FLAG_NAMES.iter().map(|(name, _)| *name)
    }
}

/// Renders every node kind to HTML.
///
/// # Example
///
/// ```
/// use quill_render::{Extensions, HtmlFlags, HtmlRenderer, render};
///
/// let mut renderer = HtmlRenderer::new(HtmlFlags::USE_XHTML).with_toc_level(2);
/// let out = render("# Intro\n\n---\n", Extensions::empty(), &mut renderer).unwrap();
/// assert_eq!(out, "<h1 id=\"toc_0\">Intro</h1>\n<hr/>\n");
/// ```
#[derive(Clone, Debug, Default)]
pub struct HtmlRenderer {
    flags: HtmlFlags,
    footnote_offset: u32,
    toc_level: u8,
    /// Anchored headers so far in the current pass.
    header_count: u32,
}

impl HtmlRenderer {
    #[must_use]
    pub fn new(flags: HtmlFlags) -> Self {
        Self {
            flags,
            ..Self::default()
        }
    }

    /// Shift footnote numbers by `offset`, for documents rendered in pieces.
    #[must_use]
    pub fn with_footnote_offset(mut self, offset: u32) -> Self {
        self.footnote_offset = offset;
        self
    }

    /// Give headers up to `level` an `id="toc_N"` anchor. Zero disables anchors.
    #[must_use]
    pub fn with_toc_level(mut self, level: u8) -> Self {
        self.toc_level = level;
        self
    }

    #[must_use]
    pub fn flags(&self) -> HtmlFlags {
        self.flags
    }

    fn void_end(&self) -> &'static str {
        if self.flags.contains(HtmlFlags::USE_XHTML) { "/>" } else { ">" }
    }

    fn passthrough_html(&self, text: &str) -> String {
        if self.flags.contains(HtmlFlags::SKIP_HTML) {
            String::new()
        } else if self.flags.contains(HtmlFlags::ESCAPE) {
            escape_html(text).into_owned()
        } else {
            text.to_owned()
        }
    }

    fn wrap(tag: &str, content: &str) -> Option<String> {
        if content.is_empty() {
            return None;
        }
        Some(format!("<{tag}>{content}</{tag}>"))
    }
}

impl Renderer for HtmlRenderer {
    fn blockcode(&mut self, text: &str, lang: &str) -> Option<String> {
        let mut out = String::from("<pre><code");
        if !lang.is_empty() {
            let _ = write!(out, r#" class="language-{}""#, escape_html(lang));
        }
        let _ = writeln!(out, ">{}</code></pre>", escape_html(text));
        Some(out)
    }

    fn blockquote(&mut self, content: &str) -> Option<String> {
        Some(format!("<blockquote>\n{content}</blockquote>\n"))
    }

    fn header(&mut self, content: &str, level: u8) -> Option<String> {
        if level <= self.toc_level {
            let anchor = self.header_count;
            self.header_count += 1;
            Some(format!("<h{level} id=\"toc_{anchor}\">{content}</h{level}>\n"))
        } else {
            Some(format!("<h{level}>{content}</h{level}>\n"))
        }
    }

    fn hrule(&mut self) -> Option<String> {
        Some(format!("<hr{}\n", self.void_end()))
    }

    fn list(&mut self, content: &str, flags: ListFlags) -> Option<String> {
        let tag = if flags.contains(ListFlags::ORDERED) { "ol" } else { "ul" };
        Some(format!("<{tag}>\n{content}</{tag}>\n"))
    }

    fn listitem(&mut self, content: &str, _flags: ListFlags) -> Option<String> {
        Some(format!("<li>{}</li>\n", content.trim_end_matches('\n')))
    }

    fn paragraph(&mut self, content: &str) -> Option<String> {
        if content.is_empty() {
            return Some(String::new());
        }
        if self.flags.contains(HtmlFlags::HARD_WRAP) {
            let br = format!("<br{}\n", self.void_end());
            return Some(format!("<p>{}</p>\n", content.replace('\n', &br)));
        }
        Some(format!("<p>{content}</p>\n"))
    }

    fn table(&mut self, content: &str) -> Option<String> {
        Some(format!("<table>\n{content}</table>\n"))
    }

    fn table_header(&mut self, content: &str) -> Option<String> {
        Some(format!("<thead>\n{content}</thead>\n"))
    }

    fn table_body(&mut self, content: &str) -> Option<String> {
        Some(format!("<tbody>\n{content}</tbody>\n"))
    }

    fn table_row(&mut self, content: &str) -> Option<String> {
        Some(format!("<tr>\n{content}</tr>\n"))
    }

    fn table_cell(&mut self, content: &str, flags: TableFlags) -> Option<String> {
        let tag = if flags.contains(TableFlags::HEADER) { "th" } else { "td" };
        let align = match flags.alignment() {
            TableFlags::ALIGN_LEFT => r#" style="text-align: left""#,
            TableFlags::ALIGN_RIGHT => r#" style="text-align: right""#,
            TableFlags::ALIGN_CENTER => r#" style="text-align: center""#,
            _ => "",
        };
        Some(format!("<{tag}{align}>{content}</{tag}>\n"))
    }

    fn footnotes(&mut self, content: &str) -> Option<String> {
        let list = if self.footnote_offset > 0 {
            format!("<ol start=\"{}\">", self.footnote_offset + 1)
        } else {
            "<ol>".to_owned()
        };
        Some(format!(
            "<div class=\"footnotes\">\n<hr{}\n{list}\n{content}\n</ol>\n</div>\n",
            self.void_end()
        ))
    }

    fn footnote_def(&mut self, content: &str, num: u32) -> Option<String> {
        let num = num + self.footnote_offset;
        let backref = format!(r##"&nbsp;<a href="#fnref{num}" rev="footnote">&#8617;</a>"##);
        let mut out = format!("\n<li id=\"fn{num}\">\n");
        // The back-reference goes inside the last paragraph when there is one.
        match content.rfind("</p>") {
            Some(pos) => {
                out.push_str(&content[..pos]);
                out.push_str(&backref);
                out.push_str(&content[pos..]);
            }
            None => {
                out.push_str(content);
                out.push_str(&backref);
            }
        }
        out.push_str("</li>\n");
        Some(out)
    }

    fn blockhtml(&mut self, text: &str) -> Option<String> {
        if self.flags.contains(HtmlFlags::SKIP_HTML) {
            return Some(String::new());
        }
        if self.flags.contains(HtmlFlags::ESCAPE) {
            return Some(escape_html(text).into_owned());
        }
        let trimmed = text.trim_matches('\n');
        if trimmed.is_empty() {
            return Some(String::new());
        }
        Some(format!("{trimmed}\n"))
    }

    fn autolink(&mut self, link: &str, kind: AutolinkType) -> Option<String> {
        if link.is_empty() {
            return None;
        }
        let scheme = match kind {
            AutolinkType::Email => "mailto:",
            AutolinkType::Normal => "",
        };
        let link = escape_html(link);
        Some(format!(r#"<a href="{scheme}{link}">{link}</a>"#))
    }

    fn codespan(&mut self, text: &str) -> Option<String> {
        Some(format!("<code>{}</code>", escape_html(text)))
    }

    fn double_emphasis(&mut self, content: &str) -> Option<String> {
        Self::wrap("strong", content)
    }

    fn emphasis(&mut self, content: &str) -> Option<String> {
        Self::wrap("em", content)
    }

    fn underline(&mut self, content: &str) -> Option<String> {
        Self::wrap("u", content)
    }

    fn highlight(&mut self, content: &str) -> Option<String> {
        Self::wrap("mark", content)
    }

    fn quote(&mut self, content: &str) -> Option<String> {
        Self::wrap("q", content)
    }

    fn image(&mut self, link: &str, title: &str, alt: &str) -> Option<String> {
        let mut out = format!(r#"<img src="{}" alt="{}""#, escape_html(link), escape_html(alt));
        if !title.is_empty() {
            let _ = write!(out, r#" title="{}""#, escape_html(title));
        }
        out.push_str(self.void_end());
        Some(out)
    }

    fn linebreak(&mut self) -> Option<String> {
        Some(format!("<br{}\n", self.void_end()))
    }

    fn link(&mut self, content: &str, link: &str, title: &str) -> Option<String> {
        let mut out = format!(r#"<a href="{}""#, escape_html(link));
        if !title.is_empty() {
            let _ = write!(out, r#" title="{}""#, escape_html(title));
        }
        let _ = write!(out, ">{content}</a>");
        Some(out)
    }

    fn triple_emphasis(&mut self, content: &str) -> Option<String> {
        if content.is_empty() {
            return None;
        }
        Some(format!("<strong><em>{content}</em></strong>"))
    }

    fn strikethrough(&mut self, content: &str) -> Option<String> {
        Self::wrap("del", content)
    }

    fn superscript(&mut self, content: &str) -> Option<String> {
        Self::wrap("sup", content)
    }

    fn footnote_ref(&mut self, num: u32) -> Option<String> {
        let num = num + self.footnote_offset;
        Some(format!(
            r##"<sup id="fnref{num}"><a href="#fn{num}" rel="footnote">{num}</a></sup>"##
        ))
    }

    fn math(&mut self, text: &str, display_mode: bool) -> Option<String> {
        let (open, close) = if display_mode { ("\\[", "\\]") } else { ("\\(", "\\)") };
        Some(format!("{open}{}{close}", escape_html(text)))
    }

    fn raw_html(&mut self, text: &str) -> Option<String> {
        Some(self.passthrough_html(text))
    }

    fn entity(&mut self, text: &str) -> Option<String> {
        Some(text.to_owned())
    }

    fn normal_text(&mut self, text: &str) -> Option<String> {
        Some(escape_html(text).into_owned())
    }

    fn doc_header(&mut self, inline_render: bool) -> Option<String> {
        self.header_count = 0;
        if self.flags.contains(HtmlFlags::ROOT_CONTAINER) && !inline_render {
            return Some("<div>\n".to_owned());
        }
        None
    }

    fn doc_footer(&mut self, inline_render: bool) -> Option<String> {
        if self.flags.contains(HtmlFlags::ROOT_CONTAINER) && !inline_render {
            return Some("</div>\n".to_owned());
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{html, render, render_inline};
    use crate::extensions::Extensions;
    use pretty_assertions::assert_eq;

    fn render_html(markdown: &str) -> String {
        html(markdown, Extensions::empty(), HtmlFlags::empty()).unwrap()
    }

    fn render_with(markdown: &str, extensions: Extensions, flags: HtmlFlags) -> String {
        html(markdown, extensions, flags).unwrap()
    }

    #[test]
    fn test_html_basic_paragraph() {
        assert_eq!(render_html("Hello, world"), "<p>Hello, world</p>\n");
    }

    #[test]
    fn test_html_heading() {
        assert_eq!(render_html("# Heading\n"), "<h1>Heading</h1>\n");
        assert_eq!(render_html("Title\n-----\n"), "<h2>Title</h2>\n");
    }

    #[test]
    fn test_html_escapes_text() {
        assert_eq!(render_html("a < b & c"), "<p>a &lt; b &amp; c</p>\n");
    }

    #[test]
    fn test_html_entity_kept() {
        assert_eq!(render_html("&copy; 2024"), "<p>&copy; 2024</p>\n");
    }

    #[test]
    fn test_html_code_block() {
        assert_eq!(
            render_html("```rust\nfn main() {}\n```\n"),
            "<pre><code class=\"language-rust\">fn main() {}\n</code></pre>\n"
        );
        assert_eq!(
            render_html("    a < b\n"),
            "<pre><code>a &lt; b\n</code></pre>\n"
        );
    }

    #[test]
    fn test_html_blockquote() {
        assert_eq!(
            render_html("> quote"),
            "<blockquote>\n<p>quote</p>\n</blockquote>\n"
        );
    }

    #[test]
    fn test_html_hrule() {
        assert_eq!(render_html("***\n"), "<hr>\n");
        assert_eq!(
            render_with("***\n", Extensions::empty(), HtmlFlags::USE_XHTML),
            "<hr/>\n"
        );
    }

    #[test]
    fn test_html_lists() {
        assert_eq!(render_html("- a\n- b\n"), "<ul>\n<li>a</li>\n<li>b</li>\n</ul>\n");
        assert_eq!(render_html("1. a\n2. b\n"), "<ol>\n<li>a</li>\n<li>b</li>\n</ol>\n");
        assert_eq!(
            render_html("- a\n\n- b\n"),
            "<ul>\n<li><p>a</p></li>\n<li><p>b</p></li>\n</ul>\n"
        );
    }

    #[test]
    fn test_html_table() {
        let out = render_with(
            "| A | B |\n|---|:-:|\n| 1 | 2 |\n",
            Extensions::TABLES,
            HtmlFlags::empty(),
        );
        assert_eq!(
            out,
            "<table>\n<thead>\n<tr>\n<th>A</th>\n<th style=\"text-align: center\">B</th>\n</tr>\n</thead>\n\
             <tbody>\n<tr>\n<td>1</td>\n<td style=\"text-align: center\">2</td>\n</tr>\n</tbody>\n</table>\n"
        );
    }

    #[test]
    fn test_html_footnotes() {
        let out = render_with(
            "Text[^1].\n\n[^1]: Note.\n",
            Extensions::FOOTNOTES,
            HtmlFlags::empty(),
        );
        assert!(out.starts_with(
            "<p>Text<sup id=\"fnref1\"><a href=\"#fn1\" rel=\"footnote\">1</a></sup>.</p>\n"
        ));
        assert!(out.contains(
            "<li id=\"fn1\">\n<p>Note.&nbsp;<a href=\"#fnref1\" rev=\"footnote\">&#8617;</a></p>\n</li>\n"
        ));
        assert!(out.starts_with("<p>") && out.ends_with("</ol>\n</div>\n"));
        assert!(out.contains("<div class=\"footnotes\">\n<hr>\n<ol>\n"));
    }

    #[test]
    fn test_html_footnote_offset() {
        let mut renderer = HtmlRenderer::default().with_footnote_offset(3);
        let out = render("Text[^a].\n\n[^a]: Note.\n", Extensions::FOOTNOTES, &mut renderer).unwrap();
        assert!(out.contains("<sup id=\"fnref4\"><a href=\"#fn4\" rel=\"footnote\">4</a></sup>"));
        assert!(out.contains("<ol start=\"4\">"));
        assert!(out.contains("<li id=\"fn4\">"));
    }

    #[test]
    fn test_footnote_def_without_paragraph() {
        let mut renderer = HtmlRenderer::default();
        assert_eq!(
            renderer.footnote_def("bare", 2).unwrap(),
            "\n<li id=\"fn2\">\nbare&nbsp;<a href=\"#fnref2\" rev=\"footnote\">&#8617;</a></li>\n"
        );
    }

    #[test]
    fn test_html_emphasis_family() {
        assert_eq!(
            render_html("*a* **b** ***c***"),
            "<p><em>a</em> <strong>b</strong> <strong><em>c</em></strong></p>\n"
        );
    }

    #[test]
    fn test_html_strikethrough_and_superscript() {
        let ext = Extensions::STRIKETHROUGH | Extensions::SUPERSCRIPT;
        assert_eq!(
            render_with("~~gone~~ ^2^", ext, HtmlFlags::empty()),
            "<p><del>gone</del> <sup>2</sup></p>\n"
        );
    }

    #[test]
    fn test_html_underline_highlight_quote() {
        let ext = Extensions::UNDERLINE | Extensions::HIGHLIGHT | Extensions::QUOTE;
        assert_eq!(
            render_with("_u_ ==m== \"q\"", ext, HtmlFlags::empty()),
            "<p><u>u</u> <mark>m</mark> <q>q</q></p>\n"
        );
    }

    #[test]
    fn test_html_highlight_around_markup() {
        let ext = Extensions::HIGHLIGHT | Extensions::QUOTE;
        assert_eq!(
            render_with("a ==x *y* z== b", ext, HtmlFlags::empty()),
            "<p>a <mark>x <em>y</em> z</mark> b</p>\n"
        );
        assert_eq!(
            render_with("\"a `c` b\"", ext, HtmlFlags::empty()),
            "<p><q>a <code>c</code> b</q></p>\n"
        );
        assert_eq!(render_with("\"a", ext, HtmlFlags::empty()), "<p>&quot;a</p>\n");
    }

    #[test]
    fn test_html_links() {
        assert_eq!(
            render_html("[text](http://x.com \"T\")"),
            "<p><a href=\"http://x.com\" title=\"T\">text</a></p>\n"
        );
        assert_eq!(
            render_html("<https://example.com>"),
            "<p><a href=\"https://example.com\">https://example.com</a></p>\n"
        );
        assert_eq!(
            render_html("<me@example.com>"),
            "<p><a href=\"mailto:me@example.com\">me@example.com</a></p>\n"
        );
    }

    #[test]
    fn test_html_bare_autolink() {
        assert_eq!(
            render_with("see https://example.com now", Extensions::AUTOLINK, HtmlFlags::empty()),
            "<p>see <a href=\"https://example.com\">https://example.com</a> now</p>\n"
        );
    }

    #[test]
    fn test_html_image() {
        assert_eq!(
            render_html("![Alt](img.png \"T\")"),
            "<p><img src=\"img.png\" alt=\"Alt\" title=\"T\"></p>\n"
        );
        assert_eq!(
            render_with("![Alt](img.png)", Extensions::empty(), HtmlFlags::USE_XHTML),
            "<p><img src=\"img.png\" alt=\"Alt\"/></p>\n"
        );
    }

    #[test]
    fn test_html_breaks() {
        assert_eq!(render_html("a\\\nb"), "<p>a<br>\nb</p>\n");
        assert_eq!(render_html("a\nb"), "<p>a\nb</p>\n");
        assert_eq!(
            render_with("a\nb", Extensions::empty(), HtmlFlags::HARD_WRAP),
            "<p>a<br>\nb</p>\n"
        );
    }

    #[test]
    fn test_html_math() {
        assert_eq!(
            render_with("$x^2$", Extensions::MATH, HtmlFlags::empty()),
            "<p>\\(x^2\\)</p>\n"
        );
    }

    #[test]
    fn test_html_raw_html_modes() {
        let input = "a <b>bold</b>";
        assert_eq!(render_html(input), "<p>a <b>bold</b></p>\n");
        assert_eq!(
            render_with(input, Extensions::empty(), HtmlFlags::SKIP_HTML),
            "<p>a bold</p>\n"
        );
        assert_eq!(
            render_with(input, Extensions::empty(), HtmlFlags::ESCAPE),
            "<p>a &lt;b&gt;bold&lt;/b&gt;</p>\n"
        );
    }

    #[test]
    fn test_html_block_html() {
        let input = "<div>\nhi\n</div>\n";
        assert_eq!(render_html(input), "<div>\nhi\n</div>\n");
        assert_eq!(render_with(input, Extensions::empty(), HtmlFlags::SKIP_HTML), "");
    }

    #[test]
    fn test_html_root_container() {
        assert_eq!(
            render_with("x", Extensions::empty(), HtmlFlags::ROOT_CONTAINER),
            "<div>\n<p>x</p>\n</div>\n"
        );
        let mut renderer = HtmlRenderer::new(HtmlFlags::ROOT_CONTAINER);
        assert_eq!(render_inline("x", Extensions::empty(), &mut renderer).unwrap(), "x");
    }

    #[test]
    fn test_html_toc_anchors_reset_per_pass() {
        let mut renderer = HtmlRenderer::default().with_toc_level(2);
        let text = "# A\n## B\n### C\n";
        let expected = "<h1 id=\"toc_0\">A</h1>\n<h2 id=\"toc_1\">B</h2>\n<h3>C</h3>\n";
        assert_eq!(render(text, Extensions::empty(), &mut renderer).unwrap(), expected);
        assert_eq!(render(text, Extensions::empty(), &mut renderer).unwrap(), expected);
    }

    #[test]
    fn test_nesting_ceiling_html() {
        let text = format!("{} deep\n", ">".repeat(17));
        let out = render_html(&text);
        assert_eq!(out.matches("<blockquote>").count(), 16);
        assert!(out.contains("deep"));
        assert!(!out.contains("<p>"));
    }

    #[test]
    fn test_flag_names() {
        assert_eq!(HtmlFlags::from_config_name("hard-wrap"), Some(HtmlFlags::HARD_WRAP));
        assert_eq!(HtmlFlags::from_config_name("nope"), None);
        assert_eq!(HtmlFlags::names().count(), 5);
    }

    #[test]
    fn test_flag_config_names_are_kebab_case() {
        assert_eq!(HtmlFlags::from_config_name("use-xhtml"), Some(HtmlFlags::USE_XHTML));
        assert_eq!(HtmlFlags::from_config_name("USE_XHTML"), None);
        assert_eq!(HtmlFlags::from_name("USE_XHTML"), Some(HtmlFlags::USE_XHTML));
    }
}
