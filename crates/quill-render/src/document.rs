//! Render passes over a markdown document.

use pulldown_cmark::Parser;

use crate::dispatch::{Dispatcher, MAX_NESTING};
use crate::error::RenderError;
use crate::extensions::Extensions;
use crate::html::{HtmlFlags, HtmlRenderer};
use crate::renderer::Renderer;

/// Lifecycle of a single render pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum PassState {
    Idle,
    Rendering,
    Done,
    Failed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Mode {
    Document,
    Inline,
}

/// One pass over one input text.
struct RenderPass<'a> {
    text: &'a str,
    extensions: Extensions,
    mode: Mode,
    state: PassState,
}

impl<'a> RenderPass<'a> {
    fn new(text: &'a str, extensions: Extensions, mode: Mode) -> Self {
        Self {
            text,
            extensions,
            mode,
            state: PassState::Idle,
        }
    }

    fn transition(&mut self, next: PassState) {
        tracing::trace!(from = ?self.state, to = ?next, "Render pass state");
        self.state = next;
    }

    fn run<R: Renderer + ?Sized>(&mut self, renderer: &mut R) -> Result<String, RenderError> {
        tracing::debug!(
            bytes = self.text.len(),
            extensions = ?self.extensions,
            mode = ?self.mode,
            "Rendering markdown"
        );
        self.transition(PassState::Rendering);
        match self.drive(renderer) {
            Ok(output) => {
                self.transition(PassState::Done);
                Ok(output)
            }
            Err(err) => {
                self.transition(PassState::Failed);
                tracing::debug!(error = %err, "Render pass failed");
                Err(err)
            }
        }
    }

    fn drive<R: Renderer + ?Sized>(&self, renderer: &mut R) -> Result<String, RenderError> {
        let parser = Parser::new_ext(self.text, self.extensions.parser_options());
        let mut dispatcher = Dispatcher::new(
            self.text,
            renderer,
            self.extensions,
            self.mode == Mode::Inline,
            MAX_NESTING,
        );
        dispatcher.begin()?;
        for (event, range) in parser.into_offset_iter() {
            dispatcher.feed(event, range)?;
        }
        dispatcher.finish()?.into_string()
    }
}

/// Render `text` through `renderer`.
///
/// # Example
///
/// ```
/// use quill_render::{Extensions, Renderer, render};
///
/// struct Headings;
///
/// impl Renderer for Headings {
///     fn header(&mut self, content: &str, level: u8) -> Option<String> {
///         Some(format!("{level}:{content}\n"))
///     }
/// }
///
/// let out = render("# Title\n\nbody\n\n## Part\n", Extensions::empty(), &mut Headings).unwrap();
/// assert_eq!(out, "1:Title\n2:Part\n");
/// ```
pub fn render<R: Renderer + ?Sized>(text: &str, extensions: Extensions, renderer: &mut R) -> Result<String, RenderError> {
    RenderPass::new(text, extensions, Mode::Document).run(renderer)
}

/// Render `text` as inline content: top-level paragraphs get no paragraph
/// wrapper, and the document callbacks receive `inline_render = true`.
pub fn render_inline<R: Renderer + ?Sized>(
    text: &str,
    extensions: Extensions,
    renderer: &mut R,
) -> Result<String, RenderError> {
    RenderPass::new(text, extensions, Mode::Inline).run(renderer)
}

/// Render `text` to HTML with a fresh [`HtmlRenderer`].
///
/// ```
/// use quill_render::{Extensions, HtmlFlags, html};
///
/// let out = html("Hello, *world*", Extensions::empty(), HtmlFlags::empty()).unwrap();
/// assert_eq!(out, "<p>Hello, <em>world</em></p>\n");
/// ```
pub fn html(text: &str, extensions: Extensions, flags: HtmlFlags) -> Result<String, RenderError> {
    render(text, extensions, &mut HtmlRenderer::new(flags))
}

/// A renderer bound to an extension set, reusable across documents.
///
/// ```
/// use quill_render::{Extensions, HtmlFlags, HtmlRenderer, Markdown};
///
/// let mut md = Markdown::new(HtmlRenderer::new(HtmlFlags::empty()))
///     .with_extensions(Extensions::STRIKETHROUGH);
/// assert_eq!(md.render("~~old~~ new").unwrap(), "<p><del>old</del> new</p>\n");
/// assert_eq!(md.render_inline("*x*").unwrap(), "<em>x</em>");
/// ```
#[derive(Clone, Debug, Default)]
pub struct Markdown<R> {
    renderer: R,
    extensions: Extensions,
}

impl<R: Renderer> Markdown<R> {
    /// Wrap a renderer with no extensions enabled.
    pub fn new(renderer: R) -> Self {
        Self {
            renderer,
            extensions: Extensions::empty(),
        }
    }

    /// Set the extensions used by every subsequent render.
    #[must_use]
    pub fn with_extensions(mut self, extensions: Extensions) -> Self {
        self.extensions = extensions;
        self
    }

    #[must_use]
    pub fn extensions(&self) -> Extensions {
        self.extensions
    }

    /// Render a document.
    pub fn render(&mut self, text: &str) -> Result<String, RenderError> {
        render(text, self.extensions, &mut self.renderer)
    }

    /// Render raw bytes, which must be UTF-8.
    pub fn render_bytes(&mut self, bytes: &[u8]) -> Result<String, RenderError> {
        let text = std::str::from_utf8(bytes)?;
        self.render(text)
    }

    /// Render inline content. See [`render_inline`].
    pub fn render_inline(&mut self, text: &str) -> Result<String, RenderError> {
        render_inline(text, self.extensions, &mut self.renderer)
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn into_renderer(self) -> R {
        self.renderer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// Appends every method name it is called through.
    #[derive(Default)]
    struct Trace {
        calls: Vec<&'static str>,
    }

    impl Renderer for Trace {
        fn paragraph(&mut self, content: &str) -> Option<String> {
            self.calls.push("paragraph");
            Some(content.to_owned())
        }

        fn emphasis(&mut self, content: &str) -> Option<String> {
            self.calls.push("emphasis");
            Some(content.to_owned())
        }

        fn doc_header(&mut self, _inline_render: bool) -> Option<String> {
            self.calls.push("doc_header");
            None
        }

        fn doc_footer(&mut self, _inline_render: bool) -> Option<String> {
            self.calls.push("doc_footer");
            None
        }
    }

    #[test]
    fn test_pass_transitions_to_done() {
        let mut pass = RenderPass::new("text", Extensions::empty(), Mode::Document);
        assert_eq!(pass.state, PassState::Idle);
        pass.run(&mut Trace::default()).unwrap();
        assert_eq!(pass.state, PassState::Done);
    }

    #[test]
    fn test_callbacks_run_children_first() {
        let mut r = Trace::default();
        render("a *b*", Extensions::empty(), &mut r).unwrap();
        assert_eq!(r.calls, vec!["doc_header", "emphasis", "paragraph", "doc_footer"]);
    }

    #[test]
    fn test_render_empty_document() {
        assert_eq!(html("", Extensions::empty(), HtmlFlags::empty()).unwrap(), "");
    }

    #[test]
    fn test_markdown_reuses_renderer() {
        let mut md = Markdown::new(Trace::default());
        md.render("one").unwrap();
        md.render("two").unwrap();
        let calls = md.into_renderer().calls;
        assert_eq!(calls.iter().filter(|c| **c == "doc_header").count(), 2);
    }

    #[test]
    fn test_render_bytes_rejects_invalid_utf8() {
        let mut md = Markdown::new(HtmlRenderer::default());
        let err = md.render_bytes(&[b'a', 0xff, b'b']).unwrap_err();
        assert!(matches!(err, RenderError::InvalidUtf8(_)));
    }

    #[test]
    fn test_render_bytes_accepts_utf8() {
        let mut md = Markdown::new(HtmlRenderer::default());
        assert_eq!(md.render_bytes("*é*".as_bytes()).unwrap(), "<p><em>é</em></p>\n");
    }

    #[test]
    fn test_render_inline_html() {
        let out = render_inline("Hello *there*", Extensions::empty(), &mut HtmlRenderer::default()).unwrap();
        assert_eq!(out, "Hello <em>there</em>");
    }

    #[test]
    fn test_render_inline_keeps_other_blocks() {
        let out = render_inline("# Title", Extensions::empty(), &mut HtmlRenderer::default()).unwrap();
        assert_eq!(out, "<h1>Title</h1>\n");
    }

    #[test]
    fn test_markdown_extensions_builder() {
        let md = Markdown::new(HtmlRenderer::default()).with_extensions(Extensions::TABLES);
        assert_eq!(md.extensions(), Extensions::TABLES);
        assert_eq!(md.renderer().flags(), HtmlFlags::empty());
    }
}
