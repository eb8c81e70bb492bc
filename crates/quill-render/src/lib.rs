//! Markdown rendering through pluggable per-construct callbacks.
//!
//! A markdown document is parsed into constructs (paragraphs, headers,
//! emphasis, links, ...). For each one the dispatcher calls the matching
//! method of a [`Renderer`], passing the already-rendered content of its
//! children. Whatever the method returns is spliced into the parent.
//!
//! # Architecture
//!
//! - [`Renderer`]: one method per [`NodeKind`], each defaulting to `None`.
//! - [`REGISTRY`]: per-kind metadata, including the fallback applied when a
//!   renderer returns `None`.
//! - [`render`] / [`render_inline`] / [`Markdown`]: drive a render pass.
//! - [`HtmlRenderer`] and [`TocRenderer`]: ready-made renderers.
//!
//! # Example
//!
//! ```
//! use quill_render::{Extensions, HtmlRenderer, Markdown, Renderer};
//!
//! // Plain HTML.
//! let mut md = Markdown::new(HtmlRenderer::default()).with_extensions(Extensions::TABLES);
//! assert_eq!(md.render("**Bold** text").unwrap(), "<p><strong>Bold</strong> text</p>\n");
//!
//! // A renderer that only keeps headers.
//! struct Outline;
//!
//! impl Renderer for Outline {
//!     fn header(&mut self, content: &str, level: u8) -> Option<String> {
//!         Some(format!("{}{content}\n", "  ".repeat(usize::from(level - 1))))
//!     }
//! }
//!
//! let out = quill_render::render("# A\n\ntext\n\n## B\n", Extensions::empty(), &mut Outline).unwrap();
//! assert_eq!(out, "A\n  B\n");
//! ```

mod buffer;
mod dispatch;
mod document;
mod error;
mod escape;
mod extensions;
mod html;
mod kind;
mod renderer;
mod toc;
mod util;

pub use buffer::{BufferPool, OutputBuffer};
pub use dispatch::MAX_NESTING;
pub use document::{Markdown, html, render, render_inline};
pub use error::RenderError;
pub use escape::escape_html;
pub use extensions::Extensions;
pub use html::{HtmlFlags, HtmlRenderer};
pub use kind::{ArgShape, Category, Fallback, KindInfo, NodeKind, REGISTRY, UnknownKind};
pub use renderer::{AutolinkType, ListFlags, Renderer, TableFlags};
pub use toc::{TocEntry, TocRenderer};
