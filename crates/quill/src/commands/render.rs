//! `quill render` command implementation.

use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use clap::Args;
use quill_render::{HtmlRenderer, Markdown, RenderError, TocRenderer};

use crate::config::{CliSettings, Config};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the render command.
#[derive(Args)]
pub(crate) struct RenderArgs {
    /// Markdown file to render (default: stdin).
    input: Option<PathBuf>,

    /// File to write HTML to (default: stdout).
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Render as inline content, without a paragraph wrapper.
    #[arg(long)]
    inline: bool,

    /// Render a table of contents instead of the document.
    #[arg(long, conflicts_with = "inline")]
    toc: bool,

    /// Enable a markdown extension (repeatable, overrides config).
    #[arg(short = 'e', long = "extension", value_name = "NAME")]
    extensions: Vec<String>,

    /// Enable an HTML output flag (repeatable, overrides config).
    #[arg(long = "html-flag", value_name = "FLAG")]
    html_flags: Vec<String>,

    /// Offset added to footnote numbers (overrides config).
    #[arg(long)]
    footnote_offset: Option<u32>,

    /// Anchor headers up to this level (overrides config).
    #[arg(long)]
    toc_level: Option<u8>,

    /// Path to configuration file (default: auto-discover quill.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

/// What to produce from the input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Mode {
    Document,
    Inline,
    Toc,
}

impl RenderArgs {
    /// Execute the render command.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            extensions: self.extensions,
            html_flags: self.html_flags,
            footnote_offset: self.footnote_offset,
            toc_level: self.toc_level,
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        let mode = if self.toc {
            Mode::Toc
        } else if self.inline {
            Mode::Inline
        } else {
            Mode::Document
        };

        let source = read_input(self.input.as_deref())?;
        if source.is_empty() {
            output.warning("Input is empty");
        }
        let rendered = render_source(&source, &config, mode)?;
        tracing::info!(
            input_bytes = source.len(),
            output_bytes = rendered.len(),
            ?mode,
            "Rendered markdown"
        );

        match &self.output {
            Some(path) => {
                std::fs::write(path, &rendered)?;
                output.written(path, rendered.len());
            }
            None => {
                let mut stdout = std::io::stdout().lock();
                stdout.write_all(rendered.as_bytes())?;
                stdout.flush()?;
            }
        }
        Ok(())
    }
}

/// Read the whole input file, or stdin when no path is given.
fn read_input(path: Option<&Path>) -> Result<Vec<u8>, CliError> {
    match path {
        Some(path) => Ok(std::fs::read(path)?),
        None => {
            let mut buf = Vec::new();
            std::io::stdin().lock().read_to_end(&mut buf)?;
            Ok(buf)
        }
    }
}

fn render_source(source: &[u8], config: &Config, mode: Mode) -> Result<String, CliError> {
    let extensions = config.extensions()?;
    let flags = config.html_flags()?;

    let rendered = match mode {
        Mode::Toc => Markdown::new(TocRenderer::with_flags(config.toc_nesting_level(), flags))
            .with_extensions(extensions)
            .render_bytes(source)?,
        Mode::Document | Mode::Inline => {
            let renderer = HtmlRenderer::new(flags)
                .with_footnote_offset(config.html.footnote_offset)
                .with_toc_level(config.html.toc_level);
            let mut md = Markdown::new(renderer).with_extensions(extensions);
            if mode == Mode::Inline {
                let text = std::str::from_utf8(source).map_err(RenderError::from)?;
                md.render_inline(text)?
            } else {
                md.render_bytes(source)?
            }
        }
    };
    Ok(rendered)
}
