//! Render adapter: markdown section -> styled, width-wrapped terminal text.
//!
//! Pipeline:
//! 1. `MarkdownRenderer::new` validates the wrap width and resolves the theme
//!    into a `Palette` (construction is the only fallible setup step).
//! 2. `markdown::Layout` walks `pulldown-cmark` events and produces physical
//!    lines of styled runs, wrapped with `core_text::wrap_runs`.
//! 3. `writer::Writer` applies the palette and document margin and returns a
//!    single `String`.
//!
//! Rendering is pure and synchronous: same input, same output, no terminal
//! access. The caller decides when (and whether) the result reaches stdout.
//!
//! Exposed Components:
//! - `style`: `Theme`, `Palette`, `SpanStyle` (semantic roles + modifiers).
//! - `writer`: command buffer flushed into the output blob.
//! - `error`: `RenderError` for construction and write failures.

use core_lesson::Section;
use core_terminal::TerminalCapabilities;
use tracing::debug;

pub mod error;
mod markdown;
pub mod style;
pub mod writer;

pub use error::RenderError;
pub use style::{Palette, Role, SpanStyle, Theme};

/// Left margin applied to every non-blank output line.
pub const DOCUMENT_MARGIN: u16 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Total wrap width in columns, margin included.
    pub width: i32,
    pub theme: Theme,
    pub capabilities: TerminalCapabilities,
}

impl RenderOptions {
    pub fn new(width: i32, theme: Theme, capabilities: TerminalCapabilities) -> Self {
        Self {
            width,
            theme,
            capabilities,
        }
    }
}

#[derive(Debug, Clone)]
pub struct MarkdownRenderer {
    palette: Palette,
    margin: usize,
    content_width: usize,
}

impl MarkdownRenderer {
    pub fn new(options: RenderOptions) -> Result<Self, RenderError> {
        let width = u16::try_from(options.width)
            .ok()
            .filter(|w| *w > 0)
            .ok_or(RenderError::InvalidWidth(i64::from(options.width)))?;
        // Very narrow widths give up margin before content.
        let margin = DOCUMENT_MARGIN.min(width - 1);
        let content_width = usize::from(width - margin);
        let theme = options.theme.resolve(options.capabilities);
        debug!(
            target: "render",
            width,
            margin,
            content_width,
            theme = ?theme,
            "renderer_ready"
        );
        Ok(Self {
            palette: theme.palette(options.capabilities),
            margin: usize::from(margin),
            content_width,
        })
    }

    pub fn content_width(&self) -> usize {
        self.content_width
    }

    /// Render a markdown blob. Embedded newlines are kept as line breaks.
    pub fn render(&self, markdown: &str) -> Result<String, RenderError> {
        let layout = markdown::Layout::new(self.content_width, self.palette.rule_glyph);
        let lines = layout.run(markdown);
        let mut writer = writer::Writer::new(&self.palette, self.margin);
        for line in lines {
            writer.line(line);
        }
        debug!(target: "render", lines = writer.len(), "render_complete");
        writer.flush()
    }

    pub fn render_section(&self, section: &Section) -> Result<String, RenderError> {
        self.render(&section.to_text())
    }
}

/// One-shot form of the adapter contract: join `lines` with `\n`, build a
/// renderer for `width`, and render.
pub fn render_lines<S: AsRef<str>>(
    lines: &[S],
    width: i32,
    theme: Theme,
    capabilities: TerminalCapabilities,
) -> Result<String, RenderError> {
    let text = lines
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<&str>>()
        .join("\n");
    MarkdownRenderer::new(RenderOptions::new(width, theme, capabilities))?.render(&text)
}
