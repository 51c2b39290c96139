//! Styled text writer.
//!
//! Thin layer between the markdown layout pass and the final output blob: the
//! layout pass queues primitive commands (styled line, blank line) and a single
//! `flush` turns them into one `String`, applying the palette and document
//! margin. Nothing reaches stdout from here, so a failed render never leaves
//! partial output behind.
//!
//! Design invariants:
//! * Commands preserve ordering; output is produced only by `flush`.
//! * Blank lines carry no margin and no escape sequences.
//! * Plain palettes emit the run text verbatim.

use crate::error::RenderError;
use crate::style::{Palette, SpanStyle};
use core_text::Run;
use std::fmt::Write as _;

pub type StyledLine = Vec<Run<SpanStyle>>;

#[derive(Debug)]
pub enum Command {
    Line(StyledLine),
    Blank,
}

pub struct Writer<'p> {
    palette: &'p Palette,
    margin: usize,
    cmds: Vec<Command>,
}

impl<'p> Writer<'p> {
    pub fn new(palette: &'p Palette, margin: usize) -> Self {
        Self {
            palette,
            margin,
            cmds: Vec::new(),
        }
    }

    pub fn line(&mut self, line: StyledLine) {
        if line.iter().all(|run| run.text.trim().is_empty()) {
            self.cmds.push(Command::Blank);
        } else {
            self.cmds.push(Command::Line(line));
        }
    }

    pub fn blank(&mut self) {
        self.cmds.push(Command::Blank);
    }

    pub fn len(&self) -> usize {
        self.cmds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cmds.is_empty()
    }

    /// Produce the output blob: a leading blank line, then one line per
    /// command, each terminated by `\n`.
    pub fn flush(self) -> Result<String, RenderError> {
        let mut out = String::from("\n");
        let margin = " ".repeat(self.margin);
        for cmd in self.cmds {
            match cmd {
                Command::Blank => {}
                Command::Line(runs) => {
                    out.push_str(&margin);
                    for run in runs {
                        if self.palette.is_plain() {
                            out.push_str(&run.text);
                        } else {
                            let style = self.palette.content_style(run.style);
                            write!(out, "{}", style.apply(run.text.as_str()))?;
                        }
                    }
                }
            }
            out.push('\n');
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::Role;

    fn text(s: &str) -> Run<SpanStyle> {
        Run::new(s, SpanStyle::role(Role::Text))
    }

    #[test]
    fn plain_flush_applies_margin_and_blank_lines() {
        let palette = Palette::plain();
        let mut w = Writer::new(&palette, 2);
        w.line(vec![text("one")]);
        w.blank();
        w.line(vec![text("two"), text(" three")]);
        assert_eq!(w.flush().unwrap(), "\n  one\n\n  two three\n");
    }

    #[test]
    fn whitespace_only_line_becomes_blank() {
        let palette = Palette::plain();
        let mut w = Writer::new(&palette, 2);
        w.line(vec![text("   ")]);
        assert_eq!(w.flush().unwrap(), "\n\n");
    }

    #[test]
    fn styled_flush_wraps_runs_in_escape_sequences() {
        let palette = Palette::dark();
        let mut w = Writer::new(&palette, 0);
        w.line(vec![Run::new("Title", SpanStyle::role(Role::Heading(3)))]);
        let out = w.flush().unwrap();
        assert!(out.contains("Title"));
        assert!(out.contains("\u{1b}["));
    }
}
