//! Section extractor.
//!
//! Single forward pass, O(lines), no backtracking. Each line is classified
//! against the target heading and drives a two-state machine:
//!
//! ```text
//!            HeadingMatch                       OtherHeading
//!   Idle ------------------> Capturing ------------------------> (stop)
//!     ^  (anything else:       |  ^   BlankLine / ContentLine /
//!     |   skipped)             +--+   HeadingMatch (append)
//! ```
//!
//! Invariants:
//! - The heading line and content lines are kept verbatim (untrimmed).
//! - Runs of blank lines collapse to a single `""` entry.
//! - The next `### ` heading ends the scan and is not part of the section.
//! - All scan state lives in a `Scanner` local to one call.
//!
//! A repeated target heading re-enters capturing without dropping what was
//! already collected; headings are assumed unique per document, so no caller
//! relies on the merged result.

use crate::heading::{HEADING_MARKER, TargetHeading};
use crate::section::Section;
use std::io::{self, BufRead};
use tracing::debug;

/// Classification of one document line relative to the target heading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineClass {
    HeadingMatch,
    OtherHeading,
    BlankLine,
    ContentLine,
}

/// Classify `line` (trimmed before comparison) against `target`.
pub fn classify(line: &str, target: &TargetHeading) -> LineClass {
    let trimmed = line.trim();
    if trimmed == target.as_str() {
        LineClass::HeadingMatch
    } else if trimmed.starts_with(HEADING_MARKER) {
        LineClass::OtherHeading
    } else if trimmed.is_empty() {
        LineClass::BlankLine
    } else {
        LineClass::ContentLine
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Idle,
    Capturing { last_was_blank: bool },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Continue,
    Stop,
}

struct Scanner<'t> {
    target: &'t TargetHeading,
    state: ScanState,
    found: bool,
    collected: Vec<String>,
    line_no: usize,
}

impl<'t> Scanner<'t> {
    fn new(target: &'t TargetHeading) -> Self {
        Self {
            target,
            state: ScanState::Idle,
            found: false,
            collected: Vec::new(),
            line_no: 0,
        }
    }

    fn feed(&mut self, line: &str) -> Step {
        self.line_no += 1;
        let class = classify(line, self.target);
        match (self.state, class) {
            (_, LineClass::HeadingMatch) => {
                debug!(target: "lesson.extract", line = self.line_no, "target_heading_found");
                self.found = true;
                self.collected.push(line.to_owned());
                self.state = ScanState::Capturing {
                    last_was_blank: false,
                };
                Step::Continue
            }
            (ScanState::Idle, _) => Step::Continue,
            (ScanState::Capturing { .. }, LineClass::OtherHeading) => {
                debug!(target: "lesson.extract", line = self.line_no, "next_heading_stop");
                Step::Stop
            }
            (ScanState::Capturing { last_was_blank }, LineClass::BlankLine) => {
                if !last_was_blank {
                    self.collected.push(String::new());
                }
                self.state = ScanState::Capturing {
                    last_was_blank: true,
                };
                Step::Continue
            }
            (ScanState::Capturing { .. }, LineClass::ContentLine) => {
                self.collected.push(line.to_owned());
                self.state = ScanState::Capturing {
                    last_was_blank: false,
                };
                Step::Continue
            }
        }
    }

    /// End of input (or early stop): finalize or discard.
    fn finish(self) -> Option<Section> {
        if self.found {
            Some(Section::new(self.collected))
        } else {
            debug!(target: "lesson.extract", lines_scanned = self.line_no, "target_heading_absent");
            None
        }
    }
}

/// Extract the section opened by `target` from an in-memory sequence of lines.
/// Returns `None` when the heading never appears.
pub fn extract<I>(lines: I, target: &TargetHeading) -> Option<Section>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut scanner = Scanner::new(target);
    for line in lines {
        if scanner.feed(line.as_ref()) == Step::Stop {
            break;
        }
    }
    scanner.finish()
}

/// Streaming variant: reads lines until the section ends, so nothing past the
/// next heading is read. `\n` and `\r\n` terminators are both stripped.
/// Bytes that are not valid UTF-8 are decoded lossily (U+FFFD) instead of
/// failing the scan; only I/O failures are propagated.
pub fn extract_from_reader<R: BufRead>(
    mut reader: R,
    target: &TargetHeading,
) -> io::Result<Option<Section>> {
    let mut scanner = Scanner::new(target);
    let mut buf = Vec::new();
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        let line = String::from_utf8_lossy(strip_terminator(&buf));
        if scanner.feed(&line) == Step::Stop {
            break;
        }
    }
    Ok(scanner.finish())
}

fn strip_terminator(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn monday() -> TargetHeading {
        TargetHeading::for_date(NaiveDate::from_ymd_opt(2024, 3, 18).unwrap())
    }

    #[test]
    fn classify_distinguishes_line_kinds() {
        let t = monday();
        assert_eq!(classify("### Monday 2024-03-18", &t), LineClass::HeadingMatch);
        assert_eq!(classify("  ### Monday 2024-03-18\t", &t), LineClass::HeadingMatch);
        assert_eq!(classify("### Tuesday 2024-03-19", &t), LineClass::OtherHeading);
        assert_eq!(classify("   ", &t), LineClass::BlankLine);
        assert_eq!(classify("Warm-up", &t), LineClass::ContentLine);
    }

    #[test]
    fn deeper_or_unspaced_headings_are_content() {
        let t = monday();
        assert_eq!(classify("#### Materials", &t), LineClass::ContentLine);
        assert_eq!(classify("###NoSpace", &t), LineClass::ContentLine);
        assert_eq!(classify("## Week 12", &t), LineClass::ContentLine);
    }

    #[test]
    fn idle_lines_are_skipped() {
        let t = monday();
        let mut s = Scanner::new(&t);
        assert_eq!(s.feed("### Sunday 2024-03-17"), Step::Continue);
        assert_eq!(s.feed("notes"), Step::Continue);
        assert_eq!(s.state, ScanState::Idle);
        assert!(s.finish().is_none());
    }

    #[test]
    fn blank_tracking_resets_after_content() {
        let t = monday();
        let mut s = Scanner::new(&t);
        s.feed("### Monday 2024-03-18");
        s.feed("");
        assert_eq!(
            s.state,
            ScanState::Capturing {
                last_was_blank: true
            }
        );
        s.feed("x");
        assert_eq!(
            s.state,
            ScanState::Capturing {
                last_was_blank: false
            }
        );
    }

    #[test]
    fn terminators_are_stripped_once() {
        assert_eq!(strip_terminator(b"a\r\n"), b"a");
        assert_eq!(strip_terminator(b"a\n"), b"a");
        assert_eq!(strip_terminator(b"a"), b"a");
        assert_eq!(strip_terminator(b"a\r\r\n"), b"a\r");
    }

    #[test]
    fn stop_on_next_heading() {
        let t = monday();
        let mut s = Scanner::new(&t);
        s.feed("### Monday 2024-03-18");
        assert_eq!(s.feed("### Tuesday 2024-03-19"), Step::Stop);
    }
}
