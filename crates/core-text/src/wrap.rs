//! Greedy word wrap over styled runs.
//!
//! Contract:
//! - Input: ordered `Run`s (text + opaque style tag) and a column budget.
//! - Output: physical lines, each a list of runs whose display width never
//!   exceeds the budget (measured with `egc_width`). The one exception is a
//!   single grapheme wider than the whole budget (a wide character at budget
//!   1): it is never dropped or cut, so it occupies a line of its own.
//! - `\n` inside any run is a hard break: it always ends the current line and
//!   is never merged away, so intentionally separate lines stay separate.
//! - A word is a maximal run of non-whitespace graphemes and may span several
//!   runs (`**bold**,` keeps the comma glued to the bold text).
//! - Words wider than the budget are split at grapheme boundaries.
//! - Whitespace at an automatic break is dropped; whitespace at the start of a
//!   hard line (indentation) is kept. Trailing whitespace is trimmed.
//! - Adjacent runs with equal styles are merged in the output.

use crate::width::egc_width;
use unicode_segmentation::UnicodeSegmentation;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Run<T> {
    pub text: String,
    pub style: T,
}

impl<T> Run<T> {
    pub fn new(text: impl Into<String>, style: T) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Word,
    Space,
}

#[derive(Debug)]
enum Token<T> {
    Chunk {
        kind: Kind,
        runs: Vec<Run<T>>,
        width: usize,
    },
    Break,
}

fn push_merged<T: Clone + PartialEq>(runs: &mut Vec<Run<T>>, text: &str, style: &T) {
    match runs.last_mut() {
        Some(last) if last.style == *style => last.text.push_str(text),
        _ => runs.push(Run::new(text, style.clone())),
    }
}

fn tokenize<T: Clone + PartialEq>(input: &[Run<T>]) -> Vec<Token<T>> {
    let mut tokens = Vec::new();
    let mut current: Option<(Kind, Vec<Run<T>>, usize)> = None;

    for run in input {
        for g in run.text.graphemes(true) {
            if g == "\n" || g == "\r\n" {
                if let Some((kind, runs, width)) = current.take() {
                    tokens.push(Token::Chunk { kind, runs, width });
                }
                tokens.push(Token::Break);
                continue;
            }
            let kind = if g.chars().all(char::is_whitespace) {
                Kind::Space
            } else {
                Kind::Word
            };
            let gw = usize::from(egc_width(g));
            match current.as_mut() {
                Some((k, runs, width)) if *k == kind => {
                    push_merged(runs, g, &run.style);
                    *width += gw;
                    continue;
                }
                _ => {}
            }
            if let Some((kind, runs, width)) = current.take() {
                tokens.push(Token::Chunk { kind, runs, width });
            }
            current = Some((kind, vec![Run::new(g, run.style.clone())], gw));
        }
    }
    if let Some((kind, runs, width)) = current {
        tokens.push(Token::Chunk { kind, runs, width });
    }
    tokens
}

struct Layout<T> {
    width: usize,
    lines: Vec<Vec<Run<T>>>,
    current: Vec<Run<T>>,
    used: usize,
    // Current line was opened by an automatic wrap rather than a hard break.
    soft_start: bool,
}

impl<T: Clone + PartialEq> Layout<T> {
    fn new(width: usize) -> Self {
        Self {
            width: width.max(1),
            lines: Vec::new(),
            current: Vec::new(),
            used: 0,
            soft_start: false,
        }
    }

    fn end_line(&mut self, soft: bool) {
        self.lines.push(std::mem::take(&mut self.current));
        self.used = 0;
        self.soft_start = soft;
    }

    fn emit(&mut self, runs: &[Run<T>], width: usize) {
        for run in runs {
            push_merged(&mut self.current, &run.text, &run.style);
        }
        self.used += width;
    }

    fn split_word(&mut self, runs: &[Run<T>]) {
        for run in runs {
            for g in run.text.graphemes(true) {
                let gw = usize::from(egc_width(g));
                if self.used > 0 && self.used + gw > self.width {
                    self.end_line(true);
                }
                push_merged(&mut self.current, g, &run.style);
                self.used += gw;
            }
        }
    }

    fn place_word(&mut self, runs: &[Run<T>], width: usize, pending: Option<(Vec<Run<T>>, usize)>) {
        let pending = match pending {
            Some(_) if self.used == 0 && self.soft_start => None,
            Some(space) if space.1 >= self.width => None,
            other => other,
        };
        let space_width = pending.as_ref().map_or(0, |(_, w)| *w);

        if self.used + space_width + width <= self.width {
            if let Some((space, w)) = pending {
                self.emit(&space, w);
            }
            self.emit(runs, width);
            return;
        }

        if self.used > 0 {
            self.end_line(true);
        } else if let Some((space, w)) = pending {
            self.emit(&space, w);
        }

        if self.used + width <= self.width {
            self.emit(runs, width);
        } else {
            self.split_word(runs);
        }
    }

    fn finish(mut self, ended_with_break: bool) -> Vec<Vec<Run<T>>> {
        if !self.current.is_empty() || ended_with_break {
            self.lines.push(self.current);
        }
        self.lines
    }
}

/// Wrap styled runs to `width` display columns.
pub fn wrap_runs<T: Clone + PartialEq>(runs: &[Run<T>], width: usize) -> Vec<Vec<Run<T>>> {
    let mut layout = Layout::new(width);
    let mut pending: Option<(Vec<Run<T>>, usize)> = None;
    let mut ended_with_break = false;

    for token in tokenize(runs) {
        ended_with_break = false;
        match token {
            Token::Break => {
                pending = None;
                layout.end_line(false);
                ended_with_break = true;
            }
            Token::Chunk {
                kind: Kind::Space,
                runs,
                width,
            } => pending = Some((runs, width)),
            Token::Chunk {
                kind: Kind::Word,
                runs,
                width,
            } => layout.place_word(&runs, width, pending.take()),
        }
    }
    layout.finish(ended_with_break)
}

/// Wrap unstyled text; convenience over `wrap_runs`.
pub fn wrap_plain(text: &str, width: usize) -> Vec<String> {
    wrap_runs(&[Run::new(text, ())], width)
        .into_iter()
        .map(|line| line.into_iter().map(|run| run.text).collect())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn greedy_fill_breaks_between_words() {
        assert_eq!(
            wrap_plain("the quick brown fox jumps", 10),
            vec!["the quick", "brown fox", "jumps"]
        );
    }

    #[test]
    fn hard_newlines_are_kept() {
        assert_eq!(wrap_plain("one\ntwo\n\nthree", 80), vec!["one", "two", "", "three"]);
    }

    #[test]
    fn long_word_split_at_budget() {
        assert_eq!(wrap_plain("abcdefghij", 4), vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn long_word_after_text_starts_new_line() {
        assert_eq!(wrap_plain("ab abcdefgh", 4), vec!["ab", "abcd", "efgh"]);
    }

    #[test]
    fn trailing_whitespace_trimmed_indentation_kept() {
        assert_eq!(wrap_plain("  indented  ", 20), vec!["  indented"]);
    }

    #[test]
    fn wide_graphemes_count_two_columns() {
        assert_eq!(wrap_plain("界界 界", 4), vec!["界界", "界"]);
    }

    #[test]
    fn word_spanning_styles_stays_together() {
        let runs = vec![
            Run::new("aaaa ", 0u8),
            Run::new("bold", 1u8),
            Run::new(", tail", 0u8),
        ];
        let lines = wrap_runs(&runs, 7);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], vec![Run::new("aaaa", 0u8)]);
        assert_eq!(lines[1], vec![Run::new("bold", 1u8), Run::new(",", 0u8)]);
        assert_eq!(lines[2], vec![Run::new("tail", 0u8)]);
    }

    #[test]
    fn adjacent_equal_styles_merge() {
        let runs = vec![Run::new("ab", 0u8), Run::new("cd", 0u8)];
        assert_eq!(wrap_runs(&runs, 10), vec![vec![Run::new("abcd", 0u8)]]);
    }

    #[test]
    fn empty_input_has_no_lines() {
        assert!(wrap_plain("", 10).is_empty());
    }

    #[test]
    fn zero_budget_treated_as_one_column() {
        assert_eq!(wrap_plain("ab", 0), vec!["a", "b"]);
    }

    #[test]
    fn grapheme_wider_than_budget_gets_its_own_line() {
        assert_eq!(wrap_plain("界界", 1), vec!["界", "界"]);
        assert_eq!(wrap_plain("a界b", 1), vec!["a", "界", "b"]);
    }
}
