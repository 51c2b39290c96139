//! Grapheme cluster display width.
//!
//! `egc_width` is the single authority for how many terminal columns a
//! grapheme cluster (EGC) occupies. The wrapper and the renderer both route
//! every width decision through it so wrapped lines and padded table cells
//! agree on column positions.
//!
//! Width precedence:
//! 1. Control characters occupy no columns.
//! 2. Classifier (semantic kind -> width mapping).
//! 3. Conservative widen fallback (pictographic signal but width 1).
//!
//! Invariants:
//! - Classifier favors over-estimation: an extra blank cell is harmless, an
//!   under-estimate pushes text past the wrap column.
//! - Callers segment once; this module operates on a single EGC slice.

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthChar;

/// Semantic classification of a single grapheme cluster (EGC).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EgcKind {
    Ascii,
    Control,
    Narrow,
    Wide,
    Emoji,           // pictographic, keycap, flag, ZWJ or skin tone sequence
    Combining(bool), // base + combining mark(s); bool marks a wide base
}

const KEYCAP_COMBINING: char = '\u{20E3}';

fn is_regional_indicator(c: char) -> bool {
    ('\u{1F1E6}'..='\u{1F1FF}').contains(&c)
}

// Rough Extended Pictographic heuristic (main emoji blocks + legacy symbols).
fn is_extended_pictographic(c: char) -> bool {
    ('\u{1F300}'..='\u{1FAFF}').contains(&c) || ('\u{2600}'..='\u{27BF}').contains(&c)
}

fn is_combining_mark(c: char) -> bool {
    ('\u{0300}'..='\u{036F}').contains(&c)
        || ('\u{1AB0}'..='\u{1AFF}').contains(&c)
        || ('\u{1DC0}'..='\u{1DFF}').contains(&c)
        || ('\u{20D0}'..='\u{20FF}').contains(&c)
        || ('\u{FE20}'..='\u{FE2F}').contains(&c)
}

fn char_is_wide(c: char) -> bool {
    UnicodeWidthChar::width(c).unwrap_or(1) == 2
}

fn classify(egc: &str) -> EgcKind {
    let mut chars = egc.chars();
    let Some(first) = chars.next() else {
        return EgcKind::Control;
    };

    if chars.as_str().is_empty() {
        if first.is_control() {
            return EgcKind::Control;
        }
        if first.is_ascii() {
            return EgcKind::Ascii;
        }
        if is_extended_pictographic(first) {
            return EgcKind::Emoji;
        }
        return if char_is_wide(first) {
            EgcKind::Wide
        } else {
            EgcKind::Narrow
        };
    }

    let mut pictographic = false;
    let mut regional = 0usize;
    let mut keycap = false;
    let mut combining = false;
    let mut any_wide = false;
    for c in egc.chars() {
        pictographic |= is_extended_pictographic(c);
        if is_regional_indicator(c) {
            regional += 1;
        }
        keycap |= c == KEYCAP_COMBINING;
        combining |= is_combining_mark(c);
        any_wide |= char_is_wide(c);
    }

    if pictographic || keycap || regional == 2 {
        return EgcKind::Emoji;
    }
    if combining {
        return EgcKind::Combining(char_is_wide(first));
    }
    if any_wide {
        return EgcKind::Wide;
    }
    EgcKind::Narrow
}

fn width_for_kind(kind: EgcKind) -> u16 {
    match kind {
        EgcKind::Control => 0,
        EgcKind::Ascii | EgcKind::Narrow => 1,
        EgcKind::Wide | EgcKind::Emoji => 2,
        EgcKind::Combining(wide_base) => {
            if wide_base {
                2
            } else {
                1
            }
        }
    }
}

/// Display column width of a single grapheme cluster. Empty input returns 0.
#[inline]
pub fn egc_width(egc: &str) -> u16 {
    if egc.is_empty() {
        return 0;
    }
    let width = width_for_kind(classify(egc));
    if width == 1
        && egc
            .chars()
            .any(|c| is_extended_pictographic(c) || is_regional_indicator(c))
    {
        return 2;
    }
    width
}

/// Display width of an arbitrary string (segments into EGCs first).
pub fn str_width(s: &str) -> usize {
    s.graphemes(true).map(|g| usize::from(egc_width(g))).sum()
}
