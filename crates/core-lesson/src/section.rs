//! Captured section of a lesson plan.

/// Lines belonging to one day's entry: the matching heading line followed by
/// its body, up to but excluding the next `### ` heading.
///
/// Invariants (upheld by the extractor, the only constructor):
/// - `lines[0]` is the heading line exactly as it appeared in the document.
/// - No two consecutive lines are blank; blank lines are stored as `""`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    lines: Vec<String>,
}

impl Section {
    pub(crate) fn new(lines: Vec<String>) -> Self {
        debug_assert!(!lines.is_empty(), "section always starts with its heading");
        Self { lines }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn heading(&self) -> &str {
        self.lines.first().map(String::as_str).unwrap_or_default()
    }

    /// Body lines after the heading (may be empty).
    pub fn body(&self) -> &[String] {
        self.lines.get(1..).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Lines joined with `\n` (no trailing newline), the form handed to the renderer.
    pub fn to_text(&self) -> String {
        self.lines.join("\n")
    }

    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }
}
