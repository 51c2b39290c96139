//! Markdown layout pass.
//!
//! Walks `pulldown-cmark` events and lays the document out as physical lines
//! of styled runs, wrapped to the content width. Block structure becomes line
//! prefixes (quote gutters, list markers and their hanging indents); inline
//! structure becomes `SpanStyle` modifiers.
//!
//! Invariants:
//! * Soft breaks are kept as hard breaks, so source lines the author kept
//!   separate are never reflowed into one.
//! * A prefix plus its wrapped text never exceeds the content width (except
//!   code blocks and tables, which are emitted unwrapped).
//! * A list item's marker appears exactly once, on the item's first line;
//!   continuation lines get blank padding of the same width.
//! * Consecutive blocks are separated by exactly one blank line.

use crate::style::{Role, SpanStyle};
use crate::writer::StyledLine;
use core_text::{Run, str_width, wrap_runs};
use pulldown_cmark::{Alignment, CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag, TagEnd};

const CODE_INDENT: &str = "  ";
const TAB_STOP: &str = "    ";

pub(crate) fn parser_options() -> Options {
    Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS
}

fn heading_depth(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

#[derive(Debug)]
enum Container {
    Quote,
    Item { marker: String, first_pending: bool },
}

#[derive(Debug, Default)]
struct Modifiers {
    emphasis: u16,
    strong: u16,
    strike: u16,
    link: u16,
    image: u16,
}

#[derive(Debug)]
struct LinkFrame {
    dest: String,
    text: String,
}

#[derive(Debug, Default)]
struct TableState {
    alignments: Vec<Alignment>,
    header: Option<Vec<StyledLine>>,
    rows: Vec<Vec<StyledLine>>,
    row: Vec<StyledLine>,
    cell: Option<StyledLine>,
}

pub(crate) struct Layout {
    width: usize,
    rule_glyph: char,
    lines: Vec<StyledLine>,
    inline: StyledLine,
    base: Role,
    modifiers: Modifiers,
    containers: Vec<Container>,
    lists: Vec<Option<u64>>,
    code: Option<String>,
    links: Vec<LinkFrame>,
    images: Vec<String>,
    table: Option<TableState>,
    needs_gap: bool,
}

impl Layout {
    pub(crate) fn new(width: usize, rule_glyph: char) -> Self {
        Self {
            width: width.max(1),
            rule_glyph,
            lines: Vec::new(),
            inline: Vec::new(),
            base: Role::Text,
            modifiers: Modifiers::default(),
            containers: Vec::new(),
            lists: Vec::new(),
            code: None,
            links: Vec::new(),
            images: Vec::new(),
            table: None,
            needs_gap: false,
        }
    }

    /// Lay out a whole markdown document.
    pub(crate) fn run(mut self, markdown: &str) -> Vec<StyledLine> {
        for event in Parser::new_ext(markdown, parser_options()) {
            self.event(event);
        }
        self.flush_inline();
        while self
            .lines
            .last()
            .is_some_and(|line| line.iter().all(|r| r.text.trim().is_empty()))
        {
            self.lines.pop();
        }
        self.lines
    }

    fn style(&self) -> SpanStyle {
        let role = if self.modifiers.image > 0 {
            Role::Image
        } else if self.modifiers.link > 0 {
            Role::Link
        } else {
            self.base
        };
        SpanStyle {
            role,
            emphasis: self.modifiers.emphasis > 0,
            strong: self.modifiers.strong > 0,
            strike: self.modifiers.strike > 0,
        }
    }

    fn push_styled(&mut self, text: &str, style: SpanStyle) {
        if text.is_empty() {
            return;
        }
        for link in &mut self.links {
            link.text.push_str(text);
        }
        let target = match self.table.as_mut().and_then(|t| t.cell.as_mut()) {
            Some(cell) => cell,
            None => &mut self.inline,
        };
        match target.last_mut() {
            Some(last) if last.style == style => last.text.push_str(text),
            _ => target.push(Run::new(text, style)),
        }
    }

    fn push_text(&mut self, text: &str) {
        let style = self.style();
        self.push_styled(text, style);
    }

    fn push_role(&mut self, text: &str, role: Role) {
        let style = SpanStyle {
            role,
            ..self.style()
        };
        self.push_styled(text, style);
    }

    /// Prefix for the next physical line; consumes a pending list marker.
    fn line_prefix(&mut self) -> StyledLine {
        let mut prefix = Vec::new();
        for container in &mut self.containers {
            match container {
                Container::Quote => prefix.push(Run::new("│ ", SpanStyle::role(Role::Quote))),
                Container::Item {
                    marker,
                    first_pending,
                } => {
                    if *first_pending {
                        *first_pending = false;
                        prefix.push(Run::new(marker.clone(), SpanStyle::role(Role::ListMarker)));
                    } else {
                        prefix.push(Run::new(
                            " ".repeat(str_width(marker)),
                            SpanStyle::role(Role::Text),
                        ));
                    }
                }
            }
        }
        prefix
    }

    fn prefix_width(&self) -> usize {
        self.containers
            .iter()
            .map(|c| match c {
                Container::Quote => 2,
                Container::Item { marker, .. } => str_width(marker),
            })
            .sum()
    }

    fn blank_line(&mut self) {
        let line = if self.containers.iter().any(|c| matches!(c, Container::Quote)) {
            let gutter: String = self
                .containers
                .iter()
                .map(|c| match c {
                    Container::Quote => "│ ".to_string(),
                    Container::Item { marker, .. } => " ".repeat(str_width(marker)),
                })
                .collect();
            vec![Run::new(gutter.trim_end(), SpanStyle::role(Role::Quote))]
        } else {
            Vec::new()
        };
        self.lines.push(line);
    }

    fn gap(&mut self) {
        if self.needs_gap && !self.lines.is_empty() {
            self.blank_line();
        }
        self.needs_gap = false;
    }

    fn avail(&self) -> usize {
        self.width.saturating_sub(self.prefix_width()).max(1)
    }

    fn flush_inline(&mut self) {
        while let Some(last) = self.inline.last_mut() {
            let trimmed = last.text.trim_end_matches('\n').len();
            last.text.truncate(trimmed);
            if last.text.is_empty() {
                self.inline.pop();
            } else {
                break;
            }
        }
        if self.inline.is_empty() {
            return;
        }
        let runs = std::mem::take(&mut self.inline);
        for wrapped in wrap_runs(&runs, self.avail()) {
            let mut line = self.line_prefix();
            line.extend(wrapped);
            self.lines.push(line);
        }
    }

    fn start_block(&mut self) {
        self.flush_inline();
        self.gap();
    }

    fn end_block(&mut self) {
        self.flush_inline();
        self.needs_gap = true;
    }

    fn event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(tag) => self.end(tag),
            Event::Text(text) => match self.code.as_mut() {
                Some(code) => code.push_str(&text),
                None => self.push_text(&text),
            },
            Event::Code(code) => self.push_role(&code, Role::Code),
            Event::Html(html) | Event::InlineHtml(html) => self.push_role(&html, Role::Html),
            Event::SoftBreak | Event::HardBreak => self.push_text("\n"),
            Event::Rule => {
                self.start_block();
                let width = self.avail();
                let mut line = self.line_prefix();
                line.push(Run::new(
                    self.rule_glyph.to_string().repeat(width),
                    SpanStyle::role(Role::Rule),
                ));
                self.lines.push(line);
                self.needs_gap = true;
            }
            Event::TaskListMarker(checked) => {
                if let Some(Container::Item {
                    marker,
                    first_pending: true,
                }) = self.containers.last_mut()
                {
                    *marker = if checked { "[✓] " } else { "[ ] " }.to_string();
                }
            }
            Event::FootnoteReference(name) => self.push_text(&format!("[^{name}]")),
            _ => {}
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph | Tag::HtmlBlock => self.start_block(),
            Tag::Heading { level, .. } => {
                self.start_block();
                let depth = heading_depth(level);
                self.base = Role::Heading(depth);
                self.push_text(&format!("{} ", "#".repeat(usize::from(depth))));
            }
            Tag::BlockQuote(_) => {
                self.start_block();
                self.containers.push(Container::Quote);
            }
            Tag::CodeBlock(kind) => {
                self.start_block();
                if let CodeBlockKind::Fenced(lang) = &kind {
                    tracing::trace!(target: "render", lang = %lang, "code_block");
                }
                self.code = Some(String::new());
            }
            Tag::List(start) => {
                self.flush_inline();
                if !self
                    .containers
                    .iter()
                    .any(|c| matches!(c, Container::Item { .. }))
                {
                    self.gap();
                }
                self.lists.push(start);
            }
            Tag::Item => {
                self.flush_inline();
                let marker = match self.lists.last_mut() {
                    Some(Some(n)) => {
                        let marker = format!("{n}. ");
                        *n += 1;
                        marker
                    }
                    _ => "• ".to_string(),
                };
                self.containers.push(Container::Item {
                    marker,
                    first_pending: true,
                });
            }
            Tag::Emphasis => self.modifiers.emphasis += 1,
            Tag::Strong => self.modifiers.strong += 1,
            Tag::Strikethrough => self.modifiers.strike += 1,
            Tag::Link { dest_url, .. } => {
                self.modifiers.link += 1;
                self.links.push(LinkFrame {
                    dest: dest_url.to_string(),
                    text: String::new(),
                });
            }
            Tag::Image { dest_url, .. } => {
                self.push_role("Image: ", Role::Image);
                self.modifiers.image += 1;
                self.images.push(dest_url.to_string());
            }
            Tag::Table(alignments) => {
                self.start_block();
                self.table = Some(TableState {
                    alignments,
                    ..TableState::default()
                });
            }
            Tag::TableHead => self.base = Role::TableHeader,
            Tag::TableRow => {
                if let Some(table) = self.table.as_mut() {
                    table.row.clear();
                }
            }
            Tag::TableCell => {
                if let Some(table) = self.table.as_mut() {
                    table.cell = Some(Vec::new());
                }
            }
            _ => {}
        }
    }

    fn end(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph | TagEnd::HtmlBlock => self.end_block(),
            TagEnd::Heading(_) => {
                self.flush_inline();
                self.base = Role::Text;
                self.needs_gap = true;
            }
            TagEnd::BlockQuote(_) => {
                self.flush_inline();
                self.containers.pop();
                self.needs_gap = true;
            }
            TagEnd::CodeBlock => {
                let code = self.code.take().unwrap_or_default();
                for source in code.trim_end_matches('\n').split('\n') {
                    let mut line = self.line_prefix();
                    line.push(Run::new(
                        format!("{CODE_INDENT}{}", source.replace('\t', TAB_STOP)),
                        SpanStyle::role(Role::CodeBlock),
                    ));
                    self.lines.push(line);
                }
                self.needs_gap = true;
            }
            TagEnd::List(_) => {
                self.flush_inline();
                self.lists.pop();
                self.needs_gap = true;
            }
            TagEnd::Item => {
                self.flush_inline();
                if let Some(Container::Item {
                    first_pending: true,
                    ..
                }) = self.containers.last()
                {
                    // Empty item: still show its marker.
                    let line = self.line_prefix();
                    self.lines.push(line);
                }
                self.containers.pop();
            }
            TagEnd::Emphasis => self.modifiers.emphasis = self.modifiers.emphasis.saturating_sub(1),
            TagEnd::Strong => self.modifiers.strong = self.modifiers.strong.saturating_sub(1),
            TagEnd::Strikethrough => self.modifiers.strike = self.modifiers.strike.saturating_sub(1),
            TagEnd::Link => {
                self.modifiers.link = self.modifiers.link.saturating_sub(1);
                if let Some(link) = self.links.pop() {
                    if !link.dest.is_empty() && link.dest != link.text {
                        self.push_role(&format!(" ({})", link.dest), Role::LinkUrl);
                    }
                }
            }
            TagEnd::Image => {
                self.modifiers.image = self.modifiers.image.saturating_sub(1);
                if let Some(dest) = self.images.pop() {
                    self.push_role(&format!(" → {dest}"), Role::LinkUrl);
                }
            }
            TagEnd::TableCell => {
                if let Some(table) = self.table.as_mut() {
                    let cell = table.cell.take().unwrap_or_default();
                    table.row.push(cell);
                }
            }
            TagEnd::TableHead => {
                self.base = Role::Text;
                if let Some(table) = self.table.as_mut() {
                    table.header = Some(std::mem::take(&mut table.row));
                }
            }
            TagEnd::TableRow => {
                if let Some(table) = self.table.as_mut() {
                    let row = std::mem::take(&mut table.row);
                    table.rows.push(row);
                }
            }
            TagEnd::Table => {
                if let Some(table) = self.table.take() {
                    self.emit_table(table);
                }
                self.needs_gap = true;
            }
            _ => {}
        }
    }

    fn emit_table(&mut self, table: TableState) {
        let columns = table
            .header
            .iter()
            .chain(table.rows.iter())
            .map(Vec::len)
            .max()
            .unwrap_or(0);
        if columns == 0 {
            return;
        }
        let cell_width = |cell: &StyledLine| cell.iter().map(|r| str_width(&r.text)).sum::<usize>();
        let mut widths = vec![0usize; columns];
        for row in table.header.iter().chain(table.rows.iter()) {
            for (i, cell) in row.iter().enumerate() {
                widths[i] = widths[i].max(cell_width(cell));
            }
        }

        let border = SpanStyle::role(Role::TableBorder);
        let render_row = |layout: &mut Layout, row: &[StyledLine]| {
            let mut line = layout.line_prefix();
            for (i, width) in widths.iter().enumerate() {
                if i > 0 {
                    line.push(Run::new(" │ ", border));
                }
                let empty = Vec::new();
                let cell = row.get(i).unwrap_or(&empty);
                let pad = width.saturating_sub(cell_width(cell));
                let (left, right) = match table.alignments.get(i) {
                    Some(Alignment::Right) => (pad, 0),
                    Some(Alignment::Center) => (pad / 2, pad - pad / 2),
                    _ => (0, pad),
                };
                if left > 0 {
                    line.push(Run::new(" ".repeat(left), SpanStyle::role(Role::Text)));
                }
                line.extend(cell.iter().cloned());
                if right > 0 && i + 1 < columns {
                    line.push(Run::new(" ".repeat(right), SpanStyle::role(Role::Text)));
                }
            }
            layout.lines.push(line);
        };

        if let Some(header) = &table.header {
            render_row(self, header);
            let mut line = self.line_prefix();
            let rule: Vec<String> = widths.iter().map(|w| "─".repeat(*w)).collect();
            line.push(Run::new(rule.join("─┼─"), border));
            self.lines.push(line);
        }
        for row in &table.rows {
            render_row(self, row);
        }
    }
}
