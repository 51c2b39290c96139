//! Style layer: semantic span styles, themes and palettes.
//!
//! The markdown walker never deals in colors. It tags text with a `SpanStyle`
//! (a semantic `Role` plus inline modifiers) and the writer maps that tag to a
//! concrete `crossterm` `ContentStyle` through the active `Palette`.
//!
//! Design invariants:
//! * `SpanStyle` is `Copy + Eq` so the wrapper can merge adjacent equal runs.
//! * A `NoTty` palette is `plain`: the writer emits no escape sequences at all.
//! * `Theme::Auto` resolves once, from `TerminalCapabilities`, at renderer
//!   construction; rendering itself never probes the terminal.

use crate::error::RenderError;
use core_terminal::{Background, TerminalCapabilities};
use crossterm::style::{Attribute, Color, ContentStyle};
use std::str::FromStr;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Role {
    Text,
    Heading(u8),
    Code,
    CodeBlock,
    Quote,
    ListMarker,
    Link,
    LinkUrl,
    Image,
    Rule,
    TableHeader,
    TableBorder,
    Html,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SpanStyle {
    pub role: Role,
    pub emphasis: bool,
    pub strong: bool,
    pub strike: bool,
}

impl SpanStyle {
    pub const fn role(role: Role) -> Self {
        Self {
            role,
            emphasis: false,
            strong: false,
            strike: false,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Theme {
    /// Follows the terminal: Light on a light background, Dark on a dark or
    /// unknown one, plain text when stdout is not a terminal.
    #[default]
    Auto,
    Dark,
    Light,
    NoTty,
}

impl FromStr for Theme {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "dark" => Ok(Self::Dark),
            "light" => Ok(Self::Light),
            "notty" => Ok(Self::NoTty),
            _ => Err(RenderError::UnknownTheme(s.to_string())),
        }
    }
}

impl Theme {
    /// Resolve `Auto` against the detected capabilities.
    pub fn resolve(self, caps: TerminalCapabilities) -> Theme {
        match self {
            Theme::Auto if !caps.stdout_is_tty => Theme::NoTty,
            Theme::Auto if caps.background == Background::Light => Theme::Light,
            Theme::Auto => Theme::Dark,
            other => other,
        }
    }

    pub fn palette(self, caps: TerminalCapabilities) -> Palette {
        match self.resolve(caps) {
            Theme::Dark => Palette::dark(),
            Theme::Light => Palette::light(),
            Theme::NoTty | Theme::Auto => Palette::plain(),
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct Colors {
    text: u8,
    heading: u8,
    code_fg: u8,
    code_bg: u8,
    code_block: u8,
    quote: u8,
    marker: u8,
    link: u8,
    link_url: u8,
    rule: u8,
}

#[derive(Clone, Debug)]
pub struct Palette {
    plain: bool,
    colors: Option<Colors>,
    pub rule_glyph: char,
}

fn fg(value: u8) -> ContentStyle {
    ContentStyle {
        foreground_color: Some(Color::AnsiValue(value)),
        ..ContentStyle::default()
    }
}

impl Palette {
    pub fn dark() -> Self {
        Self {
            plain: false,
            colors: Some(Colors {
                text: 252,
                heading: 39,
                code_fg: 203,
                code_bg: 236,
                code_block: 244,
                quote: 244,
                marker: 252,
                link: 35,
                link_url: 30,
                rule: 240,
            }),
            rule_glyph: '─',
        }
    }

    pub fn light() -> Self {
        Self {
            plain: false,
            colors: Some(Colors {
                text: 234,
                heading: 27,
                code_fg: 203,
                code_bg: 254,
                code_block: 242,
                quote: 242,
                marker: 234,
                link: 36,
                link_url: 30,
                rule: 249,
            }),
            rule_glyph: '─',
        }
    }

    pub fn plain() -> Self {
        Self {
            plain: true,
            colors: None,
            rule_glyph: '-',
        }
    }

    pub fn is_plain(&self) -> bool {
        self.plain
    }

    /// Concrete terminal style for a span. Plain palettes return the default
    /// (attribute-free) style.
    pub fn content_style(&self, span: SpanStyle) -> ContentStyle {
        let Some(c) = self.colors else {
            return ContentStyle::default();
        };
        let mut style = match span.role {
            Role::Text | Role::Html => fg(c.text),
            Role::Heading(_) => {
                let mut s = fg(c.heading);
                s.attributes.set(Attribute::Bold);
                s
            }
            Role::Code => ContentStyle {
                background_color: Some(Color::AnsiValue(c.code_bg)),
                ..fg(c.code_fg)
            },
            Role::CodeBlock => fg(c.code_block),
            Role::Quote => fg(c.quote),
            Role::ListMarker => fg(c.marker),
            Role::Link | Role::Image => {
                let mut s = fg(c.link);
                s.attributes.set(Attribute::Bold);
                s
            }
            Role::LinkUrl => {
                let mut s = fg(c.link_url);
                s.attributes.set(Attribute::Underlined);
                s
            }
            Role::Rule | Role::TableBorder => fg(c.rule),
            Role::TableHeader => {
                let mut s = fg(c.text);
                s.attributes.set(Attribute::Bold);
                s
            }
        };
        if span.strong {
            style.attributes.set(Attribute::Bold);
        }
        if span.emphasis {
            style.attributes.set(Attribute::Italic);
        }
        if span.strike {
            style.attributes.set(Attribute::CrossedOut);
        }
        style
    }
}
