//! One run of the viewer: resolve width, find the day's section, render it.
//!
//! The run is a straight line of fallible steps; every failure maps to one
//! `AppError` variant whose `Display` is the message printed on stderr.
//! Rendering completes into a `String` before anything is written, so an
//! error never leaves partial output on stdout.

use crate::cli::Args;
use chrono::NaiveDate;
use core_config::Config;
use core_lesson::{DATE_FORMAT, TargetHeading, extract_from_reader, parse_date};
use core_render::{MarkdownRenderer, RenderError, RenderOptions, Theme};
use core_terminal::{TerminalCapabilities, TerminalProbe, WidthPolicy, resolve_width};
use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;
use thiserror::Error;
use tracing::debug;

/// Document read when `--file` is not given, relative to the working directory.
pub const DEFAULT_DOCUMENT: &str = "lesson-planning.md";

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid date format: parsing {input:?} as YYYY-MM-DD: {source}")]
    InvalidDate {
        input: String,
        source: chrono::ParseError,
    },
    #[error("Error opening file: {}: {source}", path.display())]
    OpenFile { path: PathBuf, source: io::Error },
    #[error("Error reading file: {0}")]
    ReadFile(#[source] io::Error),
    #[error("Error creating renderer: {0}")]
    CreateRenderer(#[source] RenderError),
    #[error("Error rendering content: {0}")]
    Render(#[source] RenderError),
}

impl AppError {
    pub fn exit_code(&self) -> u8 {
        1
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum Outcome {
    Rendered(String),
    /// No heading for the date; `date` is the text the user asked for.
    NotFound { date: String },
}

pub fn run<P>(
    args: &Args,
    config: &Config,
    probe: &P,
    capabilities: TerminalCapabilities,
    today: NaiveDate,
) -> Result<Outcome, AppError>
where
    P: TerminalProbe + ?Sized,
{
    let policy = WidthPolicy::new(config.effective_default_width(), config.margin());
    let width = resolve_width(args.width, probe, policy);

    let date_text = args
        .date
        .clone()
        .unwrap_or_else(|| today.format(DATE_FORMAT).to_string());
    let date = parse_date(&date_text).map_err(|source| AppError::InvalidDate {
        input: date_text.clone(),
        source,
    })?;
    let target = TargetHeading::for_date(date);
    debug!(target: "lessontron", heading = %target, "target_heading");

    let path = args
        .file
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DOCUMENT));
    let file = File::open(&path).map_err(|source| AppError::OpenFile {
        path: path.clone(),
        source,
    })?;
    let Some(section) =
        extract_from_reader(BufReader::new(file), &target).map_err(AppError::ReadFile)?
    else {
        return Ok(Outcome::NotFound { date: date_text });
    };

    let theme_name = args.theme.as_deref().unwrap_or(config.theme());
    let renderer = theme_name
        .parse::<Theme>()
        .and_then(|theme| {
            MarkdownRenderer::new(RenderOptions::new(width.columns, theme, capabilities))
        })
        .map_err(AppError::CreateRenderer)?;
    debug!(target: "lessontron", width = width.columns, "render_width");
    let rendered = renderer.render_section(&section).map_err(AppError::Render)?;
    Ok(Outcome::Rendered(rendered))
}
