use clap::Parser;
use std::ffi::OsString;
use std::path::PathBuf;

/// Long options also accepted with a single leading dash (`-date 2024-03-18`).
const SINGLE_DASH_LONG: [&str; 5] = ["date", "width", "file", "theme", "config"];

/// Spellings of the verbose switch; each also takes an inline `=<bool>`.
const VERBOSE_NAMES: [&str; 2] = ["v", "verbose"];

/// CLI arguments.
#[derive(Parser, Debug, Default)]
#[command(
    name = "lessontron",
    version,
    about = "Print one day's section of a lesson planning document"
)]
pub struct Args {
    /// Enable verbose debugging output on stderr.
    #[arg(short, long, alias = "v")]
    pub verbose: bool,
    /// Date to extract (YYYY-MM-DD). Defaults to today.
    #[arg(long)]
    pub date: Option<String>,
    /// Force a specific render width (0 for auto-detect).
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    pub width: i32,
    /// Lesson planning document. Defaults to `lesson-planning.md` in the
    /// working directory.
    #[arg(long)]
    pub file: Option<PathBuf>,
    /// Color theme: auto, dark, light or notty.
    #[arg(long)]
    pub theme: Option<String>,
    /// Optional configuration file; no configuration is read unless given.
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Args {
    pub fn from_env() -> Self {
        Self::parse_from(normalize_args(std::env::args_os()))
    }
}

/// Rewrite `-date X` / `-date=X` style options into their `--` form so both
/// spellings reach clap. `-v=<bool>` and `-verbose=<bool>` become `--verbose`
/// or are dropped, depending on the value. Option values and anything after
/// `--` pass through.
pub fn normalize_args<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut out = Vec::new();
    let mut rest_verbatim = false;
    let mut value_pending = false;
    for (index, arg) in args.into_iter().enumerate() {
        let arg: OsString = arg.into();
        if index == 0 || rest_verbatim || value_pending {
            value_pending = false;
            out.push(arg);
            continue;
        }
        let Some(text) = arg.to_str() else {
            out.push(arg);
            continue;
        };
        if text == "--" {
            rest_verbatim = true;
            out.push(arg);
            continue;
        }
        let long = text
            .strip_prefix("--")
            .or_else(|| text.strip_prefix('-'))
            .filter(|name| !name.starts_with('-'));
        let Some(long) = long else {
            out.push(arg);
            continue;
        };
        let (name, inline_value) = match long.split_once('=') {
            Some((name, value)) => (name, Some(value)),
            None => (long, None),
        };
        if VERBOSE_NAMES.contains(&name) {
            match inline_value.map(parse_bool) {
                None if name == "verbose" => out.push(OsString::from("--verbose")),
                None => out.push(arg),
                Some(Some(true)) => out.push(OsString::from("--verbose")),
                Some(Some(false)) => {}
                // Left for clap to reject.
                Some(None) => out.push(arg),
            }
        } else if SINGLE_DASH_LONG.contains(&name) {
            value_pending = inline_value.is_none();
            out.push(OsString::from(format!("--{long}")));
        } else {
            out.push(arg);
        }
    }
    out
}

/// Boolean literals accepted for an inline flag value.
fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "1" | "t" | "T" | "true" | "TRUE" | "True" => Some(true),
        "0" | "f" | "F" | "false" | "FALSE" | "False" => Some(false),
        _ => None,
    }
}
