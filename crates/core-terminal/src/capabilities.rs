//! Terminal capability probing.
//!
//! Records what the renderer consults when picking a theme: whether stdout is
//! a terminal and, if it is, whether its background is light or dark.
//! Detection runs once at startup. The background query (OSC 11, answered by
//! most terminal emulators) only runs for an interactive stdout; a terminal
//! that does not answer leaves the background `Unknown`.
//!
//! The struct is non-exhaustive so additional capabilities (truecolor) can be
//! added without breaking downstream code.

use crossterm::tty::IsTty;

/// Luma above which a background counts as light.
const LIGHT_LUMA_THRESHOLD: f32 = 0.6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Background {
    Dark,
    Light,
    #[default]
    Unknown,
}

impl Background {
    /// Classify a background luma in `0.0..=1.0`.
    pub fn from_luma(luma: f32) -> Self {
        if luma.is_nan() {
            Self::Unknown
        } else if luma > LIGHT_LUMA_THRESHOLD {
            Self::Light
        } else {
            Self::Dark
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub struct TerminalCapabilities {
    /// Stdout is attached to an interactive terminal. When false the output is
    /// being piped or captured and must not carry escape sequences.
    pub stdout_is_tty: bool,
    pub background: Background,
}

impl TerminalCapabilities {
    pub const fn new(stdout_is_tty: bool) -> Self {
        Self {
            stdout_is_tty,
            background: Background::Unknown,
        }
    }

    pub const fn with_background(self, background: Background) -> Self {
        Self { background, ..self }
    }

    pub fn detect() -> Self {
        let stdout_is_tty = std::io::stdout().is_tty();
        let background = if stdout_is_tty {
            query_background()
        } else {
            Background::Unknown
        };
        let caps = Self::new(stdout_is_tty).with_background(background);
        tracing::debug!(
            target: "terminal.caps",
            stdout_is_tty = caps.stdout_is_tty,
            background = ?caps.background,
            "capabilities_detected"
        );
        caps
    }

    /// Capabilities of a non-interactive sink (pipes, files, test harnesses).
    pub const fn piped() -> Self {
        Self::new(false)
    }
}

fn query_background() -> Background {
    match terminal_light::luma() {
        Ok(luma) => Background::from_luma(luma),
        Err(e) => {
            tracing::debug!(target: "terminal.caps", error = %e, "background_query_failed");
            Background::Unknown
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn piped_reports_no_tty() {
        let caps = TerminalCapabilities::piped();
        assert!(!caps.stdout_is_tty);
        assert_eq!(caps.background, Background::Unknown);
    }

    #[test]
    fn new_round_trips_flag() {
        assert!(TerminalCapabilities::new(true).stdout_is_tty);
    }

    #[test]
    fn luma_maps_to_background() {
        assert_eq!(Background::from_luma(0.0), Background::Dark);
        assert_eq!(Background::from_luma(0.6), Background::Dark);
        assert_eq!(Background::from_luma(0.61), Background::Light);
        assert_eq!(Background::from_luma(1.0), Background::Light);
        assert_eq!(Background::from_luma(f32::NAN), Background::Unknown);
    }

    #[test]
    fn with_background_keeps_tty_flag() {
        let caps = TerminalCapabilities::new(true).with_background(Background::Light);
        assert!(caps.stdout_is_tty);
        assert_eq!(caps.background, Background::Light);
    }
}
