//! Controlling terminal width probe.
//!
//! One contract, one platform body selected at compile time:
//! * Unix: `TIOCGWINSZ` ioctl against the standard input descriptor.
//! * Windows: visible window of the console screen buffer, `right - left + 1`
//!   (the computation `crossterm::terminal::size` performs).
//! * Anything else: no probe; callers fall back to their default.
//!
//! Failure is silent by contract (no controlling terminal, unsupported query,
//! OS error). The probe only reports `None`; deciding what to do about it is
//! the width policy's job.

/// Capability interface for querying the terminal's column count.
pub trait TerminalProbe {
    /// Current column count of the controlling terminal, `None` when unavailable.
    fn probe_width(&self) -> Option<u16>;
}

/// Probe backed by the host platform's terminal query.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlatformProbe;

impl TerminalProbe for PlatformProbe {
    fn probe_width(&self) -> Option<u16> {
        let columns = platform::window_columns();
        if columns.is_none() {
            tracing::trace!(target: "terminal.probe", "window_size_unavailable");
        }
        columns
    }
}

/// Probe returning a predetermined answer; used where no real terminal exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedProbe(pub Option<u16>);

impl FixedProbe {
    pub const fn columns(columns: u16) -> Self {
        Self(Some(columns))
    }

    pub const fn unavailable() -> Self {
        Self(None)
    }
}

impl TerminalProbe for FixedProbe {
    fn probe_width(&self) -> Option<u16> {
        self.0
    }
}

#[cfg(unix)]
mod platform {
    pub(super) fn window_columns() -> Option<u16> {
        let mut ws = libc::winsize {
            ws_row: 0,
            ws_col: 0,
            ws_xpixel: 0,
            ws_ypixel: 0,
        };
        // SAFETY: `ws` is a live, writable `winsize` for the whole call and
        // TIOCGWINSZ writes exactly one `winsize` through the pointer.
        let rc = unsafe {
            libc::ioctl(
                libc::STDIN_FILENO,
                libc::TIOCGWINSZ,
                &mut ws as *mut libc::winsize,
            )
        };
        if rc == -1 || ws.ws_col == 0 {
            return None;
        }
        Some(ws.ws_col)
    }
}

#[cfg(windows)]
mod platform {
    pub(super) fn window_columns() -> Option<u16> {
        crossterm::terminal::size()
            .ok()
            .map(|(columns, _rows)| columns)
            .filter(|columns| *columns > 0)
    }
}

#[cfg(not(any(unix, windows)))]
mod platform {
    pub(super) fn window_columns() -> Option<u16> {
        None
    }
}
