//! Render width resolution.
//!
//! Precedence, evaluated once per run:
//! 1. Explicit override: any non-zero value wins and the probe is never consulted.
//! 2. Probed terminal width minus a safety margin (keeps the last column free so
//!    terminals that auto-wrap at the edge do not double-break lines).
//! 3. Fixed default when the probe reports nothing.
//!
//! The override is carried as a signed value untouched; rejecting nonsensical
//! widths is the renderer's construction concern, not the resolver's.

use crate::probe::TerminalProbe;
use tracing::debug;

pub const DEFAULT_WIDTH: u16 = 80;
pub const SAFETY_MARGIN: u16 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WidthPolicy {
    pub default_columns: u16,
    pub margin: u16,
}

impl Default for WidthPolicy {
    fn default() -> Self {
        Self {
            default_columns: DEFAULT_WIDTH,
            margin: SAFETY_MARGIN,
        }
    }
}

impl WidthPolicy {
    pub const fn new(default_columns: u16, margin: u16) -> Self {
        Self {
            default_columns,
            margin,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidthSource {
    Override,
    Probed { detected: u16 },
    Default,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedWidth {
    pub columns: i32,
    pub source: WidthSource,
}

/// Resolve the wrap width. `override_columns == 0` means auto-detect.
pub fn resolve_width<P>(override_columns: i32, probe: &P, policy: WidthPolicy) -> ResolvedWidth
where
    P: TerminalProbe + ?Sized,
{
    if override_columns != 0 {
        debug!(target: "terminal.width", using = override_columns, "terminal_width_override");
        return ResolvedWidth {
            columns: override_columns,
            source: WidthSource::Override,
        };
    }

    match probe.probe_width() {
        Some(detected) => {
            // A terminal narrower than the margin still gets one usable column.
            let using = detected.saturating_sub(policy.margin).max(1);
            debug!(target: "terminal.width", detected, using, "terminal_width_detected");
            ResolvedWidth {
                columns: i32::from(using),
                source: WidthSource::Probed { detected },
            }
        }
        None => {
            let using = policy.default_columns;
            debug!(target: "terminal.width", using, "terminal_width_default");
            ResolvedWidth {
                columns: i32::from(using),
                source: WidthSource::Default,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probe::FixedProbe;
    use std::cell::Cell;

    struct CountingProbe {
        calls: Cell<usize>,
    }

    impl TerminalProbe for CountingProbe {
        fn probe_width(&self) -> Option<u16> {
            self.calls.set(self.calls.get() + 1);
            Some(200)
        }
    }

    #[test]
    fn override_skips_probe_entirely() {
        let probe = CountingProbe {
            calls: Cell::new(0),
        };
        let w = resolve_width(60, &probe, WidthPolicy::default());
        assert_eq!(w.columns, 60);
        assert_eq!(w.source, WidthSource::Override);
        assert_eq!(probe.calls.get(), 0);
    }

    #[test]
    fn negative_override_is_passed_through() {
        let w = resolve_width(-5, &FixedProbe::columns(100), WidthPolicy::default());
        assert_eq!(w.columns, -5);
        assert_eq!(w.source, WidthSource::Override);
    }

    #[test]
    fn probed_width_subtracts_margin() {
        let w = resolve_width(0, &FixedProbe::columns(120), WidthPolicy::default());
        assert_eq!(w.columns, 118);
        assert_eq!(w.source, WidthSource::Probed { detected: 120 });
    }

    #[test]
    fn failed_probe_falls_back_to_eighty() {
        let w = resolve_width(0, &FixedProbe::unavailable(), WidthPolicy::default());
        assert_eq!(w.columns, 80);
        assert_eq!(w.source, WidthSource::Default);
    }

    #[test]
    fn tiny_terminal_keeps_one_column() {
        let w = resolve_width(0, &FixedProbe::columns(2), WidthPolicy::default());
        assert_eq!(w.columns, 1);
    }

    #[test]
    fn custom_policy_applies_margin_and_default() {
        let policy = WidthPolicy::new(100, 4);
        assert_eq!(resolve_width(0, &FixedProbe::columns(50), policy).columns, 46);
        assert_eq!(
            resolve_width(0, &FixedProbe::unavailable(), policy).columns,
            100
        );
    }
}
