//! Terminal probing for the lesson viewer.
//!
//! Three concerns live here, all consulted once at startup:
//! * `probe`: the controlling terminal's column count behind `TerminalProbe`.
//! * `width`: the render width policy (override > probe minus margin > default).
//! * `capabilities`: whether stdout is an interactive terminal and how light its
//!   background is (theme selection).
//!
//! Nothing in this crate writes to the terminal; it only asks questions about it.

pub mod capabilities;
pub mod probe;
pub mod width;

pub use capabilities::{Background, TerminalCapabilities};
pub use probe::{FixedProbe, PlatformProbe, TerminalProbe};
pub use width::{
    DEFAULT_WIDTH, ResolvedWidth, SAFETY_MARGIN, WidthPolicy, WidthSource, resolve_width,
};
