//! Date-keyed section extraction over a lesson-planning document.
//!
//! A lesson plan is a markdown file split into per-day sections, each opened
//! by a `### <Weekday> <YYYY-MM-DD>` heading. Given a date this crate derives
//! the exact heading (`TargetHeading`) and captures the lines belonging to it
//! (`Section`) in one forward pass with no backtracking.

pub mod extract;
pub mod heading;
pub mod section;

pub use extract::{LineClass, classify, extract, extract_from_reader};
pub use heading::{DATE_FORMAT, HEADING_MARKER, TargetHeading, parse_date};
pub use section::Section;
