//! Display-width aware text utilities shared by the renderer.
//!
//! * `width`: terminal column width of grapheme clusters.
//! * `wrap`: greedy word wrap over styled runs that honors hard newlines.

pub mod width;
pub mod wrap;

pub use width::{egc_width, str_width};
pub use wrap::{Run, wrap_plain, wrap_runs};
