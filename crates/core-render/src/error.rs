//! Render adapter errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    /// Construction rejected the wrap width (zero, negative, or beyond `u16`).
    #[error("invalid wrap width {0}: expected 1..=65535 columns")]
    InvalidWidth(i64),
    #[error("unknown theme `{0}` (expected auto, dark, light or notty)")]
    UnknownTheme(String),
    #[error("failed to write styled output")]
    Format(#[from] std::fmt::Error),
}
