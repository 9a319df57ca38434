//! Error types for stylesheet parsing.

/// Errors that can occur while reading stylesheet data.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// No `font-family: '<name>'` declaration was found.
    #[error("could not extract font family name")]
    MissingFamily,

    /// A `unicode-range` token is not of the form `U+HEX` or `U+HEX-HEX`.
    #[error("invalid unicode range: {0}")]
    InvalidRange(String),
}
