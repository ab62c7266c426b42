//! Error types for the sift screener.
//!
//! Provider crates keep their own transport-level error enums; everything
//! that crosses a crate boundary is folded into [`SiftError`].

use thiserror::Error;

/// The main error type for sift operations.
#[derive(Debug, Error)]
pub enum SiftError {
    /// A market's data could not be fetched (network, auth or provider error).
    ///
    /// This is the one error class the presenter shows inline; it never
    /// aborts the other sections of a render.
    #[error("failed to fetch {market} data: {message}")]
    Acquisition {
        /// Display name of the market whose fetch failed.
        market: String,
        /// Provider or transport message.
        message: String,
    },

    /// A threshold is outside its allowed range.
    #[error("{name} must be within [{min}, {max}], got {value}")]
    InvalidThreshold {
        /// Threshold name.
        name: &'static str,
        /// Rejected value.
        value: f64,
        /// Lower bound (inclusive).
        min: f64,
        /// Upper bound (inclusive).
        max: f64,
    },

    /// Error when a date is out of range or invalid.
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    /// Error when a market name cannot be parsed.
    #[error("unknown market: {0} (expected a-share, hk or us)")]
    UnknownMarket(String),

    /// Error from Polars operations.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// A result frame is missing a value the row type requires.
    #[error("Malformed frame: {0}")]
    MalformedFrame(String),

    /// Generic error for other cases.
    #[error("Error: {0}")]
    Other(String),
}

impl SiftError {
    /// Build an acquisition failure for the given market.
    pub fn acquisition(market: impl Into<String>, err: impl std::fmt::Display) -> Self {
        Self::Acquisition {
            market: market.into(),
            message: err.to_string(),
        }
    }

    /// Whether this error is a per-market fetch failure.
    #[must_use]
    pub const fn is_acquisition(&self) -> bool {
        matches!(self, Self::Acquisition { .. })
    }
}

impl From<String> for SiftError {
    fn from(s: String) -> Self {
        Self::Other(s)
    }
}

impl From<&str> for SiftError {
    fn from(s: &str) -> Self {
        Self::Other(s.to_string())
    }
}

/// A specialized Result type for sift operations.
pub type Result<T> = std::result::Result<T, SiftError>;
