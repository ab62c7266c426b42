//! Error types for the Tushare API client.

use thiserror::Error;

/// Errors that can occur when using the Tushare API.
#[derive(Debug, Error)]
pub enum TushareError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// JSON parsing failed.
    #[error("Failed to parse JSON response: {0}")]
    Json(#[from] serde_json::Error),

    /// Non-success HTTP status.
    #[error("Tushare HTTP error: {0}")]
    Http(String),

    /// The API answered with a non-zero code.
    #[error("Tushare API error {code}: {msg}")]
    Api {
        /// Provider error code.
        code: i64,
        /// Provider error message.
        msg: String,
    },

    /// The response carried no data table.
    #[error("No data returned by {0}")]
    NoData(String),

    /// A row's item count does not match the field list.
    #[error("{api}: row {row} has {got} values for {expected} fields")]
    RowShape {
        /// API name.
        api: String,
        /// Zero-based row index.
        row: usize,
        /// Number of values in the row.
        got: usize,
        /// Number of declared fields.
        expected: usize,
    },
}
