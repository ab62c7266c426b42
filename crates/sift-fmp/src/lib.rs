//! Financial Modeling Prep (FMP) API client for sift.
//!
//! This crate fetches per-ticker quote and company-profile data from the
//! [Financial Modeling Prep](https://financialmodelingprep.com/) API and
//! implements [`sift_traits::QuoteSource`] for the US equities view.
//!
//! # Usage
//!
//! ```rust,ignore
//! use sift_fmp::FmpClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = FmpClient::new(std::env::var("FMP_API_KEY")?);
//!
//!     // Price, market cap and P/E
//!     let quote = client.quote("AAPL").await?;
//!
//!     // Company name and sector
//!     let profile = client.profile("AAPL").await?;
//!
//!     Ok(())
//! }
//! ```

mod client;
mod error;
mod source;
mod types;

pub use client::{FMP_BASE_URL, FmpClient};
pub use error::FmpError;
pub use types::*;

/// Result type for FMP operations.
pub type Result<T> = std::result::Result<T, FmpError>;
