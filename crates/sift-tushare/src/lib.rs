//! Tushare Pro API client for sift.
//!
//! This crate fetches A-share and Hong Kong listings and financial
//! indicators from [Tushare Pro](https://tushare.pro/document/2) and
//! implements [`sift_traits::ListingSource`] on top of them.
//!
//! # Usage
//!
//! ```rust,ignore
//! use sift_tushare::TushareClient;
//! use sift_traits::{ListingQuery, ListingSource, ReportingPeriod};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = TushareClient::new(std::env::var("TUSHARE_TOKEN")?);
//!
//!     let instruments = client.instruments(&ListingQuery::default()).await?;
//!     let records = client
//!         .financials(&ReportingPeriod::calendar_year(2024)?)
//!         .await?;
//!
//!     Ok(())
//! }
//! ```

mod client;
mod error;
mod source;
mod types;

pub use client::{DEFAULT_BASE_URL, TushareClient};
pub use error::TushareError;
pub use types::*;

/// Result type for Tushare operations.
pub type Result<T> = std::result::Result<T, TushareError>;
