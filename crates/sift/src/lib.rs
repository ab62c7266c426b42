#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! ## Crate Organization
//!
//! - [`traits`] - Domain records, provider traits and the error type
//! - [`screen`] - Join, filter and rank over Polars frames
//! - [`tushare`] - Tushare Pro client (A-share and Hong Kong)
//! - [`fmp`] - Financial Modeling Prep client (US)
//!
//! This crate adds the pieces that tie them together: [`SiftConfig`],
//! the per-session [`cache`], the [`Market`] switch and [`Session`].

/// Version information for the sift crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod cache;
pub mod config;
pub mod market;
pub mod session;
pub mod source;

pub use cache::{CacheStats, FetchCache, SessionCache};
pub use config::SiftConfig;
pub use market::{Market, MarketView};
pub use session::Session;
pub use source::Unconfigured;

/// Core types and provider traits.
pub mod traits {
    pub use sift_traits::*;
}

/// The screening pipeline.
pub mod screen {
    pub use sift_screen::*;
}

/// Tushare Pro client.
pub mod tushare {
    pub use sift_tushare::*;
}

/// Financial Modeling Prep client.
pub mod fmp {
    pub use sift_fmp::*;
}

// Re-export the types most callers need at top level
pub use sift_screen::{CHART_TOP_N, Screen, Screener, Thresholds};
pub use sift_traits::{
    FinancialRecord, ForeignQuote, Instrument, ListingSource, QuoteSource, RegionalListing,
    ReportingPeriod, Result, ScreenRow, SiftError,
};
