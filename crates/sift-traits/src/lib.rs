#![doc(issue_tracker_base_url = "https://github.com/factordynamics/sift/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Core types and provider traits for the sift stock screener.
//!
//! This crate holds the records every other sift crate passes around
//! (instruments, financial records, screen rows, regional listings and
//! foreign quotes), the shared error type, and the data-source traits that
//! provider clients implement.

/// The version of the sift-traits crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// Module declarations
pub mod error;
pub mod source;
pub mod types;

// Re-exports
pub use error::{Result, SiftError};
pub use source::{ListingSource, QuoteSource};
pub use types::{
    Code, Date, FinancialRecord, ForeignQuote, Instrument, ListingQuery, ListingStatus,
    RegionalListing, ReportingPeriod, ScreenRow, parse_date,
};
