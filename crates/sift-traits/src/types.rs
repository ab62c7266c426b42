//! Common types used throughout sift.
//!
//! Records here are provider-neutral: provider crates decode their wire
//! formats into these and the screening pipeline only ever sees these.

use serde::{Deserialize, Serialize};

use crate::{Result, SiftError};

// Re-export date type from chrono
pub use chrono::NaiveDate as Date;

/// An instrument identifier, e.g. `"600519.SH"`.
pub type Code = String;

/// A listed instrument with its descriptive fields.
///
/// Identity is [`Instrument::code`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instrument {
    /// Unique instrument code (join key).
    pub code: Code,
    /// Exchange-local symbol, e.g. `"600519"`.
    pub symbol: String,
    /// Display name.
    pub name: String,
    /// Region of registration.
    pub area: Option<String>,
    /// Industry classification.
    pub industry: Option<String>,
    /// Listing date.
    pub list_date: Option<Date>,
}

/// Financial indicators for one instrument and reporting period.
///
/// Percent-valued fields are in percent units (`15.0` means 15%). A missing
/// value never satisfies a threshold comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialRecord {
    /// Instrument code (foreign key to [`Instrument::code`]).
    pub code: Code,
    /// Return on equity, percent.
    pub roe: Option<f64>,
    /// Price/earnings ratio. Negative or missing for loss-making firms.
    pub pe: Option<f64>,
    /// Gross profit margin, percent.
    pub gross_margin: Option<f64>,
    /// Report period end date.
    pub period: Option<Date>,
    /// Announcement date.
    pub announced: Option<Date>,
}

/// One row of a screen: an instrument joined with one financial record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreenRow {
    /// Instrument code.
    pub code: Code,
    /// Exchange-local symbol.
    pub symbol: String,
    /// Display name.
    pub name: String,
    /// Region of registration.
    pub area: Option<String>,
    /// Industry classification.
    pub industry: Option<String>,
    /// Return on equity, percent.
    pub roe: f64,
    /// Price/earnings ratio.
    pub pe: f64,
    /// Gross profit margin, percent.
    pub gross_margin: f64,
    /// Report period end date.
    pub period: Option<Date>,
}

/// A Hong Kong listing entry, displayed unfiltered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionalListing {
    /// Instrument code, e.g. `"00700.HK"`.
    pub code: Code,
    /// Short name.
    pub name: String,
    /// Full company name.
    pub fullname: Option<String>,
    /// Board / market segment.
    pub market: Option<String>,
    /// Listing date.
    pub list_date: Option<Date>,
}

/// Descriptive quote information for a single foreign ticker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForeignQuote {
    /// Ticker symbol.
    pub symbol: String,
    /// Company short name.
    pub short_name: String,
    /// Market capitalization.
    pub market_cap: Option<f64>,
    /// Price/earnings ratio.
    pub pe: Option<f64>,
    /// Sector classification.
    pub sector: Option<String>,
}

/// A closed reporting window `[start, end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReportingPeriod {
    start: Date,
    end: Date,
}

impl ReportingPeriod {
    /// Create a reporting period.
    ///
    /// # Errors
    ///
    /// Returns [`SiftError::InvalidDate`] if `start` is after `end`.
    pub fn new(start: Date, end: Date) -> Result<Self> {
        if start > end {
            return Err(SiftError::InvalidDate(format!(
                "period start {start} is after end {end}"
            )));
        }
        Ok(Self { start, end })
    }

    /// The calendar year `year`, January 1st to December 31st.
    ///
    /// # Errors
    ///
    /// Returns an error if the year is outside chrono's supported range.
    pub fn calendar_year(year: i32) -> Result<Self> {
        let start = Date::from_ymd_opt(year, 1, 1)
            .ok_or_else(|| SiftError::InvalidDate(format!("year {year}")))?;
        let end = Date::from_ymd_opt(year, 12, 31)
            .ok_or_else(|| SiftError::InvalidDate(format!("year {year}")))?;
        Self::new(start, end)
    }

    /// First day of the window.
    #[must_use]
    pub const fn start(&self) -> Date {
        self.start
    }

    /// Last day of the window.
    #[must_use]
    pub const fn end(&self) -> Date {
        self.end
    }
}

/// Listing status filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ListingStatus {
    /// Currently listed.
    #[default]
    Listed,
    /// Delisted.
    Delisted,
    /// Suspended from listing.
    Paused,
}

impl ListingStatus {
    /// Single-letter code used by listing APIs.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Listed => "L",
            Self::Delisted => "D",
            Self::Paused => "P",
        }
    }
}

/// Parameters of a "list instruments" call.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ListingQuery {
    /// Exchange filter; `None` means all exchanges.
    pub exchange: Option<String>,
    /// Listing status filter.
    pub status: ListingStatus,
}

/// Parse a date string in YYYY-MM-DD format.
///
/// # Errors
///
/// Returns [`SiftError::InvalidDate`] if the string is not a valid date.
pub fn parse_date(date_str: &str) -> Result<Date> {
    Date::parse_from_str(date_str, "%Y-%m-%d")
        .map_err(|e| SiftError::InvalidDate(format!("{date_str}: {e}")))
}
