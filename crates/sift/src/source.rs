//! Placeholder sources for providers without credentials.

use async_trait::async_trait;
use sift_traits::{
    FinancialRecord, ForeignQuote, Instrument, ListingQuery, ListingSource, QuoteSource,
    RegionalListing, ReportingPeriod, Result, SiftError,
};

use crate::Market;

/// A source whose credential is missing.
///
/// Every call fails with an acquisition error naming the variable to set,
/// so the affected market renders an inline error and the rest still work.
#[derive(Debug, Clone, Copy)]
pub struct Unconfigured {
    variable: &'static str,
}

impl Unconfigured {
    /// Create a placeholder for the credential in `variable`.
    #[must_use]
    pub const fn new(variable: &'static str) -> Self {
        Self { variable }
    }

    fn fail<T>(&self, market: Market) -> Result<T> {
        Err(SiftError::acquisition(
            market.label(),
            format!("{} is not set", self.variable),
        ))
    }
}

#[async_trait]
impl ListingSource for Unconfigured {
    async fn instruments(&self, _query: &ListingQuery) -> Result<Vec<Instrument>> {
        self.fail(Market::AShare)
    }

    async fn financials(&self, _period: &ReportingPeriod) -> Result<Vec<FinancialRecord>> {
        self.fail(Market::AShare)
    }

    async fn regional_listing(&self) -> Result<Vec<RegionalListing>> {
        self.fail(Market::HongKong)
    }
}

#[async_trait]
impl QuoteSource for Unconfigured {
    async fn quote_info(&self, _ticker: &str) -> Result<ForeignQuote> {
        self.fail(Market::Us)
    }
}
