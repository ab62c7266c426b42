//! Data-source traits implemented by provider clients.
//!
//! The screener never talks to a provider directly; it goes through these
//! traits so a session can be driven by a real client or by an in-memory
//! fixture.

use async_trait::async_trait;

use crate::{
    Result,
    types::{FinancialRecord, ForeignQuote, Instrument, ListingQuery, RegionalListing, ReportingPeriod},
};

/// A provider of domestic and regional listings plus financial indicators.
///
/// Implementations return the complete result set in one call; there is no
/// pagination.
#[async_trait]
pub trait ListingSource: Send + Sync {
    /// List tradable instruments matching `query`.
    ///
    /// # Errors
    ///
    /// Returns an error on any transport or provider failure.
    async fn instruments(&self, query: &ListingQuery) -> Result<Vec<Instrument>>;

    /// List financial-indicator records for all instruments within `period`.
    ///
    /// # Errors
    ///
    /// Returns an error on any transport or provider failure.
    async fn financials(&self, period: &ReportingPeriod) -> Result<Vec<FinancialRecord>>;

    /// List the regional (Hong Kong) instruments.
    ///
    /// # Errors
    ///
    /// Returns an error on any transport or provider failure.
    async fn regional_listing(&self) -> Result<Vec<RegionalListing>>;
}

/// A provider of per-ticker quote information.
#[async_trait]
pub trait QuoteSource: Send + Sync {
    /// Fetch descriptive quote information for one ticker.
    ///
    /// # Errors
    ///
    /// Returns an error on any transport or provider failure, or if the
    /// ticker is unknown.
    async fn quote_info(&self, ticker: &str) -> Result<ForeignQuote>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SiftError;

    struct Unreachable;

    #[async_trait]
    impl QuoteSource for Unreachable {
        async fn quote_info(&self, ticker: &str) -> Result<ForeignQuote> {
            Err(SiftError::acquisition("US", format!("no route for {ticker}")))
        }
    }

    #[tokio::test]
    async fn test_trait_object_dispatch() {
        let source: Box<dyn QuoteSource> = Box::new(Unreachable);
        let err = source.quote_info("AAPL").await.unwrap_err();
        assert!(err.is_acquisition());
        assert!(err.to_string().contains("AAPL"));
    }
}
