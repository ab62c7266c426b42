//! A screening session.
//!
//! A session owns the provider sources and the [`SessionCache`]. Each
//! interaction calls [`Session::render`] once for the selected market; the
//! provider is only hit the first time a given (operation, parameters) pair
//! is needed.

use sift_screen::{Screener, Thresholds};
use sift_traits::{ListingQuery, ListingSource, QuoteSource, ReportingPeriod, Result, SiftError};

use crate::{
    SiftConfig,
    cache::{CacheStats, SessionCache},
    market::{Market, MarketView},
};

/// Label a failure with the market it happened in.
fn in_market(market: Market, err: SiftError) -> SiftError {
    if err.is_acquisition() {
        err
    } else {
        SiftError::acquisition(market.label(), err)
    }
}

/// Provider sources, session cache and fixed acquisition parameters.
pub struct Session {
    listing: Box<dyn ListingSource>,
    quotes: Box<dyn QuoteSource>,
    cache: SessionCache,
    period: ReportingPeriod,
    listing_query: ListingQuery,
    us_tickers: Vec<String>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("cache", &self.cache.stats())
            .field("period", &self.period)
            .field("listing_query", &self.listing_query)
            .field("us_tickers", &self.us_tickers)
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Create a session over the given sources.
    #[must_use]
    pub fn new(
        listing: Box<dyn ListingSource>,
        quotes: Box<dyn QuoteSource>,
        period: ReportingPeriod,
        us_tickers: Vec<String>,
    ) -> Self {
        Self {
            listing,
            quotes,
            cache: SessionCache::new(),
            period,
            listing_query: ListingQuery::default(),
            us_tickers,
        }
    }

    /// Create a session from resolved configuration.
    #[must_use]
    pub fn from_config(config: &SiftConfig) -> Self {
        let mut session = Self::new(
            config.listing_source(),
            config.quote_source(),
            config.period,
            config.us_tickers.clone(),
        );
        session.listing_query = config.listing.clone();
        session
    }

    /// The reporting window used for financial indicators.
    #[must_use]
    pub const fn period(&self) -> &ReportingPeriod {
        &self.period
    }

    /// Tickers shown for the US market.
    #[must_use]
    pub fn us_tickers(&self) -> &[String] {
        &self.us_tickers
    }

    /// Combined cache statistics.
    #[must_use]
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Forget cached data so the next render refetches.
    pub fn refresh(&mut self) {
        tracing::info!("session cache cleared");
        self.cache.clear();
    }

    /// Produce the view for `market`.
    ///
    /// `thresholds` only affect [`Market::AShare`].
    ///
    /// # Errors
    ///
    /// Returns [`SiftError::Acquisition`] labelled with the market when its
    /// data cannot be fetched or screened.
    pub async fn render(&mut self, market: Market, thresholds: &Thresholds) -> Result<MarketView> {
        let view = match market {
            Market::AShare => self.domestic(thresholds).await,
            Market::HongKong => self.regional().await,
            Market::Us => self.foreign().await,
        };

        match &view {
            Ok(v) => tracing::info!(market = market.as_str(), rows = v.len(), "market rendered"),
            Err(e) => tracing::warn!(market = market.as_str(), error = %e, "market render failed"),
        }

        view.map_err(|e| in_market(market, e))
    }

    async fn domestic(&mut self, thresholds: &Thresholds) -> Result<MarketView> {
        let listing = &self.listing;
        let query = &self.listing_query;
        let period = &self.period;
        let cache = &mut self.cache;

        let instruments = cache
            .instruments
            .get_or_fetch(query.clone(), || listing.instruments(query))
            .await?;
        let records = cache
            .financials
            .get_or_fetch(*period, || listing.financials(period))
            .await?;

        let screen = Screener::new(*thresholds).screen(&instruments, &records)?;
        Ok(MarketView::Domestic(screen))
    }

    async fn regional(&mut self) -> Result<MarketView> {
        let listing = &self.listing;
        let rows = self
            .cache
            .regional
            .get_or_fetch((), || listing.regional_listing())
            .await?;
        Ok(MarketView::Regional(rows))
    }

    async fn foreign(&mut self) -> Result<MarketView> {
        let quotes = &self.quotes;
        let cache = &mut self.cache;

        let mut rows = Vec::with_capacity(self.us_tickers.len());
        for ticker in &self.us_tickers {
            let info = cache
                .quotes
                .get_or_fetch(ticker.clone(), || quotes.quote_info(ticker))
                .await?;
            rows.push((*info).clone());
        }
        Ok(MarketView::Foreign(rows))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use sift_traits::{FinancialRecord, ForeignQuote, Instrument, RegionalListing};
    use std::sync::{
        Arc,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    };

    #[derive(Default)]
    struct Calls {
        instruments: AtomicUsize,
        financials: AtomicUsize,
        regional: AtomicUsize,
        quotes: AtomicUsize,
    }

    struct FakeListing {
        calls: Arc<Calls>,
        fail_domestic: Arc<AtomicBool>,
    }

    #[async_trait]
    impl ListingSource for FakeListing {
        async fn instruments(&self, _query: &ListingQuery) -> Result<Vec<Instrument>> {
            self.calls.instruments.fetch_add(1, Ordering::SeqCst);
            if self.fail_domestic.load(Ordering::SeqCst) {
                return Err(SiftError::Other("connection reset".to_string()));
            }
            Ok(["A", "B"]
                .iter()
                .map(|code| Instrument {
                    code: (*code).to_string(),
                    symbol: (*code).to_string(),
                    name: format!("{code} Co"),
                    area: None,
                    industry: None,
                    list_date: None,
                })
                .collect())
        }

        async fn financials(&self, _period: &ReportingPeriod) -> Result<Vec<FinancialRecord>> {
            self.calls.financials.fetch_add(1, Ordering::SeqCst);
            let record = |code: &str, roe: f64, pe: f64, gm: f64| FinancialRecord {
                code: code.to_string(),
                roe: Some(roe),
                pe: Some(pe),
                gross_margin: Some(gm),
                period: None,
                announced: None,
            };
            Ok(vec![record("A", 20.0, 10.0, 40.0), record("B", 10.0, 5.0, 50.0)])
        }

        async fn regional_listing(&self) -> Result<Vec<RegionalListing>> {
            self.calls.regional.fetch_add(1, Ordering::SeqCst);
            Ok(vec![RegionalListing {
                code: "00700.HK".to_string(),
                name: "Tencent".to_string(),
                fullname: None,
                market: Some("Main Board".to_string()),
                list_date: None,
            }])
        }
    }

    struct FakeQuotes {
        calls: Arc<Calls>,
    }

    #[async_trait]
    impl QuoteSource for FakeQuotes {
        async fn quote_info(&self, ticker: &str) -> Result<ForeignQuote> {
            self.calls.quotes.fetch_add(1, Ordering::SeqCst);
            Ok(ForeignQuote {
                symbol: ticker.to_string(),
                short_name: format!("{ticker} Inc."),
                market_cap: Some(1.0e12),
                pe: Some(30.0),
                sector: Some("Technology".to_string()),
            })
        }
    }

    fn session() -> (Session, Arc<Calls>, Arc<AtomicBool>) {
        let calls = Arc::new(Calls::default());
        let fail = Arc::new(AtomicBool::new(false));
        let session = Session::new(
            Box::new(FakeListing {
                calls: Arc::clone(&calls),
                fail_domestic: Arc::clone(&fail),
            }),
            Box::new(FakeQuotes {
                calls: Arc::clone(&calls),
            }),
            ReportingPeriod::calendar_year(2024).unwrap(),
            vec!["MSFT".to_string(), "AAPL".to_string()],
        );
        (session, calls, fail)
    }

    #[tokio::test]
    async fn test_domestic_render_screens() {
        let (mut session, _, _) = session();
        let view = session
            .render(Market::AShare, &Thresholds::new(15.0, 25.0, 30.0))
            .await
            .unwrap();
        let MarketView::Domestic(screen) = view else {
            panic!("expected a domestic view");
        };
        let codes: Vec<&str> = screen.rows().iter().map(|r| r.code.as_str()).collect();
        assert_eq!(codes, vec!["A"]);
    }

    #[tokio::test]
    async fn test_threshold_change_reuses_cache() {
        let (mut session, calls, _) = session();
        session
            .render(Market::AShare, &Thresholds::default())
            .await
            .unwrap();
        let view = session
            .render(Market::AShare, &Thresholds::new(5.0, 25.0, 30.0))
            .await
            .unwrap();

        assert_eq!(view.len(), 2);
        assert_eq!(calls.instruments.load(Ordering::SeqCst), 1);
        assert_eq!(calls.financials.load(Ordering::SeqCst), 1);
        assert_eq!(session.cache_stats().hits, 2);
    }

    #[tokio::test]
    async fn test_failure_is_labelled_and_not_cached() {
        let (mut session, calls, fail) = session();
        fail.store(true, Ordering::SeqCst);

        let err = session
            .render(Market::AShare, &Thresholds::default())
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "failed to fetch A-share data: Error: connection reset"
        );

        // Other markets still render.
        let hk = session
            .render(Market::HongKong, &Thresholds::default())
            .await
            .unwrap();
        assert_eq!(hk.market(), Market::HongKong);
        assert_eq!(hk.len(), 1);

        fail.store(false, Ordering::SeqCst);
        session
            .render(Market::AShare, &Thresholds::default())
            .await
            .unwrap();
        assert_eq!(calls.instruments.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_foreign_fetches_each_ticker_once_in_order() {
        let (mut session, calls, _) = session();
        for _ in 0..2 {
            let view = session
                .render(Market::Us, &Thresholds::default())
                .await
                .unwrap();
            let MarketView::Foreign(rows) = view else {
                panic!("expected a foreign view");
            };
            let symbols: Vec<&str> = rows.iter().map(|r| r.symbol.as_str()).collect();
            assert_eq!(symbols, vec!["MSFT", "AAPL"]);
        }
        assert_eq!(calls.quotes.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_refresh_refetches() {
        let (mut session, calls, _) = session();
        session
            .render(Market::HongKong, &Thresholds::default())
            .await
            .unwrap();
        session.refresh();
        session
            .render(Market::HongKong, &Thresholds::default())
            .await
            .unwrap();
        assert_eq!(calls.regional.load(Ordering::SeqCst), 2);
    }

    struct FlakyQuotes {
        calls: Arc<Calls>,
        fail: Arc<AtomicBool>,
    }

    #[async_trait]
    impl QuoteSource for FlakyQuotes {
        async fn quote_info(&self, ticker: &str) -> Result<ForeignQuote> {
            self.calls.quotes.fetch_add(1, Ordering::SeqCst);
            if ticker == "AAPL" && self.fail.load(Ordering::SeqCst) {
                return Err(SiftError::acquisition("US", "AAPL: rate limit exceeded"));
            }
            Ok(ForeignQuote {
                symbol: ticker.to_string(),
                short_name: format!("{ticker} Inc."),
                market_cap: None,
                pe: Some(25.0),
                sector: None,
            })
        }
    }

    #[tokio::test]
    async fn test_failed_ticker_is_refetched() {
        let calls = Arc::new(Calls::default());
        let fail = Arc::new(AtomicBool::new(true));
        let mut session = Session::new(
            Box::new(FakeListing {
                calls: Arc::clone(&calls),
                fail_domestic: Arc::new(AtomicBool::new(false)),
            }),
            Box::new(FlakyQuotes {
                calls: Arc::clone(&calls),
                fail: Arc::clone(&fail),
            }),
            ReportingPeriod::calendar_year(2024).unwrap(),
            vec!["MSFT".to_string(), "AAPL".to_string()],
        );

        let err = session
            .render(Market::Us, &Thresholds::default())
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "failed to fetch US data: AAPL: rate limit exceeded"
        );
        assert_eq!(calls.quotes.load(Ordering::SeqCst), 2);

        fail.store(false, Ordering::SeqCst);
        let view = session
            .render(Market::Us, &Thresholds::default())
            .await
            .unwrap();
        assert_eq!(view.len(), 2);
        // MSFT came from the cache; only AAPL went back to the provider.
        assert_eq!(calls.quotes.load(Ordering::SeqCst), 3);
    }
}
