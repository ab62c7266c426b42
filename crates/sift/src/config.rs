//! Runtime configuration.
//!
//! Credentials and defaults come from the process environment, with a
//! `.env` file in the working directory acting as the secrets store.
//! Missing credentials are not an error here: the market that needs them
//! reports an acquisition failure when rendered.

use std::{env, time::Duration};

use sift_fmp::FmpClient;
use sift_traits::{
    ListingQuery, ListingSource, QuoteSource, ReportingPeriod, Result, SiftError, parse_date,
};
use sift_tushare::TushareClient;

use crate::source::Unconfigured;

/// US tickers shown when none are configured.
pub const DEFAULT_US_TICKERS: [&str; 5] = ["AAPL", "MSFT", "GOOGL", "TSLA", "NVDA"];

/// Year of the default reporting window.
pub const DEFAULT_PERIOD_YEAR: i32 = 2024;

/// Default HTTP timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Resolved sift configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct SiftConfig {
    /// Tushare Pro token.
    pub tushare_token: Option<String>,
    /// Tushare endpoint override.
    pub tushare_url: Option<String>,
    /// Financial Modeling Prep API key.
    pub fmp_api_key: Option<String>,
    /// Reporting window for financial indicators.
    pub period: ReportingPeriod,
    /// Listing filter for the domestic market.
    pub listing: ListingQuery,
    /// Tickers shown for the US market.
    pub us_tickers: Vec<String>,
    /// HTTP request timeout.
    pub timeout: Duration,
}

impl SiftConfig {
    /// Load configuration from the environment, reading `.env` first.
    ///
    /// # Errors
    ///
    /// Returns an error if a set variable has an invalid value.
    pub fn from_env() -> Result<Self> {
        // Try to load .env file (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// Blank values count as unset.
    ///
    /// # Errors
    ///
    /// Returns an error if a set variable has an invalid value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let default_period = ReportingPeriod::calendar_year(DEFAULT_PERIOD_YEAR)?;
        let start = get("SIFT_PERIOD_START")
            .map(|s| parse_date(&s))
            .transpose()?
            .unwrap_or(default_period.start());
        let end = get("SIFT_PERIOD_END")
            .map(|s| parse_date(&s))
            .transpose()?
            .unwrap_or(default_period.end());

        let us_tickers: Vec<String> = get("SIFT_US_TICKERS").map_or_else(
            || DEFAULT_US_TICKERS.iter().map(|t| (*t).to_string()).collect(),
            |list| {
                list.split(',')
                    .map(|t| t.trim().to_uppercase())
                    .filter(|t| !t.is_empty())
                    .collect()
            },
        );

        let timeout_secs = get("SIFT_HTTP_TIMEOUT_SECS")
            .map(|s| {
                s.trim().parse::<u64>().map_err(|e| {
                    SiftError::Other(format!("SIFT_HTTP_TIMEOUT_SECS={s}: {e}"))
                })
            })
            .transpose()?
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        Ok(Self {
            tushare_token: get("TUSHARE_TOKEN"),
            tushare_url: get("SIFT_TUSHARE_URL"),
            fmp_api_key: get("FMP_API_KEY"),
            period: ReportingPeriod::new(start, end)?,
            listing: ListingQuery::default(),
            us_tickers,
            timeout: Duration::from_secs(timeout_secs),
        })
    }

    /// Build the listing source: Tushare when a token is configured.
    #[must_use]
    pub fn listing_source(&self) -> Box<dyn ListingSource> {
        match &self.tushare_token {
            Some(token) => {
                let client = TushareClient::with_timeout(token.clone(), self.timeout);
                match &self.tushare_url {
                    Some(url) => Box::new(client.with_base_url(url.clone())),
                    None => Box::new(client),
                }
            }
            None => Box::new(Unconfigured::new("TUSHARE_TOKEN")),
        }
    }

    /// Build the quote source: FMP when an API key is configured.
    #[must_use]
    pub fn quote_source(&self) -> Box<dyn QuoteSource> {
        match &self.fmp_api_key {
            Some(key) => Box::new(FmpClient::with_timeout(key.clone(), self.timeout)),
            None => Box::new(Unconfigured::new("FMP_API_KEY")),
        }
    }
}
