//! Tushare API client implementation.

use std::{collections::BTreeMap, time::Duration};

use reqwest::Client;
use sift_traits::{Date, ListingQuery};

use crate::{
    Result,
    error::TushareError,
    types::{
        DailyBasic, FinaIndicator, HkBasic, StockBasic, Table, TushareRequest, TushareResponse,
        format_date,
    },
};

/// Base URL for the Tushare Pro HTTP API.
pub const DEFAULT_BASE_URL: &str = "http://api.tushare.pro";

/// Default request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Fields requested from `stock_basic`.
const STOCK_BASIC_FIELDS: &str = "ts_code,symbol,name,area,industry,list_date";

/// Fields requested from `daily_basic`.
const DAILY_BASIC_FIELDS: &str = "ts_code,trade_date,pe";

/// Fields requested from `hk_basic`.
const HK_BASIC_FIELDS: &str = "ts_code,name,fullname,market,list_date";

/// Tushare Pro API client.
#[derive(Debug, Clone)]
pub struct TushareClient {
    client: Client,
    token: String,
    base_url: String,
}

impl TushareClient {
    /// Create a new client with the given token and the default timeout.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self::with_timeout(token, DEFAULT_TIMEOUT)
    }

    /// Create a new client whose requests give up after `timeout`.
    #[must_use]
    pub fn with_timeout(token: impl Into<String>, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, "HTTP client build failed, requests will not time out");
                Client::new()
            });

        Self {
            client,
            token: token.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Point the client at a different endpoint.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// The endpoint this client posts to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Call a Tushare API and return its result table.
    async fn call(
        &self,
        api_name: &str,
        params: BTreeMap<String, String>,
        fields: &str,
    ) -> Result<Table> {
        let request = TushareRequest {
            api_name: api_name.to_string(),
            token: self.token.clone(),
            params,
            fields: fields.to_string(),
        };

        tracing::debug!(api = api_name, "sending Tushare request");
        let response = self.client.post(&self.base_url).json(&request).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(TushareError::Http(format!("HTTP {status}: {text}")));
        }

        let body: TushareResponse = response.json().await?;

        if body.code != 0 {
            return Err(TushareError::Api {
                code: body.code,
                msg: body.msg.unwrap_or_default(),
            });
        }

        let table = body
            .data
            .ok_or_else(|| TushareError::NoData(api_name.to_string()))?;
        tracing::debug!(api = api_name, rows = table.items.len(), "Tushare response received");
        Ok(table)
    }

    /// List instruments via `stock_basic`.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    pub async fn stock_basic(&self, query: &ListingQuery) -> Result<Vec<StockBasic>> {
        let mut params = BTreeMap::new();
        params.insert(
            "exchange".to_string(),
            query.exchange.clone().unwrap_or_default(),
        );
        params.insert("list_status".to_string(), query.status.as_str().to_string());

        self.call("stock_basic", params, STOCK_BASIC_FIELDS)
            .await?
            .rows("stock_basic")
    }

    /// List financial indicators announced within `[start, end]` via
    /// `fina_indicator`.
    ///
    /// The provider's default field set is requested.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    pub async fn fina_indicator(&self, start: Date, end: Date) -> Result<Vec<FinaIndicator>> {
        let mut params = BTreeMap::new();
        params.insert("start_date".to_string(), format_date(start));
        params.insert("end_date".to_string(), format_date(end));

        self.call("fina_indicator", params, "")
            .await?
            .rows("fina_indicator")
    }

    /// Valuation fields for every instrument on one trade date via
    /// `daily_basic`. Non-trading days yield an empty list.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    pub async fn daily_basic(&self, trade_date: Date) -> Result<Vec<DailyBasic>> {
        let mut params = BTreeMap::new();
        params.insert("trade_date".to_string(), format_date(trade_date));

        self.call("daily_basic", params, DAILY_BASIC_FIELDS)
            .await?
            .rows("daily_basic")
    }

    /// List Hong Kong instruments via `hk_basic`.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    pub async fn hk_basic(&self) -> Result<Vec<HkBasic>> {
        self.call("hk_basic", BTreeMap::new(), HK_BASIC_FIELDS)
            .await?
            .rows("hk_basic")
    }
}
