//! [`QuoteSource`] implementation backed by FMP.

use async_trait::async_trait;
use sift_traits::{ForeignQuote, QuoteSource, SiftError};

use crate::{FmpClient, FmpError, types::merge_quote};

const FOREIGN: &str = "US";

#[async_trait]
impl QuoteSource for FmpClient {
    async fn quote_info(&self, ticker: &str) -> sift_traits::Result<ForeignQuote> {
        let label = |e: FmpError| SiftError::acquisition(FOREIGN, format!("{ticker}: {e}"));
        let profile = self.profile(ticker).await.map_err(label)?;
        let quote = self.quote(ticker).await.map_err(label)?;

        Ok(merge_quote(profile, quote))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{method, path},
    };

    #[tokio::test]
    async fn test_quote_info_merges_profile_and_quote() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/profile"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
                "symbol": "AAPL",
                "companyName": "Apple Inc.",
                "sector": "Technology"
            }])))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/quote"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
                "symbol": "AAPL",
                "name": "Apple Inc.",
                "price": 210.0,
                "marketCap": 3.1e12,
                "pe": 32.0
            }])))
            .mount(&server)
            .await;

        let client = FmpClient::new("k").with_base_url(server.uri());
        let info = client.quote_info("AAPL").await.unwrap();
        assert_eq!(info.symbol, "AAPL");
        assert_eq!(info.short_name, "Apple Inc.");
        assert_eq!(info.market_cap, Some(3.1e12));
        assert_eq!(info.pe, Some(32.0));
        assert_eq!(info.sector.as_deref(), Some("Technology"));
    }

    #[tokio::test]
    async fn test_profile_failure_is_acquisition_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401).set_body_string("Invalid API KEY"))
            .mount(&server)
            .await;

        let client = FmpClient::new("bad").with_base_url(server.uri());
        let err = client.quote_info("TSLA").await.unwrap_err();
        assert!(err.is_acquisition());
        assert!(err.to_string().contains("TSLA"));
    }

    #[tokio::test]
    async fn test_rate_limited_quote_fails_the_ticker() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/profile"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
                "symbol": "AAPL",
                "companyName": "Apple Inc.",
                "sector": "Technology"
            }])))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/quote"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&server)
            .await;

        let client = FmpClient::new("k").with_base_url(server.uri());
        let err = client.quote_info("AAPL").await.unwrap_err();
        assert!(err.is_acquisition());
        assert!(err.to_string().starts_with("failed to fetch US data: AAPL: Rate limit"));
    }
}
