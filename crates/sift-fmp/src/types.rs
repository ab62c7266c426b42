//! Data types for FMP API responses.

use serde::{Deserialize, Serialize};
use sift_traits::ForeignQuote;

/// Real-time quote data from FMP.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    /// Ticker symbol.
    pub symbol: String,
    /// Company name.
    #[serde(default)]
    pub name: String,
    /// Current price.
    #[serde(default)]
    pub price: f64,
    /// Market cap.
    #[serde(default)]
    pub market_cap: Option<f64>,
    /// EPS.
    #[serde(default)]
    pub eps: Option<f64>,
    /// P/E ratio.
    #[serde(default)]
    pub pe: Option<f64>,
}

impl Quote {
    /// P/E as reported, or price over EPS when the field is absent.
    #[must_use]
    pub fn price_earnings(&self) -> Option<f64> {
        self.pe.or_else(|| match self.eps {
            Some(eps) if eps.abs() > f64::EPSILON => Some(self.price / eps),
            _ => None,
        })
    }
}

/// Company profile from FMP.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyProfile {
    /// Ticker symbol.
    pub symbol: String,
    /// Company name.
    #[serde(default)]
    pub company_name: Option<String>,
    /// Market cap.
    #[serde(default)]
    pub market_cap: Option<f64>,
    /// Sector.
    #[serde(default)]
    pub sector: Option<String>,
    /// Industry.
    #[serde(default)]
    pub industry: Option<String>,
}

/// Merge a profile and a quote into the descriptive record shown for a
/// foreign ticker. The profile wins for names, the quote for valuation.
#[must_use]
pub fn merge_quote(profile: CompanyProfile, quote: Quote) -> ForeignQuote {
    let pe = quote.price_earnings();
    let market_cap = quote.market_cap.or(profile.market_cap);
    let short_name = profile.company_name.unwrap_or(quote.name);

    ForeignQuote {
        symbol: profile.symbol,
        short_name,
        market_cap,
        pe,
        sector: profile.sector,
    }
}
