//! Wire types for Tushare Pro requests and responses.
//!
//! Tushare returns tables as a field list plus positional rows. [`Table`]
//! re-keys every row by field name before deserializing, so row structs do
//! not depend on the column order the server picks.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};
use sift_traits::{Date, FinancialRecord, Instrument, RegionalListing};

use crate::{Result, error::TushareError};

/// Date format used by Tushare parameters and fields.
pub const DATE_FORMAT: &str = "%Y%m%d";

/// Format a date the way Tushare expects it (`YYYYMMDD`).
#[must_use]
pub fn format_date(date: Date) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Parse an optional `YYYYMMDD` field, treating blanks and garbage as absent.
#[must_use]
pub fn parse_date(raw: Option<&str>) -> Option<Date> {
    raw.and_then(|s| Date::parse_from_str(s.trim(), DATE_FORMAT).ok())
}

/// Request envelope for every Tushare API call.
#[derive(Debug, Clone, Serialize)]
pub struct TushareRequest {
    /// API name, e.g. `stock_basic`.
    pub api_name: String,
    /// Access token.
    pub token: String,
    /// Query parameters.
    pub params: BTreeMap<String, String>,
    /// Comma-separated field list; empty means provider default.
    pub fields: String,
}

/// Response envelope for every Tushare API call.
#[derive(Debug, Clone, Deserialize)]
pub struct TushareResponse {
    /// Zero on success.
    pub code: i64,
    /// Error message when `code != 0`.
    #[serde(default)]
    pub msg: Option<String>,
    /// Result table.
    #[serde(default)]
    pub data: Option<Table>,
}

/// A Tushare result table.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Table {
    /// Column names.
    #[serde(default)]
    pub fields: Vec<String>,
    /// Positional rows.
    #[serde(default)]
    pub items: Vec<Vec<Value>>,
}

impl Table {
    /// Decode every row into `T` by field name.
    ///
    /// # Errors
    ///
    /// Returns an error if a row's length differs from the field list or a
    /// row does not deserialize into `T`.
    pub fn rows<T: DeserializeOwned>(&self, api: &str) -> Result<Vec<T>> {
        self.items
            .iter()
            .enumerate()
            .map(|(row, values)| {
                if values.len() != self.fields.len() {
                    return Err(TushareError::RowShape {
                        api: api.to_string(),
                        row,
                        got: values.len(),
                        expected: self.fields.len(),
                    });
                }
                let object: Map<String, Value> = self
                    .fields
                    .iter()
                    .cloned()
                    .zip(values.iter().cloned())
                    .collect();
                Ok(serde_json::from_value(Value::Object(object))?)
            })
            .collect()
    }
}

/// Row of the `stock_basic` API.
#[derive(Debug, Clone, Deserialize)]
pub struct StockBasic {
    /// Instrument code.
    pub ts_code: String,
    /// Exchange-local symbol.
    #[serde(default)]
    pub symbol: Option<String>,
    /// Short name.
    #[serde(default)]
    pub name: Option<String>,
    /// Region.
    #[serde(default)]
    pub area: Option<String>,
    /// Industry.
    #[serde(default)]
    pub industry: Option<String>,
    /// Listing date (`YYYYMMDD`).
    #[serde(default)]
    pub list_date: Option<String>,
}

impl From<StockBasic> for Instrument {
    fn from(row: StockBasic) -> Self {
        Self {
            list_date: parse_date(row.list_date.as_deref()),
            code: row.ts_code,
            symbol: row.symbol.unwrap_or_default(),
            name: row.name.unwrap_or_default(),
            area: row.area,
            industry: row.industry,
        }
    }
}

/// Row of the `fina_indicator` API (only the columns sift reads).
#[derive(Debug, Clone, Deserialize)]
pub struct FinaIndicator {
    /// Instrument code.
    pub ts_code: String,
    /// Announcement date.
    #[serde(default)]
    pub ann_date: Option<String>,
    /// Report period end date.
    #[serde(default)]
    pub end_date: Option<String>,
    /// Return on equity, percent.
    #[serde(default)]
    pub roe: Option<f64>,
    /// Gross profit margin, percent.
    #[serde(default)]
    pub grossprofit_margin: Option<f64>,
    /// Price/earnings ratio, when the payload carries it.
    #[serde(default)]
    pub pe: Option<f64>,
}

impl From<FinaIndicator> for FinancialRecord {
    fn from(row: FinaIndicator) -> Self {
        Self {
            period: parse_date(row.end_date.as_deref()),
            announced: parse_date(row.ann_date.as_deref()),
            code: row.ts_code,
            roe: row.roe,
            pe: row.pe,
            gross_margin: row.grossprofit_margin,
        }
    }
}

/// Row of the `daily_basic` API (valuation fields).
#[derive(Debug, Clone, Deserialize)]
pub struct DailyBasic {
    /// Instrument code.
    pub ts_code: String,
    /// Trade date.
    #[serde(default)]
    pub trade_date: Option<String>,
    /// Price/earnings ratio. Absent for loss-making firms.
    #[serde(default)]
    pub pe: Option<f64>,
}

/// Row of the `hk_basic` API.
#[derive(Debug, Clone, Deserialize)]
pub struct HkBasic {
    /// Instrument code.
    pub ts_code: String,
    /// Short name.
    #[serde(default)]
    pub name: Option<String>,
    /// Full company name.
    #[serde(default)]
    pub fullname: Option<String>,
    /// Market segment.
    #[serde(default)]
    pub market: Option<String>,
    /// Listing date (`YYYYMMDD`).
    #[serde(default)]
    pub list_date: Option<String>,
}

impl From<HkBasic> for RegionalListing {
    fn from(row: HkBasic) -> Self {
        Self {
            list_date: parse_date(row.list_date.as_deref()),
            code: row.ts_code,
            name: row.name.unwrap_or_default(),
            fullname: row.fullname,
            market: row.market,
        }
    }
}
