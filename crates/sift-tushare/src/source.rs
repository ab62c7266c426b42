//! [`ListingSource`] implementation backed by Tushare.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Days;
use sift_traits::{
    Date, FinancialRecord, Instrument, ListingQuery, ListingSource, RegionalListing,
    ReportingPeriod, SiftError,
};

use crate::{TushareClient, types::DailyBasic};

const DOMESTIC: &str = "A-share";
const REGIONAL: &str = "Hong Kong";

/// How many calendar days to walk back from the period end looking for a
/// trading day with valuation data.
const VALUATION_LOOKBACK_DAYS: u64 = 10;

impl TushareClient {
    /// Latest `daily_basic` snapshot on or before `end`.
    async fn valuation_snapshot(&self, end: Date) -> crate::Result<Vec<DailyBasic>> {
        for back in 0..VALUATION_LOOKBACK_DAYS {
            let Some(day) = end.checked_sub_days(Days::new(back)) else {
                break;
            };
            let rows = self.daily_basic(day).await?;
            if !rows.is_empty() {
                tracing::debug!(%day, rows = rows.len(), "valuation snapshot found");
                return Ok(rows);
            }
        }
        tracing::warn!(%end, "no valuation snapshot near period end");
        Ok(Vec::new())
    }
}

/// Fill `pe` on every record from a valuation snapshot, by code.
fn fill_pe(records: &mut [FinancialRecord], snapshot: Vec<DailyBasic>) {
    let by_code: HashMap<String, Option<f64>> =
        snapshot.into_iter().map(|row| (row.ts_code, row.pe)).collect();
    for record in records.iter_mut() {
        if record.pe.is_none() {
            record.pe = by_code.get(&record.code).copied().flatten();
        }
    }
}

#[async_trait]
impl ListingSource for TushareClient {
    async fn instruments(&self, query: &ListingQuery) -> sift_traits::Result<Vec<Instrument>> {
        let rows = self
            .stock_basic(query)
            .await
            .map_err(|e| SiftError::acquisition(DOMESTIC, e))?;
        Ok(rows.into_iter().map(Instrument::from).collect())
    }

    async fn financials(
        &self,
        period: &ReportingPeriod,
    ) -> sift_traits::Result<Vec<FinancialRecord>> {
        let rows = self
            .fina_indicator(period.start(), period.end())
            .await
            .map_err(|e| SiftError::acquisition(DOMESTIC, e))?;
        let mut records: Vec<FinancialRecord> =
            rows.into_iter().map(FinancialRecord::from).collect();

        // fina_indicator is a statement API; P/E lives in daily_basic.
        if !records.is_empty() && records.iter().all(|r| r.pe.is_none()) {
            let snapshot = self
                .valuation_snapshot(period.end())
                .await
                .map_err(|e| SiftError::acquisition(DOMESTIC, e))?;
            fill_pe(&mut records, snapshot);
        }

        Ok(records)
    }

    async fn regional_listing(&self) -> sift_traits::Result<Vec<RegionalListing>> {
        let rows = self
            .hk_basic()
            .await
            .map_err(|e| SiftError::acquisition(REGIONAL, e))?;
        Ok(rows.into_iter().map(RegionalListing::from).collect())
    }
}
