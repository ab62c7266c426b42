//! Conversions between sift records and Polars frames.
//!
//! Each input frame carries a row-index column so the ranking can break ROE
//! ties by input order after the join has shuffled rows.

use polars::prelude::*;
use sift_traits::{Date, FinancialRecord, Instrument, Result, ScreenRow, SiftError};

pub(crate) const CODE: &str = "ts_code";
pub(crate) const SYMBOL: &str = "symbol";
pub(crate) const NAME: &str = "name";
pub(crate) const AREA: &str = "area";
pub(crate) const INDUSTRY: &str = "industry";
pub(crate) const ROE: &str = "roe";
pub(crate) const PE: &str = "pe";
pub(crate) const GROSS_MARGIN: &str = "gross_margin";
pub(crate) const PERIOD: &str = "period";
pub(crate) const INSTRUMENT_ROW: &str = "instrument_row";
pub(crate) const RECORD_ROW: &str = "record_row";

const PERIOD_FORMAT: &str = "%Y-%m-%d";

/// Build the instrument side of the join.
pub(crate) fn instruments_frame(instruments: &[Instrument]) -> Result<DataFrame> {
    let df = df! {
        CODE => instruments.iter().map(|i| i.code.as_str()).collect::<Vec<_>>(),
        SYMBOL => instruments.iter().map(|i| i.symbol.as_str()).collect::<Vec<_>>(),
        NAME => instruments.iter().map(|i| i.name.as_str()).collect::<Vec<_>>(),
        AREA => instruments.iter().map(|i| i.area.as_deref()).collect::<Vec<_>>(),
        INDUSTRY => instruments.iter().map(|i| i.industry.as_deref()).collect::<Vec<_>>(),
        INSTRUMENT_ROW => (0..instruments.len() as i64).collect::<Vec<_>>(),
    }?;
    Ok(df)
}

/// Build the financial-record side of the join.
pub(crate) fn records_frame(records: &[FinancialRecord]) -> Result<DataFrame> {
    let df = df! {
        CODE => records.iter().map(|r| r.code.as_str()).collect::<Vec<_>>(),
        ROE => records.iter().map(|r| r.roe).collect::<Vec<_>>(),
        PE => records.iter().map(|r| r.pe).collect::<Vec<_>>(),
        GROSS_MARGIN => records.iter().map(|r| r.gross_margin).collect::<Vec<_>>(),
        PERIOD => records
            .iter()
            .map(|r| r.period.map(|d| d.format(PERIOD_FORMAT).to_string()))
            .collect::<Vec<_>>(),
        RECORD_ROW => (0..records.len() as i64).collect::<Vec<_>>(),
    }?;
    Ok(df)
}

fn str_column<'a>(df: &'a DataFrame, name: &str) -> Result<&'a StringChunked> {
    Ok(df.column(name)?.as_materialized_series().str()?)
}

fn f64_column<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Float64Chunked> {
    Ok(df.column(name)?.as_materialized_series().f64()?)
}

fn required<T>(value: Option<T>, column: &str, row: usize) -> Result<T> {
    value.ok_or_else(|| SiftError::MalformedFrame(format!("null {column} at row {row}")))
}

/// Read screened rows back out of a joined frame.
pub(crate) fn rows_from_frame(df: &DataFrame) -> Result<Vec<ScreenRow>> {
    let code = str_column(df, CODE)?;
    let symbol = str_column(df, SYMBOL)?;
    let name = str_column(df, NAME)?;
    let area = str_column(df, AREA)?;
    let industry = str_column(df, INDUSTRY)?;
    let period = str_column(df, PERIOD)?;
    let roe = f64_column(df, ROE)?;
    let pe = f64_column(df, PE)?;
    let gross_margin = f64_column(df, GROSS_MARGIN)?;

    (0..df.height())
        .map(|i| {
            Ok(ScreenRow {
                code: required(code.get(i), CODE, i)?.to_string(),
                symbol: symbol.get(i).unwrap_or_default().to_string(),
                name: name.get(i).unwrap_or_default().to_string(),
                area: area.get(i).map(str::to_string),
                industry: industry.get(i).map(str::to_string),
                roe: required(roe.get(i), ROE, i)?,
                pe: required(pe.get(i), PE, i)?,
                gross_margin: required(gross_margin.get(i), GROSS_MARGIN, i)?,
                period: period
                    .get(i)
                    .and_then(|s| Date::parse_from_str(s, PERIOD_FORMAT).ok()),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn instrument(code: &str) -> Instrument {
        Instrument {
            code: code.to_string(),
            symbol: code.to_string(),
            name: format!("{code} Corp"),
            area: None,
            industry: Some("Banking".to_string()),
            list_date: None,
        }
    }

    #[test]
    fn test_instruments_frame_shape() {
        let df = instruments_frame(&[instrument("A"), instrument("B")]).unwrap();
        assert_eq!(df.height(), 2);
        assert_eq!(df.width(), 6);
        assert_eq!(df.column(AREA).unwrap().null_count(), 2);
    }

    #[test]
    fn test_empty_frames_keep_schema() {
        let df = records_frame(&[]).unwrap();
        assert_eq!(df.height(), 0);
        assert_eq!(df.column(ROE).unwrap().dtype(), &DataType::Float64);
        assert_eq!(df.column(CODE).unwrap().dtype(), &DataType::String);
    }
}
