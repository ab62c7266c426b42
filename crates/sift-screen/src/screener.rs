//! The join-filter-rank pipeline.

use polars::prelude::*;
use serde::Serialize;
use sift_traits::{FinancialRecord, Instrument, Result, ScreenRow};

use crate::{
    frame::{
        CODE, GROSS_MARGIN, INSTRUMENT_ROW, PE, RECORD_ROW, ROE, instruments_frame, records_frame,
        rows_from_frame,
    },
    thresholds::Thresholds,
};

/// Number of rows shown in the ROE bar chart.
pub const CHART_TOP_N: usize = 10;

/// Screens instruments against financial thresholds.
///
/// Rows are ranked by ROE descending. Ties keep input order: first by the
/// instrument's position in the listing, then by the record's position in
/// the indicator list. A code that appears several times on either side
/// joins as a cross product, with no deduplication.
///
/// # Example
///
/// ```ignore
/// use sift_screen::{Screener, Thresholds};
///
/// let screener = Screener::new(Thresholds::new(15.0, 25.0, 30.0));
/// let screen = screener.screen(&instruments, &records)?;
/// println!("{} of {} joined rows pass", screen.len(), screen.joined());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Screener {
    thresholds: Thresholds,
}

impl Screener {
    /// Create a screener with the given thresholds.
    #[must_use]
    pub const fn new(thresholds: Thresholds) -> Self {
        Self { thresholds }
    }

    /// The thresholds this screener applies.
    #[must_use]
    pub const fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    /// Predicate for a joined row. Nulls compare as false and drop the row.
    fn predicate(&self) -> Expr {
        let t = &self.thresholds;
        col(ROE)
            .gt(lit(t.roe_min))
            .and(col(PE).lt(lit(t.pe_max)))
            .and(col(GROSS_MARGIN).gt(lit(t.gross_min)))
    }

    /// Join, filter and rank.
    ///
    /// Empty inputs produce an empty screen.
    ///
    /// # Errors
    ///
    /// Returns an error if a Polars operation fails.
    pub fn screen(
        &self,
        instruments: &[Instrument],
        records: &[FinancialRecord],
    ) -> Result<Screen> {
        let joined = instruments_frame(instruments)?
            .lazy()
            .inner_join(records_frame(records)?.lazy(), col(CODE), col(CODE))
            .collect()?;

        let ranked = joined
            .clone()
            .lazy()
            .filter(self.predicate())
            .sort(
                [ROE, INSTRUMENT_ROW, RECORD_ROW],
                SortMultipleOptions::default().with_order_descending_multi([true, false, false]),
            )
            .collect()?;

        let rows = rows_from_frame(&ranked)?;
        tracing::debug!(
            instruments = instruments.len(),
            records = records.len(),
            joined = joined.height(),
            passed = rows.len(),
            "screen complete"
        );

        Ok(Screen {
            rows,
            joined: joined.height(),
            thresholds: self.thresholds,
        })
    }
}

/// Result of a screen: passing rows in rank order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Screen {
    rows: Vec<ScreenRow>,
    joined: usize,
    thresholds: Thresholds,
}

impl Screen {
    /// Passing rows, highest ROE first.
    #[must_use]
    pub fn rows(&self) -> &[ScreenRow] {
        &self.rows
    }

    /// Consume the screen and return its rows.
    #[must_use]
    pub fn into_rows(self) -> Vec<ScreenRow> {
        self.rows
    }

    /// Number of passing rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether no row passed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of rows the inner join produced before filtering.
    #[must_use]
    pub const fn joined(&self) -> usize {
        self.joined
    }

    /// Thresholds the screen was computed with.
    #[must_use]
    pub const fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    /// The first `n` rows, or all of them when fewer.
    #[must_use]
    pub fn top(&self, n: usize) -> &[ScreenRow] {
        &self.rows[..n.min(self.rows.len())]
    }

    /// The rows shown in the ROE bar chart.
    #[must_use]
    pub fn top_chart(&self) -> &[ScreenRow] {
        self.top(CHART_TOP_N)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    fn instrument(code: &str) -> Instrument {
        Instrument {
            code: code.to_string(),
            symbol: code.to_string(),
            name: format!("{code} Holdings"),
            area: Some("Shanghai".to_string()),
            industry: None,
            list_date: None,
        }
    }

    fn record(code: &str, roe: f64, pe: f64, gm: f64) -> FinancialRecord {
        FinancialRecord {
            code: code.to_string(),
            roe: Some(roe),
            pe: Some(pe),
            gross_margin: Some(gm),
            period: None,
            announced: None,
        }
    }

    fn codes(screen: &Screen) -> Vec<&str> {
        screen.rows().iter().map(|r| r.code.as_str()).collect()
    }

    fn default_screener() -> Screener {
        Screener::new(Thresholds::new(15.0, 25.0, 30.0))
    }

    #[test]
    fn test_reference_scenario() {
        let instruments = vec![instrument("A"), instrument("B")];
        let records = vec![record("A", 20.0, 10.0, 40.0), record("B", 10.0, 5.0, 50.0)];

        let screen = default_screener().screen(&instruments, &records).unwrap();
        assert_eq!(codes(&screen), vec!["A"]);
        assert_eq!(screen.joined(), 2);
        let row = &screen.rows()[0];
        assert_eq!(row.name, "A Holdings");
        assert_eq!(row.area.as_deref(), Some("Shanghai"));
        assert_relative_eq!(row.roe, 20.0);
        assert_relative_eq!(row.pe, 10.0);
        assert_relative_eq!(row.gross_margin, 40.0);
    }

    #[test]
    fn test_empty_instruments() {
        let records = vec![record("A", 20.0, 10.0, 40.0)];
        let screen = default_screener().screen(&[], &records).unwrap();
        assert!(screen.is_empty());
        assert_eq!(screen.joined(), 0);
        assert!(screen.top_chart().is_empty());
    }

    #[test]
    fn test_both_inputs_empty() {
        let screen = default_screener().screen(&[], &[]).unwrap();
        assert!(screen.is_empty());
    }

    #[test]
    fn test_boundaries_are_exclusive() {
        let instruments = vec![instrument("R"), instrument("P"), instrument("G"), instrument("OK")];
        let records = vec![
            record("R", 15.0, 10.0, 40.0),
            record("P", 20.0, 25.0, 40.0),
            record("G", 20.0, 10.0, 30.0),
            record("OK", 15.01, 24.99, 30.01),
        ];
        let screen = default_screener().screen(&instruments, &records).unwrap();
        assert_eq!(codes(&screen), vec!["OK"]);
    }

    #[test]
    fn test_unmatched_rows_are_dropped() {
        let instruments = vec![instrument("A"), instrument("NOFIN")];
        let records = vec![record("A", 20.0, 10.0, 40.0), record("ORPHAN", 30.0, 10.0, 40.0)];
        let screen = default_screener().screen(&instruments, &records).unwrap();
        assert_eq!(codes(&screen), vec!["A"]);
        assert_eq!(screen.joined(), 1);
    }

    #[test]
    fn test_missing_values_never_pass() {
        let instruments = vec![instrument("A"), instrument("B")];
        let mut loss_maker = record("A", 20.0, 0.0, 40.0);
        loss_maker.pe = None;
        let records = vec![loss_maker, record("B", 18.0, -3.0, 40.0)];
        let screen = default_screener().screen(&instruments, &records).unwrap();
        // Negative P/E is a number and passes `pe < pe_max`.
        assert_eq!(codes(&screen), vec!["B"]);
    }

    #[test]
    fn test_ranking_and_tie_break() {
        let instruments = vec![instrument("C"), instrument("A"), instrument("B")];
        let records = vec![
            record("A", 20.0, 10.0, 40.0),
            record("B", 35.0, 10.0, 40.0),
            record("C", 20.0, 10.0, 40.0),
        ];
        let screen = default_screener().screen(&instruments, &records).unwrap();
        // C precedes A on the ROE tie because it is listed first.
        assert_eq!(codes(&screen), vec!["B", "C", "A"]);
    }

    #[test]
    fn test_duplicate_codes_cross_join() {
        let instruments = vec![instrument("A"), instrument("A")];
        let records = vec![record("A", 20.0, 10.0, 40.0), record("A", 25.0, 10.0, 40.0)];
        let screen = default_screener().screen(&instruments, &records).unwrap();
        assert_eq!(screen.len(), 4);
        assert_eq!(screen.joined(), 4);
        let roes: Vec<f64> = screen.rows().iter().map(|r| r.roe).collect();
        assert_eq!(roes, vec![25.0, 25.0, 20.0, 20.0]);
    }

    #[test]
    fn test_top_chart_truncates() {
        let instruments: Vec<Instrument> = (0..15).map(|i| instrument(&format!("S{i:02}"))).collect();
        let records: Vec<FinancialRecord> = (0..15)
            .map(|i| record(&format!("S{i:02}"), 16.0 + f64::from(i), 10.0, 40.0))
            .collect();
        let screen = default_screener().screen(&instruments, &records).unwrap();
        assert_eq!(screen.len(), 15);
        assert_eq!(screen.top_chart().len(), CHART_TOP_N);
        assert_eq!(screen.top_chart(), &screen.rows()[..10]);
        assert_eq!(screen.top_chart()[0].code, "S14");
        assert_eq!(screen.top(100).len(), 15);
    }

    // ------------------------------------------------------------------
    // Properties
    // ------------------------------------------------------------------

    /// Values chosen to land on, just inside and outside the thresholds.
    fn metric() -> impl Strategy<Value = Option<f64>> {
        prop_oneof![
            1 => Just(None),
            6 => prop::sample::select(vec![
                -5.0, 0.0, 10.0, 14.9, 15.0, 15.1, 24.9, 25.0, 25.1, 29.9, 30.0, 30.1, 45.0,
            ])
            .prop_map(Some),
        ]
    }

    fn code() -> impl Strategy<Value = String> {
        prop::sample::select(vec!["A", "B", "C", "D", "E", "F"]).prop_map(str::to_string)
    }

    fn instruments_strategy() -> impl Strategy<Value = Vec<Instrument>> {
        prop::collection::vec(code().prop_map(|c| instrument(&c)), 0..8)
    }

    fn records_strategy() -> impl Strategy<Value = Vec<FinancialRecord>> {
        prop::collection::vec(
            (code(), metric(), metric(), metric()).prop_map(|(code, roe, pe, gross_margin)| {
                FinancialRecord {
                    code,
                    roe,
                    pe,
                    gross_margin,
                    period: None,
                    announced: None,
                }
            }),
            0..12,
        )
    }

    fn thresholds_strategy() -> impl Strategy<Value = Thresholds> {
        (
            prop::sample::select(vec![0.0, 15.0, 25.0, 40.0]),
            prop::sample::select(vec![0.0, 15.0, 25.0, 100.0]),
            prop::sample::select(vec![0.0, 15.0, 30.0, 100.0]),
        )
            .prop_map(|(r, p, g)| Thresholds::new(r, p, g))
    }

    fn passes(t: &Thresholds, r: &FinancialRecord) -> bool {
        matches!(
            (r.roe, r.pe, r.gross_margin),
            (Some(roe), Some(pe), Some(gm)) if roe > t.roe_min && pe < t.pe_max && gm > t.gross_min
        )
    }

    /// Nested-loop join with a stable sort, in input order.
    fn expected(
        instruments: &[Instrument],
        records: &[FinancialRecord],
        t: &Thresholds,
    ) -> Vec<(String, f64)> {
        let mut out: Vec<(String, f64)> = instruments
            .iter()
            .flat_map(|i| records.iter().filter(move |r| r.code == i.code))
            .filter(|r| passes(t, r))
            .map(|r| (r.code.clone(), r.roe.unwrap_or_default()))
            .collect();
        out.sort_by(|a, b| b.1.total_cmp(&a.1));
        out
    }

    proptest! {
        #[test]
        fn prop_matches_nested_loop_reference(
            instruments in instruments_strategy(),
            records in records_strategy(),
            t in thresholds_strategy(),
        ) {
            let screen = Screener::new(t).screen(&instruments, &records).unwrap();
            let got: Vec<(String, f64)> =
                screen.rows().iter().map(|r| (r.code.clone(), r.roe)).collect();
            prop_assert_eq!(got, expected(&instruments, &records, &t));
        }

        #[test]
        fn prop_rows_satisfy_predicates_and_are_ranked(
            instruments in instruments_strategy(),
            records in records_strategy(),
            t in thresholds_strategy(),
        ) {
            let screen = Screener::new(t).screen(&instruments, &records).unwrap();
            for row in screen.rows() {
                prop_assert!(row.roe > t.roe_min);
                prop_assert!(row.pe < t.pe_max);
                prop_assert!(row.gross_margin > t.gross_min);
                prop_assert!(instruments.iter().any(|i| i.code == row.code));
                prop_assert!(records.iter().any(|r| r.code == row.code));
            }
            for pair in screen.rows().windows(2) {
                prop_assert!(pair[0].roe >= pair[1].roe);
            }
            let excluded = screen.joined() - screen.len();
            let failing = instruments
                .iter()
                .flat_map(|i| records.iter().filter(move |r| r.code == i.code))
                .filter(|r| !passes(&t, r))
                .count();
            prop_assert_eq!(excluded, failing);
        }

        #[test]
        fn prop_idempotent(
            instruments in instruments_strategy(),
            records in records_strategy(),
            t in thresholds_strategy(),
        ) {
            let screener = Screener::new(t);
            let first = screener.screen(&instruments, &records).unwrap();
            let second = screener.screen(&instruments, &records).unwrap();
            prop_assert_eq!(first, second);
        }

        #[test]
        fn prop_top_chart_is_prefix(
            instruments in instruments_strategy(),
            records in records_strategy(),
        ) {
            let screen = Screener::new(Thresholds::new(0.0, 100.0, 0.0))
                .screen(&instruments, &records)
                .unwrap();
            let n = screen.len().min(CHART_TOP_N);
            prop_assert_eq!(screen.top_chart(), &screen.rows()[..n]);
        }
    }
}
