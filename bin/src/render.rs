//! Terminal and JSON presentation of market views.

use serde_json::{Value, json};
use sift::{Market, MarketView};
use sift_screen::{CHART_TOP_N, Screen, Thresholds};
use sift_traits::{ForeignQuote, RegionalListing, ReportingPeriod, ScreenRow, SiftError};
use std::fmt::Write;

/// Width of the longest bar in the ROE chart.
const BAR_WIDTH: usize = 40;

const RULE: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━";

/// Boxed title banner.
pub(crate) fn banner(title: &str) -> String {
    let inner: usize = 62;
    let pad = inner.saturating_sub(title.chars().count());
    let left = pad / 2;
    format!(
        "╔{bar}╗\n║{:left$}{title}{:right$}║\n╚{bar}╝\n",
        "",
        "",
        bar = "═".repeat(inner),
        left = left,
        right = pad - left,
    )
}

fn section(title: &str) -> String {
    format!("{RULE}\n{title}\n{RULE}\n")
}

/// Terminal columns taken by `c`: two for CJK and fullwidth forms.
fn char_width(c: char) -> usize {
    let code = c as u32;
    let wide = (0x4E00..=0x9FFF).contains(&code)
        || (0x3400..=0x4DBF).contains(&code)
        || (0xF900..=0xFAFF).contains(&code)
        || (0x3000..=0x303F).contains(&code)
        || (0xFF00..=0xFFEF).contains(&code)
        || (0xAC00..=0xD7AF).contains(&code);
    if wide { 2 } else { 1 }
}

/// Display width of `s` in terminal columns.
pub(crate) fn display_width(s: &str) -> usize {
    s.chars().map(char_width).sum()
}

/// `s` truncated and padded to exactly `width` columns.
pub(crate) fn fit(s: &str, width: usize) -> String {
    let mut out = String::new();
    let mut used = 0;
    for c in s.chars() {
        let w = char_width(c);
        if used + w > width {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push_str(&" ".repeat(width - used));
    out
}

fn opt(value: Option<&str>) -> &str {
    value.unwrap_or("-")
}

fn opt_num(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v:.2}"))
}

/// Market capitalization in T/B/M units.
pub(crate) fn human_amount(value: Option<f64>) -> String {
    match value {
        None => "-".to_string(),
        Some(v) if v.abs() >= 1e12 => format!("{:.2}T", v / 1e12),
        Some(v) if v.abs() >= 1e9 => format!("{:.2}B", v / 1e9),
        Some(v) if v.abs() >= 1e6 => format!("{:.2}M", v / 1e6),
        Some(v) => format!("{v:.0}"),
    }
}

/// The inline message shown when a market cannot be rendered.
pub(crate) fn error_line(err: &SiftError) -> String {
    format!("error: {err}")
}

/// Threshold summary line.
pub(crate) fn thresholds_line(thresholds: &Thresholds) -> String {
    format!(
        "ROE > {:.1}%   P/E < {:.1}   Gross margin > {:.1}%",
        thresholds.roe_min, thresholds.pe_max, thresholds.gross_min
    )
}

/// Passing rows as a table, optionally limited to the first `limit`.
pub(crate) fn screen_table(rows: &[ScreenRow], limit: Option<usize>) -> String {
    let shown = limit.map_or(rows, |n| &rows[..n.min(rows.len())]);
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<4} {:<10} {:<12} {:<14} {:>8} {:>8} {:>8}",
        "#", "Code", "Name", "Industry", "ROE %", "P/E", "GM %"
    );
    let _ = writeln!(out, "{}", "─".repeat(70));
    for (rank, row) in shown.iter().enumerate() {
        let _ = writeln!(
            out,
            "{:<4} {:<10} {} {} {:>8.2} {:>8.2} {:>8.2}",
            rank + 1,
            row.code,
            fit(&row.name, 12),
            fit(opt(row.industry.as_deref()), 14),
            row.roe,
            row.pe,
            row.gross_margin,
        );
    }
    if shown.len() < rows.len() {
        let _ = writeln!(out, "... {} more", rows.len() - shown.len());
    }
    out
}

/// Horizontal ROE bar chart. Bars are scaled to the largest ROE shown.
pub(crate) fn roe_chart(rows: &[ScreenRow]) -> String {
    let max = rows.iter().map(|r| r.roe).fold(0.0_f64, f64::max);
    let mut out = String::new();
    for row in rows {
        let len = if max > 0.0 {
            ((row.roe.max(0.0) / max) * BAR_WIDTH as f64).round() as usize
        } else {
            0
        };
        let _ = writeln!(
            out,
            "{} {:<bar_width$} {:>7.2}",
            fit(&row.name, 12),
            "█".repeat(len),
            row.roe,
            bar_width = BAR_WIDTH,
        );
    }
    out
}

fn domestic_text(screen: &Screen, limit: Option<usize>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", thresholds_line(screen.thresholds()));
    let _ = writeln!(
        out,
        "{} of {} joined stocks pass\n",
        screen.len(),
        screen.joined()
    );
    if screen.is_empty() {
        out.push_str("No stocks match the current thresholds.\n");
        return out;
    }
    out.push_str(&section("MATCHES (by ROE)"));
    out.push_str(&screen_table(screen.rows(), limit));
    out.push('\n');
    out.push_str(&section(&format!("TOP {CHART_TOP_N} BY ROE")));
    out.push_str(&roe_chart(screen.top_chart()));
    out
}

/// Hong Kong listing table.
pub(crate) fn regional_table(rows: &[RegionalListing], limit: Option<usize>) -> String {
    let shown = limit.map_or(rows, |n| &rows[..n.min(rows.len())]);
    let mut out = String::new();
    let _ = writeln!(out, "{:<10} {:<20} {:<12} {:>10}", "Code", "Name", "Board", "Listed");
    let _ = writeln!(out, "{}", "─".repeat(55));
    for row in shown {
        let listed = row
            .list_date
            .map_or_else(|| "-".to_string(), |d| d.format("%Y-%m-%d").to_string());
        let _ = writeln!(
            out,
            "{:<10} {} {} {:>10}",
            row.code,
            fit(&row.name, 20),
            fit(opt(row.market.as_deref()), 12),
            listed
        );
    }
    if shown.len() < rows.len() {
        let _ = writeln!(out, "... {} more", rows.len() - shown.len());
    }
    out
}

/// US quote table, in ticker order.
pub(crate) fn foreign_table(rows: &[ForeignQuote]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<8} {:<28} {:>10} {:>8} {:<20}",
        "Symbol", "Name", "Mkt cap", "P/E", "Sector"
    );
    let _ = writeln!(out, "{}", "─".repeat(78));
    for row in rows {
        let _ = writeln!(
            out,
            "{:<8} {} {:>10} {:>8} {}",
            row.symbol,
            fit(&row.short_name, 28),
            human_amount(row.market_cap),
            opt_num(row.pe),
            fit(opt(row.sector.as_deref()), 20),
        );
    }
    out
}

/// Text rendering of a market view.
pub(crate) fn view_text(view: &MarketView, period: &ReportingPeriod, limit: Option<usize>) -> String {
    let mut out = banner(&format!("{} Stocks", view.market().label()));
    out.push('\n');
    match view {
        MarketView::Domestic(screen) => {
            let _ = writeln!(out, "Period: {} to {}", period.start(), period.end());
            out.push_str(&domestic_text(screen, limit));
        }
        MarketView::Regional(rows) => {
            let _ = writeln!(out, "{} listed\n", rows.len());
            out.push_str(&regional_table(rows, limit));
        }
        MarketView::Foreign(rows) => out.push_str(&foreign_table(rows)),
    }
    out
}

/// Text rendering of a failed market.
pub(crate) fn failure_text(market: Market, err: &SiftError) -> String {
    let mut out = banner(&format!("{} Stocks", market.label()));
    out.push('\n');
    out.push_str(&error_line(err));
    out.push('\n');
    out
}

/// JSON document for a market view.
pub(crate) fn view_json(view: &MarketView, limit: Option<usize>) -> Value {
    let market = view.market().as_str();
    match view {
        MarketView::Domestic(screen) => {
            let rows = limit.map_or(screen.rows(), |n| screen.top(n));
            let chart: Vec<Value> = screen
                .top_chart()
                .iter()
                .map(|r| json!({ "code": r.code, "name": r.name, "roe": r.roe }))
                .collect();
            json!({
                "market": market,
                "thresholds": screen.thresholds(),
                "joined": screen.joined(),
                "matches": screen.len(),
                "rows": rows,
                "chart": chart,
            })
        }
        MarketView::Regional(rows) => {
            let shown = limit.map_or(rows.as_slice(), |n| &rows[..n.min(rows.len())]);
            json!({ "market": market, "total": rows.len(), "rows": shown })
        }
        MarketView::Foreign(rows) => json!({ "market": market, "rows": rows }),
    }
}

/// JSON document for a failed market.
pub(crate) fn failure_json(market: Market, err: &SiftError) -> Value {
    json!({ "market": market.as_str(), "error": err.to_string() })
}
