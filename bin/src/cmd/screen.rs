//! Screen command implementation.

use crate::{OutputFormat, render};
use anyhow::Result;
use sift::{Market, Session, SiftConfig};
use sift_screen::Thresholds;

/// Render one market once and print it.
///
/// Acquisition failures are printed inline and are not an error exit.
pub(crate) async fn run_screen(
    config: &SiftConfig,
    market: Market,
    thresholds: Thresholds,
    top: Option<usize>,
    format: OutputFormat,
) -> Result<()> {
    let thresholds = thresholds.validated()?;
    let mut session = Session::from_config(config);

    tracing::info!(
        market = market.as_str(),
        roe_min = thresholds.roe_min,
        pe_max = thresholds.pe_max,
        gross_min = thresholds.gross_min,
        "screening"
    );

    let rendered = session.render(market, &thresholds).await;

    match format {
        OutputFormat::Json => {
            let doc = match &rendered {
                Ok(view) => render::view_json(view, top),
                Err(e) => render::failure_json(market, e),
            };
            let json = serde_json::to_string_pretty(&doc)
                .map_err(|e| anyhow::anyhow!("JSON serialization error: {}", e))?;
            println!("{json}");
        }
        OutputFormat::Text => match &rendered {
            Ok(view) => print!("{}", render::view_text(view, session.period(), top)),
            Err(e) => print!("{}", render::failure_text(market, e)),
        },
    }

    Ok(())
}
