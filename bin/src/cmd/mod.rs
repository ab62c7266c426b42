//! CLI subcommand modules.

pub(crate) mod interactive;
pub(crate) mod screen;

use anyhow::Result;
use sift::SiftConfig;
use sift_traits::{ReportingPeriod, parse_date};

/// Load configuration and apply the reporting-window flags on top of it.
pub(crate) fn load_config(start: Option<&str>, end: Option<&str>) -> Result<SiftConfig> {
    let mut config = SiftConfig::from_env()?;
    config.period = override_period(config.period, start, end)?;
    tracing::debug!(
        start = %config.period.start(),
        end = %config.period.end(),
        tushare = config.tushare_token.is_some(),
        fmp = config.fmp_api_key.is_some(),
        "configuration loaded"
    );
    Ok(config)
}

fn override_period(
    period: ReportingPeriod,
    start: Option<&str>,
    end: Option<&str>,
) -> Result<ReportingPeriod> {
    let start = start.map(parse_date).transpose()?.unwrap_or(period.start());
    let end = end.map(parse_date).transpose()?.unwrap_or(period.end());
    Ok(ReportingPeriod::new(start, end)?)
}
