//! sift CLI binary.
//!
//! Screens A-share stocks on ROE, P/E and gross margin, and shows the Hong
//! Kong listing and a US ticker set, either once (`screen`) or in an
//! interactive session.

mod cmd;
mod logging;
mod render;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use sift::Market;
use sift_screen::{GROSS_MIN_BOUNDS, PE_MAX_BOUNDS, ROE_MIN_BOUNDS, Thresholds};
use std::process;

#[derive(Parser)]
#[command(name = "sift")]
#[command(about = "Fundamental stock screener", long_about = None)]
#[command(version)]
struct Cli {
    /// Log level (trace, debug, info, warn, error); RUST_LOG overrides
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// Log format
    #[arg(long, global = true, default_value = "pretty", value_parser = ["pretty", "json"])]
    log_format: String,

    #[command(subcommand)]
    command: Commands,
}

/// Output format for `screen`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Screen a market once and print the result
    Screen {
        /// Market (a-share, hk, us)
        #[arg(short, long, default_value = "a-share")]
        market: Market,

        /// Minimum ROE, percent (0-40)
        #[arg(long, default_value_t = ROE_MIN_BOUNDS.default)]
        roe_min: f64,

        /// Maximum P/E (0-100)
        #[arg(long, default_value_t = PE_MAX_BOUNDS.default)]
        pe_max: f64,

        /// Minimum gross margin, percent (0-100)
        #[arg(long, default_value_t = GROSS_MIN_BOUNDS.default)]
        gross_min: f64,

        /// Reporting window start (YYYY-MM-DD)
        #[arg(long)]
        start: Option<String>,

        /// Reporting window end (YYYY-MM-DD)
        #[arg(long)]
        end: Option<String>,

        /// Show only the first N rows
        #[arg(short, long)]
        top: Option<usize>,

        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Start an interactive session
    Interactive {
        /// Initial market (a-share, hk, us)
        #[arg(short, long, default_value = "a-share")]
        market: Market,

        /// Reporting window start (YYYY-MM-DD)
        #[arg(long)]
        start: Option<String>,

        /// Reporting window end (YYYY-MM-DD)
        #[arg(long)]
        end: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(&cli.log_level, &cli.log_format);

    match cli.command {
        Commands::Screen {
            market,
            roe_min,
            pe_max,
            gross_min,
            start,
            end,
            top,
            format,
        } => {
            let config = cmd::load_config(start.as_deref(), end.as_deref())?;
            let thresholds = Thresholds::new(roe_min, pe_max, gross_min);
            cmd::screen::run_screen(&config, market, thresholds, top, format).await?;
        }
        Commands::Interactive { market, start, end } => {
            let config = cmd::load_config(start.as_deref(), end.as_deref())?;
            cmd::interactive::run_interactive(&config, market).await?;
        }
    }

    Ok(())
}
