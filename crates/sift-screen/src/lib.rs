//! Join, threshold filter and ROE ranking for sift.
//!
//! The screen inner-joins instruments with their financial records on the
//! instrument code, keeps rows that strictly pass all three thresholds, and
//! orders the survivors by return on equity, highest first.
//!
//! # Examples
//!
//! ```rust,no_run
//! use sift_screen::{Screener, Thresholds};
//! use sift_traits::{FinancialRecord, Instrument};
//!
//! let instruments: Vec<Instrument> = Vec::new();
//! let records: Vec<FinancialRecord> = Vec::new();
//!
//! let screen = Screener::new(Thresholds::default())
//!     .screen(&instruments, &records)
//!     .unwrap();
//! for row in screen.top_chart() {
//!     println!("{} {:.2}", row.name, row.roe);
//! }
//! ```

mod frame;
mod screener;
mod thresholds;

// Re-export main types
pub use screener::{CHART_TOP_N, Screen, Screener};
pub use thresholds::{Bounds, GROSS_MIN_BOUNDS, PE_MAX_BOUNDS, ROE_MIN_BOUNDS, Thresholds};
