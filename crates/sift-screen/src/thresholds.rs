//! Screening thresholds and their allowed ranges.

use serde::{Deserialize, Serialize};
use sift_traits::{Result, SiftError};

/// Inclusive range and default for one threshold control.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    /// Threshold name as shown to users.
    pub name: &'static str,
    /// Smallest allowed value.
    pub min: f64,
    /// Largest allowed value.
    pub max: f64,
    /// Default value.
    pub default: f64,
}

impl Bounds {
    /// Reject `value` if it lies outside `[min, max]` or is not a number.
    ///
    /// # Errors
    ///
    /// Returns [`SiftError::InvalidThreshold`] when out of range.
    pub fn check(&self, value: f64) -> Result<f64> {
        if value.is_nan() || value < self.min || value > self.max {
            return Err(SiftError::InvalidThreshold {
                name: self.name,
                value,
                min: self.min,
                max: self.max,
            });
        }
        Ok(value)
    }
}

/// Minimum return on equity, percent.
pub const ROE_MIN_BOUNDS: Bounds = Bounds {
    name: "roe_min",
    min: 0.0,
    max: 40.0,
    default: 15.0,
};

/// Maximum price/earnings ratio.
pub const PE_MAX_BOUNDS: Bounds = Bounds {
    name: "pe_max",
    min: 0.0,
    max: 100.0,
    default: 25.0,
};

/// Minimum gross margin, percent.
pub const GROSS_MIN_BOUNDS: Bounds = Bounds {
    name: "gross_min",
    min: 0.0,
    max: 100.0,
    default: 30.0,
};

/// The three screen thresholds.
///
/// A row passes when `roe > roe_min`, `pe < pe_max` and
/// `gross_margin > gross_min`, all strict. The screen itself accepts any
/// real values; [`Thresholds::validated`] applies the user-facing ranges.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    /// Exclusive lower bound on return on equity, percent.
    pub roe_min: f64,
    /// Exclusive upper bound on price/earnings.
    pub pe_max: f64,
    /// Exclusive lower bound on gross margin, percent.
    pub gross_min: f64,
}

impl Thresholds {
    /// Create thresholds without range checks.
    #[must_use]
    pub const fn new(roe_min: f64, pe_max: f64, gross_min: f64) -> Self {
        Self {
            roe_min,
            pe_max,
            gross_min,
        }
    }

    /// Check every threshold against its allowed range.
    ///
    /// # Errors
    ///
    /// Returns [`SiftError::InvalidThreshold`] for the first value out of range.
    pub fn validated(self) -> Result<Self> {
        ROE_MIN_BOUNDS.check(self.roe_min)?;
        PE_MAX_BOUNDS.check(self.pe_max)?;
        GROSS_MIN_BOUNDS.check(self.gross_min)?;
        Ok(self)
    }
}

impl Default for Thresholds {
    fn default() -> Self {
        Self::new(
            ROE_MIN_BOUNDS.default,
            PE_MAX_BOUNDS.default,
            GROSS_MIN_BOUNDS.default,
        )
    }
}
