//! Market selection and the per-market result views.

use std::{fmt, str::FromStr, sync::Arc};

use serde::{Deserialize, Serialize};
use sift_screen::Screen;
use sift_traits::{ForeignQuote, RegionalListing, SiftError};

/// The market a render is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Market {
    /// Domestic A-share equities: the only market that is screened.
    #[default]
    AShare,
    /// Hong Kong equities: raw listing, unfiltered.
    HongKong,
    /// US equities: a fixed ticker set, unfiltered.
    Us,
}

impl Market {
    /// All markets in selector order.
    pub const ALL: [Self; 3] = [Self::AShare, Self::HongKong, Self::Us];

    /// Human-readable label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::AShare => "A-share",
            Self::HongKong => "Hong Kong",
            Self::Us => "US",
        }
    }

    /// Canonical CLI name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::AShare => "a-share",
            Self::HongKong => "hk",
            Self::Us => "us",
        }
    }

    /// Whether threshold filtering applies to this market.
    #[must_use]
    pub const fn is_screened(&self) -> bool {
        matches!(self, Self::AShare)
    }
}

impl fmt::Display for Market {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Market {
    type Err = SiftError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "a-share" | "ashare" | "a" | "cn" => Ok(Self::AShare),
            "hk" | "hong-kong" | "hongkong" => Ok(Self::HongKong),
            "us" | "usa" => Ok(Self::Us),
            other => Err(SiftError::UnknownMarket(other.to_string())),
        }
    }
}

/// What a market render produced.
#[derive(Debug, Clone)]
pub enum MarketView {
    /// Screened A-share rows.
    Domestic(Screen),
    /// Hong Kong listing.
    Regional(Arc<Vec<RegionalListing>>),
    /// US quote information, in ticker order.
    Foreign(Vec<ForeignQuote>),
}

impl MarketView {
    /// The market this view belongs to.
    #[must_use]
    pub const fn market(&self) -> Market {
        match self {
            Self::Domestic(_) => Market::AShare,
            Self::Regional(_) => Market::HongKong,
            Self::Foreign(_) => Market::Us,
        }
    }

    /// Number of rows in the view.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Domestic(screen) => screen.len(),
            Self::Regional(rows) => rows.len(),
            Self::Foreign(rows) => rows.len(),
        }
    }

    /// Whether the view has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
