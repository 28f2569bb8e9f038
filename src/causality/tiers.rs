//! Semantic tiers of order-book variables

use serde::{Deserialize, Serialize};

/// One of the four fixed variable groupings
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Tier {
    /// Mid, spread and best bids
    PriceSignals,
    /// Resting size at the top, top three levels and whole book
    LiquidityDepth,
    /// YES/NO size imbalances
    OrderImbalance,
    /// Depth near the touch, level counts and VWAP
    BookStructure,
}

impl Tier {
    /// All tiers in report order
    pub const ALL: [Tier; 4] = [
        Tier::PriceSignals,
        Tier::LiquidityDepth,
        Tier::OrderImbalance,
        Tier::BookStructure,
    ];

    /// Variables of this tier in report order
    pub fn variables(&self) -> &'static [&'static str] {
        match self {
            Tier::PriceSignals => &["mid", "spread", "best_bid_yes", "best_bid_no"],
            Tier::LiquidityDepth => &[
                "depth_best_yes",
                "depth_best_no",
                "depth_top3_yes",
                "depth_top3_no",
                "total_depth_yes",
                "total_depth_no",
            ],
            Tier::OrderImbalance => &["imbalance_best", "imbalance_top3", "imbalance_total"],
            Tier::BookStructure => &[
                "depth_5c_yes",
                "depth_5c_no",
                "num_levels_yes",
                "num_levels_no",
                "vwap_yes",
                "vwap_no",
            ],
        }
    }

    /// Report heading
    pub fn title(&self) -> &'static str {
        match self {
            Tier::PriceSignals => "TIER 1: PRICE SIGNALS",
            Tier::LiquidityDepth => "TIER 2: LIQUIDITY DEPTH",
            Tier::OrderImbalance => "TIER 3: ORDER IMBALANCES",
            Tier::BookStructure => "TIER 4: BOOK STRUCTURE",
        }
    }

    /// Question the tier answers
    pub fn question(&self) -> &'static str {
        match self {
            Tier::PriceSignals => "When prices move, which venue moves first?",
            Tier::LiquidityDepth => "When liquidity shifts, which venue shows it first?",
            Tier::OrderImbalance => "When buying/selling pressure builds, where does it appear first?",
            Tier::BookStructure => "When the book structure changes, which venue leads?",
        }
    }

    /// Tier a variable belongs to
    pub fn of(variable: &str) -> Option<Tier> {
        Tier::ALL
            .into_iter()
            .find(|tier| tier.variables().iter().any(|v| *v == variable))
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Tier::PriceSignals => write!(f, "price signals"),
            Tier::LiquidityDepth => write!(f, "liquidity depth"),
            Tier::OrderImbalance => write!(f, "order imbalance"),
            Tier::BookStructure => write!(f, "book structure"),
        }
    }
}

/// Every tracked variable with its tier, in report order
pub fn all_variables() -> impl Iterator<Item = (Tier, &'static str)> {
    Tier::ALL
        .into_iter()
        .flat_map(|tier| tier.variables().iter().map(move |v| (tier, *v)))
}
