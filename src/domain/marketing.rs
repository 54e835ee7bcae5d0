//! Marketing status evaluation.
//!
//! Events that are far out and underselling get an early-bird discount;
//! events about to start and still underselling get a flash-sale discount.
//! Everything else is normal. The rules are ordered and the first match
//! wins, so an event can never hold both discounts at once.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Promotional state stored on a content record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarketingStatus {
    /// No promotion running.
    #[default]
    Normal,
    /// Early-bird discount window.
    EarlyBird,
    /// Last-minute flash sale.
    FlashSale,
}

impl MarketingStatus {
    /// Returns the stored string form (`"normal"`, `"early_bird"`,
    /// `"flash_sale"`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::EarlyBird => "early_bird",
            Self::FlashSale => "flash_sale",
        }
    }

    /// Parses the stored string form. Returns `None` for unknown values.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "normal" => Some(Self::Normal),
            "early_bird" => Some(Self::EarlyBird),
            "flash_sale" => Some(Self::FlashSale),
            _ => None,
        }
    }
}

impl fmt::Display for MarketingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Thresholds and discounts for the marketing ladder, plus the staffing
/// notice settings that ride along with marketing evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketingConfig {
    /// Early bird applies below this fill percentage.
    pub early_bird_threshold_pct: f64,

    /// Early bird applies strictly more than this many days before start.
    pub early_bird_min_days: f64,

    /// Discount granted while early bird is active.
    pub early_bird_discount_pct: u32,

    /// Flash sale applies below this fill percentage.
    pub flash_sale_threshold_pct: f64,

    /// Flash sale applies within this many days of start.
    pub flash_sale_max_days: f64,

    /// Discount granted while the flash sale is active.
    pub flash_sale_discount_pct: u32,

    /// Low-capacity notices fire within this many hours of start.
    pub notification_window_hours: f64,

    /// Staff addresses the low-capacity notice goes to. Empty disables
    /// delivery entirely.
    pub notification_recipients: Vec<String>,
}

impl Default for MarketingConfig {
    fn default() -> Self {
        Self {
            early_bird_threshold_pct: 80.0,
            early_bird_min_days: 7.0,
            early_bird_discount_pct: 10,
            flash_sale_threshold_pct: 50.0,
            flash_sale_max_days: 2.0,
            flash_sale_discount_pct: 25,
            notification_window_hours: 48.0,
            notification_recipients: Vec::new(),
        }
    }
}

/// Outcome of one marketing evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketingDecision {
    /// Status the record should carry.
    pub status: MarketingStatus,

    /// Discount percentage matching the status. Zero for normal.
    pub discount_pct: u32,
}

impl MarketingDecision {
    /// The no-promotion decision.
    #[must_use]
    pub const fn normal() -> Self {
        Self {
            status: MarketingStatus::Normal,
            discount_pct: 0,
        }
    }
}

/// Evaluates the marketing ladder for an event.
///
/// `percent_full` of `None` (no capacity tracked) counts as 0: an event
/// nobody can fill up is always underselling. `days_until_start` is
/// negative once the event has started, which disables both rules. Days
/// between the flash-sale window and the early-bird minimum match
/// neither rule and fall through to normal.
#[must_use]
pub fn evaluate(
    percent_full: Option<f64>,
    days_until_start: f64,
    config: &MarketingConfig,
) -> MarketingDecision {
    let pct = percent_full.unwrap_or(0.0);

    if days_until_start > config.early_bird_min_days && pct < config.early_bird_threshold_pct {
        return MarketingDecision {
            status: MarketingStatus::EarlyBird,
            discount_pct: config.early_bird_discount_pct,
        };
    }

    if days_until_start > 0.0
        && days_until_start <= config.flash_sale_max_days
        && pct < config.flash_sale_threshold_pct
    {
        return MarketingDecision {
            status: MarketingStatus::FlashSale,
            discount_pct: config.flash_sale_discount_pct,
        };
    }

    MarketingDecision::normal()
}
