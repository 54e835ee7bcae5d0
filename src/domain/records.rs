//! Event records on both sides of the sync.
//!
//! [`CrmEvent`] is what the CRM reports about an event's registration
//! settings. [`EventContent`] mirrors the content record the derived stats
//! are written onto. [`ContentUpdate`] carries the field changes of one
//! sync pass so the store can apply them in a single write.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::EventId;
use super::capacity::CapacityStats;
use super::marketing::MarketingStatus;

/// Registration settings for one event as the CRM reports them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrmEvent {
    /// CRM event id.
    pub id: EventId,

    /// Whether online registration is enabled for the event.
    pub is_online_registration: bool,

    /// Raw participant cap. `None` when the CRM has no cap configured.
    pub max_participants: Option<i64>,
}

impl CrmEvent {
    /// Capacity used for stat derivation.
    ///
    /// Events with online registration disabled have no meaningful capacity
    /// regardless of the raw cap. A cap of zero is kept as zero.
    #[must_use]
    pub const fn effective_capacity(&self) -> Option<i64> {
        if self.is_online_registration {
            self.max_participants
        } else {
            None
        }
    }
}

/// Content record an event's stats and marketing fields are written onto.
///
/// Mirrors the columns of the `event_content` table. The stat fields are
/// nullable because a record holds nothing until the first sync reaches it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventContent {
    /// Shared event id (same value as the CRM side).
    pub id: EventId,

    /// Event title, used in notices.
    pub title: String,

    /// Stored start timestamp. Marketing decisions need this; records
    /// without one keep their marketing fields untouched.
    pub start_time: Option<DateTime<Utc>>,

    /// Stored end timestamp.
    pub end_time: Option<DateTime<Utc>>,

    /// Effective capacity from the last sync.
    pub capacity: Option<i64>,

    /// Counted registrations from the last sync.
    pub registered: Option<i64>,

    /// Remaining seats from the last sync. Negative when overbooked.
    pub remaining: Option<i64>,

    /// Fill percentage from the last sync, unclamped.
    pub percent_full: Option<f64>,

    /// Current marketing status.
    pub marketing_status: MarketingStatus,

    /// Discount percentage attached to the marketing status.
    pub marketing_discount_pct: u32,

    /// Whether the low-capacity notice has already been sent for this
    /// event. Raised once, never cleared by the sync.
    pub low_capacity_notified: bool,
}

/// Marketing fields recalculated during one evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketingUpdate {
    /// New marketing status.
    pub status: MarketingStatus,

    /// Discount percentage matching the status.
    pub discount_pct: u32,

    /// True when the low-capacity notice fired during this evaluation.
    /// False leaves the stored flag as it is.
    pub notified: bool,
}

/// Field changes to apply to a content record in one write.
///
/// `stats` is absent on marketing-only refreshes; `marketing` is absent
/// when the record has no start time to evaluate against.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContentUpdate {
    /// Recalculated capacity stats, if this pass derived them.
    pub stats: Option<CapacityStats>,

    /// Recalculated marketing fields, if this pass evaluated them.
    pub marketing: Option<MarketingUpdate>,
}

impl ContentUpdate {
    /// Returns true when there is nothing to write.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.stats.is_none() && self.marketing.is_none()
    }
}
