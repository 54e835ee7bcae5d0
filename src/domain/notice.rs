//! Low-capacity staff notice.
//!
//! When an event is close to starting and still less than half full, staff
//! get one notice so they can react while there is still time. The gate is
//! one-shot per event: once the stored flag is raised the notice never
//! fires again, even if registrations later drop.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::EventId;

/// Fill percentage below which an imminent event warrants the notice.
/// Deliberately fixed rather than configurable.
pub const LOW_CAPACITY_THRESHOLD_PCT: f64 = 50.0;

/// Decides whether the low-capacity notice should fire.
///
/// Fires only when the event starts within `window_hours` from now (but
/// has not started yet), the fill percentage is below
/// [`LOW_CAPACITY_THRESHOLD_PCT`], and no notice was sent before. A
/// missing fill percentage counts as 0.
#[must_use]
pub fn should_notify(
    percent_full: Option<f64>,
    hours_until_start: f64,
    window_hours: f64,
    already_notified: bool,
) -> bool {
    if already_notified {
        return false;
    }
    let pct = percent_full.unwrap_or(0.0);
    hours_until_start > 0.0 && hours_until_start <= window_hours && pct < LOW_CAPACITY_THRESHOLD_PCT
}

/// Staff notice describing an underselling imminent event.
///
/// Carries everything the notifier needs to render and address the
/// message; the domain stays ignorant of the delivery channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LowCapacityNotice {
    /// Event the notice is about.
    pub event_id: EventId,

    /// Event title.
    pub title: String,

    /// Counted registrations at evaluation time.
    pub registered: i64,

    /// Effective capacity at evaluation time, if tracked.
    pub capacity: Option<i64>,

    /// Fill percentage at evaluation time (0 when untracked).
    pub percent_full: f64,

    /// Event start.
    pub start_time: DateTime<Utc>,

    /// Canonical link to the event page.
    pub link: String,

    /// Staff addresses to deliver to.
    pub recipients: Vec<String>,
}

impl LowCapacityNotice {
    /// Message subject line.
    #[must_use]
    pub fn subject(&self) -> String {
        format!("Low registration: {}", self.title)
    }

    /// Plain-text message body.
    #[must_use]
    pub fn body(&self) -> String {
        let registration_line = match self.capacity {
            Some(cap) => format!(
                "{} of {} seats filled ({:.1}% full)",
                self.registered, cap, self.percent_full
            ),
            None => format!("{} registered, no capacity limit set", self.registered),
        };
        format!(
            "Registration for \"{}\" is below half capacity.\n\n  {}\n  Starts: {}\n  Event page: {}\n",
            self.title,
            registration_line,
            self.start_time.format("%Y-%m-%d %H:%M UTC"),
            self.link,
        )
    }
}
