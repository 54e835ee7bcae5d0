//! Registration capacity statistics.
//!
//! [`CapacityStats`] is the derived block written onto a content record:
//! how many people are registered, how many seats are left, and how full
//! the event is. Derivation is pure; the orchestrator feeds it the
//! effective capacity and the counted registration total.

use serde::{Deserialize, Serialize};

/// Derived registration stats for one event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CapacityStats {
    /// Effective capacity. `None` when registration is disabled or the
    /// event is uncapped.
    pub capacity: Option<i64>,

    /// Counted registrations.
    pub registered: i64,

    /// Seats left. Negative when overbooked. `None` when capacity is.
    pub remaining: Option<i64>,

    /// Fill percentage. Unclamped, so overbooked events exceed 100.
    /// `None` when capacity is.
    pub percent_full: Option<f64>,
}

impl CapacityStats {
    /// Derives stats from an effective capacity and a registration count.
    ///
    /// Without a capacity only the registered count is meaningful, so
    /// `remaining` and `percent_full` stay `None`. A capacity of zero is a
    /// real state (nothing bookable): percent full is pinned to 100 and
    /// `remaining` is the negated registration count.
    #[must_use]
    pub fn compute(capacity: Option<i64>, registered: i64) -> Self {
        let Some(cap) = capacity else {
            return Self {
                capacity: None,
                registered,
                remaining: None,
                percent_full: None,
            };
        };

        let percent_full = if cap == 0 {
            100.0
        } else {
            (registered as f64 / cap as f64) * 100.0
        };

        Self {
            capacity: Some(cap),
            registered,
            remaining: Some(cap - registered),
            percent_full: Some(percent_full),
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn no_capacity_yields_no_derived_stats() {
        let stats = CapacityStats::compute(None, 12);
        assert_eq!(stats.capacity, None);
        assert_eq!(stats.registered, 12);
        assert_eq!(stats.remaining, None);
        assert_eq!(stats.percent_full, None);
    }

    #[test]
    fn partial_fill_divides_precisely() {
        let stats = CapacityStats::compute(Some(100), 25);
        assert_eq!(stats.remaining, Some(75));
        assert_eq!(stats.percent_full, Some(25.0));
    }

    #[test]
    fn zero_capacity_pins_percent_to_100() {
        let stats = CapacityStats::compute(Some(0), 3);
        assert_eq!(stats.percent_full, Some(100.0));
        assert_eq!(stats.remaining, Some(-3));
    }

    #[test]
    fn zero_capacity_zero_registered() {
        let stats = CapacityStats::compute(Some(0), 0);
        assert_eq!(stats.percent_full, Some(100.0));
        assert_eq!(stats.remaining, Some(0));
    }

    #[test]
    fn full_house_lands_exactly_on_100() {
        let stats = CapacityStats::compute(Some(100), 100);
        assert_eq!(stats.remaining, Some(0));
        assert_eq!(stats.percent_full, Some(100.0));
    }

    #[test]
    fn overbooked_event_goes_negative_and_past_100() {
        let stats = CapacityStats::compute(Some(50), 60);
        assert_eq!(stats.remaining, Some(-10));
        assert_eq!(stats.percent_full, Some(120.0));
    }

    #[test]
    fn fractional_percentages_are_not_rounded() {
        let stats = CapacityStats::compute(Some(3), 1);
        let Some(pct) = stats.percent_full else {
            panic!("percent should be derived");
        };
        assert!((pct - (1.0_f64 / 3.0) * 100.0).abs() < f64::EPSILON);
    }
}
