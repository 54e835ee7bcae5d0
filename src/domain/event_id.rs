//! Type-safe event identifier.
//!
//! [`EventId`] is a newtype wrapper around the CRM's numeric event id,
//! providing type safety so that event identifiers cannot be confused
//! with participant counts or other integers.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Unique identifier for an event.
///
/// Wraps the integer id assigned by the CRM. The content record for an
/// event shares the same id, so one [`EventId`] addresses both sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(i64);

impl EventId {
    /// Creates an `EventId` from a raw CRM id.
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Returns the raw numeric id.
    #[must_use]
    pub const fn as_i64(self) -> i64 {
        self.0
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for EventId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl From<EventId> for i64 {
    fn from(id: EventId) -> Self {
        id.0
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn display_is_raw_id() {
        let id = EventId::new(42);
        assert_eq!(format!("{id}"), "42");
    }

    #[test]
    fn from_i64_round_trip() {
        let id = EventId::from(7);
        assert_eq!(i64::from(id), 7);
        assert_eq!(id.as_i64(), 7);
    }

    #[test]
    fn serde_is_transparent() {
        let id = EventId::new(99);
        let Ok(json) = serde_json::to_string(&id) else {
            panic!("serialization failed");
        };
        assert_eq!(json, "99");
        let Ok(back) = serde_json::from_str::<EventId>(&json) else {
            panic!("deserialization failed");
        };
        assert_eq!(back, id);
    }

    #[test]
    fn hash_works_in_hashmap() {
        use std::collections::HashMap;
        let id = EventId::new(5);
        let mut map = HashMap::new();
        map.insert(id, "test");
        assert_eq!(map.get(&id), Some(&"test"));
    }

    #[test]
    fn ordering_follows_raw_id() {
        let mut ids = vec![EventId::new(3), EventId::new(1), EventId::new(2)];
        ids.sort();
        assert_eq!(ids, vec![EventId::new(1), EventId::new(2), EventId::new(3)]);
    }
}
