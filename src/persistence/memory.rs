//! In-memory implementations of the integration seams.
//!
//! Back the same traits as the PostgreSQL adapters with hash maps, for
//! tests and local development. [`MemoryContentStore::apply`] mirrors the
//! SQL semantics of [`super::PgContentStore`], including the raise-only
//! behavior of the notified flag. The source and notifier support fault
//! injection so batch error handling can be exercised.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::domain::{
    ContentStore, ContentUpdate, CrmEvent, EventContent, EventId, EventSource, LowCapacityNotice,
    Notifier,
};
use crate::error::SyncError;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// In-memory CRM double with per-event fault injection.
#[derive(Debug, Default)]
pub struct MemoryEventSource {
    events: Mutex<HashMap<EventId, CrmEvent>>,
    registered: Mutex<HashMap<EventId, i64>>,
    failing_events: Mutex<HashSet<EventId>>,
    listing_fails: AtomicBool,
}

impl MemoryEventSource {
    /// Creates an empty source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces an event.
    pub fn insert_event(&self, event: CrmEvent) {
        lock(&self.events).insert(event.id, event);
    }

    /// Sets the counted registration total for an event.
    pub fn set_registered(&self, id: EventId, count: i64) {
        lock(&self.registered).insert(id, count);
    }

    /// Makes `fetch_event` fail for the given event.
    pub fn fail_event(&self, id: EventId) {
        lock(&self.failing_events).insert(id);
    }

    /// Makes `list_event_ids` fail.
    pub fn fail_listing(&self) {
        self.listing_fails.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl EventSource for MemoryEventSource {
    async fn list_event_ids(&self) -> Result<Vec<EventId>, SyncError> {
        if self.listing_fails.load(Ordering::SeqCst) {
            return Err(SyncError::SourceFetch("listing unavailable".to_string()));
        }
        let mut ids: Vec<EventId> = lock(&self.events).keys().copied().collect();
        ids.sort_unstable();
        Ok(ids)
    }

    async fn fetch_event(&self, id: EventId) -> Result<Option<CrmEvent>, SyncError> {
        if lock(&self.failing_events).contains(&id) {
            return Err(SyncError::SourceFetch(format!("event {id} unavailable")));
        }
        Ok(lock(&self.events).get(&id).cloned())
    }

    async fn count_registered(&self, id: EventId) -> Result<i64, SyncError> {
        if lock(&self.failing_events).contains(&id) {
            return Err(SyncError::SourceFetch(format!("event {id} unavailable")));
        }
        Ok(lock(&self.registered).get(&id).copied().unwrap_or(0))
    }
}

/// In-memory content store mirroring the SQL update semantics.
#[derive(Debug, Default)]
pub struct MemoryContentStore {
    records: Mutex<HashMap<EventId, EventContent>>,
    applied: AtomicUsize,
}

impl MemoryContentStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a content record.
    pub fn insert(&self, content: EventContent) {
        lock(&self.records).insert(content.id, content);
    }

    /// Returns a copy of a record, if present.
    #[must_use]
    pub fn get(&self, id: EventId) -> Option<EventContent> {
        lock(&self.records).get(&id).cloned()
    }

    /// Number of updates that reached an existing record.
    #[must_use]
    pub fn apply_count(&self) -> usize {
        self.applied.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ContentStore for MemoryContentStore {
    async fn load(&self, id: EventId) -> Result<Option<EventContent>, SyncError> {
        Ok(lock(&self.records).get(&id).cloned())
    }

    async fn apply(&self, id: EventId, update: &ContentUpdate) -> Result<(), SyncError> {
        if update.is_empty() {
            return Ok(());
        }
        let mut records = lock(&self.records);
        let Some(record) = records.get_mut(&id) else {
            return Ok(());
        };
        if let Some(stats) = update.stats {
            record.capacity = stats.capacity;
            record.registered = Some(stats.registered);
            record.remaining = stats.remaining;
            record.percent_full = stats.percent_full;
        }
        if let Some(marketing) = update.marketing {
            record.marketing_status = marketing.status;
            record.marketing_discount_pct = marketing.discount_pct;
            record.low_capacity_notified = record.low_capacity_notified || marketing.notified;
        }
        self.applied.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Recording notifier.
#[derive(Debug, Default)]
pub struct MemoryNotifier {
    sent: Mutex<Vec<LowCapacityNotice>>,
    failing: AtomicBool,
}

impl MemoryNotifier {
    /// Creates a notifier with an empty record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent delivery fail.
    pub fn fail_deliveries(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }

    /// Returns the notices delivered so far.
    #[must_use]
    pub fn sent(&self) -> Vec<LowCapacityNotice> {
        lock(&self.sent).clone()
    }
}

#[async_trait]
impl Notifier for MemoryNotifier {
    async fn deliver(&self, notice: &LowCapacityNotice) -> Result<(), SyncError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(SyncError::Notification(
                "delivery channel down".to_string(),
            ));
        }
        lock(&self.sent).push(notice.clone());
        Ok(())
    }
}
