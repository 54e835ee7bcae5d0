//! Integration seams around the sync pipeline.
//!
//! The orchestrator only talks to the CRM, the content store and the
//! notifier through these traits. Production wiring binds them to
//! PostgreSQL; tests bind them to the in-memory implementations in
//! [`crate::persistence::memory`].

use async_trait::async_trait;

use super::{ContentUpdate, CrmEvent, EventContent, EventId, LowCapacityNotice};
use crate::error::SyncError;

/// Read-only view of the CRM's event and registration data.
#[async_trait]
pub trait EventSource: Send + Sync {
    /// Lists the ids of all events eligible for a sync pass.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::SourceFetch`] when the listing query fails.
    async fn list_event_ids(&self) -> Result<Vec<EventId>, SyncError>;

    /// Fetches registration settings for one event.
    ///
    /// Returns `Ok(None)` when the event no longer exists in the CRM.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::SourceFetch`] when the query fails.
    async fn fetch_event(&self, id: EventId) -> Result<Option<CrmEvent>, SyncError>;

    /// Counts the event's registrations in counted, non-test statuses.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::SourceFetch`] when the count query fails.
    async fn count_registered(&self, id: EventId) -> Result<i64, SyncError>;
}

/// Store holding the content records stats are written onto.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Loads the content record for an event.
    ///
    /// Returns `Ok(None)` when no record exists for the id.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Persistence`] when the read fails.
    async fn load(&self, id: EventId) -> Result<Option<EventContent>, SyncError>;

    /// Applies a field update to an event's record in a single write.
    ///
    /// An empty update is a no-op. The notified flag is only ever raised
    /// by an update, never cleared.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Persistence`] when the write fails.
    async fn apply(&self, id: EventId, update: &ContentUpdate) -> Result<(), SyncError>;
}

/// Outbound channel for staff notices.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Hands a notice to the delivery channel.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Notification`] when the notice cannot be
    /// handed over. Delivery failures do not roll back the sync; the
    /// caller logs them and moves on.
    async fn deliver(&self, notice: &LowCapacityNotice) -> Result<(), SyncError>;
}
