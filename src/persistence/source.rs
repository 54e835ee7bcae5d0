//! PostgreSQL implementation of the CRM event source.
//!
//! Reads the CRM's own tables (`crm_event`, `crm_participant`,
//! `crm_participant_status`) directly. The sync never writes to these
//! tables.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::{CrmEvent, EventId, EventSource};
use crate::error::SyncError;

/// PostgreSQL-backed [`EventSource`] using `sqlx::PgPool`.
#[derive(Debug, Clone)]
pub struct PgEventSource {
    pool: PgPool,
}

impl PgEventSource {
    /// Creates a new source with the given connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EventSource for PgEventSource {
    async fn list_event_ids(&self) -> Result<Vec<EventId>, SyncError> {
        let rows = sqlx::query_scalar::<_, i64>("SELECT id FROM crm_event ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| SyncError::SourceFetch(e.to_string()))?;

        Ok(rows.into_iter().map(EventId::new).collect())
    }

    async fn fetch_event(&self, id: EventId) -> Result<Option<CrmEvent>, SyncError> {
        let row = sqlx::query_as::<_, (i64, bool, Option<i64>)>(
            "SELECT id, is_online_registration, max_participants \
             FROM crm_event WHERE id = $1",
        )
        .bind(id.as_i64())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| SyncError::SourceFetch(e.to_string()))?;

        Ok(row.map(
            |(id, is_online_registration, max_participants)| CrmEvent {
                id: EventId::new(id),
                is_online_registration,
                max_participants,
            },
        ))
    }

    async fn count_registered(&self, id: EventId) -> Result<i64, SyncError> {
        // Test registrations and non-counted statuses (cancelled, waitlisted)
        // never contribute to capacity.
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM crm_participant p \
             JOIN crm_participant_status s ON s.id = p.status_id \
             WHERE p.event_id = $1 AND s.is_counted AND NOT p.is_test",
        )
        .bind(id.as_i64())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| SyncError::SourceFetch(e.to_string()))?;

        Ok(count)
    }
}
