//! Outbox-backed notifier.
//!
//! Notices are not sent inline. They are inserted into the
//! `notification_outbox` table and a separate mailer process drains
//! pending rows. This keeps sync runs free of SMTP coupling and leaves an
//! audit trail of every notice that fired.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::{LowCapacityNotice, Notifier};
use crate::error::SyncError;

/// [`Notifier`] that enqueues notices into PostgreSQL.
#[derive(Debug, Clone)]
pub struct PgOutboxNotifier {
    pool: PgPool,
}

impl PgOutboxNotifier {
    /// Creates a new notifier with the given connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Notifier for PgOutboxNotifier {
    async fn deliver(&self, notice: &LowCapacityNotice) -> Result<(), SyncError> {
        let payload =
            serde_json::to_value(notice).map_err(|e| SyncError::Notification(e.to_string()))?;

        sqlx::query(
            "INSERT INTO notification_outbox (id, event_id, recipients, subject, body, payload) \
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(Uuid::new_v4())
        .bind(notice.event_id.as_i64())
        .bind(&notice.recipients)
        .bind(notice.subject())
        .bind(notice.body())
        .bind(payload)
        .execute(&self.pool)
        .await
        .map_err(|e| SyncError::Notification(e.to_string()))?;

        Ok(())
    }
}
