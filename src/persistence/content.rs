//! PostgreSQL content store for event records.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::{ContentStore, ContentUpdate, EventContent, EventId, MarketingStatus};
use crate::error::SyncError;

/// PostgreSQL-backed [`ContentStore`] over the `event_content` table.
#[derive(Debug, Clone)]
pub struct PgContentStore {
    pool: PgPool,
}

impl PgContentStore {
    /// Creates a new store with the given connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

type ContentRow = (
    i64,
    String,
    Option<DateTime<Utc>>,
    Option<DateTime<Utc>>,
    Option<i64>,
    Option<i64>,
    Option<i64>,
    Option<f64>,
    String,
    i32,
    bool,
);

#[async_trait]
impl ContentStore for PgContentStore {
    async fn load(&self, id: EventId) -> Result<Option<EventContent>, SyncError> {
        let row = sqlx::query_as::<_, ContentRow>(
            "SELECT id, title, start_time, end_time, capacity, registered, remaining, \
             percent_full, marketing_status, marketing_discount_pct, low_capacity_notified \
             FROM event_content WHERE id = $1",
        )
        .bind(id.as_i64())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| SyncError::Persistence(e.to_string()))?;

        Ok(row.map(
            |(
                id,
                title,
                start_time,
                end_time,
                capacity,
                registered,
                remaining,
                percent_full,
                status,
                discount,
                notified,
            )| {
                EventContent {
                    id: EventId::new(id),
                    title,
                    start_time,
                    end_time,
                    capacity,
                    registered,
                    remaining,
                    percent_full,
                    marketing_status: MarketingStatus::parse(&status).unwrap_or_default(),
                    marketing_discount_pct: u32::try_from(discount).unwrap_or(0),
                    low_capacity_notified: notified,
                }
            },
        ))
    }

    async fn apply(&self, id: EventId, update: &ContentUpdate) -> Result<(), SyncError> {
        // The notified flag is OR-ed in SQL so an update can raise it but
        // never clear it.
        let result = match (update.stats, update.marketing) {
            (Some(stats), Some(marketing)) => {
                sqlx::query(
                    "UPDATE event_content SET capacity = $2, registered = $3, remaining = $4, \
                     percent_full = $5, marketing_status = $6, marketing_discount_pct = $7, \
                     low_capacity_notified = low_capacity_notified OR $8, updated_at = NOW() \
                     WHERE id = $1",
                )
                .bind(id.as_i64())
                .bind(stats.capacity)
                .bind(stats.registered)
                .bind(stats.remaining)
                .bind(stats.percent_full)
                .bind(marketing.status.as_str())
                .bind(discount_column(marketing.discount_pct))
                .bind(marketing.notified)
                .execute(&self.pool)
                .await
            }
            (Some(stats), None) => {
                sqlx::query(
                    "UPDATE event_content SET capacity = $2, registered = $3, remaining = $4, \
                     percent_full = $5, updated_at = NOW() WHERE id = $1",
                )
                .bind(id.as_i64())
                .bind(stats.capacity)
                .bind(stats.registered)
                .bind(stats.remaining)
                .bind(stats.percent_full)
                .execute(&self.pool)
                .await
            }
            (None, Some(marketing)) => {
                sqlx::query(
                    "UPDATE event_content SET marketing_status = $2, marketing_discount_pct = $3, \
                     low_capacity_notified = low_capacity_notified OR $4, updated_at = NOW() \
                     WHERE id = $1",
                )
                .bind(id.as_i64())
                .bind(marketing.status.as_str())
                .bind(discount_column(marketing.discount_pct))
                .bind(marketing.notified)
                .execute(&self.pool)
                .await
            }
            (None, None) => return Ok(()),
        }
        .map_err(|e| SyncError::Persistence(e.to_string()))?;

        if result.rows_affected() == 0 {
            tracing::debug!(event_id = %id, "no content row matched the update");
        }
        Ok(())
    }
}

/// Converts the domain discount into the `INTEGER` column type.
fn discount_column(pct: u32) -> i32 {
    i32::try_from(pct).unwrap_or(i32::MAX)
}
