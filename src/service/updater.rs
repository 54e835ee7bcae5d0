//! Capacity updater: orchestrates per-event sync passes.

use std::fmt;
use std::sync::Arc;

use crate::clock::Clock;
use crate::domain::marketing::{self, MarketingConfig};
use crate::domain::notice::{self, LowCapacityNotice};
use crate::domain::{
    CapacityStats, ContentStore, ContentUpdate, EventContent, EventId, EventSource,
    MarketingUpdate, Notifier,
};
use crate::error::SyncError;
use crate::service::in_flight::InFlight;

const SECONDS_PER_HOUR: f64 = 3_600.0;
const SECONDS_PER_DAY: f64 = 86_400.0;

/// Orchestration layer for event capacity updates.
///
/// Stateless coordinator: owns trait handles to the CRM source, the
/// content store and the notifier. Every update follows the pattern:
/// guard re-entry → fetch from CRM → derive stats → evaluate marketing →
/// apply one write. Per-event failures are logged and never abort a
/// batch.
pub struct CapacityUpdater {
    source: Arc<dyn EventSource>,
    store: Arc<dyn ContentStore>,
    notifier: Arc<dyn Notifier>,
    clock: Arc<dyn Clock>,
    config: MarketingConfig,
    site_base_url: String,
    in_flight: InFlight,
}

impl fmt::Debug for CapacityUpdater {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CapacityUpdater")
            .field("config", &self.config)
            .field("site_base_url", &self.site_base_url)
            .field("in_flight", &self.in_flight)
            .finish_non_exhaustive()
    }
}

impl CapacityUpdater {
    /// Creates a new `CapacityUpdater`.
    #[must_use]
    pub fn new(
        source: Arc<dyn EventSource>,
        store: Arc<dyn ContentStore>,
        notifier: Arc<dyn Notifier>,
        clock: Arc<dyn Clock>,
        config: MarketingConfig,
        site_base_url: &str,
    ) -> Self {
        Self {
            source,
            store,
            notifier,
            clock,
            config,
            site_base_url: site_base_url.trim_end_matches('/').to_string(),
            in_flight: InFlight::new(),
        }
    }

    /// Lists the ids of all events eligible for a sync pass.
    ///
    /// A listing failure is logged and yields an empty list, so callers
    /// degrade to a no-op run instead of crashing.
    pub async fn event_ids(&self) -> Vec<EventId> {
        match self.source.list_event_ids().await {
            Ok(ids) => ids,
            Err(e) => {
                tracing::error!(error = %e, kind = e.kind(), "failed to list events");
                Vec::new()
            }
        }
    }

    /// Returns true when an update for the event is currently running.
    #[must_use]
    pub fn is_event_updating(&self, id: EventId) -> bool {
        self.in_flight.is_active(id)
    }

    /// Recalculates stats and marketing fields for one event.
    ///
    /// A no-op when an update for the same event is already in flight.
    /// Failures are logged, not returned: one broken event must not take
    /// down the batch around it.
    pub async fn update_event(&self, id: EventId) {
        let Some(_guard) = self.in_flight.try_begin(id) else {
            tracing::debug!(event_id = %id, "update already in flight, skipping");
            return;
        };

        if let Err(e) = self.run_update(id).await {
            tracing::error!(event_id = %id, error = %e, kind = e.kind(), "event update failed");
        }
    }

    /// Updates a batch of events sequentially.
    ///
    /// Returns the number of events processed, which always equals the
    /// input length: failed events are logged and counted like the rest.
    pub async fn update_events(&self, ids: &[EventId]) -> usize {
        self.update_events_with_progress(ids, |_, _| {}).await
    }

    /// Updates a batch of events, reporting progress after each one.
    ///
    /// The callback receives `(processed, total)` after every event,
    /// including failed ones.
    pub async fn update_events_with_progress<F>(&self, ids: &[EventId], mut progress: F) -> usize
    where
        F: FnMut(usize, usize),
    {
        let total = ids.len();
        let mut processed = 0;
        for id in ids {
            self.update_event(*id).await;
            processed += 1;
            progress(processed, total);
        }
        processed
    }

    /// Re-evaluates marketing fields for a batch of events from their
    /// stored stats, without consulting the CRM.
    ///
    /// Used when thresholds change and statuses need realigning before
    /// the next full sync. Returns the number of records written.
    pub async fn refresh_marketing(&self, ids: &[EventId]) -> usize {
        let mut refreshed = 0;
        for id in ids {
            match self.refresh_one(*id).await {
                Ok(true) => refreshed += 1,
                Ok(false) => {}
                Err(e) => {
                    tracing::error!(event_id = %id, error = %e, kind = e.kind(), "marketing refresh failed");
                }
            }
        }
        refreshed
    }

    async fn run_update(&self, id: EventId) -> Result<(), SyncError> {
        let Some(event) = self.source.fetch_event(id).await? else {
            tracing::debug!(event_id = %id, "event no longer present in the CRM, skipping");
            return Ok(());
        };
        let registered = self.source.count_registered(id).await?;
        let stats = CapacityStats::compute(event.effective_capacity(), registered);

        let Some(content) = self.store.load(id).await? else {
            tracing::debug!(event_id = %id, "no content record for event, skipping");
            return Ok(());
        };

        let marketing = self.decide_marketing(&content, &stats).await;
        let update = ContentUpdate {
            stats: Some(stats),
            marketing,
        };
        self.store.apply(id, &update).await?;

        tracing::debug!(
            event_id = %id,
            registered,
            percent_full = ?stats.percent_full,
            "event stats updated"
        );
        Ok(())
    }

    async fn refresh_one(&self, id: EventId) -> Result<bool, SyncError> {
        let Some(content) = self.store.load(id).await? else {
            tracing::debug!(event_id = %id, "no content record for event, skipping");
            return Ok(false);
        };

        let stored = CapacityStats {
            capacity: content.capacity,
            registered: content.registered.unwrap_or(0),
            remaining: content.remaining,
            percent_full: content.percent_full,
        };
        let update = ContentUpdate {
            stats: None,
            marketing: self.decide_marketing(&content, &stored).await,
        };
        if update.is_empty() {
            return Ok(false);
        }
        self.store.apply(id, &update).await?;
        Ok(true)
    }

    /// Evaluates the marketing ladder and the low-capacity gate against
    /// the record's stored start time.
    ///
    /// Returns `None` when the record has no start time: without one
    /// there is no distance-to-start and the stored marketing fields stay
    /// untouched.
    async fn decide_marketing(
        &self,
        content: &EventContent,
        stats: &CapacityStats,
    ) -> Option<MarketingUpdate> {
        let start = content.start_time?;
        let now = self.clock.now();
        let seconds_until_start = (start - now).num_seconds() as f64;
        let days_until_start = seconds_until_start / SECONDS_PER_DAY;
        let hours_until_start = seconds_until_start / SECONDS_PER_HOUR;

        let decision = marketing::evaluate(stats.percent_full, days_until_start, &self.config);

        let mut notified = false;
        if notice::should_notify(
            stats.percent_full,
            hours_until_start,
            self.config.notification_window_hours,
            content.low_capacity_notified,
        ) {
            if self.config.notification_recipients.is_empty() {
                tracing::debug!(
                    event_id = %content.id,
                    "low-capacity notice suppressed, no recipients configured"
                );
            } else {
                let notice = LowCapacityNotice {
                    event_id: content.id,
                    title: content.title.clone(),
                    registered: stats.registered,
                    capacity: stats.capacity,
                    percent_full: stats.percent_full.unwrap_or(0.0),
                    start_time: start,
                    link: self.event_link(content.id),
                    recipients: self.config.notification_recipients.clone(),
                };
                match self.notifier.deliver(&notice).await {
                    Ok(()) => {
                        tracing::info!(
                            event_id = %content.id,
                            percent_full = stats.percent_full.unwrap_or(0.0),
                            "low-capacity notice sent"
                        );
                    }
                    Err(e) => {
                        tracing::error!(
                            event_id = %content.id,
                            error = %e,
                            "failed to deliver low-capacity notice"
                        );
                    }
                }
                // The flag goes up even when delivery failed: the gate is
                // one-shot and a retry storm helps nobody.
                notified = true;
            }
        }

        Some(MarketingUpdate {
            status: decision.status,
            discount_pct: decision.discount_pct,
            notified,
        })
    }

    fn event_link(&self, id: EventId) -> String {
        format!("{}/events/{}", self.site_base_url, id)
    }
}
