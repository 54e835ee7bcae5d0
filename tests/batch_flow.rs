//! End-to-end batch runs over the in-memory adapters.

#![allow(clippy::panic)]

use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};

use capacity_sync::clock::{Clock, ManualClock};
use capacity_sync::domain::{
    ContentStore, CrmEvent, EventContent, EventId, EventSource, MarketingConfig, MarketingStatus,
    Notifier,
};
use capacity_sync::persistence::memory::{MemoryContentStore, MemoryEventSource, MemoryNotifier};
use capacity_sync::service::CapacityUpdater;

fn base_time() -> DateTime<Utc> {
    match Utc.with_ymd_and_hms(2025, 9, 1, 9, 0, 0) {
        chrono::LocalResult::Single(t) => t,
        _ => panic!("fixed timestamp should be valid"),
    }
}

fn content(id: i64, title: &str, start: DateTime<Utc>) -> EventContent {
    EventContent {
        id: EventId::new(id),
        title: title.to_string(),
        start_time: Some(start),
        end_time: Some(start + Duration::hours(3)),
        capacity: None,
        registered: None,
        remaining: None,
        percent_full: None,
        marketing_status: MarketingStatus::Normal,
        marketing_discount_pct: 0,
        low_capacity_notified: false,
    }
}

fn crm_event(id: i64, cap: Option<i64>) -> CrmEvent {
    CrmEvent {
        id: EventId::new(id),
        is_online_registration: true,
        max_participants: cap,
    }
}

struct Harness {
    source: Arc<MemoryEventSource>,
    store: Arc<MemoryContentStore>,
    notifier: Arc<MemoryNotifier>,
    clock: Arc<ManualClock>,
    updater: CapacityUpdater,
}

fn make_harness(recipients: Vec<String>, config: MarketingConfig) -> Harness {
    let source = Arc::new(MemoryEventSource::new());
    let store = Arc::new(MemoryContentStore::new());
    let notifier = Arc::new(MemoryNotifier::new());
    let clock = Arc::new(ManualClock::new(base_time()));
    let config = MarketingConfig {
        notification_recipients: recipients,
        ..config
    };
    let updater = CapacityUpdater::new(
        Arc::clone(&source) as Arc<dyn EventSource>,
        Arc::clone(&store) as Arc<dyn ContentStore>,
        Arc::clone(&notifier) as Arc<dyn Notifier>,
        Arc::clone(&clock) as Arc<dyn Clock>,
        config,
        "https://example.org",
    );
    Harness {
        source,
        store,
        notifier,
        clock,
        updater,
    }
}

fn loaded(store: &MemoryContentStore, id: i64) -> EventContent {
    let Some(record) = store.get(EventId::new(id)) else {
        panic!("content record {id} should exist");
    };
    record
}

#[tokio::test]
async fn full_batch_updates_every_record_and_notifies_once() {
    let h = make_harness(
        vec!["staff@example.org".to_string()],
        MarketingConfig::default(),
    );

    // A mixed population: an underselling event far out, an underselling
    // event about to start, a healthy imminent event, a CRM failure, and
    // an event without online registration.
    h.source.insert_event(crm_event(1, Some(100)));
    h.source.set_registered(EventId::new(1), 20);
    h.store
        .insert(content(1, "Annual Conference", base_time() + Duration::days(10)));

    h.source.insert_event(crm_event(2, Some(40)));
    h.source.set_registered(EventId::new(2), 3);
    h.store
        .insert(content(2, "Intro to Welding", base_time() + Duration::hours(24)));

    h.source.insert_event(crm_event(3, Some(40)));
    h.source.set_registered(EventId::new(3), 30);
    h.store
        .insert(content(3, "Laser Cutting Basics", base_time() + Duration::hours(24)));

    h.source.insert_event(crm_event(4, Some(15)));
    h.source.set_registered(EventId::new(4), 5);
    h.store
        .insert(content(4, "Broken Event", base_time() + Duration::days(3)));
    h.source.fail_event(EventId::new(4));

    h.source.insert_event(CrmEvent {
        id: EventId::new(5),
        is_online_registration: false,
        max_participants: Some(60),
    });
    h.source.set_registered(EventId::new(5), 8);
    h.store
        .insert(content(5, "Open Studio", base_time() + Duration::days(20)));

    let ids = h.updater.event_ids().await;
    assert_eq!(ids.len(), 5);

    let processed = h.updater.update_events(&ids).await;
    assert_eq!(processed, 5, "failed events still count as processed");

    // Far-out underselling event: early bird, no notice.
    let first = loaded(&h.store, 1);
    assert_eq!(first.capacity, Some(100));
    assert_eq!(first.remaining, Some(80));
    assert_eq!(first.percent_full, Some(20.0));
    assert_eq!(first.marketing_status, MarketingStatus::EarlyBird);
    assert_eq!(first.marketing_discount_pct, 10);
    assert!(!first.low_capacity_notified);

    // Imminent underselling event: flash sale plus the staff notice.
    let second = loaded(&h.store, 2);
    assert_eq!(second.percent_full, Some(7.5));
    assert_eq!(second.marketing_status, MarketingStatus::FlashSale);
    assert_eq!(second.marketing_discount_pct, 25);
    assert!(second.low_capacity_notified);

    // Imminent healthy event: normal, quiet.
    let third = loaded(&h.store, 3);
    assert_eq!(third.percent_full, Some(75.0));
    assert_eq!(third.marketing_status, MarketingStatus::Normal);
    assert!(!third.low_capacity_notified);

    // CRM failure: record left exactly as seeded.
    let fourth = loaded(&h.store, 4);
    assert_eq!(fourth.capacity, None);
    assert_eq!(fourth.registered, None);
    assert_eq!(fourth.marketing_status, MarketingStatus::Normal);

    // Registration disabled: derived stats null, count still recorded.
    let fifth = loaded(&h.store, 5);
    assert_eq!(fifth.capacity, None);
    assert_eq!(fifth.registered, Some(8));
    assert_eq!(fifth.remaining, None);
    assert_eq!(fifth.percent_full, None);

    let sent = h.notifier.sent();
    assert_eq!(sent.len(), 1);
    let Some(notice) = sent.first() else {
        panic!("one notice expected");
    };
    assert_eq!(notice.event_id, EventId::new(2));
    assert_eq!(notice.title, "Intro to Welding");
    assert_eq!(notice.registered, 3);
    assert_eq!(notice.capacity, Some(40));
    assert_eq!(notice.link, "https://example.org/events/2");

    // A second run an hour later converges without repeating the notice.
    h.clock.advance(Duration::hours(1));
    let rerun = h.updater.update_events(&ids).await;
    assert_eq!(rerun, 5);
    assert_eq!(h.notifier.sent().len(), 1);
    assert!(loaded(&h.store, 2).low_capacity_notified);

    // Registrations pick up on the flash-sale event: status returns to
    // normal, the notice flag stays up.
    h.source.set_registered(EventId::new(2), 25);
    h.updater.update_event(EventId::new(2)).await;
    let recovered = loaded(&h.store, 2);
    assert_eq!(recovered.percent_full, Some(62.5));
    assert_eq!(recovered.marketing_status, MarketingStatus::Normal);
    assert_eq!(recovered.marketing_discount_pct, 0);
    assert!(recovered.low_capacity_notified);
    assert_eq!(h.notifier.sent().len(), 1);
}

#[tokio::test]
async fn progress_reports_reach_the_caller_in_order() {
    let h = make_harness(Vec::new(), MarketingConfig::default());
    for id in 1..=4 {
        h.source.insert_event(crm_event(id, Some(10)));
        h.store
            .insert(content(id, "Workshop", base_time() + Duration::days(1)));
    }

    let ids = h.updater.event_ids().await;
    let mut seen = Vec::new();
    let processed = h
        .updater
        .update_events_with_progress(&ids, |done, total| seen.push((done, total)))
        .await;

    assert_eq!(processed, 4);
    assert_eq!(seen, vec![(1, 4), (2, 4), (3, 4), (4, 4)]);
}

#[tokio::test]
async fn marketing_refresh_realigns_statuses_without_crm_traffic() {
    // Loosened flash-sale window: four days instead of two.
    let config = MarketingConfig {
        flash_sale_max_days: 4.0,
        ..MarketingConfig::default()
    };
    let h = make_harness(Vec::new(), config);

    // Stored stats from an earlier full sync; the CRM double stays empty
    // to prove the refresh never consults it.
    let mut record = content(7, "Pottery Wheel", base_time() + Duration::days(3));
    record.capacity = Some(12);
    record.registered = Some(4);
    record.remaining = Some(8);
    record.percent_full = Some(33.3);
    h.store.insert(record);

    let refreshed = h.updater.refresh_marketing(&[EventId::new(7)]).await;
    assert_eq!(refreshed, 1);

    let after = loaded(&h.store, 7);
    assert_eq!(after.marketing_status, MarketingStatus::FlashSale);
    assert_eq!(after.marketing_discount_pct, 25);
    assert_eq!(after.registered, Some(4));
    assert_eq!(after.percent_full, Some(33.3));
}

#[tokio::test]
async fn unreachable_crm_degrades_to_an_empty_run() {
    let h = make_harness(Vec::new(), MarketingConfig::default());
    h.source.insert_event(crm_event(1, Some(10)));
    h.source.fail_listing();

    let ids = h.updater.event_ids().await;
    assert!(ids.is_empty());
    assert_eq!(h.updater.update_events(&ids).await, 0);
}
