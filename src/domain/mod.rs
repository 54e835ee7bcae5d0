//! Domain layer: identifiers, records, stat derivation and decision rules.
//!
//! This module contains the pure core of the sync: event identity, the
//! records on both sides of the pipeline, capacity stat derivation, the
//! marketing status ladder, the low-capacity notice gate, and the traits
//! the orchestrator uses to reach the outside world.

pub mod capacity;
pub mod event_id;
pub mod marketing;
pub mod notice;
pub mod ports;
pub mod records;

pub use capacity::CapacityStats;
pub use event_id::EventId;
pub use marketing::{MarketingConfig, MarketingDecision, MarketingStatus};
pub use notice::LowCapacityNotice;
pub use ports::{ContentStore, EventSource, Notifier};
pub use records::{ContentUpdate, CrmEvent, EventContent, MarketingUpdate};
