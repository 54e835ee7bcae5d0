//! # capacity-sync
//!
//! Synchronizes event registration data from a CRM onto content records:
//! capacity stats (registered, remaining, percent full), a derived
//! marketing status with its discount, and a one-shot low-capacity staff
//! notice.
//!
//! All decision rules live in [`domain`]; [`service::CapacityUpdater`]
//! orchestrates them over three integration seams so storage can be
//! PostgreSQL in production and in-memory in tests.
//!
//! ## Architecture
//!
//! ```text
//! cron / operator
//!     │
//!     └── CapacityUpdater (service/)
//!             ├── EventSource  ── CRM tables (read-only)
//!             ├── ContentStore ── event_content table
//!             ├── Notifier     ── notification_outbox table
//!             │
//!             └── domain/ (stats, marketing ladder, notice gate)
//! ```

pub mod clock;
pub mod config;
pub mod domain;
pub mod error;
pub mod persistence;
pub mod service;
