//! Persistence layer: PostgreSQL adapters and in-memory doubles.
//!
//! Binds the domain's integration traits to concrete storage: the CRM
//! tables for reads, the `event_content` table for writes, and the
//! `notification_outbox` table for notices. The `memory` module offers
//! the same traits over hash maps for tests and local development.

pub mod content;
pub mod memory;
pub mod outbox;
pub mod source;

pub use content::PgContentStore;
pub use outbox::PgOutboxNotifier;
pub use source::PgEventSource;
