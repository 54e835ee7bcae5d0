//! Error types for the capacity sync pipeline.
//!
//! [`SyncError`] is the central error type for the crate. Per-event failures
//! during a batch run are logged and never abort the run, so the variants
//! here describe which integration edge failed rather than how to recover.

/// Failure raised by one of the pipeline's integration edges.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// CRM query failure (event listing, event fetch or participant count).
    #[error("source fetch error: {0}")]
    SourceFetch(String),

    /// Content store read or write failure.
    #[error("persistence error: {0}")]
    Persistence(String),

    /// Low-capacity notice could not be handed to the notifier.
    #[error("notification error: {0}")]
    Notification(String),
}

impl SyncError {
    /// Returns a short stable label for the failed edge, used as a
    /// structured logging field.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::SourceFetch(_) => "source",
            Self::Persistence(_) => "persistence",
            Self::Notification(_) => "notification",
        }
    }
}
