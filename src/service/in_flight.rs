//! Re-entrancy guard for per-event updates.
//!
//! An event being updated must not be re-entered by a concurrent caller
//! (or by a save hook looping back into the updater). [`InFlight`] tracks
//! which events are mid-update; [`InFlightGuard`] clears the marker on
//! drop, so every exit path releases it, including cancellation.

use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::domain::EventId;

/// Set of events currently being updated.
///
/// Uses a `std::sync::Mutex` rather than an async lock: the guard must be
/// able to clear the marker from a synchronous `Drop`.
#[derive(Debug, Default)]
pub struct InFlight {
    active: Mutex<HashSet<EventId>>,
}

impl InFlight {
    /// Creates an empty marker set.
    #[must_use]
    pub fn new() -> Self {
        Self {
            active: Mutex::new(HashSet::new()),
        }
    }

    /// Marks an event as mid-update.
    ///
    /// Returns `None` when the event is already marked, in which case the
    /// caller must skip the update.
    #[must_use]
    pub fn try_begin(&self, id: EventId) -> Option<InFlightGuard<'_>> {
        if self.lock().insert(id) {
            Some(InFlightGuard { owner: self, id })
        } else {
            None
        }
    }

    /// Returns true when an update for the event is in progress.
    #[must_use]
    pub fn is_active(&self, id: EventId) -> bool {
        self.lock().contains(&id)
    }

    fn end(&self, id: EventId) {
        self.lock().remove(&id);
    }

    fn lock(&self) -> MutexGuard<'_, HashSet<EventId>> {
        self.active.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Marker held for the duration of one event update.
#[derive(Debug)]
pub struct InFlightGuard<'a> {
    owner: &'a InFlight,
    id: EventId,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.owner.end(self.id);
    }
}
