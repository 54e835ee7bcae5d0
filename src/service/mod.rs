//! Service layer: sync orchestration.
//!
//! [`CapacityUpdater`] coordinates per-event update passes, delegates the
//! decision rules to [`crate::domain`], and guards each event against
//! concurrent re-entry with [`InFlight`].

pub mod in_flight;
pub mod updater;

pub use in_flight::InFlight;
pub use updater::CapacityUpdater;
