//! Registration ledger - the set of events a student has signed up for

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::EventStoreError;
use crate::events::BaseEventStore;
use crate::id::EventId;

/// Which way a toggle went.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationChange {
    Registered,
    Unregistered,
}

/// Set of event ids. Membership is the only state; order is not meaningful.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegistrationLedger {
    event_ids: BTreeSet<EventId>,
}

impl RegistrationLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of this ledger with `event_id` membership flipped.
    pub fn toggled(&self, event_id: EventId) -> Self {
        let mut next = self.clone();
        next.toggle(event_id);
        next
    }

    pub fn toggle(&mut self, event_id: EventId) -> RegistrationChange {
        if self.event_ids.remove(&event_id) {
            RegistrationChange::Unregistered
        } else {
            self.event_ids.insert(event_id);
            RegistrationChange::Registered
        }
    }

    pub fn is_registered(&self, event_id: EventId) -> bool {
        self.event_ids.contains(&event_id)
    }

    pub fn len(&self) -> usize {
        self.event_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.event_ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = EventId> + '_ {
        self.event_ids.iter().copied()
    }
}

impl FromIterator<EventId> for RegistrationLedger {
    fn from_iter<I: IntoIterator<Item = EventId>>(iter: I) -> Self {
        Self {
            event_ids: iter.into_iter().collect(),
        }
    }
}

pub fn toggle_registration(ledger: &RegistrationLedger, event_id: EventId) -> RegistrationLedger {
    ledger.toggled(event_id)
}

pub fn is_registered(ledger: &RegistrationLedger, event_id: EventId) -> bool {
    ledger.is_registered(event_id)
}

/// Toggle membership and keep the event's participant counter in step.
///
/// The ledger is only touched once the store has accepted the change, so a
/// full event leaves it as it was. Unregistering from an event the store no
/// longer has still drops it from the ledger, since no seat is held anywhere.
pub async fn toggle_registration_with_store<S>(
    ledger: &mut RegistrationLedger,
    store: &S,
    event_id: EventId,
) -> Result<RegistrationChange, EventStoreError>
where
    S: BaseEventStore + ?Sized,
{
    if ledger.is_registered(event_id) {
        match store.release_registration(event_id).await {
            Ok(_) => {}
            Err(EventStoreError::NotFound(_)) => {
                warn!(event_id = %event_id, "Unregistering from an event that no longer exists");
            }
            Err(e) => return Err(e),
        }
    } else {
        store.record_registration(event_id).await?;
    }

    let change = ledger.toggle(event_id);
    info!(event_id = %event_id, ?change, "Registration toggled");
    Ok(change)
}

/// Give back every seat the ledger holds and empty it.
///
/// Events that were deleted, or whose counter is already at zero, count as
/// released. Any other store failure stops the walk and leaves the
/// unreleased ids in the ledger. Returns how many seats were handed back.
pub async fn release_all_with_store<S>(
    ledger: &mut RegistrationLedger,
    store: &S,
) -> Result<usize, EventStoreError>
where
    S: BaseEventStore + ?Sized,
{
    let mut released = 0;
    for event_id in ledger.iter().collect::<Vec<_>>() {
        match store.release_registration(event_id).await {
            Ok(_) => released += 1,
            Err(EventStoreError::NotFound(_) | EventStoreError::NotRegistered) => {
                debug!(event_id = %event_id, "No seat to release");
            }
            Err(e) => return Err(e),
        }
        ledger.event_ids.remove(&event_id);
    }

    info!(released, "Released ledger registrations");
    Ok(released)
}
