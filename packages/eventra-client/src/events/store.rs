// Event Store collaborator
//
// Holds authored events and their participant counters. The trait is
// infrastructure only; the in-memory implementation backs the CLI and tests.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, info};

use super::authoring::{EventStatus, NormalizedEvent};
use crate::error::EventStoreError;
use crate::id::EventId;
use crate::identity::{OrganizationId, Role, User};

/// Account that authored an event. Only faculty and organizers author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Creator {
    pub email: String,
    pub role: Role,
    pub organization_id: OrganizationId,
}

impl Creator {
    /// `None` for roles that cannot author events.
    pub fn from_user(user: &User) -> Option<Self> {
        let role = user.role();
        if !role.can_author_events() {
            return None;
        }
        Some(Self {
            email: user.email().to_string(),
            role,
            organization_id: user.organization_id().clone(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredEvent {
    pub id: EventId,
    pub creator: Creator,
    #[serde(flatten)]
    pub event: NormalizedEvent,
}

#[async_trait]
pub trait BaseEventStore: Send + Sync {
    /// Store a new event and assign its id.
    async fn create(
        &self,
        creator: Creator,
        event: NormalizedEvent,
    ) -> Result<StoredEvent, EventStoreError>;

    async fn get(&self, id: EventId) -> Result<StoredEvent, EventStoreError>;

    /// Events authored by `email`, oldest first.
    async fn list_by_creator(&self, email: &str) -> Vec<StoredEvent>;

    /// Events visible to members of an organization.
    async fn list_by_organization(&self, organization_id: &OrganizationId) -> Vec<StoredEvent>;

    async fn delete(&self, id: EventId) -> Result<(), EventStoreError>;

    /// Move an event along its lifecycle. Active events may complete;
    /// completed events stay completed. Setting the current status is a no-op.
    async fn set_status(
        &self,
        id: EventId,
        status: EventStatus,
    ) -> Result<StoredEvent, EventStoreError>;

    /// Bump the participant counter; returns the new count.
    async fn record_registration(&self, id: EventId) -> Result<u32, EventStoreError>;

    /// Drop the participant counter; returns the new count.
    async fn release_registration(&self, id: EventId) -> Result<u32, EventStoreError>;
}

#[derive(Debug, Default)]
pub struct InMemoryEventStore {
    events: Mutex<BTreeMap<EventId, StoredEvent>>,
}

impl InMemoryEventStore {
    pub fn new() -> Self {
        Self::default()
    }

    async fn matching<F>(&self, predicate: F) -> Vec<StoredEvent>
    where
        F: Fn(&StoredEvent) -> bool + Send,
    {
        let events = self.events.lock().await;
        events.values().filter(|e| predicate(e)).cloned().collect()
    }
}

fn not_found(id: EventId) -> EventStoreError {
    EventStoreError::NotFound(id.to_string())
}

#[async_trait]
impl BaseEventStore for InMemoryEventStore {
    async fn create(
        &self,
        creator: Creator,
        mut event: NormalizedEvent,
    ) -> Result<StoredEvent, EventStoreError> {
        event.total_participants = 0;
        let stored = StoredEvent {
            id: EventId::new(),
            creator,
            event,
        };

        info!(
            event_id = %stored.id,
            creator = %stored.creator.email,
            title = %stored.event.title,
            "Event created"
        );
        self.events.lock().await.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn get(&self, id: EventId) -> Result<StoredEvent, EventStoreError> {
        self.events
            .lock()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| not_found(id))
    }

    async fn list_by_creator(&self, email: &str) -> Vec<StoredEvent> {
        self.matching(|e| e.creator.email.eq_ignore_ascii_case(email)).await
    }

    async fn list_by_organization(&self, organization_id: &OrganizationId) -> Vec<StoredEvent> {
        self.matching(|e| &e.creator.organization_id == organization_id).await
    }

    async fn delete(&self, id: EventId) -> Result<(), EventStoreError> {
        self.events.lock().await.remove(&id).ok_or_else(|| not_found(id))?;
        info!(event_id = %id, "Event deleted");
        Ok(())
    }

    async fn set_status(
        &self,
        id: EventId,
        status: EventStatus,
    ) -> Result<StoredEvent, EventStoreError> {
        let mut events = self.events.lock().await;
        let stored = events.get_mut(&id).ok_or_else(|| not_found(id))?;
        let from = stored.event.status;
        match (from, status) {
            (current, next) if current == next => return Ok(stored.clone()),
            (EventStatus::Active, EventStatus::Completed) => {}
            (from, to) => return Err(EventStoreError::InvalidStatusTransition { from, to }),
        }

        stored.event.status = status;
        debug!(event_id = %id, %status, "Event status changed");
        Ok(stored.clone())
    }

    async fn record_registration(&self, id: EventId) -> Result<u32, EventStoreError> {
        let mut events = self.events.lock().await;
        let event = &mut events.get_mut(&id).ok_or_else(|| not_found(id))?.event;

        if event.status == EventStatus::Completed {
            return Err(EventStoreError::EventClosed);
        }
        if let Some(capacity) = event.capacity {
            if event.total_participants >= capacity {
                return Err(EventStoreError::CapacityReached { capacity });
            }
        }

        event.total_participants += 1;
        debug!(event_id = %id, participants = event.total_participants, "Registration recorded");
        Ok(event.total_participants)
    }

    async fn release_registration(&self, id: EventId) -> Result<u32, EventStoreError> {
        let mut events = self.events.lock().await;
        let event = &mut events.get_mut(&id).ok_or_else(|| not_found(id))?.event;

        event.total_participants = event
            .total_participants
            .checked_sub(1)
            .ok_or(EventStoreError::NotRegistered)?;
        debug!(event_id = %id, participants = event.total_participants, "Registration released");
        Ok(event.total_participants)
    }
}
