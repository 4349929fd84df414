use std::sync::Arc;

use tracing::{debug, info, warn};

use super::persistence::KeyValueStore;
use crate::error::StorageError;
use crate::identity::{Role, User};
use crate::events::BaseEventStore;
use crate::registration::{release_all_with_store, RegistrationLedger};

/// Key under which the signed-in user is persisted.
pub const SESSION_KEY: &str = "eventra.session";

/// Dashboard selected from the session slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DashboardView {
    /// Public landing page with the auth surface.
    Landing,
    Student,
    Faculty,
    Organizer,
}

impl DashboardView {
    pub fn for_role(role: Role) -> Self {
        match role {
            Role::Student => DashboardView::Student,
            Role::Faculty => DashboardView::Faculty,
            Role::Organizer => DashboardView::Organizer,
        }
    }
}

#[derive(Debug, Clone)]
struct Session {
    user: User,
    /// Present only for students; lives and dies with the session.
    ledger: Option<RegistrationLedger>,
}

impl Session {
    fn new(user: User) -> Self {
        let ledger = matches!(user, User::Student(_)).then(RegistrationLedger::new);
        Self { user, ledger }
    }
}

/// Single-slot holder of the authenticated user.
#[derive(Default)]
pub struct SessionStore {
    slot: Option<Session>,
    persistence: Option<Arc<dyn KeyValueStore>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write the slot through to `store` on every login/logout.
    pub fn with_persistence(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            slot: None,
            persistence: Some(store),
        }
    }

    /// Replace the slot unconditionally.
    ///
    /// The in-memory slot is always updated; an `Err` only means the
    /// persisted copy could not be written.
    pub fn login(&mut self, user: User) -> Result<(), StorageError> {
        let role = user.role();
        self.slot = Some(Session::new(user));
        debug!(%role, "Session slot replaced");
        self.persist()
    }

    /// Forget the user and, for students, their registrations.
    pub fn logout(&mut self) -> Result<(), StorageError> {
        if let Some(session) = self.slot.take() {
            info!(role = %session.user.role(), "Session cleared");
        }
        match &self.persistence {
            Some(store) => store.clear(SESSION_KEY),
            None => Ok(()),
        }
    }

    /// Log out after handing the student's seats back to the event store.
    ///
    /// A store failure while releasing is logged and does not keep the user
    /// signed in. Returns how many seats were released.
    pub async fn logout_with_store<S>(&mut self, store: &S) -> Result<usize, StorageError>
    where
        S: BaseEventStore + ?Sized,
    {
        let mut released = 0;
        if let Some(ledger) = self.ledger_mut() {
            match release_all_with_store(ledger, store).await {
                Ok(count) => released = count,
                Err(e) => {
                    warn!(error = %e, held = ledger.len(), "Failed to release registrations on logout")
                }
            }
        }
        self.logout()?;
        Ok(released)
    }

    /// Replay a previously stored user without re-running auth.
    ///
    /// An unreadable stored session is cleared and reported.
    pub fn hydrate(&mut self) -> Result<Option<&User>, StorageError> {
        let Some(store) = &self.persistence else {
            return Ok(None);
        };
        let Some(raw) = store.get(SESSION_KEY)? else {
            return Ok(None);
        };

        match serde_json::from_str::<User>(&raw) {
            Ok(user) => {
                info!(role = %user.role(), "Session hydrated from storage");
                self.slot = Some(Session::new(user));
                Ok(self.current_user())
            }
            Err(e) => {
                warn!(error = %e, "Discarding unreadable stored session");
                store.clear(SESSION_KEY)?;
                Err(e.into())
            }
        }
    }

    pub fn current_user(&self) -> Option<&User> {
        self.slot.as_ref().map(|session| &session.user)
    }

    pub fn is_authenticated(&self) -> bool {
        self.slot.is_some()
    }

    pub fn view(&self) -> DashboardView {
        match &self.slot {
            Some(session) => DashboardView::for_role(session.user.role()),
            None => DashboardView::Landing,
        }
    }

    /// The signed-in student's registrations.
    pub fn ledger(&self) -> Option<&RegistrationLedger> {
        self.slot.as_ref().and_then(|session| session.ledger.as_ref())
    }

    pub fn ledger_mut(&mut self) -> Option<&mut RegistrationLedger> {
        self.slot.as_mut().and_then(|session| session.ledger.as_mut())
    }

    fn persist(&self) -> Result<(), StorageError> {
        let (Some(store), Some(session)) = (&self.persistence, &self.slot) else {
            return Ok(());
        };
        let json = serde_json::to_string(&session.user)?;
        store.set(SESSION_KEY, &json)
    }
}
