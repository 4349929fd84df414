// Eventra client core
//
// Role-based identity, the login/signup flow against the Auth Service, the
// single-slot session, student registrations and event authoring.
//
// Data flow:
//   form → identity (validate) → auth flow → Auth Service → session → dashboard
//   dashboard → registration ledger (students) | event authoring → Event Store

pub mod auth;
pub mod config;
pub mod error;
pub mod events;
pub mod id;
pub mod identity;
pub mod registration;
pub mod session;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use config::ClientConfig;
pub use error::{AuthFlowError, EventStoreError, Field, StorageError, ValidationError};
pub use id::EventId;
pub use registration::{is_registered, toggle_registration, RegistrationChange, RegistrationLedger};
