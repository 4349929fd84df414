//! Session store - the signed-in user and the dashboard it selects

pub mod persistence;
pub mod store;

pub use persistence::{FileKeyValueStore, InMemoryKeyValueStore, KeyValueStore};
pub use store::{DashboardView, SessionStore, SESSION_KEY};
