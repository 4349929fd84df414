//! Event authoring - form validation, categories, the Event Store and dashboard stats

pub mod authoring;
pub mod category;
pub mod stats;
pub mod store;

pub use authoring::{
    parse_tags, validate_event_submission, EventForm, EventImage, EventStatus, ImageAttachment,
    NormalizedEvent, Venue, MAX_IMAGE_BYTES,
};
pub use category::{EventCategory, DEFAULT_GLYPH};
pub use stats::{capacity_label, event_days_in_month, DashboardStats};
pub use store::{BaseEventStore, Creator, InMemoryEventStore, StoredEvent};
