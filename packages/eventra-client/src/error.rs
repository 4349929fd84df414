use std::fmt;

use thiserror::Error;

use crate::events::EventStatus;

/// Form input named by a validation failure.
///
/// `as_str` is the camelCase wire name; `required_message` is the text shown
/// in the form's message slot when the field is missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Email,
    Password,
    FullName,
    OrganizationName,
    OrganizationType,
    OrganizationId,
    Title,
    Date,
    Time,
    EndTime,
    Location,
    MeetingLink,
    Category,
    Capacity,
    Image,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Email => "email",
            Field::Password => "password",
            Field::FullName => "fullName",
            Field::OrganizationName => "organizationName",
            Field::OrganizationType => "organizationType",
            Field::OrganizationId => "organizationId",
            Field::Title => "title",
            Field::Date => "date",
            Field::Time => "time",
            Field::EndTime => "endTime",
            Field::Location => "location",
            Field::MeetingLink => "meetingLink",
            Field::Category => "category",
            Field::Capacity => "capacity",
            Field::Image => "image",
        }
    }

    pub fn required_message(&self) -> &'static str {
        match self {
            Field::Email => "Email is required",
            Field::Password => "Password is required",
            Field::FullName => "Full Name is required",
            Field::OrganizationName => "Organization Name is required",
            Field::OrganizationType => "Organization type is required",
            Field::OrganizationId => "Organization ID is required",
            Field::Title => "Event title is required",
            Field::Date => "Event date is required",
            Field::Time => "Event time is required",
            Field::EndTime => "Event end time is required",
            Field::Location => "Event location or online meeting link is required",
            Field::MeetingLink => "Meeting link is required for online events",
            Field::Category => "Event category is required",
            Field::Capacity => "Capacity is required",
            Field::Image => "Image is required",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Local, pre-flight rejection of a form submission. Never reaches the network.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{}", .0.required_message())]
    MissingField(Field),

    #[error("Invalid {field}: {reason}")]
    InvalidField { field: Field, reason: String },
}

impl ValidationError {
    pub fn invalid(field: Field, reason: impl Into<String>) -> Self {
        ValidationError::InvalidField {
            field,
            reason: reason.into(),
        }
    }

    /// The field the error names.
    pub fn field(&self) -> Field {
        match self {
            ValidationError::MissingField(field) => *field,
            ValidationError::InvalidField { field, .. } => *field,
        }
    }
}

/// Failures surfaced by the auth flow controller.
///
/// All variants render into the form's single message slot via
/// [`AuthFlowError::user_message`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthFlowError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Non-2xx reply, or a 2xx reply that lacks what the client needs.
    #[error("{message}")]
    AuthService { status: Option<u16>, message: String },

    /// Network failure, non-JSON reply or unparseable body.
    #[error("Network error: {0}")]
    Transport(String),

    #[error("A submission is already in flight")]
    SubmissionInFlight,

    #[error("Waiting for the Organization ID to be acknowledged")]
    AwaitingAcknowledgment,
}

impl AuthFlowError {
    pub fn user_message(&self) -> String {
        self.to_string()
    }
}

/// Key-value persistence failures.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Event Store failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EventStoreError {
    #[error("Event not found: {0}")]
    NotFound(String),

    #[error("Event is full ({capacity} participants)")]
    CapacityReached { capacity: u32 },

    #[error("Event has no registrations to release")]
    NotRegistered,

    #[error("Event is completed and no longer takes registrations")]
    EventClosed,

    #[error("Event status cannot change from {from} to {to}")]
    InvalidStatusTransition { from: EventStatus, to: EventStatus },
}
