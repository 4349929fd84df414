//! New-event form validation and normalization.
//!
//! `validate_event_submission` is a pure constructor: it reads an
//! [`EventForm`] and either returns the first unmet requirement or a
//! [`NormalizedEvent`] ready for the Event Store.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use super::category::EventCategory;
use crate::auth::Clock;
use crate::error::{Field, ValidationError};

/// Largest custom image accepted (5 MiB).
pub const MAX_IMAGE_BYTES: u64 = 5 * 1024 * 1024;

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMATS: [&str; 3] = ["%H:%M", "%H:%M:%S", "%I:%M %p"];

/// Custom image picked by the author. Reading the file is up to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageAttachment {
    pub file_name: String,
    pub content_type: String,
    pub size_bytes: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_url: Option<String>,
}

impl ImageAttachment {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.content_type.trim().to_ascii_lowercase().starts_with("image/") {
            return Err(ValidationError::invalid(Field::Image, "please select an image file"));
        }
        if self.size_bytes > MAX_IMAGE_BYTES {
            return Err(ValidationError::invalid(Field::Image, "image size should be less than 5MB"));
        }
        Ok(())
    }
}

/// Raw authoring form, as typed.
#[derive(Debug, Clone, Default)]
pub struct EventForm {
    pub title: String,
    pub description: String,
    /// `YYYY-MM-DD`
    pub date: String,
    pub time: String,
    pub end_time: String,
    pub location: String,
    pub meeting_link: String,
    pub is_online: bool,
    pub category: EventCategory,
    /// Empty means unlimited.
    pub capacity: String,
    /// Comma-separated.
    pub tags: String,
    pub prerequisites: String,
    pub image: Option<ImageAttachment>,
}

/// Where the event happens. Exactly one mode per event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum Venue {
    Physical {
        location: String,
    },
    #[serde(rename_all = "camelCase")]
    Online {
        meeting_link: String,
    },
}

impl Venue {
    pub fn is_online(&self) -> bool {
        matches!(self, Venue::Online { .. })
    }

    /// Location, or the meeting link for online events.
    pub fn describe(&self) -> &str {
        match self {
            Venue::Physical { location } => location,
            Venue::Online { meeting_link } => meeting_link,
        }
    }
}

/// Picture shown on the event card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum EventImage {
    Glyph { glyph: String },
    Custom(ImageAttachment),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum EventStatus {
    #[default]
    Active,
    Completed,
}

impl EventStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventStatus::Active => "Active",
            EventStatus::Completed => "Completed",
        }
    }
}

impl std::fmt::Display for EventStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedEvent {
    pub title: String,
    pub description: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub end_time: Option<NaiveTime>,
    pub venue: Venue,
    pub category: EventCategory,
    pub image: EventImage,
    /// `None` is unlimited.
    pub capacity: Option<u32>,
    pub tags: Vec<String>,
    pub prerequisites: String,
    pub status: EventStatus,
    pub total_participants: u32,
    pub created_at: DateTime<Utc>,
}

impl NormalizedEvent {
    pub fn has_custom_image(&self) -> bool {
        matches!(self.image, EventImage::Custom(_))
    }

    /// Glyph text, or the custom image's data URL / file name.
    pub fn display_image(&self) -> &str {
        match &self.image {
            EventImage::Glyph { glyph } => glyph,
            EventImage::Custom(image) => image.data_url.as_deref().unwrap_or(&image.file_name),
        }
    }

    /// True once the participant counter has reached a finite capacity.
    pub fn is_full(&self) -> bool {
        self.capacity.is_some_and(|capacity| self.total_participants >= capacity)
    }
}

/// Split comma-separated tag text. Blank segments are dropped; duplicates kept.
pub fn parse_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

/// Validate an authoring form and build the event to hand to the store.
///
/// Checked in order: title, date, time, end time, venue, capacity, image.
pub fn validate_event_submission(
    form: &EventForm,
    clock: &dyn Clock,
) -> Result<NormalizedEvent, ValidationError> {
    let title = required(&form.title, Field::Title)?;
    let date = parse_date(&form.date, clock)?;
    let time = parse_time(&form.time, Field::Time)?;

    let end_time = match form.end_time.trim() {
        "" => None,
        _ => Some(parse_time(&form.end_time, Field::EndTime)?),
    };

    let venue = if form.is_online {
        Venue::Online {
            meeting_link: required(&form.meeting_link, Field::MeetingLink)?,
        }
    } else {
        Venue::Physical {
            location: required(&form.location, Field::Location)?,
        }
    };

    let capacity = parse_capacity(&form.capacity)?;

    let image = match &form.image {
        Some(attachment) => {
            attachment.validate()?;
            EventImage::Custom(attachment.clone())
        }
        None => EventImage::Glyph {
            glyph: form.category.glyph().to_string(),
        },
    };

    Ok(NormalizedEvent {
        title,
        description: form.description.trim().to_string(),
        date,
        time,
        end_time,
        venue,
        category: form.category,
        image,
        capacity,
        tags: parse_tags(&form.tags),
        prerequisites: form.prerequisites.trim().to_string(),
        status: EventStatus::Active,
        total_participants: 0,
        created_at: clock.now(),
    })
}

fn required(value: &str, field: Field) -> Result<String, ValidationError> {
    match value.trim() {
        "" => Err(ValidationError::MissingField(field)),
        trimmed => Ok(trimmed.to_string()),
    }
}

fn parse_date(raw: &str, clock: &dyn Clock) -> Result<NaiveDate, ValidationError> {
    let raw = required(raw, Field::Date)?;
    let date = NaiveDate::parse_from_str(&raw, DATE_FORMAT)
        .map_err(|_| ValidationError::invalid(Field::Date, "expected YYYY-MM-DD"))?;

    if date < clock.today() {
        return Err(ValidationError::invalid(Field::Date, "cannot be in the past"));
    }
    Ok(date)
}

fn parse_time(raw: &str, field: Field) -> Result<NaiveTime, ValidationError> {
    let raw = required(raw, field)?;
    TIME_FORMATS
        .iter()
        .find_map(|format| NaiveTime::parse_from_str(&raw, format).ok())
        .ok_or_else(|| ValidationError::invalid(field, "expected a time such as 14:30"))
}

fn parse_capacity(raw: &str) -> Result<Option<u32>, ValidationError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }

    let value: i64 = raw.parse().map_err(|_| {
        let fractional = raw.parse::<f64>().is_ok_and(|v| v.is_finite() && v.fract() != 0.0);
        let reason = if fractional { "must be a whole number" } else { "must be a valid number" };
        ValidationError::invalid(Field::Capacity, reason)
    })?;
    if value <= 0 {
        return Err(ValidationError::invalid(Field::Capacity, "must be a positive number"));
    }
    u32::try_from(value)
        .map(Some)
        .map_err(|_| ValidationError::invalid(Field::Capacity, "is too large"))
}
