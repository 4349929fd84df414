use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Field, ValidationError};

/// Glyph shown before any category has been chosen.
pub const DEFAULT_GLYPH: &str = "📌";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum EventCategory {
    #[default]
    Workshop,
    Seminar,
    Competition,
    Conference,
    Hackathon,
    Webinar,
    #[serde(rename = "Cultural Event")]
    CulturalEvent,
    #[serde(rename = "Sports Event")]
    SportsEvent,
    Training,
    Lecture,
    #[serde(rename = "Panel Discussion")]
    PanelDiscussion,
    #[serde(rename = "Networking Event")]
    NetworkingEvent,
}

impl EventCategory {
    const ALL: [EventCategory; 12] = [
        EventCategory::Workshop,
        EventCategory::Seminar,
        EventCategory::Competition,
        EventCategory::Conference,
        EventCategory::Hackathon,
        EventCategory::Webinar,
        EventCategory::CulturalEvent,
        EventCategory::SportsEvent,
        EventCategory::Training,
        EventCategory::Lecture,
        EventCategory::PanelDiscussion,
        EventCategory::NetworkingEvent,
    ];

    pub fn all() -> &'static [EventCategory] {
        &Self::ALL
    }

    pub fn label(&self) -> &'static str {
        match self {
            EventCategory::Workshop => "Workshop",
            EventCategory::Seminar => "Seminar",
            EventCategory::Competition => "Competition",
            EventCategory::Conference => "Conference",
            EventCategory::Hackathon => "Hackathon",
            EventCategory::Webinar => "Webinar",
            EventCategory::CulturalEvent => "Cultural Event",
            EventCategory::SportsEvent => "Sports Event",
            EventCategory::Training => "Training",
            EventCategory::Lecture => "Lecture",
            EventCategory::PanelDiscussion => "Panel Discussion",
            EventCategory::NetworkingEvent => "Networking Event",
        }
    }

    pub fn glyph(&self) -> &'static str {
        match self {
            EventCategory::Workshop => "🛠️",
            EventCategory::Seminar => "📚",
            EventCategory::Competition => "🏆",
            EventCategory::Conference => "🎤",
            EventCategory::Hackathon => "💻",
            EventCategory::Webinar => "📹",
            EventCategory::CulturalEvent => "🎭",
            EventCategory::SportsEvent => "⚽",
            EventCategory::Training => "🎓",
            EventCategory::Lecture => "👨‍🏫",
            EventCategory::PanelDiscussion => "🗣️",
            EventCategory::NetworkingEvent => "🤝",
        }
    }

    /// Reverse of [`EventCategory::glyph`].
    pub fn from_glyph(glyph: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|category| category.glyph() == glyph)
    }
}

impl fmt::Display for EventCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for EventCategory {
    type Err = ValidationError;

    /// Case-insensitive; `-` and `_` count as spaces (`panel-discussion`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted: String = s
            .trim()
            .chars()
            .map(|c| if c == '-' || c == '_' { ' ' } else { c })
            .collect();

        Self::ALL
            .into_iter()
            .find(|category| category.label().eq_ignore_ascii_case(&wanted))
            .ok_or_else(|| ValidationError::invalid(Field::Category, format!("unknown category '{}'", s.trim())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_glyph_lookup_is_bidirectional() {
        for category in EventCategory::all() {
            assert_eq!(EventCategory::from_glyph(category.glyph()), Some(*category));
        }
        assert_eq!(EventCategory::from_glyph(DEFAULT_GLYPH), None);
    }

    #[test]
    fn test_twelve_distinct_glyphs() {
        let glyphs: std::collections::HashSet<_> =
            EventCategory::all().iter().map(|c| c.glyph()).collect();
        assert_eq!(glyphs.len(), 12);
    }

    #[test]
    fn test_parse_accepts_label_variants() {
        assert_eq!("Workshop".parse::<EventCategory>().unwrap(), EventCategory::Workshop);
        assert_eq!(
            "panel-discussion".parse::<EventCategory>().unwrap(),
            EventCategory::PanelDiscussion
        );
        assert_eq!(
            " sports_event ".parse::<EventCategory>().unwrap(),
            EventCategory::SportsEvent
        );
    }

    #[test]
    fn test_parse_unknown_names_category_field() {
        let err = "Picnic".parse::<EventCategory>().unwrap_err();
        assert_eq!(err.field(), Field::Category);
    }

    #[test]
    fn test_serializes_as_label() {
        assert_eq!(
            serde_json::to_string(&EventCategory::CulturalEvent).unwrap(),
            "\"Cultural Event\""
        );
    }
}
