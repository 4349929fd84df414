use std::collections::BTreeSet;

use chrono::Datelike;
use serde::Serialize;

use super::authoring::{EventStatus, NormalizedEvent};

/// Counters shown on the organizer/faculty dashboard header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_events: usize,
    pub active_events: usize,
    pub completed_events: usize,
    pub total_registrations: u64,
}

impl DashboardStats {
    pub fn from_events<'a, I>(events: I) -> Self
    where
        I: IntoIterator<Item = &'a NormalizedEvent>,
    {
        events.into_iter().fold(Self::default(), |mut stats, event| {
            stats.total_events += 1;
            match event.status {
                EventStatus::Active => stats.active_events += 1,
                EventStatus::Completed => stats.completed_events += 1,
            }
            stats.total_registrations += u64::from(event.total_participants);
            stats
        })
    }
}

/// `"12 / 40"`, or `"12 / ∞"` without a capacity.
pub fn capacity_label(event: &NormalizedEvent) -> String {
    match event.capacity {
        Some(capacity) => format!("{} / {}", event.total_participants, capacity),
        None => format!("{} / ∞", event.total_participants),
    }
}

/// Days of `year`-`month` that have at least one event (calendar markers).
pub fn event_days_in_month<'a, I>(events: I, year: i32, month: u32) -> BTreeSet<u32>
where
    I: IntoIterator<Item = &'a NormalizedEvent>,
{
    events
        .into_iter()
        .filter(|event| event.date.year() == year && event.date.month() == month)
        .map(|event| event.date.day())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::ManualClock;
    use crate::events::{validate_event_submission, EventForm};
    use chrono::{TimeZone, Utc};

    fn event(date: &str, capacity: &str) -> NormalizedEvent {
        let clock = ManualClock::new(Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap());
        let form = EventForm {
            title: "Talk".to_string(),
            date: date.to_string(),
            time: "09:00".to_string(),
            location: "Room 1".to_string(),
            capacity: capacity.to_string(),
            ..EventForm::default()
        };
        validate_event_submission(&form, &clock).unwrap()
    }

    #[test]
    fn test_stats_count_status_and_participants() {
        let mut done = event("2026-02-01", "");
        done.status = EventStatus::Completed;
        done.total_participants = 7;
        let mut live = event("2026-02-02", "10");
        live.total_participants = 3;
        let events = vec![done, live, event("2026-02-03", "")];

        let stats = DashboardStats::from_events(&events);

        assert_eq!(
            stats,
            DashboardStats {
                total_events: 3,
                active_events: 2,
                completed_events: 1,
                total_registrations: 10,
            }
        );
        assert_eq!(DashboardStats::from_events(&Vec::<NormalizedEvent>::new()), DashboardStats::default());
    }

    #[test]
    fn test_capacity_label() {
        let mut limited = event("2026-02-01", "40");
        limited.total_participants = 12;
        assert_eq!(capacity_label(&limited), "12 / 40");
        assert_eq!(capacity_label(&event("2026-02-01", "")), "0 / ∞");
    }

    #[test]
    fn test_event_days_in_month() {
        let events = vec![
            event("2026-02-14", ""),
            event("2026-02-03", ""),
            event("2026-02-14", ""),
            event("2026-03-14", ""),
        ];

        let days = event_days_in_month(&events, 2026, 2);
        assert_eq!(days.into_iter().collect::<Vec<_>>(), vec![3, 14]);
        assert!(event_days_in_month(&events, 2025, 2).is_empty());
    }
}
