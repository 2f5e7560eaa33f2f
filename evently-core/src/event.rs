//! Event types exchanged with the scheduling backend.
//!
//! `Event` is the server's representation and is treated as authoritative
//! whenever the backend returns one. `EventDraft` holds raw form input and
//! only becomes an `EventPayload` after passing validation.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// A scheduled event as returned by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub location: String,
    #[serde(rename = "startDate", with = "iso_millis")]
    pub start: DateTime<Utc>,
    #[serde(rename = "endDate", with = "iso_millis")]
    pub end: DateTime<Utc>,
    /// Email of the user who created the event
    pub creator: String,
    /// Emails of invited participants
    #[serde(default)]
    pub participants: Vec<String>,
}

impl Event {
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Whether `email` is allowed to edit, delete or reschedule this event.
    pub fn is_created_by(&self, email: &str) -> bool {
        self.creator == email
    }

    /// Whether the event overlaps the half-open interval `[from, to)`.
    pub fn overlaps(&self, from: DateTime<Utc>, to: DateTime<Utc>) -> bool {
        self.start < to && self.end > from
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title)
    }
}

/// Normalized request body for create and update calls.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventPayload {
    pub title: String,
    pub description: String,
    pub category: String,
    pub location: String,
    #[serde(with = "iso_millis")]
    pub start_date: DateTime<Utc>,
    #[serde(with = "iso_millis")]
    pub end_date: DateTime<Utc>,
    pub participants: Vec<String>,
}

impl From<&Event> for EventPayload {
    fn from(event: &Event) -> Self {
        EventPayload {
            title: event.title.clone(),
            description: event.description.clone(),
            category: event.category.clone(),
            location: event.location.clone(),
            start_date: event.start,
            end_date: event.end,
            participants: event.participants.clone(),
        }
    }
}

/// Raw, unvalidated form input for the create and update panels.
#[derive(Debug, Clone, PartialEq)]
pub struct EventDraft {
    pub title: String,
    pub description: String,
    pub category: String,
    pub location: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// Comma-separated participant emails, as typed
    pub participants: String,
}

impl EventDraft {
    /// Empty draft for a newly selected calendar slot, one hour long.
    pub fn for_slot(slot_start: DateTime<Utc>) -> Self {
        EventDraft {
            title: String::new(),
            description: String::new(),
            category: String::new(),
            location: String::new(),
            start: slot_start,
            end: slot_start + Duration::hours(1),
            participants: String::new(),
        }
    }

    /// Draft prefilled from an existing event, for the update panel.
    pub fn from_event(event: &Event) -> Self {
        EventDraft {
            title: event.title.clone(),
            description: event.description.clone(),
            category: event.category.clone(),
            location: event.location.clone(),
            start: event.start,
            end: event.end,
            participants: event.participants.join(", "),
        }
    }
}

/// Serde helpers for ISO-8601 UTC timestamps with millisecond precision,
/// e.g. `2024-01-10T09:00:00.000Z`.
pub mod iso_millis {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

    pub fn format(dt: &DateTime<Utc>) -> String {
        dt.format(FORMAT).to_string()
    }

    pub fn serialize<S: Serializer>(dt: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format(dt))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&s)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const STANDUP: &str = r#"{
        "_id": "e1",
        "title": "Standup",
        "startDate": "2024-01-10T09:00:00.000Z",
        "endDate": "2024-01-10T09:15:00.000Z",
        "creator": "a@x.com",
        "participants": ["b@x.com"]
    }"#;

    #[test]
    fn parses_server_event_with_missing_optional_fields() {
        let event: Event = serde_json::from_str(STANDUP).unwrap();
        assert_eq!(event.id, "e1");
        assert_eq!(event.start, Utc.with_ymd_and_hms(2024, 1, 10, 9, 0, 0).unwrap());
        assert_eq!(event.duration(), Duration::minutes(15));
        assert_eq!(event.description, "");
        assert_eq!(event.participants, vec!["b@x.com".to_string()]);
    }

    #[test]
    fn accepts_plain_id_field() {
        let json = STANDUP.replace("\"_id\"", "\"id\"");
        let event: Event = serde_json::from_str(&json).unwrap();
        assert_eq!(event.id, "e1");
    }

    #[test]
    fn accepts_offset_timestamps() {
        let json = STANDUP.replace("2024-01-10T09:00:00.000Z", "2024-01-10T10:00:00+01:00");
        let event: Event = serde_json::from_str(&json).unwrap();
        assert_eq!(event.start, Utc.with_ymd_and_hms(2024, 1, 10, 9, 0, 0).unwrap());
    }

    #[test]
    fn payload_serializes_millisecond_utc() {
        let event: Event = serde_json::from_str(STANDUP).unwrap();
        let value = serde_json::to_value(EventPayload::from(&event)).unwrap();
        assert_eq!(value["startDate"], "2024-01-10T09:00:00.000Z");
        assert_eq!(value["endDate"], "2024-01-10T09:15:00.000Z");
        assert_eq!(value["participants"][0], "b@x.com");
        assert!(value.get("creator").is_none());
    }

    #[test]
    fn overlap_is_half_open() {
        let event: Event = serde_json::from_str(STANDUP).unwrap();
        let nine_fifteen = Utc.with_ymd_and_hms(2024, 1, 10, 9, 15, 0).unwrap();
        assert!(!event.overlaps(nine_fifteen, nine_fifteen + Duration::hours(1)));
        assert!(event.overlaps(nine_fifteen - Duration::minutes(1), nine_fifteen));
    }

    #[test]
    fn draft_from_event_joins_participants() {
        let mut event: Event = serde_json::from_str(STANDUP).unwrap();
        event.participants.push("c@x.com".into());
        let draft = EventDraft::from_event(&event);
        assert_eq!(draft.participants, "b@x.com, c@x.com");
        assert_eq!(draft.end, event.end);
    }
}
