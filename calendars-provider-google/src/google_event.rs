//! Google Calendar's JSON event resource and its mapping to [`RemoteEvent`].
//!
//! Google stores the end of an all-day event as the day after it ends, the
//! core works with inclusive end dates. The conversions shift by one day.

use std::collections::BTreeMap;

use calendars_core::remote::event::{EventTime, RemoteEvent};
use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoogleEvent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default)]
    pub summary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<GoogleEventTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<GoogleEventTime>,
    #[serde(default, skip_serializing)]
    pub hangout_link: Option<String>,
    #[serde(default, skip_serializing)]
    pub conference_data: Option<ConferenceData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extended_properties: Option<ExtendedProperties>,
}

impl GoogleEvent {
    pub fn is_cancelled(&self) -> bool {
        self.status.as_deref() == Some("cancelled")
    }

    fn video_link(&self) -> Option<String> {
        self.hangout_link.clone().or_else(|| {
            self.conference_data.as_ref().and_then(|cd| {
                cd.entry_points
                    .iter()
                    .find(|ep| ep.entry_point_type == "video")
                    .map(|ep| ep.uri.clone())
            })
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoogleEventTime {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_time: Option<DateTime<FixedOffset>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConferenceData {
    #[serde(default)]
    pub entry_points: Vec<EntryPoint>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryPoint {
    #[serde(default)]
    pub entry_point_type: String,
    #[serde(default)]
    pub uri: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtendedProperties {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub private: BTreeMap<String, String>,
}

/// A page of `events.list` results.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventsPage {
    #[serde(default)]
    pub items: Vec<GoogleEvent>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

pub trait FromGoogle {
    fn from_google(event: GoogleEvent) -> Self;
}

pub trait ToGoogle {
    fn to_google(&self) -> GoogleEvent;
}

impl FromGoogle for RemoteEvent {
    fn from_google(event: GoogleEvent) -> Self {
        let conference_link = event.video_link();
        let start = event.start.as_ref().and_then(time_from_google);
        let end = event.end.as_ref().and_then(time_from_google).map(|end| match (end, &start) {
            (EventTime::Date(end), Some(EventTime::Date(start))) => {
                EventTime::Date(end.pred_opt().unwrap_or(end).max(*start))
            }
            (EventTime::Date(end), _) => EventTime::Date(end.pred_opt().unwrap_or(end)),
            (end, _) => end,
        });

        RemoteEvent {
            id: event.id,
            summary: event.summary,
            description: event.description,
            location: event.location.filter(|l| !l.is_empty()),
            start,
            end,
            conference_link,
            private_properties: event
                .extended_properties
                .map(|props| props.private)
                .unwrap_or_default(),
        }
    }
}

impl ToGoogle for RemoteEvent {
    fn to_google(&self) -> GoogleEvent {
        let end = self.end.as_ref().map(|end| match end {
            EventTime::Date(date) => GoogleEventTime {
                date: Some(date.succ_opt().unwrap_or(*date)),
                ..Default::default()
            },
            other => time_to_google(other),
        });

        let extended_properties = if self.private_properties.is_empty() {
            None
        } else {
            Some(ExtendedProperties {
                private: self.private_properties.clone(),
            })
        };

        GoogleEvent {
            id: None,
            status: None,
            summary: self.summary.clone(),
            description: self.description.clone(),
            location: self.location.clone(),
            start: self.start.as_ref().map(time_to_google),
            end,
            hangout_link: None,
            conference_data: None,
            extended_properties,
        }
    }
}

fn time_from_google(time: &GoogleEventTime) -> Option<EventTime> {
    if let Some(datetime) = time.date_time {
        Some(EventTime::DateTime {
            datetime,
            tzid: time.time_zone.clone(),
        })
    } else {
        time.date.map(EventTime::Date)
    }
}

fn time_to_google(time: &EventTime) -> GoogleEventTime {
    match time {
        EventTime::Date(date) => GoogleEventTime {
            date: Some(*date),
            ..Default::default()
        },
        EventTime::DateTime { datetime, tzid } => GoogleEventTime {
            date: None,
            date_time: Some(*datetime),
            time_zone: tzid.clone(),
        },
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_all_day_end_becomes_exclusive() {
        let event = RemoteEvent {
            summary: "Quarkus 3.17.0".into(),
            start: Some(EventTime::Date(date(2025, 11, 15))),
            end: Some(EventTime::Date(date(2025, 11, 15))),
            ..Default::default()
        };

        let google = event.to_google();
        assert_eq!(google.start.unwrap().date, Some(date(2025, 11, 15)));
        assert_eq!(google.end.unwrap().date, Some(date(2025, 11, 16)));
    }

    #[test]
    fn test_all_day_end_read_back_inclusive() {
        let json = serde_json::json!({
            "id": "abc",
            "status": "confirmed",
            "summary": "Quarkus 3.17.0",
            "start": { "date": "2025-11-15" },
            "end": { "date": "2025-11-16" },
            "extendedProperties": { "private": { "managedBy": "quarkus-calendars" } }
        });
        let google: GoogleEvent = serde_json::from_value(json).unwrap();
        let event = RemoteEvent::from_google(google);

        assert_eq!(event.id.as_deref(), Some("abc"));
        assert_eq!(event.start, Some(EventTime::Date(date(2025, 11, 15))));
        assert_eq!(event.end, Some(EventTime::Date(date(2025, 11, 15))));
        assert_eq!(
            event.private_properties.get("managedBy").map(String::as_str),
            Some("quarkus-calendars")
        );
        assert_eq!(event.description, None);
    }

    #[test]
    fn test_malformed_all_day_end_is_clamped_to_start() {
        let google = GoogleEvent {
            summary: "Odd".into(),
            start: Some(GoogleEventTime {
                date: Some(date(2025, 11, 15)),
                ..Default::default()
            }),
            end: Some(GoogleEventTime {
                date: Some(date(2025, 11, 15)),
                ..Default::default()
            }),
            ..Default::default()
        };
        let event = RemoteEvent::from_google(google);
        assert_eq!(event.end, Some(EventTime::Date(date(2025, 11, 15))));
    }

    #[test]
    fn test_timed_event_keeps_offset_and_zone() {
        let json = serde_json::json!({
            "id": "call-1",
            "summary": "Community call",
            "description": "",
            "start": { "dateTime": "2025-11-18T15:00:00+01:00", "timeZone": "Europe/Paris" },
            "end": { "dateTime": "2025-11-18T15:50:00+01:00", "timeZone": "Europe/Paris" },
            "hangoutLink": "https://meet.google.com/abc-defg-hij"
        });
        let event = RemoteEvent::from_google(serde_json::from_value(json).unwrap());

        assert_eq!(
            event.start.as_ref().and_then(EventTime::instant),
            Some(Utc.with_ymd_and_hms(2025, 11, 18, 14, 0, 0).unwrap())
        );
        assert_eq!(event.duration(), Some(chrono::Duration::minutes(50)));
        // An empty description is kept as-is, not dropped.
        assert_eq!(event.description.as_deref(), Some(""));
        assert_eq!(
            event.conference_link.as_deref(),
            Some("https://meet.google.com/abc-defg-hij")
        );
    }

    #[test]
    fn test_conference_entry_point_is_used_without_hangout_link() {
        let json = serde_json::json!({
            "summary": "Community call",
            "start": { "dateTime": "2025-11-18T14:00:00Z" },
            "conferenceData": {
                "entryPoints": [
                    { "entryPointType": "phone", "uri": "tel:+1-555" },
                    { "entryPointType": "video", "uri": "https://meet.google.com/xyz" }
                ]
            }
        });
        let event = RemoteEvent::from_google(serde_json::from_value(json).unwrap());
        assert_eq!(
            event.conference_link.as_deref(),
            Some("https://meet.google.com/xyz")
        );
    }

    #[test]
    fn test_missing_start_stays_missing() {
        let google: GoogleEvent =
            serde_json::from_value(serde_json::json!({ "summary": "Broken" })).unwrap();
        let event = RemoteEvent::from_google(google);
        assert!(event.start.is_none());
        assert!(event.date().is_err());
    }

    #[test]
    fn test_payload_omits_read_only_fields() {
        let event = RemoteEvent {
            id: Some("abc".into()),
            summary: "Community call".into(),
            description: Some("Agenda".into()),
            start: Some(EventTime::utc(
                Utc.with_ymd_and_hms(2025, 11, 18, 14, 0, 0).unwrap(),
            )),
            conference_link: Some("https://meet.google.com/xyz".into()),
            ..Default::default()
        };

        let json = serde_json::to_value(event.to_google()).unwrap();
        assert!(json.get("id").is_none());
        assert!(json.get("hangoutLink").is_none());
        assert!(json.get("extendedProperties").is_none());
        assert_eq!(json["start"]["timeZone"], "UTC");
        assert_eq!(json["description"], "Agenda");
    }
}
