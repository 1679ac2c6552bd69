//! Provider-neutral view of an event stored in a remote calendar.
//!
//! Providers translate their native representation into [`RemoteEvent`]
//! before handing it to the core, and back again when the core asks them to
//! write one. The same type serves as the payload for inserts and updates.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CalendarsError, CalendarsResult};

/// Start or end of a remote event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventTime {
    /// Whole day. For the end of an event the date is inclusive.
    Date(NaiveDate),
    /// An instant with the offset it was stored at.
    DateTime {
        datetime: DateTime<FixedOffset>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        tzid: Option<String>,
    },
}

impl EventTime {
    pub fn utc(datetime: DateTime<Utc>) -> Self {
        EventTime::DateTime {
            datetime: datetime.fixed_offset(),
            tzid: Some("UTC".to_string()),
        }
    }

    /// Calendar date as seen at the event's own offset.
    pub fn date(&self) -> NaiveDate {
        match self {
            EventTime::Date(date) => *date,
            EventTime::DateTime { datetime, .. } => datetime.date_naive(),
        }
    }

    pub fn instant(&self) -> Option<DateTime<Utc>> {
        match self {
            EventTime::Date(_) => None,
            EventTime::DateTime { datetime, .. } => Some(datetime.with_timezone(&Utc)),
        }
    }
}

/// Private key/value tag marking the events this tool owns.
///
/// Only events carrying the marker are ever deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OwnershipMarker {
    pub key: String,
    pub value: String,
}

impl Default for OwnershipMarker {
    fn default() -> Self {
        OwnershipMarker {
            key: "managedBy".to_string(),
            value: "quarkus-calendars".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteEvent {
    /// Assigned by the remote store. `None` for payloads not yet created.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub summary: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default)]
    pub start: Option<EventTime>,
    #[serde(default)]
    pub end: Option<EventTime>,
    /// Dedicated video-conference link (e.g. a Meet link).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conference_link: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub private_properties: BTreeMap<String, String>,
}

impl RemoteEvent {
    pub fn title(&self) -> &str {
        &self.summary
    }

    /// Date the event starts on. Fails for events without a start.
    pub fn date(&self) -> CalendarsResult<NaiveDate> {
        self.start
            .as_ref()
            .map(EventTime::date)
            .ok_or_else(|| CalendarsError::MissingRemoteDate(self.summary.clone()))
    }

    /// Start time of day in UTC, for timed events only.
    pub fn start_time_utc(&self) -> Option<NaiveTime> {
        self.start
            .as_ref()
            .and_then(EventTime::instant)
            .map(|start| start.time())
    }

    /// `end - start`, for timed events only.
    pub fn duration(&self) -> Option<Duration> {
        let start = self.start.as_ref()?.instant()?;
        let end = self.end.as_ref()?.instant()?;
        Some(end - start)
    }

    /// The event's link: the conference link, else the first URL in the
    /// description, else the location when it is itself a URL.
    pub fn link(&self) -> Option<&str> {
        if let Some(link) = self.conference_link.as_deref() {
            return Some(link);
        }

        if let Some(url) = self
            .description
            .as_deref()
            .and_then(|d| d.split_whitespace().find(|token| is_url(token)))
        {
            return Some(url);
        }

        self.location.as_deref().filter(|location| is_url(location))
    }

    pub fn is_managed_by(&self, marker: &OwnershipMarker) -> bool {
        self.private_properties.get(&marker.key) == Some(&marker.value)
    }
}

fn is_url(s: &str) -> bool {
    s.starts_with("http://") || s.starts_with("https://")
}
