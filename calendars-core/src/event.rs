//! Locally declared events.
//!
//! Every event lives in its own YAML file and is one of two kinds: a release,
//! which covers a whole day, or a call, which is time-boxed in UTC. Files
//! deserialize into an [`EventDraft`] carrying every field either kind could
//! use. Validation turns a draft into a [`LocalEvent`] that only holds the
//! fields relevant to its kind.

use std::fmt;

use chrono::{Duration, NaiveDate, NaiveTime};
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Length of a call when its file does not say otherwise.
pub const DEFAULT_CALL_MINUTES: i64 = 50;

pub fn default_call_duration() -> Duration {
    Duration::minutes(DEFAULT_CALL_MINUTES)
}

/// The two kinds of events, each reconciled against its own calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Release,
    Call,
}

impl EventKind {
    pub const ALL: [EventKind; 2] = [EventKind::Release, EventKind::Call];

    /// Name of the calendar holding this kind ("Releases", "Calls").
    pub fn calendar_label(&self) -> &'static str {
        match self {
            EventKind::Release => "Releases",
            EventKind::Call => "Calls",
        }
    }

    fn event_label(&self) -> &'static str {
        match self {
            EventKind::Release => "Release event",
            EventKind::Call => "Call event",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventKind::Release => write!(f, "release"),
            EventKind::Call => write!(f, "call"),
        }
    }
}

/// The first invariant a draft violates.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{} must have a title", .0.event_label())]
    MissingTitle(EventKind),

    #[error("{} must have a date", .0.event_label())]
    MissingDate(EventKind),

    #[error("Release events must be all-day events (allDay field should not be set)")]
    ReleaseNotAllDay,

    #[error("Release events cannot have a description")]
    ReleaseWithDescription,

    #[error("Release events cannot have a call link")]
    ReleaseWithLink,

    #[error("Release events cannot have a time (all-day only)")]
    ReleaseWithTime,

    #[error("Release events cannot have a duration (all-day only)")]
    ReleaseWithDuration,

    #[error("Call events cannot be all-day events (allDay field should not be set)")]
    CallAllDay,

    #[error("Call events must have a description")]
    CallWithoutDescription,

    #[error("Call events must have a call link")]
    CallWithoutLink,

    #[error("Call events must have a time (in UTC)")]
    CallWithoutTime,
}

/// An event as written in a YAML file, before validation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct EventDraft {
    #[serde(rename = "type")]
    pub kind: EventKind,
    pub title: Option<String>,
    pub description: Option<String>,
    pub date: Option<NaiveDate>,
    pub all_day: Option<bool>,
    #[serde(default, deserialize_with = "de::time")]
    pub time: Option<NaiveTime>,
    #[serde(default, deserialize_with = "de::duration")]
    pub duration: Option<Duration>,
    pub call_link: Option<String>,
}

impl EventDraft {
    fn empty(kind: EventKind) -> Self {
        EventDraft {
            kind,
            title: None,
            description: None,
            date: None,
            all_day: None,
            time: None,
            duration: None,
            call_link: None,
        }
    }

    pub fn release(title: impl Into<String>, date: NaiveDate) -> Self {
        EventDraft {
            title: Some(title.into()),
            date: Some(date),
            ..Self::empty(EventKind::Release)
        }
    }

    pub fn call(
        title: impl Into<String>,
        description: impl Into<String>,
        date: NaiveDate,
        time: NaiveTime,
        call_link: impl Into<String>,
    ) -> Self {
        EventDraft {
            title: Some(title.into()),
            description: Some(description.into()),
            date: Some(date),
            time: Some(time),
            call_link: Some(call_link.into()),
            ..Self::empty(EventKind::Call)
        }
    }

    /// Check the invariants of the draft's kind, stopping at the first one violated.
    ///
    /// Safe to call repeatedly. The only change it makes is giving a call
    /// without a duration the default one.
    pub fn validate(&mut self) -> Result<(), ValidationError> {
        let kind = self.kind;

        if is_blank(&self.title) {
            return Err(ValidationError::MissingTitle(kind));
        }
        if self.date.is_none() {
            return Err(ValidationError::MissingDate(kind));
        }

        match kind {
            EventKind::Release => {
                if self.all_day == Some(false) {
                    return Err(ValidationError::ReleaseNotAllDay);
                }
                if !is_blank(&self.description) {
                    return Err(ValidationError::ReleaseWithDescription);
                }
                if !is_blank(&self.call_link) {
                    return Err(ValidationError::ReleaseWithLink);
                }
                if self.time.is_some() {
                    return Err(ValidationError::ReleaseWithTime);
                }
                if self.duration.is_some() {
                    return Err(ValidationError::ReleaseWithDuration);
                }
            }
            EventKind::Call => {
                if self.all_day == Some(true) {
                    return Err(ValidationError::CallAllDay);
                }
                if is_blank(&self.description) {
                    return Err(ValidationError::CallWithoutDescription);
                }
                if is_blank(&self.call_link) {
                    return Err(ValidationError::CallWithoutLink);
                }
                if self.time.is_none() {
                    return Err(ValidationError::CallWithoutTime);
                }
                if self.duration.is_none() {
                    self.duration = Some(default_call_duration());
                }
            }
        }

        Ok(())
    }

    /// Validate the draft and keep only the fields its kind carries.
    pub fn into_event(mut self) -> Result<LocalEvent, ValidationError> {
        self.validate()?;

        let kind = self.kind;
        let title = self.title.ok_or(ValidationError::MissingTitle(kind))?;
        let date = self.date.ok_or(ValidationError::MissingDate(kind))?;

        let event = match kind {
            EventKind::Release => LocalEvent::SingleDay(SingleDayEvent { title, date }),
            EventKind::Call => LocalEvent::Timed(TimedEvent {
                title,
                date,
                description: self
                    .description
                    .ok_or(ValidationError::CallWithoutDescription)?,
                link: self.call_link.ok_or(ValidationError::CallWithoutLink)?,
                time: self.time.ok_or(ValidationError::CallWithoutTime)?,
                duration: self.duration.unwrap_or_else(default_call_duration),
            }),
        };

        Ok(event)
    }
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().is_none_or(|s| s.trim().is_empty())
}

/// A whole-day event (a release). Always all-day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SingleDayEvent {
    pub title: String,
    pub date: NaiveDate,
}

impl SingleDayEvent {
    pub fn new(title: impl Into<String>, date: NaiveDate) -> Self {
        SingleDayEvent {
            title: title.into(),
            date,
        }
    }
}

/// A time-boxed event (a call). Times are UTC.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimedEvent {
    pub title: String,
    pub date: NaiveDate,
    pub description: String,
    pub link: String,
    pub time: NaiveTime,
    pub duration: Duration,
}

impl TimedEvent {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        date: NaiveDate,
        time: NaiveTime,
        link: impl Into<String>,
    ) -> Self {
        TimedEvent {
            title: title.into(),
            date,
            description: description.into(),
            link: link.into(),
            time,
            duration: default_call_duration(),
        }
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }
}

/// A validated local event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocalEvent {
    SingleDay(SingleDayEvent),
    Timed(TimedEvent),
}

impl LocalEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            LocalEvent::SingleDay(_) => EventKind::Release,
            LocalEvent::Timed(_) => EventKind::Call,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            LocalEvent::SingleDay(e) => &e.title,
            LocalEvent::Timed(e) => &e.title,
        }
    }

    pub fn date(&self) -> NaiveDate {
        match self {
            LocalEvent::SingleDay(e) => e.date,
            LocalEvent::Timed(e) => e.date,
        }
    }

    pub fn description(&self) -> Option<&str> {
        match self {
            LocalEvent::SingleDay(_) => None,
            LocalEvent::Timed(e) => Some(&e.description),
        }
    }

    pub fn link(&self) -> Option<&str> {
        match self {
            LocalEvent::SingleDay(_) => None,
            LocalEvent::Timed(e) => Some(&e.link),
        }
    }

    pub fn is_all_day(&self) -> bool {
        matches!(self, LocalEvent::SingleDay(_))
    }

    pub fn key(&self) -> EventKey {
        EventKey::new(self.title(), self.date())
    }
}

impl fmt::Display for LocalEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title())
    }
}

impl From<SingleDayEvent> for LocalEvent {
    fn from(event: SingleDayEvent) -> Self {
        LocalEvent::SingleDay(event)
    }
}

impl From<TimedEvent> for LocalEvent {
    fn from(event: TimedEvent) -> Self {
        LocalEvent::Timed(event)
    }
}

/// The `(title, date)` pair pairing a local event with a remote one.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EventKey {
    pub title: String,
    pub date: NaiveDate,
}

impl EventKey {
    pub fn new(title: impl Into<String>, date: NaiveDate) -> Self {
        EventKey {
            title: title.into(),
            date,
        }
    }
}

impl fmt::Display for EventKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}|{}", self.title, self.date)
    }
}

mod de {
    use super::*;
    use serde::de::Error;

    /// Accepts `HH:MM` as well as `HH:MM:SS`.
    pub fn time<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<NaiveTime>, D::Error> {
        let Some(raw) = Option::<String>::deserialize(deserializer)? else {
            return Ok(None);
        };

        NaiveTime::parse_from_str(&raw, "%H:%M:%S%.f")
            .or_else(|_| NaiveTime::parse_from_str(&raw, "%H:%M"))
            .map(Some)
            .map_err(|_| D::Error::custom(format!("invalid time '{raw}', expected HH:MM")))
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawDuration {
        Seconds(i64),
        Text(String),
    }

    /// Accepts ISO-8601 (`PT50M`), humantime (`50m`, `1h 30m`) or plain seconds.
    pub fn duration<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Duration>, D::Error> {
        let Some(raw) = Option::<RawDuration>::deserialize(deserializer)? else {
            return Ok(None);
        };

        match raw {
            RawDuration::Seconds(secs) => Ok(Some(Duration::seconds(secs))),
            RawDuration::Text(text) => parse_duration(&text)
                .map(Some)
                .ok_or_else(|| D::Error::custom(format!("invalid duration '{text}'"))),
        }
    }

    pub(super) fn parse_duration(text: &str) -> Option<Duration> {
        let std_duration: std::time::Duration = match iso8601::duration(text) {
            Ok(iso) => iso.into(),
            Err(_) => humantime::parse_duration(text).ok()?,
        };
        Duration::from_std(std_duration).ok()
    }
}
