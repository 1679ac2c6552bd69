//! Translation of local events into the records written to the remote calendar.

use std::collections::BTreeMap;

use crate::event::{LocalEvent, SingleDayEvent, TimedEvent};
use crate::remote::event::{EventTime, OwnershipMarker, RemoteEvent};

/// Separator placed between a call's description and its link.
pub const JOIN_PREFIX: &str = "\n\nJoin: ";

/// Build the remote record for a local event, tagged with `marker`.
pub trait ToRemote {
    fn to_remote(&self, marker: &OwnershipMarker) -> RemoteEvent;
}

fn ownership_properties(marker: &OwnershipMarker) -> BTreeMap<String, String> {
    BTreeMap::from([(marker.key.clone(), marker.value.clone())])
}

/// Description as stored remotely for a call with the given link.
pub fn description_with_link(description: Option<&str>, link: &str) -> String {
    format!("{}{JOIN_PREFIX}{link}", description.unwrap_or_default())
}

impl ToRemote for SingleDayEvent {
    fn to_remote(&self, marker: &OwnershipMarker) -> RemoteEvent {
        RemoteEvent {
            summary: self.title.clone(),
            description: None,
            start: Some(EventTime::Date(self.date)),
            end: Some(EventTime::Date(self.date)),
            private_properties: ownership_properties(marker),
            ..Default::default()
        }
    }
}

impl ToRemote for TimedEvent {
    fn to_remote(&self, marker: &OwnershipMarker) -> RemoteEvent {
        let start = self.date.and_time(self.time).and_utc();
        let end = start + self.duration;

        RemoteEvent {
            summary: self.title.clone(),
            description: Some(description_with_link(Some(&self.description), &self.link)),
            start: Some(EventTime::utc(start)),
            end: Some(EventTime::utc(end)),
            private_properties: ownership_properties(marker),
            ..Default::default()
        }
    }
}

impl ToRemote for LocalEvent {
    fn to_remote(&self, marker: &OwnershipMarker) -> RemoteEvent {
        match self {
            LocalEvent::SingleDay(event) => event.to_remote(marker),
            LocalEvent::Timed(event) => event.to_remote(marker),
        }
    }
}
