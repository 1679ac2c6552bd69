//! In-memory calendar used by the executor and reconciler tests.

use std::collections::HashSet;
use std::sync::Mutex;

use crate::date_range::DateRange;
use crate::error::{CalendarsError, CalendarsResult};
use crate::remote::CalendarClient;
use crate::remote::event::RemoteEvent;

#[derive(Default)]
struct State {
    events: Vec<(String, RemoteEvent)>,
    calls: Vec<String>,
    next_id: usize,
}

/// Events are stored per calendar id. Mutations whose event title is listed
/// in `failing_titles` are rejected.
#[derive(Default)]
pub struct FakeCalendar {
    state: Mutex<State>,
    failing_titles: HashSet<String>,
    fail_listing: bool,
}

impl FakeCalendar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_event(self, calendar_id: &str, event: RemoteEvent) -> Self {
        self.state
            .lock()
            .unwrap()
            .events
            .push((calendar_id.to_string(), event));
        self
    }

    pub fn failing_listing(mut self) -> Self {
        self.fail_listing = true;
        self
    }

    pub fn failing_on(mut self, title: &str) -> Self {
        self.failing_titles.insert(title.to_string());
        self
    }

    pub fn events(&self, calendar_id: &str) -> Vec<RemoteEvent> {
        self.state
            .lock()
            .unwrap()
            .events
            .iter()
            .filter(|(cal, _)| cal == calendar_id)
            .map(|(_, e)| e.clone())
            .collect()
    }

    /// Mutations performed so far, as `"create <title>"`, `"update <id>"`, ...
    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    fn reject_if_failing(&self, title: &str) -> CalendarsResult<()> {
        if self.failing_titles.contains(title) {
            return Err(CalendarsError::Provider(format!("rejected {title}")));
        }
        Ok(())
    }

    fn title_of(&self, event_id: &str) -> Option<String> {
        self.state
            .lock()
            .unwrap()
            .events
            .iter()
            .find(|(_, e)| e.id.as_deref() == Some(event_id))
            .map(|(_, e)| e.summary.clone())
    }
}

impl CalendarClient for FakeCalendar {
    async fn list_events(
        &self,
        calendar_id: &str,
        _range: &DateRange,
        max_results: u32,
    ) -> CalendarsResult<Vec<RemoteEvent>> {
        if self.fail_listing {
            return Err(CalendarsError::Provider("listing unavailable".into()));
        }
        let mut events = self.events(calendar_id);
        events.truncate(max_results as usize);
        Ok(events)
    }

    async fn create_event(&self, calendar_id: &str, event: &RemoteEvent) -> CalendarsResult<String> {
        self.reject_if_failing(&event.summary)?;

        let mut state = self.state.lock().unwrap();
        state.next_id += 1;
        let id = format!("evt-{}", state.next_id);
        let mut stored = event.clone();
        stored.id = Some(id.clone());
        state.events.push((calendar_id.to_string(), stored));
        state.calls.push(format!("create {}", event.summary));
        Ok(id)
    }

    async fn update_event(
        &self,
        _calendar_id: &str,
        event_id: &str,
        event: &RemoteEvent,
    ) -> CalendarsResult<()> {
        self.reject_if_failing(&event.summary)?;

        let mut state = self.state.lock().unwrap();
        let slot = state
            .events
            .iter_mut()
            .find(|(_, e)| e.id.as_deref() == Some(event_id))
            .ok_or_else(|| CalendarsError::Provider(format!("no event {event_id}")))?;
        slot.1 = RemoteEvent {
            id: Some(event_id.to_string()),
            ..event.clone()
        };
        state.calls.push(format!("update {event_id}"));
        Ok(())
    }

    async fn delete_event(&self, _calendar_id: &str, event_id: &str) -> CalendarsResult<()> {
        if let Some(title) = self.title_of(event_id) {
            self.reject_if_failing(&title)?;
        }

        let mut state = self.state.lock().unwrap();
        state
            .events
            .retain(|(_, e)| e.id.as_deref() != Some(event_id));
        state.calls.push(format!("delete {event_id}"));
        Ok(())
    }
}
