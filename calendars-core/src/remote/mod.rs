pub mod event;
pub mod protocol;
pub mod provider;

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::date_range::DateRange;
use crate::error::CalendarsResult;
use crate::remote::event::RemoteEvent;
use crate::remote::protocol::{CreateEvent, DeleteEvent, ListEvents, UpdateEvent};
use crate::remote::provider::Provider;

/// The four operations reconciliation needs from a remote calendar store.
pub trait CalendarClient {
    /// Events of `calendar_id` around `range`, at most `max_results` of them.
    fn list_events(
        &self,
        calendar_id: &str,
        range: &DateRange,
        max_results: u32,
    ) -> impl Future<Output = CalendarsResult<Vec<RemoteEvent>>>;

    /// Insert `event`, returning the identifier the store assigned.
    fn create_event(
        &self,
        calendar_id: &str,
        event: &RemoteEvent,
    ) -> impl Future<Output = CalendarsResult<String>>;

    fn update_event(
        &self,
        calendar_id: &str,
        event_id: &str,
        event: &RemoteEvent,
    ) -> impl Future<Output = CalendarsResult<()>>;

    fn delete_event(
        &self,
        calendar_id: &str,
        event_id: &str,
    ) -> impl Future<Output = CalendarsResult<()>>;
}

/// Remote provider configuration (the `[remote]` section).
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct RemoteSettings {
    pub provider: Provider,
    /// Provider-specific keys, forwarded verbatim.
    #[serde(flatten)]
    pub config: serde_json::Map<String, serde_json::Value>,
}

impl Default for RemoteSettings {
    fn default() -> Self {
        RemoteSettings {
            provider: Provider::from_name("google"),
            config: serde_json::Map::new(),
        }
    }
}

/// A [`CalendarClient`] backed by a provider binary.
#[derive(Debug, Clone)]
pub struct RemoteCalendar {
    settings: RemoteSettings,
}

impl RemoteCalendar {
    pub fn new(settings: RemoteSettings) -> Self {
        RemoteCalendar { settings }
    }

    pub fn provider(&self) -> &Provider {
        &self.settings.provider
    }

    fn remote_config(&self) -> serde_json::Map<String, serde_json::Value> {
        self.settings.config.clone()
    }
}

impl CalendarClient for RemoteCalendar {
    async fn list_events(
        &self,
        calendar_id: &str,
        range: &DateRange,
        max_results: u32,
    ) -> CalendarsResult<Vec<RemoteEvent>> {
        self.settings
            .provider
            .call(ListEvents {
                remote_config: self.remote_config(),
                calendar_id: calendar_id.to_string(),
                from: range.query_from_rfc3339(),
                to: range.query_to_rfc3339(),
                max_results,
            })
            .await
    }

    async fn create_event(&self, calendar_id: &str, event: &RemoteEvent) -> CalendarsResult<String> {
        self.settings
            .provider
            .call(CreateEvent {
                remote_config: self.remote_config(),
                calendar_id: calendar_id.to_string(),
                event: event.clone(),
            })
            .await
    }

    async fn update_event(
        &self,
        calendar_id: &str,
        event_id: &str,
        event: &RemoteEvent,
    ) -> CalendarsResult<()> {
        self.settings
            .provider
            .call(UpdateEvent {
                remote_config: self.remote_config(),
                calendar_id: calendar_id.to_string(),
                event_id: event_id.to_string(),
                event: event.clone(),
            })
            .await
    }

    async fn delete_event(&self, calendar_id: &str, event_id: &str) -> CalendarsResult<()> {
        self.settings
            .provider
            .call(DeleteEvent {
                remote_config: self.remote_config(),
                calendar_id: calendar_id.to_string(),
                event_id: event_id.to_string(),
            })
            .await
    }
}
