//! Thin client for the Google Calendar v3 REST API.

use anyhow::{Context, Result, anyhow, bail};
use reqwest::{RequestBuilder, StatusCode};
use url::Url;

use crate::google_event::{EventsPage, GoogleEvent};

pub const BASE_URL: &str = "https://www.googleapis.com/calendar/v3";

/// Google's cap on `maxResults` for a single page.
const MAX_PAGE_SIZE: u32 = 2500;

pub struct GoogleCalendarApi {
    http: reqwest::Client,
    base_url: Url,
    access_token: String,
}

impl GoogleCalendarApi {
    pub fn new(http: reqwest::Client, access_token: String) -> Result<Self> {
        Self::with_base_url(http, BASE_URL, access_token)
    }

    pub fn with_base_url(http: reqwest::Client, base_url: &str, access_token: String) -> Result<Self> {
        let base_url =
            Url::parse(base_url).with_context(|| format!("Invalid API base URL: {base_url}"))?;
        Ok(GoogleCalendarApi {
            http,
            base_url,
            access_token,
        })
    }

    /// Events between `time_min` and `time_max` (RFC 3339), expanded to single
    /// instances and ordered by start. Times come back in UTC so timed events
    /// keep the date they were written with. Cancelled events are skipped.
    pub async fn list_events(
        &self,
        calendar_id: &str,
        time_min: &str,
        time_max: &str,
        max_results: u32,
    ) -> Result<Vec<GoogleEvent>> {
        let limit = max_results as usize;
        let page_size = max_results.clamp(1, MAX_PAGE_SIZE).to_string();
        let mut events = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut url = self.events_url(calendar_id, None)?;
            {
                let mut query = url.query_pairs_mut();
                query
                    .append_pair("timeMin", time_min)
                    .append_pair("timeMax", time_max)
                    .append_pair("singleEvents", "true")
                    .append_pair("orderBy", "startTime")
                    .append_pair("timeZone", "UTC")
                    .append_pair("maxResults", &page_size);
                if let Some(token) = &page_token {
                    query.append_pair("pageToken", token);
                }
            }

            let page: EventsPage = self
                .send(self.http.get(url))
                .await
                .context("Failed to fetch events")?
                .json()
                .await
                .context("Failed to parse events page")?;

            events.extend(page.items.into_iter().filter(|e| !e.is_cancelled()));

            if events.len() >= limit {
                events.truncate(limit);
                break;
            }
            match page.next_page_token {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        tracing::debug!(calendar_id, count = events.len(), "Listed events");
        Ok(events)
    }

    /// Insert an event, returning the id Google assigned.
    pub async fn insert_event(&self, calendar_id: &str, event: &GoogleEvent) -> Result<String> {
        let url = self.events_url(calendar_id, None)?;
        let created: GoogleEvent = self
            .send(self.http.post(url).json(event))
            .await
            .with_context(|| format!("Failed to create event: {}", event.summary))?
            .json()
            .await
            .context("Failed to parse created event")?;

        created
            .id
            .ok_or_else(|| anyhow!("Google returned no id for event: {}", event.summary))
    }

    pub async fn update_event(
        &self,
        calendar_id: &str,
        event_id: &str,
        event: &GoogleEvent,
    ) -> Result<()> {
        let url = self.events_url(calendar_id, Some(event_id))?;
        self.send(self.http.put(url).json(event))
            .await
            .with_context(|| format!("Failed to update event: {event_id}"))?;
        Ok(())
    }

    /// Delete an event. An event that is already gone counts as deleted.
    pub async fn delete_event(&self, calendar_id: &str, event_id: &str) -> Result<()> {
        let url = self.events_url(calendar_id, Some(event_id))?;
        let response = self
            .http
            .delete(url)
            .bearer_auth(&self.access_token)
            .send()
            .await
            .with_context(|| format!("Failed to delete event: {event_id}"))?;

        if response.status() == StatusCode::GONE {
            tracing::debug!(event_id, "Event already deleted");
            return Ok(());
        }
        check(response)
            .await
            .with_context(|| format!("Failed to delete event: {event_id}"))?;
        Ok(())
    }

    fn events_url(&self, calendar_id: &str, event_id: Option<&str>) -> Result<Url> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| anyhow!("API base URL cannot have a path: {}", self.base_url))?;
            segments
                .pop_if_empty()
                .extend(["calendars", calendar_id, "events"]);
            if let Some(id) = event_id {
                segments.push(id);
            }
        }
        Ok(url)
    }

    async fn send(&self, request: RequestBuilder) -> Result<reqwest::Response> {
        let response = request.bearer_auth(&self.access_token).send().await?;
        check(response).await
    }
}

async fn check(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    bail!("Google Calendar API returned {}: {}", status, body)
}
