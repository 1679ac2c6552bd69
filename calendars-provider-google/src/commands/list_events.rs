use anyhow::{Context, Result};
use calendars_core::remote::event::RemoteEvent;
use calendars_core::remote::protocol::ListEvents;

use crate::commands::authed_api;
use crate::google_event::FromGoogle;

pub async fn handle(params: serde_json::Value) -> Result<serde_json::Value> {
    let params: ListEvents = serde_json::from_value(params).context("Invalid params")?;

    let api = authed_api(&params.remote_config).await?;
    let events: Vec<RemoteEvent> = api
        .list_events(&params.calendar_id, &params.from, &params.to, params.max_results)
        .await?
        .into_iter()
        .map(RemoteEvent::from_google)
        .collect();

    Ok(serde_json::to_value(events)?)
}
