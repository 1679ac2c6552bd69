use anyhow::{Context, Result};
use calendars_core::remote::protocol::CreateEvent;

use crate::commands::authed_api;
use crate::google_event::ToGoogle;

pub async fn handle(params: serde_json::Value) -> Result<serde_json::Value> {
    let params: CreateEvent = serde_json::from_value(params).context("Invalid params")?;

    let api = authed_api(&params.remote_config).await?;
    let id = api
        .insert_event(&params.calendar_id, &params.event.to_google())
        .await?;

    tracing::info!(event_id = %id, title = %params.event.summary, "Created event");
    Ok(serde_json::Value::String(id))
}
