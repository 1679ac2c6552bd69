use anyhow::{Context, Result};
use calendars_core::remote::protocol::UpdateEvent;

use crate::commands::authed_api;
use crate::google_event::ToGoogle;

pub async fn handle(params: serde_json::Value) -> Result<serde_json::Value> {
    let params: UpdateEvent = serde_json::from_value(params).context("Invalid params")?;

    let api = authed_api(&params.remote_config).await?;
    api.update_event(&params.calendar_id, &params.event_id, &params.event.to_google())
        .await?;

    Ok(serde_json::Value::Null)
}
