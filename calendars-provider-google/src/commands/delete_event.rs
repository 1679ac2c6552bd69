use anyhow::{Context, Result};
use calendars_core::remote::protocol::DeleteEvent;

use crate::commands::authed_api;

pub async fn handle(params: serde_json::Value) -> Result<serde_json::Value> {
    let params: DeleteEvent = serde_json::from_value(params).context("Invalid params")?;

    let api = authed_api(&params.remote_config).await?;
    api.delete_event(&params.calendar_id, &params.event_id).await?;

    Ok(serde_json::Value::Null)
}
