pub mod create_event;
pub mod delete_event;
pub mod list_events;
pub mod update_event;

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::api::GoogleCalendarApi;
use crate::app_config;
use crate::session::Session;

/// Keys this provider reads from the `[remote]` config section.
#[derive(Debug, Default, Deserialize)]
pub struct GoogleParams {
    #[serde(default)]
    pub google_credentials: Option<String>,
}

impl GoogleParams {
    pub fn from_remote_config(config: &serde_json::Map<String, serde_json::Value>) -> Result<Self> {
        serde_json::from_value(serde_json::Value::Object(config.clone()))
            .context("Invalid google provider config")
    }

    pub fn credentials_path(&self) -> Result<PathBuf> {
        match &self.google_credentials {
            Some(path) => Ok(PathBuf::from(shellexpand::tilde(path).as_ref())),
            None => app_config::default_credentials_path(),
        }
    }
}

pub async fn authed_api(
    remote_config: &serde_json::Map<String, serde_json::Value>,
) -> Result<GoogleCalendarApi> {
    let params = GoogleParams::from_remote_config(remote_config)?;
    let mut session = Session::load(&params.credentials_path()?)?;

    let http = reqwest::Client::new();
    let access_token = session.access_token(&http).await?;
    GoogleCalendarApi::new(http, access_token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_path_expands_home() {
        let mut config = serde_json::Map::new();
        config.insert("google_credentials".into(), "~/creds/google.json".into());
        config.insert("unrelated".into(), 42.into());

        let params = GoogleParams::from_remote_config(&config).unwrap();
        let path = params.credentials_path().unwrap();
        assert!(!path.starts_with("~"));
        assert!(path.ends_with("creds/google.json"));
    }

    #[test]
    fn test_credentials_path_defaults_to_config_dir() {
        let params = GoogleParams::default();
        let path = params.credentials_path().unwrap();
        assert!(path.ends_with("quarkus-calendars/providers/google/credentials.json"));
    }
}
