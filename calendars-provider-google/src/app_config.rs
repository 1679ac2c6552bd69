//! OAuth client credentials for the Google provider.
//!
//! Stored as JSON at the path given by `google_credentials` in the
//! `[remote]` config section, or by default at:
//!   ~/.config/quarkus-calendars/providers/google/credentials.json

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// OAuth client plus a long-lived refresh token for the calendar account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
    pub refresh_token: String,
}

pub fn base_dir() -> Result<PathBuf> {
    Ok(dirs::config_dir()
        .context("Could not determine config directory")?
        .join("quarkus-calendars")
        .join("providers")
        .join("google"))
}

pub fn default_credentials_path() -> Result<PathBuf> {
    Ok(base_dir()?.join("credentials.json"))
}

pub fn load(path: &Path) -> Result<Credentials> {
    if !path.exists() {
        anyhow::bail!(
            "Google credentials not found.\n\n\
            Create {} with:\n\n\
            {{\n  \
              \"client_id\": \"your-client-id.apps.googleusercontent.com\",\n  \
              \"client_secret\": \"your-client-secret\",\n  \
              \"refresh_token\": \"a refresh token with the calendar.events scope\"\n\
            }}\n\n\
            See https://console.cloud.google.com/apis/credentials for setup.",
            path.display()
        );
    }

    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read credentials from {}", path.display()))?;

    serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse credentials from {}", path.display()))
}
