//! Creates a valid Google session (access token) that we can use to call the Calendar API.
//!
//! The access token is cached next to the credentials file and refreshed
//! through the OAuth token endpoint once it is about to expire.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::app_config::{self, Credentials};

const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

/// Tokens this close to expiry are refreshed before use.
const EXPIRY_MARGIN_SECS: i64 = 60;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct SessionData {
    access_token: String,
    expires_at: DateTime<Utc>,
}

pub struct Session {
    credentials: Credentials,
    cache_path: PathBuf,
    data: Option<SessionData>,
}

impl Session {
    pub fn load(credentials_path: &Path) -> Result<Self> {
        let credentials = app_config::load(credentials_path)?;
        Ok(Self::with_credentials(credentials, cache_path_for(credentials_path)))
    }

    fn with_credentials(credentials: Credentials, cache_path: PathBuf) -> Self {
        let data = std::fs::read_to_string(&cache_path)
            .ok()
            .and_then(|contents| match serde_json::from_str(&contents) {
                Ok(data) => Some(data),
                Err(e) => {
                    tracing::debug!(path = %cache_path.display(), error = %e, "Ignoring unreadable session cache");
                    None
                }
            });

        Session {
            credentials,
            cache_path,
            data,
        }
    }

    /// A usable access token, refreshing it first if needed.
    pub async fn access_token(&mut self, http: &reqwest::Client) -> Result<String> {
        self.access_token_from(http, TOKEN_URL).await
    }

    async fn access_token_from(&mut self, http: &reqwest::Client, token_url: &str) -> Result<String> {
        if let Some(data) = self.data.as_ref().filter(|d| !is_expired(d)) {
            return Ok(data.access_token.clone());
        }

        let data = self.refresh(http, token_url).await?;
        let token = data.access_token.clone();
        self.data = Some(data);
        self.save()?;
        Ok(token)
    }

    async fn refresh(&self, http: &reqwest::Client, token_url: &str) -> Result<SessionData> {
        tracing::debug!("Refreshing Google access token");

        let response = http
            .post(token_url)
            .form(&[
                ("grant_type", "refresh_token"),
                ("client_id", self.credentials.client_id.as_str()),
                ("client_secret", self.credentials.client_secret.as_str()),
                ("refresh_token", self.credentials.refresh_token.as_str()),
            ])
            .send()
            .await
            .context("Failed to send token refresh request")?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            anyhow::bail!("Failed to refresh token ({}): {}", status, error_text);
        }

        #[derive(Deserialize)]
        struct RefreshResponse {
            access_token: String,
            expires_in: i64,
        }

        let refreshed: RefreshResponse = response
            .json()
            .await
            .context("Failed to parse token refresh response")?;

        Ok(SessionData {
            access_token: refreshed.access_token,
            expires_at: Utc::now() + Duration::seconds(refreshed.expires_in),
        })
    }

    fn save(&self) -> Result<()> {
        let Some(data) = &self.data else {
            return Ok(());
        };
        let contents = serde_json::to_string_pretty(data).context("Failed to serialize session")?;

        if let Some(parent) = self.cache_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        std::fs::write(&self.cache_path, contents)
            .with_context(|| format!("Failed to write session to {}", self.cache_path.display()))?;

        // Owner-only, the file holds an access token
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&self.cache_path, std::fs::Permissions::from_mode(0o600))
                .with_context(|| {
                    format!("Failed to set permissions on {}", self.cache_path.display())
                })?;
        }

        Ok(())
    }
}

fn is_expired(data: &SessionData) -> bool {
    Utc::now() + Duration::seconds(EXPIRY_MARGIN_SECS) >= data.expires_at
}

fn cache_path_for(credentials_path: &Path) -> PathBuf {
    let stem = credentials_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "credentials".to_string());
    credentials_path.with_file_name(format!("{stem}.session.json"))
}
