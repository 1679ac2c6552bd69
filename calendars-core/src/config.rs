//! Tool configuration, read from `calendars.toml` and `QUARKUS_CALENDARS__*`
//! environment variables.

use std::path::{Path, PathBuf};

use config::{Environment, File};
use serde::Deserialize;

use crate::date_range::DateRange;
use crate::error::{CalendarsError, CalendarsResult};
use crate::event::EventKind;
use crate::remote::RemoteSettings;
use crate::remote::event::OwnershipMarker;

pub const DEFAULT_CONFIG_FILE: &str = "calendars.toml";
const ENV_PREFIX: &str = "QUARKUS_CALENDARS";

fn default_releases_dir() -> PathBuf {
    PathBuf::from("quarkus-releases")
}

fn default_calls_dir() -> PathBuf {
    PathBuf::from("quarkus-calls")
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ReconciliationSettings {
    pub months_before: u32,
    pub months_after: u32,
    /// Cap on the number of remote events listed per calendar.
    pub max_results: u32,
}

impl Default for ReconciliationSettings {
    fn default() -> Self {
        ReconciliationSettings {
            months_before: 1,
            months_after: 4,
            max_results: 100,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CalendarSettings {
    pub id: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct CalendarsSettings {
    pub releases: CalendarSettings,
    pub calls: CalendarSettings,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Config {
    #[serde(default = "default_releases_dir")]
    pub releases_dir: PathBuf,
    #[serde(default = "default_calls_dir")]
    pub calls_dir: PathBuf,
    #[serde(default)]
    pub reconciliation: ReconciliationSettings,
    #[serde(default)]
    pub ownership: OwnershipMarker,
    #[serde(default)]
    pub remote: RemoteSettings,
    #[serde(default)]
    pub calendars: CalendarsSettings,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            releases_dir: default_releases_dir(),
            calls_dir: default_calls_dir(),
            reconciliation: ReconciliationSettings::default(),
            ownership: OwnershipMarker::default(),
            remote: RemoteSettings::default(),
            calendars: CalendarsSettings::default(),
        }
    }
}

impl Config {
    /// Load `path` (or `calendars.toml` in the working directory) layered
    /// with environment overrides. A missing file leaves the defaults.
    pub fn load(path: Option<&Path>) -> CalendarsResult<Self> {
        let path = path.unwrap_or(Path::new(DEFAULT_CONFIG_FILE));
        tracing::debug!(path = %path.display(), "Loading configuration");
        Self::build(path, true)
    }

    /// Load `path` alone, ignoring the environment.
    pub fn from_file(path: &Path) -> CalendarsResult<Self> {
        Self::build(path, false)
    }

    fn build(path: &Path, with_env: bool) -> CalendarsResult<Self> {
        let mut builder =
            config::Config::builder().add_source(File::from(path.to_path_buf()).required(false));

        if with_env {
            builder = builder.add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            );
        }

        builder
            .build()
            .map_err(|e| CalendarsError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| CalendarsError::Config(e.to_string()))
    }

    pub fn releases_dir(&self) -> PathBuf {
        expand(&self.releases_dir)
    }

    pub fn calls_dir(&self) -> PathBuf {
        expand(&self.calls_dir)
    }

    pub fn calendar(&self, kind: EventKind) -> &CalendarSettings {
        match kind {
            EventKind::Release => &self.calendars.releases,
            EventKind::Call => &self.calendars.calls,
        }
    }

    /// Destination calendar for `kind`. Missing or blank ids are an error.
    pub fn calendar_id(&self, kind: EventKind) -> CalendarsResult<&str> {
        self.calendar(kind)
            .id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .ok_or(CalendarsError::CalendarNotConfigured(kind))
    }

    /// The configured window around today.
    pub fn default_range(&self) -> DateRange {
        DateRange::around_today(
            self.reconciliation.months_before,
            self.reconciliation.months_after,
        )
    }
}

fn expand(path: &Path) -> PathBuf {
    PathBuf::from(shellexpand::tilde(&path.to_string_lossy()).into_owned())
}
