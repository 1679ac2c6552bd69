//! Error types for the reconciliation engine.

use std::path::PathBuf;

use thiserror::Error;

use crate::event::{EventKind, ValidationError};

/// Errors that can occur while loading, planning or talking to a provider.
#[derive(Error, Debug)]
pub enum CalendarsError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{} calendar ID not configured", .0.calendar_label())]
    CalendarNotConfigured(EventKind),

    #[error("Validation failed for {}: {source}", path.display())]
    Validation {
        path: PathBuf,
        #[source]
        source: ValidationError,
    },

    #[error("Failed to parse YAML in {}: {message}", path.display())]
    Yaml { path: PathBuf, message: String },

    #[error("{} contains a {found} event, expected {expected}", path.display())]
    WrongKind {
        path: PathBuf,
        expected: EventKind,
        found: EventKind,
    },

    #[error("No date found for remote event: {0}")]
    MissingRemoteDate(String),

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Provider '{0}' not found in PATH")]
    ProviderNotInstalled(String),

    #[error("Provider request timed out after {0}s")]
    ProviderTimeout(u64),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type alias for calendar operations.
pub type CalendarsResult<T> = Result<T, CalendarsError>;
