//! Reconciliation of YAML-defined calendar events with a remote calendar.
//!
//! Local definitions are the source of truth. A run loads them, lists the
//! remote calendar, computes a [`plan::Plan`] of creates, updates, deletes
//! and orphan warnings, then applies it unless it is a dry run. Only remote
//! events carrying the configured ownership marker are ever deleted.

pub mod compare;
pub mod config;
pub mod date_range;
pub mod error;
pub mod event;
pub mod execute;
pub mod loader;
pub mod payload;
pub mod plan;
pub mod reconcile;
pub mod remote;

#[cfg(test)]
mod testing;

pub use config::Config;
pub use date_range::DateRange;
pub use error::{CalendarsError, CalendarsResult};
pub use event::{EventKind, LocalEvent};
pub use reconcile::{ReconciliationRun, Reconciler};
