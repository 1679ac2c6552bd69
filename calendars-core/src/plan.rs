//! Planning: which mutations bring a remote calendar in line with local events.

use std::collections::{HashMap, HashSet};
use std::fmt;

use crate::compare::{matches, needs_update};
use crate::error::CalendarsResult;
use crate::event::{EventKey, LocalEvent};
use crate::remote::event::{OwnershipMarker, RemoteEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    Create,
    Update,
    Delete,
    WarnOrphan,
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionKind::Create => write!(f, "+"),
            ActionKind::Update => write!(f, "~"),
            ActionKind::Delete => write!(f, "-"),
            ActionKind::WarnOrphan => write!(f, "!"),
        }
    }
}

/// One step of a plan.
#[derive(Debug, Clone, PartialEq)]
pub enum ReconciliationAction {
    Create {
        event: LocalEvent,
        calendar_id: String,
    },
    Update {
        event: LocalEvent,
        remote: RemoteEvent,
        calendar_id: String,
    },
    Delete {
        remote: RemoteEvent,
        calendar_id: String,
    },
    /// A remote event with no local file that this tool does not own.
    WarnOrphan {
        remote: RemoteEvent,
        calendar_id: String,
    },
}

impl ReconciliationAction {
    pub fn kind(&self) -> ActionKind {
        match self {
            ReconciliationAction::Create { .. } => ActionKind::Create,
            ReconciliationAction::Update { .. } => ActionKind::Update,
            ReconciliationAction::Delete { .. } => ActionKind::Delete,
            ReconciliationAction::WarnOrphan { .. } => ActionKind::WarnOrphan,
        }
    }

    pub fn calendar_id(&self) -> &str {
        match self {
            ReconciliationAction::Create { calendar_id, .. }
            | ReconciliationAction::Update { calendar_id, .. }
            | ReconciliationAction::Delete { calendar_id, .. }
            | ReconciliationAction::WarnOrphan { calendar_id, .. } => calendar_id,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            ReconciliationAction::Create { event, .. }
            | ReconciliationAction::Update { event, .. } => event.title(),
            ReconciliationAction::Delete { remote, .. }
            | ReconciliationAction::WarnOrphan { remote, .. } => remote.title(),
        }
    }

    pub fn description(&self) -> String {
        match self.kind() {
            ActionKind::Create => format!("Create event: {}", self.title()),
            ActionKind::Update => format!("Update event: {}", self.title()),
            ActionKind::Delete => format!("Delete event: {}", self.title()),
            ActionKind::WarnOrphan => {
                format!("Warning: Remote event without local file: {}", self.title())
            }
        }
    }
}

impl fmt::Display for ReconciliationAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// Number of actions of each kind in a plan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActionCounts {
    pub create: usize,
    pub update: usize,
    pub delete: usize,
    pub warn: usize,
}

impl ActionCounts {
    pub fn total(&self) -> usize {
        self.create + self.update + self.delete + self.warn
    }
}

impl std::ops::AddAssign for ActionCounts {
    fn add_assign(&mut self, other: Self) {
        self.create += other.create;
        self.update += other.update;
        self.delete += other.delete;
        self.warn += other.warn;
    }
}

/// Ordered actions for one calendar: creates and updates in local order,
/// then deletes and orphan warnings in remote order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Plan(pub Vec<ReconciliationAction>);

impl Plan {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ReconciliationAction> {
        self.0.iter()
    }

    pub fn counts(&self) -> ActionCounts {
        let mut counts = ActionCounts::default();
        for action in &self.0 {
            match action.kind() {
                ActionKind::Create => counts.create += 1,
                ActionKind::Update => counts.update += 1,
                ActionKind::Delete => counts.delete += 1,
                ActionKind::WarnOrphan => counts.warn += 1,
            }
        }
        counts
    }
}

impl<'a> IntoIterator for &'a Plan {
    type Item = &'a ReconciliationAction;
    type IntoIter = std::slice::Iter<'a, ReconciliationAction>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Compute the plan for one calendar.
///
/// `remote` should already be narrowed to the reconciliation window. Remote
/// events sharing a key collapse onto the last one listed; none of them is
/// deleted or reported once that key is matched. Unmatched remote events are
/// deleted only when they carry `marker`. The key index stands in for
/// [`matches`], which confirms each hit.
///
/// Fails if a remote event has no start date.
pub fn plan(
    local: &[LocalEvent],
    remote: &[RemoteEvent],
    calendar_id: &str,
    marker: &OwnershipMarker,
) -> CalendarsResult<Plan> {
    let mut remote_keys = Vec::with_capacity(remote.len());
    let mut by_key: HashMap<EventKey, &RemoteEvent> = HashMap::with_capacity(remote.len());

    for event in remote {
        let key = EventKey::new(event.title(), event.date()?);
        if let Some(previous) = by_key.insert(key.clone(), event) {
            tracing::warn!(
                key = %key,
                kept = ?event.id,
                dropped = ?previous.id,
                "Several remote events share the same title and date"
            );
        }
        remote_keys.push(key);
    }

    let mut actions = Vec::new();
    let mut matched: HashSet<EventKey> = HashSet::new();

    for event in local {
        let key = event.key();
        let found = match by_key.get(&key) {
            Some(remote_event) if matches(event, remote_event)? => Some(*remote_event),
            _ => None,
        };
        match found {
            None => actions.push(ReconciliationAction::Create {
                event: event.clone(),
                calendar_id: calendar_id.to_string(),
            }),
            Some(remote_event) => {
                if needs_update(event, remote_event) {
                    actions.push(ReconciliationAction::Update {
                        event: event.clone(),
                        remote: remote_event.clone(),
                        calendar_id: calendar_id.to_string(),
                    });
                }
                matched.insert(key);
            }
        }
    }

    for (event, key) in remote.iter().zip(&remote_keys) {
        if matched.contains(key) {
            continue;
        }

        let action = if event.is_managed_by(marker) {
            ReconciliationAction::Delete {
                remote: event.clone(),
                calendar_id: calendar_id.to_string(),
            }
        } else {
            ReconciliationAction::WarnOrphan {
                remote: event.clone(),
                calendar_id: calendar_id.to_string(),
            }
        };
        actions.push(action);
    }

    Ok(Plan(actions))
}
