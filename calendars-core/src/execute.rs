//! Applying a plan to the remote calendar.
//!
//! Actions run one at a time, in plan order. A failed action is recorded and
//! the next one runs anyway: nothing is retried or rolled back.

use crate::error::{CalendarsError, CalendarsResult};
use crate::payload::ToRemote;
use crate::plan::{ActionKind, Plan, ReconciliationAction};
use crate::remote::CalendarClient;
use crate::remote::event::{OwnershipMarker, RemoteEvent};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    Succeeded,
    /// Nothing was sent to the remote calendar (orphan warnings).
    Warned,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ActionResult {
    pub action: ReconciliationAction,
    pub outcome: ActionOutcome,
}

/// Outcome of every action of a plan, in plan order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExecutionReport {
    pub results: Vec<ActionResult>,
}

impl ExecutionReport {
    pub fn succeeded(&self) -> usize {
        self.count(|o| matches!(o, ActionOutcome::Succeeded))
    }

    pub fn warned(&self) -> usize {
        self.count(|o| matches!(o, ActionOutcome::Warned))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, ActionOutcome::Failed(_)))
    }

    pub fn has_failures(&self) -> bool {
        self.failed() > 0
    }

    pub fn failures(&self) -> impl Iterator<Item = (&ReconciliationAction, &str)> {
        self.results.iter().filter_map(|r| match &r.outcome {
            ActionOutcome::Failed(cause) => Some((&r.action, cause.as_str())),
            _ => None,
        })
    }

    fn count(&self, pred: impl Fn(&ActionOutcome) -> bool) -> usize {
        self.results.iter().filter(|r| pred(&r.outcome)).count()
    }
}

pub struct Executor<'a, C> {
    client: &'a C,
    marker: &'a OwnershipMarker,
}

impl<'a, C: CalendarClient> Executor<'a, C> {
    /// `marker` is attached to every record created or updated.
    pub fn new(client: &'a C, marker: &'a OwnershipMarker) -> Self {
        Executor { client, marker }
    }

    pub async fn execute(&self, plan: &Plan) -> ExecutionReport {
        let mut report = ExecutionReport::default();

        for action in plan {
            let outcome = match self.apply(action).await {
                Ok(outcome) => outcome,
                Err(e) => {
                    tracing::error!(action = %action, error = %e, "Failed to execute action");
                    ActionOutcome::Failed(e.to_string())
                }
            };
            report.results.push(ActionResult {
                action: action.clone(),
                outcome,
            });
        }

        report
    }

    async fn apply(&self, action: &ReconciliationAction) -> CalendarsResult<ActionOutcome> {
        match action {
            ReconciliationAction::Create { event, calendar_id } => {
                tracing::info!("Creating: {}", action);
                let id = self
                    .client
                    .create_event(calendar_id, &event.to_remote(self.marker))
                    .await?;
                tracing::info!(id = %id, "Created successfully");
            }
            ReconciliationAction::Update {
                event,
                remote,
                calendar_id,
            } => {
                tracing::info!("Updating: {}", action);
                self.client
                    .update_event(
                        calendar_id,
                        remote_id(remote, action.kind())?,
                        &event.to_remote(self.marker),
                    )
                    .await?;
                tracing::info!("Updated successfully");
            }
            ReconciliationAction::Delete {
                remote,
                calendar_id,
            } => {
                tracing::info!("Deleting: {}", action);
                self.client
                    .delete_event(calendar_id, remote_id(remote, action.kind())?)
                    .await?;
                tracing::info!("Deleted successfully");
            }
            ReconciliationAction::WarnOrphan { .. } => {
                tracing::warn!("{}", action);
                return Ok(ActionOutcome::Warned);
            }
        }

        Ok(ActionOutcome::Succeeded)
    }
}

fn remote_id(remote: &RemoteEvent, kind: ActionKind) -> CalendarsResult<&str> {
    remote.id.as_deref().ok_or_else(|| {
        CalendarsError::Provider(format!(
            "Cannot apply '{kind}' to remote event '{}' without an identifier",
            remote.summary
        ))
    })
}
