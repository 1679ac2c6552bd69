//! Reconciliation entry points.

use crate::config::Config;
use crate::date_range::DateRange;
use crate::error::CalendarsResult;
use crate::event::EventKind;
use crate::execute::{ExecutionReport, Executor};
use crate::loader::LocalEventSource;
use crate::plan::{Plan, plan};
use crate::remote::CalendarClient;
use crate::remote::event::RemoteEvent;

/// What one reconciliation of one calendar planned and, unless it was a dry
/// run, what happened when the plan was applied.
#[derive(Debug, Clone)]
pub struct ReconciliationRun {
    pub kind: EventKind,
    pub calendar_id: String,
    pub range: DateRange,
    pub plan: Plan,
    /// `None` for dry runs.
    pub report: Option<ExecutionReport>,
}

impl ReconciliationRun {
    pub fn is_dry_run(&self) -> bool {
        self.report.is_none()
    }
}

pub struct Reconciler<C, S> {
    config: Config,
    client: C,
    source: S,
}

impl<C: CalendarClient, S: LocalEventSource> Reconciler<C, S> {
    pub fn new(config: Config, client: C, source: S) -> Self {
        Reconciler {
            config,
            client,
            source,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Compute the plan for `kind` without touching the remote calendar.
    pub async fn plan(&self, kind: EventKind, range: &DateRange) -> CalendarsResult<Plan> {
        let calendar_id = self.config.calendar_id(kind)?;
        self.plan_for(kind, calendar_id, range).await
    }

    /// Plan `kind` and, unless `dry_run`, apply the plan.
    pub async fn reconcile(
        &self,
        kind: EventKind,
        range: &DateRange,
        dry_run: bool,
    ) -> CalendarsResult<ReconciliationRun> {
        let calendar_id = self.config.calendar_id(kind)?;
        let plan = self.plan_for(kind, calendar_id, range).await?;

        let report = if dry_run {
            None
        } else {
            Some(
                Executor::new(&self.client, &self.config.ownership)
                    .execute(&plan)
                    .await,
            )
        };

        Ok(ReconciliationRun {
            kind,
            calendar_id: calendar_id.to_string(),
            range: *range,
            plan,
            report,
        })
    }

    /// Reconcile releases, then calls.
    ///
    /// Both calendar ids are checked before anything is planned.
    pub async fn reconcile_all(
        &self,
        range: &DateRange,
        dry_run: bool,
    ) -> CalendarsResult<Vec<ReconciliationRun>> {
        for kind in EventKind::ALL {
            self.config.calendar_id(kind)?;
        }

        let mut runs = Vec::with_capacity(EventKind::ALL.len());
        for kind in EventKind::ALL {
            runs.push(self.reconcile(kind, range, dry_run).await?);
        }
        Ok(runs)
    }

    /// [`Reconciler::reconcile`] over the configured window around today.
    pub async fn reconcile_default(
        &self,
        kind: EventKind,
        dry_run: bool,
    ) -> CalendarsResult<ReconciliationRun> {
        self.reconcile(kind, &self.config.default_range(), dry_run)
            .await
    }

    async fn plan_for(
        &self,
        kind: EventKind,
        calendar_id: &str,
        range: &DateRange,
    ) -> CalendarsResult<Plan> {
        tracing::info!(%kind, calendar_id, %range, "Planning reconciliation");

        let local = self.source.list_events(kind, range)?;
        let listed = self
            .client
            .list_events(calendar_id, range, self.config.reconciliation.max_results)
            .await?;
        let remote = within_range(listed, range)?;

        tracing::debug!(
            local = local.len(),
            remote = remote.len(),
            "Loaded events for comparison"
        );

        plan(&local, &remote, calendar_id, &self.config.ownership)
    }
}

/// Keep the remote events dated inside `range`. A dateless event is an error.
fn within_range(events: Vec<RemoteEvent>, range: &DateRange) -> CalendarsResult<Vec<RemoteEvent>> {
    let mut kept = Vec::with_capacity(events.len());
    for event in events {
        if range.contains(event.date()?) {
            kept.push(event);
        }
    }
    Ok(kept)
}
