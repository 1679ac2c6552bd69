use anyhow::{Context, Result};
use owo_colors::OwoColorize;

use calendars_core::execute::ExecutionReport;
use calendars_core::loader::LocalEventLoader;
use calendars_core::plan::ActionCounts;
use calendars_core::remote::RemoteCalendar;
use calendars_core::{Config, DateRange, EventKind, ReconciliationRun, Reconciler};

use crate::render::{self, Render};
use crate::utils::tui;

pub async fn run(config: Config, kinds: Vec<EventKind>, range: DateRange, dry_run: bool) -> Result<()> {
    // Every requested calendar must be configured before anything is listed.
    for kind in &kinds {
        config.calendar_id(*kind)?;
    }

    let client = RemoteCalendar::new(config.remote.clone());
    let source = LocalEventLoader::from_config(&config);
    let reconciler = Reconciler::new(config, client, source);

    if dry_run {
        println!("{}\n", "=== DRY RUN MODE - No changes will be made ===".bold());
    }
    println!("{}\n", format!("Window: {range}").dimmed());

    let mut totals = ActionCounts::default();
    let mut failed = 0;

    for (i, kind) in kinds.iter().enumerate() {
        let calendar_id = reconciler.config().calendar_id(*kind)?.to_string();
        let heading = render::render_calendar(*kind, &calendar_id);

        let spinner = tui::create_spinner(heading.clone());
        let result = reconciler.reconcile(*kind, &range, dry_run).await;
        spinner.finish_and_clear();

        println!("{}", heading);
        let run = result.with_context(|| format!("Failed to reconcile {}", kind.calendar_label()))?;

        print_run(&run);
        totals += run.plan.counts();
        failed += run.report.as_ref().map_or(0, ExecutionReport::failed);

        if i < kinds.len() - 1 {
            println!();
        }
    }

    println!();
    print_summary(&totals, failed, dry_run);

    Ok(())
}

fn print_run(run: &ReconciliationRun) {
    for line in run_lines(run) {
        println!("{line}");
    }
}

/// Counts by kind first, then each planned action or execution outcome.
fn run_lines(run: &ReconciliationRun) -> Vec<String> {
    if run.plan.is_empty() {
        return vec![format!("   {}", "No changes".dimmed())];
    }

    let mut lines: Vec<String> = render::render_counts(&run.plan.counts())
        .into_iter()
        .map(|line| format!(" {line}"))
        .collect();

    match &run.report {
        None => lines.extend(run.plan.iter().map(|action| format!("   {}", action.render()))),
        Some(report) => {
            lines.extend(report.results.iter().map(|result| format!("   {}", result.render())))
        }
    }
    lines
}

fn print_summary(totals: &ActionCounts, failed: usize, dry_run: bool) {
    if totals.total() == 0 {
        println!("{}", "✓ No actions needed - calendars are already in sync!".green());
        return;
    }

    if dry_run {
        println!("The following actions would be performed:");
    } else {
        println!("Reconciliation completed!");
    }

    println!("Summary:");
    for line in render::render_counts(totals) {
        println!("{line}");
    }

    if failed > 0 {
        println!("{}", format!("✗ {failed} action(s) failed, see above").red());
    }

    if dry_run {
        println!("\nRun without --dry-run to execute these actions.");
    } else if totals.warn > 0 {
        println!("\n{}", render::render_orphan_warning(totals.warn).yellow());
    }
}

#[cfg(test)]
mod tests {
    use calendars_core::event::SingleDayEvent;
    use calendars_core::execute::{ActionOutcome, ActionResult};
    use calendars_core::plan::{Plan, ReconciliationAction};
    use chrono::NaiveDate;

    use super::*;

    fn run(report: bool) -> ReconciliationRun {
        let date = NaiveDate::from_ymd_opt(2025, 11, 15).unwrap();
        let action = ReconciliationAction::Create {
            event: SingleDayEvent::new("Quarkus 3.17.0", date).into(),
            calendar_id: "releases".into(),
        };
        ReconciliationRun {
            kind: EventKind::Release,
            calendar_id: "releases".into(),
            range: DateRange::new(date, date),
            plan: Plan(vec![action.clone()]),
            report: report.then(|| ExecutionReport {
                results: vec![ActionResult {
                    action,
                    outcome: ActionOutcome::Succeeded,
                }],
            }),
        }
    }

    #[test]
    fn test_counts_come_before_outcomes() {
        let lines = run_lines(&run(true));
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("CREATE: 1"));
        assert!(lines[1].contains("Create event: Quarkus 3.17.0"));
    }

    #[test]
    fn test_dry_run_lists_counts_then_actions() {
        let lines = run_lines(&run(false));
        assert!(lines[0].contains("CREATE: 1"));
        assert!(lines[1].contains("Create event: Quarkus 3.17.0"));
    }
}
