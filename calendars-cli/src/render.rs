//! Colored terminal rendering for reconciliation results.

use calendars_core::EventKind;
use calendars_core::execute::{ActionOutcome, ActionResult};
use calendars_core::plan::{ActionCounts, ActionKind, ReconciliationAction};
use owo_colors::OwoColorize;

pub trait Render {
    fn render(&self) -> String;
}

impl Render for ActionKind {
    fn render(&self) -> String {
        colorize(*self, &self.to_string())
    }
}

fn colorize(kind: ActionKind, text: &str) -> String {
    match kind {
        ActionKind::Create => text.green().to_string(),
        ActionKind::Update => text.yellow().to_string(),
        ActionKind::Delete => text.red().to_string(),
        ActionKind::WarnOrphan => text.magenta().to_string(),
    }
}

impl Render for ReconciliationAction {
    fn render(&self) -> String {
        let date = match self {
            ReconciliationAction::Create { event, .. }
            | ReconciliationAction::Update { event, .. } => Some(event.date()),
            ReconciliationAction::Delete { remote, .. }
            | ReconciliationAction::WarnOrphan { remote, .. } => remote.date().ok(),
        };
        let date = date.map(|d| d.to_string()).unwrap_or_default();

        format!(
            "{} {} {}",
            self.kind().render(),
            colorize(self.kind(), &self.description()),
            date.dimmed()
        )
    }
}

impl Render for ActionResult {
    fn render(&self) -> String {
        let status = match &self.outcome {
            ActionOutcome::Succeeded => "✓".green().to_string(),
            ActionOutcome::Warned => "⚠".yellow().to_string(),
            ActionOutcome::Failed(cause) => format!("{} {}", "✗".red(), cause.red()),
        };
        format!("{}  {}", self.action.render(), status)
    }
}

pub fn render_calendar(kind: EventKind, calendar_id: &str) -> String {
    format!("📅 {} {}", kind.calendar_label(), format!("({calendar_id})").dimmed())
}

pub fn label(kind: ActionKind) -> &'static str {
    match kind {
        ActionKind::Create => "CREATE",
        ActionKind::Update => "UPDATE",
        ActionKind::Delete => "DELETE",
        ActionKind::WarnOrphan => "WARN_ORPHAN",
    }
}

/// One `KIND: count` line per kind present.
pub fn render_counts(counts: &ActionCounts) -> Vec<String> {
    [
        (ActionKind::Create, counts.create),
        (ActionKind::Update, counts.update),
        (ActionKind::Delete, counts.delete),
        (ActionKind::WarnOrphan, counts.warn),
    ]
    .into_iter()
    .filter(|(_, count)| *count > 0)
    .map(|(kind, count)| format!("  {}: {}", label(kind), count))
    .collect()
}

pub fn render_orphan_warning(count: usize) -> String {
    format!(
        "⚠️  {} remote event(s) found without local files. These events were not deleted. Review them manually if needed.",
        count
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_skip_empty_kinds() {
        let counts = ActionCounts {
            create: 2,
            update: 0,
            delete: 1,
            warn: 0,
        };
        assert_eq!(render_counts(&counts), vec!["  CREATE: 2", "  DELETE: 1"]);
        assert!(render_counts(&ActionCounts::default()).is_empty());
    }

    #[test]
    fn test_orphan_warning_mentions_count() {
        assert!(render_orphan_warning(3).starts_with("⚠️  3 remote event(s)"));
    }
}
