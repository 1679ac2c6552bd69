use owo_colors::OwoColorize;

use calendars_core::loader::{LoadFailure, LocalEventLoader};
use calendars_core::{CalendarsError, Config, EventKind};

/// Validate every definition file. Returns whether all of them are valid.
pub fn run(config: &Config) -> bool {
    let loader = LocalEventLoader::from_config(config);
    let mut violations = Vec::new();

    println!("Checking YAML event formats...\n");

    for kind in EventKind::ALL {
        let dir = loader.directory(kind);
        if !dir.exists() {
            println!(
                "  {} Directory {} does not exist, skipping",
                "⚠".yellow(),
                dir.display()
            );
            continue;
        }

        let report = loader.load(kind);
        println!(
            "Checking {} file(s) in {}/",
            report.events.len() + report.failures.len(),
            dir.display()
        );

        for loaded in &report.events {
            println!("  {} {}", "✓".green(), loaded.path.display());
        }
        violations.extend(report.failures.iter().map(describe));
    }

    if violations.is_empty() {
        println!("\n{}", "✓ All event files are valid!".green());
        return true;
    }

    println!(
        "\n{}\n",
        format!("✗ Found {} validation error(s):", violations.len()).red()
    );
    for violation in &violations {
        println!("  • {violation}");
    }
    false
}

fn describe(failure: &LoadFailure) -> String {
    match &failure.error {
        CalendarsError::Io(e) => format!("{}: {}", failure.path.display(), e),
        CalendarsError::WrongKind { path, expected, .. } => format!(
            "{}: Wrong event type (expected {})",
            path.display(),
            expected
        ),
        other => other.to_string(),
    }
}
