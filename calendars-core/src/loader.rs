//! Loading local event definitions from YAML files.
//!
//! Each kind has its own directory, searched recursively for `.yaml` and
//! `.yml` files. A file that cannot be read, parsed or validated is recorded
//! as a [`LoadFailure`] and skipped; it never prevents the other files from
//! loading.

use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::date_range::DateRange;
use crate::error::{CalendarsError, CalendarsResult};
use crate::event::{EventDraft, EventKind, LocalEvent};

/// Supplies the validated local events of one kind within a date range.
pub trait LocalEventSource {
    fn list_events(&self, kind: EventKind, range: &DateRange) -> CalendarsResult<Vec<LocalEvent>>;
}

#[derive(Debug, Clone)]
pub struct LoadedEvent {
    pub path: PathBuf,
    pub event: LocalEvent,
}

#[derive(Debug)]
pub struct LoadFailure {
    pub path: PathBuf,
    pub error: CalendarsError,
}

#[derive(Debug, Default)]
pub struct LoadReport {
    /// Sorted by date, then by path.
    pub events: Vec<LoadedEvent>,
    pub failures: Vec<LoadFailure>,
}

impl LoadReport {
    pub fn into_events(self) -> Vec<LocalEvent> {
        self.events.into_iter().map(|loaded| loaded.event).collect()
    }
}

#[derive(Debug, Clone)]
pub struct LocalEventLoader {
    releases_dir: PathBuf,
    calls_dir: PathBuf,
}

impl LocalEventLoader {
    pub fn new(releases_dir: impl Into<PathBuf>, calls_dir: impl Into<PathBuf>) -> Self {
        LocalEventLoader {
            releases_dir: releases_dir.into(),
            calls_dir: calls_dir.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.releases_dir(), config.calls_dir())
    }

    pub fn directory(&self, kind: EventKind) -> &Path {
        match kind {
            EventKind::Release => &self.releases_dir,
            EventKind::Call => &self.calls_dir,
        }
    }

    /// Every event of `kind`, whatever its date.
    pub fn load(&self, kind: EventKind) -> LoadReport {
        let dir = self.directory(kind);
        let mut report = LoadReport::default();

        if !dir.exists() {
            tracing::debug!(dir = %dir.display(), "Event directory does not exist");
            return report;
        }

        let mut files = Vec::new();
        if let Err(e) = collect_yaml_files(dir, &mut files) {
            tracing::warn!(dir = %dir.display(), error = %e, "Failed to read directory");
            report.failures.push(LoadFailure {
                path: dir.to_path_buf(),
                error: e.into(),
            });
        }
        files.sort();

        for path in files {
            match load_file(&path, kind) {
                Ok(event) => report.events.push(LoadedEvent { path, event }),
                Err(error) => {
                    tracing::debug!(path = %path.display(), "Skipping invalid definition");
                    report.failures.push(LoadFailure { path, error });
                }
            }
        }

        report
            .events
            .sort_by(|a, b| a.event.date().cmp(&b.event.date()).then(a.path.cmp(&b.path)));
        report
    }

    /// Events of `kind` dated within `range`, bounds included.
    pub fn load_in_range(&self, kind: EventKind, range: &DateRange) -> LoadReport {
        let mut report = self.load(kind);
        report
            .events
            .retain(|loaded| range.contains(loaded.event.date()));
        report
    }
}

impl LocalEventSource for LocalEventLoader {
    fn list_events(&self, kind: EventKind, range: &DateRange) -> CalendarsResult<Vec<LocalEvent>> {
        let report = self.load_in_range(kind, range);
        for failure in &report.failures {
            tracing::warn!(path = %failure.path.display(), "{}", failure.error);
        }
        Ok(report.into_events())
    }
}

/// Parse and validate a single file, requiring it to declare `expected`.
pub fn load_file(path: &Path, expected: EventKind) -> CalendarsResult<LocalEvent> {
    let content = std::fs::read_to_string(path)?;

    let draft: EventDraft = serde_yaml::from_str(&content).map_err(|e| CalendarsError::Yaml {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    if draft.kind != expected {
        return Err(CalendarsError::WrongKind {
            path: path.to_path_buf(),
            expected,
            found: draft.kind,
        });
    }

    draft
        .into_event()
        .map_err(|source| CalendarsError::Validation {
            path: path.to_path_buf(),
            source,
        })
}

fn collect_yaml_files(dir: &Path, files: &mut Vec<PathBuf>) -> std::io::Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        // Symlinked directories are not followed, a link back up would loop.
        if entry.file_type()?.is_dir() {
            collect_yaml_files(&path, files)?;
        } else if is_yaml(&path) && path.is_file() {
            files.push(path);
        }
    }
    Ok(())
}

fn is_yaml(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext == "yaml" || ext == "yml")
}

#[cfg(test)]
mod tests {
    use std::fs;

    use chrono::NaiveDate;
    use tempfile::TempDir;

    use super::*;
    use crate::event::ValidationError;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn setup() -> (TempDir, LocalEventLoader) {
        let dir = TempDir::new().unwrap();
        let releases = dir.path().join("quarkus-releases");
        let calls = dir.path().join("quarkus-calls");
        fs::create_dir_all(releases.join("2025")).unwrap();
        fs::create_dir_all(&calls).unwrap();
        let loader = LocalEventLoader::new(releases, calls);
        (dir, loader)
    }

    fn write(loader: &LocalEventLoader, kind: EventKind, name: &str, content: &str) -> PathBuf {
        let path = loader.directory(kind).join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_loads_nested_yaml_and_yml_sorted_by_date() {
        let (_dir, loader) = setup();
        write(
            &loader,
            EventKind::Release,
            "2025/later.yaml",
            "type: release\ntitle: Quarkus 3.18.0\ndate: 2025-12-20\n",
        );
        write(
            &loader,
            EventKind::Release,
            "earlier.yml",
            "type: release\ntitle: Quarkus 3.17.0\ndate: 2025-11-15\n",
        );
        write(&loader, EventKind::Release, "notes.txt", "not an event");

        let report = loader.load(EventKind::Release);

        assert!(report.failures.is_empty());
        let titles: Vec<&str> = report.events.iter().map(|e| e.event.title()).collect();
        assert_eq!(titles, vec!["Quarkus 3.17.0", "Quarkus 3.18.0"]);
    }

    #[test]
    fn test_missing_directory_is_empty() {
        let loader = LocalEventLoader::new("/nonexistent/releases", "/nonexistent/calls");
        let report = loader.load(EventKind::Call);
        assert!(report.events.is_empty());
        assert!(report.failures.is_empty());
    }

    #[test]
    fn test_bad_files_are_reported_and_skipped() {
        let (_dir, loader) = setup();
        write(
            &loader,
            EventKind::Call,
            "good.yaml",
            "type: call\ntitle: Community Call\ndescription: Sync\ndate: 2025-11-18\ntime: \"14:00\"\ncallLink: https://meet.example/abc\n",
        );
        write(
            &loader,
            EventKind::Call,
            "no-link.yaml",
            "type: call\ntitle: Broken\ndescription: Sync\ndate: 2025-11-18\ntime: \"14:00\"\n",
        );
        write(&loader, EventKind::Call, "garbage.yaml", "type: [unclosed\n");
        write(
            &loader,
            EventKind::Call,
            "release.yaml",
            "type: release\ntitle: Misplaced\ndate: 2025-11-18\n",
        );

        let report = loader.load(EventKind::Call);

        assert_eq!(report.events.len(), 1);
        assert_eq!(report.events[0].event.title(), "Community Call");
        assert_eq!(report.failures.len(), 3);

        let by_name = |name: &str| {
            report
                .failures
                .iter()
                .find(|f| f.path.file_name().unwrap() == name)
                .unwrap()
        };
        assert!(matches!(
            by_name("no-link.yaml").error,
            CalendarsError::Validation {
                source: ValidationError::CallWithoutLink,
                ..
            }
        ));
        assert!(matches!(by_name("garbage.yaml").error, CalendarsError::Yaml { .. }));
        assert!(matches!(
            by_name("release.yaml").error,
            CalendarsError::WrongKind {
                expected: EventKind::Call,
                found: EventKind::Release,
                ..
            }
        ));
    }

    #[test]
    fn test_range_filter_is_inclusive() {
        let (_dir, loader) = setup();
        for (name, date) in [
            ("a.yaml", "2025-10-31"),
            ("b.yaml", "2025-11-01"),
            ("c.yaml", "2025-11-30"),
            ("d.yaml", "2025-12-01"),
        ] {
            write(
                &loader,
                EventKind::Release,
                name,
                &format!("type: release\ntitle: {name}\ndate: {date}\n"),
            );
        }

        let range = DateRange::new(d(2025, 11, 1), d(2025, 11, 30));
        let events = loader.list_events(EventKind::Release, &range).unwrap();

        let titles: Vec<&str> = events.iter().map(LocalEvent::title).collect();
        assert_eq!(titles, vec!["b.yaml", "c.yaml"]);
    }

    #[test]
    fn test_load_file_applies_default_duration() {
        let (_dir, loader) = setup();
        let path = write(
            &loader,
            EventKind::Call,
            "call.yaml",
            "type: call\ntitle: Call\ndescription: d\ndate: 2025-11-18\ntime: \"09:30\"\ncallLink: https://x\n",
        );

        let LocalEvent::Timed(call) = load_file(&path, EventKind::Call).unwrap() else {
            panic!("expected a timed event");
        };
        assert_eq!(call.duration, chrono::Duration::minutes(50));
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_directory_loop_is_not_followed() {
        let (_dir, loader) = setup();
        write(
            &loader,
            EventKind::Release,
            "q.yaml",
            "type: release\ntitle: Quarkus 3.17.0\ndate: 2025-11-15\n",
        );
        let releases = loader.directory(EventKind::Release);
        std::os::unix::fs::symlink(releases, releases.join("loop")).unwrap();

        let report = loader.load(EventKind::Release);

        assert!(report.failures.is_empty());
        assert_eq!(report.events.len(), 1);
    }
}
