//! Equivalence checks between a local event and a remote one.

use crate::error::CalendarsResult;
use crate::event::{LocalEvent, TimedEvent};
use crate::payload::JOIN_PREFIX;
use crate::remote::event::RemoteEvent;

/// Whether `local` and `remote` share the same `(title, date)` key.
///
/// Titles compare exactly. Fails if `remote` has no start date.
pub fn matches(local: &LocalEvent, remote: &RemoteEvent) -> CalendarsResult<bool> {
    if local.title() != remote.title() {
        return Ok(false);
    }
    Ok(local.date() == remote.date()?)
}

/// Whether a matched remote event differs from its local definition.
///
/// The join-link suffix appended to call descriptions is stripped before
/// comparing, so a remote event written from `local` never needs an update.
pub fn needs_update(local: &LocalEvent, remote: &RemoteEvent) -> bool {
    if local.description() != normalized_description(local, remote) {
        return true;
    }

    match local {
        LocalEvent::SingleDay(_) => false,
        LocalEvent::Timed(call) => {
            remote.start_time_utc() != Some(call.time)
                || remote.duration() != Some(call.duration)
                || remote_link(call, remote) != Some(call.link.as_str())
        }
    }
}

/// The remote link as written by this tool when the join suffix is present,
/// so URLs earlier in the description are not mistaken for it.
fn remote_link<'a>(call: &'a TimedEvent, remote: &'a RemoteEvent) -> Option<&'a str> {
    if let Some(link) = remote.conference_link.as_deref() {
        return Some(link);
    }
    let has_join_suffix = remote
        .description
        .as_deref()
        .and_then(|d| d.strip_suffix(call.link.as_str()))
        .is_some_and(|rest| rest.ends_with(JOIN_PREFIX));
    if has_join_suffix {
        return Some(&call.link);
    }
    remote.link()
}

fn normalized_description<'a>(local: &LocalEvent, remote: &'a RemoteEvent) -> Option<&'a str> {
    let description = remote.description.as_deref()?;

    match local {
        LocalEvent::Timed(call) => Some(
            description
                .strip_suffix(call.link.as_str())
                .and_then(|rest| rest.strip_suffix(JOIN_PREFIX))
                .unwrap_or(description),
        ),
        LocalEvent::SingleDay(_) => Some(description),
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Duration, NaiveDate, NaiveTime};

    use super::*;
    use crate::event::SingleDayEvent;
    use crate::payload::ToRemote;
    use crate::remote::event::{EventTime, OwnershipMarker};

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 11, 18).unwrap()
    }

    fn release() -> LocalEvent {
        SingleDayEvent::new("Quarkus 3.17.0", date()).into()
    }

    fn call() -> LocalEvent {
        TimedEvent::new(
            "Call",
            "Call desc",
            date(),
            NaiveTime::from_hms_opt(14, 0, 0).unwrap(),
            "https://x",
        )
        .into()
    }

    fn remote_at(summary: &str, start: &str, end: &str, description: Option<&str>) -> RemoteEvent {
        RemoteEvent {
            id: Some("evt".into()),
            summary: summary.into(),
            description: description.map(str::to_string),
            start: Some(EventTime::DateTime {
                datetime: DateTime::parse_from_rfc3339(start).unwrap(),
                tzid: None,
            }),
            end: Some(EventTime::DateTime {
                datetime: DateTime::parse_from_rfc3339(end).unwrap(),
                tzid: None,
            }),
            ..Default::default()
        }
    }

    #[test]
    fn test_matches_on_title_and_date_only() {
        let local = release();
        let mut remote = local.to_remote(&OwnershipMarker::default());
        assert!(matches(&local, &remote).unwrap());

        remote.summary = "quarkus 3.17.0".into();
        assert!(!matches(&local, &remote).unwrap());

        remote.summary = "Quarkus 3.17.0".into();
        remote.start = Some(EventTime::Date(date().succ_opt().unwrap()));
        assert!(!matches(&local, &remote).unwrap());
    }

    #[test]
    fn test_matches_fails_without_remote_date() {
        let remote = RemoteEvent {
            summary: "Quarkus 3.17.0".into(),
            ..Default::default()
        };
        assert!(matches(&release(), &remote).is_err());
    }

    #[test]
    fn test_round_trip_needs_no_update() {
        let marker = OwnershipMarker::default();
        for local in [release(), call()] {
            assert!(!needs_update(&local, &local.to_remote(&marker)));
        }
    }

    #[test]
    fn test_round_trip_with_url_in_description_needs_no_update() {
        let local: LocalEvent = TimedEvent::new(
            "Community Call",
            "Agenda: https://docs.example/agenda",
            date(),
            NaiveTime::from_hms_opt(14, 0, 0).unwrap(),
            "https://meet.example/abc",
        )
        .into();
        let remote = local.to_remote(&OwnershipMarker::default());

        assert_eq!(remote.link(), Some("https://docs.example/agenda"));
        assert!(!needs_update(&local, &remote));
    }

    #[test]
    fn test_description_url_is_the_link_without_join_suffix() {
        let remote = remote_at(
            "Call",
            "2025-11-18T14:00:00Z",
            "2025-11-18T14:50:00Z",
            Some("Call desc https://x"),
        );
        // The description differs, but the link is still resolved from it.
        let LocalEvent::Timed(local) = call() else {
            unreachable!()
        };
        assert_eq!(remote_link(&local, &remote), Some("https://x"));
    }

    #[test]
    fn test_call_with_join_suffix_is_in_sync() {
        let remote = remote_at(
            "Call",
            "2025-11-18T14:00:00Z",
            "2025-11-18T14:50:00Z",
            Some("Call desc\n\nJoin: https://x"),
        );
        assert!(!needs_update(&call(), &remote));
    }

    #[test]
    fn test_remote_time_is_compared_in_utc() {
        let remote = remote_at(
            "Call",
            "2025-11-18T15:00:00+01:00",
            "2025-11-18T15:50:00+01:00",
            Some("Call desc\n\nJoin: https://x"),
        );
        assert!(!needs_update(&call(), &remote));

        let shifted = remote_at(
            "Call",
            "2025-11-18T15:00:00Z",
            "2025-11-18T15:50:00Z",
            Some("Call desc\n\nJoin: https://x"),
        );
        assert!(needs_update(&call(), &shifted));
    }

    #[test]
    fn test_duration_change_needs_update() {
        let remote = remote_at(
            "Call",
            "2025-11-18T14:00:00Z",
            "2025-11-18T15:00:00Z",
            Some("Call desc\n\nJoin: https://x"),
        );
        assert!(needs_update(&call(), &remote));

        let LocalEvent::Timed(longer) = call() else {
            unreachable!()
        };
        assert!(!needs_update(
            &longer.with_duration(Duration::hours(1)).into(),
            &remote
        ));
    }

    #[test]
    fn test_link_change_needs_update() {
        let mut remote = call().to_remote(&OwnershipMarker::default());
        remote.description = Some("Call desc\n\nJoin: https://y".into());
        assert!(needs_update(&call(), &remote));
    }

    #[test]
    fn test_conference_link_is_checked_against_local_link() {
        let mut remote = call().to_remote(&OwnershipMarker::default());
        remote.conference_link = Some("https://meet.google.com/other".into());
        assert!(needs_update(&call(), &remote));

        remote.conference_link = Some("https://x".into());
        assert!(!needs_update(&call(), &remote));
    }

    #[test]
    fn test_description_change_needs_update() {
        let mut remote = call().to_remote(&OwnershipMarker::default());
        remote.description = Some("New agenda\n\nJoin: https://x".into());
        assert!(needs_update(&call(), &remote));
    }

    #[test]
    fn test_empty_description_differs_from_absent() {
        let mut remote = release().to_remote(&OwnershipMarker::default());
        remote.description = Some(String::new());
        assert!(needs_update(&release(), &remote));

        remote.description = None;
        assert!(!needs_update(&release(), &remote));
    }

    #[test]
    fn test_release_ignores_time_fields() {
        let remote = remote_at(
            "Quarkus 3.17.0",
            "2025-11-18T09:00:00Z",
            "2025-11-18T10:00:00Z",
            None,
        );
        assert!(!needs_update(&release(), &remote));
    }

    #[test]
    fn test_all_day_remote_for_a_call_needs_update() {
        let remote = RemoteEvent {
            summary: "Call".into(),
            description: Some("Call desc\n\nJoin: https://x".into()),
            start: Some(EventTime::Date(date())),
            end: Some(EventTime::Date(date())),
            ..Default::default()
        };
        assert!(needs_update(&call(), &remote));
    }
}
