use chrono::{DateTime, Local, TimeZone, Utc};
use serde_json::Map;

use journey_sessions::{segment_default, summarize, LogEvent, Status, UserSession};

/// An instant with a known LOCAL wall-clock hour, expressed in UTC the
/// way the engine stores it. Keeps histogram expectations independent of
/// the machine's timezone.
fn local(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
    Local
        .with_ymd_and_hms(y, mo, d, h, mi, 0)
        .unwrap()
        .with_timezone(&Utc)
}

fn event_at(at: DateTime<Utc>, service: &str, status: Status, user: Option<&str>) -> LogEvent {
    let mut metadata = Map::new();
    if let Some(user) = user {
        metadata.insert("user_id".to_string(), user.into());
    }
    LogEvent {
        timestamp: at,
        action: "request".to_string(),
        service: service.to_string(),
        metadata,
        status,
    }
}

/// Sessions on separate days so segmentation never merges them:
/// - alice, success, local hour 9,  duration 0
/// - bob,   error,   local hour 9,  duration 600s
/// - alice, warning, local hour 14, duration 1200s
fn fixture_sessions() -> Vec<UserSession> {
    let sessions = segment_default(vec![
        event_at(local(2024, 5, 10, 9, 0), "auth", Status::Success, Some("alice")),
        event_at(local(2024, 5, 11, 9, 30), "payment", Status::Error, Some("bob")),
        event_at(local(2024, 5, 11, 9, 40), "payment", Status::Success, Some("bob")),
        event_at(local(2024, 5, 12, 14, 0), "billing", Status::Warning, Some("alice")),
        event_at(local(2024, 5, 12, 14, 20), "billing", Status::Success, Some("alice")),
    ]);
    assert_eq!(sessions.len(), 3);
    sessions
}

// ============================================================
// Empty input
// ============================================================

#[test]
fn test_empty_summary_is_zeroed_but_fully_shaped() {
    let summary = summarize(&[]);

    assert_eq!(summary.total_sessions, 0);
    assert_eq!(summary.unique_users, 0);
    assert_eq!(summary.avg_duration_secs, 0.0);
    assert_eq!(summary.status_counts.success, 0);
    assert_eq!(summary.status_counts.warning, 0);
    assert_eq!(summary.status_counts.error, 0);

    // The histogram is never sparse: all 24 hours, in order, zeroed.
    assert_eq!(summary.by_hour.len(), 24);
    for (i, bucket) in summary.by_hour.iter().enumerate() {
        assert_eq!(bucket.hour, i as u32);
        assert_eq!(bucket.count, 0);
    }
}

// ============================================================
// Tallies
// ============================================================

#[test]
fn test_status_counts_tally() {
    let summary = summarize(&fixture_sessions());

    assert_eq!(summary.status_counts.success, 1);
    assert_eq!(summary.status_counts.warning, 1);
    assert_eq!(summary.status_counts.error, 1);
    assert_eq!(summary.total_sessions, 3);
}

#[test]
fn test_hourly_histogram_buckets_by_local_start_hour() {
    let summary = summarize(&fixture_sessions());

    assert_eq!(summary.by_hour.len(), 24);
    assert_eq!(summary.by_hour[9].count, 2);
    assert_eq!(summary.by_hour[14].count, 1);

    let occupied: usize = summary.by_hour.iter().map(|b| b.count).sum();
    assert_eq!(occupied, 3);
}

#[test]
fn test_histogram_and_status_totals_equal_session_count() {
    let hours = [0, 0, 5, 12, 23, 23];
    let events: Vec<LogEvent> = hours
        .iter()
        .enumerate()
        .map(|(day, &h)| {
            event_at(
                local(2024, 6, 3 + day as u32, h, 15),
                "api",
                Status::Success,
                None,
            )
        })
        .collect();
    let sessions = segment_default(events);
    assert_eq!(sessions.len(), hours.len());

    let summary = summarize(&sessions);
    let hour_total: usize = summary.by_hour.iter().map(|b| b.count).sum();
    let status_total = summary.status_counts.success
        + summary.status_counts.warning
        + summary.status_counts.error;

    assert_eq!(hour_total, sessions.len());
    assert_eq!(status_total, sessions.len());
    assert_eq!(summary.by_hour[0].count, 2);
    assert_eq!(summary.by_hour[23].count, 2);
    assert_eq!(summary.by_hour[5].count, 1);
    assert_eq!(summary.by_hour[12].count, 1);
}

#[test]
fn test_unique_users_and_average_duration() {
    let summary = summarize(&fixture_sessions());

    // alice appears twice, bob once.
    assert_eq!(summary.unique_users, 2);
    // (0 + 600 + 1200) / 3
    assert_eq!(summary.avg_duration_secs, 600.0);
}

#[test]
fn test_summarize_is_pure() {
    let sessions = fixture_sessions();
    let first = summarize(&sessions);
    let second = summarize(&sessions);

    assert_eq!(first.total_sessions, second.total_sessions);
    assert_eq!(first.status_counts, second.status_counts);
    assert_eq!(
        first.by_hour.iter().map(|b| b.count).collect::<Vec<_>>(),
        second.by_hour.iter().map(|b| b.count).collect::<Vec<_>>()
    );
}

// ============================================================
// Wire shape
// ============================================================

#[test]
fn test_summary_json_shape() {
    let value = serde_json::to_value(summarize(&fixture_sessions())).unwrap();

    assert_eq!(value["total_sessions"], 3);
    assert_eq!(value["status_counts"]["error"], 1);
    assert_eq!(value["by_hour"][0]["hour"], 0);
    assert_eq!(value["by_hour"][23]["hour"], 23);
    assert!(value["avg_duration_secs"].is_number());
}
