use std::collections::HashSet;
use std::mem;

use chrono::{DateTime, TimeDelta, Utc};
use uuid::Uuid;

use crate::types::{LogEvent, Status, UserSession, ANONYMOUS_USER};

/// Inactivity gap (seconds) that closes a session when exceeded.
pub const DEFAULT_TIMEOUT_SECS: i64 = 30 * 60;

/// The default inactivity window as a `TimeDelta`.
pub fn default_timeout() -> TimeDelta {
    TimeDelta::seconds(DEFAULT_TIMEOUT_SECS)
}

/// Partition events into sessions using an inactivity-timeout window.
///
/// Events are stable-sorted by timestamp (equal timestamps keep their
/// input order), then grouped: a new session starts at the first event
/// and whenever the gap to the previous event is strictly greater than
/// `timeout`. Sessions come back in ascending start-time order.
///
/// Every input event lands in exactly one session; empty input yields an
/// empty output.
pub fn segment(events: Vec<LogEvent>, timeout: TimeDelta) -> Vec<UserSession> {
    let mut sorted = events;
    sorted.sort_by_key(|e| e.timestamp);

    let mut sessions: Vec<UserSession> = Vec::new();
    let mut group: Vec<LogEvent> = Vec::new();
    let mut last_timestamp: Option<DateTime<Utc>> = None;

    for event in sorted {
        let timestamp = event.timestamp;
        let starts_new = match last_timestamp {
            None => true,
            Some(prev) => timestamp - prev > timeout,
        };

        if starts_new && !group.is_empty() {
            sessions.extend(close_group(mem::take(&mut group)));
        }

        group.push(event);
        last_timestamp = Some(timestamp);
    }

    sessions.extend(close_group(group));
    sessions
}

/// Segment with the default 30-minute window.
pub fn segment_default(events: Vec<LogEvent>) -> Vec<UserSession> {
    segment(events, default_timeout())
}

fn close_group(events: Vec<LogEvent>) -> Option<UserSession> {
    let first = events.first()?;
    let last = events.last()?;

    let start_time = first.timestamp;
    let end_time = last.timestamp;
    let user_id = first
        .metadata_user_id()
        .unwrap_or_else(|| ANONYMOUS_USER.to_string());
    let status = events
        .iter()
        .map(|e| e.status)
        .max()
        .unwrap_or(Status::Success);
    let duration_secs = (end_time - start_time).num_milliseconds() as f64 / 1000.0;
    let service_count = events
        .iter()
        .map(|e| e.service.as_str())
        .collect::<HashSet<_>>()
        .len();

    Some(UserSession {
        id: Uuid::new_v4().to_string(),
        user_id,
        start_time,
        end_time,
        events,
        status,
        duration_secs,
        service_count,
    })
}
