use std::collections::HashSet;

use chrono::{Local, Timelike};

use crate::types::{AnalyticsSummary, HourCount, Status, StatusCounts, UserSession};

/// Compute aggregate statistics over a session set (typically the
/// filtered one).
///
/// The hourly histogram buckets sessions by the local hour of their start
/// time and always carries all 24 hours, zero counts included. Empty
/// input yields zeroed counts with the full histogram.
pub fn summarize(sessions: &[UserSession]) -> AnalyticsSummary {
    let mut status_counts = StatusCounts::default();
    let mut hours = [0usize; 24];
    let mut users: HashSet<&str> = HashSet::new();
    let mut total_duration = 0.0;

    for session in sessions {
        match session.status {
            Status::Success => status_counts.success += 1,
            Status::Warning => status_counts.warning += 1,
            Status::Error => status_counts.error += 1,
        }

        let hour = session.start_time.with_timezone(&Local).hour() as usize;
        hours[hour] += 1;

        users.insert(session.user_id.as_str());
        total_duration += session.duration_secs;
    }

    let by_hour = hours
        .iter()
        .enumerate()
        .map(|(hour, &count)| HourCount {
            hour: hour as u32,
            count,
        })
        .collect();

    let avg_duration_secs = if sessions.is_empty() {
        0.0
    } else {
        total_duration / sessions.len() as f64
    };

    AnalyticsSummary {
        total_sessions: sessions.len(),
        unique_users: users.len(),
        avg_duration_secs,
        status_counts,
        by_hour,
    }
}
