use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// User id assigned to sessions whose first event carries no usable
/// `user_id` metadata.
pub const ANONYMOUS_USER: &str = "anonymous";

/// One raw record as emitted by a service, before normalization.
///
/// Extra fields on the wire are tolerated and ignored; `metadata` defaults
/// to an empty map when absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogRecord {
    pub timestamp: DateTime<Utc>,
    pub service: String,
    pub level: String,
    pub message: String,
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

/// Tri-state status, on events (derived from the severity level) and on
/// sessions (aggregated with strict precedence).
///
/// Ordering follows severity: `Success < Warning < Error`, so the status
/// of a session is the `max` of its member events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Warning,
    Error,
}

impl Status {
    /// Map a raw severity level to a status: `error` -> Error,
    /// `warn` -> Warning, anything else -> Success.
    pub fn from_level(level: &str) -> Status {
        match level {
            "error" => Status::Error,
            "warn" => Status::Warning,
            _ => Status::Success,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Status::Success => "success",
            Status::Warning => "warning",
            Status::Error => "error",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Error)]
#[error("unknown status '{0}' (expected success, warning, or error)")]
pub struct ParseStatusError(String);

impl FromStr for Status {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "success" => Ok(Status::Success),
            "warning" => Ok(Status::Warning),
            "error" => Ok(Status::Error),
            other => Err(ParseStatusError(other.to_string())),
        }
    }
}

/// One normalized event, the unit the segmenter consumes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEvent {
    pub timestamp: DateTime<Utc>,
    pub action: String,
    pub service: String,
    pub metadata: Map<String, Value>,
    pub status: Status,
}

impl LogEvent {
    /// Extract the `user_id` metadata value, if usable. Empty strings and
    /// nulls count as absent; non-string scalars are rendered as text.
    pub fn metadata_user_id(&self) -> Option<String> {
        match self.metadata.get("user_id")? {
            Value::String(s) if s.is_empty() => None,
            Value::String(s) => Some(s.clone()),
            Value::Null => None,
            other => Some(other.to_string()),
        }
    }
}

impl From<LogRecord> for LogEvent {
    fn from(record: LogRecord) -> Self {
        let status = Status::from_level(&record.level);
        LogEvent {
            timestamp: record.timestamp,
            action: record.message,
            service: record.service,
            metadata: record.metadata,
            status,
        }
    }
}

/// A reconstructed session: a maximal run of events with no inter-event
/// gap exceeding the segmentation timeout. Immutable once built.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSession {
    pub id: String,
    pub user_id: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub events: Vec<LogEvent>,
    pub status: Status,
    pub duration_secs: f64,
    pub service_count: usize,
}

/// Summary for list views.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSummary {
    pub id: String,
    pub user_id: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub status: Status,
    pub duration_secs: f64,
    pub service_count: usize,
    pub event_count: usize,
}

impl From<&UserSession> for SessionSummary {
    fn from(session: &UserSession) -> Self {
        SessionSummary {
            id: session.id.clone(),
            user_id: session.user_id.clone(),
            start_time: session.start_time,
            end_time: session.end_time,
            status: session.status,
            duration_secs: session.duration_secs,
            service_count: session.service_count,
            event_count: session.events.len(),
        }
    }
}

/// Filter parameters for selecting sessions. Every criterion is optional;
/// an unset criterion matches everything.
#[derive(Debug, Clone, Default)]
pub struct SessionFilter {
    /// Case-insensitive substring matched against the user id or any
    /// member event's action/service.
    pub search: Option<String>,
    pub status: Option<Status>,
    /// Inclusive lower bound on the session start time.
    pub from: Option<DateTime<Utc>>,
    /// Inclusive upper bound on the session start time.
    pub to: Option<DateTime<Utc>>,
    /// Inclusive lower bound on the session duration, in minutes.
    pub min_minutes: Option<f64>,
    /// Inclusive upper bound on the session duration, in minutes.
    pub max_minutes: Option<f64>,
}

/// Aggregate statistics over a session set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsSummary {
    pub total_sessions: usize,
    pub unique_users: usize,
    pub avg_duration_secs: f64,
    pub status_counts: StatusCounts,
    /// Always 24 entries, hours 0..=23 in order, zero counts included.
    pub by_hour: Vec<HourCount>,
}

/// Session tally per status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    pub success: usize,
    pub warning: usize,
    pub error: usize,
}

/// Sessions started during a single local hour of day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HourCount {
    pub hour: u32,
    pub count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_from_level() {
        assert_eq!(Status::from_level("error"), Status::Error);
        assert_eq!(Status::from_level("warn"), Status::Warning);
        assert_eq!(Status::from_level("info"), Status::Success);
        assert_eq!(Status::from_level("debug"), Status::Success);
        assert_eq!(Status::from_level("trace"), Status::Success);
        // The mapping is exact: unrecognized spellings fall through.
        assert_eq!(Status::from_level("ERROR"), Status::Success);
        assert_eq!(Status::from_level("warning"), Status::Success);
        assert_eq!(Status::from_level(""), Status::Success);
    }

    #[test]
    fn test_status_precedence_ordering() {
        assert!(Status::Success < Status::Warning);
        assert!(Status::Warning < Status::Error);
    }

    #[test]
    fn test_status_round_trip() {
        for s in [Status::Success, Status::Warning, Status::Error] {
            let parsed: Status = s.to_string().parse().unwrap();
            assert_eq!(parsed, s);
        }
        assert!("critical".parse::<Status>().is_err());
    }

    #[test]
    fn test_metadata_user_id_variants() {
        let mut metadata = Map::new();
        metadata.insert("user_id".to_string(), Value::String("alice".into()));
        let event = LogEvent {
            timestamp: Utc::now(),
            action: "login".into(),
            service: "auth".into(),
            metadata,
            status: Status::Success,
        };
        assert_eq!(event.metadata_user_id(), Some("alice".to_string()));

        let mut event = event;
        event.metadata.insert("user_id".to_string(), Value::Null);
        assert_eq!(event.metadata_user_id(), None);

        event
            .metadata
            .insert("user_id".to_string(), Value::String(String::new()));
        assert_eq!(event.metadata_user_id(), None);

        event
            .metadata
            .insert("user_id".to_string(), Value::Number(42.into()));
        assert_eq!(event.metadata_user_id(), Some("42".to_string()));

        event.metadata.remove("user_id");
        assert_eq!(event.metadata_user_id(), None);
    }
}
