use std::borrow::Cow;

use chrono::SecondsFormat;

use crate::types::UserSession;

/// The fixed CSV column contract. Consumers parse exported files against
/// this exact header; changing it is a breaking change.
pub const CSV_HEADER: &str =
    "Session ID,User ID,Start Time,End Time,Status,Duration (s),Services Used,Event Count";

/// Serialize sessions to CSV, one row per session, in input order.
///
/// Timestamps are RFC 3339 UTC with whole seconds; free-text fields are
/// quoted per RFC 4180 when they contain a comma, quote, or line break.
/// An empty input produces the header row alone. No trailing newline.
pub fn to_csv(sessions: &[UserSession]) -> String {
    let mut lines = Vec::with_capacity(sessions.len() + 1);
    lines.push(CSV_HEADER.to_string());

    for s in sessions {
        lines.push(format!(
            "{},{},{},{},{},{},{},{}",
            csv_field(&s.id),
            csv_field(&s.user_id),
            s.start_time.to_rfc3339_opts(SecondsFormat::Secs, true),
            s.end_time.to_rfc3339_opts(SecondsFormat::Secs, true),
            s.status,
            s.duration_secs,
            s.service_count,
            s.events.len(),
        ));
    }

    lines.join("\n")
}

/// Quote a field per RFC 4180 when needed, otherwise pass it through.
fn csv_field(raw: &str) -> Cow<'_, str> {
    let needs_quoting = raw
        .chars()
        .any(|c| matches!(c, ',' | '"' | '\n' | '\r'));
    if needs_quoting {
        Cow::Owned(format!("\"{}\"", raw.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(raw)
    }
}
