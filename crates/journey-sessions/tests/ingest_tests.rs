use std::fs;

use tempfile::TempDir;

use journey_sessions::{fingerprint, load_events, parse_events, IngestError, Status};

const JSONL_FIXTURE: &str = r#"{"timestamp":"2024-01-15T10:00:00Z","service":"auth","level":"info","message":"user login","metadata":{"user_id":"alice","plan":"pro"}}

{"timestamp":"2024-01-15T10:05:00Z","service":"search","level":"warn","message":"slow query"}
{"timestamp":"2024-01-15T10:06:00Z","service":"payment","level":"error","message":"charge declined","metadata":{"user_id":"alice"}}
"#;

// ============================================================
// Parsing
// ============================================================

#[test]
fn test_parse_jsonl_skips_blank_lines() {
    let events = parse_events(JSONL_FIXTURE).unwrap();

    assert_eq!(events.len(), 3);
    assert_eq!(events[0].action, "user login");
    assert_eq!(events[0].service, "auth");
    assert_eq!(events[0].status, Status::Success);
    assert_eq!(events[1].status, Status::Warning);
    assert_eq!(events[2].status, Status::Error);
}

#[test]
fn test_parse_json_array() {
    let input = r#"[
        {"timestamp":"2024-01-15T10:00:00Z","service":"auth","level":"info","message":"login"},
        {"timestamp":"2024-01-15T10:01:00Z","service":"auth","level":"error","message":"token expired"}
    ]"#;

    let events = parse_events(input).unwrap();
    assert_eq!(events.len(), 2);
    assert_eq!(events[1].action, "token expired");
    assert_eq!(events[1].status, Status::Error);
}

#[test]
fn test_missing_metadata_defaults_to_empty() {
    let events = parse_events(JSONL_FIXTURE).unwrap();
    assert!(events[1].metadata.is_empty());
}

#[test]
fn test_metadata_values_pass_through() {
    let events = parse_events(JSONL_FIXTURE).unwrap();
    assert_eq!(events[0].metadata_user_id(), Some("alice".to_string()));
    assert_eq!(
        events[0].metadata.get("plan").and_then(|v| v.as_str()),
        Some("pro")
    );
}

#[test]
fn test_unknown_record_fields_are_ignored() {
    let input = r#"{"timestamp":"2024-01-15T10:00:00Z","service":"auth","level":"info","message":"login","trace_id":"abc123","region":"eu-west-1"}"#;
    let events = parse_events(input).unwrap();
    assert_eq!(events.len(), 1);
}

// ============================================================
// Failure modes
// ============================================================

#[test]
fn test_malformed_line_reports_line_number() {
    let input = r#"{"timestamp":"2024-01-15T10:00:00Z","service":"auth","level":"info","message":"login"}
not json at all
{"timestamp":"2024-01-15T10:02:00Z","service":"auth","level":"info","message":"logout"}"#;

    let err = parse_events(input).unwrap_err();
    match &err {
        IngestError::Record { line, preview, .. } => {
            assert_eq!(*line, 2);
            assert!(preview.contains("not json"));
        }
        other => panic!("expected Record error, got {:?}", other),
    }
    assert!(err.to_string().contains("line 2"));
}

#[test]
fn test_unparseable_timestamp_is_rejected() {
    let input = r#"{"timestamp":"yesterday-ish","service":"auth","level":"info","message":"login"}"#;
    assert!(parse_events(input).is_err());
}

#[test]
fn test_missing_required_field_is_rejected() {
    let input = r#"{"timestamp":"2024-01-15T10:00:00Z","level":"info","message":"login"}"#;
    assert!(parse_events(input).is_err());
}

#[test]
fn test_malformed_array_is_rejected() {
    let err = parse_events(r#"[{"timestamp": 12}]"#).unwrap_err();
    assert!(matches!(err, IngestError::Array { .. }));
}

// ============================================================
// File loading
// ============================================================

#[test]
fn test_load_events_from_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("app.jsonl");
    fs::write(&path, JSONL_FIXTURE).unwrap();

    let events = load_events(&path).unwrap();
    assert_eq!(events.len(), 3);
}

#[test]
fn test_load_events_missing_file_names_path() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nope.jsonl");

    let err = load_events(&path).unwrap_err();
    assert!(matches!(err, IngestError::Read { .. }));
    assert!(err.to_string().contains("nope.jsonl"));
}

// ============================================================
// Fingerprinting
// ============================================================

#[test]
fn test_fingerprint_is_stable_and_content_sensitive() {
    let a = fingerprint(JSONL_FIXTURE.as_bytes());
    let b = fingerprint(JSONL_FIXTURE.as_bytes());
    let c = fingerprint(b"something else");

    assert_eq!(a, b);
    assert_ne!(a, c);
    assert_eq!(a.len(), 64);
    assert!(a.chars().all(|ch| ch.is_ascii_hexdigit()));
}
