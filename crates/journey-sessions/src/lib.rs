//! Session reconstruction over flat event logs.
//!
//! Turns a finite collection of timestamped log events into bounded user
//! sessions via an inactivity-timeout window, then filters, aggregates,
//! and exports them. The pipeline (`segment` -> `apply` -> `summarize` /
//! `to_csv`) is pure and batch: callers own caching and re-invocation.

pub mod analytics;
pub mod export;
pub mod filter;
pub mod ingest;
pub mod segment;
pub mod types;
pub mod watch;

pub use analytics::summarize;
pub use export::{to_csv, CSV_HEADER};
pub use filter::apply;
pub use ingest::{fingerprint, load_events, parse_events, IngestError};
pub use segment::{default_timeout, segment, segment_default, DEFAULT_TIMEOUT_SECS};
pub use types::{
    AnalyticsSummary, HourCount, LogEvent, LogRecord, ParseStatusError, SessionFilter,
    SessionSummary, Status, StatusCounts, UserSession, ANONYMOUS_USER,
};
pub use watch::{DatasetEvent, DatasetWatcher};
