//! CLI subcommands for reconstructing and inspecting sessions.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Subcommand, ValueEnum};
use colored::Colorize;

use journey_sessions::{
    apply, load_events, segment, summarize, to_csv, AnalyticsSummary, SessionFilter,
    SessionSummary, Status, UserSession,
};

use crate::config::JourneyConfig;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List reconstructed sessions
    List {
        /// Log file to read (falls back to `data` in journey.toml)
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Inactivity gap in seconds that closes a session
        #[arg(long)]
        timeout: Option<i64>,

        /// Match against user ids, actions, and services
        #[arg(long)]
        search: Option<String>,

        /// Keep only sessions with this status
        #[arg(long, value_enum, default_value = "all")]
        status: StatusChoice,

        /// Sessions starting on or after this date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,

        /// Sessions starting on or before this date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,

        /// Minimum duration in minutes
        #[arg(long)]
        min_minutes: Option<f64>,

        /// Maximum duration in minutes
        #[arg(long)]
        max_minutes: Option<f64>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show one session's event timeline
    Show {
        /// Session ID (launches interactive picker if omitted)
        id: Option<String>,

        /// Log file to read (falls back to `data` in journey.toml)
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Inactivity gap in seconds that closes a session
        #[arg(long)]
        timeout: Option<i64>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show aggregate statistics for matching sessions
    Stats {
        /// Log file to read (falls back to `data` in journey.toml)
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Inactivity gap in seconds that closes a session
        #[arg(long)]
        timeout: Option<i64>,

        /// Match against user ids, actions, and services
        #[arg(long)]
        search: Option<String>,

        /// Keep only sessions with this status
        #[arg(long, value_enum, default_value = "all")]
        status: StatusChoice,

        /// Sessions starting on or after this date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,

        /// Sessions starting on or before this date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,

        /// Minimum duration in minutes
        #[arg(long)]
        min_minutes: Option<f64>,

        /// Maximum duration in minutes
        #[arg(long)]
        max_minutes: Option<f64>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Export matching sessions as CSV
    Export {
        /// Log file to read (falls back to `data` in journey.toml)
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Inactivity gap in seconds that closes a session
        #[arg(long)]
        timeout: Option<i64>,

        /// Match against user ids, actions, and services
        #[arg(long)]
        search: Option<String>,

        /// Keep only sessions with this status
        #[arg(long, value_enum, default_value = "all")]
        status: StatusChoice,

        /// Sessions starting on or after this date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,

        /// Sessions starting on or before this date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,

        /// Minimum duration in minutes
        #[arg(long)]
        min_minutes: Option<f64>,

        /// Maximum duration in minutes
        #[arg(long)]
        max_minutes: Option<f64>,

        /// Write to this path instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Serve the session API over HTTP with live reload
    Serve {
        /// Log file to read (falls back to `data` in journey.toml)
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Inactivity gap in seconds that closes a session
        #[arg(long)]
        timeout: Option<i64>,

        /// Bind address
        #[arg(long)]
        host: Option<String>,

        /// Bind port
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Write a starter journey.toml in the working directory
    Init,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum StatusChoice {
    All,
    Success,
    Warning,
    Error,
}

impl From<StatusChoice> for Option<Status> {
    fn from(choice: StatusChoice) -> Self {
        match choice {
            StatusChoice::All => None,
            StatusChoice::Success => Some(Status::Success),
            StatusChoice::Warning => Some(Status::Warning),
            StatusChoice::Error => Some(Status::Error),
        }
    }
}

pub async fn handle_command(command: Command) -> Result<()> {
    match command {
        Command::List {
            file,
            timeout,
            search,
            status,
            from,
            to,
            min_minutes,
            max_minutes,
            json,
        } => {
            let sessions = load_sessions(file, timeout)?;
            let filter = build_filter(search, status, from, to, min_minutes, max_minutes)?;
            let filtered = apply(&sessions, &filter);

            if json {
                let summaries: Vec<SessionSummary> =
                    filtered.iter().map(SessionSummary::from).collect();
                println!("{}", serde_json::to_string_pretty(&summaries)?);
            } else if filtered.is_empty() {
                println!("{}", "No sessions found.".dimmed());
            } else {
                print_sessions_table(&filtered);
            }
        }
        Command::Show { id, file, timeout, json } => {
            let sessions = load_sessions(file, timeout)?;
            let id = resolve_session_id(&sessions, id)?;
            let session = sessions
                .iter()
                .find(|s| s.id == id)
                .with_context(|| format!("No session with id {}", id))?;

            if json {
                println!("{}", serde_json::to_string_pretty(session)?);
            } else {
                print_session_detail(session);
            }
        }
        Command::Stats {
            file,
            timeout,
            search,
            status,
            from,
            to,
            min_minutes,
            max_minutes,
            json,
        } => {
            let sessions = load_sessions(file, timeout)?;
            let filter = build_filter(search, status, from, to, min_minutes, max_minutes)?;
            let filtered = apply(&sessions, &filter);
            let summary = summarize(&filtered);

            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                print_stats(&summary);
            }
        }
        Command::Export {
            file,
            timeout,
            search,
            status,
            from,
            to,
            min_minutes,
            max_minutes,
            output,
        } => {
            let sessions = load_sessions(file, timeout)?;
            let filter = build_filter(search, status, from, to, min_minutes, max_minutes)?;
            let filtered = apply(&sessions, &filter);
            let csv = to_csv(&filtered);

            match output {
                Some(path) => {
                    std::fs::write(&path, &csv)
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    eprintln!(
                        "  {} Exported {} sessions to {}",
                        "✓".bright_green(),
                        filtered.len(),
                        path.display()
                    );
                }
                None => println!("{}", csv),
            }
        }
        Command::Serve { file, timeout, host, port } => {
            crate::serve::handle_serve_command(file, timeout, host, port).await?;
        }
        Command::Init => {
            crate::init::handle_init()?;
        }
    }

    Ok(())
}

/// Read the log file named by flag or config and segment it into sessions.
fn load_sessions(file: Option<PathBuf>, timeout_secs: Option<i64>) -> Result<Vec<UserSession>> {
    let working_dir = std::env::current_dir().context("Failed to get working directory")?;
    let config = JourneyConfig::load(&working_dir)?.unwrap_or_default();

    let path = config.data_file(file)?;
    let timeout = config.segment_timeout(timeout_secs);

    let events = load_events(&path)?;
    tracing::debug!(
        "segmenting {} events with a {}s timeout",
        events.len(),
        timeout.num_seconds()
    );
    Ok(segment(events, timeout))
}

fn build_filter(
    search: Option<String>,
    status: StatusChoice,
    from: Option<String>,
    to: Option<String>,
    min_minutes: Option<f64>,
    max_minutes: Option<f64>,
) -> Result<SessionFilter> {
    use chrono::{NaiveDate, TimeZone, Utc};

    let from = from
        .map(|s| {
            NaiveDate::parse_from_str(&s, "%Y-%m-%d")
                .map(|d| Utc.from_utc_datetime(&d.and_hms_opt(0, 0, 0).unwrap()))
                .map_err(|e| anyhow::anyhow!("Invalid --from date: {}", e))
        })
        .transpose()?;

    let to = to
        .map(|s| {
            NaiveDate::parse_from_str(&s, "%Y-%m-%d")
                .map(|d| Utc.from_utc_datetime(&d.and_hms_opt(23, 59, 59).unwrap()))
                .map_err(|e| anyhow::anyhow!("Invalid --to date: {}", e))
        })
        .transpose()?;

    Ok(SessionFilter {
        search,
        status: status.into(),
        from,
        to,
        min_minutes,
        max_minutes,
    })
}

fn resolve_session_id(sessions: &[UserSession], id: Option<String>) -> Result<String> {
    if let Some(id) = id {
        return Ok(id);
    }

    // Interactive picker
    if sessions.is_empty() {
        anyhow::bail!("No sessions found.");
    }

    let items: Vec<String> = sessions
        .iter()
        .map(|s| {
            let ts = s.start_time.format("%Y-%m-%d %H:%M");
            format!(
                "{} | {:<8} | {} ({} events, {})",
                ts,
                s.status.to_string(),
                preview(&s.user_id, 20),
                s.events.len(),
                format_duration(s.duration_secs)
            )
        })
        .collect();

    let selection = dialoguer::FuzzySelect::new()
        .with_prompt("Select a session")
        .items(&items)
        .default(0)
        .interact()?;

    Ok(sessions[selection].id.clone())
}

fn print_sessions_table(sessions: &[UserSession]) {
    println!(
        "{:<17} {:<14} {:<9} {:<10} {:<9} {}",
        "START".dimmed(),
        "USER".dimmed(),
        "STATUS".dimmed(),
        "DURATION".dimmed(),
        "SERVICES".dimmed(),
        "EVENTS".dimmed(),
    );

    for s in sessions {
        let ts = s.start_time.format("%Y-%m-%d %H:%M").to_string();
        let status_colored = match s.status {
            Status::Success => "success".bright_green().to_string(),
            Status::Warning => "warning".bright_yellow().to_string(),
            Status::Error => "error".bright_red().to_string(),
        };
        let user = preview(&s.user_id, 13);

        println!(
            "{:<17} {:<14} {:<9} {:<10} {:<9} {}",
            ts,
            user,
            status_colored,
            format_duration(s.duration_secs),
            s.service_count,
            s.events.len()
        );
    }
}

fn print_session_detail(session: &UserSession) {
    println!("{}", "=== Session Detail ===".bright_blue().bold());
    println!("{}  {}", "ID:".dimmed(), session.id);
    println!("{}  {}", "User:".dimmed(), session.user_id);
    println!(
        "{}  {}",
        "Started:".dimmed(),
        session.start_time.format("%Y-%m-%d %H:%M:%S UTC")
    );
    println!(
        "{}  {}",
        "Ended:".dimmed(),
        session.end_time.format("%Y-%m-%d %H:%M:%S UTC")
    );
    println!(
        "{}  {}",
        "Status:".dimmed(),
        match session.status {
            Status::Success => "success".bright_green().to_string(),
            Status::Warning => "warning".bright_yellow().to_string(),
            Status::Error => "error".bright_red().to_string(),
        }
    );
    println!(
        "{}  {}",
        "Duration:".dimmed(),
        format_duration(session.duration_secs)
    );
    println!("{}  {}", "Services:".dimmed(), session.service_count);

    println!();
    println!(
        "{}",
        format!("--- Events ({}) ---", session.events.len()).dimmed()
    );
    for event in &session.events {
        let glyph = match event.status {
            Status::Success => "✓".bright_green(),
            Status::Warning => "!".bright_yellow(),
            Status::Error => "✗".bright_red(),
        };
        println!(
            "  {} {} {:<16} {}",
            event.timestamp.format("%H:%M:%S").to_string().dimmed(),
            glyph,
            preview(&event.service, 16),
            preview(&event.action, 70)
        );
    }
}

fn print_stats(summary: &AnalyticsSummary) {
    println!("{}", "=== Session Statistics ===".bright_blue().bold());
    println!("{}  {}", "Total Sessions:".dimmed(), summary.total_sessions);
    println!("{}  {}", "Unique Users:".dimmed(), summary.unique_users);
    println!(
        "{}  {}",
        "Avg Duration:".dimmed(),
        format_duration(summary.avg_duration_secs)
    );

    println!();
    println!("{}", "By Status:".dimmed());
    println!(
        "  {:<10} {}",
        "success".bright_green(),
        summary.status_counts.success
    );
    println!(
        "  {:<10} {}",
        "warning".bright_yellow(),
        summary.status_counts.warning
    );
    println!(
        "  {:<10} {}",
        "error".bright_red(),
        summary.status_counts.error
    );

    let active: Vec<_> = summary.by_hour.iter().filter(|b| b.count > 0).collect();
    if !active.is_empty() {
        println!();
        println!("{}", "By Start Hour (local):".dimmed());
        for bucket in active {
            println!("  {:02}:00  {}", bucket.hour, bucket.count);
        }
    }
}

fn format_duration(secs: f64) -> String {
    if secs < 60.0 {
        format!("{:.0}s", secs)
    } else {
        let mins = (secs / 60.0).floor() as u64;
        let remaining_secs = (secs % 60.0) as u64;
        format!("{}m {}s", mins, remaining_secs)
    }
}

fn preview(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        format!("{}...", text.chars().take(max).collect::<String>())
    } else {
        text.to_string()
    }
}
