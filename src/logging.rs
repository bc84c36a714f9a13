//! Operational log setup and marker lines
//!
//! Markers are the line-oriented `key=value` records operators watch for:
//! `starting=`, `started=`, `checking=` and `ALARM`. They go to their own
//! target, which stays enabled whatever level the rest of the log runs at.

use anyhow::{Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use tracing::{info, Subscriber};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Target of every marker event
pub const MARKER_TARGET: &str = "detector::marker";

/// Marker timestamp: RFC 3339, UTC, millisecond precision
pub fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn log_starting(at: DateTime<Utc>) {
    info!(target: MARKER_TARGET, starting = %timestamp(at));
}

pub fn log_started(at: DateTime<Utc>) {
    info!(target: MARKER_TARGET, started = %timestamp(at));
}

/// `RUST_LOG` if set, otherwise `default_level`, with markers always on
pub fn env_filter(default_level: &str) -> Result<EnvFilter> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .context("invalid log level")?;
    let markers = format!("{}=info", MARKER_TARGET)
        .parse()
        .context("invalid marker directive")?;
    Ok(filter.add_directive(markers))
}

/// Undecorated output: no timestamp, level, target or colour, so markers
/// come out as bare `key=value` lines.
pub fn plain_subscriber<W>(filter: EnvFilter, writer: W) -> impl Subscriber + Send + Sync + 'static
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    FmtSubscriber::builder()
        .with_env_filter(filter)
        .without_time()
        .with_level(false)
        .with_target(false)
        .with_ansi(false)
        .with_writer(writer)
        .finish()
}

/// Decorated output for `--debug`/`--trace`: timestamps, levels, thread ids
/// and source locations.
pub fn verbose_subscriber(filter: EnvFilter) -> impl Subscriber + Send + Sync + 'static {
    FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .finish()
}
