//! Logging setup and small time helpers shared by both binaries.
//!
//! No domain logic should live here.

use chrono::{DateTime, Local, SecondsFormat, Utc};
use env_logger::{Env, Target};

/// Install the global logger.
///
/// Level defaults to `info`, override with `RUST_LOG`. Output goes to
/// stdout so progress narration and the final summary stay together.
///
pub fn init_logging() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .target(Target::Stdout)
        .init();
}

/// Current time as ISO-8601 UTC with millisecond precision.
///
/// Example: `2026-10-14T08:00:00.000Z`
///
pub fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Render a persisted ISO-8601 timestamp in local time for reports.
///
/// Format: `dd.mm.yyyy, HH:MM:SS`
///
/// Unparseable input is returned unchanged; the report should not
/// fail because of a cosmetic field.
///
pub fn display_timestamp(raw: &str) -> String {
    match DateTime::parse_from_rfc3339(raw) {
        Ok(ts) => ts
            .with_timezone(&Local)
            .format("%d.%m.%Y, %H:%M:%S")
            .to_string(),
        Err(_) => raw.to_string(),
    }
}
