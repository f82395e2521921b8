//! Failure signals for a schedule run.
//!
//! A run that leaves tasks unplaced is a success; these variants cover runs
//! that could not produce a schedule at all.

use std::io;
use std::path::PathBuf;

use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("invalid working window {start}:00-{end}:00: {reason}")]
    InvalidWindow {
        start: u32,
        end: u32,
        reason: &'static str,
    },

    #[error("week starting {0} runs past the supported calendar range")]
    InvalidWeekStart(NaiveDate),

    #[error("invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("failed to fetch tasks: {0}")]
    Source(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("failed to write calendar artifact {}: {source}", path.display())]
    ArtifactWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
