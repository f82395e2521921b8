//! Calendar serializer: placed events to a minimal ICS document.
//!
//! Notes:
//! - DTSTART/DTEND are floating local time (no `Z`, no TZID).
//! - UID is the task id; a task is placed at most once per run.
//! - DTSTAMP is the generation instant, so it is the only field that
//!   differs between two renders of the same events.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{NaiveDateTime, Utc};
use tracing::debug;

use crate::allocator::PlacedEvent;
use crate::error::ScheduleError;
use crate::time::to_ical_datetime;

pub const PRODID: &str = "-//slotwise//EN";

/// Render events with an explicit generation timestamp.
pub fn render_ics(events: &[PlacedEvent], generated_at: NaiveDateTime) -> String {
    let stamp = to_ical_datetime(generated_at);

    let mut s = String::new();
    s.push_str("BEGIN:VCALENDAR\nVERSION:2.0\n");
    s.push_str(&format!("PRODID:{PRODID}\n"));

    for e in events {
        s.push_str("BEGIN:VEVENT\n");
        s.push_str(&format!("UID:{}\n", escape_ics(&e.task_id)));
        s.push_str(&format!("DTSTAMP:{stamp}\n"));
        s.push_str(&format!("DTSTART:{}\n", to_ical_datetime(e.start)));
        s.push_str(&format!("DTEND:{}\n", to_ical_datetime(e.end)));
        s.push_str(&format!("SUMMARY:{}\n", escape_ics(&e.summary)));
        s.push_str("END:VEVENT\n");
    }

    s.push_str("END:VCALENDAR\n");
    s
}

/// Render events stamped with the current UTC instant.
pub fn serialize(events: &[PlacedEvent]) -> String {
    render_ics(events, Utc::now().naive_utc())
}

/// Render and persist the calendar at `path`, replacing any previous file.
pub fn write_ics(
    path: &Path,
    events: &[PlacedEvent],
    generated_at: NaiveDateTime,
) -> Result<String, ScheduleError> {
    let ics = render_ics(events, generated_at);
    replace_file(path, ics.as_bytes()).map_err(|source| ScheduleError::ArtifactWrite {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), events = events.len(), "wrote calendar");
    Ok(ics)
}

/// Whole-file replace: write a sibling temp file, then rename it over `path`.
///
/// Parent directories are created as needed. On failure the temp file is
/// removed and `path` is left as it was.
pub fn replace_file(path: &Path, contents: &[u8]) -> io::Result<()> {
    let file_name = path.file_name().ok_or_else(|| {
        io::Error::new(io::ErrorKind::InvalidInput, "path has no file name")
    })?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let mut tmp_name = std::ffi::OsString::from(".");
    tmp_name.push(file_name);
    tmp_name.push(".tmp");
    let tmp: PathBuf = path.with_file_name(tmp_name);

    let result = write_then_rename(&tmp, path, contents);
    if result.is_err() {
        let _ = fs::remove_file(&tmp);
    }
    result
}

fn write_then_rename(tmp: &Path, path: &Path, contents: &[u8]) -> io::Result<()> {
    {
        let mut f = File::create(tmp)?;
        f.write_all(contents)?;
        f.sync_all()?;
    }
    fs::rename(tmp, path)
}

fn escape_ics(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('\r', "")
        .replace('\n', "\\n")
        .replace(',', "\\,")
        .replace(';', "\\;")
}
