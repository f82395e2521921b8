use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use slotwise_core::{produce_schedule, PlacedEvent, ScheduleConfig, WeeklySchedule};
use slotwise_store::JsonTaskStore;
use std::path::PathBuf;

/// Build next week's calendar from the store and print what happened.
pub fn run(
    store: &JsonTaskStore,
    mut config: ScheduleConfig,
    start: Option<NaiveDate>,
    out: Option<PathBuf>,
) -> Result<()> {
    if let Some(out) = out {
        config.output_path = out;
    }

    let schedule = produce_schedule(store, &config, start, Utc::now())
        .with_context(|| format!("scheduling tasks from {}", store.path().display()))?;

    print!("{}", render_summary(&schedule));
    Ok(())
}

fn render_summary(s: &WeeklySchedule) -> String {
    let mut out = format!("# Week of {}\n\n", s.week_start.format("%a %Y-%m-%d"));

    if s.events.is_empty() {
        out.push_str("(nothing scheduled)\n");
    }
    for e in &s.events {
        out.push_str(&format_event(e));
        out.push('\n');
    }

    if !s.unplaced.is_empty() {
        out.push_str(&format!("\nUnplaced ({}):\n", s.unplaced.len()));
        for t in &s.unplaced {
            out.push_str(&format!("- {} ({} min)\n", t.name, t.effective_duration()));
        }
    }

    out.push_str(&format!("\nSchedule written to {}\n", s.artifact.display()));
    out
}

fn format_event(e: &PlacedEvent) -> String {
    format!(
        "{} {}-{}  {}",
        e.start.format("%a %Y-%m-%d"),
        e.start.format("%H:%M"),
        e.end.format("%H:%M"),
        e.summary
    )
}
