//! Schedule engine: "produce this week's schedule".
//!
//! Wires the pipeline end to end: snapshot → Prioritizer → Allocator →
//! Serializer → artifact. Storage is reached only through `TaskSource`.

use std::convert::Infallible;
use std::path::PathBuf;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::allocator::{allocate, Allocation, PlacedEvent, WorkingWindow};
use crate::calendar::write_ics;
use crate::error::ScheduleError;
use crate::prioritizer::order;
use crate::task::Task;
use crate::time::{local_today, next_week_start};

/// Read contract over the task store.
pub trait TaskSource {
    type Error: std::error::Error + Send + Sync + 'static;

    /// A complete snapshot of the backlog, in no particular order.
    fn fetch_all(&self) -> Result<Vec<Task>, Self::Error>;
}

impl TaskSource for [Task] {
    type Error = Infallible;

    fn fetch_all(&self) -> Result<Vec<Task>, Self::Error> {
        Ok(self.to_vec())
    }
}

impl TaskSource for Vec<Task> {
    type Error = Infallible;

    fn fetch_all(&self) -> Result<Vec<Task>, Self::Error> {
        Ok(self.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleConfig {
    pub window: WorkingWindow,
    /// Where the calendar artifact is written.
    pub output_path: PathBuf,
    /// IANA zone deciding what "today" is when no start date is given.
    pub timezone: String,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            window: WorkingWindow::default(),
            output_path: PathBuf::from("data/schedule.ics"),
            timezone: "UTC".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeeklySchedule {
    pub week_start: NaiveDate,
    pub events: Vec<PlacedEvent>,
    /// Tasks that fit no slot this week. Not written to the artifact.
    pub unplaced: Vec<Task>,
    pub artifact: PathBuf,
}

impl WeeklySchedule {
    pub fn is_complete(&self) -> bool {
        self.unplaced.is_empty()
    }
}

/// Run one full allocation and write the calendar artifact.
///
/// `start` overrides the week start; otherwise the week begins the Monday
/// strictly after today in `config.timezone`. `now` also stamps the artifact.
pub fn produce_schedule<S: TaskSource + ?Sized>(
    source: &S,
    config: &ScheduleConfig,
    start: Option<NaiveDate>,
    now: DateTime<Utc>,
) -> Result<WeeklySchedule, ScheduleError> {
    config.window.validate()?;

    let week_start = match start {
        Some(d) => d,
        None => {
            let today = local_today(now, &config.timezone)?;
            next_week_start(today).ok_or(ScheduleError::InvalidWeekStart(today))?
        }
    };

    let tasks = source
        .fetch_all()
        .map_err(|e| ScheduleError::Source(Box::new(e)))?;

    let ordered = order(&tasks);
    let Allocation { events, unplaced } = allocate(&ordered, week_start, config.window)?;

    write_ics(&config.output_path, &events, now.naive_utc())?;

    info!(
        %week_start,
        tasks = tasks.len(),
        placed = events.len(),
        unplaced = unplaced.len(),
        artifact = %config.output_path.display(),
        "weekly schedule produced"
    );

    Ok(WeeklySchedule {
        week_start,
        events,
        unplaced,
        artifact: config.output_path.clone(),
    })
}
