//! Weekly allocator: greedy first-fit placement into a 7-day working window.
//!
//! Each day owns one capacity cursor (`TimeSlot`). Placing a task consumes
//! the front of the first day with enough room; cursors only move forward,
//! so same-day events never overlap and stay ordered by start time.
//!
//! The week inventory lives for one `allocate` call and is never shared.

use chrono::{Days, Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::ScheduleError;
use crate::task::Task;

pub const DAYS_PER_WEEK: usize = 7;

/// Daily open hours, `[day_start_hour, day_end_hour)` local time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkingWindow {
    pub day_start_hour: u32,
    pub day_end_hour: u32,
}

impl Default for WorkingWindow {
    fn default() -> Self {
        Self {
            day_start_hour: 9,
            day_end_hour: 18,
        }
    }
}

impl WorkingWindow {
    pub fn new(day_start_hour: u32, day_end_hour: u32) -> Result<Self, ScheduleError> {
        let window = Self {
            day_start_hour,
            day_end_hour,
        };
        window.validate()?;
        Ok(window)
    }

    pub fn validate(&self) -> Result<(), ScheduleError> {
        let reason = if self.day_end_hour > 24 {
            Some("end hour must be at most 24")
        } else if self.day_start_hour >= self.day_end_hour {
            Some("start hour must be before end hour")
        } else {
            None
        };
        match reason {
            Some(reason) => Err(ScheduleError::InvalidWindow {
                start: self.day_start_hour,
                end: self.day_end_hour,
                reason,
            }),
            None => Ok(()),
        }
    }

    /// Capacity of one full day.
    pub fn minutes(&self) -> i64 {
        (i64::from(self.day_end_hour) - i64::from(self.day_start_hour)) * 60
    }

    fn bounds_on(&self, day: NaiveDate) -> Option<(NaiveDateTime, NaiveDateTime)> {
        let midnight = day.and_time(NaiveTime::MIN);
        let start = midnight.checked_add_signed(Duration::hours(self.day_start_hour.into()))?;
        let end = midnight.checked_add_signed(Duration::hours(self.day_end_hour.into()))?;
        Some((start, end))
    }
}

/// Remaining contiguous capacity for one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeSlot {
    pub day: NaiveDate,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl TimeSlot {
    pub fn remaining_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes().max(0)
    }

    /// Consume `minutes` from the front of the slot, if they fit.
    pub fn take(&mut self, minutes: i64) -> Option<(NaiveDateTime, NaiveDateTime)> {
        if minutes > self.remaining_minutes() {
            return None;
        }
        let start = self.start;
        let end = start + Duration::minutes(minutes);
        self.start = end;
        Some((start, end))
    }
}

/// The week's open-time inventory: one cursor per day, Monday-first
/// relative to the week start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekInventory {
    slots: [TimeSlot; DAYS_PER_WEEK],
}

impl WeekInventory {
    /// Fails when any of the seven days (or their end bounds) falls outside
    /// the representable calendar.
    pub fn new(week_start: NaiveDate, window: WorkingWindow) -> Result<Self, ScheduleError> {
        let out_of_range = || ScheduleError::InvalidWeekStart(week_start);

        let mut slots = Vec::with_capacity(DAYS_PER_WEEK);
        for i in 0..DAYS_PER_WEEK as u64 {
            let day = week_start
                .checked_add_days(Days::new(i))
                .ok_or_else(out_of_range)?;
            let (start, end) = window.bounds_on(day).ok_or_else(out_of_range)?;
            slots.push(TimeSlot { day, start, end });
        }
        let slots: [TimeSlot; DAYS_PER_WEEK] = slots.try_into().map_err(|_| out_of_range())?;
        Ok(Self { slots })
    }

    pub fn slots(&self) -> &[TimeSlot] {
        &self.slots
    }

    /// First-fit: the earliest day whose remaining capacity holds `minutes`.
    pub fn place(&mut self, minutes: i64) -> Option<(NaiveDateTime, NaiveDateTime)> {
        self.slots
            .iter_mut()
            .find(|s| s.remaining_minutes() >= minutes)
            .and_then(|s| s.take(minutes))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacedEvent {
    pub task_id: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub summary: String,
}

impl PlacedEvent {
    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }

    pub fn day(&self) -> NaiveDate {
        self.start.date()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Allocation {
    /// Processing order, not start-time order.
    pub events: Vec<PlacedEvent>,
    pub unplaced: Vec<Task>,
}

/// Place already-ordered tasks into the week starting at `week_start`.
///
/// Tasks that fit no remaining slot are returned in `unplaced`; nothing is
/// split across days and there is no overflow beyond the seventh day.
pub fn allocate(
    ordered: &[Task],
    week_start: NaiveDate,
    window: WorkingWindow,
) -> Result<Allocation, ScheduleError> {
    let mut week = WeekInventory::new(week_start, window)?;
    let mut out = Allocation::default();

    for task in ordered {
        let minutes = task.effective_duration();
        match week.place(minutes) {
            Some((start, end)) => {
                debug!(task_id = %task.id, %start, %end, "placed task");
                out.events.push(PlacedEvent {
                    task_id: task.id.clone(),
                    start,
                    end,
                    summary: task.name.clone(),
                });
            }
            None => {
                warn!(task_id = %task.id, minutes, "no slot fits task this week");
                out.unplaced.push(task.clone());
            }
        }
    }

    Ok(out)
}
