//! slotwise-core: prioritization and weekly allocation engine.

pub mod allocator;
pub mod calendar;
pub mod engine;
pub mod error;
pub mod prioritizer;
pub mod task;
pub mod time;

pub use allocator::{
    allocate, Allocation, PlacedEvent, TimeSlot, WeekInventory, WorkingWindow, DAYS_PER_WEEK,
};
pub use calendar::{render_ics, replace_file, serialize, write_ics};
pub use engine::{produce_schedule, ScheduleConfig, TaskSource, WeeklySchedule};
pub use error::ScheduleError;
pub use prioritizer::{order, rank, rank_key, OrderedTask, RankKey};
pub use task::{Priority, Task, TaskPatch, TaskStatus, DEFAULT_DURATION_MINUTES};
pub use time::{local_today, next_week_start, parse_date};
