//! Prioritizer: a strict, side-effect free ordering of the backlog.
//!
//! Rank key, compared field by field:
//! - deadline ASC (no deadline sorts as the far future)
//! - priority ASC (high first)
//! - declared duration ASC (missing or non-positive sorts last)
//!
//! Urgency dominates importance, which dominates "quick wins first".

use chrono::NaiveDate;

use crate::task::{Priority, Task};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RankKey {
    pub deadline: NaiveDate,
    pub priority: Priority,
    pub duration: i64,
}

/// A task paired with the key it was ranked by.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderedTask {
    pub task: Task,
    pub key: RankKey,
}

pub fn rank_key(task: &Task) -> RankKey {
    RankKey {
        deadline: task.deadline_date().unwrap_or(NaiveDate::MAX),
        priority: task.priority_tier(),
        // Ordering only; allocation still uses `effective_duration`.
        duration: match task.duration_minutes {
            Some(m) if m > 0 => m,
            _ => i64::MAX,
        },
    }
}

/// Rank tasks without touching the input. Equal keys keep input order.
pub fn rank(tasks: &[Task]) -> Vec<OrderedTask> {
    let mut ranked: Vec<OrderedTask> = tasks
        .iter()
        .map(|t| OrderedTask {
            key: rank_key(t),
            task: t.clone(),
        })
        .collect();
    ranked.sort_by_key(|o| o.key);
    ranked
}

pub fn order(tasks: &[Task]) -> Vec<Task> {
    rank(tasks).into_iter().map(|o| o.task).collect()
}
