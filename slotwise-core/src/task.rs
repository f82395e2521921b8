//! Task model for the weekly allocation engine.
//!
//! Records arrive from storage as loosely-typed snapshots. Every field that can
//! be malformed is normalized when read, never rewritten on the record itself.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use crate::time::parse_date;

/// Minutes substituted when a task has no usable duration.
pub const DEFAULT_DURATION_MINUTES: i64 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    #[default]
    Pending,
    Done,
}

/// Importance tier. Declaration order is rank order: `High` sorts first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Priority {
    High = 0,
    Medium = 1,
    Low = 2,
}

impl Priority {
    /// Case-insensitive; anything unrecognized (or missing) is `Medium`.
    pub fn parse_lenient(raw: Option<&str>) -> Self {
        match raw.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
            Some("high") => Priority::High,
            Some("low") => Priority::Low,
            _ => Priority::Medium,
        }
    }

    pub fn rank(self) -> u8 {
        self as u8
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }
}

/// A task record as held by storage.
///
/// Dates stay as strings so a bad value never prevents a backlog from loading;
/// use the accessor methods to read normalized values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,

    #[serde(rename = "task_name")]
    pub name: String,

    /// Declared minutes, as stored. Non-numeric input decodes as `None`.
    #[serde(default, deserialize_with = "lenient_minutes")]
    pub duration_minutes: Option<i64>,

    #[serde(default, deserialize_with = "lenient_text")]
    pub priority: Option<String>,

    /// `YYYY-MM-DD`.
    #[serde(default, deserialize_with = "lenient_text")]
    pub deadline: Option<String>,

    /// `YYYY-MM-DD`. Displayed only; placement ignores it.
    #[serde(default, deserialize_with = "lenient_text")]
    pub scheduled_date: Option<String>,

    #[serde(default, deserialize_with = "lenient_status")]
    pub status: TaskStatus,

    #[serde(default, deserialize_with = "lenient_text")]
    pub created_at: Option<String>,
}

impl Task {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            duration_minutes: None,
            priority: None,
            deadline: None,
            scheduled_date: None,
            status: TaskStatus::Pending,
            created_at: None,
        }
    }

    pub fn with_duration(mut self, minutes: i64) -> Self {
        self.duration_minutes = Some(minutes);
        self
    }

    pub fn with_priority(mut self, priority: impl Into<String>) -> Self {
        self.priority = Some(priority.into());
        self
    }

    pub fn with_deadline(mut self, deadline: impl Into<String>) -> Self {
        self.deadline = Some(deadline.into());
        self
    }

    pub fn with_scheduled_date(mut self, date: impl Into<String>) -> Self {
        self.scheduled_date = Some(date.into());
        self
    }

    /// Minutes used for placement: the declared value if positive, else the default.
    pub fn effective_duration(&self) -> i64 {
        match self.duration_minutes {
            Some(m) if m > 0 => m,
            _ => DEFAULT_DURATION_MINUTES,
        }
    }

    pub fn priority_tier(&self) -> Priority {
        Priority::parse_lenient(self.priority.as_deref())
    }

    pub fn deadline_date(&self) -> Option<NaiveDate> {
        self.deadline.as_deref().and_then(parse_date)
    }

    pub fn scheduled_on(&self) -> Option<NaiveDate> {
        self.scheduled_date.as_deref().and_then(parse_date)
    }
}

/// Typed partial update over the recognized task fields.
///
/// Unknown keys are rejected at decode time. An empty string for `deadline`
/// or `scheduled_date` clears the value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TaskPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
}

impl TaskPatch {
    pub fn is_empty(&self) -> bool {
        *self == TaskPatch::default()
    }

    pub fn apply_to(&self, task: &mut Task) {
        if let Some(name) = &self.task_name {
            task.name = name.clone();
        }
        if let Some(minutes) = self.duration_minutes {
            task.duration_minutes = Some(minutes);
        }
        if let Some(priority) = &self.priority {
            task.priority = Some(priority.clone());
        }
        if let Some(deadline) = &self.deadline {
            task.deadline = non_empty(deadline);
        }
        if let Some(date) = &self.scheduled_date {
            task.scheduled_date = non_empty(date);
        }
        if let Some(status) = self.status {
            task.status = status;
        }
    }
}

fn non_empty(s: &str) -> Option<String> {
    let s = s.trim();
    (!s.is_empty()).then(|| s.to_string())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawValue {
    Int(i64),
    Float(f64),
    Text(String),
    Other(serde::de::IgnoredAny),
}

fn lenient_minutes<'de, D: Deserializer<'de>>(d: D) -> Result<Option<i64>, D::Error> {
    Ok(match Option::<RawValue>::deserialize(d)? {
        Some(RawValue::Int(m)) => Some(m),
        Some(RawValue::Float(f)) if f.is_finite() => Some(f.trunc() as i64),
        Some(RawValue::Text(s)) => s.trim().parse::<i64>().ok(),
        _ => None,
    })
}

fn lenient_text<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Ok(match Option::<RawValue>::deserialize(d)? {
        Some(RawValue::Text(s)) => Some(s),
        _ => None,
    })
}

fn lenient_status<'de, D: Deserializer<'de>>(d: D) -> Result<TaskStatus, D::Error> {
    Ok(match Option::<RawValue>::deserialize(d)? {
        Some(RawValue::Text(s)) if s.trim().eq_ignore_ascii_case("done") => TaskStatus::Done,
        _ => TaskStatus::Pending,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_is_case_insensitive_and_defaults_to_medium() {
        assert_eq!(Priority::parse_lenient(Some("HIGH")), Priority::High);
        assert_eq!(Priority::parse_lenient(Some(" Low ")), Priority::Low);
        assert_eq!(Priority::parse_lenient(Some("urgent")), Priority::Medium);
        assert_eq!(Priority::parse_lenient(None), Priority::Medium);
        assert!(Priority::High < Priority::Medium && Priority::Medium < Priority::Low);
    }

    #[test]
    fn effective_duration_falls_back_to_default() {
        assert_eq!(Task::new("t", "x").effective_duration(), 60);
        assert_eq!(Task::new("t", "x").with_duration(0).effective_duration(), 60);
        assert_eq!(Task::new("t", "x").with_duration(-15).effective_duration(), 60);
        assert_eq!(Task::new("t", "x").with_duration(25).effective_duration(), 25);
    }

    #[test]
    fn unparsable_deadline_reads_as_none() {
        let t = Task::new("t", "x").with_deadline("next tuesday");
        assert_eq!(t.deadline_date(), None);
        assert_eq!(t.deadline.as_deref(), Some("next tuesday"));

        let t = Task::new("t", "x").with_deadline("2026-10-30");
        assert_eq!(t.deadline_date(), NaiveDate::from_ymd_opt(2026, 10, 30));
    }

    #[test]
    fn decodes_loose_wire_records() {
        let json = r#"[
            {"id": "a", "task_name": "A", "duration_minutes": "45", "priority": "High"},
            {"id": "b", "task_name": "B", "duration_minutes": "soon", "status": "weird"},
            {"id": "c", "task_name": "C", "duration_minutes": null, "status": "done"},
            {"id": "d", "task_name": "D", "duration_minutes": 30.0}
        ]"#;
        let tasks: Vec<Task> = serde_json::from_str(json).unwrap();
        assert_eq!(tasks[0].duration_minutes, Some(45));
        assert_eq!(tasks[0].priority_tier(), Priority::High);
        assert_eq!(tasks[1].duration_minutes, None);
        assert_eq!(tasks[1].effective_duration(), 60);
        assert_eq!(tasks[1].status, TaskStatus::Pending);
        assert_eq!(tasks[2].status, TaskStatus::Done);
        assert_eq!(tasks[3].duration_minutes, Some(30));
    }

    #[test]
    fn fractional_minutes_truncate() {
        let t: Task =
            serde_json::from_str(r#"{"id": "f", "task_name": "F", "duration_minutes": 30.7}"#)
                .unwrap();
        assert_eq!(t.duration_minutes, Some(30));
    }

    #[test]
    fn non_string_text_fields_decode_as_none() {
        let json = r#"{"id": "x", "task_name": "X", "priority": 1, "deadline": 20261030,
                       "scheduled_date": ["2026-10-28"], "created_at": {"at": 0}}"#;
        let t: Task = serde_json::from_str(json).unwrap();
        assert_eq!(t.priority, None);
        assert_eq!(t.priority_tier(), Priority::Medium);
        assert_eq!(t.deadline, None);
        assert_eq!(t.scheduled_date, None);
        assert_eq!(t.created_at, None);
    }

    #[test]
    fn patch_rejects_unknown_fields() {
        let err = serde_json::from_str::<TaskPatch>(r#"{"priority": "low", "owner": "me"}"#);
        assert!(err.is_err());

        let patch: TaskPatch = serde_json::from_str(r#"{"priority": "low"}"#).unwrap();
        assert_eq!(patch.priority.as_deref(), Some("low"));
        assert!(!patch.is_empty());
        assert!(TaskPatch::default().is_empty());
    }

    #[test]
    fn patch_applies_present_fields_and_clears_empty_dates() {
        let mut t = Task::new("t1", "write report")
            .with_duration(30)
            .with_deadline("2026-10-30")
            .with_scheduled_date("2026-10-28");

        let patch = TaskPatch {
            duration_minutes: Some(90),
            deadline: Some(String::new()),
            status: Some(TaskStatus::Done),
            ..TaskPatch::default()
        };
        patch.apply_to(&mut t);

        assert_eq!(t.name, "write report");
        assert_eq!(t.duration_minutes, Some(90));
        assert_eq!(t.deadline, None);
        assert_eq!(t.scheduled_date.as_deref(), Some("2026-10-28"));
        assert_eq!(t.status, TaskStatus::Done);
    }
}
