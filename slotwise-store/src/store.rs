//! JsonTaskStore: the task backlog as a single JSON array on disk.
//!
//! Every mutation is load → modify → whole-file replace. There is no locking;
//! callers that need a consistent schedule pass the engine one snapshot.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use slotwise_core::{replace_file, Task, TaskPatch, TaskSource, TaskStatus};
use tracing::debug;

use crate::error::StoreError;

/// Fields accepted when creating a task.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTask {
    pub task_name: String,
    pub duration_minutes: Option<i64>,
    pub priority: Option<String>,
    pub deadline: Option<String>,
    pub scheduled_date: Option<String>,
}

#[derive(Debug, Clone)]
pub struct JsonTaskStore {
    path: PathBuf,
}

impl JsonTaskStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All records. A missing or blank file is an empty backlog.
    pub fn list(&self) -> Result<Vec<Task>, StoreError> {
        let s = match fs::read_to_string(&self.path) {
            Ok(s) => s,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(StoreError::Read {
                    path: self.path.clone(),
                    source,
                });
            }
        };
        if s.trim().is_empty() {
            return Ok(Vec::new());
        }

        let tasks: Vec<Task> = serde_json::from_str(&s).map_err(|source| StoreError::Json {
            path: self.path.clone(),
            source,
        })?;
        debug!(path = %self.path.display(), count = tasks.len(), "loaded tasks");
        Ok(tasks)
    }

    pub fn get(&self, id: &str) -> Result<Option<Task>, StoreError> {
        Ok(self.list()?.into_iter().find(|t| t.id == id))
    }

    pub fn add(&self, new: NewTask) -> Result<Task, StoreError> {
        let name = new.task_name.trim();
        if name.is_empty() {
            return Err(StoreError::EmptyName);
        }

        let task = Task {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.to_string(),
            duration_minutes: new.duration_minutes,
            priority: Some(new.priority.unwrap_or_else(|| "medium".to_string())),
            deadline: new.deadline,
            scheduled_date: new.scheduled_date,
            status: TaskStatus::Pending,
            created_at: Some(Utc::now().to_rfc3339()),
        };

        let mut tasks = self.list()?;
        tasks.push(task.clone());
        self.save(&tasks)?;
        Ok(task)
    }

    /// Apply a typed partial update and return the updated record.
    pub fn update(&self, id: &str, patch: &TaskPatch) -> Result<Task, StoreError> {
        if patch
            .task_name
            .as_deref()
            .is_some_and(|n| n.trim().is_empty())
        {
            return Err(StoreError::EmptyName);
        }

        let mut tasks = self.list()?;
        let task = tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

        patch.apply_to(task);
        let updated = task.clone();

        if !patch.is_empty() {
            self.save(&tasks)?;
        }
        Ok(updated)
    }

    /// Returns whether a record was removed.
    pub fn delete(&self, id: &str) -> Result<bool, StoreError> {
        let mut tasks = self.list()?;
        let before = tasks.len();
        tasks.retain(|t| t.id != id);
        if tasks.len() == before {
            return Ok(false);
        }
        self.save(&tasks)?;
        Ok(true)
    }

    fn save(&self, tasks: &[Task]) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(tasks).map_err(|source| StoreError::Json {
            path: self.path.clone(),
            source,
        })?;
        replace_file(&self.path, json.as_bytes()).map_err(|source| StoreError::Write {
            path: self.path.clone(),
            source,
        })?;
        debug!(path = %self.path.display(), count = tasks.len(), "saved tasks");
        Ok(())
    }
}

impl TaskSource for JsonTaskStore {
    type Error = StoreError;

    fn fetch_all(&self) -> Result<Vec<Task>, StoreError> {
        self.list()
    }
}

/// Decode a field map into a `TaskPatch`, rejecting unrecognized keys.
pub fn parse_patch(value: serde_json::Value) -> Result<TaskPatch, StoreError> {
    serde_json::from_value(value).map_err(StoreError::InvalidPatch)
}

pub fn parse_patch_str(s: &str) -> Result<TaskPatch, StoreError> {
    serde_json::from_str(s).map_err(StoreError::InvalidPatch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn store() -> (TempDir, JsonTaskStore) {
        let dir = TempDir::new().unwrap();
        let store = JsonTaskStore::new(dir.path().join("data").join("tasks.json"));
        (dir, store)
    }

    fn new_task(name: &str) -> NewTask {
        NewTask {
            task_name: name.to_string(),
            ..NewTask::default()
        }
    }

    #[test]
    fn missing_file_is_empty_backlog() {
        let (_dir, store) = store();
        assert!(store.list().unwrap().is_empty());
        assert!(store.fetch_all().unwrap().is_empty());
    }

    #[test]
    fn add_assigns_id_and_defaults() {
        let (_dir, store) = store();
        let t = store
            .add(NewTask {
                task_name: "  Write report ".to_string(),
                duration_minutes: Some(45),
                ..NewTask::default()
            })
            .unwrap();

        assert_eq!(t.name, "Write report");
        assert_eq!(t.priority.as_deref(), Some("medium"));
        assert_eq!(t.status, TaskStatus::Pending);
        assert!(t.created_at.is_some());
        assert!(!t.id.is_empty());
        assert_eq!(store.get(&t.id).unwrap(), Some(t));
    }

    #[test]
    fn add_rejects_empty_name() {
        let (_dir, store) = store();
        assert!(matches!(store.add(new_task("   ")), Err(StoreError::EmptyName)));
    }

    #[test]
    fn update_applies_typed_patch() {
        let (_dir, store) = store();
        let t = store.add(new_task("Plan sprint")).unwrap();

        let patch = parse_patch(json!({"priority": "high", "deadline": "2026-10-30"})).unwrap();
        let updated = store.update(&t.id, &patch).unwrap();
        assert_eq!(updated.priority.as_deref(), Some("high"));
        assert_eq!(updated.deadline.as_deref(), Some("2026-10-30"));
        assert_eq!(store.get(&t.id).unwrap().unwrap(), updated);
    }

    #[test]
    fn update_rejects_unknown_keys_and_ids() {
        let (_dir, store) = store();
        let t = store.add(new_task("Plan sprint")).unwrap();

        assert!(matches!(
            parse_patch_str(r#"{"id": "hijack"}"#),
            Err(StoreError::InvalidPatch(_))
        ));
        assert!(matches!(
            store.update("missing", &TaskPatch::default()),
            Err(StoreError::NotFound(_))
        ));

        let blank = TaskPatch {
            task_name: Some(" ".to_string()),
            ..TaskPatch::default()
        };
        assert!(matches!(store.update(&t.id, &blank), Err(StoreError::EmptyName)));
    }

    #[test]
    fn delete_reports_removal() {
        let (_dir, store) = store();
        let a = store.add(new_task("a")).unwrap();
        let b = store.add(new_task("b")).unwrap();

        assert!(store.delete(&a.id).unwrap());
        assert!(!store.delete(&a.id).unwrap());
        let left = store.list().unwrap();
        assert_eq!(left.len(), 1);
        assert_eq!(left[0].id, b.id);
    }

    #[test]
    fn loads_hand_edited_records_leniently() {
        let (_dir, store) = store();
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        fs::write(
            store.path(),
            r#"[{"id": "x", "task_name": "X", "duration_minutes": "ninety", "deadline": "soon"}]"#,
        )
        .unwrap();

        let tasks = store.list().unwrap();
        assert_eq!(tasks[0].effective_duration(), 60);
        assert_eq!(tasks[0].deadline_date(), None);
    }

    #[test]
    fn non_string_fields_do_not_block_scheduling() {
        use chrono::{NaiveDate, TimeZone};
        use slotwise_core::{produce_schedule, ScheduleConfig};

        let (dir, store) = store();
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        fs::write(
            store.path(),
            r#"[{"id": "ok", "task_name": "OK", "duration_minutes": 30, "priority": "high"},
                {"id": "x", "task_name": "X", "priority": 1, "deadline": 20261030}]"#,
        )
        .unwrap();

        let tasks = store.list().unwrap();
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[1].priority, None);
        assert_eq!(tasks[1].deadline, None);

        let cfg = ScheduleConfig {
            output_path: dir.path().join("schedule.ics"),
            ..ScheduleConfig::default()
        };
        let monday = NaiveDate::from_ymd_opt(2026, 10, 26).unwrap();
        let now = Utc.with_ymd_and_hms(2026, 10, 19, 8, 0, 0).unwrap();
        let out = produce_schedule(&store, &cfg, Some(monday), now).unwrap();
        let ids: Vec<&str> = out.events.iter().map(|e| e.task_id.as_str()).collect();
        assert_eq!(ids, vec!["ok", "x"]);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let (_dir, store) = store();
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        fs::write(store.path(), "{not json").unwrap();
        assert!(matches!(store.list(), Err(StoreError::Json { .. })));
    }
}
