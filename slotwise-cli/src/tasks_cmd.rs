use anyhow::{bail, Context, Result};
use clap::Subcommand;
use slotwise_core::{order, Priority, Task};
use slotwise_store::{parse_patch_str, JsonTaskStore, NewTask};

#[derive(Subcommand, Debug)]
pub enum TasksCommand {
    /// Add a task to the backlog
    Add {
        #[arg(long)]
        name: String,

        /// Minutes (default 60 when scheduling)
        #[arg(long)]
        duration: Option<i64>,

        /// high | medium | low
        #[arg(long)]
        priority: Option<String>,

        /// YYYY-MM-DD
        #[arg(long)]
        deadline: Option<String>,

        /// YYYY-MM-DD (informational)
        #[arg(long)]
        scheduled: Option<String>,
    },

    /// List the backlog in priority order
    List,

    /// Apply a partial update, e.g. --patch '{"priority":"high"}'
    Update {
        id: String,

        /// JSON object over task_name, duration_minutes, priority, deadline,
        /// scheduled_date, status
        #[arg(long)]
        patch: String,
    },

    /// Remove a task
    Delete { id: String },

    /// Backlog totals by priority and the nearest deadlines
    Summary,
}

/// Deadlines listed by `tasks summary`.
const UPCOMING_LIMIT: usize = 3;

pub fn run(cmd: TasksCommand, store: &JsonTaskStore) -> Result<()> {
    match cmd {
        TasksCommand::Add {
            name,
            duration,
            priority,
            deadline,
            scheduled,
        } => {
            let t = store
                .add(NewTask {
                    task_name: name,
                    duration_minutes: duration,
                    priority,
                    deadline,
                    scheduled_date: scheduled,
                })
                .with_context(|| format!("add task to {}", store.path().display()))?;
            println!("Added task '{}' (id {})", t.name, t.id);
        }

        TasksCommand::List => {
            let tasks = order(&store.list()?);
            if tasks.is_empty() {
                println!("No tasks found.");
                return Ok(());
            }
            for t in &tasks {
                println!("{}", format_task_line(t));
            }
        }

        TasksCommand::Update { id, patch } => {
            let patch = parse_patch_str(&patch)?;
            if patch.is_empty() {
                bail!("empty patch; nothing to update");
            }
            let t = store.update(&id, &patch)?;
            println!("Updated task '{}' (id {})", t.name, t.id);
        }

        TasksCommand::Delete { id } => {
            if !store.delete(&id)? {
                bail!("task not found: {id}");
            }
            println!("Deleted task {id}");
        }

        TasksCommand::Summary => {
            println!("{}", render_backlog_summary(&store.list()?));
        }
    }

    Ok(())
}

fn format_task_line(t: &Task) -> String {
    let deadline = t
        .deadline_date()
        .map(|d| d.to_string())
        .unwrap_or_else(|| "no deadline".to_string());
    let mut line = format!(
        "{} - {} - {} - {} min [{}]",
        t.name,
        deadline,
        t.priority_tier().as_str(),
        t.effective_duration(),
        t.id
    );
    if let Some(d) = t.scheduled_on() {
        line.push_str(&format!(" (planned {d})"));
    }
    line
}

fn render_backlog_summary(tasks: &[Task]) -> String {
    if tasks.is_empty() {
        return "No tasks found.".to_string();
    }

    let mut lines = vec![
        "=== Task Summary ===".to_string(),
        format!("Total Tasks: {}", tasks.len()),
        "By Priority:".to_string(),
    ];
    for (tier, label) in [
        (Priority::High, "High"),
        (Priority::Medium, "Medium"),
        (Priority::Low, "Low"),
    ] {
        let count = tasks.iter().filter(|t| t.priority_tier() == tier).count();
        lines.push(format!("  - {label}: {count}"));
    }

    let mut dated: Vec<_> = tasks
        .iter()
        .filter_map(|t| t.deadline_date().map(|d| (d, t)))
        .collect();
    dated.sort_by_key(|(d, _)| *d);

    lines.push("Upcoming Deadlines:".to_string());
    if dated.is_empty() {
        lines.push("  (none)".to_string());
    }
    for (d, t) in dated.into_iter().take(UPCOMING_LIMIT) {
        lines.push(format!("  - {} (Due: {d})", t.name));
    }
    lines.join("\n")
}
