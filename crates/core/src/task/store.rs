//! Task store with write-through persistence
//!
//! Owns the task collection. Every mutation re-serializes the whole
//! collection to local storage; derived views are recomputed from the
//! live collection on every read, never cached.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};
use tokio::sync::RwLock;
use tracing::{debug, warn};

use super::model::{NewTask, Priority, Stats, Status, Task, TaskPatch};
use crate::storage::{Storage, TASKS_KEY};

/// Simulated network latency applied to the CRUD operations.
const DEFAULT_LATENCY: Duration = Duration::from_millis(300);

/// Thread-safe task store
#[derive(Clone)]
pub struct TaskStore {
    tasks: Arc<RwLock<Vec<Task>>>,
    storage: Arc<dyn Storage>,
    latency: Duration,
}

impl TaskStore {
    /// Create a new TaskStore, restoring the persisted collection if
    /// present. Absent or malformed storage contents keep the built-in
    /// seed tasks.
    pub async fn new(storage: Arc<dyn Storage>) -> Self {
        let tasks = match storage.get_item(TASKS_KEY).await {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<Task>>(&raw) {
                Ok(tasks) => tasks,
                Err(err) => {
                    warn!("Ignoring malformed task collection in storage: {}", err);
                    seed_tasks()
                }
            },
            Ok(None) => seed_tasks(),
            Err(err) => {
                warn!("Failed to read task collection from storage: {}", err);
                seed_tasks()
            }
        };

        Self {
            tasks: Arc::new(RwLock::new(tasks)),
            storage,
            latency: DEFAULT_LATENCY,
        }
    }

    /// Override the simulated latency (zero in tests)
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Get the full current collection
    pub async fn list_all(&self) -> Vec<Task> {
        tokio::time::sleep(self.latency).await;
        self.tasks.read().await.clone()
    }

    /// Get a task by id
    pub async fn get(&self, id: i64) -> Option<Task> {
        tokio::time::sleep(self.latency).await;
        self.tasks
            .read()
            .await
            .iter()
            .find(|task| task.id == id)
            .cloned()
    }

    /// Create a new task attributed to `created_by`.
    ///
    /// Status always starts at [`Status::Todo`]; both timestamps are
    /// stamped to now.
    pub async fn create(&self, data: NewTask, created_by: i64) -> Task {
        tokio::time::sleep(self.latency).await;

        let mut tasks = self.tasks.write().await;
        let now = Utc::now();
        let task = Task {
            id: crate::id::fresh_id(tasks.iter().map(|task| task.id)),
            title: data.title,
            description: data.description.unwrap_or_default(),
            status: Status::Todo,
            priority: data.priority,
            assigned_to: data.assigned_to,
            created_by,
            created_at: now,
            updated_at: now,
        };
        tasks.push(task.clone());
        self.persist(&tasks).await;
        debug!("Created task {}", task.id);
        task
    }

    /// Merge the supplied fields into the matching task, refreshing
    /// `updated_at`. Returns None if no task has that id.
    pub async fn update(&self, id: i64, patch: TaskPatch) -> Option<Task> {
        tokio::time::sleep(self.latency).await;

        let mut tasks = self.tasks.write().await;
        let task = tasks.iter_mut().find(|task| task.id == id)?;
        if let Some(title) = patch.title {
            task.title = title;
        }
        if let Some(description) = patch.description {
            task.description = description;
        }
        if let Some(status) = patch.status {
            task.status = status;
        }
        if let Some(priority) = patch.priority {
            task.priority = priority;
        }
        if let Some(assigned_to) = patch.assigned_to {
            task.assigned_to = Some(assigned_to);
        }
        task.updated_at = Utc::now();
        let updated = task.clone();

        self.persist(&tasks).await;
        debug!("Updated task {}", id);
        Some(updated)
    }

    /// Delete a task by id; returns whether a removal occurred.
    pub async fn delete(&self, id: i64) -> bool {
        tokio::time::sleep(self.latency).await;

        let mut tasks = self.tasks.write().await;
        let len_before = tasks.len();
        tasks.retain(|task| task.id != id);
        let removed = tasks.len() < len_before;
        if removed {
            self.persist(&tasks).await;
            debug!("Deleted task {}", id);
        }
        removed
    }

    /// Tasks in the given status column
    pub async fn by_status(&self, status: Status) -> Vec<Task> {
        self.tasks
            .read()
            .await
            .iter()
            .filter(|task| task.status == status)
            .cloned()
            .collect()
    }

    /// Tasks with the given priority
    pub async fn by_priority(&self, priority: Priority) -> Vec<Task> {
        self.tasks
            .read()
            .await
            .iter()
            .filter(|task| task.priority == priority)
            .cloned()
            .collect()
    }

    /// Case-insensitive substring search over title and description.
    /// A blank query returns the full collection.
    pub async fn search(&self, query: &str) -> Vec<Task> {
        let needle = query.trim().to_lowercase();
        let tasks = self.tasks.read().await;
        if needle.is_empty() {
            return tasks.clone();
        }
        tasks
            .iter()
            .filter(|task| {
                task.title.to_lowercase().contains(&needle)
                    || task.description.to_lowercase().contains(&needle)
            })
            .cloned()
            .collect()
    }

    /// Aggregate counts, recomputed from the live collection on every
    /// call.
    pub async fn stats(&self) -> Stats {
        let tasks = self.tasks.read().await;
        let total = tasks.len();
        let completed = tasks.iter().filter(|t| t.status == Status::Done).count();
        let in_progress = tasks
            .iter()
            .filter(|t| t.status == Status::InProgress)
            .count();
        let pending = tasks.iter().filter(|t| t.status == Status::Todo).count();
        let high_priority = tasks
            .iter()
            .filter(|t| t.priority == Priority::High)
            .count();
        let completion_rate = if total > 0 {
            (completed as f64 / total as f64 * 100.0).round() as u32
        } else {
            0
        };

        Stats {
            total,
            completed,
            in_progress,
            pending,
            high_priority,
            completion_rate,
        }
    }

    /// Best-effort write-through. A failure is logged, never surfaced,
    /// so in-memory state can run ahead of the persisted snapshot.
    async fn persist(&self, tasks: &[Task]) {
        let result = match serde_json::to_string(tasks) {
            Ok(raw) => self.storage.set_item(TASKS_KEY, &raw).await,
            Err(err) => Err(err.into()),
        };
        if let Err(err) = result {
            warn!("Failed to persist task collection: {}", err);
        }
    }
}

fn seed_date(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0).unwrap()
}

fn seed_tasks() -> Vec<Task> {
    vec![
        Task {
            id: 1,
            title: "Sketch the board layout".to_string(),
            description: "Three status columns with per-column counts".to_string(),
            status: Status::Todo,
            priority: Priority::High,
            assigned_to: None,
            created_by: 1,
            created_at: seed_date(2024, 1, 15),
            updated_at: seed_date(2024, 1, 15),
        },
        Task {
            id: 2,
            title: "Wire up the task form".to_string(),
            description: "Create, edit and delete from the board".to_string(),
            status: Status::InProgress,
            priority: Priority::Medium,
            assigned_to: None,
            created_by: 1,
            created_at: seed_date(2024, 1, 14),
            updated_at: seed_date(2024, 1, 16),
        },
        Task {
            id: 3,
            title: "Set up the dev environment".to_string(),
            description: "Toolchain, editor config and project scaffold".to_string(),
            status: Status::Done,
            priority: Priority::High,
            assigned_to: None,
            created_by: 1,
            created_at: seed_date(2024, 1, 13),
            updated_at: seed_date(2024, 1, 14),
        },
    ]
}
