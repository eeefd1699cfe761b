//! In-memory task store
//!
//! Backs the interactive binary and the test suite. Insertion order is
//! preserved so title lookup has a deterministic "first match".

use crate::core::types::{TaskId, UserId};
use crate::store::task::{ActivityEntry, NewTask, Task, TaskPatch};
use crate::store::TaskStore;
use chrono::Utc;
use serde_json::json;

/// Vec-backed store; one instance per session, passed explicitly to the
/// executor (no process-wide state)
#[derive(Debug, Default)]
pub struct MemoryTaskStore {
    tasks: Vec<Task>,
}

impl MemoryTaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// All tasks owned by `owner`, in insertion order
    pub fn tasks_for(&self, owner: UserId) -> Vec<&Task> {
        self.tasks.iter().filter(|t| t.owner == owner).collect()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

impl TaskStore for MemoryTaskStore {
    fn create(&mut self, owner: UserId, fields: NewTask) -> Task {
        let mut task = Task {
            id: TaskId::new(),
            owner,
            title: fields.title,
            description: fields.description,
            due_date: fields.due_date,
            priority: fields.priority,
            status: fields.status,
            category: fields.category,
            activity_log: Vec::new(),
        };
        task.activity_log.push(ActivityEntry {
            action: "created".into(),
            timestamp: Utc::now(),
            user: owner,
            details: Some(task.snapshot()),
        });
        self.tasks.push(task.clone());
        task
    }

    fn find_one_by_title(&self, owner: UserId, title: &str) -> Option<Task> {
        self.tasks
            .iter()
            .find(|t| t.owner == owner && t.title == title)
            .cloned()
    }

    fn update_fields(&mut self, owner: UserId, id: TaskId, patch: TaskPatch) -> Option<Task> {
        let now = Utc::now();
        let task = self
            .tasks
            .iter_mut()
            .find(|t| t.owner == owner && t.id == id)?;

        let mut changes: Vec<(&'static str, serde_json::Value)> = Vec::new();

        if let Some(title) = patch.title {
            if title != task.title {
                changes.push(("title_changed", json!({"from": task.title, "to": title})));
                task.title = title;
            }
        }
        if let Some(description) = patch.description {
            if description != task.description {
                changes.push((
                    "description_changed",
                    json!({"from": task.description, "to": description}),
                ));
                task.description = description;
            }
        }
        if let Some(due_date) = patch.due_date {
            if due_date != task.due_date {
                changes.push((
                    "dueDate_changed",
                    json!({"from": task.due_date.to_string(), "to": due_date.to_string()}),
                ));
                task.due_date = due_date;
            }
        }
        if let Some(priority) = patch.priority {
            if priority != task.priority {
                changes.push((
                    "priority_changed",
                    json!({"from": task.priority.to_string(), "to": priority.to_string()}),
                ));
                task.priority = priority;
            }
        }
        if let Some(status) = patch.status {
            if status != task.status {
                changes.push((
                    "status_changed",
                    json!({"from": task.status.to_string(), "to": status.to_string()}),
                ));
                task.status = status;
            }
        }
        if let Some(category) = patch.category {
            if category != task.category {
                changes.push((
                    "category_changed",
                    json!({"from": task.category, "to": category}),
                ));
                task.category = category;
            }
        }

        if changes.is_empty() {
            // No field changed: one generic entry, never zero
            task.activity_log.push(ActivityEntry {
                action: "updated".into(),
                timestamp: now,
                user: owner,
                details: None,
            });
        } else {
            for (action, details) in changes {
                task.activity_log.push(ActivityEntry {
                    action: action.into(),
                    timestamp: now,
                    user: owner,
                    details: Some(details),
                });
            }
        }

        Some(task.clone())
    }

    fn delete_one(&mut self, owner: UserId, id: TaskId) -> bool {
        let Some(index) = self
            .tasks
            .iter()
            .position(|t| t.owner == owner && t.id == id)
        else {
            return false;
        };
        // Terminal entry snapshots the final field values before removal
        let snapshot = self.tasks[index].snapshot();
        self.tasks[index].activity_log.push(ActivityEntry {
            action: "deleted".into(),
            timestamp: Utc::now(),
            user: owner,
            details: Some(snapshot),
        });
        self.tasks.remove(index);
        true
    }

    fn delete_all_by_owner(&mut self, owner: UserId) -> usize {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.owner != owner);
        before - self.tasks.len()
    }

    fn count_by_filter(&self, owner: UserId, predicate: &dyn Fn(&Task) -> bool) -> usize {
        self.tasks
            .iter()
            .filter(|t| t.owner == owner && predicate(t))
            .count()
    }
}
