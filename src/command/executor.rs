//! Action execution against the task store
//!
//! Applies one parsed action and produces one result record. All
//! task-identification and bulk-operation policy lives here: exact-title
//! lookup, "all tasks" phrase detection, and the fixed analytics
//! precedence. A failing action is reported in its own result and never
//! aborts the rest of the batch.

use crate::core::types::{TaskId, UserId};
use crate::llm::parser::Action;
use crate::store::task::{NewTask, Priority, Status, TaskPatch};
use crate::store::TaskStore;
use chrono::NaiveDate;
use serde::Serialize;

/// Phrases that turn a delete into a bulk delete of every owned task
const BULK_DELETE_PHRASES: [&str; 5] = [
    "all tasks",
    "every task",
    "all my tasks",
    "everything",
    "all entries",
];

/// What kind of action a result describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    Add,
    Edit,
    Delete,
    Analytics,
    /// A sub-instruction that failed before any action could run
    Error,
    /// A decoded element whose tag is not part of the vocabulary
    Unrecognized,
}

/// Outcome of one action (or one failed sub-instruction)
#[derive(Debug, Clone, Serialize)]
pub struct ActionResult {
    pub kind: ActionKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    pub succeeded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Id of the task created by an add
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_id: Option<TaskId>,
    /// How many tasks a bulk delete removed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted: Option<usize>,
    /// Numeric answer of an analytics query
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    /// The failing sub-instruction text (kind = error)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instruction: Option<String>,
}

impl ActionResult {
    fn new(kind: ActionKind) -> Self {
        Self {
            kind,
            title: None,
            query: None,
            succeeded: true,
            error: None,
            task_id: None,
            deleted: None,
            count: None,
            instruction: None,
        }
    }

    fn failed(kind: ActionKind, title: Option<String>, error: impl Into<String>) -> Self {
        Self {
            succeeded: false,
            error: Some(error.into()),
            title,
            ..Self::new(kind)
        }
    }

    /// Result for a sub-instruction that never reached execution
    pub fn instruction_error(instruction: &str, error: impl Into<String>) -> Self {
        Self {
            succeeded: false,
            error: Some(error.into()),
            instruction: Some(instruction.to_string()),
            ..Self::new(ActionKind::Error)
        }
    }

    /// Note for a dropped element with an unknown action tag
    pub fn unrecognized(tag: &str) -> Self {
        Self {
            succeeded: false,
            error: Some(format!("Unrecognized action kind: {tag}")),
            ..Self::new(ActionKind::Unrecognized)
        }
    }

    /// True for an add/edit/delete that actually went through
    pub fn is_mutation(&self) -> bool {
        self.succeeded
            && matches!(
                self.kind,
                ActionKind::Add | ActionKind::Edit | ActionKind::Delete
            )
    }
}

/// Applies parsed actions to the task store
pub struct ActionExecutor;

impl ActionExecutor {
    /// Execute one action for `user`, returning its result record
    ///
    /// # Arguments
    /// * `store` - Store handle scoped to this call
    /// * `user` - Owner of every task read or written
    /// * `today` - Calendar date used by the overdue analytics branch
    pub fn execute(
        store: &mut dyn TaskStore,
        user: UserId,
        action: &Action,
        today: NaiveDate,
    ) -> ActionResult {
        match action {
            Action::Add {
                title,
                description,
                due_date,
                priority,
                status,
                category,
            } => Self::execute_add(
                store,
                user,
                title,
                description,
                due_date.as_deref(),
                *priority,
                *status,
                category,
            ),
            Action::Edit {
                title,
                description,
                due_date,
                priority,
                status,
                category,
            } => Self::execute_edit(
                store,
                user,
                title,
                description.clone(),
                due_date.as_deref(),
                *priority,
                *status,
                category.clone(),
            ),
            Action::Delete { title } => Self::execute_delete(store, user, title),
            Action::Analytics { query } => Self::execute_analytics(store, user, query, today),
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn execute_add(
        store: &mut dyn TaskStore,
        user: UserId,
        title: &str,
        description: &str,
        due_date: Option<&str>,
        priority: Priority,
        status: Status,
        category: &str,
    ) -> ActionResult {
        let title = title.trim();
        let Some(due_raw) = due_date else {
            return ActionResult::failed(
                ActionKind::Add,
                Some(title.to_string()),
                "Title and due date are required",
            );
        };
        if title.is_empty() {
            return ActionResult::failed(ActionKind::Add, None, "Title and due date are required");
        }
        let Some(due) = parse_due_date(due_raw) else {
            return ActionResult::failed(
                ActionKind::Add,
                Some(title.to_string()),
                format!("Invalid due date: {due_raw}"),
            );
        };

        let task = store.create(
            user,
            NewTask {
                title: title.to_string(),
                description: description.to_string(),
                due_date: due,
                priority,
                status,
                category: category.to_string(),
            },
        );
        tracing::info!(task_id = %task.id, title = %task.title, "task created");

        ActionResult {
            title: Some(task.title),
            task_id: Some(task.id),
            ..ActionResult::new(ActionKind::Add)
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn execute_edit(
        store: &mut dyn TaskStore,
        user: UserId,
        title: &str,
        description: Option<String>,
        due_date: Option<&str>,
        priority: Option<Priority>,
        status: Option<Status>,
        category: Option<String>,
    ) -> ActionResult {
        let Some(existing) = store.find_one_by_title(user, title) else {
            return ActionResult::failed(
                ActionKind::Edit,
                Some(title.to_string()),
                "Task not found",
            );
        };

        // Validate the date before touching the record so a bad edit is
        // all-or-nothing
        let due = match due_date {
            Some(raw) => match parse_due_date(raw) {
                Some(d) => Some(d),
                None => {
                    return ActionResult::failed(
                        ActionKind::Edit,
                        Some(title.to_string()),
                        format!("Invalid due date: {raw}"),
                    );
                }
            },
            None => None,
        };

        let patch = TaskPatch {
            title: None,
            description,
            due_date: due,
            priority,
            status,
            category,
        };
        match store.update_fields(user, existing.id, patch) {
            Some(updated) => {
                tracing::info!(task_id = %updated.id, title = %updated.title, "task updated");
                ActionResult {
                    title: Some(updated.title),
                    ..ActionResult::new(ActionKind::Edit)
                }
            }
            None => {
                ActionResult::failed(ActionKind::Edit, Some(title.to_string()), "Task not found")
            }
        }
    }

    fn execute_delete(store: &mut dyn TaskStore, user: UserId, title: &str) -> ActionResult {
        if is_bulk_delete(title) {
            let deleted = store.delete_all_by_owner(user);
            tracing::info!(deleted, "bulk delete");
            return ActionResult {
                title: Some(title.to_string()),
                deleted: Some(deleted),
                ..ActionResult::new(ActionKind::Delete)
            };
        }

        match store.find_one_by_title(user, title) {
            Some(task) => {
                store.delete_one(user, task.id);
                tracing::info!(task_id = %task.id, title = %task.title, "task deleted");
                ActionResult {
                    title: Some(task.title),
                    ..ActionResult::new(ActionKind::Delete)
                }
            }
            None => ActionResult::failed(
                ActionKind::Delete,
                Some(title.to_string()),
                "Task not found",
            ),
        }
    }

    fn execute_analytics(
        store: &dyn TaskStore,
        user: UserId,
        query: &str,
        today: NaiveDate,
    ) -> ActionResult {
        // Precedence is fixed: the first matching substring wins
        let q = query.to_lowercase();
        let count = if q.contains("overdue") {
            store.count_by_filter(user, &|t| {
                t.due_date < today && t.status != Status::Completed
            })
        } else if q.contains("completed") {
            store.count_by_filter(user, &|t| t.status == Status::Completed)
        } else if q.contains("in progress") {
            store.count_by_filter(user, &|t| t.status == Status::InProgress)
        } else if q.contains("not started") {
            store.count_by_filter(user, &|t| t.status == Status::NotStarted)
        } else if q.contains("high priority") {
            store.count_by_filter(user, &|t| t.priority == Priority::High)
        } else if q.contains("medium priority") {
            store.count_by_filter(user, &|t| t.priority == Priority::Medium)
        } else if q.contains("low priority") {
            store.count_by_filter(user, &|t| t.priority == Priority::Low)
        } else {
            return ActionResult {
                query: Some(query.to_string()),
                succeeded: false,
                error: Some("Unsupported analytics query".into()),
                ..ActionResult::new(ActionKind::Analytics)
            };
        };

        ActionResult {
            query: Some(query.to_string()),
            count: Some(count),
            ..ActionResult::new(ActionKind::Analytics)
        }
    }
}

/// Accept "YYYY-MM-DD", tolerating a trailing time component
fn parse_due_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            trimmed
                .get(..10)
                .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
        })
}

fn is_bulk_delete(title: &str) -> bool {
    let normalized = title.trim().to_lowercase();
    BULK_DELETE_PHRASES.iter().any(|p| normalized == *p)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryTaskStore;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 6).unwrap()
    }

    fn add_action(title: &str, due: &str) -> Action {
        Action::Add {
            title: title.into(),
            description: String::new(),
            due_date: Some(due.into()),
            priority: Priority::default(),
            status: Status::default(),
            category: "General".into(),
        }
    }

    fn seed(store: &mut MemoryTaskStore, user: UserId, title: &str, due: &str) {
        let result = ActionExecutor::execute(store, user, &add_action(title, due), today());
        assert!(result.succeeded);
    }

    #[test]
    fn test_add_creates_task_with_fields() {
        let mut store = MemoryTaskStore::new();
        let user = UserId::new();
        let action = Action::Add {
            title: "Buy milk".into(),
            description: "2 liters".into(),
            due_date: Some("2026-08-10".into()),
            priority: Priority::High,
            status: Status::default(),
            category: "Errands".into(),
        };

        let result = ActionExecutor::execute(&mut store, user, &action, today());

        assert!(result.succeeded);
        assert_eq!(result.kind, ActionKind::Add);
        assert!(result.task_id.is_some());
        let task = store.find_one_by_title(user, "Buy milk").unwrap();
        assert_eq!(task.description, "2 liters");
        assert_eq!(task.priority, Priority::High);
        assert_eq!(task.status, Status::NotStarted);
        assert_eq!(task.category, "Errands");
        assert_eq!(task.due_date, NaiveDate::from_ymd_opt(2026, 8, 10).unwrap());
    }

    #[test]
    fn test_add_without_due_date_fails() {
        let mut store = MemoryTaskStore::new();
        let user = UserId::new();
        let action = Action::Add {
            title: "Buy milk".into(),
            description: String::new(),
            due_date: None,
            priority: Priority::default(),
            status: Status::default(),
            category: "General".into(),
        };

        let result = ActionExecutor::execute(&mut store, user, &action, today());

        assert!(!result.succeeded);
        assert_eq!(result.error.as_deref(), Some("Title and due date are required"));
        assert!(store.is_empty());
    }

    #[test]
    fn test_add_with_unparseable_date_fails() {
        let mut store = MemoryTaskStore::new();
        let user = UserId::new();
        let result =
            ActionExecutor::execute(&mut store, user, &add_action("A", "next week"), today());

        assert!(!result.succeeded);
        assert!(result.error.unwrap().starts_with("Invalid due date"));
        assert!(store.is_empty());
    }

    #[test]
    fn test_add_tolerates_datetime_suffix() {
        let mut store = MemoryTaskStore::new();
        let user = UserId::new();
        let result = ActionExecutor::execute(
            &mut store,
            user,
            &add_action("A", "2026-08-10T00:00:00Z"),
            today(),
        );
        assert!(result.succeeded);
    }

    #[test]
    fn test_edit_changes_only_present_fields() {
        let mut store = MemoryTaskStore::new();
        let user = UserId::new();
        seed(&mut store, user, "Report", "2026-08-10");

        let action = Action::Edit {
            title: "Report".into(),
            description: None,
            due_date: None,
            priority: None,
            status: Some(Status::Completed),
            category: None,
        };
        let result = ActionExecutor::execute(&mut store, user, &action, today());

        assert!(result.succeeded);
        let task = store.find_one_by_title(user, "Report").unwrap();
        assert_eq!(task.status, Status::Completed);
        assert_eq!(task.priority, Priority::Medium);
        assert_eq!(task.due_date, NaiveDate::from_ymd_opt(2026, 8, 10).unwrap());
    }

    #[test]
    fn test_edit_missing_task_reports_not_found() {
        let mut store = MemoryTaskStore::new();
        let user = UserId::new();

        let action = Action::Edit {
            title: "Ghost Task".into(),
            description: None,
            due_date: None,
            priority: None,
            status: Some(Status::Completed),
            category: None,
        };
        let result = ActionExecutor::execute(&mut store, user, &action, today());

        assert_eq!(result.kind, ActionKind::Edit);
        assert_eq!(result.title.as_deref(), Some("Ghost Task"));
        assert!(!result.succeeded);
        assert_eq!(result.error.as_deref(), Some("Task not found"));
        assert!(store.is_empty());
    }

    #[test]
    fn test_edit_title_match_is_case_sensitive() {
        let mut store = MemoryTaskStore::new();
        let user = UserId::new();
        seed(&mut store, user, "Report", "2026-08-10");

        let action = Action::Edit {
            title: "report".into(),
            description: None,
            due_date: None,
            priority: None,
            status: Some(Status::Completed),
            category: None,
        };
        let result = ActionExecutor::execute(&mut store, user, &action, today());
        assert!(!result.succeeded);
    }

    #[test]
    fn test_delete_missing_task_is_noop() {
        let mut store = MemoryTaskStore::new();
        let user = UserId::new();
        seed(&mut store, user, "Keep", "2026-08-10");

        let action = Action::Delete {
            title: "Missing".into(),
        };
        let result = ActionExecutor::execute(&mut store, user, &action, today());

        assert!(!result.succeeded);
        assert_eq!(result.error.as_deref(), Some("Task not found"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_delete_single_task() {
        let mut store = MemoryTaskStore::new();
        let user = UserId::new();
        seed(&mut store, user, "Old", "2026-08-10");

        let action = Action::Delete {
            title: "Old".into(),
        };
        let result = ActionExecutor::execute(&mut store, user, &action, today());

        assert!(result.succeeded);
        assert!(result.deleted.is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_bulk_delete_scoped_to_user() {
        let mut store = MemoryTaskStore::new();
        let alice = UserId::new();
        let bob = UserId::new();
        seed(&mut store, alice, "A1", "2026-08-10");
        seed(&mut store, alice, "A2", "2026-08-10");
        seed(&mut store, bob, "B1", "2026-08-10");

        let action = Action::Delete {
            title: "all tasks".into(),
        };
        let result = ActionExecutor::execute(&mut store, alice, &action, today());

        assert!(result.succeeded);
        assert_eq!(result.deleted, Some(2));
        assert_eq!(store.len(), 1);
        assert!(store.find_one_by_title(bob, "B1").is_some());
    }

    #[test]
    fn test_bulk_delete_phrases() {
        for phrase in ["all tasks", "Every Task", "ALL MY TASKS", "everything", "all entries"] {
            assert!(is_bulk_delete(phrase), "{phrase} should be bulk");
        }
        assert!(!is_bulk_delete("all the reports"));
        assert!(!is_bulk_delete("everything else"));
    }

    #[test]
    fn test_analytics_counts_overdue() {
        let mut store = MemoryTaskStore::new();
        let user = UserId::new();
        seed(&mut store, user, "Late", "2026-08-01");
        seed(&mut store, user, "Future", "2026-08-20");
        // Completed tasks are never overdue
        let done = Action::Edit {
            title: "Late".into(),
            description: None,
            due_date: None,
            priority: None,
            status: Some(Status::Completed),
            category: None,
        };
        ActionExecutor::execute(&mut store, user, &done, today());
        seed(&mut store, user, "Late2", "2026-08-05");

        let action = Action::Analytics {
            query: "how many tasks are overdue".into(),
        };
        let result = ActionExecutor::execute(&mut store, user, &action, today());

        assert!(result.succeeded);
        assert_eq!(result.count, Some(1));
    }

    #[test]
    fn test_analytics_due_today_is_not_overdue() {
        let mut store = MemoryTaskStore::new();
        let user = UserId::new();
        seed(&mut store, user, "Today", "2026-08-06");

        let action = Action::Analytics {
            query: "overdue".into(),
        };
        let result = ActionExecutor::execute(&mut store, user, &action, today());
        assert_eq!(result.count, Some(0));
    }

    #[test]
    fn test_analytics_precedence_is_pinned() {
        let mut store = MemoryTaskStore::new();
        let user = UserId::new();
        seed(&mut store, user, "Open", "2026-08-10");
        let done = Action::Edit {
            title: "Open".into(),
            description: None,
            due_date: None,
            priority: None,
            status: Some(Status::Completed),
            category: None,
        };
        ActionExecutor::execute(&mut store, user, &done, today());

        // Both "completed" and "high priority" match; "completed" is
        // checked first and must win
        let action = Action::Analytics {
            query: "completed high priority tasks".into(),
        };
        let result = ActionExecutor::execute(&mut store, user, &action, today());
        assert!(result.succeeded);
        assert_eq!(result.count, Some(1));

        // "overdue" outranks everything else
        let action = Action::Analytics {
            query: "overdue completed tasks".into(),
        };
        let result = ActionExecutor::execute(&mut store, user, &action, today());
        assert_eq!(result.count, Some(0));
    }

    #[test]
    fn test_analytics_priority_counts() {
        let mut store = MemoryTaskStore::new();
        let user = UserId::new();
        let mut high = add_action("H", "2026-08-10");
        if let Action::Add { priority, .. } = &mut high {
            *priority = Priority::High;
        }
        ActionExecutor::execute(&mut store, user, &high, today());
        seed(&mut store, user, "M", "2026-08-10");

        let action = Action::Analytics {
            query: "high priority".into(),
        };
        let result = ActionExecutor::execute(&mut store, user, &action, today());
        assert_eq!(result.count, Some(1));

        let action = Action::Analytics {
            query: "medium priority".into(),
        };
        let result = ActionExecutor::execute(&mut store, user, &action, today());
        assert_eq!(result.count, Some(1));
    }

    #[test]
    fn test_analytics_unsupported_query() {
        let mut store = MemoryTaskStore::new();
        let user = UserId::new();

        let action = Action::Analytics {
            query: "average completion time".into(),
        };
        let result = ActionExecutor::execute(&mut store, user, &action, today());

        assert!(!result.succeeded);
        assert_eq!(result.error.as_deref(), Some("Unsupported analytics query"));
    }

    #[test]
    fn test_is_mutation() {
        let mut store = MemoryTaskStore::new();
        let user = UserId::new();
        let add = ActionExecutor::execute(&mut store, user, &add_action("A", "2026-08-10"), today());
        assert!(add.is_mutation());

        let analytics = ActionExecutor::execute(
            &mut store,
            user,
            &Action::Analytics {
                query: "completed".into(),
            },
            today(),
        );
        assert!(!analytics.is_mutation());

        let failed_delete = ActionExecutor::execute(
            &mut store,
            user,
            &Action::Delete {
                title: "Missing".into(),
            },
            today(),
        );
        assert!(!failed_delete.is_mutation());
    }
}
