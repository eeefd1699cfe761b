//! Task entity and its field vocabulary
//!
//! A task is owned by exactly one user and carries an append-only activity
//! log. The log grows on every mutation and is only discarded when the
//! record itself is deleted.

use crate::core::types::{TaskId, UserId};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fmt;

/// Task priority
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    /// Lenient parse of model-supplied text ("high", "High", " HIGH ")
    pub fn parse(text: &str) -> Option<Self> {
        match text.trim().to_lowercase().as_str() {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            _ => None,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        };
        f.write_str(s)
    }
}

/// Task status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    #[default]
    #[serde(rename = "Not Started")]
    NotStarted,
    #[serde(rename = "In Progress")]
    InProgress,
    Completed,
}

impl Status {
    /// Lenient parse of model-supplied text
    pub fn parse(text: &str) -> Option<Self> {
        match text.trim().to_lowercase().as_str() {
            "not started" => Some(Self::NotStarted),
            "in progress" => Some(Self::InProgress),
            "completed" => Some(Self::Completed),
            _ => None,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::NotStarted => "Not Started",
            Self::InProgress => "In Progress",
            Self::Completed => "Completed",
        };
        f.write_str(s)
    }
}

/// One entry in a task's audit trail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityEntry {
    /// What happened ("created", "title_changed", "updated", "deleted", ...)
    pub action: String,
    pub timestamp: DateTime<Utc>,
    /// Who did it
    pub user: UserId,
    /// Field-level detail: `{from, to}` for changes, a full snapshot for
    /// created/deleted entries, null for the generic "updated" entry
    pub details: Option<serde_json::Value>,
}

/// A task record owned by one user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub owner: UserId,
    pub title: String,
    pub description: String,
    pub due_date: NaiveDate,
    pub priority: Priority,
    pub status: Status,
    pub category: String,
    pub activity_log: Vec<ActivityEntry>,
}

impl Task {
    /// Snapshot of the user-visible fields, used in created/deleted entries
    pub fn snapshot(&self) -> serde_json::Value {
        json!({
            "title": self.title,
            "description": self.description,
            "dueDate": self.due_date.to_string(),
            "priority": self.priority.to_string(),
            "status": self.status.to_string(),
            "category": self.category,
        })
    }
}

/// Fields for a task about to be created
#[derive(Debug, Clone)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub due_date: NaiveDate,
    pub priority: Priority,
    pub status: Status,
    pub category: String,
}

/// Partial update: only present fields are applied
#[derive(Debug, Clone, Default)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub priority: Option<Priority>,
    pub status: Option<Status>,
    pub category: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_parse_case_insensitive() {
        assert_eq!(Priority::parse("High"), Some(Priority::High));
        assert_eq!(Priority::parse(" low "), Some(Priority::Low));
        assert_eq!(Priority::parse("URGENT"), None);
    }

    #[test]
    fn test_status_parse() {
        assert_eq!(Status::parse("not started"), Some(Status::NotStarted));
        assert_eq!(Status::parse("In Progress"), Some(Status::InProgress));
        assert_eq!(Status::parse("done"), None);
    }

    #[test]
    fn test_status_serde_names() {
        let json = serde_json::to_string(&Status::NotStarted).unwrap();
        assert_eq!(json, "\"Not Started\"");
        let status: Status = serde_json::from_str("\"In Progress\"").unwrap();
        assert_eq!(status, Status::InProgress);
    }

    #[test]
    fn test_defaults() {
        assert_eq!(Priority::default(), Priority::Medium);
        assert_eq!(Status::default(), Status::NotStarted);
    }
}
