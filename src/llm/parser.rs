//! Parse raw model output into a validated list of actions
//!
//! Model output is untrusted and only loosely structured: it may wrap the
//! JSON array in chatter, use unexpected tags, or omit fields. All of the
//! defensive decoding lives here so the executor only ever sees well-formed
//! actions.

use crate::core::error::{CommandError, Result};
use crate::store::task::{Priority, Status};
use serde::Deserialize;

/// One structured instruction derived from natural language
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Create a task. An empty title or missing due date is rejected by
    /// the executor, not here, so the failure lands in that action's
    /// result instead of aborting the batch.
    Add {
        title: String,
        description: String,
        due_date: Option<String>,
        priority: Priority,
        status: Status,
        category: String,
    },
    /// Change fields on the task whose title matches exactly; absent
    /// fields are left untouched
    Edit {
        title: String,
        description: Option<String>,
        due_date: Option<String>,
        priority: Option<Priority>,
        status: Option<Status>,
        category: Option<String>,
    },
    /// Remove one task by title, or every owned task when the title is an
    /// "all tasks" phrase
    Delete { title: String },
    /// Answer a counting question about the owner's tasks
    Analytics { query: String },
}

/// Decoded batch: actions in model order, plus the tags that were dropped
/// because they are not part of the vocabulary
#[derive(Debug, Clone, Default)]
pub struct ParsedBatch {
    pub actions: Vec<Action>,
    pub unrecognized: Vec<String>,
}

/// Shape of one element as the model emits it; every field optional so a
/// sloppy response still decodes
#[derive(Debug, Deserialize)]
struct RawAction {
    action: Option<String>,
    title: Option<String>,
    description: Option<String>,
    #[serde(alias = "dueDate")]
    due_date: Option<String>,
    priority: Option<String>,
    status: Option<String>,
    category: Option<String>,
    query: Option<String>,
}

/// Decode raw model text into an ordered action batch
///
/// Tries the whole text as a JSON array first, then the first bracketed
/// substring, then gives up with a `ParseFailure` carrying the raw text.
pub fn parse_actions(raw: &str) -> Result<ParsedBatch> {
    let elements = decode_array(raw)?;

    let mut batch = ParsedBatch::default();
    for element in elements {
        match map_raw(element) {
            Mapped::Action(action) => batch.actions.push(action),
            Mapped::Unrecognized(tag) => {
                tracing::debug!(tag = %tag, "dropping unrecognized action tag");
                batch.unrecognized.push(tag);
            }
        }
    }
    Ok(batch)
}

fn decode_array(raw: &str) -> Result<Vec<RawAction>> {
    if let Ok(elements) = serde_json::from_str::<Vec<RawAction>>(raw.trim()) {
        return Ok(elements);
    }

    let candidate = extract_array(raw).ok_or_else(|| CommandError::ParseFailure {
        reason: "no JSON array found in response".into(),
        raw: raw.to_string(),
    })?;

    serde_json::from_str::<Vec<RawAction>>(candidate).map_err(|e| CommandError::ParseFailure {
        reason: e.to_string(),
        raw: raw.to_string(),
    })
}

/// First substring bounded by a matching `[` ... `]` pair
///
/// Depth-counted and string-aware, so brackets inside quoted titles do not
/// end the scan early.
fn extract_array(raw: &str) -> Option<&str> {
    let start = raw.find('[')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, c) in raw[start..].char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '[' => depth += 1,
            ']' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&raw[start..start + offset + c.len_utf8()]);
                }
            }
            _ => {}
        }
    }
    None
}

enum Mapped {
    Action(Action),
    Unrecognized(String),
}

fn map_raw(raw: RawAction) -> Mapped {
    let tag = raw.action.clone().unwrap_or_default().to_lowercase();
    let title = raw.title.unwrap_or_default();

    match tag.as_str() {
        "add" => Mapped::Action(Action::Add {
            title,
            description: raw.description.unwrap_or_default(),
            due_date: raw.due_date,
            priority: raw
                .priority
                .as_deref()
                .and_then(Priority::parse)
                .unwrap_or_default(),
            status: raw
                .status
                .as_deref()
                .and_then(Status::parse)
                .unwrap_or_default(),
            category: raw.category.unwrap_or_else(|| "General".into()),
        }),
        "edit" => Mapped::Action(Action::Edit {
            title,
            description: raw.description,
            due_date: raw.due_date,
            priority: raw.priority.as_deref().and_then(Priority::parse),
            status: raw.status.as_deref().and_then(Status::parse),
            category: raw.category,
        }),
        "delete" => Mapped::Action(Action::Delete { title }),
        "analytics" => Mapped::Action(Action::Analytics {
            query: raw.query.unwrap_or_default(),
        }),
        _ => Mapped::Unrecognized(tag),
    }
}
