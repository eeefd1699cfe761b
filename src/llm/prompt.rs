//! Prompt construction for the command interpreter
//!
//! The system prompt pins the action vocabulary and the exact JSON-array
//! output shape, and embeds today's date so the model resolves relative
//! dates ("tomorrow", "next Friday") before the parser ever sees them.

use chrono::{Days, NaiveDate};

/// Build the system prompt for one completion request
///
/// # Arguments
/// * `today` - Calendar date the model should treat as "today"
pub fn build_system_prompt(today: NaiveDate) -> String {
    let tomorrow = today
        .checked_add_days(Days::new(1))
        .unwrap_or(today);

    format!(
        r#"You convert a user's task-management request into a JSON array of actions.

TODAY'S DATE: {today}
Resolve every relative date ("tomorrow", "next Friday", "in two weeks") to an
absolute YYYY-MM-DD date before answering.

AVAILABLE ACTIONS:
- add: create a task. Requires title and dueDate; description, priority
  (Low|Medium|High), status (Not Started|In Progress|Completed) and category
  are optional.
- edit: change fields on the existing task whose title matches exactly.
  Only include the fields being changed.
- delete: remove the task with the given title. When the user means every
  task, use the title "all tasks".
- analytics: answer a counting question. The query is one of: overdue,
  completed, in progress, not started, high priority, medium priority,
  low priority.

OUTPUT FORMAT (a single-line JSON array, no explanation):
[{{"action":"add","title":"...","description":"...","dueDate":"YYYY-MM-DD","priority":"Medium","status":"Not Started","category":"..."}}]

Examples:
"add buy milk due tomorrow" -> [{{"action":"add","title":"Buy milk","dueDate":"{tomorrow}"}}]
"mark buy milk as done" -> [{{"action":"edit","title":"Buy milk","status":"Completed"}}]
"push the report to friday and make it high priority" -> [{{"action":"edit","title":"Report","dueDate":"YYYY-MM-DD","priority":"High"}}]
"delete the dentist appointment" -> [{{"action":"delete","title":"Dentist appointment"}}]
"clear everything" -> [{{"action":"delete","title":"all tasks"}}]
"how many tasks are overdue" -> [{{"action":"analytics","query":"overdue"}}]
"#
    )
}
