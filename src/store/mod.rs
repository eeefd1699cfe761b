//! Task persistence boundary
//!
//! The command engine reaches the document store through the `TaskStore`
//! trait so business rules never touch a concrete database handle. The
//! adapter owns the activity-log invariants: every effective mutation
//! appends audit entries, a no-op update appends one generic entry, and
//! deletion appends a terminal snapshot entry before removing the record.

pub mod memory;
pub mod task;

pub use memory::MemoryTaskStore;
pub use task::{ActivityEntry, NewTask, Priority, Status, Task, TaskPatch};

use crate::core::types::{TaskId, UserId};

/// CRUD operations over task records, scoped to an owning user
///
/// Each method is atomic at the single-record level; callers must not
/// assume isolation beyond one call.
pub trait TaskStore {
    /// Create a task owned by `owner`, appending the "created" entry
    fn create(&mut self, owner: UserId, fields: NewTask) -> Task;

    /// First task owned by `owner` whose title matches exactly
    /// (case-sensitive, insertion order)
    fn find_one_by_title(&self, owner: UserId, title: &str) -> Option<Task>;

    /// Apply the present fields of `patch`; returns the updated record, or
    /// None when the task no longer exists
    fn update_fields(&mut self, owner: UserId, id: TaskId, patch: TaskPatch) -> Option<Task>;

    /// Remove one task; returns false when it no longer exists
    fn delete_one(&mut self, owner: UserId, id: TaskId) -> bool;

    /// Remove every task owned by `owner`, returning how many were removed
    fn delete_all_by_owner(&mut self, owner: UserId) -> usize;

    /// Count `owner`'s tasks satisfying `predicate`
    fn count_by_filter(&self, owner: UserId, predicate: &dyn Fn(&Task) -> bool) -> usize;
}
