//! Board record types.
//!
//! # Responsibility
//! - Define `User`, `Task` and `Comment` in their semantic (application)
//!   shape, after remote field mapping.
//!
//! # Invariants
//! - Ids are opaque, store-assigned and never reused.
//! - `Task::owner_id` is set once at creation and never reassigned.
//! - `Comment::user_name` is a creation-time snapshot of the author name
//!   and is not kept in sync with later renames.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Stable store-assigned identifier for a user.
pub type UserId = i64;
/// Stable store-assigned identifier for a task.
pub type TaskId = i64;
/// Stable store-assigned identifier for a comment.
pub type CommentId = i64;

/// A registered board user.
///
/// Users are created via registration only; this core never mutates or
/// deletes them. The serialized form doubles as the durable local identity
/// copy kept by the session layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
}

/// A task owned by exactly one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    /// Non-empty at creation.
    pub text: String,
    pub completed: bool,
    /// References the creating `User`; immutable after creation.
    pub owner_id: UserId,
}

/// A threaded comment attached to a task.
///
/// Comments are never edited or deleted directly; they disappear only when
/// their task is deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,
    pub task_id: TaskId,
    /// Comment author; immutable.
    pub user_id: UserId,
    /// Author name as it was when the comment was created.
    pub user_name: String,
    pub content: String,
    /// Store-assigned creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Returns the trimmed value when it is non-empty, `None` otherwise.
///
/// Shared precondition check for every user-entered text field.
pub fn trimmed_non_empty(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}
