//! Remote wire row shapes.
//!
//! # Responsibility
//! - Mirror the remote store's column naming (`user_id`, `task_id`,
//!   `user_name`, `created_at` as RFC 3339 text) exactly as transported.
//!
//! # Invariants
//! - Row types carry store schema names; semantic renaming happens in the
//!   loader, never here.
//! - `New*` payloads omit store-assigned fields (id, created_at).

use serde::{Deserialize, Serialize};

/// One row of the remote `users` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRow {
    pub id: i64,
    pub name: String,
    pub email: String,
}

/// Insert payload for the remote `users` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUserRow {
    pub name: String,
    pub email: String,
}

/// One row of the remote `tasks` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRow {
    pub id: i64,
    pub text: String,
    pub completed: bool,
    pub user_id: i64,
    /// Store-assigned creation instant, RFC 3339 text.
    pub created_at: String,
}

/// Insert payload for the remote `tasks` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTaskRow {
    pub text: String,
    pub completed: bool,
    pub user_id: i64,
}

/// Partial update for one `tasks` row.
///
/// Completion state is the only task field this system ever updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskPatch {
    pub completed: bool,
}

/// One row of the remote `comments` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentRow {
    pub id: i64,
    pub task_id: i64,
    pub user_id: i64,
    pub user_name: String,
    pub content: String,
    /// Store-assigned creation instant, RFC 3339 text.
    pub created_at: String,
}

/// Insert payload for the remote `comments` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCommentRow {
    pub task_id: i64,
    pub user_id: i64,
    /// Creation-time snapshot of the author's display name.
    pub user_name: String,
    pub content: String,
}

#[cfg(test)]
mod tests {
    use super::{CommentRow, TaskRow};

    #[test]
    fn task_row_uses_store_column_names_on_the_wire() {
        let row = TaskRow {
            id: 5,
            text: "ship it".to_string(),
            completed: false,
            user_id: 2,
            created_at: "2024-04-01T09:30:00+00:00".to_string(),
        };

        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["user_id"], 2);
        assert_eq!(json["created_at"], "2024-04-01T09:30:00+00:00");

        let decoded: TaskRow = serde_json::from_value(json).unwrap();
        assert_eq!(decoded, row);
    }

    #[test]
    fn comment_row_round_trips_denormalized_author_name() {
        let row = CommentRow {
            id: 9,
            task_id: 5,
            user_id: 2,
            user_name: "Tanaka".to_string(),
            content: "done?".to_string(),
            created_at: "2024-04-01T10:00:00+00:00".to_string(),
        };

        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["user_name"], "Tanaka");

        let decoded: CommentRow = serde_json::from_value(json).unwrap();
        assert_eq!(decoded, row);
    }
}
