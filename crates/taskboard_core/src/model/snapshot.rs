//! In-memory mirror of remote board state.
//!
//! # Responsibility
//! - Hold the loaded user/task/comment sets as one snapshot value.
//! - Provide lookup helpers and the local task-delete cascade.
//! - Track ephemeral per-task comment drafts.
//!
//! # Invariants
//! - A consistent snapshot has no task owner or comment reference that
//!   points outside the loaded sets; `verify_references` checks this.
//! - Drafts are process-local input state and are never persisted.

use crate::model::board::{Comment, CommentId, Task, TaskId, User, UserId};
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// A dangling reference found inside a snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReferenceViolation {
    /// Task whose owner is not in the user set.
    TaskOwner { task_id: TaskId, owner_id: UserId },
    /// Comment whose task is not in the task set.
    CommentTask {
        comment_id: CommentId,
        task_id: TaskId,
    },
    /// Comment whose author is not in the user set.
    CommentAuthor {
        comment_id: CommentId,
        user_id: UserId,
    },
}

impl Display for ReferenceViolation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TaskOwner { task_id, owner_id } => {
                write!(f, "task {task_id} references missing owner {owner_id}")
            }
            Self::CommentTask {
                comment_id,
                task_id,
            } => write!(f, "comment {comment_id} references missing task {task_id}"),
            Self::CommentAuthor {
                comment_id,
                user_id,
            } => write!(f, "comment {comment_id} references missing author {user_id}"),
        }
    }
}

impl Error for ReferenceViolation {}

/// Point-in-time mirror of the remote `users`/`tasks`/`comments` sets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    pub users: Vec<User>,
    pub tasks: Vec<Task>,
    pub comments: Vec<Comment>,
}

impl Snapshot {
    /// Looks up one user by id.
    pub fn user(&self, id: UserId) -> Option<&User> {
        self.users.iter().find(|user| user.id == id)
    }

    /// Looks up one task by id.
    pub fn task(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    pub(crate) fn task_mut(&mut self, id: TaskId) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|task| task.id == id)
    }

    /// Removes a task and every comment attached to it.
    ///
    /// Mirrors the remote store's delete cascade; removing an unknown task
    /// id leaves the snapshot unchanged.
    pub(crate) fn remove_task(&mut self, id: TaskId) {
        self.tasks.retain(|task| task.id != id);
        self.comments.retain(|comment| comment.task_id != id);
    }

    /// Checks that every cross-record reference resolves inside this
    /// snapshot.
    ///
    /// # Errors
    /// - Returns the first dangling reference found, in task-then-comment
    ///   order.
    pub fn verify_references(&self) -> Result<(), ReferenceViolation> {
        for task in &self.tasks {
            if self.user(task.owner_id).is_none() {
                return Err(ReferenceViolation::TaskOwner {
                    task_id: task.id,
                    owner_id: task.owner_id,
                });
            }
        }
        for comment in &self.comments {
            if self.task(comment.task_id).is_none() {
                return Err(ReferenceViolation::CommentTask {
                    comment_id: comment.id,
                    task_id: comment.task_id,
                });
            }
            if self.user(comment.user_id).is_none() {
                return Err(ReferenceViolation::CommentAuthor {
                    comment_id: comment.id,
                    user_id: comment.user_id,
                });
            }
        }
        Ok(())
    }
}

/// Unsaved per-task comment input.
///
/// Missing entries read as the empty string, matching cleared state.
#[derive(Debug, Clone, Default)]
pub struct CommentDrafts {
    by_task: HashMap<TaskId, String>,
}

impl CommentDrafts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores the pending input for one task, replacing any previous text.
    pub fn set(&mut self, task_id: TaskId, text: impl Into<String>) {
        self.by_task.insert(task_id, text.into());
    }

    /// Returns the pending input for one task, empty when none was set.
    pub fn get(&self, task_id: TaskId) -> &str {
        self.by_task
            .get(&task_id)
            .map_or("", |text| text.as_str())
    }

    /// Discards the pending input for one task.
    pub fn clear(&mut self, task_id: TaskId) {
        self.by_task.remove(&task_id);
    }
}

#[cfg(test)]
mod tests {
    use super::{CommentDrafts, ReferenceViolation, Snapshot};
    use crate::model::board::{Comment, Task, User};
    use chrono::{TimeZone, Utc};

    fn user(id: i64, name: &str) -> User {
        User {
            id,
            name: name.to_string(),
            email: format!("{name}@example.com"),
        }
    }

    fn task(id: i64, owner_id: i64) -> Task {
        Task {
            id,
            text: format!("task {id}"),
            completed: false,
            owner_id,
        }
    }

    fn comment(id: i64, task_id: i64, user_id: i64) -> Comment {
        Comment {
            id,
            task_id,
            user_id,
            user_name: "author".to_string(),
            content: "note".to_string(),
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn remove_task_cascades_to_comments() {
        let mut snapshot = Snapshot {
            users: vec![user(1, "a")],
            tasks: vec![task(10, 1), task(11, 1)],
            comments: vec![comment(100, 10, 1), comment(101, 11, 1)],
        };

        snapshot.remove_task(10);

        assert!(snapshot.task(10).is_none());
        assert_eq!(snapshot.tasks.len(), 1);
        assert_eq!(snapshot.comments.len(), 1);
        assert_eq!(snapshot.comments[0].task_id, 11);
    }

    #[test]
    fn remove_unknown_task_is_a_no_op() {
        let mut snapshot = Snapshot {
            users: vec![user(1, "a")],
            tasks: vec![task(10, 1)],
            comments: vec![comment(100, 10, 1)],
        };

        snapshot.remove_task(99);

        assert_eq!(snapshot.tasks.len(), 1);
        assert_eq!(snapshot.comments.len(), 1);
    }

    #[test]
    fn verify_references_accepts_consistent_snapshot() {
        let snapshot = Snapshot {
            users: vec![user(1, "a")],
            tasks: vec![task(10, 1)],
            comments: vec![comment(100, 10, 1)],
        };
        assert_eq!(snapshot.verify_references(), Ok(()));
    }

    #[test]
    fn verify_references_reports_orphaned_task_owner() {
        let snapshot = Snapshot {
            users: vec![],
            tasks: vec![task(10, 7)],
            comments: vec![],
        };
        assert_eq!(
            snapshot.verify_references(),
            Err(ReferenceViolation::TaskOwner {
                task_id: 10,
                owner_id: 7,
            })
        );
    }

    #[test]
    fn verify_references_reports_orphaned_comment() {
        let snapshot = Snapshot {
            users: vec![user(1, "a")],
            tasks: vec![task(10, 1)],
            comments: vec![comment(100, 99, 1)],
        };
        assert_eq!(
            snapshot.verify_references(),
            Err(ReferenceViolation::CommentTask {
                comment_id: 100,
                task_id: 99,
            })
        );
    }

    #[test]
    fn drafts_read_empty_when_unset_and_clear_on_demand() {
        let mut drafts = CommentDrafts::new();
        assert_eq!(drafts.get(10), "");

        drafts.set(10, "looks good");
        assert_eq!(drafts.get(10), "looks good");

        drafts.set(10, "looks great");
        assert_eq!(drafts.get(10), "looks great");

        drafts.clear(10);
        assert_eq!(drafts.get(10), "");
    }
}
