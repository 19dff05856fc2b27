//! Read-side projections over the snapshot.
//!
//! # Responsibility
//! - Derive per-user task lists, completion buckets and per-task comment
//!   threads.
//!
//! # Invariants
//! - Projections are pure and recomputed on read; they never mutate the
//!   snapshot or cache results.
//! - Returned orderings preserve snapshot (load/creation) order.

use crate::model::board::{Comment, Task, TaskId, UserId};
use crate::model::snapshot::Snapshot;

/// A user's tasks split by completion state.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct TaskBuckets<'a> {
    pub incomplete: Vec<&'a Task>,
    pub complete: Vec<&'a Task>,
}

/// Tasks owned by one user, in creation order.
pub fn tasks_of(snapshot: &Snapshot, owner_id: UserId) -> Vec<&Task> {
    snapshot
        .tasks
        .iter()
        .filter(|task| task.owner_id == owner_id)
        .collect()
}

/// Partitions tasks into incomplete/complete buckets.
pub fn split_by_completion<'a>(tasks: &[&'a Task]) -> TaskBuckets<'a> {
    let mut buckets = TaskBuckets::default();
    for task in tasks {
        if task.completed {
            buckets.complete.push(task);
        } else {
            buckets.incomplete.push(task);
        }
    }
    buckets
}

/// One user's full board view: their tasks, bucketed.
pub fn board_of(snapshot: &Snapshot, owner_id: UserId) -> TaskBuckets<'_> {
    split_by_completion(&tasks_of(snapshot, owner_id))
}

/// Comments attached to one task, in creation order.
pub fn comments_of(snapshot: &Snapshot, task_id: TaskId) -> Vec<&Comment> {
    snapshot
        .comments
        .iter()
        .filter(|comment| comment.task_id == task_id)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{board_of, comments_of, split_by_completion, tasks_of};
    use crate::model::board::{Comment, Task, User};
    use crate::model::snapshot::Snapshot;
    use chrono::{TimeZone, Utc};

    fn snapshot() -> Snapshot {
        let users = vec![
            User {
                id: 1,
                name: "a".to_string(),
                email: "a@example.com".to_string(),
            },
            User {
                id: 2,
                name: "b".to_string(),
                email: "b@example.com".to_string(),
            },
        ];
        let tasks = vec![
            Task {
                id: 10,
                text: "first".to_string(),
                completed: false,
                owner_id: 1,
            },
            Task {
                id: 11,
                text: "second".to_string(),
                completed: true,
                owner_id: 1,
            },
            Task {
                id: 12,
                text: "other".to_string(),
                completed: false,
                owner_id: 2,
            },
        ];
        let comments = vec![
            Comment {
                id: 100,
                task_id: 10,
                user_id: 2,
                user_name: "b".to_string(),
                content: "on it?".to_string(),
                created_at: Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap(),
            },
            Comment {
                id: 101,
                task_id: 10,
                user_id: 1,
                user_name: "a".to_string(),
                content: "yes".to_string(),
                created_at: Utc.with_ymd_and_hms(2024, 3, 1, 9, 5, 0).unwrap(),
            },
            Comment {
                id: 102,
                task_id: 11,
                user_id: 1,
                user_name: "a".to_string(),
                content: "done".to_string(),
                created_at: Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap(),
            },
        ];
        Snapshot {
            users,
            tasks,
            comments,
        }
    }

    #[test]
    fn tasks_of_scopes_to_owner() {
        let snapshot = snapshot();
        let mine = tasks_of(&snapshot, 1);
        assert_eq!(mine.len(), 2);
        assert!(mine.iter().all(|task| task.owner_id == 1));

        assert!(tasks_of(&snapshot, 99).is_empty());
    }

    #[test]
    fn split_by_completion_partitions_both_ways() {
        let snapshot = snapshot();
        let buckets = split_by_completion(&tasks_of(&snapshot, 1));
        assert_eq!(buckets.incomplete.len(), 1);
        assert_eq!(buckets.incomplete[0].id, 10);
        assert_eq!(buckets.complete.len(), 1);
        assert_eq!(buckets.complete[0].id, 11);
    }

    #[test]
    fn board_of_combines_scoping_and_bucketing() {
        let snapshot = snapshot();
        let board = board_of(&snapshot, 2);
        assert_eq!(board.incomplete.len(), 1);
        assert_eq!(board.incomplete[0].id, 12);
        assert!(board.complete.is_empty());
    }

    #[test]
    fn comments_of_keeps_creation_order() {
        let snapshot = snapshot();
        let thread = comments_of(&snapshot, 10);
        assert_eq!(thread.len(), 2);
        assert_eq!(thread[0].id, 100);
        assert_eq!(thread[1].id, 101);

        assert!(comments_of(&snapshot, 12).is_empty());
    }
}
