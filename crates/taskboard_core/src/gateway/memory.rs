//! In-memory gateway implementation.
//!
//! # Responsibility
//! - Provide a deterministic, process-local stand-in for the remote store,
//!   used by tests and demos.
//! - Enforce the same referential rules a relational backend would
//!   (foreign keys, delete cascade).
//!
//! # Invariants
//! - Ids are assigned sequentially per table, starting at 1.
//! - Creation timestamps are a logical clock rendered as RFC 3339 text, so
//!   insertion order and creation-time order always agree.

use crate::gateway::rows::{
    CommentRow, NewCommentRow, NewTaskRow, NewUserRow, TaskPatch, TaskRow, UserRow,
};
use crate::gateway::{BoardGateway, GatewayError, GatewayOp, GatewayResult};
use std::cell::{Cell, RefCell};

#[derive(Debug, Default)]
struct Tables {
    users: Vec<UserRow>,
    tasks: Vec<TaskRow>,
    comments: Vec<CommentRow>,
    next_user_id: i64,
    next_task_id: i64,
    next_comment_id: i64,
    clock: i64,
}

impl Tables {
    fn next_created_at(&mut self) -> String {
        self.clock += 1;
        // Lexicographic and chronological order agree while the logical
        // clock stays below one million ticks.
        format!("2024-01-01T00:00:00.{:06}Z", self.clock)
    }
}

/// Process-local board store with the full gateway contract.
///
/// Not thread-safe; the synchronization model is single-threaded
/// cooperative scheduling, matching the rest of the core.
#[derive(Debug, Default)]
pub struct MemoryGateway {
    tables: RefCell<Tables>,
    fail_reads: RefCell<Option<String>>,
    fail_writes: RefCell<Option<String>>,
    write_ops: Cell<usize>,
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent read fail with `message`; `None` restores
    /// normal behavior. Used to exercise load-failure contracts.
    pub fn set_read_failure(&self, message: Option<&str>) {
        *self.fail_reads.borrow_mut() = message.map(str::to_string);
    }

    /// Makes every subsequent write fail with `message`; `None` restores
    /// normal behavior. Used to exercise write-rejection contracts.
    pub fn set_write_failure(&self, message: Option<&str>) {
        *self.fail_writes.borrow_mut() = message.map(str::to_string);
    }

    /// Number of insert/update/delete calls that reached this store,
    /// including rejected ones.
    pub fn write_ops(&self) -> usize {
        self.write_ops.get()
    }

    /// Removes one user row directly, bypassing the gateway contract.
    ///
    /// Models an out-of-band remote change (this core never deletes
    /// users); lets tests stage stale-session and orphaned-row states.
    pub fn remove_user(&self, id: i64) {
        self.tables.borrow_mut().users.retain(|row| row.id != id);
    }

    fn check_read(&self, table: &'static str) -> GatewayResult<()> {
        match self.fail_reads.borrow().as_ref() {
            Some(message) => Err(GatewayError::new(table, GatewayOp::Select, message)),
            None => Ok(()),
        }
    }

    fn check_write(&self, table: &'static str, op: GatewayOp) -> GatewayResult<()> {
        self.write_ops.set(self.write_ops.get() + 1);
        match self.fail_writes.borrow().as_ref() {
            Some(message) => Err(GatewayError::new(table, op, message)),
            None => Ok(()),
        }
    }
}

impl BoardGateway for MemoryGateway {
    async fn select_users(&self) -> GatewayResult<Vec<UserRow>> {
        self.check_read("users")?;
        let mut rows = self.tables.borrow().users.clone();
        rows.sort_by_key(|row| row.id);
        Ok(rows)
    }

    async fn select_tasks(&self) -> GatewayResult<Vec<TaskRow>> {
        self.check_read("tasks")?;
        Ok(self.tables.borrow().tasks.clone())
    }

    async fn select_comments(&self) -> GatewayResult<Vec<CommentRow>> {
        self.check_read("comments")?;
        Ok(self.tables.borrow().comments.clone())
    }

    async fn insert_user(&self, row: NewUserRow) -> GatewayResult<UserRow> {
        self.check_write("users", GatewayOp::Insert)?;
        let mut tables = self.tables.borrow_mut();
        tables.next_user_id += 1;
        let stored = UserRow {
            id: tables.next_user_id,
            name: row.name,
            email: row.email,
        };
        tables.users.push(stored.clone());
        Ok(stored)
    }

    async fn insert_task(&self, row: NewTaskRow) -> GatewayResult<TaskRow> {
        self.check_write("tasks", GatewayOp::Insert)?;
        let mut tables = self.tables.borrow_mut();
        if !tables.users.iter().any(|user| user.id == row.user_id) {
            return Err(GatewayError::new(
                "tasks",
                GatewayOp::Insert,
                format!("user_id {} violates foreign key", row.user_id),
            ));
        }
        tables.next_task_id += 1;
        let created_at = tables.next_created_at();
        let stored = TaskRow {
            id: tables.next_task_id,
            text: row.text,
            completed: row.completed,
            user_id: row.user_id,
            created_at,
        };
        tables.tasks.push(stored.clone());
        Ok(stored)
    }

    async fn insert_comment(&self, row: NewCommentRow) -> GatewayResult<CommentRow> {
        self.check_write("comments", GatewayOp::Insert)?;
        let mut tables = self.tables.borrow_mut();
        if !tables.tasks.iter().any(|task| task.id == row.task_id) {
            return Err(GatewayError::new(
                "comments",
                GatewayOp::Insert,
                format!("task_id {} violates foreign key", row.task_id),
            ));
        }
        if !tables.users.iter().any(|user| user.id == row.user_id) {
            return Err(GatewayError::new(
                "comments",
                GatewayOp::Insert,
                format!("user_id {} violates foreign key", row.user_id),
            ));
        }
        tables.next_comment_id += 1;
        let created_at = tables.next_created_at();
        let stored = CommentRow {
            id: tables.next_comment_id,
            task_id: row.task_id,
            user_id: row.user_id,
            user_name: row.user_name,
            content: row.content,
            created_at,
        };
        tables.comments.push(stored.clone());
        Ok(stored)
    }

    async fn update_task(&self, id: i64, patch: TaskPatch) -> GatewayResult<()> {
        self.check_write("tasks", GatewayOp::Update)?;
        let mut tables = self.tables.borrow_mut();
        match tables.tasks.iter_mut().find(|task| task.id == id) {
            Some(task) => {
                task.completed = patch.completed;
                Ok(())
            }
            None => Err(GatewayError::new(
                "tasks",
                GatewayOp::Update,
                format!("no row with id {id}"),
            )),
        }
    }

    async fn delete_task(&self, id: i64) -> GatewayResult<()> {
        self.check_write("tasks", GatewayOp::Delete)?;
        let mut tables = self.tables.borrow_mut();
        if !tables.tasks.iter().any(|task| task.id == id) {
            return Err(GatewayError::new(
                "tasks",
                GatewayOp::Delete,
                format!("no row with id {id}"),
            ));
        }
        tables.tasks.retain(|task| task.id != id);
        tables.comments.retain(|comment| comment.task_id != id);
        Ok(())
    }
}
