//! Remote store gateway contract and implementations.
//!
//! # Responsibility
//! - Define the capability contract the core needs from the remote
//!   relational store: ordered reads plus row-level create/update/delete.
//! - Keep storage transport details behind gateway implementations.
//!
//! # Invariants
//! - Inserts return the created row with store-assigned id and timestamp.
//! - Deleting a task also deletes its comments inside the store; callers
//!   mirror that cascade locally after confirmation.
//! - One gateway call is issued at a time per user action; calls against
//!   the same entity are executed in call order.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod memory;
pub mod rows;
pub mod sqlite;

use rows::{CommentRow, NewCommentRow, NewTaskRow, NewUserRow, TaskPatch, TaskRow, UserRow};

pub type GatewayResult<T> = Result<T, GatewayError>;

/// Row-level operation kind, used for error context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatewayOp {
    Select,
    Insert,
    Update,
    Delete,
}

impl Display for GatewayOp {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Select => "select",
            Self::Insert => "insert",
            Self::Update => "update",
            Self::Delete => "delete",
        };
        write!(f, "{name}")
    }
}

/// Failure reported by the remote store for one operation.
///
/// Carried backend-agnostic so in-memory and SQLite gateways (and tests)
/// produce the same shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayError {
    pub table: &'static str,
    pub op: GatewayOp,
    pub message: String,
}

impl GatewayError {
    pub fn new(table: &'static str, op: GatewayOp, message: impl Into<String>) -> Self {
        Self {
            table,
            op,
            message: message.into(),
        }
    }
}

impl Display for GatewayError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "remote {} on `{}` failed: {}",
            self.op, self.table, self.message
        )
    }
}

impl Error for GatewayError {}

/// Capability contract consumed by the loader and the board service.
///
/// Every operation suspends its caller until the remote store resolves it;
/// there is no timeout or cancellation at this layer. A failed operation
/// leaves remote state untouched from the caller's point of view.
#[allow(async_fn_in_trait)]
pub trait BoardGateway {
    /// Reads all users, ordered by id.
    async fn select_users(&self) -> GatewayResult<Vec<UserRow>>;

    /// Reads all tasks, ordered by creation time.
    async fn select_tasks(&self) -> GatewayResult<Vec<TaskRow>>;

    /// Reads all comments, ordered by creation time.
    async fn select_comments(&self) -> GatewayResult<Vec<CommentRow>>;

    /// Creates one user and returns the stored row.
    async fn insert_user(&self, row: NewUserRow) -> GatewayResult<UserRow>;

    /// Creates one task and returns the stored row.
    async fn insert_task(&self, row: NewTaskRow) -> GatewayResult<TaskRow>;

    /// Creates one comment and returns the stored row.
    async fn insert_comment(&self, row: NewCommentRow) -> GatewayResult<CommentRow>;

    /// Applies a partial update to one task row.
    ///
    /// # Errors
    /// - Fails when no row with `id` exists.
    async fn update_task(&self, id: i64, patch: TaskPatch) -> GatewayResult<()>;

    /// Deletes one task row; dependent comments are removed by the store.
    ///
    /// # Errors
    /// - Fails when no row with `id` exists.
    async fn delete_task(&self, id: i64) -> GatewayResult<()>;
}

#[cfg(test)]
mod tests {
    use super::{GatewayError, GatewayOp};

    #[test]
    fn gateway_error_display_names_operation_and_table() {
        let err = GatewayError::new("tasks", GatewayOp::Update, "connection reset");
        assert_eq!(
            err.to_string(),
            "remote update on `tasks` failed: connection reset"
        );
    }
}
