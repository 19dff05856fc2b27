//! Client-side synchronization core for a multi-user task board.
//!
//! Remote state is the source of truth; this crate restores and validates
//! the active-user session, mirrors remote records into a local snapshot,
//! applies every mutation write-through (confirm remotely, then mirror
//! locally) and derives the views the presentation layer renders.

pub mod db;
pub mod gateway;
pub mod logging;
pub mod model;
pub mod service;
pub mod session;

pub use gateway::memory::MemoryGateway;
pub use gateway::rows::{
    CommentRow, NewCommentRow, NewTaskRow, NewUserRow, TaskPatch, TaskRow, UserRow,
};
pub use gateway::sqlite::SqliteGateway;
pub use gateway::{BoardGateway, GatewayError, GatewayOp, GatewayResult};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::board::{Comment, CommentId, Task, TaskId, User, UserId};
pub use model::snapshot::{CommentDrafts, ReferenceViolation, Snapshot};
pub use service::board_service::{BoardService, MutationError, MutationResult, Rejection};
pub use service::loader::{load_board, LoadError, LoadResult, RowMapError};
pub use service::views::{board_of, comments_of, split_by_completion, tasks_of, TaskBuckets};
pub use session::identity::{
    FileIdentityStore, IdentityResult, IdentityStore, IdentityStoreError, MemoryIdentityStore,
};
pub use session::{SessionManager, SessionState};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
