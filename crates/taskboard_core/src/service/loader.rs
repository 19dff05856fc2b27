//! Initial board loading and remote-row reshaping.
//!
//! # Responsibility
//! - Fetch the three record sets through the gateway in one pass.
//! - Map store column shapes to the semantic model (`user_id` becomes
//!   `owner_id`, RFC 3339 text becomes a structured timestamp).
//!
//! # Invariants
//! - All three reads must succeed; a failed read or unmappable row yields
//!   one aggregated error and no partial snapshot.
//! - A published snapshot has verified cross-record references.

use crate::gateway::rows::{CommentRow, TaskRow, UserRow};
use crate::gateway::{BoardGateway, GatewayError};
use crate::model::board::{Comment, Task, User};
use crate::model::snapshot::{ReferenceViolation, Snapshot};
use chrono::{DateTime, Utc};
use log::{error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

pub type LoadResult<T> = Result<T, LoadError>;

/// A remote row that cannot be reshaped into the semantic model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowMapError {
    pub table: &'static str,
    pub message: String,
}

impl Display for RowMapError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid `{}` row: {}", self.table, self.message)
    }
}

impl Error for RowMapError {}

/// Aggregated startup-load failure.
///
/// Fatal to startup: the caller keeps an empty snapshot and surfaces the
/// message; there is no partial recovery at this layer.
#[derive(Debug)]
pub enum LoadError {
    /// One of the three reads failed.
    Gateway(GatewayError),
    /// A fetched row could not be mapped.
    InvalidRow(RowMapError),
    /// The fetched sets contradict each other.
    BrokenReference(ReferenceViolation),
}

impl Display for LoadError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Gateway(err) => write!(f, "{err}"),
            Self::InvalidRow(err) => write!(f, "{err}"),
            Self::BrokenReference(err) => write!(f, "inconsistent board data: {err}"),
        }
    }
}

impl Error for LoadError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Gateway(err) => Some(err),
            Self::InvalidRow(err) => Some(err),
            Self::BrokenReference(err) => Some(err),
        }
    }
}

impl From<GatewayError> for LoadError {
    fn from(value: GatewayError) -> Self {
        Self::Gateway(value)
    }
}

impl From<RowMapError> for LoadError {
    fn from(value: RowMapError) -> Self {
        Self::InvalidRow(value)
    }
}

impl From<ReferenceViolation> for LoadError {
    fn from(value: ReferenceViolation) -> Self {
        Self::BrokenReference(value)
    }
}

/// Loads users, tasks and comments into one consistent snapshot.
///
/// # Contract
/// - Reads in fixed order: users, tasks, comments.
/// - Returns the first failure unchanged; nothing is published on error.
///
/// # Side effects
/// - Emits `board_load` logging events with counts and duration.
pub async fn load_board<G: BoardGateway>(gateway: &G) -> LoadResult<Snapshot> {
    let started_at = Instant::now();
    info!("event=board_load module=loader status=start");

    match load_board_inner(gateway).await {
        Ok(snapshot) => {
            info!(
                "event=board_load module=loader status=ok users={} tasks={} comments={} duration_ms={}",
                snapshot.users.len(),
                snapshot.tasks.len(),
                snapshot.comments.len(),
                started_at.elapsed().as_millis()
            );
            Ok(snapshot)
        }
        Err(err) => {
            error!(
                "event=board_load module=loader status=error duration_ms={} error={}",
                started_at.elapsed().as_millis(),
                err
            );
            Err(err)
        }
    }
}

async fn load_board_inner<G: BoardGateway>(gateway: &G) -> LoadResult<Snapshot> {
    let user_rows = gateway.select_users().await?;
    let task_rows = gateway.select_tasks().await?;
    let comment_rows = gateway.select_comments().await?;

    let snapshot = Snapshot {
        users: user_rows.into_iter().map(user_from_row).collect(),
        tasks: task_rows.into_iter().map(task_from_row).collect(),
        comments: comment_rows
            .into_iter()
            .map(comment_from_row)
            .collect::<Result<Vec<_>, _>>()?,
    };

    snapshot.verify_references()?;
    Ok(snapshot)
}

pub(crate) fn user_from_row(row: UserRow) -> User {
    User {
        id: row.id,
        name: row.name,
        email: row.email,
    }
}

pub(crate) fn task_from_row(row: TaskRow) -> Task {
    Task {
        id: row.id,
        text: row.text,
        completed: row.completed,
        owner_id: row.user_id,
    }
}

pub(crate) fn comment_from_row(row: CommentRow) -> Result<Comment, RowMapError> {
    let created_at = parse_created_at("comments", &row.created_at)?;
    Ok(Comment {
        id: row.id,
        task_id: row.task_id,
        user_id: row.user_id,
        user_name: row.user_name,
        content: row.content,
        created_at,
    })
}

fn parse_created_at(table: &'static str, value: &str) -> Result<DateTime<Utc>, RowMapError> {
    DateTime::parse_from_rfc3339(value)
        .map(|parsed| parsed.with_timezone(&Utc))
        .map_err(|err| RowMapError {
            table,
            message: format!("invalid created_at `{value}`: {err}"),
        })
}

#[cfg(test)]
mod tests {
    use super::{comment_from_row, task_from_row};
    use crate::gateway::rows::{CommentRow, TaskRow};
    use chrono::{TimeZone, Utc};

    #[test]
    fn task_mapping_renames_owner_reference() {
        let task = task_from_row(TaskRow {
            id: 4,
            text: "water plants".to_string(),
            completed: true,
            user_id: 9,
            created_at: "2024-02-02T08:00:00+00:00".to_string(),
        });
        assert_eq!(task.owner_id, 9);
        assert!(task.completed);
    }

    #[test]
    fn comment_mapping_parses_rfc3339_timestamp() {
        let comment = comment_from_row(CommentRow {
            id: 1,
            task_id: 2,
            user_id: 3,
            user_name: "Tanaka".to_string(),
            content: "done".to_string(),
            created_at: "2024-02-02T08:30:00+00:00".to_string(),
        })
        .expect("timestamp should parse");
        assert_eq!(
            comment.created_at,
            Utc.with_ymd_and_hms(2024, 2, 2, 8, 30, 0).unwrap()
        );
    }

    #[test]
    fn comment_mapping_rejects_unparseable_timestamp() {
        let err = comment_from_row(CommentRow {
            id: 1,
            task_id: 2,
            user_id: 3,
            user_name: "Tanaka".to_string(),
            content: "done".to_string(),
            created_at: "yesterday".to_string(),
        })
        .expect_err("bad timestamp should be rejected");
        assert_eq!(err.table, "comments");
        assert!(err.message.contains("yesterday"));
    }
}
