//! SQLite gateway implementation.
//!
//! # Responsibility
//! - Implement the full gateway contract over the local `users`/`tasks`/
//!   `comments` schema.
//! - Keep SQL details inside this persistence boundary.
//!
//! # Invariants
//! - Connections must come from `db::open_db`/`open_db_in_memory`
//!   (migrated, `foreign_keys=ON`), so the comment cascade is enforced by
//!   the schema, not by this code.
//! - `created_at` is assigned here at insert time, RFC 3339 UTC text.

use crate::gateway::rows::{
    CommentRow, NewCommentRow, NewTaskRow, NewUserRow, TaskPatch, TaskRow, UserRow,
};
use crate::gateway::{BoardGateway, GatewayError, GatewayOp, GatewayResult};
use chrono::Utc;
use rusqlite::{params, Connection, Row};

/// SQLite-backed board store.
///
/// Calls complete inline on the caller's thread; the async signatures keep
/// the contract uniform with remote gateways.
pub struct SqliteGateway<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteGateway<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn created_at_now() -> String {
        Utc::now().to_rfc3339()
    }
}

fn db_failure(table: &'static str, op: GatewayOp, err: rusqlite::Error) -> GatewayError {
    GatewayError::new(table, op, err.to_string())
}

fn parse_user_row(row: &Row<'_>) -> rusqlite::Result<UserRow> {
    Ok(UserRow {
        id: row.get("id")?,
        name: row.get("name")?,
        email: row.get("email")?,
    })
}

fn parse_task_row(row: &Row<'_>) -> rusqlite::Result<TaskRow> {
    Ok(TaskRow {
        id: row.get("id")?,
        text: row.get("text")?,
        completed: row.get::<_, i64>("completed")? != 0,
        user_id: row.get("user_id")?,
        created_at: row.get("created_at")?,
    })
}

fn parse_comment_row(row: &Row<'_>) -> rusqlite::Result<CommentRow> {
    Ok(CommentRow {
        id: row.get("id")?,
        task_id: row.get("task_id")?,
        user_id: row.get("user_id")?,
        user_name: row.get("user_name")?,
        content: row.get("content")?,
        created_at: row.get("created_at")?,
    })
}

impl BoardGateway for SqliteGateway<'_> {
    async fn select_users(&self) -> GatewayResult<Vec<UserRow>> {
        let run = || -> rusqlite::Result<Vec<UserRow>> {
            let mut stmt = self
                .conn
                .prepare("SELECT id, name, email FROM users ORDER BY id;")?;
            let rows = stmt.query_map([], |row| parse_user_row(row))?;
            rows.collect()
        };
        run().map_err(|err| db_failure("users", GatewayOp::Select, err))
    }

    async fn select_tasks(&self) -> GatewayResult<Vec<TaskRow>> {
        let run = || -> rusqlite::Result<Vec<TaskRow>> {
            let mut stmt = self.conn.prepare(
                "SELECT id, text, completed, user_id, created_at
                 FROM tasks
                 ORDER BY created_at, id;",
            )?;
            let rows = stmt.query_map([], |row| parse_task_row(row))?;
            rows.collect()
        };
        run().map_err(|err| db_failure("tasks", GatewayOp::Select, err))
    }

    async fn select_comments(&self) -> GatewayResult<Vec<CommentRow>> {
        let run = || -> rusqlite::Result<Vec<CommentRow>> {
            let mut stmt = self.conn.prepare(
                "SELECT id, task_id, user_id, user_name, content, created_at
                 FROM comments
                 ORDER BY created_at, id;",
            )?;
            let rows = stmt.query_map([], |row| parse_comment_row(row))?;
            rows.collect()
        };
        run().map_err(|err| db_failure("comments", GatewayOp::Select, err))
    }

    async fn insert_user(&self, row: NewUserRow) -> GatewayResult<UserRow> {
        let run = || -> rusqlite::Result<UserRow> {
            self.conn.execute(
                "INSERT INTO users (name, email) VALUES (?1, ?2);",
                params![row.name.as_str(), row.email.as_str()],
            )?;
            Ok(UserRow {
                id: self.conn.last_insert_rowid(),
                name: row.name.clone(),
                email: row.email.clone(),
            })
        };
        run().map_err(|err| db_failure("users", GatewayOp::Insert, err))
    }

    async fn insert_task(&self, row: NewTaskRow) -> GatewayResult<TaskRow> {
        let created_at = Self::created_at_now();
        let run = || -> rusqlite::Result<TaskRow> {
            self.conn.execute(
                "INSERT INTO tasks (text, completed, user_id, created_at)
                 VALUES (?1, ?2, ?3, ?4);",
                params![
                    row.text.as_str(),
                    i64::from(row.completed),
                    row.user_id,
                    created_at.as_str(),
                ],
            )?;
            Ok(TaskRow {
                id: self.conn.last_insert_rowid(),
                text: row.text.clone(),
                completed: row.completed,
                user_id: row.user_id,
                created_at: created_at.clone(),
            })
        };
        run().map_err(|err| db_failure("tasks", GatewayOp::Insert, err))
    }

    async fn insert_comment(&self, row: NewCommentRow) -> GatewayResult<CommentRow> {
        let created_at = Self::created_at_now();
        let run = || -> rusqlite::Result<CommentRow> {
            self.conn.execute(
                "INSERT INTO comments (task_id, user_id, user_name, content, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5);",
                params![
                    row.task_id,
                    row.user_id,
                    row.user_name.as_str(),
                    row.content.as_str(),
                    created_at.as_str(),
                ],
            )?;
            Ok(CommentRow {
                id: self.conn.last_insert_rowid(),
                task_id: row.task_id,
                user_id: row.user_id,
                user_name: row.user_name.clone(),
                content: row.content.clone(),
                created_at: created_at.clone(),
            })
        };
        run().map_err(|err| db_failure("comments", GatewayOp::Insert, err))
    }

    async fn update_task(&self, id: i64, patch: TaskPatch) -> GatewayResult<()> {
        let changed = self
            .conn
            .execute(
                "UPDATE tasks SET completed = ?1 WHERE id = ?2;",
                params![i64::from(patch.completed), id],
            )
            .map_err(|err| db_failure("tasks", GatewayOp::Update, err))?;

        if changed == 0 {
            return Err(GatewayError::new(
                "tasks",
                GatewayOp::Update,
                format!("no row with id {id}"),
            ));
        }

        Ok(())
    }

    async fn delete_task(&self, id: i64) -> GatewayResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM tasks WHERE id = ?1;", params![id])
            .map_err(|err| db_failure("tasks", GatewayOp::Delete, err))?;

        if changed == 0 {
            return Err(GatewayError::new(
                "tasks",
                GatewayOp::Delete,
                format!("no row with id {id}"),
            ));
        }

        Ok(())
    }
}
