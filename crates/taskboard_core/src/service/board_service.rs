//! Board mutation service.
//!
//! # Responsibility
//! - Own the snapshot, the session and the per-task comment drafts as one
//!   explicit context value.
//! - Run every mutation write-through: build the payload, issue the remote
//!   write, and mirror the change locally only after confirmation.
//! - Keep one current human-readable error for the presentation layer.
//!
//! # Invariants
//! - A failed remote write leaves the snapshot untouched.
//! - Local precondition rejections are returned to the caller without a
//!   remote call and without touching the surfaced error.
//! - Each attempted remote operation replaces the previously surfaced
//!   error; errors never accumulate.

use crate::gateway::rows::{NewCommentRow, NewTaskRow, NewUserRow, TaskPatch};
use crate::gateway::{BoardGateway, GatewayError};
use crate::model::board::{trimmed_non_empty, CommentId, TaskId, User, UserId};
use crate::model::snapshot::{CommentDrafts, Snapshot};
use crate::service::loader::{
    comment_from_row, load_board, task_from_row, user_from_row, LoadResult, RowMapError,
};
use crate::session::identity::IdentityStore;
use crate::session::SessionManager;
use log::{error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type MutationResult<T> = Result<T, MutationError>;

/// Local precondition that stops an action before any remote call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    EmptyTaskText,
    EmptyUserName,
    EmptyUserEmail,
    EmptyCommentContent,
    NoActiveSession,
}

impl Display for Rejection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let message = match self {
            Self::EmptyTaskText => "task text is empty",
            Self::EmptyUserName => "user name is empty",
            Self::EmptyUserEmail => "user email is empty",
            Self::EmptyCommentContent => "comment content is empty",
            Self::NoActiveSession => "no active session",
        };
        write!(f, "{message}")
    }
}

/// Failure of one board mutation.
#[derive(Debug)]
pub enum MutationError {
    /// Stopped locally; the store was never contacted.
    Rejected(Rejection),
    /// The target task is not in the local snapshot.
    TaskNotFound(TaskId),
    /// The store rejected the operation.
    Gateway(GatewayError),
    /// The store confirmed the write but returned an unusable row; the
    /// local mirror is left unchanged and a reload will reconcile.
    InvalidRow(RowMapError),
}

impl Display for MutationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Rejected(rejection) => write!(f, "{rejection}"),
            Self::TaskNotFound(task_id) => write!(f, "task not found: {task_id}"),
            Self::Gateway(err) => write!(f, "{err}"),
            Self::InvalidRow(err) => write!(f, "{err}"),
        }
    }
}

impl Error for MutationError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Gateway(err) => Some(err),
            Self::InvalidRow(err) => Some(err),
            Self::Rejected(_) | Self::TaskNotFound(_) => None,
        }
    }
}

/// Synchronization context for one board client.
///
/// Owns the gateway, the session manager and the local mirror; every user
/// action flows through here. One remote call is issued per action, and
/// overlapping actions against different entities are not serialized.
pub struct BoardService<G: BoardGateway, S: IdentityStore> {
    gateway: G,
    session: SessionManager<S>,
    snapshot: Snapshot,
    drafts: CommentDrafts,
    last_error: Option<String>,
}

impl<G: BoardGateway, S: IdentityStore> BoardService<G, S> {
    pub fn new(gateway: G, identity_store: S) -> Self {
        Self {
            gateway,
            session: SessionManager::new(identity_store),
            snapshot: Snapshot::default(),
            drafts: CommentDrafts::new(),
            last_error: None,
        }
    }

    /// Restores the durable identity, loads remote state and validates the
    /// session against the loaded user set.
    ///
    /// # Errors
    /// - A load failure keeps the snapshot empty, surfaces the message and
    ///   leaves the restored identity unvalidated until the next attempt.
    pub async fn init(&mut self) -> LoadResult<()> {
        self.session.restore();
        self.last_error = None;

        match load_board(&self.gateway).await {
            Ok(snapshot) => {
                self.snapshot = snapshot;
                self.session.validate(&self.snapshot.users);
                Ok(())
            }
            Err(err) => {
                self.snapshot = Snapshot::default();
                self.last_error = Some(err.to_string());
                Err(err)
            }
        }
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn session(&self) -> &SessionManager<S> {
        &self.session
    }

    pub fn current_user(&self) -> Option<&User> {
        self.session.current_user()
    }

    /// The currently surfaced error message, if any.
    pub fn current_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Binds the session to a known user; no-op when the id is unknown.
    pub fn login(&mut self, user_id: UserId) -> bool {
        self.session.login(user_id, &self.snapshot.users)
    }

    /// Ends the session; the snapshot stays loaded.
    pub fn logout(&mut self) {
        self.session.logout();
    }

    /// Stores pending comment input for one task.
    pub fn set_draft(&mut self, task_id: TaskId, text: impl Into<String>) {
        self.drafts.set(task_id, text);
    }

    /// Returns pending comment input for one task.
    pub fn draft(&self, task_id: TaskId) -> &str {
        self.drafts.get(task_id)
    }

    /// Creates a task owned by the active user.
    pub async fn create_task(&mut self, text: &str) -> MutationResult<TaskId> {
        let Some(text) = trimmed_non_empty(text) else {
            return Err(MutationError::Rejected(Rejection::EmptyTaskText));
        };
        let owner_id = match self.session.current_user() {
            Some(user) => user.id,
            None => return Err(MutationError::Rejected(Rejection::NoActiveSession)),
        };
        let payload = NewTaskRow {
            text: text.to_string(),
            completed: false,
            user_id: owner_id,
        };
        self.last_error = None;

        let inserted = self.gateway.insert_task(payload).await;
        match inserted {
            Ok(row) => {
                let task = task_from_row(row);
                let task_id = task.id;
                self.snapshot.tasks.push(task);
                info!(
                    "event=task_create module=board status=ok task_id={task_id} owner_id={owner_id}"
                );
                Ok(task_id)
            }
            Err(err) => {
                error!("event=task_create module=board status=error error={err}");
                Err(self.surface(MutationError::Gateway(err)))
            }
        }
    }

    /// Flips a task's completion state; returns the new state.
    pub async fn toggle_task(&mut self, task_id: TaskId) -> MutationResult<bool> {
        let completed = match self.snapshot.task(task_id) {
            Some(task) => task.completed,
            None => {
                warn!("event=task_toggle module=board status=missing task_id={task_id}");
                return Err(self.surface(MutationError::TaskNotFound(task_id)));
            }
        };
        self.set_completion(task_id, !completed, "task_toggle").await?;
        Ok(!completed)
    }

    /// Sets a task's completion state explicitly (drag target semantics).
    ///
    /// Moving a task onto the bucket it already occupies is a legal
    /// idempotent write.
    pub async fn move_task(&mut self, task_id: TaskId, completed: bool) -> MutationResult<()> {
        if self.snapshot.task(task_id).is_none() {
            warn!("event=task_move module=board status=missing task_id={task_id}");
            return Err(self.surface(MutationError::TaskNotFound(task_id)));
        }
        self.set_completion(task_id, completed, "task_move").await
    }

    /// Deletes a task; dependent comments disappear remotely via the store
    /// cascade and are pruned locally to match.
    pub async fn delete_task(&mut self, task_id: TaskId) -> MutationResult<()> {
        self.last_error = None;

        let deleted = self.gateway.delete_task(task_id).await;
        match deleted {
            Ok(()) => {
                self.snapshot.remove_task(task_id);
                self.drafts.clear(task_id);
                info!("event=task_delete module=board status=ok task_id={task_id}");
                Ok(())
            }
            Err(err) => {
                error!("event=task_delete module=board status=error task_id={task_id} error={err}");
                Err(self.surface(MutationError::Gateway(err)))
            }
        }
    }

    /// Registers a new user and makes them the active session.
    pub async fn register_user(&mut self, name: &str, email: &str) -> MutationResult<UserId> {
        let Some(name) = trimmed_non_empty(name) else {
            return Err(MutationError::Rejected(Rejection::EmptyUserName));
        };
        let Some(email) = trimmed_non_empty(email) else {
            return Err(MutationError::Rejected(Rejection::EmptyUserEmail));
        };
        let payload = NewUserRow {
            name: name.to_string(),
            email: email.to_string(),
        };
        self.last_error = None;

        let inserted = self.gateway.insert_user(payload).await;
        match inserted {
            Ok(row) => {
                let user = user_from_row(row);
                let user_id = user.id;
                self.snapshot.users.push(user);
                self.session.login(user_id, &self.snapshot.users);
                info!("event=user_register module=board status=ok user_id={user_id}");
                Ok(user_id)
            }
            Err(err) => {
                error!("event=user_register module=board status=error error={err}");
                Err(self.surface(MutationError::Gateway(err)))
            }
        }
    }

    /// Creates a comment on a task as the active user and clears that
    /// task's draft.
    ///
    /// The payload carries a snapshot of the author's current name; the
    /// store keeps it as written.
    pub async fn create_comment(
        &mut self,
        task_id: TaskId,
        content: &str,
    ) -> MutationResult<CommentId> {
        let Some(content) = trimmed_non_empty(content) else {
            return Err(MutationError::Rejected(Rejection::EmptyCommentContent));
        };
        let (user_id, user_name) = match self.session.current_user() {
            Some(user) => (user.id, user.name.clone()),
            None => return Err(MutationError::Rejected(Rejection::NoActiveSession)),
        };
        let payload = NewCommentRow {
            task_id,
            user_id,
            user_name,
            content: content.to_string(),
        };
        self.last_error = None;

        let inserted = self.gateway.insert_comment(payload).await;
        match inserted {
            Ok(row) => match comment_from_row(row) {
                Ok(comment) => {
                    let comment_id = comment.id;
                    self.snapshot.comments.push(comment);
                    self.drafts.clear(task_id);
                    info!(
                        "event=comment_create module=board status=ok comment_id={comment_id} task_id={task_id}"
                    );
                    Ok(comment_id)
                }
                Err(err) => {
                    error!(
                        "event=comment_create module=board status=error task_id={task_id} error={err}"
                    );
                    Err(self.surface(MutationError::InvalidRow(err)))
                }
            },
            Err(err) => {
                error!(
                    "event=comment_create module=board status=error task_id={task_id} error={err}"
                );
                Err(self.surface(MutationError::Gateway(err)))
            }
        }
    }

    async fn set_completion(
        &mut self,
        task_id: TaskId,
        completed: bool,
        event: &str,
    ) -> MutationResult<()> {
        self.last_error = None;

        let updated = self
            .gateway
            .update_task(task_id, TaskPatch { completed })
            .await;
        match updated {
            Ok(()) => {
                if let Some(task) = self.snapshot.task_mut(task_id) {
                    task.completed = completed;
                }
                info!(
                    "event={event} module=board status=ok task_id={task_id} completed={completed}"
                );
                Ok(())
            }
            Err(err) => {
                error!("event={event} module=board status=error task_id={task_id} error={err}");
                Err(self.surface(MutationError::Gateway(err)))
            }
        }
    }

    fn surface(&mut self, err: MutationError) -> MutationError {
        self.last_error = Some(err.to_string());
        err
    }
}
