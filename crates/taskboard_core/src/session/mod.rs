//! Active-user session management.
//!
//! # Responsibility
//! - Restore a possibly-stale identity from durable local state.
//! - Validate restored identity against the authoritative user set.
//! - Handle login, logout and durable persistence of the active user.
//!
//! # Invariants
//! - An authenticated session always points at a user present in the set
//!   it was validated or logged in against; failed validation clears the
//!   durable copy instead of leaving it dangling.
//! - Every transition into/out of the authenticated state synchronously
//!   persists or clears the durable identity copy.
//! - A malformed or unreadable durable copy is treated as absent, never as
//!   a fatal error.

use crate::model::board::{User, UserId};
use log::{info, warn};

pub mod identity;

use identity::IdentityStore;

/// Lifecycle of the active-user binding.
///
/// `Unresolved → Restoring → Authenticated | Anonymous`; later logins and
/// logouts move between the two terminal states.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// Nothing read yet.
    Unresolved,
    /// Durable state read; identity (if any) awaits validation.
    Restoring { restored: Option<User> },
    /// Bound to an authoritative user record.
    Authenticated { user: User },
    /// No active user.
    Anonymous,
}

/// Session state machine over a durable identity store.
pub struct SessionManager<S: IdentityStore> {
    store: S,
    state: SessionState,
}

impl<S: IdentityStore> SessionManager<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            state: SessionState::Unresolved,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Returns the active user while authenticated.
    pub fn current_user(&self) -> Option<&User> {
        match &self.state {
            SessionState::Authenticated { user } => Some(user),
            _ => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.current_user().is_some()
    }

    /// Reads the durable identity copy and enters the restoring state.
    ///
    /// # Contract
    /// - An absent, unreadable or malformed copy restores as `None`.
    /// - No validation happens here; the copy may be stale.
    pub fn restore(&mut self) {
        let restored = match self.store.get() {
            Ok(Some(serialized)) => match serde_json::from_str::<User>(&serialized) {
                Ok(user) => {
                    info!(
                        "event=session_restore module=session status=ok user_id={}",
                        user.id
                    );
                    Some(user)
                }
                Err(err) => {
                    warn!(
                        "event=session_restore module=session status=malformed error={err}"
                    );
                    None
                }
            },
            Ok(None) => {
                info!("event=session_restore module=session status=absent");
                None
            }
            Err(err) => {
                warn!("event=session_restore module=session status=unreadable error={err}");
                None
            }
        };

        self.state = SessionState::Restoring { restored };
    }

    /// Validates the restored identity against the loaded user set.
    ///
    /// # Contract
    /// - Binds the authoritative record from `users`, never the restored
    ///   local copy, so remote field changes win.
    /// - A restored identity missing from `users` clears the durable copy
    ///   and ends anonymous; this is silent recovery, not an error.
    /// - An already-authenticated session is re-checked against `users`.
    pub fn validate(&mut self, users: &[User]) {
        let restored = match &self.state {
            SessionState::Restoring { restored } => restored.clone(),
            SessionState::Authenticated { user } => Some(user.clone()),
            SessionState::Unresolved | SessionState::Anonymous => None,
        };

        match restored {
            Some(stale) => match users.iter().find(|user| user.id == stale.id) {
                Some(authoritative) => {
                    info!(
                        "event=session_validate module=session status=ok user_id={}",
                        authoritative.id
                    );
                    self.bind(authoritative.clone());
                }
                None => {
                    info!(
                        "event=session_validate module=session status=stale user_id={}",
                        stale.id
                    );
                    self.clear_durable();
                    self.state = SessionState::Anonymous;
                }
            },
            None => {
                self.state = SessionState::Anonymous;
            }
        }
    }

    /// Binds the session to a user from the known set and persists it.
    ///
    /// Returns `false` (no transition) when the id is unknown.
    pub fn login(&mut self, user_id: UserId, users: &[User]) -> bool {
        match users.iter().find(|user| user.id == user_id) {
            Some(user) => {
                info!(
                    "event=session_login module=session status=ok user_id={}",
                    user.id
                );
                self.bind(user.clone());
                true
            }
            None => {
                warn!(
                    "event=session_login module=session status=unknown_user user_id={user_id}"
                );
                false
            }
        }
    }

    /// Ends the session and clears the durable identity copy.
    pub fn logout(&mut self) {
        info!("event=session_logout module=session status=ok");
        self.clear_durable();
        self.state = SessionState::Anonymous;
    }

    fn bind(&mut self, user: User) {
        match serde_json::to_string(&user) {
            Ok(serialized) => {
                if let Err(err) = self.store.set(&serialized) {
                    warn!(
                        "event=session_persist module=session status=error user_id={} error={err}",
                        user.id
                    );
                }
            }
            Err(err) => {
                warn!(
                    "event=session_persist module=session status=error user_id={} error={err}",
                    user.id
                );
            }
        }
        self.state = SessionState::Authenticated { user };
    }

    fn clear_durable(&mut self) {
        if let Err(err) = self.store.clear() {
            warn!("event=session_clear module=session status=error error={err}");
        }
    }
}
