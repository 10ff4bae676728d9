//! The admin session and how failed admin calls are reported.
//!
//! Every admin call goes through [`AdminSession::guard`]. An authorization
//! failure ends the session, whatever the operation was; any other failure is
//! reported as a notice for that operation and leaves the session alone.

use std::fmt;

use folio_gateway::{Authenticator, GatewayError};
use thiserror::Error;
use tracing::{info, warn};

use crate::error::SaveError;

/// Where the session stands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SessionState {
    /// Never logged in, or logged out.
    #[default]
    Anonymous,
    /// Logged in with a token the gateway accepts.
    Active,
    /// The gateway rejected the token; a new login is needed.
    Expired,
}

/// The kind of admin call being guarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Reading admin data.
    Load,
    /// Creating or updating a document.
    Save,
    /// Deleting a document.
    Delete,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Operation::Load => "load",
            Operation::Save => "save",
            Operation::Delete => "delete",
        })
    }
}

/// A message shown to the admin after a failed call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Notice {
    /// The session ended; the admin must log in again.
    #[error("Session expired. Please log in again.")]
    SessionExpired,
    /// Reading failed.
    #[error("Failed to load: {0}")]
    LoadFailed(String),
    /// Saving failed; the edits are still in memory.
    #[error("Failed to save: {0}")]
    SaveFailed(String),
    /// Deleting failed.
    #[error("Failed to delete: {0}")]
    DeleteFailed(String),
}

/// A failure that may mean the session is no longer valid.
pub trait Failure: fmt::Display {
    /// Returns true when the failure is an authorization rejection.
    fn is_auth_failure(&self) -> bool;
}

impl Failure for GatewayError {
    fn is_auth_failure(&self) -> bool {
        GatewayError::is_auth_failure(self)
    }
}

impl Failure for SaveError {
    fn is_auth_failure(&self) -> bool {
        SaveError::is_auth_failure(self)
    }
}

/// An admin's login session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdminSession {
    token: Option<String>,
    state: SessionState,
}

impl AdminSession {
    /// An anonymous session.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// The bearer token while the session is active.
    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Logs in through `auth`.
    ///
    /// # Errors
    ///
    /// Returns the gateway's error for rejected credentials or a failed call;
    /// the session state is unchanged.
    pub fn login<A: Authenticator + ?Sized>(
        &mut self,
        auth: &A,
        username: &str,
        password: &str,
    ) -> Result<(), GatewayError> {
        let token = auth.login(username, password)?;
        info!(username, "admin logged in");
        self.token = Some(token);
        self.state = SessionState::Active;
        Ok(())
    }

    /// Logs out and forgets the token.
    pub fn logout<A: Authenticator + ?Sized>(&mut self, auth: &A) {
        auth.logout();
        self.token = None;
        self.state = SessionState::Anonymous;
    }

    /// Passes a successful result through and turns a failure into the
    /// notice for `operation`. An authorization failure logs out and expires
    /// the session instead.
    ///
    /// # Errors
    ///
    /// Returns [`Notice::SessionExpired`] for an authorization failure and the
    /// operation's notice for anything else.
    pub fn guard<A, T, E>(
        &mut self,
        auth: &A,
        operation: Operation,
        result: Result<T, E>,
    ) -> Result<T, Notice>
    where
        A: Authenticator + ?Sized,
        E: Failure,
    {
        let err = match result {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };
        if err.is_auth_failure() {
            warn!(%operation, "admin session expired");
            auth.logout();
            self.token = None;
            self.state = SessionState::Expired;
            return Err(Notice::SessionExpired);
        }
        warn!(%operation, error = %err, "admin call failed");
        let message = err.to_string();
        Err(match operation {
            Operation::Load => Notice::LoadFailed(message),
            Operation::Save => Notice::SaveFailed(message),
            Operation::Delete => Notice::DeleteFailed(message),
        })
    }
}
