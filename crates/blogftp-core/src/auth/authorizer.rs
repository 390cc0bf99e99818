//! The service provider interface (SPI) for authorization

use super::PermissionSet;
use crate::BoxError;
use async_trait::async_trait;
use std::fmt::Debug;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Defines the requirements for authorizer implementations driven by an FTP
/// server engine.
///
/// Only [`validate_authentication`](Authorizer::validate_authentication) may
/// touch the network; the engine is expected to await it from a per-connection
/// task so a slow backend cannot stall unrelated sessions. The remaining
/// methods are pure lookups over the engine-supplied raw login name.
#[async_trait]
pub trait Authorizer: Send + Sync + Debug {
    /// Check the given credentials against the backing credential store.
    async fn validate_authentication(&self, username: &str, password: &str) -> Result<(), AuthFailure>;

    /// The directory the user lands in and is confined to.
    ///
    /// Called while the login is being processed, so implementations are free
    /// to reject a name that no longer resolves to a user.
    fn home_dir(&self, username: &str) -> Result<PathBuf, AuthFailure>;

    /// Whether the username exists in the backing user table.
    fn has_user(&self, username: &str) -> bool;

    /// Whether the user may exercise the capability `perm`, optionally over
    /// the absolute pathname `path`.
    ///
    /// This never fails: anything the implementation cannot resolve is a
    /// denial.
    fn has_perm(&self, username: &str, perm: PermissionSet, path: Option<&Path>) -> bool;

    /// The capabilities granted to the user.
    fn perms(&self, username: &str) -> PermissionSet;

    /// Greeting sent to the client after a successful login.
    fn login_message(&self, username: &str) -> String;

    /// Farewell sent to the client when the session ends.
    fn quit_message(&self, username: &str) -> String;
}

/// OS-level identity switching hooks invoked around filesystem access.
///
/// The engine calls [`impersonate_user`](UserSwitch::impersonate_user) before
/// accessing the filesystem on a user's behalf and
/// [`terminate_impersonation`](UserSwitch::terminate_impersonation) once done.
/// The default bodies do nothing; an implementation that actually changes the
/// process identity overrides both.
pub trait UserSwitch: Send + Sync + Debug {
    /// Assume the OS-level identity of `username`.
    fn impersonate_user(&self, _username: &str, _password: &str) -> Result<(), AuthFailure> {
        Ok(())
    }

    /// Switch back to the original OS-level identity.
    fn terminate_impersonation(&self, _username: &str) -> Result<(), AuthFailure> {
        Ok(())
    }
}

/// A [`UserSwitch`] that never changes the process identity.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoOpUserSwitch;

impl UserSwitch for NoOpUserSwitch {}

/// The error type for failed authentication and authorization checks.
///
/// The hosting engine turns these into protocol replies; it also owns any
/// login-attempt counting, so a single failure is reported exactly once and
/// never retried here.
#[derive(Debug, Error)]
pub enum AuthFailure {
    /// Anonymous and empty logins are never accepted.
    #[error("anonymous access not allowed")]
    AnonymousRejected,

    /// The login name did not have the form `domain\username` with both parts
    /// non-empty.
    #[error("please use domain\\username as the FTP username to log in")]
    MalformedIdentity,

    /// The credential service could not be reached, or did not answer within
    /// the configured timeout.
    #[error("could not reach the authentication service")]
    TransportFailure(#[source] BoxError),

    /// The domain/username/password combination was wrong.
    #[error("login failed, please use the correct domain\\username and password combination")]
    InvalidCredentials,

    /// The credentials are valid but the account lacks the administrator role
    /// on the remote system.
    #[error("sorry, this account does not have administrator privileges")]
    InsufficientPrivilege,

    /// The credential service failed internally.
    #[error("500 internal server error")]
    ServerError,

    /// Any other rejection, carrying whatever diagnostic the service gave.
    #[error("authentication denied: {detail}")]
    Denied {
        /// HTTP status of the reply, when the rejection came from the HTTP
        /// layer rather than the application.
        status: Option<u16>,
        /// Raw diagnostic text from the service.
        detail: String,
    },
}

impl AuthFailure {
    /// Wraps a transport-level error such as a connect failure or an expired
    /// timeout.
    pub fn transport<E>(err: E) -> Self
    where
        E: Into<BoxError>,
    {
        AuthFailure::TransportFailure(err.into())
    }
}
