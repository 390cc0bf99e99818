//! This crate provides a [`blogftp_core::auth::Authorizer`] implementation
//! for blog-hosting FTP services: clients log in as `domain\username`, the
//! password is checked against the blog platform's admin HTTP API, and each
//! domain is confined to its own home directory under a common base.
//!
//! The remote API receives one urlencoded POST (`domain`, `user`, `pass`) per
//! login attempt and answers with a status line whose leading token mirrors
//! HTTP semantics: `200` accepts the login, `403` means the credentials are
//! wrong and `401` means the account is no blog administrator.
//!
//! ```
//! use blogftp_auth::Builder;
//! use std::time::Duration;
//!
//! let authorizer = Builder::new()
//!     .with_url("http://blog.example.org/wp_admin_api.php".to_string())
//!     .with_base_dir("/srv/blog/base")
//!     .with_timeout(Duration::from_secs(3))
//!     .build()
//!     .unwrap();
//! ```
//!
//! The authorizer keeps no state between calls; wrap it in an `Arc` and share
//! it across connections.

mod identity;
mod perms;
mod remote;

pub use identity::Identity;
pub use perms::{FullAccess, PermissionPolicy, PermissionResolver};
pub use remote::RemoteValidator;

use async_trait::async_trait;
use blogftp_core::auth::{AuthFailure, Authorizer, NoOpUserSwitch, PermissionSet, UserSwitch};
use hyper::Uri;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

const USER_PLACEHOLDER: &str = "{USER}";

const DEFAULT_BASE_DIR: &str = "/srv/blog/base";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(3);
const DEFAULT_LOGIN_MESSAGE: &str = "Welcome to the blog FTP service. You are logged in as {USER}";
const DEFAULT_QUIT_MESSAGE: &str = "Goodbye. You are logged out as {USER}";
const DEFAULT_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// An [`Authorizer`] backed by a blog platform's admin HTTP API.
///
/// Built through [`Builder`]. All configuration is read-only after
/// construction, so one instance may serve any number of concurrent
/// connections.
#[derive(Debug)]
pub struct BlogAuthorizer {
    validator: RemoteValidator,
    resolver: PermissionResolver,
    login_message: String,
    quit_message: String,
    user_switch: Arc<dyn UserSwitch>,
}

/// Used to build the [`BlogAuthorizer`].
///
/// Every setting has a default; only the endpoint URL genuinely needs to be
/// supplied. The login and quit message templates may contain the `{USER}`
/// placeholder, which is replaced with the raw login name.
#[derive(Clone, Debug)]
pub struct Builder {
    url: String,
    timeout: Duration,
    base_dir: PathBuf,
    login_message: String,
    quit_message: String,
    user_agent: String,
    policy: Arc<dyn PermissionPolicy>,
    user_switch: Arc<dyn UserSwitch>,
}

impl Default for Builder {
    fn default() -> Self {
        Builder {
            url: String::new(),
            timeout: DEFAULT_TIMEOUT,
            base_dir: PathBuf::from(DEFAULT_BASE_DIR),
            login_message: DEFAULT_LOGIN_MESSAGE.to_string(),
            quit_message: DEFAULT_QUIT_MESSAGE.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            policy: Arc::new(FullAccess),
            user_switch: Arc::new(NoOpUserSwitch),
        }
    }
}

impl Builder {
    /// Creates a new `Builder` with default settings.
    pub fn new() -> Builder {
        Builder { ..Default::default() }
    }

    /// Specify the URL of the admin authentication endpoint.
    pub fn with_url(mut self, s: String) -> Self {
        self.url = s;
        self
    }

    /// Specify the timeout for one validation exchange. A hung endpoint
    /// surfaces as [`AuthFailure::TransportFailure`] once this expires.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Specify the directory under which every domain gets its home
    /// directory.
    pub fn with_base_dir<P: Into<PathBuf>>(mut self, base_dir: P) -> Self {
        self.base_dir = base_dir.into();
        self
    }

    /// Specify the greeting template sent after a successful login.
    pub fn with_login_message(mut self, s: String) -> Self {
        self.login_message = s;
        self
    }

    /// Specify the farewell template sent when the session ends.
    pub fn with_quit_message(mut self, s: String) -> Self {
        self.quit_message = s;
        self
    }

    /// Specify the `User-Agent` header presented to the admin API.
    pub fn with_user_agent(mut self, s: String) -> Self {
        self.user_agent = s;
        self
    }

    /// Specify the policy deciding which capabilities an identity gets.
    pub fn with_permission_policy(mut self, policy: Arc<dyn PermissionPolicy>) -> Self {
        self.policy = policy;
        self
    }

    /// Specify the identity-switching strategy invoked around filesystem
    /// access.
    pub fn with_user_switch(mut self, user_switch: Arc<dyn UserSwitch>) -> Self {
        self.user_switch = user_switch;
        self
    }

    /// Creates the authorizer. Fails if the endpoint URL does not parse.
    pub fn build(self) -> Result<BlogAuthorizer, Box<dyn std::error::Error>> {
        let url: Uri = self.url.parse()?;
        Ok(BlogAuthorizer {
            validator: RemoteValidator::new(url, self.timeout, self.user_agent),
            resolver: PermissionResolver::new(self.base_dir, self.policy),
            login_message: self.login_message,
            quit_message: self.quit_message,
            user_switch: self.user_switch,
        })
    }
}

#[async_trait]
impl Authorizer for BlogAuthorizer {
    #[tracing_attributes::instrument(skip(password))]
    async fn validate_authentication(&self, username: &str, password: &str) -> Result<(), AuthFailure> {
        let identity: Identity = username.parse()?;
        self.validator.validate(&identity, password).await
    }

    fn home_dir(&self, username: &str) -> Result<PathBuf, AuthFailure> {
        let identity: Identity = username.parse()?;
        Ok(self.resolver.home_dir(&identity))
    }

    fn has_user(&self, _username: &str) -> bool {
        // existence is only established by a successful remote validation
        true
    }

    fn has_perm(&self, username: &str, perm: PermissionSet, path: Option<&Path>) -> bool {
        let Some(path) = path else {
            // identity-only probe, always allowed
            return true;
        };
        match username.parse::<Identity>() {
            Ok(identity) => self.resolver.permissions_for(&identity).contains(perm) && self.resolver.allows(&identity, path),
            // fail closed: an unparseable login name owns nothing
            Err(_) => false,
        }
    }

    fn perms(&self, username: &str) -> PermissionSet {
        match username.parse::<Identity>() {
            Ok(identity) => self.resolver.permissions_for(&identity),
            Err(_) => PermissionSet::empty(),
        }
    }

    fn login_message(&self, username: &str) -> String {
        self.login_message.replace(USER_PLACEHOLDER, username)
    }

    fn quit_message(&self, username: &str) -> String {
        self.quit_message.replace(USER_PLACEHOLDER, username)
    }
}

impl UserSwitch for BlogAuthorizer {
    fn impersonate_user(&self, username: &str, password: &str) -> Result<(), AuthFailure> {
        self.user_switch.impersonate_user(username, password)
    }

    fn terminate_impersonation(&self, username: &str) -> Result<(), AuthFailure> {
        self.user_switch.terminate_impersonation(username)
    }
}
