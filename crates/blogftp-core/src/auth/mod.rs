//! Contains the [`Authorizer`] trait that an FTP server engine drives, plus the
//! failure taxonomy and permission model that go with it.
//!
//! An engine holds one `Authorizer` per listener and calls it once per
//! relevant FTP command: [`Authorizer::validate_authentication`] when the
//! client submits a password, [`Authorizer::home_dir`] when the session root
//! is established, and [`Authorizer::has_perm`] on every filesystem-affecting
//! command after that. Implementations carry only read-only configuration and
//! can be shared across connections without locking.
//!
//! To plug in your own authorization scheme:
//!
//! 1. Declare dependencies on async-trait and blogftp-core
//!
//! ```toml
//! async-trait = "0.1.88"
//! blogftp-core = { path = "../path/to/blogftp-core" }
//! ```
//!
//! 2. Implement the [`Authorizer`] trait:
//!
//! ```no_run
//! use blogftp_core::auth::{AuthFailure, Authorizer, PermissionSet};
//! use async_trait::async_trait;
//! use std::path::{Path, PathBuf};
//!
//! #[derive(Debug)]
//! struct OpenDoorAuthorizer;
//!
//! #[async_trait]
//! impl Authorizer for OpenDoorAuthorizer {
//!     async fn validate_authentication(&self, _username: &str, _password: &str) -> Result<(), AuthFailure> {
//!         Ok(())
//!     }
//!
//!     fn home_dir(&self, _username: &str) -> Result<PathBuf, AuthFailure> {
//!         Ok(PathBuf::from("/srv/ftp"))
//!     }
//!
//!     fn has_user(&self, _username: &str) -> bool {
//!         true
//!     }
//!
//!     fn has_perm(&self, _username: &str, _perm: PermissionSet, _path: Option<&Path>) -> bool {
//!         true
//!     }
//!
//!     fn perms(&self, _username: &str) -> PermissionSet {
//!         PermissionSet::full()
//!     }
//!
//!     fn login_message(&self, username: &str) -> String {
//!         format!("hello {}", username)
//!     }
//!
//!     fn quit_message(&self, username: &str) -> String {
//!         format!("bye {}", username)
//!     }
//! }
//! ```

mod authorizer;
pub use authorizer::{AuthFailure, Authorizer, NoOpUserSwitch, UserSwitch};

mod perms;
pub use perms::{PermissionSet, UnknownPermission};
