//! Parsing of the `domain\username` login convention.

use blogftp_core::auth::AuthFailure;
use derive_more::Display;
use std::str::FromStr;

const ANONYMOUS: &str = "anonymous";

/// A parsed login identity.
///
/// Clients log in as `domain\username`: the domain selects the blog (and with
/// it the home directory) and the username must belong to an administrator of
/// that blog. A fully qualified domain is reduced to its leftmost label, so
/// `corp.example.com\jane` and `corp\jane` name the same identity.
#[derive(Clone, Debug, Display, PartialEq, Eq)]
#[display("{domain}\\{username}")]
pub struct Identity {
    /// The leftmost label of the domain part of the login name.
    pub domain: String,
    /// The username part of the login name.
    pub username: String,
}

impl FromStr for Identity {
    type Err = AuthFailure;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        if raw.is_empty() || raw == ANONYMOUS {
            return Err(AuthFailure::AnonymousRejected);
        }
        let (domain, username) = raw.split_once('\\').ok_or(AuthFailure::MalformedIdentity)?;
        if domain.is_empty() || username.is_empty() || username.contains('\\') {
            return Err(AuthFailure::MalformedIdentity);
        }
        let domain = domain.split('.').next().unwrap_or(domain);
        if domain.is_empty() {
            return Err(AuthFailure::MalformedIdentity);
        }
        Ok(Identity {
            domain: domain.to_string(),
            username: username.to_string(),
        })
    }
}
