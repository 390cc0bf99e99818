//! The HTTP client side of credential validation.

use crate::identity::Identity;
use blogftp_core::auth::AuthFailure;
use http_body_util::BodyExt;
use hyper::{Method, Request, Uri};
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;
use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};
use std::time::Duration;
use tracing::debug;

/// Ephemeral credential triple for a single validation call.
///
/// Renders itself as the urlencoded form the admin API expects and is dropped
/// as soon as the call returns. Not `Debug`: the password must never end up
/// in a log event.
struct Credentials<'a> {
    domain: &'a str,
    user: &'a str,
    pass: &'a str,
}

impl Credentials<'_> {
    fn form_body(&self) -> String {
        fn enc(s: &str) -> String {
            utf8_percent_encode(s, NON_ALPHANUMERIC).collect()
        }
        format!("domain={}&user={}&pass={}", enc(self.domain), enc(self.user), enc(self.pass))
    }
}

/// Posts credentials to the blog platform's admin HTTP API and interprets its
/// two-layer reply: first the HTTP status, then an application status code
/// leading the response body.
#[derive(Clone, Debug)]
pub struct RemoteValidator {
    url: Uri,
    timeout: Duration,
    user_agent: String,
}

impl RemoteValidator {
    /// Creates a validator for the given endpoint, per-call timeout and
    /// `User-Agent` value.
    pub fn new(url: Uri, timeout: Duration, user_agent: String) -> Self {
        RemoteValidator { url, timeout, user_agent }
    }

    /// Checks `password` for `identity` against the remote service.
    ///
    /// One POST per call, no retries. A hung or unreachable endpoint is
    /// reported as [`AuthFailure::TransportFailure`] once the configured
    /// timeout expires.
    pub async fn validate(&self, identity: &Identity, password: &str) -> Result<(), AuthFailure> {
        let body = Credentials {
            domain: &identity.domain,
            user: &identity.username,
            pass: password,
        }
        .form_body();

        let req = Request::builder()
            .method(Method::POST)
            .uri(self.url.clone())
            .header(hyper::header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .header(hyper::header::USER_AGENT, self.user_agent.as_str())
            .body(body)
            .map_err(AuthFailure::transport)?;

        let https = hyper_rustls::HttpsConnectorBuilder::new()
            .with_native_roots()
            .map_err(AuthFailure::transport)?
            .https_or_http()
            .enable_http1()
            .build();

        let client = Client::builder(TokioExecutor::new()).build(https);

        let resp = match tokio::time::timeout(self.timeout, client.request(req)).await {
            Ok(resp) => resp.map_err(AuthFailure::transport)?,
            Err(elapsed) => return Err(AuthFailure::transport(elapsed)),
        };

        let (parts, body) = resp.into_parts();
        debug!(status = %parts.status, "admin api replied");
        if !parts.status.is_success() {
            return Err(AuthFailure::Denied {
                status: Some(parts.status.as_u16()),
                detail: parts.status.canonical_reason().unwrap_or("unknown status").to_string(),
            });
        }

        let body = BodyExt::collect(body).await.map_err(AuthFailure::transport)?.to_bytes();
        decode_status(&String::from_utf8_lossy(&body))
    }
}

/// Decodes the application-level status line of a 2xx reply. The first
/// whitespace-delimited token is the status code; the codes mirror HTTP
/// semantics but are distinct from the HTTP status of the exchange.
fn decode_status(body: &str) -> Result<(), AuthFailure> {
    if body.is_empty() {
        return Err(AuthFailure::ServerError);
    }
    match body.split_whitespace().next().and_then(|token| token.parse::<u16>().ok()) {
        Some(200) => Ok(()),
        Some(403) => Err(AuthFailure::InvalidCredentials),
        Some(401) => Err(AuthFailure::InsufficientPrivilege),
        _ => Err(AuthFailure::Denied {
            status: None,
            detail: body.to_string(),
        }),
    }
}
