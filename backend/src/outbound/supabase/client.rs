//! Shared reqwest client for Supabase endpoints.
//!
//! Owns transport details only: base URL joining, `apikey` and bearer
//! headers, the per-request timeout, and HTTP status classification.

use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder, StatusCode, Url};
use zeroize::Zeroizing;

/// Failure classes shared by the auth and REST adapters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum TransportFailure {
    /// Unreachable, timed out, or a 5xx from the gateway.
    Connection(String),
    /// A 4xx: the backend refused the request.
    Rejected(String),
    /// A 5xx from the service itself.
    Server(String),
}

/// Connection settings and HTTP client for one Supabase project.
#[derive(Clone)]
pub struct SupabaseClient {
    client: Client,
    base: Url,
    key: Zeroizing<String>,
}

impl SupabaseClient {
    /// Build a client with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(
        base: Url,
        key: Zeroizing<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base, key })
    }

    /// Absolute URL for `path` under the project base URL.
    pub(super) fn endpoint(&self, path: &str) -> Url {
        let mut url = self.base.clone();
        let joined = format!("{}/{}", url.path().trim_end_matches('/'), path);
        url.set_path(&joined);
        url
    }

    /// Request with the project API key attached as `apikey` and bearer.
    pub(super) fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.client
            .request(method, url)
            .header("apikey", self.key.as_str())
            .bearer_auth(self.key.as_str())
            .header(reqwest::header::ACCEPT, "application/json")
    }
}

pub(super) fn map_transport_error(error: reqwest::Error) -> TransportFailure {
    TransportFailure::Connection(error.to_string())
}

/// Classify a non-success response. `message` is the best human-readable
/// text extracted from the body.
pub(super) fn map_status(status: StatusCode, message: &str) -> TransportFailure {
    let message = if message.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        format!("status {}: {}", status.as_u16(), message)
    };
    match status {
        StatusCode::REQUEST_TIMEOUT
        | StatusCode::BAD_GATEWAY
        | StatusCode::SERVICE_UNAVAILABLE
        | StatusCode::GATEWAY_TIMEOUT => TransportFailure::Connection(message),
        _ if status.is_client_error() => TransportFailure::Rejected(message),
        _ => TransportFailure::Server(message),
    }
}

/// Whitespace-compacted prefix of a response body for error messages.
pub(super) fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}
