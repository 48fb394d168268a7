//! Pi-hole v6 REST API wire types
//!
//! Only the fields this client reads are modelled; everything else in the
//! responses (`took`, `totp`, ...) is ignored by serde.

use holesync_core::{Error, Result};
use serde::{Deserialize, Serialize};
use url::Url;

/// Build `<server>/api/<segments...>`
///
/// Each segment is percent-encoded on its own, so entries such as
/// `"192.168.1.1 host.example.com"` stay a single path segment.
pub(crate) fn api_url(server: &str, segments: &[&str]) -> Result<Url> {
    let mut url = Url::parse(server.trim())
        .map_err(|e| Error::config(format!("Invalid server address '{}': {}", server, e)))?;

    url.path_segments_mut()
        .map_err(|_| Error::config(format!("Server address cannot carry a path: {}", server)))?
        .pop_if_empty()
        .push("api")
        .extend(segments);

    Ok(url)
}

/// `POST /api/auth` request body
#[derive(Serialize)]
pub(crate) struct LoginRequest<'a> {
    pub password: &'a str,
}

/// `/api/auth` response body
///
/// Error bodies (`{"error": ...}`) have no `session` object and decode to an
/// invalid session.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct AuthResponse {
    #[serde(default)]
    pub session: SessionInfo,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct SessionInfo {
    #[serde(default)]
    pub valid: bool,
    #[serde(default)]
    pub sid: Option<String>,
    #[serde(default)]
    pub csrf: Option<String>,
    /// Remaining lifetime in seconds, -1 when invalid
    #[serde(default)]
    pub validity: i64,
    #[serde(default)]
    pub message: Option<String>,
}

/// Body returned with any non-2xx status
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorResponse {
    pub error: ApiError,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiError {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub hint: Option<String>,
}

/// `GET /api/config/dns/{hosts,cnameRecords}` response body
#[derive(Debug, Deserialize)]
pub(crate) struct ConfigResponse {
    pub config: ConfigSection,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ConfigSection {
    pub dns: DnsSection,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DnsSection {
    #[serde(default)]
    pub hosts: Vec<String>,
    #[serde(default, rename = "cnameRecords")]
    pub cname_records: Vec<String>,
}
