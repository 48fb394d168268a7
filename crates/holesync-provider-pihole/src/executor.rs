// # Request Executor
//
// Sole path for data calls against the Pi-hole API once a session exists.
//
// ## Response handling
//
// - 2xx: raw body returned
// - 401: exactly one session renewal, then one replay of the same request;
//   any failure after that is a terminal `TokenRenewal` error
// - anything else: the `{"error":{...}}` body is decoded and surfaced as
//   `UnexpectedStatus`, or as `Unmarshal` if it cannot be decoded
//
// Transport failures are returned immediately. There is no backoff and no
// retry loop here: retry policy belongs to the calling controller.

use crate::api::{ErrorResponse, api_url};
use crate::session::SessionManager;
use holesync_core::{Error, Result};
use reqwest::{Method, RequestBuilder, StatusCode};
use tokio_util::sync::CancellationToken;
use url::Url;

/// HTTP client bound to one Pi-hole server and session
pub(crate) struct ApiClient {
    http: reqwest::Client,
    server: String,
    session: SessionManager,
}

impl ApiClient {
    pub(crate) fn new(http: reqwest::Client, server: String, password: Option<String>) -> Self {
        let session = SessionManager::new(http.clone(), server.clone(), password);
        Self {
            http,
            server,
            session,
        }
    }

    pub(crate) fn session(&self) -> &SessionManager {
        &self.session
    }

    /// `<server>/api/<segments...>`
    pub(crate) fn url(&self, segments: &[&str]) -> Result<Url> {
        api_url(&self.server, segments)
    }

    /// Execute a request with the current session credentials
    pub(crate) async fn execute(
        &self,
        ctx: &CancellationToken,
        method: Method,
        url: Url,
    ) -> Result<Vec<u8>> {
        let (status, body) = self.send_authorized(ctx, &method, &url).await?;

        if status.is_success() {
            return Ok(body);
        }

        if status == StatusCode::UNAUTHORIZED {
            tracing::warn!(
                "Received 401 for {} {}: renewing session and retrying once",
                method,
                url.path()
            );

            match self.session.renew(ctx).await {
                Ok(()) => {}
                Err(Error::Cancelled) => return Err(Error::Cancelled),
                Err(e) => return Err(Error::token_renewal(e.to_string())),
            }

            let (status, body) = self.send_authorized(ctx, &method, &url).await?;
            if status.is_success() {
                return Ok(body);
            }

            return Err(Error::token_renewal(format!(
                "replayed request returned {}",
                status
            )));
        }

        Err(decode_error(status, &body))
    }

    async fn send_authorized(
        &self,
        ctx: &CancellationToken,
        method: &Method,
        url: &Url,
    ) -> Result<(StatusCode, Vec<u8>)> {
        let request = self
            .http
            .request(method.clone(), url.clone())
            .header("Content-Type", "application/json");
        let request = self.session.authorize(request).await;

        round_trip(ctx, request).await
    }
}

/// Send a request and read its body, aborting when `ctx` is cancelled
pub(crate) async fn round_trip(
    ctx: &CancellationToken,
    request: RequestBuilder,
) -> Result<(StatusCode, Vec<u8>)> {
    if ctx.is_cancelled() {
        return Err(Error::Cancelled);
    }

    let exchange = async {
        let response = request
            .send()
            .await
            .map_err(|e| Error::http(format!("HTTP request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| Error::http(format!("Failed to read response body: {}", e)))?;

        Ok::<_, Error>((status, body.to_vec()))
    };

    tokio::select! {
        _ = ctx.cancelled() => Err(Error::Cancelled),
        result = exchange => result,
    }
}

fn decode_error(status: StatusCode, body: &[u8]) -> Error {
    match serde_json::from_slice::<ErrorResponse>(body) {
        Ok(response) => Error::UnexpectedStatus {
            status: status.as_u16(),
            key: response.error.key,
            message: response.error.message,
            hint: response.error.hint.filter(|hint| !hint.is_empty()),
        },
        Err(e) => Error::unmarshal(format!("{} (status {})", e, status.as_u16())),
    }
}
