// # Session Manager
//
// Owns the Pi-hole session (`sid`) and its cross-site-protection token
// (`csrf`).
//
// ## Lifecycle
//
// - `Unauthenticated` until a login succeeds (or forever, for open-access
//   backends without a password)
// - `Authenticated { sid, csrf }` after login or renewal
// - back to `Unauthenticated` on logout
//
// Validity is checked lazily, only when the executor sees a 401. Renewals are
// serialised so two requests failing at once cannot log in twice.
//
// ## Security
//
// Neither the password nor the session tokens are ever logged.

use crate::api::{AuthResponse, LoginRequest, api_url};
use crate::executor::round_trip;
use holesync_core::{Error, Result};
use reqwest::{RequestBuilder, StatusCode};
use tokio::sync::{Mutex, RwLock};
use tokio_util::sync::CancellationToken;

/// Header carrying the session id
pub(crate) const SID_HEADER: &str = "X-FTL-SID";

/// Header carrying the cross-site-protection token
pub(crate) const CSRF_HEADER: &str = "X-FTL-CSRF";

/// Authentication state
#[derive(Clone, PartialEq, Eq)]
pub(crate) enum Session {
    Unauthenticated,
    Authenticated { sid: String, csrf: String },
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Session::Unauthenticated => f.write_str("Unauthenticated"),
            Session::Authenticated { .. } => f.write_str("Authenticated(<REDACTED>)"),
        }
    }
}

pub(crate) struct SessionManager {
    http: reqwest::Client,
    server: String,
    /// ⚠️ NEVER log this value
    password: Option<String>,
    state: RwLock<Session>,
    renewal: Mutex<()>,
}

impl SessionManager {
    pub(crate) fn new(http: reqwest::Client, server: String, password: Option<String>) -> Self {
        Self {
            http,
            server,
            password,
            state: RwLock::new(Session::Unauthenticated),
            renewal: Mutex::new(()),
        }
    }

    pub(crate) fn has_password(&self) -> bool {
        self.password.is_some()
    }

    pub(crate) async fn is_authenticated(&self) -> bool {
        matches!(*self.state.read().await, Session::Authenticated { .. })
    }

    /// Attach the session headers to a request, if authenticated
    pub(crate) async fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &*self.state.read().await {
            Session::Authenticated { sid, csrf } => {
                let request = request.header(SID_HEADER, sid.as_str());
                if csrf.is_empty() {
                    request
                } else {
                    request.header(CSRF_HEADER, csrf.as_str())
                }
            }
            Session::Unauthenticated => request,
        }
    }

    /// Log in with the configured password
    pub(crate) async fn login(&self, ctx: &CancellationToken) -> Result<()> {
        let password = self
            .password
            .as_deref()
            .ok_or_else(|| Error::auth("no password configured"))?;

        self.login_with(ctx, password).await
    }

    async fn login_with(&self, ctx: &CancellationToken, password: &str) -> Result<()> {
        let url = api_url(&self.server, &["auth"])?;
        tracing::debug!("Logging in to Pi-hole at {}", self.server);

        let request = self.http.post(url).json(&LoginRequest { password });
        let (status, body) = round_trip(ctx, request).await?;

        let response: AuthResponse = serde_json::from_slice(&body).map_err(|e| {
            Error::auth(format!(
                "failed to decode login response (status {}): {}",
                status.as_u16(),
                e
            ))
        })?;
        let session = response.session;

        if !status.is_success() || !session.valid {
            return Err(Error::auth(session.message.unwrap_or_else(|| {
                format!("login rejected with status {}", status.as_u16())
            })));
        }

        let sid = session
            .sid
            .filter(|sid| !sid.is_empty())
            .ok_or_else(|| Error::auth("login response carried no session id"))?;

        *self.state.write().await = Session::Authenticated {
            sid,
            csrf: session.csrf.unwrap_or_default(),
        };

        tracing::info!(
            "Authenticated with Pi-hole (session valid for {}s)",
            session.validity
        );
        Ok(())
    }

    /// Ask the backend whether the held session is still valid
    ///
    /// Returns `Ok(false)` without a request when unauthenticated or when the
    /// context is already cancelled: validity cannot be confirmed.
    pub(crate) async fn check_token_validity(&self, ctx: &CancellationToken) -> Result<bool> {
        if ctx.is_cancelled() {
            return Ok(false);
        }
        if !self.is_authenticated().await {
            return Ok(false);
        }

        let url = api_url(&self.server, &["auth"])?;
        let request = self.authorize(self.http.get(url)).await;

        let (_, body) = match round_trip(ctx, request).await {
            Ok(exchange) => exchange,
            Err(Error::Cancelled) => return Ok(false),
            Err(e) => return Err(e),
        };

        let response: AuthResponse =
            serde_json::from_slice(&body).map_err(|e| Error::unmarshal(e.to_string()))?;

        Ok(response.session.valid)
    }

    /// Make sure the session is usable again after a 401
    ///
    /// Another caller may already have renewed while this one waited for the
    /// lock, so validity is probed before logging in again.
    pub(crate) async fn renew(&self, ctx: &CancellationToken) -> Result<()> {
        let _guard = self.renewal.lock().await;

        match self.check_token_validity(ctx).await {
            Ok(true) => {
                tracing::debug!("Session still valid, skipping login");
                return Ok(());
            }
            Ok(false) => {}
            Err(e) => tracing::debug!("Could not confirm session validity: {}", e),
        }

        if ctx.is_cancelled() {
            return Err(Error::Cancelled);
        }

        let password = self
            .password
            .as_deref()
            .ok_or_else(|| Error::auth("session expired and no password is configured"))?;

        self.login_with(ctx, password).await
    }

    /// Release the backend session slot
    pub(crate) async fn logout(&self, ctx: &CancellationToken) -> Result<()> {
        if !self.is_authenticated().await {
            return Ok(());
        }

        let url = api_url(&self.server, &["auth"])?;
        let request = self.authorize(self.http.delete(url)).await;
        let (status, _) = round_trip(ctx, request).await?;

        *self.state.write().await = Session::Unauthenticated;

        if status.is_success() || status == StatusCode::UNAUTHORIZED {
            tracing::debug!("Logged out of Pi-hole");
        } else {
            tracing::warn!("Pi-hole logout returned status {}", status.as_u16());
        }
        Ok(())
    }

    #[cfg(test)]
    pub(crate) async fn set(&self, session: Session) {
        *self.state.write().await = session;
    }

    #[cfg(test)]
    pub(crate) async fn current(&self) -> Session {
        self.state.read().await.clone()
    }
}
