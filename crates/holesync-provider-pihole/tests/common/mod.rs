//! Shared fixtures for Pi-hole provider contract tests
//!
//! Each test starts its own `MockServer` standing in for the Pi-hole API.

#![allow(dead_code)]

use holesync_core::PiholeConfig;
use holesync_provider_pihole::PiholeProvider;
use serde_json::{Value, json};
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{any, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Body of `GET /api/config/dns/hosts`
pub fn hosts_body(entries: &[&str]) -> Value {
    json!({ "config": { "dns": { "hosts": entries } }, "took": 5 })
}

/// Body of `GET /api/config/dns/cnameRecords`
pub fn cname_body(entries: &[&str]) -> Value {
    json!({ "config": { "dns": { "cnameRecords": entries } }, "took": 5 })
}

/// Successful login body
pub fn login_ok(sid: &str) -> Value {
    json!({
        "session": {
            "valid": true,
            "totp": false,
            "sid": sid,
            "csrf": "csrfvalue",
            "validity": 1800,
            "message": "password correct"
        },
        "took": 0.18
    })
}

/// Rejected login body
pub fn login_rejected() -> Value {
    json!({
        "session": {
            "valid": false,
            "totp": false,
            "sid": null,
            "validity": -1,
            "message": "password incorrect"
        },
        "took": 0.2
    })
}

/// Serve a listing at `/api/config/dns/<collection>`
pub async fn mount_listing(server: &MockServer, collection: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path(format!("/api/config/dns/{}", collection)))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

/// Fail verification if any request reaches the server
pub async fn expect_no_requests(server: &MockServer) {
    Mock::given(any())
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .named("no backend calls")
        .mount(server)
        .await;
}

/// Build an unauthenticated provider against the mock server
pub fn provider(server: &MockServer) -> PiholeProvider {
    provider_with(server, |config| config)
}

/// Build a provider against the mock server after adjusting its config
pub fn provider_with(
    server: &MockServer,
    adjust: impl FnOnce(PiholeConfig) -> PiholeConfig,
) -> PiholeProvider {
    PiholeProvider::new(adjust(PiholeConfig::new(server.uri()))).expect("provider construction succeeds")
}

pub fn ctx() -> CancellationToken {
    CancellationToken::new()
}
