// # Pi-hole Record Provider
//
// This crate provides a Pi-hole v6 REST API record provider for holesync.
//
// ## Behaviour
//
// - Lists `A`, `AAAA` and `CNAME` records from Pi-hole's local DNS config
// - Creates and deletes one backend entry per target, sequentially
// - Renews an expired session once per request, then gives up
// - Dry-run mode validates mutations and logs them without sending
// - Never retries transport errors and never backs off (owned by the caller)
// - Never spawns background tasks
//
// ## Security Requirements
//
// - Password and session tokens NEVER appear in logs or Debug output
// - Without a password the provider runs unauthenticated (open-access backends)
//
// ## API Reference
//
// - Login / probe / logout: `POST` / `GET` / `DELETE /api/auth`
// - List records: `GET /api/config/dns/{hosts,cnameRecords}`
// - Create record: `PUT /api/config/dns/{hosts,cnameRecords}/<entry>`
// - Delete record: `DELETE /api/config/dns/{hosts,cnameRecords}/<entry>`

pub mod codec;
pub mod validate;

mod api;
mod executor;
mod session;

use async_trait::async_trait;
use codec::EntryKind;
use executor::ApiClient;
use holesync_core::config::ProviderConfig;
use holesync_core::traits::{MutationOutcome, RecordProvider, RecordProviderFactory, SkipReason};
use holesync_core::{Endpoint, Error, PiholeConfig, RecordType, Result};
use reqwest::Method;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Pi-hole record provider
///
/// # Dry-Run Mode
///
/// When `dry_run` is set, the provider will:
/// - Perform listings normally
/// - Run every create/delete validation
/// - Log the entries it would have written
/// - **NOT** send any mutation to the backend
///
/// # Concurrency
///
/// One provider holds one backend session. Concurrent calls are safe: session
/// renewal is serialised internally.
pub struct PiholeProvider {
    config: PiholeConfig,
    client: ApiClient,
}

// Custom Debug implementation that hides the password
impl std::fmt::Debug for PiholeProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PiholeProvider")
            .field("config", &self.config)
            .finish()
    }
}

impl PiholeProvider {
    /// Create a provider without contacting the backend
    ///
    /// The session starts unauthenticated; use [`PiholeProvider::connect`] to
    /// log in as part of construction.
    ///
    /// # Errors
    ///
    /// - `Error::NoServer` when `config.server` is empty
    /// - `Error::Config` for an unsupported API version or HTTP client failure
    pub fn new(config: PiholeConfig) -> Result<Self> {
        config.validate()?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .danger_accept_invalid_certs(config.tls_insecure_skip_verify)
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {}", e)))?;

        if config.tls_insecure_skip_verify {
            tracing::warn!("TLS certificate verification disabled for {}", config.server);
        }

        if config.domain_filter.is_configured() {
            tracing::info!(
                "Managing domains {:?} excluding {:?}",
                config.domain_filter.filters,
                config.domain_filter.exclusions
            );
        } else {
            tracing::debug!("No domain filter configured, managing every domain");
        }

        let client = ApiClient::new(
            http,
            config.server.clone(),
            config.password().map(str::to_string),
        );

        Ok(Self { config, client })
    }

    /// Create a provider and log in when a password is configured
    pub async fn connect(config: PiholeConfig, ctx: &CancellationToken) -> Result<Self> {
        let provider = Self::new(config)?;

        if provider.client.session().has_password() {
            provider.client.session().login(ctx).await?;
        } else {
            tracing::info!(
                "No password configured for {}, using unauthenticated access",
                provider.config.server
            );
        }

        Ok(provider)
    }

    /// Whether mutations are only logged
    pub fn is_dry_run(&self) -> bool {
        self.config.dry_run
    }

    /// Whether a backend session is currently held
    pub async fn is_authenticated(&self) -> bool {
        self.client.session().is_authenticated().await
    }

    /// Ask the backend whether the held session is still valid
    pub async fn check_token_validity(&self, ctx: &CancellationToken) -> Result<bool> {
        self.client.session().check_token_validity(ctx).await
    }

    /// Release the backend session
    ///
    /// Pi-hole limits concurrent sessions, so long-running callers should log
    /// out when they are done.
    pub async fn logout(&self, ctx: &CancellationToken) -> Result<()> {
        self.client.session().logout(ctx).await
    }

    async fn apply(
        &self,
        ctx: &CancellationToken,
        method: Method,
        endpoint: &Endpoint,
    ) -> Result<MutationOutcome> {
        let action = if method == Method::DELETE { "delete" } else { "create" };

        if endpoint.targets.is_empty() {
            tracing::debug!("Skipping {} of {}: no targets", action, endpoint.dns_name);
            return Ok(MutationOutcome::Skipped(SkipReason::NoTargets));
        }

        if !self.config.domain_filter.matches(&endpoint.dns_name) {
            tracing::debug!(
                "Skipping {} of {}: domain excluded by filter",
                action,
                endpoint.dns_name
            );
            return Ok(MutationOutcome::Skipped(SkipReason::FilteredDomain));
        }

        if endpoint.is_wildcard() {
            return Err(Error::invalid_input(format!(
                "Pi-hole DNS names cannot be wildcards: {}",
                endpoint.dns_name
            )));
        }

        let Some(kind) = EntryKind::for_record_type(&endpoint.record_type) else {
            tracing::debug!(
                "Skipping {} of {}: unsupported record type {}",
                action,
                endpoint.dns_name,
                endpoint.record_type
            );
            return Ok(MutationOutcome::Skipped(SkipReason::UnsupportedType));
        };

        let entries = codec::encode(endpoint)?;

        if self.config.dry_run {
            for entry in &entries {
                tracing::info!(
                    "[DRY-RUN] Would {} {} entry: {}",
                    action,
                    kind.path_segment(),
                    entry
                );
            }
            return Ok(MutationOutcome::Skipped(SkipReason::DryRun));
        }

        for entry in &entries {
            let url = self
                .client
                .url(&["config", "dns", kind.path_segment(), entry.as_str()])?;

            tracing::info!("Pi-hole {} {} entry: {}", action, kind.path_segment(), entry);
            self.client.execute(ctx, method.clone(), url).await?;
        }

        Ok(MutationOutcome::Applied {
            entries: entries.len(),
        })
    }
}

#[async_trait]
impl RecordProvider for PiholeProvider {
    /// List records of one kind
    ///
    /// Malformed backend entries are skipped. Records outside the domain
    /// filter are omitted.
    async fn list_records(
        &self,
        ctx: &CancellationToken,
        record_type: &RecordType,
    ) -> Result<Vec<Endpoint>> {
        let kind = EntryKind::for_record_type(record_type)
            .ok_or_else(|| Error::unsupported_record_type(record_type.as_str()))?;

        let url = self.client.url(&["config", "dns", kind.path_segment()])?;
        let body = self.client.execute(ctx, Method::GET, url).await?;

        let response: api::ConfigResponse =
            serde_json::from_slice(&body).map_err(|e| Error::unmarshal(e.to_string()))?;

        let records = match kind {
            EntryKind::Hosts => codec::decode_hosts(response.config.dns.hosts.as_slice()),
            EntryKind::CnameRecords => {
                codec::decode_cname_records(response.config.dns.cname_records.as_slice())
            }
        };

        let records: Vec<Endpoint> = records
            .into_iter()
            .filter(|record| &record.record_type == record_type)
            .filter(|record| {
                let managed = self.config.domain_filter.matches(&record.dns_name);
                if !managed {
                    tracing::debug!("Skipping {} that does not match domain filter", record.dns_name);
                }
                managed
            })
            .collect();

        tracing::debug!("Listed {} {} record(s)", records.len(), record_type);
        Ok(records)
    }

    async fn create_record(
        &self,
        ctx: &CancellationToken,
        endpoint: &Endpoint,
    ) -> Result<MutationOutcome> {
        self.apply(ctx, Method::PUT, endpoint).await
    }

    async fn delete_record(
        &self,
        ctx: &CancellationToken,
        endpoint: &Endpoint,
    ) -> Result<MutationOutcome> {
        self.apply(ctx, Method::DELETE, endpoint).await
    }

    async fn close(&self, ctx: &CancellationToken) -> Result<()> {
        self.logout(ctx).await
    }

    fn provider_name(&self) -> &'static str {
        "pihole"
    }
}

/// Factory for creating Pi-hole providers
pub struct PiholeFactory;

#[async_trait]
impl RecordProviderFactory for PiholeFactory {
    async fn create(
        &self,
        config: &ProviderConfig,
        ctx: &CancellationToken,
    ) -> Result<Box<dyn RecordProvider>> {
        match config {
            ProviderConfig::Pihole(config) => {
                if config.dry_run {
                    tracing::warn!("Pi-hole provider running in DRY-RUN mode - no changes will be made");
                }

                Ok(Box::new(PiholeProvider::connect(config.clone(), ctx).await?))
            }
            _ => Err(Error::config("Invalid config for Pi-hole provider")),
        }
    }
}

/// Register the Pi-hole provider with a registry
///
/// # Example
///
/// ```rust
/// use holesync_core::ProviderRegistry;
///
/// let registry = ProviderRegistry::new();
/// holesync_provider_pihole::register(&registry);
/// assert!(registry.has_provider("pihole"));
/// ```
pub fn register(registry: &holesync_core::ProviderRegistry) {
    registry.register_provider("pihole", Box::new(PiholeFactory));
}
