//! Configuration types for the holesync system
//!
//! This module defines all configuration structures used throughout the
//! workspace. Configuration is immutable once a provider has been built.

use crate::endpoint::RecordType;
use crate::filter::DomainFilter;
use serde::{Deserialize, Serialize};

/// Main configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// DNS provider configuration
    pub provider: ProviderConfig,

    /// Record kinds to manage
    #[serde(default = "default_record_types")]
    pub record_types: Vec<RecordType>,
}

impl SyncConfig {
    /// Create a new configuration for a provider, managing all address and alias kinds
    pub fn new(provider: ProviderConfig) -> Self {
        Self {
            provider,
            record_types: default_record_types(),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.record_types.is_empty() {
            return Err(crate::Error::config("No record types configured"));
        }

        self.provider.validate()
    }
}

/// DNS provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProviderConfig {
    /// Pi-hole REST API provider
    Pihole(PiholeConfig),

    /// Custom provider
    Custom {
        /// Factory name to use
        factory: String,
        /// Custom configuration data
        config: serde_json::Value,
    },
}

impl ProviderConfig {
    /// Validate the provider configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        match self {
            ProviderConfig::Pihole(config) => config.validate(),
            ProviderConfig::Custom { factory, config } => {
                if factory.is_empty() {
                    return Err(crate::Error::config(
                        "Custom provider factory cannot be empty",
                    ));
                }
                if config.is_null() {
                    return Err(crate::Error::config(
                        "Custom provider config cannot be null",
                    ));
                }
                Ok(())
            }
        }
    }

    /// Get the provider type name
    pub fn type_name(&self) -> &str {
        match self {
            ProviderConfig::Pihole(_) => "pihole",
            ProviderConfig::Custom { factory, .. } => factory,
        }
    }
}

/// Pi-hole backend configuration
///
/// The Debug implementation intentionally does NOT expose the password.
#[derive(Clone, Serialize, Deserialize)]
pub struct PiholeConfig {
    /// Base address of the backend (e.g. "http://pi.hole")
    #[serde(default)]
    pub server: String,

    /// API version tag; only "6" is supported
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Web interface password; `None` for open-access backends
    #[serde(default)]
    pub password: Option<String>,

    /// Domains this client may list and mutate
    #[serde(default)]
    pub domain_filter: DomainFilter,

    /// Validate mutations but never send them
    #[serde(default)]
    pub dry_run: bool,

    /// Accept self-signed backend certificates
    #[serde(default)]
    pub tls_insecure_skip_verify: bool,

    /// Per-request timeout (in seconds)
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl PiholeConfig {
    /// Create a configuration for the given server with defaults
    pub fn new(server: impl Into<String>) -> Self {
        Self {
            server: server.into(),
            ..Self::default()
        }
    }

    /// Set the password
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// Set the domain filter
    pub fn with_domain_filter(mut self, filter: DomainFilter) -> Self {
        self.domain_filter = filter;
        self
    }

    /// Enable or disable dry-run mode
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// The password, if one is configured and non-empty
    pub fn password(&self) -> Option<&str> {
        self.password.as_deref().filter(|p| !p.is_empty())
    }

    /// Validate the Pi-hole configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.server.trim().is_empty() {
            return Err(crate::Error::NoServer);
        }
        if self.api_version != SUPPORTED_API_VERSION {
            return Err(crate::Error::config(format!(
                "Unsupported Pi-hole API version '{}' (supported: {})",
                self.api_version, SUPPORTED_API_VERSION
            )));
        }
        if self.request_timeout_secs == 0 {
            return Err(crate::Error::config("Request timeout must be > 0"));
        }
        Ok(())
    }
}

impl Default for PiholeConfig {
    fn default() -> Self {
        Self {
            server: String::new(),
            api_version: default_api_version(),
            password: None,
            domain_filter: DomainFilter::default(),
            dry_run: false,
            tls_insecure_skip_verify: false,
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl std::fmt::Debug for PiholeConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PiholeConfig")
            .field("server", &self.server)
            .field("api_version", &self.api_version)
            .field("password", &self.password.as_ref().map(|_| "<REDACTED>"))
            .field("domain_filter", &self.domain_filter)
            .field("dry_run", &self.dry_run)
            .field("tls_insecure_skip_verify", &self.tls_insecure_skip_verify)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

/// The only Pi-hole API version this client speaks
pub const SUPPORTED_API_VERSION: &str = "6";

fn default_api_version() -> String {
    SUPPORTED_API_VERSION.to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_record_types() -> Vec<RecordType> {
    vec![RecordType::A, RecordType::Aaaa, RecordType::Cname]
}
