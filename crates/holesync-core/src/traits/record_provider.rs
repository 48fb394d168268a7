// # Record Provider Trait
//
// Defines the interface a reconciling controller uses to read and mutate
// DNS records on a backend.
//
// ## Implementations
//
// - Pi-hole: `holesync-provider-pihole` crate
//
// ## Usage
//
// ```rust,ignore
// use holesync_core::{Endpoint, RecordProvider, RecordType};
// use tokio_util::sync::CancellationToken;
//
// #[tokio::main]
// async fn main() -> anyhow::Result<()> {
//     let provider = /* RecordProvider implementation */;
//     let ctx = CancellationToken::new();
//
//     let current = provider.list_records(&ctx, &RecordType::A).await?;
//
//     let desired = Endpoint::new("nas.example.com", RecordType::A, ["192.168.1.20"]);
//     provider.create_record(&ctx, &desired).await?;
//
//     Ok(())
// }
// ```

use crate::config::ProviderConfig;
use crate::endpoint::{Endpoint, RecordType};
use async_trait::async_trait;
use std::fmt;
use tokio_util::sync::CancellationToken;

/// Why a mutation was intentionally not sent to the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The endpoint has no targets
    NoTargets,
    /// The domain is excluded by the configured domain filter
    FilteredDomain,
    /// The backend cannot represent this record kind
    UnsupportedType,
    /// Dry-run mode is active
    DryRun,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SkipReason::NoTargets => "no targets",
            SkipReason::FilteredDomain => "domain excluded by filter",
            SkipReason::UnsupportedType => "unsupported record type",
            SkipReason::DryRun => "dry run",
        })
    }
}

/// Result of a create or delete operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationOutcome {
    /// Every backend entry for the endpoint was written
    Applied {
        /// Number of backend entries sent
        entries: usize,
    },
    /// Nothing was sent to the backend
    Skipped(SkipReason),
}

impl MutationOutcome {
    /// Whether the backend was modified
    pub fn is_applied(&self) -> bool {
        matches!(self, MutationOutcome::Applied { .. })
    }
}

/// Trait for DNS record backends
///
/// Each call runs its HTTP exchanges sequentially on the caller's task and
/// honours the cancellation token. Implementations must be usable across
/// async tasks.
///
/// Skips (no targets, filtered domain, unsupported kind, dry run) are
/// reported as [`MutationOutcome::Skipped`], never as errors. Validation
/// failures (wildcards, multi-target aliases) are errors raised before any
/// request is sent.
#[async_trait]
pub trait RecordProvider: Send + Sync {
    /// List all records of the given kind
    ///
    /// # Returns
    ///
    /// - `Ok(Vec<Endpoint>)`: One endpoint per (name, kind), targets in backend order
    /// - `Err(Error)`: Unsupported kind, transport, or decoding failure
    async fn list_records(
        &self,
        ctx: &CancellationToken,
        record_type: &RecordType,
    ) -> Result<Vec<Endpoint>, crate::Error>;

    /// Create every backend entry described by `endpoint`
    async fn create_record(
        &self,
        ctx: &CancellationToken,
        endpoint: &Endpoint,
    ) -> Result<MutationOutcome, crate::Error>;

    /// Delete every backend entry described by `endpoint`
    async fn delete_record(
        &self,
        ctx: &CancellationToken,
        endpoint: &Endpoint,
    ) -> Result<MutationOutcome, crate::Error>;

    /// Release any backend session held by the provider
    ///
    /// The default does nothing; providers without sessions need not override it.
    async fn close(&self, _ctx: &CancellationToken) -> Result<(), crate::Error> {
        Ok(())
    }

    /// Get the provider name (for logging/debugging)
    fn provider_name(&self) -> &'static str;
}

/// Helper trait for constructing record providers from configuration
///
/// Creation is async because providers may authenticate against their
/// backend before they are usable.
#[async_trait]
pub trait RecordProviderFactory: Send + Sync {
    /// Create a RecordProvider instance from configuration
    async fn create(
        &self,
        config: &ProviderConfig,
        ctx: &CancellationToken,
    ) -> Result<Box<dyn RecordProvider>, crate::Error>;
}
