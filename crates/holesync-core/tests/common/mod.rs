//! Test doubles for provider contract tests
//!
//! The in-memory provider stores endpoints keyed by (name, kind) and records
//! every call so tests can assert on what reached the "backend".

#![allow(dead_code)]

use async_trait::async_trait;
use holesync_core::config::ProviderConfig;
use holesync_core::error::{Error, Result};
use holesync_core::traits::{MutationOutcome, RecordProvider, RecordProviderFactory, SkipReason};
use holesync_core::{Endpoint, RecordType};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio_util::sync::CancellationToken;

/// Provider backed by a shared in-memory record list
pub struct InMemoryProvider {
    records: Arc<Mutex<Vec<Endpoint>>>,
    dry_run: bool,
}

impl InMemoryProvider {
    pub fn new(records: Arc<Mutex<Vec<Endpoint>>>, dry_run: bool) -> Self {
        Self { records, dry_run }
    }
}

#[async_trait]
impl RecordProvider for InMemoryProvider {
    async fn list_records(
        &self,
        ctx: &CancellationToken,
        record_type: &RecordType,
    ) -> Result<Vec<Endpoint>> {
        if ctx.is_cancelled() {
            return Err(Error::Cancelled);
        }
        if matches!(record_type, RecordType::Other(_)) {
            return Err(Error::unsupported_record_type(record_type.as_str()));
        }

        let records = self.records.lock().unwrap();
        Ok(records
            .iter()
            .filter(|r| &r.record_type == record_type)
            .cloned()
            .collect())
    }

    async fn create_record(
        &self,
        _ctx: &CancellationToken,
        endpoint: &Endpoint,
    ) -> Result<MutationOutcome> {
        if endpoint.targets.is_empty() {
            return Ok(MutationOutcome::Skipped(SkipReason::NoTargets));
        }
        if self.dry_run {
            return Ok(MutationOutcome::Skipped(SkipReason::DryRun));
        }

        self.records.lock().unwrap().push(endpoint.clone());
        Ok(MutationOutcome::Applied {
            entries: endpoint.targets.len(),
        })
    }

    async fn delete_record(
        &self,
        _ctx: &CancellationToken,
        endpoint: &Endpoint,
    ) -> Result<MutationOutcome> {
        if self.dry_run {
            return Ok(MutationOutcome::Skipped(SkipReason::DryRun));
        }

        let mut records = self.records.lock().unwrap();
        let before = records.len();
        records.retain(|r| r != endpoint);
        Ok(MutationOutcome::Applied {
            entries: before - records.len(),
        })
    }

    fn provider_name(&self) -> &'static str {
        "memory"
    }
}

/// Factory handing out providers that share one record list
pub struct InMemoryFactory {
    pub records: Arc<Mutex<Vec<Endpoint>>>,
    pub created: Arc<AtomicUsize>,
}

impl InMemoryFactory {
    pub fn new() -> Self {
        Self {
            records: Arc::new(Mutex::new(Vec::new())),
            created: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn created(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RecordProviderFactory for InMemoryFactory {
    async fn create(
        &self,
        config: &ProviderConfig,
        _ctx: &CancellationToken,
    ) -> Result<Box<dyn RecordProvider>> {
        let dry_run = match config {
            ProviderConfig::Custom { config, .. } => config
                .get("dry_run")
                .and_then(|v| v.as_bool())
                .unwrap_or(false),
            ProviderConfig::Pihole(_) => {
                return Err(Error::config("in-memory factory needs a custom config"));
            }
        };

        self.created.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(InMemoryProvider::new(self.records.clone(), dry_run)))
    }
}

/// Custom provider config pointing at the in-memory factory
pub fn memory_config(dry_run: bool) -> ProviderConfig {
    ProviderConfig::Custom {
        factory: "memory".to_string(),
        config: serde_json::json!({ "dry_run": dry_run }),
    }
}
