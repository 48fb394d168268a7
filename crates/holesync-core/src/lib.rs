// # holesync-core
//
// Core library for synchronizing DNS records with HTTP-managed DNS backends.
//
// ## Architecture Overview
//
// This library provides the provider-agnostic building blocks:
// - **Endpoint**: The logical DNS record exchanged with providers
// - **DomainFilter**: Predicate restricting which names may be managed
// - **RecordProvider**: Trait for listing and mutating records on a backend
// - **ProviderRegistry**: Plugin-based registry for record providers
//
// The decision of *which* records to create or delete belongs to the calling
// controller; providers only carry out the mechanics once a decision is made.

pub mod config;
pub mod endpoint;
pub mod error;
pub mod filter;
pub mod registry;
pub mod traits;

// Re-export core types for convenience
pub use config::{PiholeConfig, ProviderConfig, SyncConfig};
pub use endpoint::{Endpoint, RecordType};
pub use error::{Error, Result};
pub use filter::DomainFilter;
pub use registry::ProviderRegistry;
pub use traits::{MutationOutcome, RecordProvider, RecordProviderFactory, SkipReason};
