//! Core traits for the holesync system
//!
//! This module defines the abstract interfaces that all providers must follow.
//!
//! - [`RecordProvider`]: List, create and delete DNS records on a backend
//! - [`RecordProviderFactory`]: Build providers from configuration

pub mod record_provider;

pub use record_provider::{MutationOutcome, RecordProvider, RecordProviderFactory, SkipReason};
