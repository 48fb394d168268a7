//! Plugin-based provider registry
//!
//! The registry allows record providers to be registered dynamically at
//! runtime, avoiding hardcoded if-else chains.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use holesync_core::registry::ProviderRegistry;
//! use holesync_core::config::{PiholeConfig, ProviderConfig};
//!
//! // Create a registry
//! let registry = ProviderRegistry::new();
//!
//! // Register providers
//! holesync_provider_pihole::register(&registry);
//!
//! // Create provider from config
//! let config = ProviderConfig::Pihole(PiholeConfig::new("http://pi.hole"));
//! let provider = registry.create_provider(&config, &ctx).await?;
//! ```

use crate::config::ProviderConfig;
use crate::error::{Error, Result};
use crate::traits::{RecordProvider, RecordProviderFactory};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tokio_util::sync::CancellationToken;

/// Provider registry for plugin-based record provider creation
///
/// The registry maintains a map of provider type names to factory objects,
/// allowing dynamic instantiation of providers based on configuration.
///
/// ## Thread Safety
///
/// The registry uses interior mutability with RwLock, allowing concurrent
/// reads and exclusive writes.
#[derive(Default)]
pub struct ProviderRegistry {
    /// Registered record provider factories
    providers: RwLock<HashMap<String, Arc<dyn RecordProviderFactory>>>,
}

impl ProviderRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a record provider factory
    ///
    /// # Parameters
    ///
    /// - `name`: Provider type name (e.g., "pihole")
    /// - `factory`: Factory object for creating provider instances
    pub fn register_provider(
        &self,
        name: impl Into<String>,
        factory: Box<dyn RecordProviderFactory>,
    ) {
        let name = name.into();
        tracing::debug!("Registering record provider: {}", name);
        let mut providers = self.providers.write().unwrap();
        providers.insert(name, Arc::from(factory));
    }

    /// Create a record provider from configuration
    ///
    /// # Returns
    ///
    /// - `Ok(Box<dyn RecordProvider>)`: Created provider instance
    /// - `Err(Error)`: If provider type is not registered or creation fails
    pub async fn create_provider(
        &self,
        config: &ProviderConfig,
        ctx: &CancellationToken,
    ) -> Result<Box<dyn RecordProvider>> {
        let provider_type = config.type_name();

        let factory = {
            let providers = self.providers.read().unwrap();
            providers
                .get(provider_type)
                .ok_or_else(|| Error::config(format!("Unknown provider type: {}", provider_type)))?
                .clone()
        };

        // Lock released before the async create
        factory.create(config, ctx).await
    }

    /// List all registered provider types
    pub fn list_providers(&self) -> Vec<String> {
        let providers = self.providers.read().unwrap();
        providers.keys().cloned().collect()
    }

    /// Check if a provider type is registered
    pub fn has_provider(&self, name: &str) -> bool {
        let providers = self.providers.read().unwrap();
        providers.contains_key(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PiholeConfig;
    use async_trait::async_trait;

    struct MockProviderFactory;

    #[async_trait]
    impl RecordProviderFactory for MockProviderFactory {
        async fn create(
            &self,
            _config: &ProviderConfig,
            _ctx: &CancellationToken,
        ) -> Result<Box<dyn RecordProvider>> {
            Err(Error::config("mock provider not implemented"))
        }
    }

    #[test]
    fn test_registry_registration() {
        let registry = ProviderRegistry::new();

        // Initially empty
        assert!(!registry.has_provider("mock"));

        // Register
        registry.register_provider("mock", Box::new(MockProviderFactory));

        // Now present
        assert!(registry.has_provider("mock"));
        assert!(registry.list_providers().contains(&"mock".to_string()));
    }

    #[test]
    fn test_unknown_provider_type() {
        let registry = ProviderRegistry::new();
        let config = ProviderConfig::Pihole(PiholeConfig::new("http://pi.hole"));

        let result = tokio_test::block_on(registry.create_provider(&config, &CancellationToken::new()));
        match result {
            Err(Error::Config(msg)) => assert!(msg.contains("pihole")),
            Err(other) => panic!("unexpected error: {}", other),
            Ok(_) => panic!("expected unknown provider error"),
        }
    }

    #[test]
    fn test_factory_error_is_propagated() {
        let registry = ProviderRegistry::new();
        registry.register_provider("mock", Box::new(MockProviderFactory));
        let config = ProviderConfig::Custom {
            factory: "mock".to_string(),
            config: serde_json::json!({}),
        };

        let result = tokio_test::block_on(registry.create_provider(&config, &CancellationToken::new()));
        match result {
            Err(Error::Config(msg)) => assert_eq!(msg, "mock provider not implemented"),
            Err(other) => panic!("unexpected error: {}", other),
            Ok(_) => panic!("expected factory error"),
        }
    }
}
