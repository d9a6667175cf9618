use std::sync::Arc;

use indexmap::IndexMap;

use crate::error::ProviderRegistryError;
use crate::provider::{ProviderDescriptor, SearchProvider};

/// Metadata and implementation pair stored by the registry.
#[derive(Clone)]
pub struct RegisteredProvider {
    descriptor: &'static ProviderDescriptor,
    provider: Arc<dyn SearchProvider>,
}

impl RegisteredProvider {
    #[must_use]
    pub fn new(descriptor: &'static ProviderDescriptor, provider: Arc<dyn SearchProvider>) -> Self {
        Self {
            descriptor,
            provider,
        }
    }

    #[must_use]
    pub fn descriptor(&self) -> &'static ProviderDescriptor {
        self.descriptor
    }

    #[must_use]
    pub fn provider(&self) -> Arc<dyn SearchProvider> {
        Arc::clone(&self.provider)
    }
}

/// Registry of all result providers contributing to the current session.
///
/// Providers are kept in registration order so that "all providers"
/// behaviour stays deterministic.
#[derive(Clone, Default)]
pub struct ProviderRegistry {
    providers: IndexMap<&'static str, RegisteredProvider>,
}

impl ProviderRegistry {
    /// Create an empty registry without any providers registered.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            providers: IndexMap::new(),
        }
    }

    /// Register a provider implementation under its descriptor id.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderRegistryError::DuplicateId`] when a provider with
    /// the same id is already registered.
    pub fn register<P>(&mut self, provider: P) -> Result<(), ProviderRegistryError>
    where
        P: SearchProvider + 'static,
    {
        let descriptor = provider.descriptor();
        if self.providers.contains_key(descriptor.id) {
            return Err(ProviderRegistryError::DuplicateId { id: descriptor.id });
        }
        self.providers.insert(
            descriptor.id,
            RegisteredProvider::new(descriptor, Arc::new(provider)),
        );
        Ok(())
    }

    /// Attempt to resolve an identifier to a registered provider.
    #[must_use]
    pub fn provider_by_id(&self, id: &str) -> Option<Arc<dyn SearchProvider>> {
        self.providers.get(id).map(RegisteredProvider::provider)
    }

    /// Attempt to resolve an identifier to a provider descriptor.
    #[must_use]
    pub fn descriptor_by_id(&self, id: &str) -> Option<&'static ProviderDescriptor> {
        self.providers.get(id).map(RegisteredProvider::descriptor)
    }

    /// Remove the provider registered under `id`.
    pub fn deregister_by_id(&mut self, id: &str) -> Option<RegisteredProvider> {
        self.providers.shift_remove(id)
    }

    /// Iterate over registered providers in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &RegisteredProvider> {
        self.providers.values()
    }

    /// Return the number of registered providers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// Returns `true` when no providers have been registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}
