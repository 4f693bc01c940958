//! Provider registry.
//!
//! An explicit map of provider name → adapter, constructed once by the
//! builder and shared by reference with every component that needs to
//! dispatch a call. Keeping the registry an owned object (rather than a
//! process-wide static) means tests and embedders can run several
//! independently configured registries side by side.

use std::collections::HashMap;
use std::sync::Arc;

use super::traits::ProviderAdapter;
use crate::{Result, SkaldError};

/// Registry of provider adapters, keyed by provider name.
#[derive(Default)]
pub struct ProviderRegistry {
    adapters: HashMap<String, Arc<dyn ProviderAdapter>>,
}

impl ProviderRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an adapter under its own name, replacing any existing
    /// adapter with the same name.
    pub fn register(&mut self, adapter: Arc<dyn ProviderAdapter>) {
        self.adapters.insert(adapter.name().to_string(), adapter);
    }

    /// Look up an adapter by provider name.
    pub fn get(&self, provider: &str) -> Result<Arc<dyn ProviderAdapter>> {
        self.adapters
            .get(provider)
            .cloned()
            .ok_or_else(|| SkaldError::UnknownProvider(provider.to_string()))
    }

    /// Registered provider names, in no particular order.
    pub fn provider_names(&self) -> Vec<&str> {
        self.adapters.keys().map(String::as_str).collect()
    }

    /// Whether any provider is registered.
    pub fn is_empty(&self) -> bool {
        self.adapters.is_empty()
    }

    /// Consume the registry, yielding every (name, adapter) pair.
    pub fn into_adapters(self) -> impl Iterator<Item = (String, Arc<dyn ProviderAdapter>)> {
        self.adapters.into_iter()
    }
}
