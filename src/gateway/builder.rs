//! Builder for configuring orchestrator instances.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use super::Orchestrator;
use crate::cache::CacheConfig;
use crate::cost::{ComplexityThresholds, CostOptimizer, PricingTable, PromptCompressor};
use crate::error::{Result, SkaldError};
use crate::providers::{
    AnthropicAdapter, OllamaAdapter, OpenAiAdapter, ProviderAdapter, ProviderRegistry,
    build_http_client,
};
use crate::resilience::ResilienceConfig;
use crate::snapshot::SnapshotStore;

/// Main entry point for creating orchestrator instances.
pub struct Skald;

impl Skald {
    /// Create a new builder for configuring the orchestrator.
    pub fn builder() -> SkaldBuilder {
        SkaldBuilder::new()
    }
}

/// Builder for configuring orchestrator instances.
pub struct SkaldBuilder {
    openai_key: Option<String>,
    anthropic_key: Option<String>,
    ollama_url: Option<String>,
    custom_adapters: Vec<Arc<dyn ProviderAdapter>>,
    resilience: ResilienceConfig,
    resilience_overrides: HashMap<String, ResilienceConfig>,
    cache: CacheConfig,
    thresholds: ComplexityThresholds,
    compressor: PromptCompressor,
    pricing: PricingTable,
    snapshot_path: PathBuf,
    metrics_interval: Duration,
    default_timeout_secs: Option<u64>,
}

impl SkaldBuilder {
    pub fn new() -> Self {
        Self {
            openai_key: None,
            anthropic_key: None,
            ollama_url: None,
            custom_adapters: Vec::new(),
            resilience: ResilienceConfig::default(),
            resilience_overrides: HashMap::new(),
            cache: CacheConfig::default(),
            thresholds: ComplexityThresholds::default(),
            compressor: PromptCompressor::default(),
            pricing: PricingTable::with_builtin_prices(),
            snapshot_path: PathBuf::from(".skald/snapshots.json"),
            metrics_interval: Duration::from_secs(15),
            default_timeout_secs: None,
        }
    }

    /// Configure the OpenAI provider.
    pub fn openai(mut self, api_key: impl Into<String>) -> Self {
        self.openai_key = Some(api_key.into());
        self
    }

    /// Configure the Anthropic provider.
    pub fn anthropic(mut self, api_key: impl Into<String>) -> Self {
        self.anthropic_key = Some(api_key.into());
        self
    }

    /// Configure the Ollama provider with a custom URL.
    pub fn ollama(mut self, url: impl Into<String>) -> Self {
        self.ollama_url = Some(url.into());
        self
    }

    /// Register a custom provider adapter.
    ///
    /// The adapter is routed to by its [`name`](ProviderAdapter::name)
    /// and goes through the same resilience and caching layers as the
    /// built-in providers.
    pub fn adapter(mut self, adapter: Arc<dyn ProviderAdapter>) -> Self {
        self.custom_adapters.push(adapter);
        self
    }

    /// Set the resilience configuration applied to every provider.
    pub fn resilience(mut self, config: ResilienceConfig) -> Self {
        self.resilience = config;
        self
    }

    /// Override the resilience configuration for one provider.
    pub fn resilience_for(mut self, provider: impl Into<String>, config: ResilienceConfig) -> Self {
        self.resilience_overrides.insert(provider.into(), config);
        self
    }

    /// Set the response cache configuration (shared by all providers,
    /// each provider gets its own cache with these limits).
    pub fn cache(mut self, config: CacheConfig) -> Self {
        self.cache = config;
        self
    }

    /// Set the complexity thresholds used for model selection.
    pub fn thresholds(mut self, thresholds: ComplexityThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    /// Set the prompt compressor.
    pub fn compressor(mut self, compressor: PromptCompressor) -> Self {
        self.compressor = compressor;
        self
    }

    /// Set the pricing table used for cost estimates.
    pub fn pricing(mut self, pricing: PricingTable) -> Self {
        self.pricing = pricing;
        self
    }

    /// Set the path of the snapshot file.
    pub fn snapshot_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.snapshot_path = path.into();
        self
    }

    /// Set how often cache and breaker gauges are reported.
    pub fn metrics_interval(mut self, interval: Duration) -> Self {
        self.metrics_interval = interval;
        self
    }

    /// Set default timeout for all HTTP requests (seconds).
    pub fn timeout(mut self, secs: u64) -> Self {
        self.default_timeout_secs = Some(secs);
        self
    }

    /// Build the orchestrator.
    ///
    /// Loads the snapshot file and starts the background sweeper and
    /// metrics tasks. Returns [`SkaldError::NoProvider`] when no provider
    /// was configured.
    pub async fn build(self) -> Result<Orchestrator> {
        let timeout_secs = self.default_timeout_secs.unwrap_or(120);
        let http = build_http_client(Duration::from_secs(timeout_secs))?;

        let mut registry = ProviderRegistry::new();
        if let Some(ref key) = self.openai_key {
            registry.register(Arc::new(OpenAiAdapter::new(key, http.clone())));
        }
        if let Some(ref key) = self.anthropic_key {
            registry.register(Arc::new(AnthropicAdapter::new(key, http.clone())));
        }
        if let Some(ref url) = self.ollama_url {
            registry.register(Arc::new(OllamaAdapter::new(url, http.clone())));
        }
        for adapter in self.custom_adapters {
            registry.register(adapter);
        }
        if registry.is_empty() {
            return Err(SkaldError::NoProvider);
        }

        let optimizer = CostOptimizer::new(self.thresholds, self.compressor, self.pricing);
        let store = Arc::new(SnapshotStore::open(self.snapshot_path).await);

        Ok(Orchestrator::new(
            registry,
            self.resilience,
            self.resilience_overrides,
            self.cache,
            optimizer,
            store,
            self.metrics_interval,
        ))
    }
}

impl Default for SkaldBuilder {
    fn default() -> Self {
        Self::new()
    }
}
