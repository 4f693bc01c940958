//! Orchestrator: the full generation pipeline.
//!
//! One `generate` call walks change detection, cost planning, the
//! response cache, and the resilience stack, in that order. Each gate is
//! cheaper than the one after it, so work is shed as early as possible.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::cache::{CacheConfig, CacheStats, ResponseCache, cache_key};
use crate::cost::CostOptimizer;
use crate::error::{Result, SkaldError};
use crate::providers::ProviderRegistry;
use crate::resilience::{CircuitState, ResilienceConfig, ResilientAdapter};
use crate::snapshot::{ChangeDetector, SavingsEstimate, SnapshotStore};
use crate::tasks::BackgroundTask;
use crate::telemetry;
use crate::types::{CallOptions, Component, GenerateContext, GenerateOutcome};

/// Per-provider runtime: the wrapped adapter plus its response cache.
struct ProviderRuntime {
    adapter: Arc<ResilientAdapter>,
    cache: Arc<ResponseCache>,
}

/// Mediates every model call made by a documentation pipeline.
///
/// Built via [`Skald::builder`](crate::Skald::builder). Each configured
/// provider gets its own resilience stack and response cache; cost
/// planning and change detection are shared.
pub struct Orchestrator {
    providers: HashMap<String, ProviderRuntime>,
    optimizer: CostOptimizer,
    detector: ChangeDetector,
    tasks: Vec<BackgroundTask>,
}

impl std::fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("providers", &self.providers.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

impl Orchestrator {
    pub(crate) fn new(
        registry: ProviderRegistry,
        resilience: ResilienceConfig,
        resilience_overrides: HashMap<String, ResilienceConfig>,
        cache_config: CacheConfig,
        optimizer: CostOptimizer,
        store: Arc<SnapshotStore>,
        metrics_interval: Duration,
    ) -> Self {
        let mut providers = HashMap::new();
        let mut tasks = Vec::new();
        for (name, adapter) in registry.into_adapters() {
            let config = resilience_overrides
                .get(&name)
                .cloned()
                .unwrap_or_else(|| resilience.clone());
            let cache = Arc::new(ResponseCache::new(name.clone(), cache_config.clone()));
            tasks.push(cache.spawn_sweeper());
            providers.insert(
                name,
                ProviderRuntime {
                    adapter: Arc::new(ResilientAdapter::new(adapter, config)),
                    cache,
                },
            );
        }

        let reporters: Vec<(String, Arc<ResponseCache>, Arc<ResilientAdapter>)> = providers
            .iter()
            .map(|(name, rt)| (name.clone(), rt.cache.clone(), rt.adapter.clone()))
            .collect();
        tasks.push(BackgroundTask::spawn_periodic(
            "metrics-reporter",
            metrics_interval,
            move || report_gauges(&reporters),
        ));

        Self {
            providers,
            optimizer,
            detector: ChangeDetector::new(store),
            tasks,
        }
    }

    /// Generate one document for a component.
    ///
    /// Runs the full pipeline: change detection (unless `ctx.force`),
    /// cost planning, the response cache, then a resilient provider call.
    /// The component snapshot is updated after every successful outcome,
    /// cached or fresh.
    pub async fn generate(
        &self,
        component: &Component,
        doc_type: &str,
        input: &str,
        ctx: &GenerateContext,
    ) -> Result<GenerateOutcome> {
        let runtime = self
            .providers
            .get(&ctx.provider)
            .ok_or_else(|| SkaldError::UnknownProvider(ctx.provider.clone()))?;

        if !ctx.force {
            let (needed, reason) = self
                .detector
                .should_regenerate(component, doc_type, ctx.output_path.as_deref())
                .await?;
            if !needed {
                metrics::counter!(telemetry::GENERATIONS_SKIPPED_TOTAL,
                    "doc_type" => doc_type.to_owned())
                .increment(1);
                info!(
                    component = %component.name,
                    doc_type,
                    reason = %reason,
                    "generation skipped"
                );
                return Ok(GenerateOutcome::Skipped { reason });
            }
            debug!(
                component = %component.name,
                doc_type,
                reason = %reason,
                "regeneration needed"
            );
        }

        let plan = self
            .optimizer
            .plan(&ctx.provider, input, ctx.task, ctx.max_tokens);
        let key = cache_key(
            &ctx.provider,
            &plan.model,
            &plan.prompt,
            ctx.max_tokens,
            ctx.temperature,
        );

        if let Some(text) = runtime.cache.get(&key) {
            self.detector
                .update_snapshot(component, doc_type, &text)
                .await?;
            return Ok(GenerateOutcome::Generated {
                text,
                provider: ctx.provider.clone(),
                model: plan.model,
                from_cache: true,
            });
        }

        let options = CallOptions::default()
            .model(&plan.model)
            .max_tokens(ctx.max_tokens)
            .temperature(ctx.temperature);
        let text = runtime
            .adapter
            .complete(&plan.prompt, &options, ctx.deadline)
            .await?;

        // A response too large for the cache is still a valid response.
        if let Err(e) = runtime.cache.insert(&key, &text) {
            warn!(provider = %ctx.provider, error = %e, "response not cached");
        }
        self.detector
            .update_snapshot(component, doc_type, &text)
            .await?;

        Ok(GenerateOutcome::Generated {
            text,
            provider: ctx.provider.clone(),
            model: plan.model,
            from_cache: false,
        })
    }

    /// The change detector, for callers that want detection decisions
    /// without generating.
    pub fn detector(&self) -> &ChangeDetector {
        &self.detector
    }

    /// Estimate how much generation work change detection would skip.
    pub async fn estimate_savings(
        &self,
        components: &[Component],
        doc_types: &[&str],
    ) -> Result<SavingsEstimate> {
        self.detector.estimate_savings(components, doc_types).await
    }

    /// Cache statistics for one provider.
    pub fn cache_stats(&self, provider: &str) -> Result<CacheStats> {
        self.runtime(provider).map(|rt| rt.cache.stats())
    }

    /// Circuit breaker state for one provider.
    pub fn breaker_state(&self, provider: &str) -> Result<CircuitState> {
        self.runtime(provider).map(|rt| rt.adapter.breaker_state())
    }

    /// Configured provider names, in no particular order.
    pub fn provider_names(&self) -> Vec<&str> {
        self.providers.keys().map(String::as_str).collect()
    }

    /// Stop the background sweeper and metrics tasks.
    pub async fn shutdown(self) {
        for task in self.tasks {
            task.shutdown().await;
        }
    }

    fn runtime(&self, provider: &str) -> Result<&ProviderRuntime> {
        self.providers
            .get(provider)
            .ok_or_else(|| SkaldError::UnknownProvider(provider.to_string()))
    }
}

/// Emit cache size and breaker state gauges for every provider.
fn report_gauges(providers: &[(String, Arc<ResponseCache>, Arc<ResilientAdapter>)]) {
    for (name, cache, adapter) in providers {
        let stats = cache.stats();
        metrics::gauge!(telemetry::CACHE_SIZE_BYTES, "provider" => name.clone())
            .set(stats.current_bytes as f64);
        metrics::gauge!(telemetry::CACHE_ENTRIES, "provider" => name.clone())
            .set(stats.entries as f64);
        let state = match adapter.breaker_state() {
            CircuitState::Closed => 0.0,
            CircuitState::HalfOpen => 1.0,
            CircuitState::Open => 2.0,
        };
        metrics::gauge!(telemetry::BREAKER_STATE, "provider" => name.clone()).set(state);
    }
}
