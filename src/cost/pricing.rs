//! Provider and model pricing.
//!
//! Per-1K-token input/output prices keyed by provider + model. Unknown
//! models fall back to a provider-level default tier; unknown providers
//! fall back to a global default. Estimates are advisory — they inform
//! compression and model selection, never billing reconciliation.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Global default prices (USD per 1K tokens) for providers with no table
/// entry at all.
const DEFAULT_INPUT_PER_1K: f64 = 0.005;
const DEFAULT_OUTPUT_PER_1K: f64 = 0.015;

/// Input/output price pair, USD per 1K tokens.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceTier {
    pub input_per_1k: f64,
    pub output_per_1k: f64,
}

impl PriceTier {
    pub const fn new(input_per_1k: f64, output_per_1k: f64) -> Self {
        Self {
            input_per_1k,
            output_per_1k,
        }
    }
}

/// Structured pre-call cost estimate. Purely derived; never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostEstimate {
    pub provider: String,
    pub model: String,
    pub input_tokens: u32,
    pub output_tokens: u32,
    pub input_per_1k: f64,
    pub output_per_1k: f64,
    pub total_cost: f64,
}

/// Pricing table with per-model entries and per-provider defaults.
#[derive(Debug, Clone)]
pub struct PricingTable {
    models: HashMap<(String, String), PriceTier>,
    provider_defaults: HashMap<String, PriceTier>,
}

impl Default for PricingTable {
    fn default() -> Self {
        Self::with_builtin_prices()
    }
}

impl PricingTable {
    /// Create an empty table (everything falls back to the global
    /// default tier).
    pub fn empty() -> Self {
        Self {
            models: HashMap::new(),
            provider_defaults: HashMap::new(),
        }
    }

    /// Create a table seeded with built-in prices for the bundled
    /// adapters (USD per 1K tokens, late-2025 list prices).
    pub fn with_builtin_prices() -> Self {
        let mut table = Self::empty();

        table.set_model("openai", "gpt-5-nano", PriceTier::new(0.00005, 0.0004));
        table.set_model("openai", "gpt-5-mini", PriceTier::new(0.00025, 0.002));
        table.set_model("openai", "gpt-5", PriceTier::new(0.00125, 0.01));
        table.set_model("openai", "gpt-4o-mini", PriceTier::new(0.00015, 0.0006));
        table.set_model("openai", "gpt-4o", PriceTier::new(0.0025, 0.01));
        table.set_provider_default("openai", PriceTier::new(0.00125, 0.01));

        table.set_model("anthropic", "claude-haiku-4-5", PriceTier::new(0.001, 0.005));
        table.set_model(
            "anthropic",
            "claude-sonnet-4-5",
            PriceTier::new(0.003, 0.015),
        );
        table.set_model("anthropic", "claude-opus-4-5", PriceTier::new(0.005, 0.025));
        table.set_provider_default("anthropic", PriceTier::new(0.003, 0.015));

        // Local inference is free.
        table.set_provider_default("ollama", PriceTier::new(0.0, 0.0));

        table
    }

    /// Set the price for a specific provider + model.
    pub fn set_model(&mut self, provider: &str, model: &str, tier: PriceTier) {
        self.models
            .insert((provider.to_string(), model.to_string()), tier);
    }

    /// Set the fallback price tier for a provider's unknown models.
    pub fn set_provider_default(&mut self, provider: &str, tier: PriceTier) {
        self.provider_defaults.insert(provider.to_string(), tier);
    }

    /// Resolve the price tier for a provider + model, falling back to the
    /// provider default, then the global default. Never fails.
    pub fn tier_for(&self, provider: &str, model: &str) -> PriceTier {
        self.models
            .get(&(provider.to_string(), model.to_string()))
            .or_else(|| self.provider_defaults.get(provider))
            .copied()
            .unwrap_or(PriceTier::new(DEFAULT_INPUT_PER_1K, DEFAULT_OUTPUT_PER_1K))
    }

    /// Produce a structured estimate for a planned call.
    pub fn estimate_cost(
        &self,
        provider: &str,
        model: &str,
        input_tokens: u32,
        output_tokens: u32,
    ) -> CostEstimate {
        let tier = self.tier_for(provider, model);
        let total_cost = f64::from(input_tokens) / 1000.0 * tier.input_per_1k
            + f64::from(output_tokens) / 1000.0 * tier.output_per_1k;
        CostEstimate {
            provider: provider.to_string(),
            model: model.to_string(),
            input_tokens,
            output_tokens,
            input_per_1k: tier.input_per_1k,
            output_per_1k: tier.output_per_1k,
            total_cost,
        }
    }
}
