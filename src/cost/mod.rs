//! Cost optimization: token estimation, complexity classification, model
//! selection, prompt compression, and pre-call cost estimates.

mod complexity;
mod compress;
mod estimator;
mod pricing;

pub use complexity::{Complexity, ComplexityThresholds, ModelSelector};
pub use compress::PromptCompressor;
pub use estimator::{CHARS_PER_TOKEN, estimate_tokens};
pub use pricing::{CostEstimate, PriceTier, PricingTable};

use tracing::debug;

use crate::telemetry;
use crate::types::TaskType;

/// A generation plan: what to send, to which model, at what expected cost.
#[derive(Debug, Clone)]
pub struct GenerationPlan {
    /// Compressed (or original, if compression was unsafe) prompt text.
    pub prompt: String,
    /// Model chosen for the classified complexity.
    pub model: String,
    pub complexity: Complexity,
    pub estimate: CostEstimate,
}

/// Reduces token spend before any call is made: compresses the prompt,
/// classifies its complexity, selects the cheapest adequate model, and
/// prices the result.
#[derive(Debug, Clone, Default)]
pub struct CostOptimizer {
    pub thresholds: ComplexityThresholds,
    pub compressor: PromptCompressor,
    pub selector: ModelSelector,
    pub pricing: PricingTable,
}

impl CostOptimizer {
    pub fn new(
        thresholds: ComplexityThresholds,
        compressor: PromptCompressor,
        pricing: PricingTable,
    ) -> Self {
        Self {
            thresholds,
            compressor,
            selector: ModelSelector::new(),
            pricing,
        }
    }

    /// Build a plan for sending `input` to `provider`.
    ///
    /// `expected_output_tokens` is the completion budget, used only for
    /// the advisory cost figure.
    pub fn plan(
        &self,
        provider: &str,
        input: &str,
        task: TaskType,
        expected_output_tokens: u32,
    ) -> GenerationPlan {
        let prompt = self.compressor.compress(input);
        let prompt_tokens = estimate_tokens(&prompt);
        let complexity = self.thresholds.classify(prompt_tokens, task);
        let model = self.selector.select(provider, complexity).to_string();
        let estimate =
            self.pricing
                .estimate_cost(provider, &model, prompt_tokens, expected_output_tokens);

        metrics::histogram!(telemetry::ESTIMATED_COST_USD,
            "provider" => provider.to_owned())
        .record(estimate.total_cost);
        debug!(
            provider,
            model = %model,
            prompt_tokens,
            ?complexity,
            estimated_cost = estimate.total_cost,
            "generation planned"
        );

        GenerationPlan {
            prompt,
            model,
            complexity,
            estimate,
        }
    }
}
