//! Task complexity classification and model selection.

use serde::{Deserialize, Serialize};

use crate::types::TaskType;

/// Coarse complexity bucket used to pick a cost-appropriate model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Complexity {
    Simple,
    Medium,
    Complex,
}

impl Complexity {
    fn from_rank(rank: i8) -> Self {
        match rank {
            i8::MIN..=0 => Complexity::Simple,
            1 => Complexity::Medium,
            _ => Complexity::Complex,
        }
    }

    fn rank(self) -> i8 {
        match self {
            Complexity::Simple => 0,
            Complexity::Medium => 1,
            Complexity::Complex => 2,
        }
    }
}

/// Token thresholds separating the complexity buckets.
#[derive(Debug, Clone)]
pub struct ComplexityThresholds {
    /// Prompts at or below this are simple. Default: 500 tokens.
    pub simple_max: u32,
    /// Prompts at or below this (and above `simple_max`) are medium.
    /// Default: 2,000 tokens.
    pub medium_max: u32,
}

impl Default for ComplexityThresholds {
    fn default() -> Self {
        Self {
            simple_max: 500,
            medium_max: 2_000,
        }
    }
}

impl ComplexityThresholds {
    /// Classify a prompt by token count, then nudge the bucket by task
    /// type: rigidly structured output (lists, changelogs) needs less
    /// model than the prompt size suggests, design-heavy prose needs more.
    pub fn classify(&self, prompt_tokens: u32, task: TaskType) -> Complexity {
        let base = if prompt_tokens <= self.simple_max {
            Complexity::Simple
        } else if prompt_tokens <= self.medium_max {
            Complexity::Medium
        } else {
            Complexity::Complex
        };
        Complexity::from_rank(base.rank() + task.complexity_nudge())
    }
}

/// Static lookup of the cheapest adequate model per provider and
/// complexity bucket.
///
/// Unknown providers fall back to a generic row so selection never fails;
/// the adapter will surface `ModelNotFound` if the fallback model doesn't
/// exist there.
#[derive(Debug, Clone, Default)]
pub struct ModelSelector;

impl ModelSelector {
    pub fn new() -> Self {
        Self
    }

    /// Pick a model for the given provider and complexity.
    pub fn select(&self, provider: &str, complexity: Complexity) -> &'static str {
        match (provider, complexity) {
            ("openai", Complexity::Simple) => "gpt-5-nano",
            ("openai", Complexity::Medium) => "gpt-5-mini",
            ("openai", Complexity::Complex) => "gpt-5",
            ("anthropic", Complexity::Simple) => "claude-haiku-4-5",
            ("anthropic", Complexity::Medium) => "claude-sonnet-4-5",
            ("anthropic", Complexity::Complex) => "claude-opus-4-5",
            ("ollama", Complexity::Simple) => "llama3.2:3b",
            ("ollama", _) => "llama3.1:8b",
            (_, Complexity::Simple) => "gpt-5-nano",
            (_, Complexity::Medium) => "gpt-5-mini",
            (_, Complexity::Complex) => "gpt-5",
        }
    }
}
