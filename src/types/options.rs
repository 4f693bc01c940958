//! Call options and per-generation context.

use std::path::PathBuf;
use std::time::Instant;

use serde::{Deserialize, Serialize};

/// Options for a single provider call (provider-agnostic).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallOptions {
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for CallOptions {
    fn default() -> Self {
        Self {
            model: String::new(),
            max_tokens: 4096,
            temperature: 0.7,
        }
    }
}

impl CallOptions {
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn max_tokens(mut self, max: u32) -> Self {
        self.max_tokens = max;
        self
    }

    pub fn temperature(mut self, temp: f32) -> Self {
        self.temperature = temp;
        self
    }
}

/// Kind of document being generated.
///
/// Used only to nudge complexity classification: tasks with rigid output
/// structure need less model capability than the raw prompt size suggests,
/// design-heavy prose needs more.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskType {
    #[default]
    General,
    ApiReference,
    StructuredList,
    Changelog,
    DesignDocument,
    Tutorial,
}

impl TaskType {
    /// Complexity nudge: -1 bumps a bucket down, +1 bumps it up.
    pub(crate) fn complexity_nudge(&self) -> i8 {
        match self {
            TaskType::StructuredList | TaskType::Changelog => -1,
            TaskType::DesignDocument | TaskType::Tutorial => 1,
            TaskType::General | TaskType::ApiReference => 0,
        }
    }
}

/// Per-generation context passed to [`Orchestrator::generate`](crate::Orchestrator::generate).
#[derive(Debug, Clone)]
pub struct GenerateContext {
    /// Provider to route the call to.
    pub provider: String,
    /// Kind of document, for complexity classification.
    pub task: TaskType,
    /// Where the generated document lives on disk, if anywhere. Used by
    /// change detection to force regeneration when the output is missing.
    pub output_path: Option<PathBuf>,
    /// Completion budget for the provider call.
    pub max_tokens: u32,
    pub temperature: f32,
    /// Overall deadline; interrupts retry sleeps and in-flight attempts.
    pub deadline: Option<Instant>,
    /// Bypass change detection and regenerate unconditionally.
    pub force: bool,
}

impl GenerateContext {
    /// Create a context routed to the given provider, with defaults.
    pub fn new(provider: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            task: TaskType::default(),
            output_path: None,
            max_tokens: 4096,
            temperature: 0.7,
            deadline: None,
            force: false,
        }
    }

    pub fn task(mut self, task: TaskType) -> Self {
        self.task = task;
        self
    }

    pub fn output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = Some(path.into());
        self
    }

    pub fn max_tokens(mut self, max: u32) -> Self {
        self.max_tokens = max;
        self
    }

    pub fn temperature(mut self, temp: f32) -> Self {
        self.temperature = temp;
        self
    }

    pub fn deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }
}
