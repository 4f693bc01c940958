//! Result of a generation request.

/// Outcome of [`Orchestrator::generate`](crate::Orchestrator::generate).
///
/// A skip is a successful outcome, not an error: change detection decided
/// the existing document is still valid.
#[derive(Debug, Clone, PartialEq)]
pub enum GenerateOutcome {
    /// Generation was skipped because nothing changed.
    Skipped {
        /// Human-readable reason, e.g. "up to date".
        reason: String,
    },
    /// A document was produced.
    Generated {
        text: String,
        provider: String,
        /// Model actually selected by the cost optimizer.
        model: String,
        /// Whether the response came from the cache instead of the network.
        from_cache: bool,
    },
}

impl GenerateOutcome {
    /// The generated text, if any.
    pub fn text(&self) -> Option<&str> {
        match self {
            GenerateOutcome::Generated { text, .. } => Some(text),
            GenerateOutcome::Skipped { .. } => None,
        }
    }

    /// Whether this outcome was a change-detection skip.
    pub fn is_skipped(&self) -> bool {
        matches!(self, GenerateOutcome::Skipped { .. })
    }
}
