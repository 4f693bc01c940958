//! Skald - cost-aware, resilient orchestration for document generation
//!
//! This crate sits between a documentation pipeline and the model
//! providers it calls. Every request runs through a fixed sequence of
//! gates, each cheaper than the next: change detection (skip work whose
//! inputs did not change), cost planning (compress the prompt, pick the
//! cheapest adequate model), a bounded response cache, and a resilience
//! stack (token bucket, circuit breaker, retry with backoff) in front of
//! the provider adapter.
//!
//! # Example
//!
//! ```rust,no_run
//! use skald::{Component, GenerateContext, Skald, TaskType};
//!
//! #[tokio::main]
//! async fn main() -> skald::Result<()> {
//!     let orchestrator = Skald::builder()
//!         .anthropic("sk-ant-your-key")
//!         .snapshot_path(".skald/snapshots.json")
//!         .build()
//!         .await?;
//!
//!     let component = Component::new("auth-service", "services/auth")
//!         .with_files(vec!["src/lib.rs".into(), "src/session.rs".into()]);
//!
//!     let outcome = orchestrator
//!         .generate(
//!             &component,
//!             "api-reference",
//!             "Document the public API of this component...",
//!             &GenerateContext::new("anthropic").task(TaskType::ApiReference),
//!         )
//!         .await?;
//!
//!     if let Some(text) = outcome.text() {
//!         println!("{text}");
//!     }
//!
//!     orchestrator.shutdown().await;
//!     Ok(())
//! }
//! ```

mod tasks;

pub mod cache;
pub mod cost;
pub mod error;
pub mod gateway;
pub mod providers;
pub mod resilience;
pub mod snapshot;
pub mod telemetry;
pub mod types;

// Re-export main types at crate root
pub use error::{Result, SkaldError};
pub use tasks::BackgroundTask;
pub use gateway::{Orchestrator, Skald, SkaldBuilder};
pub use providers::{ProviderAdapter, ProviderRegistry};
pub use types::{CallOptions, Component, GenerateContext, GenerateOutcome, TaskType};

pub use cache::{CacheConfig, CacheStats};
pub use cost::{Complexity, ComplexityThresholds, CostEstimate, PricingTable, PromptCompressor};
pub use resilience::{
    BreakerConfig, CircuitState, RateLimitConfig, ResilienceConfig, RetryConfig,
};
pub use snapshot::{ChangeDetector, ComponentSnapshot, SavingsEstimate, SnapshotStore};
