//! Orchestrator construction and the generation pipeline.

mod builder;
mod orchestrator;

pub use builder::{Skald, SkaldBuilder};
pub use orchestrator::Orchestrator;
