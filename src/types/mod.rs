//! Public types for the Skald API.

mod component;
mod options;
mod outcome;

pub use component::Component;
pub use options::{CallOptions, GenerateContext, TaskType};
pub use outcome::GenerateOutcome;
