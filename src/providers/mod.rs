//! Provider adapters and registry.

mod anthropic;
mod ollama;
mod openai;
mod registry;
mod traits;

pub use anthropic::AnthropicAdapter;
pub use ollama::OllamaAdapter;
pub use openai::OpenAiAdapter;
pub use registry::ProviderRegistry;
pub use traits::ProviderAdapter;

pub(crate) use openai::build_http_client;
