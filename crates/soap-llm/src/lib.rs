//! Provider side of SOAP generation.
//!
//! Provides the static model registry, credential lookup, the
//! `ProviderClient` trait with Gemini and OpenAI-compatible implementations,
//! and `ProviderGateway` which adds a per-call deadline and bounded retries.

mod credentials;
mod gateway;
mod gemini;
mod openai;
mod provider;
mod registry;
mod retry;

pub use credentials::Credentials;
pub use gateway::*;
pub use gemini::GeminiClient;
pub use openai::OpenAiCompatClient;
pub use provider::*;
pub use registry::*;
pub use retry::*;
