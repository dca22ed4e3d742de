//! Shared types and errors for the SOAP note generator.
//!
//! This crate provides the foundational types used across all other crates:
//! - `SoapError`: unified error taxonomy with a stable HTTP status mapping
//! - `ClinicalInputs` / `Vitals`: canonical, normalized request data
//! - `ValidationReport`: collected field-level validation issues
//! - `SoapNote`: the four-section clinical note
//! - `Provider` / `ModelResolution`: outcome of resolving a model label

mod clinical;
mod provider;

pub use clinical::*;
pub use provider::*;

/// Client-facing message for validation failures.
pub const MSG_INVALID_INPUT: &str = "Invalid input";
/// Client-facing message when the resolved provider has no API key.
pub const MSG_MISSING_API_KEY: &str = "Missing API key for selected model";
/// Client-facing message for every other failure.
pub const MSG_GENERATION_FAILED: &str = "Generation failed";

/// Unified error type for the generation pipeline.
#[derive(Debug, thiserror::Error)]
pub enum SoapError {
    // === Pre-call errors ===
    #[error("Invalid input: {} issue(s)", .0.issues.len())]
    Validation(ValidationReport),

    #[error("API key not found for provider: {provider}")]
    MissingCredential { provider: Provider },

    #[error("Unknown model: {label}")]
    UnknownModel { label: String },

    #[error("Unsupported provider: {provider}")]
    UnsupportedProvider { provider: Provider },

    // === Provider errors ===
    #[error("{provider} API error ({status}): {body}")]
    ProviderHttp {
        provider: Provider,
        status: u16,
        body: String,
    },

    #[error("Request to {provider} failed: {message}")]
    Transport { provider: Provider, message: String },

    #[error("Request to {provider} timed out after {timeout_ms}ms")]
    RequestTimeout { provider: Provider, timeout_ms: u64 },

    // === Response errors ===
    #[error("{message}")]
    Parse { message: String },

    // === Generic ===
    #[error("{0}")]
    Other(String),
}

impl SoapError {
    /// Returns `true` if the error is transient and the call may succeed on retry.
    pub fn is_retryable(&self) -> bool {
        match self {
            SoapError::Transport { .. } | SoapError::RequestTimeout { .. } => true,
            SoapError::ProviderHttp { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }

    /// Maps the error to the HTTP status returned at the request boundary.
    ///
    /// Only validation and credential errors are distinguished; everything
    /// else collapses to 500.
    pub fn http_status(&self) -> u16 {
        match self {
            SoapError::Validation(_) | SoapError::MissingCredential { .. } => 400,
            _ => 500,
        }
    }

    /// The fixed message shown to clients. Internal detail stays in logs.
    pub fn client_message(&self) -> &'static str {
        match self {
            SoapError::Validation(_) => MSG_INVALID_INPUT,
            SoapError::MissingCredential { .. } => MSG_MISSING_API_KEY,
            _ => MSG_GENERATION_FAILED,
        }
    }

    /// Returns `true` when no provider response could be obtained or used,
    /// i.e. the offline generator is a meaningful substitute.
    pub fn is_provider_unavailable(&self) -> bool {
        !matches!(self, SoapError::Validation(_))
    }
}

/// A convenience alias for `Result<T, SoapError>`.
pub type Result<T> = std::result::Result<T, SoapError>;
