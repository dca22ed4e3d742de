use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use crate::{build_prompt, fallback, missing_sections, normalize, parse_response, validate};
use soap_llm::{CallRequest, Credentials, ModelRegistry, ProviderGateway};
use soap_types::{ClinicalInputs, Provider, Result, SoapError};

// ---------------------------------------------------------------------------
// FallbackPolicy / NoteSource / Generation
// ---------------------------------------------------------------------------

/// Whether the offline generator stands in when a provider note cannot be
/// produced. Validation failures are never masked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FallbackPolicy {
    #[default]
    Disabled,
    OnUnavailable,
}

/// Where a note came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NoteSource {
    Provider { provider: Provider, model: String },
    Fallback,
}

/// A generated note. `soap` is the provider's parsed JSON as returned, or
/// the fallback text as a JSON string.
#[derive(Debug, Clone)]
pub struct Generation {
    pub soap: Value,
    pub source: NoteSource,
}

// ---------------------------------------------------------------------------
// SoapGenerator
// ---------------------------------------------------------------------------

/// Runs one request through normalize → validate → resolve → prompt →
/// provider → parse. Holds no per-request state.
pub struct SoapGenerator {
    gateway: Arc<ProviderGateway>,
    credentials: Credentials,
    registry: &'static ModelRegistry,
    fallback: FallbackPolicy,
}

impl SoapGenerator {
    pub fn new(gateway: Arc<ProviderGateway>, credentials: Credentials) -> Self {
        Self {
            gateway,
            credentials,
            registry: ModelRegistry::builtin(),
            fallback: FallbackPolicy::default(),
        }
    }

    pub fn with_fallback(mut self, policy: FallbackPolicy) -> Self {
        self.fallback = policy;
        self
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Generate from an untyped request body.
    pub async fn generate(&self, body: &Value) -> Result<Generation> {
        let input = normalize(body);
        self.generate_from(&input).await
    }

    /// Generate from already-normalized inputs.
    pub async fn generate_from(&self, input: &ClinicalInputs) -> Result<Generation> {
        let report = validate(input);
        if !report.ok {
            return Err(SoapError::Validation(report));
        }

        match self.generate_with_provider(input).await {
            Ok(generation) => Ok(generation),
            Err(e)
                if self.fallback == FallbackPolicy::OnUnavailable
                    && e.is_provider_unavailable() =>
            {
                tracing::warn!(error = %e, "Provider note unavailable, using offline fallback");
                Ok(Generation {
                    soap: Value::String(fallback(input)),
                    source: NoteSource::Fallback,
                })
            }
            Err(e) => Err(e),
        }
    }

    async fn generate_with_provider(&self, input: &ClinicalInputs) -> Result<Generation> {
        let resolution = self.registry.resolve(&input.model);
        if !resolution.is_known() {
            return Err(SoapError::UnknownModel {
                label: resolution.canonical_model_id,
            });
        }
        let provider = resolution.provider;

        let api_key = self
            .credentials
            .get(provider)
            .ok_or(SoapError::MissingCredential { provider })?;

        let prompt = build_prompt(input);
        let raw = self
            .gateway
            .invoke(
                provider,
                &CallRequest {
                    api_key,
                    model_id: &resolution.canonical_model_id,
                    prompt: &prompt,
                },
            )
            .await?;

        let soap = parse_response(&raw)?;
        let missing = missing_sections(&soap);
        if !missing.is_empty() {
            tracing::warn!(
                %provider,
                model = %resolution.canonical_model_id,
                missing = ?missing,
                "Provider note is missing required sections"
            );
        }

        Ok(Generation {
            soap,
            source: NoteSource::Provider {
                provider,
                model: resolution.canonical_model_id,
            },
        })
    }
}
