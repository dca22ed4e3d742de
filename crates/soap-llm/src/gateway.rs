use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use crate::gemini::GOOGLE_BASE_URL;
use crate::openai::{MISTRAL_BASE_URL, OPENAI_BASE_URL};
use crate::{
    execute_with_retry, BackoffPolicy, CallRequest, GeminiClient, OpenAiCompatClient,
    ProviderClient,
};
use soap_types::{Provider, Result, SoapError};

// ---------------------------------------------------------------------------
// GatewayConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Deadline for a single provider attempt.
    pub timeout: Duration,
    /// Retries after the first attempt, for transient failures only.
    pub max_retries: usize,
    pub backoff: BackoffPolicy,
    pub google_base_url: String,
    pub openai_base_url: String,
    pub mistral_base_url: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(60),
            max_retries: 2,
            backoff: BackoffPolicy::default(),
            google_base_url: GOOGLE_BASE_URL.to_string(),
            openai_base_url: OPENAI_BASE_URL.to_string(),
            mistral_base_url: MISTRAL_BASE_URL.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// ProviderGateway
// ---------------------------------------------------------------------------

/// Routes a call to the client registered for the resolved provider and
/// applies the deadline and retry budget around it.
pub struct ProviderGateway {
    clients: HashMap<Provider, Arc<dyn ProviderClient>>,
    timeout: Duration,
    max_retries: usize,
    backoff: BackoffPolicy,
}

impl ProviderGateway {
    /// Gateway with the Google, OpenAI and Mistral clients registered.
    pub fn new(config: &GatewayConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| SoapError::Other(format!("Failed to create HTTP client: {e}")))?;

        let mut gateway = Self::without_clients(config);
        gateway.register(GeminiClient::new(http.clone()).with_base_url(&config.google_base_url));
        gateway.register(
            OpenAiCompatClient::openai(http.clone()).with_base_url(&config.openai_base_url),
        );
        gateway.register(OpenAiCompatClient::mistral(http).with_base_url(&config.mistral_base_url));
        Ok(gateway)
    }

    /// Gateway with no clients; use [`register`](Self::register) to add them.
    pub fn without_clients(config: &GatewayConfig) -> Self {
        Self {
            clients: HashMap::new(),
            timeout: config.timeout,
            max_retries: config.max_retries,
            backoff: config.backoff.clone(),
        }
    }

    /// Register a client under its provider, replacing any previous one.
    pub fn register(&mut self, client: impl ProviderClient + 'static) {
        self.clients.insert(client.provider(), Arc::new(client));
    }

    /// Call the provider and return its raw text. An unregistered provider
    /// (including `Unknown`) fails before any network activity.
    pub async fn invoke(&self, provider: Provider, call: &CallRequest<'_>) -> Result<String> {
        let client = self
            .clients
            .get(&provider)
            .ok_or(SoapError::UnsupportedProvider { provider })?;

        tracing::info!(
            %provider,
            model = %call.model_id,
            prompt_chars = call.prompt.len(),
            "Provider request"
        );

        let text = execute_with_retry(
            || self.attempt(client.as_ref(), provider, call),
            self.max_retries,
            &self.backoff,
            provider.as_str(),
        )
        .await?;

        tracing::info!(
            %provider,
            model = %call.model_id,
            response_chars = text.len(),
            "Provider response"
        );
        Ok(text)
    }

    async fn attempt(
        &self,
        client: &dyn ProviderClient,
        provider: Provider,
        call: &CallRequest<'_>,
    ) -> Result<String> {
        match tokio::time::timeout(self.timeout, client.invoke(call)).await {
            Ok(result) => result,
            Err(_) => Err(SoapError::RequestTimeout {
                provider,
                timeout_ms: self.timeout.as_millis() as u64,
            }),
        }
    }
}
