use async_trait::async_trait;

use soap_types::{Provider, Result, SoapError};

// ---------------------------------------------------------------------------
// CallRequest
// ---------------------------------------------------------------------------

/// Everything a provider needs for one generation call.
#[derive(Clone, Copy)]
pub struct CallRequest<'a> {
    pub api_key: &'a str,
    pub model_id: &'a str,
    pub prompt: &'a str,
}

impl std::fmt::Debug for CallRequest<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallRequest")
            .field("model_id", &self.model_id)
            .field("prompt_len", &self.prompt.len())
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// ProviderClient
// ---------------------------------------------------------------------------

/// One REST backend. Returns the model's raw text output, trimmed.
#[async_trait]
pub trait ProviderClient: Send + Sync {
    fn provider(&self) -> Provider;
    async fn invoke(&self, call: &CallRequest<'_>) -> Result<String>;
}

// ---------------------------------------------------------------------------
// Shared HTTP handling
// ---------------------------------------------------------------------------

/// Send a prepared request and decode the JSON body, mapping non-success
/// statuses to `ProviderHttp` with the raw upstream body.
pub(crate) async fn send_json(
    provider: Provider,
    request: reqwest::RequestBuilder,
) -> Result<serde_json::Value> {
    let resp = request.send().await.map_err(|e| transport_error(provider, e))?;

    let status = resp.status();
    let body = resp.text().await.map_err(|e| transport_error(provider, e))?;

    if !status.is_success() {
        return Err(SoapError::ProviderHttp {
            provider,
            status: status.as_u16(),
            body,
        });
    }

    serde_json::from_str(&body).map_err(|e| SoapError::Parse {
        message: format!("Failed to parse {provider} response JSON: {e}"),
    })
}

fn transport_error(provider: Provider, err: reqwest::Error) -> SoapError {
    SoapError::Transport {
        provider,
        message: err.to_string(),
    }
}
