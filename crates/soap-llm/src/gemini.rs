use async_trait::async_trait;
use serde_json::json;

use crate::provider::send_json;
use crate::{CallRequest, ProviderClient};
use soap_types::{Provider, Result};

pub const GOOGLE_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

// ---------------------------------------------------------------------------
// GeminiClient
// ---------------------------------------------------------------------------

/// Google generate-content backend. The API key travels as the `key` query
/// parameter.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: reqwest::Client,
    base_url: String,
}

impl GeminiClient {
    pub fn new(client: reqwest::Client) -> Self {
        Self {
            client,
            base_url: GOOGLE_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    fn endpoint(&self, model_id: &str) -> String {
        format!("{}/models/{}:generateContent", self.base_url, model_id)
    }

    fn build_request_body(prompt: &str) -> serde_json::Value {
        json!({
            "contents": [{ "role": "user", "parts": [{ "text": prompt }] }],
            "generationConfig": {
                "temperature": 0,
                "responseMimeType": "application/json"
            }
        })
    }

    /// Join every part of the first candidate with newlines. A response
    /// without candidates yields an empty string.
    fn extract_text(json: &serde_json::Value) -> String {
        json["candidates"][0]["content"]["parts"]
            .as_array()
            .map(|parts| {
                parts
                    .iter()
                    .map(|p| p["text"].as_str().unwrap_or_default())
                    .collect::<Vec<_>>()
                    .join("\n")
            })
            .unwrap_or_default()
            .trim()
            .to_string()
    }
}

#[async_trait]
impl ProviderClient for GeminiClient {
    fn provider(&self) -> Provider {
        Provider::Google
    }

    async fn invoke(&self, call: &CallRequest<'_>) -> Result<String> {
        let request = self
            .client
            .post(self.endpoint(call.model_id))
            .query(&[("key", call.api_key)])
            .header("content-type", "application/json")
            .json(&Self::build_request_body(call.prompt));

        let json = send_json(Provider::Google, request).await?;
        Ok(Self::extract_text(&json))
    }
}
