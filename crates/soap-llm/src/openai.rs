use async_trait::async_trait;
use serde_json::json;

use crate::provider::send_json;
use crate::{CallRequest, ProviderClient};
use soap_types::{Provider, Result};

pub const OPENAI_BASE_URL: &str = "https://api.openai.com";
pub const MISTRAL_BASE_URL: &str = "https://api.mistral.ai";
const CHAT_COMPLETIONS_PATH: &str = "/v1/chat/completions";

// ---------------------------------------------------------------------------
// OpenAiCompatClient
// ---------------------------------------------------------------------------

/// Chat-completions backend with Bearer auth. OpenAI and Mistral share this
/// wire shape and differ only in base URL.
#[derive(Debug, Clone)]
pub struct OpenAiCompatClient {
    provider: Provider,
    client: reqwest::Client,
    base_url: String,
}

impl OpenAiCompatClient {
    pub fn openai(client: reqwest::Client) -> Self {
        Self {
            provider: Provider::OpenAi,
            client,
            base_url: OPENAI_BASE_URL.to_string(),
        }
    }

    pub fn mistral(client: reqwest::Client) -> Self {
        Self {
            provider: Provider::Mistral,
            client,
            base_url: MISTRAL_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    fn endpoint(&self) -> String {
        format!("{}{}", self.base_url, CHAT_COMPLETIONS_PATH)
    }

    fn build_request_body(model_id: &str, prompt: &str) -> serde_json::Value {
        json!({
            "model": model_id,
            "messages": [{ "role": "user", "content": prompt }],
            "temperature": 0,
            "response_format": { "type": "json_object" }
        })
    }

    fn extract_text(json: &serde_json::Value) -> String {
        json["choices"][0]["message"]["content"]
            .as_str()
            .unwrap_or_default()
            .trim()
            .to_string()
    }
}

#[async_trait]
impl ProviderClient for OpenAiCompatClient {
    fn provider(&self) -> Provider {
        self.provider
    }

    async fn invoke(&self, call: &CallRequest<'_>) -> Result<String> {
        let request = self
            .client
            .post(self.endpoint())
            .bearer_auth(call.api_key)
            .header("content-type", "application/json")
            .json(&Self::build_request_body(call.model_id, call.prompt));

        let json = send_json(self.provider, request).await?;
        Ok(Self::extract_text(&json))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use soap_types::SoapError;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn request_body_shape() {
        let body = OpenAiCompatClient::build_request_body("gpt-5", "Summarise");
        assert_eq!(
            body,
            json!({
                "model": "gpt-5",
                "messages": [{ "role": "user", "content": "Summarise" }],
                "temperature": 0,
                "response_format": { "type": "json_object" }
            })
        );
    }

    #[test]
    fn default_endpoints() {
        let openai = OpenAiCompatClient::openai(reqwest::Client::new());
        assert_eq!(openai.endpoint(), "https://api.openai.com/v1/chat/completions");
        assert_eq!(openai.provider(), Provider::OpenAi);

        let mistral = OpenAiCompatClient::mistral(reqwest::Client::new());
        assert_eq!(mistral.endpoint(), "https://api.mistral.ai/v1/chat/completions");
        assert_eq!(mistral.provider(), Provider::Mistral);
    }

    #[test]
    fn extract_text_reads_first_choice() {
        let json = json!({ "choices": [{ "message": { "content": "  {\"s\":1}\n" } }] });
        assert_eq!(OpenAiCompatClient::extract_text(&json), "{\"s\":1}");
        assert_eq!(OpenAiCompatClient::extract_text(&json!({ "choices": [] })), "");
    }

    #[tokio::test]
    async fn invoke_sends_bearer_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("authorization", "Bearer mistral-key"))
            .and(body_json(OpenAiCompatClient::build_request_body(
                "mistral-large",
                "hi",
            )))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{ "message": { "role": "assistant", "content": "{\"plan\":\"p\"}" } }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client =
            OpenAiCompatClient::mistral(reqwest::Client::new()).with_base_url(server.uri());
        let text = client
            .invoke(&CallRequest {
                api_key: "mistral-key",
                model_id: "mistral-large",
                prompt: "hi",
            })
            .await
            .unwrap();
        assert_eq!(text, "{\"plan\":\"p\"}");
    }

    #[tokio::test]
    async fn invoke_maps_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
            .mount(&server)
            .await;

        let client = OpenAiCompatClient::openai(reqwest::Client::new()).with_base_url(server.uri());
        let err = client
            .invoke(&CallRequest {
                api_key: "k",
                model_id: "gpt-5",
                prompt: "hi",
            })
            .await
            .unwrap_err();
        assert!(err.is_retryable());
        assert!(matches!(
            err,
            SoapError::ProviderHttp {
                provider: Provider::OpenAi,
                status: 502,
                ref body,
            } if body == "bad gateway"
        ));
    }

    #[tokio::test]
    async fn non_json_success_body_is_a_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let client = OpenAiCompatClient::openai(reqwest::Client::new()).with_base_url(server.uri());
        let err = client
            .invoke(&CallRequest {
                api_key: "k",
                model_id: "gpt-5",
                prompt: "hi",
            })
            .await
            .unwrap_err();
        assert!(matches!(err, SoapError::Parse { .. }));
    }
}
