//! Local inference server transport (Ollama native API).

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::error::GenerationCause;

use super::http::shared_client;
use super::{Transport, TransportRequest};

pub const DEFAULT_BASE_URL: &str = "http://localhost:11434";

/// Transport for a local Ollama server. No credential is required; sampling
/// parameters travel in the `options` object and the reply comes back as a
/// flat message object rather than a choice list.
pub struct OllamaTransport {
    base_url: String,
}

impl OllamaTransport {
    pub fn new(base_url: String) -> Self {
        Self { base_url }
    }

    fn build_body(&self, request: &TransportRequest) -> serde_json::Value {
        serde_json::json!({
            "model": request.model_name,
            "messages": request.messages,
            "stream": false,
            "options": {
                "temperature": request.temperature,
                "num_predict": request.max_tokens,
            },
        })
    }
}

#[async_trait]
impl Transport for OllamaTransport {
    async fn chat(
        &self,
        request: &TransportRequest,
    ) -> std::result::Result<String, GenerationCause> {
        let url = format!("{}/api/chat", self.base_url.trim_end_matches('/'));
        debug!(model = %request.model_name, %url, "ollama request");

        let resp = shared_client()
            .post(&url)
            .json(&self.build_body(request))
            .send()
            .await?;

        let status = resp.status().as_u16();
        if !(200..300).contains(&status) {
            let message = resp.text().await.unwrap_or_default();
            return Err(GenerationCause::Api { status, message });
        }

        let data: OllamaChatResponse = resp
            .json()
            .await
            .map_err(|e| GenerationCause::MalformedResponse(e.to_string()))?;

        // The message may carry only a `thinking` field; missing content is
        // an empty reply, not an error.
        Ok(data
            .message
            .and_then(|m| m.content)
            .unwrap_or_default())
    }
}

// Wire types (internal).

#[derive(Deserialize)]
struct OllamaChatResponse {
    #[serde(default)]
    message: Option<OllamaMessage>,
}

#[derive(Deserialize)]
struct OllamaMessage {
    #[serde(default)]
    content: Option<String>,
}
