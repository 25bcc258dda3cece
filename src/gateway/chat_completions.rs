//! Remote chat-completions-compatible transport (OpenAI, DeepSeek, ...).

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::error::GenerationCause;

use super::http::{bearer_headers, shared_client};
use super::{Transport, TransportRequest};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Transport for any API speaking the chat-completions wire format with
/// Bearer authentication.
pub struct ChatCompletionsTransport {
    api_key: String,
    base_url: String,
}

impl ChatCompletionsTransport {
    pub fn new(api_key: String, base_url: String) -> Self {
        Self { api_key, base_url }
    }

    fn build_body(&self, request: &TransportRequest) -> serde_json::Value {
        serde_json::json!({
            "model": request.model_name,
            "messages": request.messages,
            "temperature": request.temperature,
            "max_tokens": request.max_tokens,
            "stream": false,
        })
    }
}

#[async_trait]
impl Transport for ChatCompletionsTransport {
    async fn chat(
        &self,
        request: &TransportRequest,
    ) -> std::result::Result<String, GenerationCause> {
        let url = format!(
            "{}/chat/completions",
            self.base_url.trim_end_matches('/')
        );
        debug!(model = %request.model_name, %url, "chat-completions request");

        let resp = shared_client()
            .post(&url)
            .headers(bearer_headers(&self.api_key))
            .json(&self.build_body(request))
            .send()
            .await?;

        let status = resp.status().as_u16();
        if !(200..300).contains(&status) {
            let message = resp.text().await.unwrap_or_default();
            return Err(GenerationCause::Api { status, message });
        }

        let data: ChatResponse = resp
            .json()
            .await
            .map_err(|e| GenerationCause::MalformedResponse(e.to_string()))?;

        let choice = data.choices.into_iter().next().ok_or_else(|| {
            GenerationCause::MalformedResponse("no choices in response".to_string())
        })?;

        Ok(choice.message.content.unwrap_or_default())
    }
}

// Wire types (internal).

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatMessage {
    content: Option<String>,
}
