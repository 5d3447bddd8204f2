//! Ollama `/api/chat` gateway.

use async_trait::async_trait;
use patsim_core::models::message::Message;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::GatewayError;
use crate::gateway::ModelGateway;

pub const DEFAULT_HOST: &str = "http://127.0.0.1:11434";

#[derive(Debug, Clone)]
pub struct OllamaGateway {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    stream: bool,
}

#[derive(Deserialize)]
struct ChatResponse {
    message: Option<ResponseMessage>,
}

#[derive(Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: String,
}

impl OllamaGateway {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl Default for OllamaGateway {
    fn default() -> Self {
        Self::new(DEFAULT_HOST)
    }
}

#[async_trait]
impl ModelGateway for OllamaGateway {
    fn backend(&self) -> &str {
        "ollama"
    }

    async fn complete(&self, model: &str, messages: &[Message]) -> Result<Message, GatewayError> {
        let url = format!("{}/api/chat", self.base_url);
        debug!(%url, model, message_count = messages.len(), "sending chat request");

        let response = self
            .client
            .post(&url)
            .json(&ChatRequest {
                model,
                messages,
                stream: false,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        let parsed: ChatResponse = serde_json::from_str(&body)
            .map_err(|e| GatewayError::ResponseParse(format!("{e}. Response: {body}")))?;

        let content = parsed
            .message
            .map(|m| m.content)
            .ok_or_else(|| GatewayError::ResponseParse("no message in response".to_string()))?;

        if content.trim().is_empty() {
            return Err(GatewayError::EmptyCompletion);
        }

        info!(model, reply_len = content.len(), "ollama completion received");

        Ok(Message::assistant(content))
    }
}
