//! AWS Bedrock gateway over the Converse API.
//!
//! Converse keeps system instructions out of the message list, so
//! system-role messages are lifted into `SystemContentBlock`s. Converse
//! also rejects a request with no conversational turns; the evaluation
//! turn consists of a single system message, so in that case the prompt is
//! sent as the lone user turn instead.
//!
//! Required IAM permission: `bedrock:InvokeModel`.

use async_trait::async_trait;
use aws_sdk_bedrockruntime::Client;
use aws_sdk_bedrockruntime::types::{
    ContentBlock, ConversationRole, Message as ConverseMessage, SystemContentBlock,
};
use patsim_core::models::message::{Message, Role};
use tracing::info;

use crate::error::GatewayError;
use crate::gateway::ModelGateway;

#[derive(Debug, Clone)]
pub struct BedrockGateway {
    client: Client,
}

impl BedrockGateway {
    pub fn new(config: &aws_config::SdkConfig) -> Self {
        Self {
            client: Client::new(config),
        }
    }

    /// Load AWS credentials from the default chain for `region`.
    pub async fn from_region(region: &str) -> Self {
        let config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_config::Region::new(region.to_string()))
            .load()
            .await;
        Self::new(&config)
    }
}

/// Split role-tagged messages into Converse system blocks and turns.
///
/// A request with only system messages comes back as one user turn holding
/// their text joined by blank lines, with no system blocks.
pub fn to_converse(
    messages: &[Message],
) -> Result<(Vec<SystemContentBlock>, Vec<ConverseMessage>), GatewayError> {
    let mut system = Vec::new();
    let mut turns = Vec::new();

    for msg in messages {
        let role = match msg.role {
            Role::System => {
                system.push(SystemContentBlock::Text(msg.content.clone()));
                continue;
            }
            Role::User => ConversationRole::User,
            Role::Assistant => ConversationRole::Assistant,
        };
        let message = ConverseMessage::builder()
            .role(role)
            .content(ContentBlock::Text(msg.content.clone()))
            .build()
            .map_err(|e| GatewayError::Invocation(e.to_string()))?;
        turns.push(message);
    }

    if turns.is_empty() && !system.is_empty() {
        let prompt = system
            .drain(..)
            .filter_map(|block| match block {
                SystemContentBlock::Text(text) => Some(text),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("\n\n");
        let message = ConverseMessage::builder()
            .role(ConversationRole::User)
            .content(ContentBlock::Text(prompt))
            .build()
            .map_err(|e| GatewayError::Invocation(e.to_string()))?;
        turns.push(message);
    }

    Ok((system, turns))
}

#[async_trait]
impl ModelGateway for BedrockGateway {
    fn backend(&self) -> &str {
        "bedrock"
    }

    async fn complete(&self, model: &str, messages: &[Message]) -> Result<Message, GatewayError> {
        let (system, turns) = to_converse(messages)?;

        let response = self
            .client
            .converse()
            .model_id(model)
            .set_system(if system.is_empty() { None } else { Some(system) })
            .set_messages(Some(turns))
            .send()
            .await
            .map_err(|e| GatewayError::Invocation(e.into_service_error().to_string()))?;

        let output_message = response
            .output()
            .and_then(|o| o.as_message().ok())
            .ok_or_else(|| GatewayError::ResponseParse("no message in response".to_string()))?;

        let response_text = output_message
            .content()
            .iter()
            .filter_map(|block| {
                if let ContentBlock::Text(text) = block {
                    Some(text.as_str())
                } else {
                    None
                }
            })
            .collect::<Vec<_>>()
            .join("");

        if response_text.trim().is_empty() {
            return Err(GatewayError::EmptyCompletion);
        }

        info!(model, reply_len = response_text.len(), "bedrock completion received");

        Ok(Message::assistant(response_text))
    }
}
