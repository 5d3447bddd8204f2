use async_trait::async_trait;
use patsim_core::models::message::Message;

use crate::error::GatewayError;

/// A request/response text-completion backend.
///
/// Receives an ordered list of role-tagged messages and returns exactly one
/// assistant message. No streaming, no retries: failures surface to the
/// caller as [`GatewayError`].
#[async_trait]
pub trait ModelGateway: Send + Sync {
    /// Short backend name for logs, e.g. `"ollama"`.
    fn backend(&self) -> &str;

    async fn complete(&self, model: &str, messages: &[Message]) -> Result<Message, GatewayError>;
}
