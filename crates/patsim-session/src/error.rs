use patsim_cases::error::CatalogError;
use patsim_llm::error::GatewayError;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("configuration error: {0}")]
    Configuration(#[from] CatalogError),

    #[error("invalid mode {0:?}: expected \"chat\" or \"evaluate\"")]
    InvalidMode(String),

    #[error("session not initialized: no case is bound")]
    NotInitialized,

    #[error("session not found: {0}")]
    UnknownSession(Uuid),

    #[error("model gateway error: {0}")]
    Gateway(#[from] GatewayError),

    #[error("transcript changed while a request was outstanding (expected revision {expected}, found {found})")]
    ConcurrentModification { expected: u64, found: u64 },

    #[error("a request is already in progress for this session")]
    Busy,

    #[error("message is empty")]
    EmptyMessage,

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
