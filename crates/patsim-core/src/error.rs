use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid mode: {0}")]
    InvalidMode(String),

    #[error("invalid role: {0}")]
    InvalidRole(String),
}
