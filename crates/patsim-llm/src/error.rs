use thiserror::Error;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("model invocation failed: {0}")]
    Invocation(String),

    #[error("model backend returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("response parsing failed: {0}")]
    ResponseParse(String),

    #[error("model returned an empty completion")]
    EmptyCompletion,

    #[error("model did not respond within {0} seconds")]
    Timeout(u64),
}

impl From<reqwest::Error> for GatewayError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            GatewayError::ResponseParse(e.to_string())
        } else {
            GatewayError::Invocation(e.to_string())
        }
    }
}
