use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use patsim_llm::error::GatewayError;
use patsim_session::error::SessionError;
use serde::Serialize;

/// Unified API error type for all route handlers.
#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    BadRequest(String),
    Conflict(String),
    BadGateway(String),
    GatewayTimeout(String),
    Configuration(String),
    Internal(String),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::BadGateway(msg) => (StatusCode::BAD_GATEWAY, msg),
            ApiError::GatewayTimeout(msg) => (StatusCode::GATEWAY_TIMEOUT, msg),
            ApiError::Configuration(msg) => {
                tracing::error!("configuration error: {msg}");
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
            ApiError::Internal(msg) => {
                tracing::error!("internal error: {msg}");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal server error".to_string())
            }
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}

impl From<SessionError> for ApiError {
    fn from(e: SessionError) -> Self {
        let message = e.to_string();
        match e {
            SessionError::InvalidMode(_) | SessionError::EmptyMessage => {
                ApiError::BadRequest(message)
            }
            SessionError::NotInitialized | SessionError::UnknownSession(_) => {
                ApiError::NotFound(message)
            }
            SessionError::Busy | SessionError::ConcurrentModification { .. } => {
                ApiError::Conflict(message)
            }
            SessionError::Gateway(GatewayError::Timeout(_)) => ApiError::GatewayTimeout(message),
            SessionError::Gateway(_) => ApiError::BadGateway(message),
            SessionError::Configuration(_) => ApiError::Configuration(message),
            SessionError::Serialization(_) => ApiError::Internal(message),
        }
    }
}

impl From<patsim_export::error::ExportError> for ApiError {
    fn from(e: patsim_export::error::ExportError) -> Self {
        ApiError::Internal(e.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}
