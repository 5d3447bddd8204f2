//! The `{messages, mode}` endpoint: the client owns the transcript, the
//! session owns the case.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use patsim_core::models::evaluation::EvaluationReport;
use patsim_core::models::message::Message;
use patsim_session::protocol::parse_mode;
use patsim_session::registry::SessionRegistry;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub messages: Vec<Message>,
    /// Kept as a string so an unknown value is an invalid-mode error
    /// rather than a body rejection.
    #[serde(default)]
    pub mode: String,
}

#[derive(Serialize)]
pub struct ChatResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<EvaluationReport>,
}

pub async fn chat(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, ApiError> {
    let Json(req) = payload?;
    let mode = parse_mode(&req.mode)?;

    let handle = state.sessions.get(id).await?;
    let session = SessionRegistry::lock_exclusive(&handle)?;

    tracing::info!(session_id = %id, %mode, messages = req.messages.len(), "chat request");

    let reply = state
        .simulator
        .respond(&session, mode, &req.messages)
        .await?;

    Ok(Json(ChatResponse {
        message: reply.message,
        report: reply.report,
    }))
}
