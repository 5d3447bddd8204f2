use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use patsim_core::models::evaluation::{EvaluationReport, ScoreBand};
use patsim_core::models::message::Message;
use patsim_core::models::mode::Mode;
use patsim_export::render::render_markdown;
use patsim_session::conversation::Evaluation;
use patsim_session::registry::SessionRegistry;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Serialize)]
pub struct SessionStarted {
    pub session_id: Uuid,
    pub case_id: u32,
    pub started_at: jiff::Timestamp,
}

/// Everything the front end needs to re-render a session. The case's
/// condition is not included. A session with a request in flight answers
/// 409 rather than waiting for the model.
#[derive(Serialize)]
pub struct SessionView {
    pub session_id: Uuid,
    pub case_id: u32,
    pub mode: Mode,
    pub started_at: jiff::Timestamp,
    pub messages: Vec<Message>,
    pub evaluation: Option<EvaluationView>,
    pub error: Option<String>,
}

#[derive(Serialize)]
pub struct EvaluationView {
    pub message: String,
    pub report: EvaluationReport,
    pub score_band: Option<ScoreBand>,
    pub transcript_len: usize,
    pub evaluated_at: jiff::Timestamp,
}

impl From<&Evaluation> for EvaluationView {
    fn from(evaluation: &Evaluation) -> Self {
        Self {
            message: evaluation.raw.clone(),
            report: evaluation.report.clone(),
            score_band: evaluation.report.score_band(),
            transcript_len: evaluation.transcript_len,
            evaluated_at: evaluation.evaluated_at,
        }
    }
}

#[derive(Deserialize)]
pub struct SendMessage {
    pub content: String,
}

#[derive(Serialize)]
pub struct MessageReply {
    pub message: String,
}

pub async fn start_session(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<SessionStarted>), ApiError> {
    let session = state.simulator.start_session()?;
    let started = SessionStarted {
        session_id: session.id(),
        case_id: session.case().id,
        started_at: session.started_at(),
    };
    state.sessions.insert(session).await;
    Ok((StatusCode::CREATED, Json(started)))
}

pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, ApiError> {
    let handle = state.sessions.get(id).await?;
    let session = SessionRegistry::lock_exclusive(&handle)?;
    let conversation = session.conversation();

    Ok(Json(SessionView {
        session_id: session.id(),
        case_id: session.case().id,
        mode: session.mode(),
        started_at: session.started_at(),
        messages: conversation.transcript().to_vec(),
        evaluation: conversation.last_evaluation().map(EvaluationView::from),
        error: conversation.error().map(str::to_string),
    }))
}

pub async fn end_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.sessions.remove(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn send_message(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    payload: Result<Json<SendMessage>, JsonRejection>,
) -> Result<Json<MessageReply>, ApiError> {
    let Json(req) = payload?;
    let handle = state.sessions.get(id).await?;
    let mut session = SessionRegistry::lock_exclusive(&handle)?;

    let message = state.simulator.chat(&mut session, &req.content).await?;
    Ok(Json(MessageReply { message }))
}

pub async fn evaluate(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<EvaluationView>, ApiError> {
    let handle = state.sessions.get(id).await?;
    let mut session = SessionRegistry::lock_exclusive(&handle)?;

    let evaluation = state.simulator.evaluate(&mut session).await?;
    Ok(Json(EvaluationView::from(evaluation)))
}

/// The last evaluation as Markdown.
pub async fn export_report(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let handle = state.sessions.get(id).await?;
    let session = SessionRegistry::lock_exclusive(&handle)?;
    let evaluation = session
        .conversation()
        .last_evaluation()
        .ok_or_else(|| ApiError::NotFound(format!("session {id} has not been evaluated")))?;

    let markdown = render_markdown(&evaluation.report)?;
    Ok((
        [(header::CONTENT_TYPE, "text/markdown; charset=utf-8")],
        markdown,
    ))
}
