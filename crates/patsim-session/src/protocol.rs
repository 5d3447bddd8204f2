//! The session protocol service.
//!
//! `Simulator` ties the case catalog to a model gateway. Chat turns forward
//! `[patient prompt, ...transcript]`; evaluations send the examiner prompt
//! alone and parse the reply into an [`EvaluationReport`].

use std::sync::Arc;
use std::time::Duration;

use patsim_cases::CaseCatalog;
use patsim_core::models::evaluation::EvaluationReport;
use patsim_core::models::message::Message;
use patsim_core::models::mode::Mode;
use patsim_llm::error::GatewayError;
use patsim_llm::evaluation;
use patsim_llm::gateway::ModelGateway;
use rand::Rng;
use tracing::{info, warn};

use crate::conversation::Evaluation;
use crate::error::SessionError;
use crate::prompts::{build_chat_turn, build_evaluation_turn};
use crate::session::Session;

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// The reply to a stateless `{messages, mode}` request.
#[derive(Debug, Clone)]
pub struct Reply {
    pub mode: Mode,
    pub message: String,
    /// Set in evaluate mode only.
    pub report: Option<EvaluationReport>,
}

/// Interpret a wire mode value. Anything other than `chat` or `evaluate`
/// is rejected before any other work happens.
pub fn parse_mode(mode: &str) -> Result<Mode, SessionError> {
    mode.parse()
        .map_err(|_| SessionError::InvalidMode(mode.to_string()))
}

pub struct Simulator {
    catalog: Arc<CaseCatalog>,
    gateway: Arc<dyn ModelGateway>,
    model: String,
    request_timeout: Duration,
}

impl Simulator {
    pub fn new(
        catalog: Arc<CaseCatalog>,
        gateway: Arc<dyn ModelGateway>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            catalog,
            gateway,
            model: model.into(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn catalog(&self) -> &CaseCatalog {
        &self.catalog
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Draw a case and bind it to a new session.
    pub fn start_session(&self) -> Result<Session, SessionError> {
        self.start_session_with(&mut rand::thread_rng())
    }

    pub fn start_session_with<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Session, SessionError> {
        let case = self.catalog.pick_case(rng)?;
        let session = Session::new(case);
        info!(
            session_id = %session.id(),
            case_id = session.case().id,
            "session started"
        );
        Ok(session)
    }

    /// One student turn: append the message, ask the patient, append the
    /// reply. Returns the reply text.
    pub async fn chat(&self, session: &mut Session, content: &str) -> Result<String, SessionError> {
        let result = self.chat_turn(session, content).await;
        record_outcome(session, &result);
        result
    }

    async fn chat_turn(&self, session: &mut Session, content: &str) -> Result<String, SessionError> {
        if !session.conversation.push_user(content) {
            return Err(SessionError::EmptyMessage);
        }
        session.mode = Mode::Chat;

        let revision = session.conversation.revision();
        let turn = build_chat_turn(Some(session.case()), session.conversation.transcript())?;
        let reply = self.complete(&turn.messages).await?;

        session.conversation.append_reply(revision, reply.content.clone())?;

        info!(
            session_id = %session.id(),
            turns = session.conversation.transcript().len(),
            reply_len = reply.content.len(),
            "chat turn complete"
        );
        Ok(reply.content)
    }

    /// Evaluate the whole transcript so far, replacing any earlier
    /// evaluation. The session may keep chatting afterwards.
    pub async fn evaluate<'s>(&self, session: &'s mut Session) -> Result<&'s Evaluation, SessionError> {
        let result = self.evaluation_turn(session).await;
        record_outcome(session, &result);
        result?;
        session
            .conversation
            .last_evaluation()
            .ok_or(SessionError::NotInitialized)
    }

    async fn evaluation_turn(&self, session: &mut Session) -> Result<(), SessionError> {
        session.mode = Mode::Evaluate;

        let transcript_len = session.conversation.transcript().len();
        let prompt = build_evaluation_turn(Some(session.case()), session.conversation.transcript())?;
        let reply = self.complete(std::slice::from_ref(&prompt)).await?;
        let report = evaluation::parse(&reply.content);

        info!(
            session_id = %session.id(),
            transcript_len,
            score = ?report.score,
            "evaluation complete"
        );

        session.conversation.replace_evaluation(Evaluation {
            raw: reply.content,
            report,
            transcript_len,
            evaluated_at: jiff::Timestamp::now(),
        });
        Ok(())
    }

    /// The stateless boundary: the caller supplies the transcript, the
    /// session supplies the bound case. The mode is checked first, so an
    /// invalid mode never reaches the gateway.
    pub async fn dispatch(
        &self,
        session: Option<&Session>,
        mode: &str,
        transcript: &[Message],
    ) -> Result<Reply, SessionError> {
        let mode = parse_mode(mode)?;
        let session = session.ok_or(SessionError::NotInitialized)?;
        self.respond(session, mode, transcript).await
    }

    pub async fn respond(
        &self,
        session: &Session,
        mode: Mode,
        transcript: &[Message],
    ) -> Result<Reply, SessionError> {
        match mode {
            Mode::Chat => {
                let turn = build_chat_turn(Some(session.case()), transcript)?;
                let reply = self.complete(&turn.messages).await?;
                Ok(Reply {
                    mode,
                    message: reply.content,
                    report: None,
                })
            }
            Mode::Evaluate => {
                let prompt = build_evaluation_turn(Some(session.case()), transcript)?;
                let reply = self.complete(std::slice::from_ref(&prompt)).await?;
                let report = evaluation::parse(&reply.content);
                Ok(Reply {
                    mode,
                    message: reply.content,
                    report: Some(report),
                })
            }
        }
    }

    async fn complete(&self, messages: &[Message]) -> Result<Message, SessionError> {
        let call = self.gateway.complete(&self.model, messages);
        match tokio::time::timeout(self.request_timeout, call).await {
            Ok(result) => Ok(result?),
            Err(_) => {
                warn!(
                    backend = self.gateway.backend(),
                    model = %self.model,
                    timeout_secs = self.request_timeout.as_secs(),
                    "model request timed out"
                );
                Err(GatewayError::Timeout(self.request_timeout.as_secs()).into())
            }
        }
    }
}

fn record_outcome<T>(session: &mut Session, result: &Result<T, SessionError>) {
    session.touch();
    match result {
        Ok(_) => session.conversation.clear_error(),
        Err(e) => {
            warn!(session_id = %session.id(), error = %e, "session request failed");
            session.conversation.set_error(e.to_string());
        }
    }
}
