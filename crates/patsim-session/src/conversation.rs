use patsim_core::models::evaluation::EvaluationReport;
use patsim_core::models::message::Message;
use serde::Serialize;

use crate::error::SessionError;

/// One evaluation cycle: the examiner's raw text and what was parsed from it.
#[derive(Debug, Clone, Serialize)]
pub struct Evaluation {
    pub raw: String,
    pub report: EvaluationReport,
    /// Number of transcript messages the examiner saw.
    pub transcript_len: usize,
    pub evaluated_at: jiff::Timestamp,
}

/// The transcript plus the latest evaluation and error of a session.
///
/// The transcript is append-only. Every append bumps `revision`, which lets
/// a turn detect that the transcript moved between its request and its
/// reply.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ConversationState {
    transcript: Vec<Message>,
    revision: u64,
    last_evaluation: Option<Evaluation>,
    error: Option<String>,
}

impl ConversationState {
    pub fn transcript(&self) -> &[Message] {
        &self.transcript
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn last_evaluation(&self) -> Option<&Evaluation> {
        self.last_evaluation.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Append a student message. Blank content (after trimming) is ignored
    /// and `false` is returned.
    pub fn push_user(&mut self, content: &str) -> bool {
        if content.trim().is_empty() {
            return false;
        }
        self.push(Message::user(content));
        true
    }

    /// Append the patient's reply verbatim, provided nothing else was
    /// appended since `expected_revision` was read.
    pub fn append_reply(&mut self, expected_revision: u64, content: impl Into<String>) -> Result<(), SessionError> {
        if self.revision != expected_revision {
            return Err(SessionError::ConcurrentModification {
                expected: expected_revision,
                found: self.revision,
            });
        }
        self.push(Message::assistant(content));
        Ok(())
    }

    /// Replace, never merge, the previous evaluation.
    pub fn replace_evaluation(&mut self, evaluation: Evaluation) {
        self.last_evaluation = Some(evaluation);
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    fn push(&mut self, message: Message) {
        self.transcript.push(message);
        self.revision += 1;
    }
}
