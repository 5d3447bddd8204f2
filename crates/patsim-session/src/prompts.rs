//! Prompt construction for the two session modes.
//!
//! The patient prompt is rebuilt from the bound case on every turn and is
//! never stored in the transcript. The examiner prompt embeds the case and
//! the transcript as data inside a single system message.

use patsim_core::models::case::Case;
use patsim_core::models::message::{Message, Role};

use crate::error::SessionError;

/// The gateway request for one chat turn.
#[derive(Debug, Clone)]
pub struct ChatTurn {
    pub system_prompt: Message,
    /// `[system_prompt, ...transcript]`
    pub messages: Vec<Message>,
}

/// Conversational turns only. A client-supplied transcript may carry
/// system messages; they are never forwarded.
fn conversational(transcript: &[Message]) -> impl Iterator<Item = &Message> {
    transcript.iter().filter(|m| m.role != Role::System)
}

pub fn patient_system_prompt(case: &Case) -> Result<String, SessionError> {
    let presenting = serde_json::to_string(&case.presenting())?;
    Ok(format!(
        "You are a virtual patient in a clinical history-taking exercise with a medical student.\n\
         Case: {presenting}\n\
         Only answer as the patient would, in plain everyday language.\n\
         Do not reveal the condition name directly. Never name, confirm or guess a diagnosis, even if asked.\n\
         Keep answers consistent with the case: its symptoms, history and extra details. \
         If asked about something the case does not cover, answer plausibly without contradicting it."
    ))
}

pub fn examiner_system_prompt(case: &Case, transcript: &[Message]) -> Result<String, SessionError> {
    let case_json = serde_json::to_string(case)?;
    let chat: Vec<&Message> = conversational(transcript).collect();
    let chat_json = serde_json::to_string(&chat)?;

    Ok(format!(
        "You are a strict medical examiner evaluating a medical student's consultation with a patient.\n\
         Do not sugarcoat your feedback. Point out every important element that was missing.\n\
         \n\
         Patient case: {case_json}\n\
         Student chat: {chat_json}\n\
         \n\
         Evaluation guidelines:\n\
         - The first line must be exactly \"Score: X/10\", where X is a whole number from 0 to 10. \
         Give a realistic score and deduct marks for each missing vital step.\n\
         - Strong points: list clearly what the student did well.\n\
         - Missing or incorrect: list all important missed questions \
         (e.g. past medical history, family history, medications, red flags). \
         If the student asked no questions, say so here.\n\
         - Feedback: short, direct, constructive, as a doctor would to a student. No excessive praise.\n\
         - Use the headers \"Strong points:\", \"Missing or incorrect:\" and \"Feedback:\", \
         each followed by bullet points, not paragraphs.\n\
         - The last line must be \"Condition: <actual condition name>\"."
    ))
}

/// Build the patient-mode request for the bound case.
///
/// The caller sends `messages` to the gateway and appends the reply to the
/// transcript itself.
pub fn build_chat_turn(case: Option<&Case>, transcript: &[Message]) -> Result<ChatTurn, SessionError> {
    let case = case.ok_or(SessionError::NotInitialized)?;
    let system_prompt = Message::system(patient_system_prompt(case)?);

    let mut messages = Vec::with_capacity(transcript.len() + 1);
    messages.push(system_prompt.clone());
    messages.extend(conversational(transcript).cloned());

    Ok(ChatTurn {
        system_prompt,
        messages,
    })
}

/// Build the single examiner message for the bound case.
///
/// An empty transcript is valid; the examiner is asked to report that no
/// questions were asked.
pub fn build_evaluation_turn(case: Option<&Case>, transcript: &[Message]) -> Result<Message, SessionError> {
    let case = case.ok_or(SessionError::NotInitialized)?;
    Ok(Message::system(examiner_system_prompt(case, transcript)?))
}
