//! patsim-session
//!
//! The session protocol: binds one case per session, builds the patient and
//! examiner prompts, keeps the conversation state and drives the model
//! gateway for both modes.

pub mod conversation;
pub mod error;
pub mod prompts;
pub mod protocol;
pub mod registry;
pub mod session;
