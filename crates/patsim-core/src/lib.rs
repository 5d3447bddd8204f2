//! patsim-core
//!
//! Pure domain types for the patient simulator: clinical cases, transcript
//! messages, session modes and evaluation reports.
//! No I/O — this is the shared vocabulary of every other crate.

pub mod error;
pub mod models;
