//! patsim-llm
//!
//! Model gateway implementations and structured parsing of examiner output.

pub mod bedrock;
pub mod error;
pub mod evaluation;
pub mod gateway;
pub mod ollama;
