pub mod case;
pub mod evaluation;
pub mod message;
pub mod mode;
