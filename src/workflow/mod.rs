//! Flow layer: orchestrates capabilities into the user-facing flows.

pub mod chat_flow;
pub mod quiz_flow;

pub use chat_flow::{ChatSession, SendOutcome};
pub use quiz_flow::QuizFlow;
