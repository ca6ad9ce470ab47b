//! Capability layer: one capability per module, no flow knowledge.

pub mod chat_service;
pub mod grader;
pub mod link_verifier;
pub mod llm_service;
pub mod quiz_generator;
pub mod recommender;
pub mod response;

pub use link_verifier::{ExistenceProbe, ThumbnailProbe, VerificationOutcome};
pub use llm_service::{LlmRequest, LlmResponse, LlmService, StructuredGenerate};
