//! # Study Session
//!
//! Core engine for an AI-assisted study session over paged documents.
//!
//! ## Architecture
//!
//! The crate is layered; each layer only calls downward:
//!
//! ### ① Data layer
//! - `models/` - documents, questions, recommendations, session records
//! - `registry` - owns the document set and the active-document pointer
//! - `page_window` - `[Page N]` tagging and inclusive page-range slicing
//!
//! ### ② Capability layer (Services)
//! - `services/llm_service` - schema-constrained text generation
//! - `services/quiz_generator` - typed quiz generation from a context window
//! - `services/grader` - answer-sheet grading with defensive coercion
//! - `services/recommender` + `services/link_verifier` - YouTube
//!   recommendations and concurrent thumbnail-probe verification
//! - `services/chat_service` - grounded Q&A over the context window
//!
//! ### ③ Flow layer (Workflow)
//! - `workflow/quiz_flow` - window → generate → grade → record
//! - `workflow/chat_flow` - per-document transcript with persistence
//!
//! ### ④ Persistence
//! - `storage` - keyed best-effort stores for transcripts and attempts

pub mod config;
pub mod error;
pub mod models;
pub mod page_window;
pub mod registry;
pub mod services;
pub mod storage;
pub mod utils;
pub mod workflow;

// Re-export common types
pub use config::Config;
pub use error::{Error, Result};
pub use models::question::{Difficulty, QuestionType, QuizQuestion};
pub use models::recommendation::YouTubeRecommendation;
pub use models::session::{ChatMessage, QuizAttempt};
pub use registry::{DocumentRegistry, ExtractedText, TextExtractor};
pub use services::link_verifier::VerificationOutcome;
pub use services::llm_service::{LlmService, StructuredGenerate};
pub use storage::{DirStore, KeyValueStore, MemoryStore, SessionStore};
pub use workflow::{ChatSession, QuizFlow, SendOutcome};
