//! Data layer: plain types shared across services and workflows.

pub mod document;
pub mod question;
pub mod recommendation;
pub mod session;

pub use document::Document;
pub use question::{Difficulty, GradedResult, McqOption, McqQuestion, OpenQuestion, QuestionType, QuizQuestion};
pub use recommendation::{GroundingSource, YouTubeRecommendation};
pub use session::{ChatMessage, ChatRole, QuizAttempt};
