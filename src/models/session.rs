//! Persisted session records: chat transcripts and quiz attempts.

use serde::{Deserialize, Serialize};

use crate::models::question::{GradedResult, QuizQuestion};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Model,
}

/// One message in a per-document chat transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub text: String,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self { role: ChatRole::User, text: text.into() }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self { role: ChatRole::Model, text: text.into() }
    }
}

/// One completed grading pass. Append-only history: created once, never
/// mutated, deleted only by the explicit clear-all operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizAttempt {
    /// Unique id derived from the creation timestamp
    pub id: String,
    /// Identity of the document the quiz was generated from
    pub document_name: String,
    pub questions: Vec<QuizQuestion>,
    /// Index-aligned with `questions`; an empty string means "not answered"
    pub user_answers: Vec<String>,
    /// Sum of the per-question scores
    pub score: f64,
    /// Question count
    pub total: usize,
    /// Unix timestamp in milliseconds
    pub date: i64,
    pub graded_results: Vec<GradedResult>,
}
