//! Quiz flow.
//!
//! Flow order: window the active document → generate typed questions →
//! grade the answer sheet → append the attempt to history.

use tracing::info;

use crate::config::Config;
use crate::error::Result;
use crate::models::question::{Difficulty, QuestionType, QuizQuestion};
use crate::models::session::QuizAttempt;
use crate::page_window;
use crate::registry::DocumentRegistry;
use crate::services::grader;
use crate::services::llm_service::StructuredGenerate;
use crate::services::quiz_generator;
use crate::storage::{KeyValueStore, SessionStore};

/// Orchestrates quiz generation and grading against the active document.
pub struct QuizFlow {
    min_context_chars: usize,
}

impl QuizFlow {
    pub fn new(config: &Config) -> Self {
        Self { min_context_chars: config.min_context_chars }
    }

    /// Generate questions from the inclusive page range `[start, end]` of
    /// the active document. Range and content errors are local: the caller
    /// fixes the input and retries, nothing is retried automatically.
    pub async fn generate<G: StructuredGenerate>(
        &self,
        llm: &G,
        registry: &DocumentRegistry,
        start: usize,
        end: usize,
        question_type: QuestionType,
        count: usize,
        difficulty: Difficulty,
    ) -> Result<Vec<QuizQuestion>> {
        let context = page_window::context_window(
            registry.text(),
            registry.page_count(),
            start,
            end,
            self.min_context_chars,
        )?;
        quiz_generator::generate_quiz(llm, context, question_type, count, difficulty).await
    }

    /// Grade an index-aligned answer sheet and append the attempt to the
    /// global history.
    pub async fn grade_and_record<G, S>(
        &self,
        llm: &G,
        sessions: &SessionStore<S>,
        document: &str,
        questions: Vec<QuizQuestion>,
        user_answers: Vec<String>,
    ) -> Result<QuizAttempt>
    where
        G: StructuredGenerate,
        S: KeyValueStore,
    {
        let graded = grader::grade_answers(llm, &questions, &user_answers).await?;
        let attempt = grader::build_attempt(document, questions, user_answers, graded);
        sessions.record_attempt(attempt.clone());
        info!(
            "✓ grading complete for \"{}\": {}/{}",
            document, attempt.score, attempt.total
        );
        Ok(attempt)
    }
}
