//! Grading contract.
//!
//! Scores an index-aligned answer sheet against its questions in one batched
//! structured call. The canonical correct answer is computed locally before
//! the call, so the model only compares answers — it never re-derives truth.
//!
//! Validation is partial-trust: a response of the wrong length voids the
//! batch (`GradingMalformed`), but a bad field inside one item is coerced —
//! a non-numeric or missing score becomes 0, missing feedback becomes a
//! placeholder — rather than rejecting an otherwise-usable grading pass.

use serde_json::{json, Value as JsonValue};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::models::question::{GradedResult, QuizQuestion};
use crate::models::session::QuizAttempt;
use crate::services::llm_service::{LlmRequest, StructuredGenerate};
use crate::services::response;

const MISSING_FEEDBACK: &str = "No feedback provided.";
const NOT_ANSWERED: &str = "Not answered";

fn grading_schema() -> JsonValue {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "score": { "type": "NUMBER", "description": "Score from 0, 0.5, or 1 based on the rubric." },
                "feedback": { "type": "STRING", "description": "Constructive feedback for the user." }
            },
            "required": ["score", "feedback"]
        }
    })
}

fn build_prompt(questions: &[QuizQuestion], user_answers: &[String]) -> String {
    let tasks: Vec<JsonValue> = questions
        .iter()
        .enumerate()
        .map(|(i, question)| {
            let user_answer = user_answers
                .get(i)
                .map(|a| a.as_str())
                .filter(|a| !a.trim().is_empty())
                .unwrap_or(NOT_ANSWERED);
            json!({
                "questionType": question.question_type().label(),
                "question": question.question_text(),
                "correctAnswer": question.canonical_answer(),
                "userAnswer": user_answer,
            })
        })
        .collect();

    format!(
        "You are a strict but fair teaching assistant. Your task is to grade a student's answers \
         for a quiz. For each question, compare the user's answer with the provided correct answer.\n\n\
         Provide a score for each question based on the following rubric:\n\
         - 1: The user's answer is fully correct and captures all key points of the correct answer. \
         For MCQs, this means the correct option was chosen.\n\
         - 0.5: The user's answer is partially correct but misses some key points or contains minor \
         inaccuracies. This only applies to Short and Long Answer questions.\n\
         - 0: The user's answer is incorrect or completely misses the point.\n\n\
         Also, provide brief, constructive feedback for each answer, explaining why it received \
         the score it did.\n\n\
         Here are the questions and answers to grade:\n{}",
        serde_json::to_string_pretty(&tasks).unwrap_or_default()
    )
}

/// Grade every answer in one batched call.
///
/// `user_answers[i]` grades `questions[i]`; an empty answer means "not
/// answered". The returned sequence is index-aligned with the questions.
pub async fn grade_answers<G: StructuredGenerate>(
    llm: &G,
    questions: &[QuizQuestion],
    user_answers: &[String],
) -> Result<Vec<GradedResult>> {
    debug!("grading {} answers", questions.len());

    let schema = grading_schema();
    let prompt = build_prompt(questions, user_answers);

    let llm_response = llm
        .structured_generate(LlmRequest { prompt: &prompt, system: None, schema: Some(&schema) })
        .await
        .map_err(|e| Error::GradingMalformed { detail: e.to_string() })?;

    let items = response::parse_array(&llm_response.text)
        .map_err(|detail| Error::GradingMalformed { detail })?;

    if items.len() != questions.len() {
        warn!("grading response has {} items for {} questions", items.len(), questions.len());
        return Err(Error::GradingMalformed {
            detail: format!("expected {} results, got {}", questions.len(), items.len()),
        });
    }

    Ok(items.into_iter().map(coerce_result).collect())
}

/// Per-item coercion: a bad field does not void the batch.
fn coerce_result(item: JsonValue) -> GradedResult {
    let score = match item.get("score") {
        Some(JsonValue::Number(n)) => n.as_f64().unwrap_or(0.0),
        // the model may return the score as a string ("0.5")
        Some(JsonValue::String(s)) => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    };
    let feedback = item
        .get("feedback")
        .and_then(|f| f.as_str())
        .map(str::to_string)
        .unwrap_or_else(|| MISSING_FEEDBACK.to_string());

    GradedResult { score, feedback }
}

/// Aggregate score: sum of the per-question scores.
pub fn total_score(results: &[GradedResult]) -> f64 {
    results.iter().map(|r| r.score).sum()
}

/// Assemble the append-only attempt record for a completed grading pass.
pub fn build_attempt(
    document_name: &str,
    questions: Vec<QuizQuestion>,
    user_answers: Vec<String>,
    graded_results: Vec<GradedResult>,
) -> QuizAttempt {
    let now = chrono::Utc::now();
    QuizAttempt {
        id: now.to_rfc3339(),
        document_name: document_name.to_string(),
        score: total_score(&graded_results),
        total: questions.len(),
        date: now.timestamp_millis(),
        questions,
        user_answers,
        graded_results,
    }
}
