//! Quiz generation contract.
//!
//! Turns `(context window, question type, count, difficulty)` into validated
//! [`QuizQuestion`] values. The model response is untrusted: it is sanitized,
//! parsed as a JSON array, and typed in one pass — any failure is
//! `GenerationMalformed` with no partial recovery. Repeated calls with the
//! same inputs may yield different questions; only shape-validity is
//! guaranteed.

use serde_json::{json, Value as JsonValue};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::models::question::{Difficulty, McqQuestion, OpenQuestion, QuestionType, QuizQuestion};
use crate::services::llm_service::{LlmRequest, StructuredGenerate};
use crate::services::response;

/// Response schema for a single question of the given type.
fn question_schema(question_type: QuestionType) -> JsonValue {
    match question_type {
        QuestionType::Mcq => json!({
            "type": "OBJECT",
            "properties": {
                "questionText": { "type": "STRING", "description": "The question text." },
                "topic": { "type": "STRING", "description": "The topic of the question, e.g., \"Kinematics\"." },
                "options": {
                    "type": "ARRAY",
                    "items": {
                        "type": "OBJECT",
                        "properties": {
                            "text": { "type": "STRING", "description": "The option text." },
                            "isCorrect": { "type": "BOOLEAN", "description": "Whether this option is the correct answer." }
                        },
                        "required": ["text", "isCorrect"]
                    }
                },
                "explanation": { "type": "STRING", "description": "Detailed explanation for the correct answer." }
            },
            "required": ["questionText", "topic", "options", "explanation"]
        }),
        QuestionType::Saq | QuestionType::Laq => json!({
            "type": "OBJECT",
            "properties": {
                "questionText": { "type": "STRING", "description": "The question text." },
                "topic": { "type": "STRING", "description": "The topic of the question, e.g., \"Kinematics\"." },
                "answer": { "type": "STRING", "description": "The correct answer or model answer." },
                "explanation": { "type": "STRING", "description": "Detailed explanation or breakdown of the answer." }
            },
            "required": ["questionText", "topic", "answer", "explanation"]
        }),
    }
}

/// Full response schema: an array of questions.
pub fn quiz_schema(question_type: QuestionType) -> JsonValue {
    json!({
        "type": "ARRAY",
        "items": question_schema(question_type)
    })
}

fn build_prompt(
    context: &str,
    question_type: QuestionType,
    count: usize,
    difficulty: Difficulty,
) -> String {
    format!(
        "Based on the following text content from a textbook, generate {} {} of {} difficulty. \
         Ensure questions are relevant to the provided text.\n\n\
         Text Content:\n\"\"\"\n{}\n\"\"\"",
        count,
        question_type.label(),
        difficulty,
        context
    )
}

/// Generate `count` questions of `question_type` from a context window.
///
/// A count mismatch in the response is tolerated — the returned sequence
/// length is authoritative, not the requested count.
pub async fn generate_quiz<G: StructuredGenerate>(
    llm: &G,
    context: &str,
    question_type: QuestionType,
    count: usize,
    difficulty: Difficulty,
) -> Result<Vec<QuizQuestion>> {
    debug!(
        "generating {} {} ({}), context: {} chars",
        count,
        question_type.tag(),
        difficulty,
        context.len()
    );

    let schema = quiz_schema(question_type);
    let prompt = build_prompt(context, question_type, count, difficulty);

    let llm_response = llm
        .structured_generate(LlmRequest { prompt: &prompt, system: None, schema: Some(&schema) })
        .await
        .map_err(|e| Error::GenerationMalformed { detail: e.to_string() })?;

    let items = response::parse_array(&llm_response.text)
        .map_err(|detail| Error::GenerationMalformed { detail })?;

    if items.len() != count {
        warn!("requested {} questions, model returned {}", count, items.len());
    }

    let mut questions = Vec::with_capacity(items.len());
    for item in items {
        questions.push(stamp_question(item, question_type)?);
    }
    Ok(questions)
}

/// Type the raw element and stamp the requested discriminant onto it — the
/// response schema does not carry the question type itself.
fn stamp_question(item: JsonValue, question_type: QuestionType) -> Result<QuizQuestion> {
    let malformed = |e: serde_json::Error| Error::GenerationMalformed { detail: e.to_string() };
    let question = match question_type {
        QuestionType::Mcq => {
            QuizQuestion::Mcq(serde_json::from_value::<McqQuestion>(item).map_err(malformed)?)
        }
        QuestionType::Saq => {
            QuizQuestion::Saq(serde_json::from_value::<OpenQuestion>(item).map_err(malformed)?)
        }
        QuestionType::Laq => {
            QuizQuestion::Laq(serde_json::from_value::<OpenQuestion>(item).map_err(malformed)?)
        }
    };

    // Exactly one correct option is expected but not enforced; accept the
    // question and leave a trace for the curious.
    if let QuizQuestion::Mcq(q) = &question {
        let correct = q.options.iter().filter(|o| o.is_correct).count();
        if correct != 1 {
            warn!("MCQ \"{}\" has {} options flagged correct", q.question_text, correct);
        }
    }

    Ok(question)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::models::recommendation::GroundingSource;
    use crate::services::llm_service::LlmResponse;

    /// Generator returning a fixed body regardless of the request.
    struct CannedLlm {
        body: String,
    }

    impl StructuredGenerate for CannedLlm {
        async fn structured_generate(&self, _request: LlmRequest<'_>) -> crate::error::Result<LlmResponse> {
            let sources: Vec<GroundingSource> = Vec::new();
            Ok(LlmResponse { text: self.body.clone(), sources })
        }
    }

    fn mcq_item(text: &str) -> serde_json::Value {
        json!({
            "questionText": text,
            "topic": "Kinematics",
            "options": [
                { "text": "42 m", "isCorrect": true },
                { "text": "84 m", "isCorrect": false }
            ],
            "explanation": "Distance is velocity times time."
        })
    }

    #[test]
    fn mcq_schema_requires_options() {
        let schema = quiz_schema(QuestionType::Mcq);
        let required = schema["items"]["required"].as_array().unwrap();
        assert!(required.iter().any(|v| v == "options"));
    }

    #[test]
    fn saq_schema_requires_model_answer() {
        let schema = quiz_schema(QuestionType::Saq);
        let required = schema["items"]["required"].as_array().unwrap();
        assert!(required.iter().any(|v| v == "answer"));
        assert!(!required.iter().any(|v| v == "options"));
    }

    #[test]
    fn stamps_requested_type_onto_elements() {
        let llm = CannedLlm {
            body: serde_json::to_string(&vec![mcq_item("How far does it travel?")]).unwrap(),
        };
        let questions = tokio_test::block_on(generate_quiz(
            &llm,
            "some context",
            QuestionType::Mcq,
            1,
            Difficulty::Easy,
        ))
        .unwrap();

        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].question_type(), QuestionType::Mcq);
        assert_eq!(questions[0].canonical_answer(), "42 m");
    }

    #[test]
    fn count_mismatch_is_tolerated() {
        let llm = CannedLlm {
            body: serde_json::to_string(&vec![mcq_item("Q1"), mcq_item("Q2")]).unwrap(),
        };
        let questions = tokio_test::block_on(generate_quiz(
            &llm,
            "some context",
            QuestionType::Mcq,
            5,
            Difficulty::Medium,
        ))
        .unwrap();
        assert_eq!(questions.len(), 2);
    }

    #[test]
    fn broken_array_is_generation_malformed() {
        let llm = CannedLlm { body: "[{\"questionText\": ".to_string() };
        let err = tokio_test::block_on(generate_quiz(
            &llm,
            "some context",
            QuestionType::Saq,
            3,
            Difficulty::Hard,
        ))
        .unwrap_err();
        assert!(matches!(err, Error::GenerationMalformed { .. }));
    }

    #[test]
    fn element_missing_required_field_is_generation_malformed() {
        // SAQ item without the model answer
        let llm = CannedLlm {
            body: "[{\"questionText\": \"Why?\", \"topic\": \"T\", \"explanation\": \"E\"}]"
                .to_string(),
        };
        let err = tokio_test::block_on(generate_quiz(
            &llm,
            "some context",
            QuestionType::Saq,
            1,
            Difficulty::Easy,
        ))
        .unwrap_err();
        assert!(matches!(err, Error::GenerationMalformed { .. }));
    }
}
