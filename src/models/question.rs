//! Quiz question model.
//!
//! Questions are a tagged union dispatched by a `type` discriminant, with
//! exhaustive matching at every consumption site (grading, correctness
//! extraction, rendering). Created by the generation contract from model
//! output and immutable thereafter.

use serde::{Deserialize, Serialize};

/// Kind of quiz question requested from the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QuestionType {
    Mcq,
    Saq,
    Laq,
}

impl QuestionType {
    /// Short tag used as the serialized discriminant.
    pub fn tag(self) -> &'static str {
        match self {
            QuestionType::Mcq => "MCQ",
            QuestionType::Saq => "SAQ",
            QuestionType::Laq => "LAQ",
        }
    }

    /// Human-readable name, as used in generation prompts.
    pub fn label(self) -> &'static str {
        match self {
            QuestionType::Mcq => "Multiple Choice Questions",
            QuestionType::Saq => "Short Answer Questions",
            QuestionType::Laq => "Long Answer Questions",
        }
    }

    pub fn from_tag(s: &str) -> Option<Self> {
        match s {
            "MCQ" => Some(QuestionType::Mcq),
            "SAQ" => Some(QuestionType::Saq),
            "LAQ" => Some(QuestionType::Laq),
            _ => None,
        }
    }
}

impl std::fmt::Display for QuestionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Requested difficulty for generated questions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        };
        write!(f, "{}", name)
    }
}

/// One multiple-choice option.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct McqOption {
    pub text: String,
    pub is_correct: bool,
}

/// Multiple-choice question. Exactly one option is expected to carry
/// `is_correct = true`; the type does not enforce it (the generation
/// contract logs a warning for multi- or zero-correct model output).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct McqQuestion {
    pub question_text: String,
    pub topic: String,
    pub options: Vec<McqOption>,
    pub explanation: String,
}

/// Free-text question with a model answer; shared by SAQ and LAQ.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenQuestion {
    pub question_text: String,
    pub topic: String,
    /// Model answer the user's response is graded against
    pub answer: String,
    pub explanation: String,
}

/// Tagged union over the three question kinds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum QuizQuestion {
    #[serde(rename = "MCQ")]
    Mcq(McqQuestion),
    #[serde(rename = "SAQ")]
    Saq(OpenQuestion),
    #[serde(rename = "LAQ")]
    Laq(OpenQuestion),
}

impl QuizQuestion {
    pub fn question_type(&self) -> QuestionType {
        match self {
            QuizQuestion::Mcq(_) => QuestionType::Mcq,
            QuizQuestion::Saq(_) => QuestionType::Saq,
            QuizQuestion::Laq(_) => QuestionType::Laq,
        }
    }

    pub fn question_text(&self) -> &str {
        match self {
            QuizQuestion::Mcq(q) => &q.question_text,
            QuizQuestion::Saq(q) | QuizQuestion::Laq(q) => &q.question_text,
        }
    }

    pub fn topic(&self) -> &str {
        match self {
            QuizQuestion::Mcq(q) => &q.topic,
            QuizQuestion::Saq(q) | QuizQuestion::Laq(q) => &q.topic,
        }
    }

    /// The canonical correct answer: for MCQ the text of the option flagged
    /// correct, for SAQ/LAQ the stored model answer. Computed locally so the
    /// grading model is only asked to compare, never to re-derive truth.
    pub fn canonical_answer(&self) -> &str {
        match self {
            QuizQuestion::Mcq(q) => q
                .options
                .iter()
                .find(|o| o.is_correct)
                .map(|o| o.text.as_str())
                .unwrap_or(""),
            QuizQuestion::Saq(q) | QuizQuestion::Laq(q) => &q.answer,
        }
    }
}

/// Grading outcome for a single question, index-aligned with the question
/// sequence it grades. A score of 0.5 is only valid for SAQ/LAQ.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradedResult {
    pub score: f64,
    pub feedback: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mcq(options: Vec<McqOption>) -> QuizQuestion {
        QuizQuestion::Mcq(McqQuestion {
            question_text: "Which unit measures force?".to_string(),
            topic: "Dynamics".to_string(),
            options,
            explanation: "Force is measured in newtons.".to_string(),
        })
    }

    #[test]
    fn canonical_answer_picks_correct_option() {
        let question = mcq(vec![
            McqOption { text: "Joule".to_string(), is_correct: false },
            McqOption { text: "Newton".to_string(), is_correct: true },
        ]);
        assert_eq!(question.canonical_answer(), "Newton");
    }

    #[test]
    fn canonical_answer_without_correct_option_is_empty() {
        let question = mcq(vec![McqOption { text: "Joule".to_string(), is_correct: false }]);
        assert_eq!(question.canonical_answer(), "");
    }

    #[test]
    fn canonical_answer_for_open_question_is_model_answer() {
        let question = QuizQuestion::Saq(OpenQuestion {
            question_text: "State Newton's first law.".to_string(),
            topic: "Dynamics".to_string(),
            answer: "A body stays at rest or in uniform motion unless acted on.".to_string(),
            explanation: "Also known as the law of inertia.".to_string(),
        });
        assert!(question.canonical_answer().starts_with("A body stays"));
    }

    #[test]
    fn discriminant_round_trips_through_serde() {
        let question = mcq(vec![McqOption { text: "Newton".to_string(), is_correct: true }]);
        let raw = serde_json::to_string(&question).unwrap();
        assert!(raw.contains("\"type\":\"MCQ\""));
        let back: QuizQuestion = serde_json::from_str(&raw).unwrap();
        assert_eq!(back, question);
    }
}
