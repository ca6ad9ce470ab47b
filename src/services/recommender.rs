//! External-video discovery.
//!
//! Asks the model for relevant videos over a capped context window, parses
//! the untrusted reply, then hands the candidates to the verification
//! pipeline. Only a systemic failure of the generation call surfaces as an
//! error; individual link failures are absorbed by the pipeline.

use serde_json::{json, Value as JsonValue};
use tracing::info;

use crate::error::{Error, Result};
use crate::models::recommendation::{GroundingSource, YouTubeRecommendation};
use crate::services::link_verifier::{self, ExistenceProbe, VerificationOutcome};
use crate::services::llm_service::{LlmRequest, StructuredGenerate};
use crate::services::response;

const CURATOR_SYSTEM: &str = "You are an expert YouTube video curator. Your sole purpose is to \
find real, verifiable, and publicly accessible YouTube videos relevant to the user's content.\n\
- You MUST extract the exact URL and title from your sources. Do not paraphrase titles.\n\
- Do NOT invent, guess, or construct URLs. If you cannot find a valid URL, do not include that video.\n\
- Your output MUST be a valid JSON array. Do not include any other text, explanations, or markdown \
before or after the JSON.\n\
- Accuracy is your highest priority. Providing a fake or broken link is a critical failure.";

fn recommendation_schema() -> JsonValue {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "title": { "type": "STRING", "description": "The exact video title." },
                "description": { "type": "STRING", "description": "Brief description of the video's relevance." },
                "youtubeUrl": { "type": "STRING", "description": "The full, verified youtube.com URL." }
            },
            "required": ["title", "description", "youtubeUrl"]
        }
    })
}

fn build_prompt(context: &str) -> String {
    format!(
        "Find 5 highly relevant educational YouTube videos for the following textbook content. \
         For each video, provide the exact title, a brief description of its relevance, and the \
         full, verified youtube.com URL.\n\n\
         Format your response as a JSON array of objects, where each object has these keys: \
         \"title\", \"description\", and \"youtubeUrl\".\n\n\
         Textbook Content:\n\"\"\"\n{}\n\"\"\"",
        context
    )
}

/// Ask the model for video suggestions over at most `max_chars` of context.
///
/// Returns the raw, unverified candidates plus any grounding sources the
/// call carried. Sources are metadata and pass through unfiltered.
pub async fn youtube_recommendations<G: StructuredGenerate>(
    llm: &G,
    context: &str,
    max_chars: usize,
) -> Result<(Vec<YouTubeRecommendation>, Vec<GroundingSource>)> {
    let capped: String = context.chars().take(max_chars).collect();
    let schema = recommendation_schema();
    let prompt = build_prompt(&capped);

    let llm_response = llm
        .structured_generate(LlmRequest {
            prompt: &prompt,
            system: Some(CURATOR_SYSTEM),
            schema: Some(&schema),
        })
        .await
        .map_err(|e| Error::GenerationMalformed { detail: e.to_string() })?;

    let items = response::parse_array(&llm_response.text)
        .map_err(|detail| Error::GenerationMalformed { detail })?;

    let mut recommendations = Vec::with_capacity(items.len());
    for item in items {
        let rec: YouTubeRecommendation = serde_json::from_value(item)
            .map_err(|e| Error::GenerationMalformed { detail: e.to_string() })?;
        recommendations.push(rec);
    }

    Ok((recommendations, llm_response.sources))
}

/// Full discovery pass: propose, then keep only what demonstrably exists.
pub async fn recommend_and_verify<G, P>(
    llm: &G,
    probe: &P,
    context: &str,
    max_chars: usize,
) -> Result<(VerificationOutcome, Vec<GroundingSource>)>
where
    G: StructuredGenerate,
    P: ExistenceProbe,
{
    let (recommendations, sources) = youtube_recommendations(llm, context, max_chars).await?;
    info!("model proposed {} videos, verifying links...", recommendations.len());
    let outcome = link_verifier::verify_recommendations(probe, recommendations).await;
    Ok((outcome, sources))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::llm_service::LlmResponse;

    struct CannedLlm {
        body: String,
        seen_prompt_len: std::sync::Mutex<usize>,
    }

    impl CannedLlm {
        fn new(body: &str) -> Self {
            Self { body: body.to_string(), seen_prompt_len: std::sync::Mutex::new(0) }
        }
    }

    impl StructuredGenerate for CannedLlm {
        async fn structured_generate(&self, request: LlmRequest<'_>) -> Result<LlmResponse> {
            if let Ok(mut len) = self.seen_prompt_len.lock() {
                *len = request.prompt.chars().count();
            }
            Ok(LlmResponse { text: self.body.clone(), sources: Vec::new() })
        }
    }

    #[test]
    fn parses_candidates_from_fenced_response() {
        let llm = CannedLlm::new(
            "```json\n[{\"title\": \"Waves explained\", \"description\": \"Intro\", \
             \"youtubeUrl\": \"https://youtu.be/dQw4w9WgXcQ\"}]\n```",
        );
        let (recs, sources) =
            tokio_test::block_on(youtube_recommendations(&llm, "waves", 5_000)).unwrap();
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].title, "Waves explained");
        assert!(!recs[0].is_valid);
        assert!(sources.is_empty());
    }

    #[test]
    fn context_is_capped() {
        let llm = CannedLlm::new("[]");
        let long_context = "x".repeat(50_000);
        tokio_test::block_on(youtube_recommendations(&llm, &long_context, 5_000)).unwrap();
        let prompt_len = *llm.seen_prompt_len.lock().unwrap();
        assert!(prompt_len < 6_000, "prompt was {} chars", prompt_len);
    }

    #[test]
    fn transport_failure_is_generation_malformed() {
        struct OfflineLlm;
        impl StructuredGenerate for OfflineLlm {
            async fn structured_generate(&self, _request: LlmRequest<'_>) -> Result<LlmResponse> {
                Err(Error::LlmCall { detail: "connection refused".to_string() })
            }
        }

        let err =
            tokio_test::block_on(youtube_recommendations(&OfflineLlm, "waves", 5_000)).unwrap_err();
        assert!(matches!(err, Error::GenerationMalformed { .. }));
    }

    #[test]
    fn invalid_reply_is_generation_malformed() {
        let llm = CannedLlm::new("I could not find any videos, sorry!");
        let err =
            tokio_test::block_on(youtube_recommendations(&llm, "waves", 5_000)).unwrap_err();
        assert!(matches!(err, Error::GenerationMalformed { .. }));
    }
}
