//! Free-form Q&A over a context window.
//!
//! The model answers as a teaching assistant grounded in the document text,
//! citing page numbers from the inline `[Page N]` markers. The last message
//! in the history is the new user prompt.

use crate::config::APP_NAME;
use crate::error::Result;
use crate::models::session::ChatMessage;
use crate::services::llm_service::{LlmRequest, StructuredGenerate};

fn system_instruction(context: &str) -> String {
    format!(
        "You are an expert teaching assistant for school students. Your name is {}.\n\
         Answer the user's questions based on the provided textbook context. Be encouraging and clear.\n\
         When you use information from the text, you MUST cite the page number and provide a short, \
         direct quote.\n\
         Format citations like this: (p. 23, \"...quote...\").\n\
         If the answer is not in the provided context, state that clearly and do not make up \
         information.\n\n\
         Textbook Context:\n\"\"\"\n{}\n\"\"\"",
        APP_NAME, context
    )
}

/// One reply to the latest user message, grounded in `context`.
pub async fn chat_response<G: StructuredGenerate>(
    llm: &G,
    history: &[ChatMessage],
    context: &str,
) -> Result<String> {
    let prompt = history.last().map(|m| m.text.as_str()).unwrap_or_default();
    let system = system_instruction(context);

    let llm_response = llm
        .structured_generate(LlmRequest { prompt, system: Some(&system), schema: None })
        .await?;

    Ok(llm_response.text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::llm_service::LlmResponse;

    struct EchoLlm;

    impl StructuredGenerate for EchoLlm {
        async fn structured_generate(&self, request: LlmRequest<'_>) -> Result<LlmResponse> {
            assert!(request.schema.is_none());
            let system = request.system.unwrap_or_default().to_string();
            Ok(LlmResponse {
                text: format!("prompt={} system_has_context={}", request.prompt, system.contains("[Page 3]")),
                sources: Vec::new(),
            })
        }
    }

    #[test]
    fn sends_last_message_as_prompt_with_context_in_system() {
        let history = vec![
            ChatMessage::user("What is inertia?"),
            ChatMessage::model("Inertia is..."),
            ChatMessage::user("Give an example from page 3"),
        ];
        let reply = tokio_test::block_on(chat_response(&EchoLlm, &history, "[Page 3]\nSome text"))
            .unwrap();
        assert_eq!(reply, "prompt=Give an example from page 3 system_has_context=true");
    }
}
