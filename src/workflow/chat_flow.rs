//! Chat flow.
//!
//! One session per document. Messages are appended and persisted strictly
//! in send order: user message, persist, model reply, persist. A send that
//! arrives while a prior send is still outstanding is ignored rather than
//! interleaved — the `responding` flag is the caller-facing contract.

use std::cell::Cell;

use tracing::warn;

use crate::config::Config;
use crate::models::session::ChatMessage;
use crate::services::chat_service;
use crate::services::llm_service::StructuredGenerate;
use crate::storage::{KeyValueStore, SessionStore};

const ERROR_REPLY: &str = "Sorry, I encountered an error. Please try again.";

/// What happened to a send request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// The exchange completed (the reply may be the fixed apology text).
    Replied,
    /// Empty input, or a prior send was still outstanding.
    Ignored,
}

/// Chat transcript for one document, kept in sync with persistence.
pub struct ChatSession {
    document: String,
    messages: Vec<ChatMessage>,
    responding: Cell<bool>,
    context_chars: usize,
}

/// Clears the responding flag even when the send future is dropped
/// mid-flight, so a cancelled exchange cannot wedge the session.
struct RespondingGuard<'a>(&'a Cell<bool>);

impl Drop for RespondingGuard<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

impl ChatSession {
    /// Open the session for a document, reading any persisted transcript.
    pub fn open<S: KeyValueStore>(
        sessions: &SessionStore<S>,
        document: &str,
        config: &Config,
    ) -> Self {
        Self {
            document: document.to_string(),
            messages: sessions.load_transcript(document),
            responding: Cell::new(false),
            context_chars: config.chat_context_chars,
        }
    }

    pub fn document(&self) -> &str {
        &self.document
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn is_responding(&self) -> bool {
        self.responding.get()
    }

    /// Append the user message, ask the model, append the reply.
    ///
    /// A model failure is absorbed into the fixed apology reply; the
    /// transcript stays consistent either way.
    pub async fn send<G, S>(
        &mut self,
        llm: &G,
        sessions: &SessionStore<S>,
        document_text: &str,
        input: &str,
    ) -> SendOutcome
    where
        G: StructuredGenerate,
        S: KeyValueStore,
    {
        if self.responding.get() || input.trim().is_empty() {
            return SendOutcome::Ignored;
        }
        self.responding.set(true);
        let _responding = RespondingGuard(&self.responding);

        self.messages.push(ChatMessage::user(input));
        sessions.save_transcript(&self.document, &self.messages);

        let context: String = document_text.chars().take(self.context_chars).collect();
        let reply = match chat_service::chat_response(llm, &self.messages, &context).await {
            Ok(text) => text,
            Err(e) => {
                warn!("chat response failed for \"{}\": {}", self.document, e);
                ERROR_REPLY.to_string()
            }
        };

        self.messages.push(ChatMessage::model(reply));
        sessions.save_transcript(&self.document, &self.messages);

        SendOutcome::Replied
    }

    /// Drop the transcript, removing the stored key.
    pub fn clear<S: KeyValueStore>(&mut self, sessions: &SessionStore<S>) {
        self.messages.clear();
        sessions.save_transcript(&self.document, &self.messages);
    }
}
