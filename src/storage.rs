//! Session persistence.
//!
//! Two independent keyed stores over one `KeyValueStore`: per-document chat
//! transcripts, and a single global append-only quiz-attempt log. Storage is
//! best-effort — a write failure is logged and swallowed, never surfaced to
//! the user-visible flow — and corrupt stored data degrades to the empty
//! value with a warning.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing::warn;

use crate::config::Config;
use crate::models::session::{ChatMessage, QuizAttempt};

/// Keyed persistent storage. Synchronous and best-effort.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn delete(&self, key: &str);
}

/// In-memory store for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        match self.entries.lock() {
            Ok(entries) => entries.get(key).cloned(),
            Err(_) => None,
        }
    }

    fn set(&self, key: &str, value: &str) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(key.to_string(), value.to_string());
        }
    }

    fn delete(&self, key: &str) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.remove(key);
        }
    }
}

/// One file per key under a root directory.
#[derive(Debug, Clone)]
pub struct DirStore {
    root: PathBuf,
}

impl DirStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Keys carry user-chosen filenames; keep the on-disk name safe.
    fn path_for(&self, key: &str) -> PathBuf {
        let safe: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') { c } else { '_' })
            .collect();
        self.root.join(format!("{}.json", safe))
    }
}

impl KeyValueStore for DirStore {
    fn get(&self, key: &str) -> Option<String> {
        fs::read_to_string(self.path_for(key)).ok()
    }

    fn set(&self, key: &str, value: &str) {
        let result = fs::create_dir_all(&self.root).and_then(|_| fs::write(self.path_for(key), value));
        if let Err(e) = result {
            warn!("could not persist \"{}\": {}", key, e);
        }
    }

    fn delete(&self, key: &str) {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!("could not delete \"{}\": {}", key, e),
        }
    }
}

const ATTEMPTS_KEY: &str = "quiz_attempts";

fn chat_key(document: &str) -> String {
    format!("chat_history_{}", document)
}

/// Chat transcripts and the quiz-attempt log over a keyed store.
pub struct SessionStore<S: KeyValueStore> {
    store: S,
}

impl SessionStore<DirStore> {
    /// Store backed by the configured storage directory.
    pub fn on_disk(config: &Config) -> Self {
        Self::new(DirStore::new(&config.storage_dir))
    }
}

impl<S: KeyValueStore> SessionStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Transcript for a document; absence of the key is the empty transcript.
    pub fn load_transcript(&self, document: &str) -> Vec<ChatMessage> {
        match self.store.get(&chat_key(document)) {
            Some(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                warn!("could not load chat history for \"{}\": {}", document, e);
                Vec::new()
            }),
            None => Vec::new(),
        }
    }

    /// Write the transcript. An empty transcript deletes the key rather
    /// than storing an empty array.
    pub fn save_transcript(&self, document: &str, messages: &[ChatMessage]) {
        let key = chat_key(document);
        if messages.is_empty() {
            self.store.delete(&key);
            return;
        }
        match serde_json::to_string(messages) {
            Ok(raw) => self.store.set(&key, &raw),
            Err(e) => warn!("could not save chat history for \"{}\": {}", document, e),
        }
    }

    /// The global attempt history, oldest first. Read once at startup.
    pub fn load_attempts(&self) -> Vec<QuizAttempt> {
        match self.store.get(ATTEMPTS_KEY) {
            Some(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                warn!("could not load quiz attempts: {}", e);
                Vec::new()
            }),
            None => Vec::new(),
        }
    }

    /// Append one attempt to the history.
    pub fn record_attempt(&self, attempt: QuizAttempt) {
        let mut attempts = self.load_attempts();
        attempts.push(attempt);
        match serde_json::to_string(&attempts) {
            Ok(raw) => self.store.set(ATTEMPTS_KEY, &raw),
            Err(e) => warn!("could not save quiz attempts: {}", e),
        }
    }

    /// Drop the entire attempt history.
    pub fn clear_attempts(&self) {
        self.store.delete(ATTEMPTS_KEY);
    }
}
