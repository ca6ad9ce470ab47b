//! Document registry.
//!
//! Owns the document lifecycle: holds every extracted document, tracks which
//! one is active, and exposes derived views of the active document without
//! re-extraction. An explicit object passed by reference to consumers, never
//! ambient module state, so independent registries can coexist.

use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::models::document::Document;

/// Output of the text-extraction capability.
#[derive(Debug, Clone)]
pub struct ExtractedText {
    /// Page-tagged text: `[Page N]` blocks for N = 1..page_count
    pub tagged_text: String,
    pub page_count: usize,
}

/// Capability: derive page-tagged text from a raw document binary.
///
/// Implemented by collaborators outside this crate. Extraction may be
/// long-running; implementations report fractional progress in `[0.0, 1.0]`
/// through `on_progress` and fail for corrupt or unsupported input.
#[allow(async_fn_in_trait)]
pub trait TextExtractor {
    async fn extract(
        &self,
        raw: &[u8],
        on_progress: &mut dyn FnMut(f32),
    ) -> anyhow::Result<ExtractedText>;
}

/// Multi-document registry with a single active document.
///
/// Documents are kept in insertion order. `active`, if set, always names a
/// held document. Mutated only by the single foreground flow of control.
#[derive(Debug, Default)]
pub struct DocumentRegistry {
    documents: Vec<Document>,
    active: Option<String>,
    loading: bool,
    progress: f32,
}

impl DocumentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Extract and store a new document, then make it active.
    ///
    /// Fails with `DuplicateDocument` when a document with this name already
    /// exists (the caller should activate it instead; overwriting would
    /// orphan history keyed by the name) and with `ExtractionInProgress`
    /// while a prior extraction is still in flight — the `loading` flag is
    /// the mutual-exclusion signal. An extraction failure leaves the
    /// registry completely unchanged.
    pub async fn add<E: TextExtractor>(
        &mut self,
        name: &str,
        raw: Vec<u8>,
        extractor: &E,
        mut on_progress: impl FnMut(f32),
    ) -> Result<&Document> {
        if self.loading {
            return Err(Error::ExtractionInProgress);
        }
        if self.contains(name) {
            warn!("document \"{}\" is already loaded", name);
            return Err(Error::DuplicateDocument { name: name.to_string() });
        }

        self.loading = true;
        self.progress = 0.0;
        info!("processing \"{}\"...", name);

        let extracted = match extractor.extract(&raw, &mut on_progress).await {
            Ok(extracted) => extracted,
            Err(e) => {
                self.loading = false;
                warn!("failed to process \"{}\": {}", name, e);
                return Err(Error::ExtractionFailed {
                    name: name.to_string(),
                    reason: e.to_string(),
                });
            }
        };

        info!(
            "✓ \"{}\" processed: {} pages, {} chars",
            name,
            extracted.page_count,
            extracted.tagged_text.len()
        );

        let idx = self.documents.len();
        self.documents.push(Document {
            name: name.to_string(),
            raw,
            text: extracted.tagged_text,
            page_count: extracted.page_count,
        });
        self.active = Some(name.to_string());
        self.loading = false;
        self.progress = 1.0;

        Ok(&self.documents[idx])
    }

    /// Delete a document. Removing the active one promotes the first
    /// remaining document in insertion order (or clears the active slot);
    /// removing an absent name is a no-op.
    pub fn remove(&mut self, name: &str) {
        let before = self.documents.len();
        self.documents.retain(|d| d.name != name);
        if self.documents.len() == before {
            return;
        }
        if self.active.as_deref() == Some(name) {
            self.active = self.documents.first().map(|d| d.name.clone());
        }
        info!("removed \"{}\"", name);
    }

    /// Make a held document active. Silently ignores unknown names so that a
    /// stale identity can never clear the current active session.
    pub fn activate(&mut self, name: &str) {
        if self.contains(name) {
            self.active = Some(name.to_string());
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.documents.iter().any(|d| d.name == name)
    }

    /// All documents in insertion order.
    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn active_name(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// The active document, computed from the active name on each call.
    pub fn active_document(&self) -> Option<&Document> {
        let name = self.active.as_deref()?;
        self.documents.iter().find(|d| d.name == name)
    }

    // ========== Derived views of the active document ==========

    pub fn text(&self) -> &str {
        self.active_document().map(|d| d.text.as_str()).unwrap_or("")
    }

    pub fn name(&self) -> &str {
        self.active_document().map(|d| d.name.as_str()).unwrap_or("")
    }

    pub fn page_count(&self) -> usize {
        self.active_document().map(|d| d.page_count).unwrap_or(0)
    }

    pub fn raw(&self) -> Option<&[u8]> {
        self.active_document().map(|d| d.raw.as_slice())
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Fraction of the most recent extraction completed, in `[0.0, 1.0]`.
    pub fn progress(&self) -> f32 {
        self.progress
    }
}
