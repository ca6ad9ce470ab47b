//! Typed error taxonomy.
//!
//! Every failure in this crate returns control to the initiating flow with a
//! typed reason. No error here is fatal to the process: registry- and
//! window-level errors are local failures the caller must fix by changing
//! input, malformed model responses surface once per attempt with no
//! automatic retry, and per-item verification failures are absorbed into
//! `is_valid = false` before they can propagate.

use thiserror::Error;

/// Application error type.
#[derive(Debug, Error)]
pub enum Error {
    /// A document with this name is already loaded. The caller should
    /// activate the existing one instead of overwriting it, since an
    /// overwrite would orphan any chat or attempt history under that name.
    #[error("a document named \"{name}\" is already loaded")]
    DuplicateDocument { name: String },

    /// An extraction is already in flight; the registry refuses re-entry.
    #[error("another document is still being processed")]
    ExtractionInProgress,

    /// Text extraction failed for a corrupt or unsupported binary. The
    /// registry state is unchanged when this is returned.
    #[error("failed to process \"{name}\": {reason}")]
    ExtractionFailed { name: String, reason: String },

    /// Start page is greater than end page after clamping, or the document
    /// has no pages at all.
    #[error("invalid page range [{start}, {end}]")]
    InvalidRange { start: usize, end: usize },

    /// A page marker expected in well-formed tagged text was missing.
    #[error("page marker for page {page} not found")]
    RangeNotFound { page: usize },

    /// The selected window holds too little text to be usable as context.
    #[error("not enough text content in the selected page range ({chars} chars, minimum {min_chars})")]
    InsufficientContent { chars: usize, min_chars: usize },

    /// The model returned quiz data that could not be parsed into questions.
    #[error("the model returned an invalid quiz response: {detail}")]
    GenerationMalformed { detail: String },

    /// The model returned grading data with an unexpected shape.
    #[error("the model returned an invalid grading response: {detail}")]
    GradingMalformed { detail: String },

    /// A single existence probe could not be completed. Never batch-fatal:
    /// the verification pipeline normalizes this to `is_valid = false`.
    #[error("existence probe failed for video \"{video_id}\": {reason}")]
    VerificationUnavailable { video_id: String, reason: String },

    /// The LLM transport itself failed (network, quota, empty response).
    #[error("LLM call failed: {detail}")]
    LlmCall { detail: String },
}

/// Application result type.
pub type Result<T> = std::result::Result<T, Error>;
