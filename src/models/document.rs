/// One extracted document.
///
/// The name is the natural key: two documents with the same name are the
/// same document. A `Document` is immutable once created; re-extraction
/// produces a new value rather than mutating one in place. Owned exclusively
/// by the registry and never serialized — documents are re-derived from
/// re-uploaded binaries, not persisted across restarts.
#[derive(Debug, Clone)]
pub struct Document {
    /// Human-chosen filename, unique within the registry
    pub name: String,
    /// Raw document binary as uploaded
    pub raw: Vec<u8>,
    /// Page-tagged text: `[Page N]` blocks for N = 1..page_count
    pub text: String,
    pub page_count: usize,
}
