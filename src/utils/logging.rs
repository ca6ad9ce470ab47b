/// Logging helpers.
///
/// Subscriber setup plus text formatting shared by the flows.
use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber. Respects `RUST_LOG`; defaults
/// to `info`. Safe to call more than once.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Truncate long text for log output.
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
