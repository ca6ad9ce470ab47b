//! Link verification pipeline.
//!
//! Filters AI-suggested video links down to the ones that demonstrably
//! exist. Identifier extraction is pure; verification is a concurrent
//! fan-out of lightweight existence probes where a single probe failing
//! never aborts its siblings — it just marks that item invalid.

use std::sync::OnceLock;

use futures::future::join_all;
use regex::Regex;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::models::recommendation::YouTubeRecommendation;

/// YouTube video tokens are exactly this long.
const VIDEO_ID_LEN: usize = 11;

/// Result of running a batch through the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum VerificationOutcome {
    /// At least one recommendation survived verification.
    Confirmed(Vec<YouTubeRecommendation>),
    /// Nothing could be confirmed. A distinguishable outcome, not an error.
    NoneConfirmed,
}

fn is_video_id(token: &str) -> bool {
    token.len() == VIDEO_ID_LEN
        && token.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Extract the video token from a YouTube URL.
///
/// Handles short links (`youtu.be/<id>`) and long links
/// (`youtube.com/watch?v=<id>`) directly, then falls back to a pattern
/// match for other known shapes. Anything that does not yield an exact
/// 11-character token extracts to `None`.
pub fn extract_video_id(url: &str) -> Option<String> {
    if url.is_empty() {
        return None;
    }

    if let Some(rest) = url.split("youtu.be/").nth(1) {
        let token: String =
            rest.chars().take_while(|c| !matches!(c, '?' | '&' | '#' | '/')).collect();
        if is_video_id(&token) {
            return Some(token);
        }
    }

    if url.contains("youtube.com") {
        for sep in ["?v=", "&v="] {
            if let Some(idx) = url.find(sep) {
                let token: String = url[idx + sep.len()..]
                    .chars()
                    .take_while(|c| !matches!(c, '?' | '&' | '#' | '/'))
                    .collect();
                if is_video_id(&token) {
                    return Some(token);
                }
            }
        }
    }

    // Fallback for embed/, v/, u/<x>/ and other known URL shapes.
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    let pattern = PATTERN.get_or_init(|| {
        Regex::new(r"(youtu\.be/|v/|u/\w/|embed/|watch\?v=|&v=)([^#&?]*)").expect("static pattern")
    });
    if let Some(caps) = pattern.captures(url) {
        if let Some(token) = caps.get(2) {
            if is_video_id(token.as_str()) {
                return Some(token.as_str().to_string());
            }
        }
    }

    None
}

/// Capability: check that a stable per-video public resource exists.
///
/// An `Err` is a per-item `VerificationUnavailable`; the pipeline
/// normalizes it to `false`, so it never reaches a caller.
#[allow(async_fn_in_trait)]
pub trait ExistenceProbe {
    async fn exists(&self, video_id: &str) -> Result<bool>;
}

/// Probes the video's first thumbnail with a HEAD request; a success status
/// means the video exists and is public.
pub struct ThumbnailProbe {
    client: reqwest::Client,
    base_url: String,
}

impl ThumbnailProbe {
    pub fn new(config: &Config) -> Self {
        Self { client: reqwest::Client::new(), base_url: config.thumbnail_base_url.clone() }
    }
}

impl ExistenceProbe for ThumbnailProbe {
    async fn exists(&self, video_id: &str) -> Result<bool> {
        let url = format!("{}/vi/{}/0.jpg", self.base_url, video_id);
        let response = self.client.head(&url).send().await.map_err(|e| {
            Error::VerificationUnavailable { video_id: video_id.to_string(), reason: e.to_string() }
        })?;
        Ok(response.status().is_success())
    }
}

/// Fan out one probe per candidate and keep only confirmed items.
///
/// Candidates without an extractable identifier are invalid with no network
/// call. All probes for the batch are launched together and the pipeline
/// waits for the whole set — no streaming of partial results, no
/// cancellation of slow probes.
pub async fn verify_recommendations<P: ExistenceProbe>(
    probe: &P,
    recommendations: Vec<YouTubeRecommendation>,
) -> VerificationOutcome {
    debug!("verifying {} video links", recommendations.len());

    let checks = recommendations.into_iter().map(|mut rec| async move {
        rec.is_valid = match extract_video_id(&rec.youtube_url) {
            Some(video_id) => probe.exists(&video_id).await.unwrap_or_else(|e| {
                warn!("{}", e);
                false
            }),
            None => false,
        };
        rec
    });

    let verified: Vec<YouTubeRecommendation> =
        join_all(checks).await.into_iter().filter(|rec| rec.is_valid).collect();

    if verified.is_empty() {
        VerificationOutcome::NoneConfirmed
    } else {
        VerificationOutcome::Confirmed(verified)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn extracts_from_short_link() {
        assert_eq!(
            extract_video_id("https://youtu.be/dQw4w9WgXcQ").as_deref(),
            Some("dQw4w9WgXcQ")
        );
        assert_eq!(
            extract_video_id("https://youtu.be/dQw4w9WgXcQ?t=42").as_deref(),
            Some("dQw4w9WgXcQ")
        );
    }

    #[test]
    fn extracts_from_watch_link() {
        assert_eq!(
            extract_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ").as_deref(),
            Some("dQw4w9WgXcQ")
        );
        assert_eq!(
            extract_video_id("https://www.youtube.com/watch?list=PL123&v=dQw4w9WgXcQ").as_deref(),
            Some("dQw4w9WgXcQ")
        );
    }

    #[test]
    fn extracts_from_embed_link() {
        assert_eq!(
            extract_video_id("https://www.youtube.com/embed/dQw4w9WgXcQ").as_deref(),
            Some("dQw4w9WgXcQ")
        );
    }

    #[test]
    fn rejects_wrong_length_and_foreign_urls() {
        assert_eq!(extract_video_id("https://youtu.be/short"), None);
        assert_eq!(extract_video_id("https://vimeo.com/123456789"), None);
        assert_eq!(extract_video_id(""), None);
    }

    fn rec(url: &str) -> YouTubeRecommendation {
        YouTubeRecommendation {
            title: format!("Video at {}", url),
            description: "A relevant video.".to_string(),
            youtube_url: url.to_string(),
            is_valid: false,
        }
    }

    /// Probe that knows a fixed set of good ids and errors on a fixed set.
    struct FixedProbe {
        good: HashSet<String>,
        failing: HashSet<String>,
    }

    impl ExistenceProbe for FixedProbe {
        async fn exists(&self, video_id: &str) -> Result<bool> {
            if self.failing.contains(video_id) {
                return Err(Error::VerificationUnavailable {
                    video_id: video_id.to_string(),
                    reason: "connection reset".to_string(),
                });
            }
            Ok(self.good.contains(video_id))
        }
    }

    #[test]
    fn keeps_only_confirmed_items() {
        let probe = FixedProbe {
            good: ["goodvid0001".to_string(), "goodvid0002".to_string()].into_iter().collect(),
            failing: ["failvid0001".to_string(), "failvid0002".to_string()].into_iter().collect(),
        };
        let batch = vec![
            rec("https://youtu.be/goodvid0001"),
            rec("https://youtu.be/failvid0001"),
            rec("https://youtu.be/goodvid0002"),
            rec("https://youtu.be/failvid0002"),
            rec("https://youtu.be/deadvid0001"),
        ];

        let outcome = tokio_test::block_on(verify_recommendations(&probe, batch));
        match outcome {
            VerificationOutcome::Confirmed(verified) => {
                assert_eq!(verified.len(), 2);
                assert!(verified.iter().all(|r| r.is_valid));
                assert!(verified.iter().any(|r| r.youtube_url.ends_with("goodvid0001")));
                assert!(verified.iter().any(|r| r.youtube_url.ends_with("goodvid0002")));
            }
            VerificationOutcome::NoneConfirmed => panic!("expected two confirmed items"),
        }
    }

    #[test]
    fn no_extractable_ids_means_none_confirmed_without_probing() {
        /// Probe that panics if contacted.
        struct UnreachableProbe;
        impl ExistenceProbe for UnreachableProbe {
            async fn exists(&self, _video_id: &str) -> Result<bool> {
                panic!("no probe should run for unextractable ids");
            }
        }

        let batch = vec![rec("https://example.com/a"), rec("not a url"), rec("")];
        let outcome = tokio_test::block_on(verify_recommendations(&UnreachableProbe, batch));
        assert_eq!(outcome, VerificationOutcome::NoneConfirmed);
    }
}
