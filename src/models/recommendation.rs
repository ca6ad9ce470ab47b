use serde::{Deserialize, Serialize};

/// One AI-proposed external video.
///
/// `is_valid` is populated only after the verification pipeline runs; a
/// recommendation with `is_valid = false` must never be shown to the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YouTubeRecommendation {
    pub title: String,
    pub description: String,
    pub youtube_url: String,
    #[serde(default)]
    pub is_valid: bool,
}

/// Source citation accompanying a grounded generation call. Metadata only:
/// passed through unfiltered, not independently verified.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroundingSource {
    pub uri: String,
    pub title: String,
}
