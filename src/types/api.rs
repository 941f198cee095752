//! Request and response bodies for the extraction and recommendation endpoints.

use super::{message::ChatMessage, preferences::ParsedPreferences, recommendation::Recommendation};
use crate::core::intent::FollowUpMode;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractRequest {
    pub text: String,
    #[serde(default)]
    pub history: Vec<ChatMessage>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractResponse {
    pub preferences: ParsedPreferences,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecommendRequest {
    #[serde(default)]
    pub preferences: ParsedPreferences,
    /// Conversation so far, including the user turn being answered
    #[serde(default)]
    pub history: Vec<ChatMessage>,
    /// Free-form tone name; unknown values fall back to the default tone
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tone: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendResponse {
    pub json: Recommendation,
    pub markdown: String,
    pub mode: FollowUpMode,
}
