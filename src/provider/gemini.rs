use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{decode, endpoint, read_success, Provider};
use crate::errors::TransportError;
use crate::wire::GenerationCall;

pub const DEFAULT_BASE: &str = "https://generativelanguage.googleapis.com";

const HARM_CATEGORIES: [&str; 4] = [
    "HARM_CATEGORY_HARASSMENT",
    "HARM_CATEGORY_HATE_SPEECH",
    "HARM_CATEGORY_SEXUALLY_EXPLICIT",
    "HARM_CATEGORY_DANGEROUS_CONTENT",
];

pub struct Gemini {
    pub model: String,
    pub api_key: String,
    pub base_url: String,
    pub client: Client,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    safety_settings: Vec<SafetySetting>,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<PartIn<'a>>,
}

#[derive(Serialize)]
struct PartIn<'a> {
    text: &'a str,
}

#[derive(Serialize)]
struct SafetySetting {
    category: &'static str,
    threshold: &'static str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
    error: Option<ErrorBody>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<ContentOut>,
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct ContentOut {
    #[serde(default)]
    parts: Vec<PartOut>,
}

#[derive(Deserialize)]
struct PartOut {
    #[serde(default)]
    text: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    code: u16,
    #[serde(default)]
    message: String,
}

fn safety_settings(unfiltered: bool) -> Vec<SafetySetting> {
    if !unfiltered {
        return Vec::new();
    }
    HARM_CATEGORIES
        .iter()
        .map(|&category| SafetySetting { category, threshold: "BLOCK_NONE" })
        .collect()
}

/// Text of the first candidate, or the most specific reason there is none.
fn extract_text(resp: GenerateResponse) -> Result<String, TransportError> {
    if let Some(err) = resp.error {
        return Err(TransportError::Api { provider: "gemini", status: err.code, message: err.message });
    }
    if let Some(reason) = resp.prompt_feedback.and_then(|f| f.block_reason) {
        return Err(TransportError::Blocked(reason));
    }
    let first = resp.candidates.into_iter().next().ok_or(TransportError::EmptyResponse)?;
    let text: String = first
        .content
        .map(|c| c.parts.into_iter().map(|p| p.text).collect())
        .unwrap_or_default();
    if !text.is_empty() {
        return Ok(text);
    }
    let reason = first.finish_reason.unwrap_or_default();
    if matches!(reason.as_str(), "SAFETY" | "PROHIBITED_CONTENT" | "BLOCKLIST") {
        return Err(TransportError::Blocked(reason));
    }
    Err(TransportError::EmptyResponse)
}

#[async_trait]
impl Provider for Gemini {
    async fn generate(&self, call: &GenerationCall) -> Result<String, TransportError> {
        let url = endpoint(&self.base_url, &format!("v1beta/models/{}:generateContent", self.model));
        let body = GenerateRequest {
            contents: vec![Content { parts: vec![PartIn { text: &call.prompt }] }],
            safety_settings: safety_settings(call.unfiltered),
        };

        tracing::debug!(%url, prompt_bytes = call.prompt.len(), unfiltered = call.unfiltered, "gemini generateContent");

        let resp = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;
        let text = read_success("gemini", resp).await?;
        extract_text(decode(&text)?)
    }
}
