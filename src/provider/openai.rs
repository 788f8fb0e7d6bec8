use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use super::{decode, endpoint, read_success, Provider};
use crate::errors::TransportError;
use crate::wire::GenerationCall;

pub const DEFAULT_BASE: &str = "https://api.openai.com";

/// Sends the prompt as a single user message, with no system message.
pub struct OpenAIProvider {
    pub model: String,
    pub api_key: String,
    pub base_url: String,
    pub client: Client,
}

#[derive(Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

fn first_content(resp: ChatResponse) -> Result<String, TransportError> {
    resp.choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .filter(|c| !c.trim().is_empty())
        .ok_or(TransportError::EmptyResponse)
}

#[async_trait]
impl Provider for OpenAIProvider {
    async fn generate(&self, call: &GenerationCall) -> Result<String, TransportError> {
        let url = endpoint(&self.base_url, "v1/chat/completions");
        let body = json!({
            "model": self.model,
            "messages": [
                { "role": "user", "content": call.prompt }
            ]
        });

        tracing::debug!(%url, prompt_bytes = call.prompt.len(), "openai chat completion");

        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;
        let text = read_success("openai", resp).await?;
        first_content(decode(&text)?)
    }
}
