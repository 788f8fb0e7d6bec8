use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{decode, endpoint, read_success, Provider};
use crate::errors::TransportError;
use crate::wire::GenerationCall;

pub const DEFAULT_BASE: &str = "https://api.anthropic.com";
pub const API_VERSION: &str = "2023-06-01";

pub struct Anthropic {
    pub model: String,
    pub api_key: String,
    pub base_url: String,
    pub api_version: String,
    pub client: Client,
}

#[derive(Serialize)]
struct MsgRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<Msg<'a>>,
}

#[derive(Serialize)]
struct Msg<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct MsgResponse {
    #[serde(default)]
    content: Vec<Block>,
}

#[derive(Deserialize)]
struct Block {
    #[serde(default)]
    text: String,
    #[serde(default)]
    r#type: String,
}

fn joined_text(resp: MsgResponse) -> Result<String, TransportError> {
    let text: String = resp
        .content
        .into_iter()
        .filter(|b| b.r#type == "text")
        .map(|b| b.text)
        .collect();
    if text.trim().is_empty() {
        return Err(TransportError::EmptyResponse);
    }
    Ok(text)
}

#[async_trait]
impl Provider for Anthropic {
    async fn generate(&self, call: &GenerationCall) -> Result<String, TransportError> {
        let url = endpoint(&self.base_url, "v1/messages");
        let body = MsgRequest {
            model: &self.model,
            max_tokens: 4096,
            messages: vec![Msg { role: "user", content: &call.prompt }],
        };

        tracing::debug!(%url, prompt_bytes = call.prompt.len(), "anthropic messages");

        let resp = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", &self.api_version)
            .json(&body)
            .send()
            .await?;
        let text = read_success("anthropic", resp).await?;
        joined_text(decode(&text)?)
    }
}
