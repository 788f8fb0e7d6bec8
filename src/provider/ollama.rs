use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{decode, endpoint, read_success, Provider};
use crate::errors::TransportError;
use crate::wire::GenerationCall;

pub const DEFAULT_URL: &str = "http://localhost:11434";

pub struct Ollama {
    pub model: String,
    pub url: String,
    pub client: Client,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<Msg<'a>>,
    stream: bool,
}

#[derive(Serialize)]
struct Msg<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    message: Option<MsgOut>,
}

#[derive(Deserialize)]
struct MsgOut {
    #[serde(default)]
    content: String,
}

#[async_trait]
impl Provider for Ollama {
    async fn generate(&self, call: &GenerationCall) -> Result<String, TransportError> {
        let url = endpoint(&self.url, "api/chat");
        let body = ChatRequest {
            model: &self.model,
            messages: vec![Msg { role: "user", content: &call.prompt }],
            stream: false,
        };

        tracing::debug!(%url, prompt_bytes = call.prompt.len(), "ollama chat");

        let resp = self.client.post(&url).json(&body).send().await?;
        let text = read_success("ollama", resp).await?;
        let parsed: ChatResponse = decode(&text)?;
        parsed
            .message
            .map(|m| m.content)
            .filter(|c| !c.trim().is_empty())
            .ok_or(TransportError::EmptyResponse)
    }
}
