use async_trait::async_trait;
use reqwest::{Client, Response};
use std::time::Duration;

use crate::cli::ProviderKind;
use crate::errors::TransportError;
use crate::wire::GenerationCall;

pub mod anthropic;
pub mod gemini;
pub mod ollama;
pub mod openai;

/// Carries a built prompt to a generation endpoint and returns the model's
/// raw text reply.
#[async_trait]
pub trait Provider: Send + Sync {
    async fn generate(&self, call: &GenerationCall) -> Result<String, TransportError>;
}

pub type DynProvider = Box<dyn Provider + Send + Sync>;

#[derive(Debug, Clone)]
pub struct ProviderOptions {
    pub kind: ProviderKind,
    pub model: String,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
    /// Base URL override; `None` means the provider's public endpoint.
    pub base_url: Option<String>,
}

pub fn make_provider(opts: ProviderOptions) -> Result<DynProvider, TransportError> {
    let client = Client::builder()
        .timeout(Duration::from_secs(opts.timeout_secs))
        .build()?;
    let ProviderOptions { kind, model, api_key, base_url, .. } = opts;

    let require_key = || {
        api_key.clone().ok_or(TransportError::MissingApiKey {
            provider: kind.name(),
            env_var: kind.env_var().unwrap_or_default(),
        })
    };

    Ok(match kind {
        ProviderKind::Gemini => Box::new(gemini::Gemini {
            model,
            api_key: require_key()?,
            base_url: base_url.unwrap_or_else(|| gemini::DEFAULT_BASE.into()),
            client,
        }),
        ProviderKind::OpenAI => Box::new(openai::OpenAIProvider {
            model,
            api_key: require_key()?,
            base_url: base_url.unwrap_or_else(|| openai::DEFAULT_BASE.into()),
            client,
        }),
        ProviderKind::Anthropic => Box::new(anthropic::Anthropic {
            model,
            api_key: require_key()?,
            base_url: base_url.unwrap_or_else(|| anthropic::DEFAULT_BASE.into()),
            api_version: anthropic::API_VERSION.into(),
            client,
        }),
        ProviderKind::Ollama => Box::new(ollama::Ollama {
            model,
            url: base_url.unwrap_or_else(|| ollama::DEFAULT_URL.into()),
            client,
        }),
    })
}

pub(crate) fn endpoint(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}

/// Read the body and turn non-2xx statuses into `TransportError::Api`.
pub(crate) async fn read_success(
    provider: &'static str,
    resp: Response,
) -> Result<String, TransportError> {
    let status = resp.status();
    let text = resp.text().await?;
    tracing::debug!(provider, %status, bytes = text.len(), "response received");
    if !status.is_success() {
        return Err(TransportError::Api {
            provider,
            status: status.as_u16(),
            message: error_message(&text).unwrap_or(text),
        });
    }
    Ok(text)
}

/// The `error.message` (or bare `error` string) most JSON APIs return.
pub(crate) fn error_message(body: &str) -> Option<String> {
    let v: serde_json::Value = serde_json::from_str(body).ok()?;
    let err = v.get("error")?;
    err.get("message")
        .and_then(|m| m.as_str())
        .or_else(|| err.as_str())
        .map(str::to_string)
}

pub(crate) fn decode<T: serde::de::DeserializeOwned>(body: &str) -> Result<T, TransportError> {
    serde_json::from_str(body).map_err(|e| TransportError::Decode(e.to_string()))
}
