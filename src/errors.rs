use thiserror::Error;

/// Failures of the HTTP round trip to a generation endpoint. Each variant is
/// shown to the user as-is.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("API key missing for {provider}. Set {env_var}, pass --api-key, or run `nofluff key set`.")]
    MissingApiKey { provider: &'static str, env_var: &'static str },
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{provider} API error ({status}): {message}")]
    Api { provider: &'static str, status: u16, message: String },
    #[error("request blocked by the provider: {0}")]
    Blocked(String),
    #[error("AI returned an empty response. Check API Key or Quota.")]
    EmptyResponse,
    #[error("unexpected response body: {0}")]
    Decode(String),
}

/// Failures of the settings store.
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("style name is required")]
    NameRequired,
    #[error("style prompt is required")]
    PromptRequired,
    #[error("max {max} styles allowed, delete one first")]
    TooManyStyles { max: usize },
    #[error("no style #{index} (there are {len})")]
    NoSuchStyle { index: usize, len: usize },
    #[error("settings I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid settings file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("could not serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),
}
