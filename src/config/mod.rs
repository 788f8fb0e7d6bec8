use fs_err as fs;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::cli::ProviderKind;
use crate::errors::SettingsError;
use crate::prompt::PromptTemplate;
use crate::wire::StyleExtension;

/// Upper bound on saved custom styles.
pub const MAX_STYLES: usize = 5;

/// API keys stored in the settings file, one per hosted provider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiKeys {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gemini: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub openai: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anthropic: Option<String>,
}

impl ApiKeys {
    pub fn get(&self, kind: ProviderKind) -> Option<&str> {
        match kind {
            ProviderKind::Gemini => self.gemini.as_deref(),
            ProviderKind::OpenAI => self.openai.as_deref(),
            ProviderKind::Anthropic => self.anthropic.as_deref(),
            ProviderKind::Ollama => None,
        }
    }

    /// Returns false for providers that take no key.
    pub fn set(&mut self, kind: ProviderKind, key: Option<String>) -> bool {
        let slot = match kind {
            ProviderKind::Gemini => &mut self.gemini,
            ProviderKind::OpenAI => &mut self.openai,
            ProviderKind::Anthropic => &mut self.anthropic,
            ProviderKind::Ollama => return false,
        };
        *slot = key;
        true
    }
}

/// Contents of `settings.toml`. Every field is optional in the file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub provider: ProviderKind,
    /// Model for `provider`. Other providers fall back to their defaults.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    pub timeout_secs: u64,
    pub unfiltered: bool,
    pub ollama_url: String,
    /// Overrides the base URL of the hosted providers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,
    pub api_keys: ApiKeys,
    pub styles: Vec<StyleExtension>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template: Option<PromptTemplate>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            provider: ProviderKind::Gemini,
            model: None,
            timeout_secs: 120,
            unfiltered: false,
            ollama_url: "http://localhost:11434".into(),
            api_base: None,
            api_keys: ApiKeys::default(),
            styles: Vec::new(),
            template: None,
        }
    }
}

/// `<config dir>/nofluff/settings.toml`, when the platform has a config dir.
pub fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("nofluff").join("settings.toml"))
}

pub fn resolve_path(explicit: Option<&str>) -> anyhow::Result<PathBuf> {
    match explicit {
        Some(p) => Ok(PathBuf::from(p)),
        None => default_path()
            .ok_or_else(|| anyhow::anyhow!("no config directory on this platform; pass --config")),
    }
}

impl Config {
    /// Load settings; a missing file means defaults.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no settings file, using defaults");
            return Ok(Self::default());
        }
        let text = fs::read_to_string(path)?;
        Self::from_toml(&text)
    }

    pub fn from_toml(text: &str) -> Result<Self, SettingsError> {
        Ok(toml::from_str(text)?)
    }

    pub fn to_toml(&self) -> Result<String, SettingsError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Write through a temp file in the target directory, then rename over the
    /// target.
    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        let text = self.to_toml()?;
        let dir = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir)?;
        let mut tmp = tempfile::NamedTempFile::new_in(&dir)?;
        tmp.write_all(text.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(path).map_err(|e| e.error)?;
        tracing::debug!(path = %path.display(), "settings saved");
        Ok(())
    }

    pub fn model_for(&self, kind: ProviderKind) -> String {
        match &self.model {
            Some(model) if kind == self.provider => model.clone(),
            _ => kind.default_model().to_string(),
        }
    }

    pub fn template(&self) -> PromptTemplate {
        self.template.clone().unwrap_or_default()
    }

    /// Key precedence: explicit flag, then environment, then the stored key.
    /// Blank values count as absent.
    pub fn resolve_api_key(
        &self,
        kind: ProviderKind,
        explicit: Option<&str>,
        from_env: Option<String>,
    ) -> Option<String> {
        explicit
            .map(str::to_string)
            .into_iter()
            .chain(from_env)
            .chain(self.api_keys.get(kind).map(str::to_string))
            .map(|k| k.trim().to_string())
            .find(|k| !k.is_empty())
    }

    pub fn add_style(&mut self, name: &str, prompt: &str) -> Result<(), SettingsError> {
        let name = name.trim();
        let prompt = prompt.trim();
        if name.is_empty() {
            return Err(SettingsError::NameRequired);
        }
        if prompt.is_empty() {
            return Err(SettingsError::PromptRequired);
        }
        if self.styles.len() >= MAX_STYLES {
            return Err(SettingsError::TooManyStyles { max: MAX_STYLES });
        }
        self.styles.push(StyleExtension::new(name, prompt));
        Ok(())
    }

    /// `index` is 1-based, as printed by `style list`.
    pub fn delete_style(&mut self, index: usize) -> Result<StyleExtension, SettingsError> {
        let len = self.styles.len();
        if index == 0 || index > len {
            return Err(SettingsError::NoSuchStyle { index, len });
        }
        Ok(self.styles.remove(index - 1))
    }
}
