use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[default]
    #[value(alias = "google")]
    Gemini,
    #[value(name = "openai", alias = "open-ai")]
    OpenAI,
    Anthropic,
    Ollama,
}

impl ProviderKind {
    pub fn name(self) -> &'static str {
        match self {
            ProviderKind::Gemini => "gemini",
            ProviderKind::OpenAI => "openai",
            ProviderKind::Anthropic => "anthropic",
            ProviderKind::Ollama => "ollama",
        }
    }

    pub fn default_model(self) -> &'static str {
        match self {
            ProviderKind::Gemini => "gemini-2.5-flash",
            ProviderKind::OpenAI => "gpt-4.1-mini",
            ProviderKind::Anthropic => "claude-3-5-haiku-latest",
            ProviderKind::Ollama => "llama3.1",
        }
    }

    /// Environment variable holding the API key. Ollama runs locally and
    /// needs none.
    pub fn env_var(self) -> Option<&'static str> {
        match self {
            ProviderKind::Gemini => Some("GEMINI_API_KEY"),
            ProviderKind::OpenAI => Some("OPENAI_API_KEY"),
            ProviderKind::Anthropic => Some("ANTHROPIC_API_KEY"),
            ProviderKind::Ollama => None,
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Parser, Debug)]
#[command(name = "nofluff", version, about = "Rewrite text in several styles with a hosted LLM, plus a short writing critique")]
pub struct Args {
    /// Settings file (default: <config dir>/nofluff/settings.toml)
    #[arg(long, global = true, env = "NOFLUFF_CONFIG")]
    pub config: Option<String>,

    #[arg(long, global = true, default_value_t = false)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Rewrite text and print the critique and every variant
    Enhance(EnhanceArgs),
    /// Manage saved custom styles
    Style {
        #[command(subcommand)]
        action: StyleAction,
    },
    /// Manage the stored API key
    Key {
        #[command(subcommand)]
        action: KeyAction,
    },
}

#[derive(ClapArgs, Debug, Default)]
pub struct EnhanceArgs {
    /// Text to rewrite (reads --file or stdin when omitted)
    #[arg(long, short, conflicts_with = "file")]
    pub text: Option<String>,

    #[arg(long, short)]
    pub file: Option<String>,

    #[arg(long, value_enum)]
    pub provider: Option<ProviderKind>,

    #[arg(long)]
    pub model: Option<String>,

    #[arg(long)]
    pub api_key: Option<String>,

    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Ask for an explicit variant and disable provider content filtering
    #[arg(long, default_value_t = false)]
    pub unfiltered: bool,

    /// Print the parsed result as JSON
    #[arg(long, default_value_t = false)]
    pub json: bool,

    /// Print only the content of the variant with this title
    #[arg(long, conflicts_with = "json")]
    pub only: Option<String>,

    #[arg(long, default_value_t = false)]
    pub no_progress: bool,

    /// Save prompt, raw reply and parsed result under <root>/.nofluff/runs
    #[arg(long, default_value_t = false)]
    pub save_run: bool,

    #[arg(long, default_value = ".")]
    pub root: String,
}

#[derive(Subcommand, Debug)]
pub enum StyleAction {
    /// List saved styles
    List,
    /// Save a new style
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        prompt: String,
    },
    /// Delete a style by its number in `style list`
    Delete { index: usize },
}

#[derive(Subcommand, Debug)]
pub enum KeyAction {
    /// Store an API key in the settings file
    Set {
        key: String,
        /// Provider the key belongs to (default: configured provider)
        #[arg(long, value_enum)]
        provider: Option<ProviderKind>,
    },
    /// Remove a stored API key
    Clear {
        #[arg(long, value_enum)]
        provider: Option<ProviderKind>,
    },
}
