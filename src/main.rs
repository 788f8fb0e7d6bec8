use anyhow::{anyhow, bail, Context};
use chrono::Utc;
use clap::Parser;
use fs_err as fs;
use std::io::Read;
use std::path::Path;
use uuid::Uuid;

mod cli;
mod config;
mod errors;
mod log;
mod parse;
mod prompt;
mod provider;
mod ux;
mod wire;

use cli::{Command, EnhanceArgs, KeyAction, StyleAction};
use config::Config;

/// Text from --text, else --file, else stdin; trimmed.
fn read_input(args: &EnhanceArgs) -> anyhow::Result<String> {
    let raw = match (&args.text, &args.file) {
        (Some(t), _) => t.clone(),
        (None, Some(f)) => fs::read_to_string(f)?,
        (None, None) => {
            let mut s = String::new();
            std::io::stdin()
                .read_to_string(&mut s)
                .context("failed to read text from stdin")?;
            s
        }
    };
    Ok(raw.trim().to_string())
}

async fn enhance(cfg: &Config, args: &EnhanceArgs) -> anyhow::Result<()> {
    let text = read_input(args)?;
    if text.is_empty() {
        bail!("Paste some text first: pass --text, --file, or pipe it on stdin.");
    }

    let kind = args.provider.unwrap_or(cfg.provider);
    let model = args.model.clone().unwrap_or_else(|| cfg.model_for(kind));
    let unfiltered = args.unfiltered || cfg.unfiltered;
    let template = cfg.template();

    let req = wire::GenerationRequestConfig {
        user_text: text,
        styles: cfg.styles.clone(),
        unfiltered,
    };
    let prompt = template.build(&req);
    tracing::info!(provider = %kind, %model, styles = req.styles.len(), unfiltered, "prompt built");

    let api_key = cfg.resolve_api_key(
        kind,
        args.api_key.as_deref(),
        kind.env_var().and_then(|v| std::env::var(v).ok()),
    );
    let base_url = match kind {
        cli::ProviderKind::Ollama => Some(cfg.ollama_url.clone()),
        _ => cfg.api_base.clone(),
    };
    let prov = provider::make_provider(provider::ProviderOptions {
        kind,
        model: model.clone(),
        api_key,
        timeout_secs: args.timeout_secs.unwrap_or(cfg.timeout_secs),
        base_url,
    })?;

    let call = wire::GenerationCall { prompt, unfiltered };
    let pb = ux::spinner(!args.no_progress, "Editor is analyzing and transforming...");
    let reply = prov.generate(&call).await;
    pb.finish_and_clear();
    let raw = reply?;

    let parser = parse::ResponseParser::new(&template.critique_label)?;
    let parsed = parser.parse(&raw);
    if parsed.transformations.is_empty() {
        tracing::warn!(bytes = raw.len(), "reply contained no transformation blocks");
    }

    if args.save_run {
        let record = log::RunRecord {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            provider: kind,
            model,
            unfiltered,
            styles: req.styles.len(),
            cards: parsed.transformations.len(),
        };
        let dir = log::save_run(Path::new(&args.root), &record, &call.prompt, &raw, &parsed)?;
        eprintln!("run saved to {}", dir.display());
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&parsed)?);
    } else if let Some(title) = &args.only {
        let card = parsed
            .find(title)
            .ok_or_else(|| anyhow!("no variant titled {:?} in the reply", title))?;
        println!("{}", ux::sanitize(&card.content));
    } else {
        ux::print_result(&parsed, &template.critique_label);
    }
    Ok(())
}

fn style(cfg_path: &Path, action: &StyleAction) -> anyhow::Result<()> {
    let mut cfg = Config::load(cfg_path)?;
    match action {
        StyleAction::List => ux::print_styles(&cfg.styles),
        StyleAction::Add { name, prompt } => {
            cfg.add_style(name, prompt)?;
            cfg.save(cfg_path)?;
            println!("Style added ({} of {}).", cfg.styles.len(), config::MAX_STYLES);
        }
        StyleAction::Delete { index } => {
            let removed = cfg.delete_style(*index)?;
            cfg.save(cfg_path)?;
            println!("Style {:?} deleted.", removed.name);
        }
    }
    Ok(())
}

fn key(cfg_path: &Path, action: &KeyAction) -> anyhow::Result<()> {
    let mut cfg = Config::load(cfg_path)?;
    let (kind, value) = match action {
        KeyAction::Set { key, provider } => {
            let key = key.trim();
            if key.is_empty() {
                bail!("API key is empty");
            }
            (provider.unwrap_or(cfg.provider), Some(key.to_string()))
        }
        KeyAction::Clear { provider } => (provider.unwrap_or(cfg.provider), None),
    };
    if !cfg.api_keys.set(kind, value.clone()) {
        bail!("{kind} does not use an API key");
    }
    cfg.save(cfg_path)?;
    match value {
        Some(_) => println!("API key for {kind} saved to {}.", cfg_path.display()),
        None => println!("API key for {kind} removed."),
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = cli::Args::parse();
    log::init(args.debug);

    let cfg_path = config::resolve_path(args.config.as_deref())?;
    tracing::debug!(path = %cfg_path.display(), "settings path");

    match &args.command {
        Command::Enhance(e) => {
            let cfg = Config::load(&cfg_path)
                .with_context(|| format!("loading {}", cfg_path.display()))?;
            enhance(&cfg, e).await
        }
        Command::Style { action } => style(&cfg_path, action),
        Command::Key { action } => key(&cfg_path, action),
    }
}
