use chrono::{DateTime, Utc};
use fs_err as fs;
use serde::{Deserialize, Serialize};
use serde_json::to_string_pretty;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::cli::ProviderKind;
use crate::wire::ParsedResult;

/// Route `tracing` events to stderr so stdout carries only results.
/// `RUST_LOG` wins; otherwise `warn`, or `debug` for this crate with `--debug`.
pub fn init(debug: bool) {
    let fallback = if debug { "warn,nofluff=debug" } else { "warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(fallback));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Metadata written next to the artifacts of one run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunRecord {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub provider: ProviderKind,
    pub model: String,
    pub unfiltered: bool,
    pub styles: usize,
    pub cards: usize,
}

pub fn run_dir(root: &Path, id: Uuid) -> PathBuf {
    root.join(".nofluff").join("runs").join(id.to_string())
}

/// Write `prompt.txt`, `response.md`, `result.json` and `run.json`.
pub fn save_run(
    root: &Path,
    record: &RunRecord,
    prompt: &str,
    raw: &str,
    parsed: &ParsedResult,
) -> anyhow::Result<PathBuf> {
    let dir = run_dir(root, record.id);
    fs::create_dir_all(&dir)?;
    fs::write(dir.join("prompt.txt"), prompt)?;
    fs::write(dir.join("response.md"), raw)?;
    fs::write(dir.join("result.json"), to_string_pretty(parsed)?)?;
    fs::write(dir.join("run.json"), to_string_pretty(record)?)?;
    tracing::info!(dir = %dir.display(), "run saved");
    Ok(dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wire::TransformationCard;

    #[test]
    fn save_run_writes_all_artifacts() {
        let root = tempfile::tempdir().unwrap();
        let record = RunRecord {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            provider: ProviderKind::Gemini,
            model: "gemini-2.5-flash".into(),
            unfiltered: false,
            styles: 0,
            cards: 1,
        };
        let parsed = ParsedResult {
            critique: "c".into(),
            transformations: vec![TransformationCard { title: "A".into(), content: "b".into() }],
        };

        let dir = save_run(root.path(), &record, "PROMPT", "RAW", &parsed).unwrap();
        assert_eq!(dir, run_dir(root.path(), record.id));
        assert_eq!(fs::read_to_string(dir.join("prompt.txt")).unwrap(), "PROMPT");
        assert_eq!(fs::read_to_string(dir.join("response.md")).unwrap(), "RAW");

        let back: ParsedResult =
            serde_json::from_str(&fs::read_to_string(dir.join("result.json")).unwrap()).unwrap();
        assert_eq!(back, parsed);

        let rec: RunRecord =
            serde_json::from_str(&fs::read_to_string(dir.join("run.json")).unwrap()).unwrap();
        assert_eq!(rec.id, record.id);
        assert_eq!(rec.provider, ProviderKind::Gemini);
    }
}
