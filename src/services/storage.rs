//! Local persistence: config file, cache directory, audit trail.
//!
//! Everything lives under the user's home, mirroring where a browser client
//! would keep its local storage: `~/.config/pase` for durable state and
//! `~/.cache/pase` for re-fetchable copies.

use serde::Deserialize;
use std::path::PathBuf;

pub fn config_dir() -> anyhow::Result<PathBuf> {
    let home = std::env::var("HOME")?;
    Ok(PathBuf::from(home).join(".config/pase"))
}

pub fn cache_dir() -> anyhow::Result<PathBuf> {
    let home = std::env::var("HOME")?;
    Ok(PathBuf::from(home).join(".cache/pase/listings"))
}

#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    #[serde(default)]
    pub general: ConfigGeneral,
}

#[derive(Debug, Deserialize, Default)]
pub struct ConfigGeneral {
    pub server: Option<String>,
    pub scan_gap_ms: Option<u64>,
    pub scan_min_len: Option<usize>,
    pub request_timeout_ms: Option<u64>,
}

pub fn load_config() -> anyhow::Result<ConfigFile> {
    let path = config_dir()?.join("config.toml");
    if !path.exists() {
        return Ok(ConfigFile::default());
    }
    let raw = std::fs::read_to_string(path)?;
    Ok(toml::from_str(&raw)?)
}

/// Append one line to the mutation audit trail. Best effort: auditing must
/// never fail a user-facing operation.
pub fn audit(action: &str, data: serde_json::Value) {
    let Ok(dir) = config_dir() else {
        return;
    };
    let _ = std::fs::create_dir_all(&dir);
    let event = serde_json::json!({
        "ts": chrono::Utc::now().timestamp(),
        "action": action,
        "data": data
    });
    let line = format!("{}\n", event);
    let _ = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join("audit.jsonl"))
        .and_then(|mut f| std::io::Write::write_all(&mut f, line.as_bytes()));
}
