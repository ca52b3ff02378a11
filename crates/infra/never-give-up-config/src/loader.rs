//! Two-layer config loading.
//!
//! Global `~/.config/never-give-up/never-give-up.json` is the base, the local
//! `./never-give-up.json` is merged over it (RFC 7396), the result is
//! deserialized once, then environment overrides and advisory validation run.

use crate::{merge::merge_patch, types::NeverGiveUpConfig, validation::AdvisoryWarning};
use anyhow::{Context, Result};
use serde_json::Value;
use std::path::{Path, PathBuf};

pub const LOCAL_FILE: &str = "never-give-up.json";

/// Directory name under `dirs::config_dir()`.
pub const GLOBAL_DIR: &str = "never-give-up";

pub const GLOBAL_FILE: &str = "never-give-up.json";

#[derive(Debug, Clone)]
pub struct ConfigPaths {
    pub local: PathBuf,
    pub global: PathBuf,
}

#[derive(Debug)]
pub struct LoadedConfig {
    pub config: NeverGiveUpConfig,
    pub warnings: Vec<AdvisoryWarning>,
    pub paths: ConfigPaths,
}

pub fn global_config_path() -> Result<PathBuf> {
    let base = dirs::config_dir().context("Could not determine config dir")?;
    Ok(base.join(GLOBAL_DIR).join(GLOBAL_FILE))
}

pub fn local_config_path(local_dir: &Path) -> PathBuf {
    local_dir.join(LOCAL_FILE)
}

/// Load the global file and `<local_dir>/never-give-up.json`.
///
/// # Precedence (lowest to highest)
/// 1. Default values
/// 2. Global config
/// 3. Local config
/// 4. Environment variables
pub fn load_merged(local_dir: &Path) -> Result<LoadedConfig> {
    let paths = ConfigPaths {
        local: local_config_path(local_dir),
        global: global_config_path()?,
    };
    load_from(paths)
}

/// Load from explicit paths. Missing files count as empty objects.
pub fn load_from(paths: ConfigPaths) -> Result<LoadedConfig> {
    let global_v = read_json_object_or_empty(&paths.global)?;
    let local_v = read_json_object_or_empty(&paths.local)?;

    let merged = merge_patch(global_v, local_v);
    let mut config: NeverGiveUpConfig = serde_json::from_value(merged)
        .context("Failed to deserialize merged never-give-up config")?;

    apply_env_overrides(&mut config);

    let warnings = crate::validation::validate(&config);
    for w in &warnings {
        tracing::debug!("config warning: {w}");
    }

    Ok(LoadedConfig {
        config,
        warnings,
        paths,
    })
}

/// Environment overrides, applied after file merging.
///
/// `NEVER_GIVE_UP_PROMPTS_DIR` holds a platform path list and replaces `prompts.dirs`.
pub fn apply_env_overrides(cfg: &mut NeverGiveUpConfig) {
    if let Some(v) = env_trimmed("NEVER_GIVE_UP_PROMPTS_DIR") {
        cfg.prompts.dirs = std::env::split_paths(&v)
            .filter(|p| !p.as_os_str().is_empty())
            .collect();
    }
    if let Some(v) = env_trimmed("NEVER_GIVE_UP_DEFAULT_LANGUAGE") {
        cfg.prompts.default_language = v;
    }
    if let Some(v) = env_trimmed("NEVER_GIVE_UP_SAMPLING") {
        match parse_flag(&v) {
            Some(enabled) => cfg.sampling.enabled = enabled,
            None => tracing::warn!("Ignoring NEVER_GIVE_UP_SAMPLING={v}: expected true/false/1/0"),
        }
    }
    if let Some(v) = env_trimmed("NEVER_GIVE_UP_LOG_LEVEL") {
        cfg.logging.level = v;
    }
    if let Some(v) = env_trimmed("NEVER_GIVE_UP_LOG_JSON") {
        cfg.logging.json = parse_flag(&v).unwrap_or(false);
    }
}

fn parse_flag(v: &str) -> Option<bool> {
    match v.to_ascii_lowercase().as_str() {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    }
}

fn env_trimmed(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn read_json_object_or_empty(path: &Path) -> Result<Value> {
    if !path.exists() {
        return Ok(Value::Object(Default::default()));
    }

    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    let v: Value = serde_json::from_str(&raw)
        .with_context(|| format!("Invalid JSON in {}", path.display()))?;

    match v {
        Value::Object(_) => Ok(v),
        _ => anyhow::bail!("Config root must be a JSON object: {}", path.display()),
    }
}
