use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use shared_types::Filters;

use crate::store::DEFAULT_PAGE_SIZE;

pub const DEFAULT_CONFIG_PATH: &str = "config/cleaner.toml";
const BUILTIN_CONFIG_TOML: &str = include_str!("../config/cleaner.example.toml");

pub const ENV_CONFIG_PATH: &str = "CLEANER_CONFIG_PATH";
pub const ENV_API_BASE: &str = "CLEANER_API_BASE";
pub const ENV_PAGE_SIZE: &str = "CLEANER_PAGE_SIZE";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CleanerConfig {
    pub api_base: String,
    pub page_size: u32,
    pub default_filters: Filters,
}

impl Default for CleanerConfig {
    fn default() -> Self {
        Self {
            api_base: "http://localhost:8080".to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            default_filters: Filters::default(),
        }
    }
}

/// Load the config from the first available source, then apply environment
/// overrides. Never fails: unreadable files fall back to built-in defaults.
pub fn load_config() -> CleanerConfig {
    let explicit_path = std::env::var(ENV_CONFIG_PATH)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .map(PathBuf::from);

    let path = explicit_path.or_else(|| find_default_config_path(DEFAULT_CONFIG_PATH));

    let mut config = match path {
        Some(path) => load_config_from(&path).unwrap_or_else(|err| {
            tracing::warn!(error = %err, "Failed to load cleaner config; using built-in defaults");
            built_in_config()
        }),
        None => built_in_config(),
    };

    apply_env_overrides(&mut config);
    config
}

pub fn load_config_from(path: &Path) -> Result<CleanerConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config = toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!(path = %path.display(), "Loaded cleaner config");
    Ok(config)
}

fn built_in_config() -> CleanerConfig {
    toml::from_str(BUILTIN_CONFIG_TOML).unwrap_or_else(|err| {
        tracing::error!(error = %err, "Failed to parse built-in cleaner config");
        CleanerConfig::default()
    })
}

fn apply_env_overrides(config: &mut CleanerConfig) {
    if let Ok(api_base) = std::env::var(ENV_API_BASE) {
        if !api_base.trim().is_empty() {
            config.api_base = api_base.trim().trim_end_matches('/').to_string();
        }
    }

    if let Ok(raw) = std::env::var(ENV_PAGE_SIZE) {
        match raw.trim().parse::<u32>() {
            Ok(page_size) if page_size > 0 => config.page_size = page_size,
            _ => tracing::warn!(value = %raw, "Ignoring invalid {ENV_PAGE_SIZE}"),
        }
    }
}

fn find_default_config_path(relative_path: &str) -> Option<PathBuf> {
    let mut current = std::env::current_dir().ok()?;
    loop {
        let candidate = current.join(relative_path);
        if candidate.is_file() {
            return Some(candidate);
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Load the nearest `.env` above the working directory into the process
/// environment. Variables already set are left alone.
pub fn load_env_file() -> Option<PathBuf> {
    match std::env::current_dir() {
        Ok(cwd) => load_env_file_from(&cwd),
        Err(err) => {
            tracing::warn!(error = %err, "No working directory for .env lookup");
            None
        }
    }
}

/// Walk up from `start` to the first `.env` and load it. Returns the file
/// that was loaded.
pub fn load_env_file_from(start: &Path) -> Option<PathBuf> {
    let env_path = start
        .ancestors()
        .map(|dir| dir.join(".env"))
        .find(|candidate| candidate.is_file());

    let Some(env_path) = env_path else {
        tracing::debug!(start = %start.display(), "No .env file above start directory");
        return None;
    };

    if let Err(err) = dotenvy::from_path(&env_path) {
        tracing::warn!(path = %env_path.display(), error = %err, "Skipping unreadable .env");
        return None;
    }
    tracing::info!(path = %env_path.display(), "Loaded cleaner environment");
    Some(env_path)
}
