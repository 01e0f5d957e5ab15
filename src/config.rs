use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub const CONFIG_FILE: &str = "config/agentes.toml";
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

/// Top-level settings, usually loaded from `config/agentes.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub api: ApiSettings,
    #[serde(default)]
    pub logging: LogSettings,
}

/// Where the backend lives and how every request to it is decorated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Request timeout; `None` keeps the transport default.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    /// Extra headers sent with every request.
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: None,
            headers: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogSettings {
    #[serde(default = "default_log_file")]
    pub file: PathBuf,
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            file: default_log_file(),
            level: default_log_level(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_log_file() -> PathBuf {
    PathBuf::from("logs/agentes.log")
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Settings {
    /// Reads the settings under `workspace_root`. A missing file means defaults.
    pub fn load(workspace_root: &Path) -> Result<Self> {
        let config_path = workspace_root.join(CONFIG_FILE);
        if !config_path.exists() {
            return Ok(Self::default().normalize(workspace_root));
        }
        let raw = fs::read_to_string(&config_path)
            .with_context(|| format!("failed to read settings: {}", config_path.display()))?;
        let parsed: Settings = toml::from_str(&raw)
            .with_context(|| format!("failed to parse settings: {}", config_path.display()))?;
        Ok(parsed.normalize(workspace_root))
    }

    /// Resolves relative paths against the workspace root.
    fn normalize(mut self, workspace_root: &Path) -> Self {
        if self.logging.file.is_relative() {
            self.logging.file = workspace_root.join(&self.logging.file);
        }
        self
    }
}
