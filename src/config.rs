use anyhow::{Context, Result};
use dirs::config_dir;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::cache::{DEFAULT_CAPACITY, DEFAULT_TEMPERATURE_CUTOFF};
use crate::gemini::{API_KEY_ENV_VAR, DEFAULT_API_BASE};
use crate::input::{DEFAULT_INPUT_ENV_VAR, DEFAULT_MAX_INPUT_BYTES};

const APP_NAME: &str = "gemini-coding";
const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Model used by default
    pub pro_model: String,
    /// Model used when a command sets `fast`
    pub fast_model: String,
    /// Base URL of the Gemini REST API
    pub api_base: String,
    pub max_output_tokens: u32,
    /// Environment variable consulted as an input source
    pub input_env_var: String,
    /// File content beyond this many bytes is truncated
    pub max_input_bytes: usize,
    /// Read the system clipboard as the last input source
    pub clipboard: bool,
    pub cache: CacheConfig,
    /// Only ever taken from `GEMINI_API_KEY`.
    #[serde(skip)]
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub ttl_secs: u64,
    pub capacity: usize,
    /// Requests above this temperature bypass the cache
    pub temperature_cutoff: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            pro_model: "gemini-2.5-pro".to_string(),
            fast_model: "gemini-2.5-flash".to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            max_output_tokens: 8192,
            input_env_var: DEFAULT_INPUT_ENV_VAR.to_string(),
            max_input_bytes: DEFAULT_MAX_INPUT_BYTES,
            clipboard: true,
            cache: CacheConfig::default(),
            api_key: None,
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: 300,
            capacity: DEFAULT_CAPACITY,
            temperature_cutoff: DEFAULT_TEMPERATURE_CUTOFF,
        }
    }
}

impl CacheConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

impl Config {
    /// Load defaults, then the config file, then environment overrides.
    ///
    /// An explicit `path` must exist; the default path is optional.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(p) => Self::from_file(p)?,
            None => match default_config_path() {
                Some(p) if p.exists() => Self::from_file(&p)?,
                _ => Self::default(),
            },
        };
        config.apply_env(|name| std::env::var(name).ok());
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// Apply environment overrides through `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        self.api_key = get(API_KEY_ENV_VAR);
        if let Some(v) = get("GEMINI_CODING_PRO_MODEL") {
            self.pro_model = v;
        }
        if let Some(v) = get("GEMINI_CODING_FAST_MODEL") {
            self.fast_model = v;
        }
        if let Some(v) = get("GEMINI_CODING_API_BASE") {
            self.api_base = v;
        }
        if let Some(v) = get("GEMINI_CODING_CLIPBOARD") {
            let v = v.trim().to_lowercase();
            self.clipboard = !matches!(v.as_str(), "0" | "false" | "off" | "no");
        }
        if let Some(v) = get("GEMINI_CODING_CACHE_TTL_SECS") {
            match v.trim().parse() {
                Ok(secs) => self.cache.ttl_secs = secs,
                Err(_) => tracing::warn!("Ignoring invalid GEMINI_CODING_CACHE_TTL_SECS: {}", v),
            }
        }
    }

    /// Pretty JSON with the API key status but never the key itself.
    pub fn to_redacted_json(&self) -> Result<String> {
        let mut value = serde_json::to_value(self).context("Failed to serialize config")?;
        value["api_key"] = serde_json::Value::String(
            if self.api_key.is_some() {
                "[REDACTED]"
            } else {
                "(not set)"
            }
            .to_string(),
        );
        serde_json::to_string_pretty(&value).context("Failed to serialize config")
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    let mut path = config_dir()?;
    path.push(APP_NAME);
    path.push(CONFIG_FILE);
    Some(path)
}
