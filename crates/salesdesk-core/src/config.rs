//! Assistant configuration
//!
//! Config is loaded with a layered resolution:
//! 1. Explicit path (`--config`) or `SALESDESK_CONFIG`
//! 2. Override in data dir (~/.local/share/salesdesk/config.toml)
//! 3. Embedded defaults (compiled into binary)
//!
//! Environment variables then override individual settings:
//! - `AI_BACKEND`: openai (default) or mock
//! - `OPENAI_BASE_URL`: completion server URL
//! - `OPENAI_MODEL`: model identifier
//! - `SALESDESK_DATA_SOURCE`: synthetic (default) or mock
//!
//! The API key (`OPENAI_API_KEY`) is read separately when the backend is built.

use std::collections::HashSet;
use std::fs;
use std::hash::Hash;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use crate::ai::BackendKind;
use crate::dataset::{DatasetConfig, MAX_WINDOW_DAYS};
use crate::error::{Error, Result};
use crate::models::{Category, Store};
use crate::source::DataSourceKind;

/// Embedded default config (compiled into binary)
const DEFAULT_CONFIG: &str = include_str!("../../../config/salesdesk.toml");

/// Environment variable naming an explicit config file
pub const CONFIG_ENV: &str = "SALESDESK_CONFIG";

/// Completion service settings
#[derive(Debug, Clone, PartialEq)]
pub struct AiConfig {
    pub backend: BackendKind,
    pub base_url: String,
    pub model: String,
    pub request_timeout: Duration,
    pub intent_temperature: f32,
    pub narration_temperature: f32,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::OpenAI,
            base_url: "https://api.openai.com".to_string(),
            model: "gpt-4o-mini".to_string(),
            request_timeout: Duration::from_secs(60),
            intent_temperature: 0.0,
            narration_temperature: 0.3,
        }
    }
}

/// Data source settings
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataConfig {
    pub source: DataSourceKind,
    pub dataset: DatasetConfig,
}

/// Full assistant configuration
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssistantConfig {
    pub ai: AiConfig,
    pub data: DataConfig,
}

impl AssistantConfig {
    /// Load config from the usual locations, then apply environment overrides
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let env_path = std::env::var(CONFIG_ENV).ok().map(PathBuf::from);
        let path = explicit.map(Path::to_path_buf).or(env_path);

        let mut config = load_config(path.as_deref())?;
        config.apply_env_from(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Parse a TOML document over the built-in defaults
    pub fn from_toml(content: &str) -> Result<Self> {
        parse_config(content)
    }

    /// Apply overrides from a variable lookup (the process environment in production)
    pub fn apply_env_from<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(backend) = get("AI_BACKEND") {
            self.ai.backend = backend.parse().map_err(Error::Config)?;
        }
        if let Some(url) = get("OPENAI_BASE_URL") {
            self.ai.base_url = url.trim_end_matches('/').to_string();
        }
        if let Some(model) = get("OPENAI_MODEL") {
            self.ai.model = model;
        }
        if let Some(source) = get("SALESDESK_DATA_SOURCE") {
            self.data.source = source.parse().map_err(Error::Config)?;
        }
        Ok(())
    }
}

/// Default config override location
pub fn default_config_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("salesdesk").join("config.toml"))
}

/// Load configuration (explicit path, then default override, then embedded)
fn load_config(path: Option<&Path>) -> Result<AssistantConfig> {
    let content = match path {
        Some(path) => fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read config {}: {}", path.display(), e))
        })?,
        None => match default_config_path().filter(|p| p.exists()) {
            Some(default_path) => {
                debug!(path = %default_path.display(), "Loading config override");
                fs::read_to_string(&default_path)
                    .map_err(|e| Error::Config(format!("Failed to read config: {}", e)))?
            }
            None => DEFAULT_CONFIG.to_string(),
        },
    };

    parse_config(&content)
}

/// Raw config structure for TOML parsing
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    ai: Option<RawAi>,
    data: Option<RawData>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawAi {
    backend: Option<String>,
    base_url: Option<String>,
    model: Option<String>,
    request_timeout_secs: Option<u64>,
    intent_temperature: Option<f32>,
    narration_temperature: Option<f32>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawData {
    source: Option<String>,
    seed: Option<u64>,
    window_days: Option<u32>,
    stores: Option<Vec<String>>,
    categories: Option<Vec<String>>,
}

/// Parse config from TOML content
fn parse_config(content: &str) -> Result<AssistantConfig> {
    let raw: RawConfig = toml::from_str(content)?;
    let mut config = AssistantConfig::default();

    if let Some(ai) = raw.ai {
        if let Some(backend) = ai.backend {
            config.ai.backend = backend.parse().map_err(Error::Config)?;
        }
        if let Some(url) = ai.base_url {
            config.ai.base_url = url.trim_end_matches('/').to_string();
        }
        if let Some(model) = ai.model {
            config.ai.model = model;
        }
        if let Some(secs) = ai.request_timeout_secs {
            config.ai.request_timeout = Duration::from_secs(secs);
        }
        if let Some(t) = ai.intent_temperature {
            config.ai.intent_temperature = check_temperature("intent_temperature", t)?;
        }
        if let Some(t) = ai.narration_temperature {
            config.ai.narration_temperature = check_temperature("narration_temperature", t)?;
        }
    }

    if let Some(data) = raw.data {
        if let Some(source) = data.source {
            config.data.source = source.parse().map_err(Error::Config)?;
        }
        if let Some(seed) = data.seed {
            config.data.dataset.seed = seed;
        }
        if let Some(days) = data.window_days {
            if !(1..=MAX_WINDOW_DAYS).contains(&days) {
                return Err(Error::Config(format!(
                    "window_days must be between 1 and {}, got {}",
                    MAX_WINDOW_DAYS, days
                )));
            }
            config.data.dataset.window_days = days;
        }
        if let Some(stores) = data.stores {
            config.data.dataset.stores = parse_unique::<Store>("stores", &stores)?;
        }
        if let Some(categories) = data.categories {
            config.data.dataset.categories = parse_unique::<Category>("categories", &categories)?;
        }
    }

    Ok(config)
}

fn check_temperature(key: &str, value: f32) -> Result<f32> {
    if (0.0..=2.0).contains(&value) {
        Ok(value)
    } else {
        Err(Error::Config(format!(
            "{} must be between 0.0 and 2.0, got {}",
            key, value
        )))
    }
}

/// Parse a non-empty list of names, rejecting unknowns and duplicates
fn parse_unique<T>(key: &str, names: &[String]) -> Result<Vec<T>>
where
    T: std::str::FromStr<Err = String> + Eq + Hash + Copy,
{
    if names.is_empty() {
        return Err(Error::Config(format!("{} must not be empty", key)));
    }
    let mut seen = HashSet::with_capacity(names.len());
    let mut out = Vec::with_capacity(names.len());
    for name in names {
        let value: T = name.parse().map_err(Error::Config)?;
        if !seen.insert(value) {
            return Err(Error::Config(format!("duplicate entry in {}: {}", key, name)));
        }
        out.push(value);
    }
    Ok(out)
}
