use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer};
use std::path::PathBuf;

const DEFAULT_CORS_ORIGINS: &str = "http://localhost:5173,http://localhost:3000";

/// Runtime settings, read once from the process environment at startup.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_cors_origins", deserialize_with = "deserialize_origins")]
    pub cors_origins: Vec<String>,
    /// Echo internal error detail back to clients.
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub debug: bool,
    #[serde(flatten)]
    pub models: ModelConfig,
}

/// Where the translation weights come from.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelConfig {
    #[serde(default = "default_translation_model")]
    pub translation_model: String,
    #[serde(default)]
    pub model_dir: Option<PathBuf>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_cors_origins() -> Vec<String> {
    split_origins(DEFAULT_CORS_ORIGINS)
}

fn default_translation_model() -> String {
    "m2m100_418M".to_string()
}

fn split_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}

fn deserialize_origins<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Ok(split_origins(&raw))
}

// With parsing enabled the environment source hands over a bool, a number
// or the raw string. Only a literal "true" (any case) turns the flag on.
fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Text(String),
        // Must stay last, it accepts any value.
        Number(serde::de::IgnoredAny),
    }

    Ok(match Flag::deserialize(deserializer)? {
        Flag::Bool(value) => value,
        Flag::Number(_) => false,
        Flag::Text(value) => value.trim().eq_ignore_ascii_case("true"),
    })
}

impl Config {
    /// Load `.env` (if any) and then read the process environment.
    pub fn from_env() -> Result<Self> {
        match dotenvy::dotenv() {
            Ok(path) => tracing::debug!("Loaded environment file {}", path.display()),
            Err(e) if e.not_found() => {}
            Err(e) => tracing::warn!("Ignoring unreadable .env file: {}", e),
        }
        Self::from_source(config::Environment::default().try_parsing(true))
    }

    pub fn from_source(env: config::Environment) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(env)
            .build()
            .context("failed to read configuration from the environment")?;
        settings
            .try_deserialize()
            .context("invalid configuration value")
    }

    pub fn allows_any_origin(&self) -> bool {
        self.cors_origins.iter().any(|origin| origin == "*")
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: default_cors_origins(),
            debug: false,
            models: ModelConfig::default(),
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            translation_model: default_translation_model(),
            model_dir: None,
        }
    }
}
