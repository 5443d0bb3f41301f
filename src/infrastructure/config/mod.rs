use std::path::PathBuf;

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::domain::error::{AppError, Result};
use crate::domain::keyword::ExtractionConfig;
use crate::domain::llm_config::LLMConfig;

pub const DEFAULT_CONFIG_FILE: &str = "seo_fruit.toml";
const CONFIG_PATH_VAR: &str = "SEO_FRUIT_CONFIG";
const ENV_PREFIX: &str = "SEO_FRUIT_";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Where uploads are spooled while parsing; the OS temp dir when unset
    pub upload_dir: Option<PathBuf>,
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3001,
            upload_dir: None,
            max_upload_bytes: 50 * 1024 * 1024,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub extraction: ExtractionConfig,
    pub llm: LLMConfig,
}

impl AppConfig {
    /// Defaults, then `seo_fruit.toml` (or `$SEO_FRUIT_CONFIG`), then
    /// `SEO_FRUIT_*` variables with `__` separating nested keys.
    pub fn load() -> Result<Self> {
        // A missing .env is normal outside development
        let _ = dotenvy::dotenv();

        let path =
            std::env::var(CONFIG_PATH_VAR).unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());

        let figment = Figment::from(Serialized::defaults(AppConfig::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"));

        Self::from_figment(figment)
    }

    pub fn from_figment(figment: Figment) -> Result<Self> {
        let mut config: AppConfig = figment
            .extract()
            .map_err(|e| AppError::ConfigError(e.to_string()))?;

        if config.llm.api_key.is_none() {
            config.llm.api_key = std::env::var("OPENAI_API_KEY")
                .ok()
                .filter(|key| !key.trim().is_empty());
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.extraction
            .validate()
            .map_err(|e| AppError::ConfigError(format!("extraction: {}", e)))?;

        if self.server.max_upload_bytes == 0 {
            return Err(AppError::ConfigError(
                "server: max_upload_bytes must be > 0".to_string(),
            ));
        }
        if self.llm.base_url.trim().is_empty() {
            return Err(AppError::ConfigError("llm: base_url is empty".to_string()));
        }
        Ok(())
    }
}
