use std::path::PathBuf;
use std::time::Duration;

use eyre::{Result, bail};
use log::debug;
use serde::{Deserialize, Serialize};

pub const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/youtube/v3";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const API_KEY_ENV: &str = "YOUTUBE_API_KEY";

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub api_key: Option<String>,
    pub timeout_secs: Option<u64>,
    pub base_url: Option<String>,
    pub channels_file: Option<PathBuf>,
    pub default_max_duration: Option<u64>,
    pub default_cap: Option<usize>,
}

/// Everything the API client needs, resolved from flags, environment and config file
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub api_key: String,
    pub timeout: Duration,
    pub base_url: String,
}

impl Config {
    /// Load config from ~/.config/ytscout/config.toml if it exists
    pub fn load() -> Result<Self> {
        let path = config_path();
        if path.exists() {
            debug!("Loading config from {}", path.display());
            let content = std::fs::read_to_string(&path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            debug!("No config file found at {}", path.display());
            Ok(Config::default())
        }
    }

    /// Build the client configuration. Flags win over the environment, which
    /// wins over the config file.
    pub fn api_config(&self, key_flag: Option<String>, env_key: Option<String>, timeout_flag: Option<u64>) -> Result<ApiConfig> {
        let api_key = [key_flag, env_key, self.api_key.clone()]
            .into_iter()
            .flatten()
            .find(|k| !k.trim().is_empty());

        let Some(api_key) = api_key else {
            bail!(
                "no YouTube API key configured\n\nSet one of:\n  --api-key <KEY>\n  {API_KEY_ENV}=<KEY>\n  api_key = \"<KEY>\" in {}",
                config_path().display()
            );
        };

        let timeout_secs = timeout_flag.or(self.timeout_secs).unwrap_or(DEFAULT_TIMEOUT_SECS);

        Ok(ApiConfig {
            api_key,
            timeout: Duration::from_secs(timeout_secs),
            base_url: self.base_url.clone().unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        })
    }

    pub fn channels_file(&self) -> PathBuf {
        self.channels_file
            .clone()
            .unwrap_or_else(|| PathBuf::from("channels.json"))
    }
}

pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from(".config"))
        .join("ytscout")
        .join("config.toml")
}
