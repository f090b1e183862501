use crate::error::{DatalensError, Result};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::Path;

/// Tunables loaded from `config.toml`. Every section has full defaults so
/// the file is optional; secrets never live here (see the env helpers below).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub output_dir: String,
    pub log_dir: String,
    pub social: SocialConfig,
    pub geocode: GeocodeConfig,
    pub wordcloud: WordcloudConfig,
    pub layout: LayoutConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SocialConfig {
    /// Followers requested in the single API call. The service caps one
    /// call at 200; pagination past that is out of scope.
    pub follower_cap: u32,
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeocodeConfig {
    /// Delay awaited before each lookup, to stay inside the external quota.
    pub delay_ms: u64,
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WordcloudConfig {
    /// Inputs beyond this cap are down-sampled to exactly this many rows.
    pub sample_cap: usize,
    pub seed: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub seed: u64,
    pub iterations: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_dir: "output".to_string(),
            log_dir: "logs".to_string(),
            social: SocialConfig::default(),
            geocode: GeocodeConfig::default(),
            wordcloud: WordcloudConfig::default(),
            layout: LayoutConfig::default(),
        }
    }
}

impl Default for SocialConfig {
    fn default() -> Self {
        Self {
            follower_cap: 200,
            timeout_seconds: 30,
        }
    }
}

impl Default for GeocodeConfig {
    fn default() -> Self {
        Self {
            delay_ms: 1000,
            timeout_seconds: 10,
        }
    }
}

impl Default for WordcloudConfig {
    fn default() -> Self {
        Self {
            sample_cap: 500,
            seed: 42,
        }
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            seed: 7,
            iterations: 300,
        }
    }
}

impl Config {
    /// Load `config.toml` from the working directory, falling back to
    /// defaults when the file does not exist.
    pub fn load() -> Result<Self> {
        Self::load_from("config.toml")
    }

    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path).map_err(|e| {
            DatalensError::Config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}

/// Spreadsheet id, from the CLI flag or `DATALENS_SHEET_ID`.
/// Absence is a fatal precondition for the network pipeline.
pub fn sheet_id(cli_value: Option<String>) -> Result<String> {
    cli_value
        .or_else(|| env::var("DATALENS_SHEET_ID").ok())
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| {
            DatalensError::Config(
                "No spreadsheet id: pass --sheet-id or set DATALENS_SHEET_ID".to_string(),
            )
        })
}

/// Account handle, from the CLI flag or `DATALENS_SOCIAL_HANDLE`.
pub fn social_handle(cli_value: Option<String>) -> Result<String> {
    cli_value
        .or_else(|| env::var("DATALENS_SOCIAL_HANDLE").ok())
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| {
            DatalensError::Config(
                "No account handle: pass --handle or set DATALENS_SOCIAL_HANDLE".to_string(),
            )
        })
}

/// Bearer token for the social API. Absence is a fatal precondition for
/// the follower pipeline.
pub fn social_token() -> Result<String> {
    env::var("DATALENS_SOCIAL_TOKEN")
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| DatalensError::Config("DATALENS_SOCIAL_TOKEN is not set".to_string()))
}

/// Optional geocoder base-URL override (self-hosted instances).
pub fn geocoder_url() -> Option<String> {
    env::var("DATALENS_GEOCODER_URL")
        .ok()
        .filter(|v| !v.trim().is_empty())
}

/// Contact email forwarded to the public geocoder, per its usage policy.
pub fn geocoder_email() -> Option<String> {
    env::var("DATALENS_GEOCODER_EMAIL")
        .ok()
        .filter(|v| !v.trim().is_empty())
}
