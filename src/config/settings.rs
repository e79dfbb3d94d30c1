//! Application settings management

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::PatientGuideError;

/// Environment variable holding the Azure OpenAI API key.
pub const ENV_API_KEY: &str = "API_KEY";
/// Environment variable holding the Azure OpenAI API version.
pub const ENV_API_VERSION: &str = "API_VERSION";
/// Environment variable holding the Azure OpenAI resource endpoint.
pub const ENV_ENDPOINT: &str = "AZURE_ENDPOINT";
/// Environment variable holding the model deployment name.
pub const ENV_DEPLOYMENT: &str = "AZURE_MODEL_DEPLOYMENT";

/// Main application settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// Azure OpenAI connection settings
    #[serde(default)]
    pub azure: AzureSettings,

    /// Sampling parameters for the completion call
    #[serde(default)]
    pub sampling: SamplingSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AzureSettings {
    /// API key (overridden by API_KEY)
    #[serde(default)]
    pub api_key: String,

    /// API version, e.g. 2024-02-01 (overridden by API_VERSION)
    #[serde(default)]
    pub api_version: String,

    /// Resource endpoint URL (overridden by AZURE_ENDPOINT)
    #[serde(default)]
    pub endpoint: String,

    /// Model deployment name (overridden by AZURE_MODEL_DEPLOYMENT)
    #[serde(default)]
    pub deployment: String,

    /// HTTP request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SamplingSettings {
    /// Maximum number of tokens in the generated document
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Sampling temperature in [0, 1]
    #[serde(default = "default_temperature")]
    pub temperature: f64,

    /// Nucleus sampling probability in [0, 1]
    #[serde(default = "default_top_p")]
    pub top_p: f64,
}

// Default value functions

fn default_timeout_secs() -> u64 {
    120
}

fn default_max_tokens() -> u32 {
    3000
}

fn default_temperature() -> f64 {
    0.2
}

fn default_top_p() -> f64 {
    0.95
}

impl Default for AzureSettings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_version: String::new(),
            endpoint: String::new(),
            deployment: String::new(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for SamplingSettings {
    fn default() -> Self {
        Self {
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            top_p: default_top_p(),
        }
    }
}

impl SamplingSettings {
    /// Reject values the completion service would refuse anyway.
    pub fn validate(&self) -> crate::Result<()> {
        if self.max_tokens == 0 {
            return Err(PatientGuideError::Config(
                "sampling.max_tokens must be greater than zero".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.temperature) {
            return Err(PatientGuideError::Config(format!(
                "sampling.temperature must be within [0, 1], got {}",
                self.temperature
            )));
        }
        if !(0.0..=1.0).contains(&self.top_p) {
            return Err(PatientGuideError::Config(format!(
                "sampling.top_p must be within [0, 1], got {}",
                self.top_p
            )));
        }
        Ok(())
    }
}

/// A missing .env file is the normal case; anything else is a config error.
fn dotenv_outcome(result: dotenvy::Result<PathBuf>) -> crate::Result<Option<PathBuf>> {
    match result {
        Ok(path) => Ok(Some(path)),
        Err(dotenvy::Error::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(PatientGuideError::Config(format!(
            "failed to load .env file: {}",
            e
        ))),
    }
}

impl Settings {
    /// Load settings from the configuration file
    pub fn load() -> Result<Self> {
        if let Some(path) = dotenv_outcome(dotenvy::dotenv())? {
            tracing::debug!("Loaded environment from {}", path.display());
        }

        let config_path = Self::config_path()?;

        if !config_path.exists() {
            tracing::debug!("No config file found, using defaults");
            let mut settings = Self::default();
            settings.apply_env_overrides();
            return Ok(settings);
        }

        let mut settings = Self::load_path(&config_path)?;
        settings.apply_env_overrides();

        Ok(settings)
    }

    /// Parse a specific configuration file without applying overrides
    pub fn load_path(path: &PathBuf) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Apply environment variable overrides.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|name| std::env::var(name).ok());
    }

    /// Apply overrides from an arbitrary variable lookup. Blank values are ignored.
    pub fn apply_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let targets = [
            (ENV_API_KEY, &mut self.azure.api_key),
            (ENV_API_VERSION, &mut self.azure.api_version),
            (ENV_ENDPOINT, &mut self.azure.endpoint),
            (ENV_DEPLOYMENT, &mut self.azure.deployment),
        ];

        for (name, slot) in targets {
            if let Some(value) = lookup(name) {
                if !value.trim().is_empty() {
                    *slot = value.trim().to_string();
                }
            }
        }
    }

    /// Get the path to the configuration file
    pub fn config_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("com", "patient-guide", "patient-guide")
            .context("Could not determine config directory")?;

        let config_dir = dirs.config_dir();
        Ok(config_dir.join("config.toml"))
    }

    /// Write default configuration to a file
    pub fn write_default(path: &PathBuf) -> Result<()> {
        let settings = Self::default();
        let content = toml::to_string_pretty(&settings)?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)?;
        Ok(())
    }
}
