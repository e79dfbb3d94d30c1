//! Immutable connection configuration for the completion service

use std::fmt;
use std::time::Duration;

use reqwest::Url;

use crate::config::settings::{
    Settings, ENV_API_KEY, ENV_API_VERSION, ENV_DEPLOYMENT, ENV_ENDPOINT,
};
use crate::{PatientGuideError, Result};

/// Validated credentials and target for the Azure OpenAI deployment.
///
/// Built once at startup and handed to the client; it is never mutated or
/// reloaded afterwards.
#[derive(Clone, PartialEq)]
pub struct ConnectionConfig {
    api_key: String,
    api_version: String,
    endpoint: Url,
    deployment: String,
    timeout: Duration,
}

impl ConnectionConfig {
    /// Validate the `[azure]` section of already-loaded settings.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let azure = &settings.azure;

        let missing: Vec<&str> = [
            (ENV_API_KEY, &azure.api_key),
            (ENV_API_VERSION, &azure.api_version),
            (ENV_ENDPOINT, &azure.endpoint),
            (ENV_DEPLOYMENT, &azure.deployment),
        ]
        .iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| *name)
        .collect();

        if !missing.is_empty() {
            return Err(PatientGuideError::Config(format!(
                "missing required connection settings: {}",
                missing.join(", ")
            )));
        }

        let endpoint = Url::parse(azure.endpoint.trim().trim_end_matches('/')).map_err(|e| {
            PatientGuideError::Config(format!(
                "{} is not a valid URL ({}): {}",
                ENV_ENDPOINT,
                e,
                azure.endpoint.trim()
            ))
        })?;

        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(PatientGuideError::Config(format!(
                "{} must use http or https, got '{}'",
                ENV_ENDPOINT,
                endpoint.scheme()
            )));
        }

        if azure.timeout_secs == 0 {
            return Err(PatientGuideError::Config(
                "azure.timeout_secs must be greater than zero".to_string(),
            ));
        }

        Ok(Self {
            api_key: azure.api_key.trim().to_string(),
            api_version: azure.api_version.trim().to_string(),
            endpoint,
            deployment: azure.deployment.trim().to_string(),
            timeout: Duration::from_secs(azure.timeout_secs),
        })
    }

    /// Read the four connection variables straight from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable lookup, ignoring any config file.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Settings::default();
        settings.apply_overrides_from(lookup);
        Self::from_settings(&settings)
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn deployment(&self) -> &str {
        &self.deployment
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Full chat-completions URL for the configured deployment.
    pub fn chat_completions_url(&self) -> Result<Url> {
        let mut url = self.endpoint.clone();
        url.path_segments_mut()
            .map_err(|_| {
                PatientGuideError::Config(format!(
                    "{} cannot be used as a base URL: {}",
                    ENV_ENDPOINT, self.endpoint
                ))
            })?
            .pop_if_empty()
            .extend(["openai", "deployments", self.deployment.as_str(), "chat", "completions"]);
        url.query_pairs_mut()
            .append_pair("api-version", &self.api_version);
        Ok(url)
    }
}

impl fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("api_key", &"<redacted>")
            .field("api_version", &self.api_version)
            .field("endpoint", &self.endpoint.as_str())
            .field("deployment", &self.deployment)
            .field("timeout", &self.timeout)
            .finish()
    }
}
