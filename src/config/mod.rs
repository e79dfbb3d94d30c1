//! Configuration module for patient-guide
//!
//! Handles loading settings from TOML files and the environment, and
//! validating them into a [`ConnectionConfig`].

mod connection;
mod settings;

pub use connection::ConnectionConfig;
pub use settings::{
    AzureSettings, SamplingSettings, Settings, ENV_API_KEY, ENV_API_VERSION,
    ENV_DEPLOYMENT, ENV_ENDPOINT,
};
