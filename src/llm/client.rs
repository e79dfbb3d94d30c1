use std::time::Duration;

use async_trait::async_trait;

use crate::config::{ConnectionConfig, SamplingSettings};
use crate::llm::azure::AzureOpenAiClient;
use crate::Result;

/// Fixed system message sent ahead of every prompt.
pub const SYSTEM_INSTRUCTION: &str =
    "Assistant is a conversation constructor between the doctor and patient.";

pub const DEFAULT_MAX_TOKENS: u32 = 3000;
pub const DEFAULT_TEMPERATURE: f64 = 0.2;
pub const DEFAULT_TOP_P: f64 = 0.95;

/// One chat-completion call: the user prompt plus sampling parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub prompt: String,
    pub max_tokens: u32,
    pub temperature: f64,
    pub top_p: f64,
}

impl CompletionRequest {
    /// Request with the default sampling parameters.
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            top_p: DEFAULT_TOP_P,
        }
    }

    pub fn with_sampling(mut self, sampling: SamplingSettings) -> Self {
        self.max_tokens = sampling.max_tokens;
        self.temperature = sampling.temperature;
        self.top_p = sampling.top_p;
        self
    }

    pub fn sampling(&self) -> SamplingSettings {
        SamplingSettings {
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            top_p: self.top_p,
        }
    }
}

/// Generated text and usage reported for one call.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionResult {
    pub generated_text: String,
    pub tokens_used: u64,
    pub elapsed: Duration,
}

#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResult>;
}

/// Build the completion client for a validated connection.
pub fn build_client(config: ConnectionConfig) -> Result<Box<dyn CompletionClient>> {
    Ok(Box::new(AzureOpenAiClient::new(config)?))
}

/// Split elapsed wall time into whole hours, minutes and seconds.
pub fn split_elapsed(elapsed: Duration) -> (u64, u64, u64) {
    let total = elapsed.as_secs();
    (total / 3600, (total % 3600) / 60, total % 60)
}
