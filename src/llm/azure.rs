use std::time::Instant;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::ConnectionConfig;
use crate::llm::client::{
    split_elapsed, CompletionClient, CompletionRequest, CompletionResult, SYSTEM_INSTRUCTION,
};
use crate::{PatientGuideError, Result};

pub struct AzureOpenAiClient {
    http: Client,
    config: ConnectionConfig,
}

impl AzureOpenAiClient {
    pub fn new(config: ConnectionConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| {
                PatientGuideError::Transport(format!("failed to build HTTP client: {}", e))
            })?;

        Ok(Self { http, config })
    }
}

#[async_trait]
impl CompletionClient for AzureOpenAiClient {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResult> {
        let url = self.config.chat_completions_url()?;

        let body = ChatCompletionRequest {
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_INSTRUCTION,
                },
                ChatMessage {
                    role: "user",
                    content: &request.prompt,
                },
            ],
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            top_p: request.top_p,
        };

        tracing::debug!(
            deployment = self.config.deployment(),
            max_tokens = request.max_tokens,
            temperature = request.temperature,
            top_p = request.top_p,
            prompt_chars = request.prompt.chars().count(),
            "Sending chat completion request"
        );

        let started = Instant::now();

        let response = self
            .http
            .post(url)
            .header("api-key", self.config.api_key())
            .json(&body)
            .send()
            .await
            .map_err(|e| PatientGuideError::Transport(format!("request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(PatientGuideError::Transport(describe_error_status(
                status, &text,
            )));
        }

        let payload: ChatCompletionResponse = response.json().await.map_err(|e| {
            PatientGuideError::Transport(format!("malformed response: {}", e))
        })?;

        let elapsed = started.elapsed();

        let generated_text = payload
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| {
                PatientGuideError::Transport(
                    "malformed response: no generated message content".to_string(),
                )
            })?;

        let tokens_used = payload.usage.map(|u| u.total_tokens).unwrap_or(0);

        let (hours, minutes, seconds) = split_elapsed(elapsed);
        tracing::info!(
            "The time difference is: {} hours, {} minutes, {} seconds",
            hours,
            minutes,
            seconds
        );
        tracing::info!("The number of tokens being used are {}", tokens_used);

        Ok(CompletionResult {
            generated_text,
            tokens_used,
            elapsed,
        })
    }
}

fn describe_error_status(status: reqwest::StatusCode, body: &str) -> String {
    let detail = serde_json::from_str::<ErrorEnvelope>(body)
        .ok()
        .map(|envelope| envelope.error.message)
        .unwrap_or_else(|| body.trim().to_string());

    if detail.is_empty() {
        format!("service returned {}", status)
    } else {
        format!("service returned {}: {}", status, detail)
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f64,
    top_p: f64,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
    usage: Option<ChatUsage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatUsage {
    #[serde(default)]
    total_tokens: u64,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}
