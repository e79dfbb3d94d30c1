//! LLM module for patient-guide
//!
//! Handles the chat-completion call to Azure OpenAI and the instructional
//! prompt it is given.

mod azure;
mod client;
mod prompts;

pub use azure::AzureOpenAiClient;
pub use client::{
    build_client, split_elapsed, CompletionClient, CompletionRequest, CompletionResult,
    DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE, DEFAULT_TOP_P, SYSTEM_INSTRUCTION,
};
pub use prompts::{
    build_patient_education_prompt, render_template, PATIENT_EDUCATION_TEMPLATE, SECTION_HEADERS,
};
