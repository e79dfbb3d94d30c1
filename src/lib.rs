//! patient-guide - Patient-education documents from consultation transcripts
//!
//! Renders a fixed instructional prompt from a consultation transcript and
//! patient metadata, and asks a hosted chat-completion model to write the
//! document.

pub mod cli;
pub mod config;
pub mod llm;
pub mod summary;

use thiserror::Error;

/// Main error type for patient-guide
#[derive(Error, Debug)]
pub enum PatientGuideError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InputValidation(String),

    #[error("Completion request failed: {0}")]
    Transport(String),
}

impl PatientGuideError {
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }

    pub fn is_input_validation(&self) -> bool {
        matches!(self, Self::InputValidation(_))
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

pub type Result<T> = std::result::Result<T, PatientGuideError>;
