//! Consultation input and generated document records

use serde::Serialize;
use serde_json::Value;

use crate::{PatientGuideError, Result};

/// Field names accepted in the consultation input document.
pub const INPUT_FIELDS: [&str; 5] = [
    "conversation",
    "language",
    "medicalliteracylevel",
    "agegroup",
    "length",
];

/// Transcript and patient metadata for one consultation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsultationInput {
    /// Doctor-patient conversation transcript
    pub conversation: String,
    /// Language the document should be written in
    pub language: String,
    /// Patient's medical literacy level
    pub medicalliteracylevel: String,
    /// Patient's age group
    pub agegroup: String,
    /// Desired verbosity of the document
    pub length: String,
}

impl ConsultationInput {
    /// Validate a parsed JSON document. Every field must be present and a string;
    /// unrecognised keys are ignored.
    pub fn from_value(value: &Value) -> Result<Self> {
        let object = value.as_object().ok_or_else(|| {
            PatientGuideError::InputValidation(format!(
                "expected a JSON object, got {}",
                json_kind(value)
            ))
        })?;

        let field = |name: &str| -> Result<String> {
            match object.get(name) {
                None => Err(PatientGuideError::InputValidation(format!(
                    "missing field `{}`",
                    name
                ))),
                Some(Value::String(s)) => Ok(s.clone()),
                Some(other) => Err(PatientGuideError::InputValidation(format!(
                    "field `{}` must be a string, got {}",
                    name,
                    json_kind(other)
                ))),
            }
        };

        Ok(Self {
            conversation: field("conversation")?,
            language: field("language")?,
            medicalliteracylevel: field("medicalliteracylevel")?,
            agegroup: field("agegroup")?,
            length: field("length")?,
        })
    }

    /// Parse and validate a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json).map_err(|e| {
            PatientGuideError::InputValidation(format!("input is not valid JSON: {}", e))
        })?;
        Self::from_value(&value)
    }

    /// Look up a field by its input key.
    pub fn field(&self, name: &str) -> Option<&str> {
        match name {
            "conversation" => Some(&self.conversation),
            "language" => Some(&self.language),
            "medicalliteracylevel" => Some(&self.medicalliteracylevel),
            "agegroup" => Some(&self.agegroup),
            "length" => Some(&self.length),
            _ => None,
        }
    }
}

/// Generated document, keyed like the input transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryOutput {
    pub conversation: String,
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
