//! Patient-education document generation

use serde_json::Value;

use crate::config::{ConnectionConfig, SamplingSettings};
use crate::llm::{build_client, build_patient_education_prompt, CompletionClient, CompletionRequest};
use crate::summary::models::{ConsultationInput, SummaryOutput};
use crate::Result;

/// Renders the instructional prompt for a consultation and asks the
/// completion client for the document.
///
/// Holds no per-call state, so one builder can serve any number of
/// independent (including concurrent) calls.
pub struct SummaryBuilder {
    client: Box<dyn CompletionClient>,
    sampling: SamplingSettings,
}

impl SummaryBuilder {
    pub fn new(client: Box<dyn CompletionClient>) -> Self {
        Self {
            client,
            sampling: SamplingSettings::default(),
        }
    }

    /// Builder backed by the Azure OpenAI client for `config`.
    pub fn from_connection(config: ConnectionConfig) -> Result<Self> {
        Ok(Self::new(build_client(config)?))
    }

    pub fn with_sampling(mut self, sampling: SamplingSettings) -> Self {
        self.sampling = sampling;
        self
    }

    /// Generate the document for an already validated input.
    pub async fn build_summary(&self, input: &ConsultationInput) -> Result<SummaryOutput> {
        self.sampling.validate()?;
        let prompt = build_patient_education_prompt(input)?;

        tracing::info!(
            language = %input.language,
            length = %input.length,
            "Generating patient education document"
        );

        let result = self
            .client
            .complete(CompletionRequest::new(prompt).with_sampling(self.sampling))
            .await?;

        Ok(SummaryOutput {
            conversation: result.generated_text,
        })
    }

    /// Validate a raw JSON input document, then generate. Invalid input never
    /// reaches the completion client.
    pub async fn build_summary_value(&self, value: &Value) -> Result<SummaryOutput> {
        let input = ConsultationInput::from_value(value)?;
        self.build_summary(&input).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::CompletionResult;
    use crate::PatientGuideError;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    enum Reply {
        Fixed(&'static str),
        EchoPrompt,
        Fail,
    }

    struct MockClient {
        reply: Reply,
        requests: Arc<Mutex<Vec<CompletionRequest>>>,
    }

    impl MockClient {
        fn boxed(reply: Reply) -> (Box<dyn CompletionClient>, Arc<Mutex<Vec<CompletionRequest>>>) {
            let requests = Arc::new(Mutex::new(Vec::new()));
            let client = Self {
                reply,
                requests: Arc::clone(&requests),
            };
            (Box::new(client), requests)
        }
    }

    #[async_trait]
    impl CompletionClient for MockClient {
        async fn complete(&self, request: CompletionRequest) -> Result<CompletionResult> {
            self.requests.lock().unwrap().push(request.clone());

            let generated_text = match self.reply {
                Reply::Fixed(text) => text.to_string(),
                Reply::EchoPrompt => request.prompt,
                Reply::Fail => {
                    return Err(PatientGuideError::Transport(
                        "service returned 503 Service Unavailable".to_string(),
                    ))
                }
            };

            Ok(CompletionResult {
                generated_text,
                tokens_used: 7,
                elapsed: Duration::from_millis(1),
            })
        }
    }

    fn input_value(conversation: &str, language: &str) -> Value {
        json!({
            "conversation": conversation,
            "language": language,
            "medicalliteracylevel": "basic",
            "agegroup": "60-70",
            "length": "detailed"
        })
    }

    #[tokio::test]
    async fn wraps_generated_text_under_conversation_key() {
        let (client, _) = MockClient::boxed(Reply::Fixed("T"));
        let builder = SummaryBuilder::new(client);

        let output = builder
            .build_summary_value(&input_value("Hello doctor", "English"))
            .await
            .unwrap();

        assert_eq!(serde_json::to_value(&output).unwrap(), json!({ "conversation": "T" }));
    }

    #[tokio::test]
    async fn missing_field_fails_before_any_request() {
        let (client, requests) = MockClient::boxed(Reply::Fixed("T"));
        let builder = SummaryBuilder::new(client);

        let mut value = input_value("Hello doctor", "English");
        value.as_object_mut().unwrap().remove("language");

        let err = builder.build_summary_value(&value).await.unwrap_err();
        assert!(err.is_input_validation());
        assert!(requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn sends_rendered_prompt_with_default_sampling() {
        let (client, requests) = MockClient::boxed(Reply::Fixed("T"));
        let builder = SummaryBuilder::new(client);

        builder
            .build_summary_value(&input_value("Hello doctor", "English"))
            .await
            .unwrap();

        let requests = requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        let request = &requests[0];
        assert_eq!(request.max_tokens, 3000);
        assert_eq!(request.temperature, 0.2);
        assert_eq!(request.top_p, 0.95);
        assert!(request.prompt.contains("Hello doctor"));
        assert!(request.prompt.contains("age group of 60-70"));
    }

    #[tokio::test]
    async fn configured_sampling_is_forwarded() {
        let (client, requests) = MockClient::boxed(Reply::Fixed("T"));
        let sampling = SamplingSettings {
            max_tokens: 1200,
            temperature: 0.0,
            top_p: 1.0,
        };
        let builder = SummaryBuilder::new(client).with_sampling(sampling);

        builder
            .build_summary_value(&input_value("Hello doctor", "English"))
            .await
            .unwrap();

        assert_eq!(requests.lock().unwrap()[0].sampling(), sampling);
    }

    #[tokio::test]
    async fn invalid_sampling_fails_before_any_request() {
        let (client, requests) = MockClient::boxed(Reply::Fixed("T"));
        let builder = SummaryBuilder::new(client).with_sampling(SamplingSettings {
            max_tokens: 3000,
            temperature: 2.0,
            top_p: 0.95,
        });

        let err = builder
            .build_summary_value(&input_value("Hello doctor", "English"))
            .await
            .unwrap_err();
        assert!(err.is_config());
        assert!(requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn transport_failure_propagates() {
        let (client, requests) = MockClient::boxed(Reply::Fail);
        let builder = SummaryBuilder::new(client);

        let err = builder
            .build_summary_value(&input_value("Hello doctor", "English"))
            .await
            .unwrap_err();

        assert!(err.is_transport());
        assert!(err.to_string().contains("503"));
        assert_eq!(requests.lock().unwrap().len(), 1);
    }

    #[test]
    fn calls_are_independent_of_order() {
        let first = input_value("Patient reports knee pain", "English");
        let second = input_value("Paciente con fiebre", "Spanish");

        for order in [[&first, &second], [&second, &first]] {
            let (client, _) = MockClient::boxed(Reply::EchoPrompt);
            let builder = SummaryBuilder::new(client);

            for value in order {
                let output = tokio_test::block_on(builder.build_summary_value(value)).unwrap();
                let conversation = value["conversation"].as_str().unwrap();
                let language = value["language"].as_str().unwrap();
                assert!(output.conversation.contains(conversation));
                assert!(output.conversation.contains(&format!("in {} language", language)));

                let other = if value == &first { &second } else { &first };
                assert!(!output
                    .conversation
                    .contains(other["conversation"].as_str().unwrap()));
            }
        }
    }

    #[tokio::test]
    async fn concurrent_calls_do_not_interfere() {
        let (client, requests) = MockClient::boxed(Reply::EchoPrompt);
        let builder = SummaryBuilder::new(client);

        let a = input_value("Transcript A", "English");
        let b = input_value("Transcript B", "French");
        let (out_a, out_b) = tokio::join!(
            builder.build_summary_value(&a),
            builder.build_summary_value(&b)
        );

        let out_a = out_a.unwrap();
        let out_b = out_b.unwrap();
        assert!(out_a.conversation.contains("Transcript A"));
        assert!(!out_a.conversation.contains("Transcript B"));
        assert!(out_b.conversation.contains("Transcript B"));
        assert!(out_b.conversation.contains("in French language"));
        assert_eq!(requests.lock().unwrap().len(), 2);
    }
}
