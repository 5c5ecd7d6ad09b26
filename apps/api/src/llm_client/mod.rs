//! LLM Client: the single point of entry for all model calls in the service.
//!
//! ARCHITECTURAL RULE: analysis and generation never talk to the provider
//! directly. They build a `GenerationRequest` and go through `call_json`,
//! which layers retry, empty-payload detection and response parsing on top of
//! an injected `GenerativeModel`.
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

pub mod gemini;
pub mod parser;
pub mod prompts;
pub mod retry;
pub mod schema;

#[cfg(test)]
pub mod testing;

use self::parser::{parse_validated, ValidationMode};
use self::retry::{with_retry, RetryPolicy};
use self::schema::Schema;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status} {code}): {message}")]
    Api {
        status: u16,
        code: String,
        message: String,
    },

    #[error("{0}")]
    EmptyResponse(&'static str),

    #[error("The AI response was not valid JSON.")]
    MalformedResponse(#[source] serde_json::Error),

    #[error("AI response does not match the declared schema: {}", .0.join("; "))]
    SchemaViolation(Vec<String>),
}

/// A single structured-generation request. The response MIME type is always
/// `application/json`; the schema tells the provider which shape to produce.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub prompt: String,
    pub system_instruction: &'static str,
    pub response_schema: Schema,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenUsage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

#[derive(Debug, Clone, Default)]
pub struct GenerationResponse {
    pub text: Option<String>,
    pub usage: Option<TokenUsage>,
}

impl GenerationResponse {
    #[cfg(test)]
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            usage: None,
        }
    }

    /// The text payload, treating an empty string the same as no payload.
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref().filter(|t| !t.is_empty())
    }
}

/// The remote generation call. Implementations perform exactly one provider
/// round-trip; retries are layered above by `call_json`.
///
/// Carried in `AppState` as `Arc<dyn GenerativeModel>`.
#[async_trait]
pub trait GenerativeModel: Send + Sync {
    async fn generate_content(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationResponse, LlmError>;
}

/// Per-call knobs shared by the analysis and generation procedures.
#[derive(Debug, Clone, Copy, Default)]
pub struct CallOptions {
    pub retry: RetryPolicy,
    pub validation: ValidationMode,
}

/// Calls the model under the retry policy and decodes the text payload as `T`.
///
/// `empty_message` is the error surfaced when the provider answers without a
/// text payload; in that case nothing is parsed.
pub async fn call_json<T: DeserializeOwned>(
    llm: &dyn GenerativeModel,
    request: &GenerationRequest,
    options: &CallOptions,
    empty_message: &'static str,
) -> Result<T, LlmError> {
    let response = with_retry(&options.retry, || llm.generate_content(request)).await?;

    if let Some(usage) = response.usage {
        debug!(
            input_tokens = usage.input_tokens,
            output_tokens = usage.output_tokens,
            "LLM call succeeded"
        );
    }

    let text = response
        .text()
        .ok_or(LlmError::EmptyResponse(empty_message))?;

    parse_validated(text, &request.response_schema, options.validation)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use serde::Deserialize;

    use super::testing::ScriptedModel;
    use super::*;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Greeting {
        #[serde(default)]
        hello: String,
    }

    fn request() -> GenerationRequest {
        GenerationRequest {
            prompt: "say hello".to_string(),
            system_instruction: "You are terse.",
            response_schema: Schema::object([("hello", Schema::string())]),
        }
    }

    #[test]
    fn test_empty_string_counts_as_no_payload() {
        assert!(GenerationResponse::from_text("").text().is_none());
        assert!(GenerationResponse::default().text().is_none());
        assert_eq!(GenerationResponse::from_text("{}").text(), Some("{}"));
    }

    #[tokio::test]
    async fn test_call_json_decodes_payload() {
        let model = ScriptedModel::new(vec![Ok(GenerationResponse::from_text(
            "```json\n{\"hello\": \"world\"}\n```",
        ))]);

        let greeting: Greeting = call_json(&model, &request(), &CallOptions::default(), "empty")
            .await
            .unwrap();

        assert_eq!(greeting.hello, "world");
        assert_eq!(model.call_count(), 1);
    }

    #[tokio::test]
    async fn test_call_json_empty_payload_is_not_retried() {
        let model = ScriptedModel::new(vec![Ok(GenerationResponse::default())]);

        let result: Result<Greeting, _> =
            call_json(&model, &request(), &CallOptions::default(), "Nothing came back").await;

        match result {
            Err(LlmError::EmptyResponse(msg)) => assert_eq!(msg, "Nothing came back"),
            other => panic!("expected EmptyResponse, got {other:?}"),
        }
        assert_eq!(model.call_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_call_json_retries_transient_provider_errors() {
        let model = ScriptedModel::new(vec![
            Err(ScriptedModel::overloaded()),
            Ok(GenerationResponse::from_text(r#"{"hello": "again"}"#)),
        ]);
        let options = CallOptions {
            retry: RetryPolicy {
                base_delay: Duration::from_millis(10),
                ..RetryPolicy::default()
            },
            ..CallOptions::default()
        };

        let greeting: Greeting = call_json(&model, &request(), &options, "empty")
            .await
            .unwrap();

        assert_eq!(greeting.hello, "again");
        assert_eq!(model.call_count(), 2);
    }

    #[test]
    fn test_api_error_message_carries_status_and_code() {
        let err = LlmError::Api {
            status: 503,
            code: "UNAVAILABLE".to_string(),
            message: "The model is overloaded.".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("503"));
        assert!(msg.contains("UNAVAILABLE"));
        assert!(msg.contains("overloaded"));
    }
}
