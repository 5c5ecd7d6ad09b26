//! Gemini `generateContent` REST client: the production `GenerativeModel`.
//!
//! Model: gemini-2.0-flash (hardcoded, not configurable).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::schema::Schema;
use super::{GenerationRequest, GenerationResponse, GenerativeModel, LlmError, TokenUsage};

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";
/// The model used for every analysis and generation call.
pub const MODEL: &str = "gemini-2.0-flash";
const RESPONSE_MIME_TYPE: &str = "application/json";
const TRANSPORT_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest<'a> {
    contents: Vec<Content<'a>>,
    system_instruction: Content<'a>,
    generation_config: GenerationConfig<'a>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig<'a> {
    response_mime_type: &'a str,
    response_schema: &'a Schema,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    prompt_token_count: u32,
    #[serde(default)]
    candidates_token_count: u32,
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    error: GeminiErrorBody,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    message: String,
    #[serde(default)]
    status: String,
}

impl GeminiResponse {
    /// Concatenated text parts of the first candidate.
    fn into_generation_response(self) -> GenerationResponse {
        let text = self
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|p| p.text)
                    .collect::<String>()
            })
            .filter(|t| !t.is_empty());

        GenerationResponse {
            text,
            usage: self.usage_metadata.map(|u| TokenUsage {
                input_tokens: u.prompt_token_count,
                output_tokens: u.candidates_token_count,
            }),
        }
    }
}

/// Builds the request body for a structured-generation call.
fn build_request(request: &GenerationRequest) -> GeminiRequest<'_> {
    GeminiRequest {
        contents: vec![Content {
            role: Some("user"),
            parts: vec![Part {
                text: &request.prompt,
            }],
        }],
        system_instruction: Content {
            role: None,
            parts: vec![Part {
                text: request.system_instruction,
            }],
        },
        generation_config: GenerationConfig {
            response_mime_type: RESPONSE_MIME_TYPE,
            response_schema: &request.response_schema,
        },
    }
}

/// Maps a non-success response body to `LlmError::Api`, keeping the provider
/// status string (e.g. `UNAVAILABLE`) in the error so retry classification sees it.
fn api_error(status: u16, body: String) -> LlmError {
    match serde_json::from_str::<GeminiError>(&body) {
        Ok(parsed) => LlmError::Api {
            status,
            code: parsed.error.status,
            message: parsed.error.message,
        },
        Err(_) => LlmError::Api {
            status,
            code: String::new(),
            message: body,
        },
    }
}

/// Provider handle. Constructed once at startup and shared via `AppState`.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
}

impl GeminiClient {
    pub fn new(api_key: String) -> Result<Self, LlmError> {
        Ok(Self {
            client: Client::builder().timeout(TRANSPORT_TIMEOUT).build()?,
            api_key,
        })
    }
}

#[async_trait]
impl GenerativeModel for GeminiClient {
    async fn generate_content(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationResponse, LlmError> {
        let url = format!("{GEMINI_API_BASE}/{MODEL}:generateContent");

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&build_request(request))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Gemini API returned {}: {}", status, body);
            return Err(api_error(status.as_u16(), body));
        }

        let body: GeminiResponse = response.json().await?;
        Ok(body.into_generation_response())
    }
}
