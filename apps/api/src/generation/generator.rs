//! Post Generation: writes a new post on a topic in the style of an analysed
//! reference.
//!
//! Flow: capture wall-clock time → fill prompt from the analysis → retrying
//!       structured call → parse straight into `GeneratedContent`.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::info;

use crate::analysis::analyzer::ViralAnalysis;
use crate::generation::prompts::{GENERATION_PROMPT_TEMPLATE, GENERATION_SYSTEM};
use crate::llm_client::parser::null_as_default;
use crate::llm_client::prompts::fill_template;
use crate::llm_client::schema::Schema;
use crate::llm_client::{call_json, CallOptions, GenerationRequest, GenerativeModel, LlmError};

const EMPTY_GENERATION: &str = "Failed to generate post";

/// Locale-style timestamp shown to the model, e.g. `3/14/2026, 9:05:00 AM`.
const PROMPT_TIME_FORMAT: &str = "%-m/%-d/%Y, %-I:%M:%S %p";

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

/// A newly generated post plus the model's rationale and posting advice.
///
/// Passed through as the model wrote it: absent or `null` fields take empty
/// values and unknown keys are kept in `extra`. Strict validation is where
/// missing fields get rejected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedContent {
    #[serde(default, deserialize_with = "null_as_default")]
    pub post_content: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub why_it_works: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub posting_advice: PostingAdvice,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostingAdvice {
    #[serde(default, deserialize_with = "null_as_default")]
    pub best_time: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub reason: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// ────────────────────────────────────────────────────────────────────────────
// Request construction
// ────────────────────────────────────────────────────────────────────────────

/// Output shape requested from the provider.
pub fn generation_schema() -> Schema {
    Schema::object([
        (
            "postContent",
            Schema::string().describe("The newly generated post text"),
        ),
        (
            "whyItWorks",
            Schema::array(Schema::string()).describe(
                "How specific hooks, patterns, and storytelling elements were transferred from the reference to this new post",
            ),
        ),
        (
            "postingAdvice",
            Schema::object([
                (
                    "bestTime",
                    Schema::string().describe("Suggested day/hour to post, relative to now"),
                ),
                (
                    "reason",
                    Schema::string().describe("Why this time works for this content"),
                ),
            ]),
        ),
    ])
}

/// Builds the generation prompt. `current_date_time` is flavour text for the
/// posting-time advice and is never parsed back.
pub fn build_generation_prompt(
    analysis: &ViralAnalysis,
    topic: &str,
    current_date_time: &str,
) -> String {
    let formatting = analysis.formatting_features.join(", ");

    fill_template(
        GENERATION_PROMPT_TEMPLATE,
        &[
            ("original_content", analysis.original_content.as_str()),
            ("hook_strategy", analysis.hook_strategy.as_str()),
            ("tone", analysis.tone.as_str()),
            ("formatting", formatting.as_str()),
            ("topic", topic),
            ("current_date_time", current_date_time),
        ],
    )
}

pub fn build_generation_request(
    analysis: &ViralAnalysis,
    topic: &str,
    now: DateTime<Local>,
) -> GenerationRequest {
    let current_date_time = now.format(PROMPT_TIME_FORMAT).to_string();

    GenerationRequest {
        prompt: build_generation_prompt(analysis, topic, &current_date_time),
        system_instruction: GENERATION_SYSTEM,
        response_schema: generation_schema(),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Generation
// ────────────────────────────────────────────────────────────────────────────

/// Generates a post about `topic` mirroring the analysed reference.
/// The decoded payload is returned as-is.
pub async fn generate_post(
    llm: &dyn GenerativeModel,
    analysis: &ViralAnalysis,
    topic: &str,
    options: &CallOptions,
) -> Result<GeneratedContent, LlmError> {
    let request = build_generation_request(analysis, topic, Local::now());

    let content: GeneratedContent = call_json(llm, &request, options, EMPTY_GENERATION).await?;

    info!(
        chars = content.post_content.chars().count(),
        best_time = %content.posting_advice.best_time,
        "Post generated"
    );

    Ok(content)
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
