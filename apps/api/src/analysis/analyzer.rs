//! Analysis: turns a reference post into a structured `ViralAnalysis`.
//!
//! Flow: fill prompt → retrying structured call → parse six-field payload →
//!       attach the reference text as `originalContent`.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Number, Value};
use tracing::info;

use crate::analysis::prompts::{ANALYSIS_PROMPT_TEMPLATE, ANALYSIS_SYSTEM};
use crate::llm_client::parser::null_as_default;
use crate::llm_client::prompts::fill_template;
use crate::llm_client::schema::Schema;
use crate::llm_client::{call_json, CallOptions, GenerationRequest, GenerativeModel, LlmError};

const EMPTY_ANALYSIS: &str = "Failed to analyze content";

/// Structured result of analysing a reference post.
///
/// `original_content` is not produced by the model; it is the reference text
/// the analysis came from, kept so generation needs nothing else. Keys the
/// model adds beyond the declared shape are carried in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViralAnalysis {
    pub hook_strategy: String,
    pub tone: String,
    pub formatting_features: Vec<String>,
    /// Model estimate, nominally 0–100. Not clamped, and kept as whatever
    /// JSON number the model returned.
    pub virality_score: Number,
    pub keywords: Vec<String>,
    pub emotional_arc: String,
    pub original_content: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for ViralAnalysis {
    fn default() -> Self {
        Self {
            hook_strategy: String::new(),
            tone: String::new(),
            formatting_features: Vec::new(),
            virality_score: zero_score(),
            keywords: Vec::new(),
            emotional_arc: String::new(),
            original_content: String::new(),
            extra: Map::new(),
        }
    }
}

fn zero_score() -> Number {
    Number::from(0)
}

fn score_or_zero<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Number, D::Error> {
    Ok(Option::<Number>::deserialize(deserializer)?.unwrap_or_else(zero_score))
}

/// The part of `ViralAnalysis` the model is asked to produce.
///
/// Absent or `null` fields decode to empty values; strict validation is where
/// they get rejected.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnalysisPayload {
    #[serde(default, deserialize_with = "null_as_default")]
    hook_strategy: String,
    #[serde(default, deserialize_with = "null_as_default")]
    tone: String,
    #[serde(default, deserialize_with = "null_as_default")]
    formatting_features: Vec<String>,
    #[serde(default = "zero_score", deserialize_with = "score_or_zero")]
    virality_score: Number,
    #[serde(default, deserialize_with = "null_as_default")]
    keywords: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    emotional_arc: String,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl AnalysisPayload {
    fn into_analysis(self, reference_content: &str) -> ViralAnalysis {
        ViralAnalysis {
            hook_strategy: self.hook_strategy,
            tone: self.tone,
            formatting_features: self.formatting_features,
            virality_score: self.virality_score,
            keywords: self.keywords,
            emotional_arc: self.emotional_arc,
            original_content: reference_content.to_string(),
            extra: self.extra,
        }
    }
}

/// Output shape requested from the provider.
pub fn analysis_schema() -> Schema {
    Schema::object([
        (
            "hookStrategy",
            Schema::string().describe("The specific type of hook used (e.g., 'The Bait-and-Switch')"),
        ),
        (
            "tone",
            Schema::string().describe("The emotional tone (e.g., 'Vulnerable yet authoritative')"),
        ),
        (
            "formattingFeatures",
            Schema::array(Schema::string()).describe(
                "List of formatting styles (e.g., 'Single sentence paragraphs', 'Bullet points with emojis')",
            ),
        ),
        ("viralityScore", Schema::integer().describe("Score from 0-100")),
        (
            "keywords",
            Schema::array(Schema::string())
                .describe("Keywords found in the reference that aid discovery"),
        ),
        (
            "emotionalArc",
            Schema::string().describe("How the post moves the reader emotionally"),
        ),
    ])
}

pub fn build_analysis_request(reference_content: &str) -> GenerationRequest {
    GenerationRequest {
        prompt: fill_template(
            ANALYSIS_PROMPT_TEMPLATE,
            &[("reference_content", reference_content)],
        ),
        system_instruction: ANALYSIS_SYSTEM,
        response_schema: analysis_schema(),
    }
}

/// Analyses a reference post. The caller is responsible for rejecting empty input.
pub async fn analyze_post(
    llm: &dyn GenerativeModel,
    reference_content: &str,
    options: &CallOptions,
) -> Result<ViralAnalysis, LlmError> {
    let request = build_analysis_request(reference_content);

    let payload: AnalysisPayload = call_json(llm, &request, options, EMPTY_ANALYSIS).await?;
    let analysis = payload.into_analysis(reference_content);

    info!(
        hook = %analysis.hook_strategy,
        virality_score = %analysis.virality_score,
        features = analysis.formatting_features.len(),
        "Reference post analyzed"
    );

    Ok(analysis)
}
