//! Axum route handlers for the Analysis API.

use axum::{extract::State, Json};
use serde::Deserialize;

use crate::analysis::analyzer::{analyze_post, ViralAnalysis};
use crate::errors::AppError;
use crate::state::AppState;

/// References shorter than this (in UTF-16 code units, as browsers count
/// string length) that contain a link are treated as a bare URL.
const MIN_LINK_REFERENCE_CHARS: usize = 50;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    pub reference_content: String,
}

/// Input heuristic applied before any model call: the reference must be
/// non-empty and must be the post text itself, not just a link to it.
pub fn validate_reference(reference_content: &str) -> Result<(), AppError> {
    let trimmed = reference_content.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation(
            "Please provide content to analyze.".to_string(),
        ));
    }
    if trimmed.encode_utf16().count() < MIN_LINK_REFERENCE_CHARS && reference_content.contains("http") {
        return Err(AppError::Validation(
            "Please paste the full text content for deep analysis.".to_string(),
        ));
    }
    Ok(())
}

/// POST /api/v1/analyze
///
/// Stateless analysis of a reference post.
pub async fn handle_analyze(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<ViralAnalysis>, AppError> {
    validate_reference(&request.reference_content)?;

    let analysis = analyze_post(
        state.llm.as_ref(),
        &request.reference_content,
        &state.call_options,
    )
    .await?;

    Ok(Json(analysis))
}
