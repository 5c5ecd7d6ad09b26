//! Axum route handlers for the Generation API.

use axum::{extract::State, Json};
use serde::Deserialize;

use crate::analysis::analyzer::ViralAnalysis;
use crate::errors::AppError;
use crate::generation::generator::{generate_post, GeneratedContent};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    pub analysis: ViralAnalysis,
    pub topic: String,
}

pub fn validate_topic(topic: &str) -> Result<(), AppError> {
    if topic.trim().is_empty() {
        return Err(AppError::Validation(
            "Please provide a topic to write about.".to_string(),
        ));
    }
    Ok(())
}

/// POST /api/v1/generate
///
/// Stateless generation: the caller supplies the full analysis it got from
/// /api/v1/analyze together with the new topic.
pub async fn handle_generate(
    State(state): State<AppState>,
    Json(request): Json<GenerateRequest>,
) -> Result<Json<GeneratedContent>, AppError> {
    validate_topic(&request.topic)?;

    let content = generate_post(
        state.llm.as_ref(),
        &request.analysis,
        &request.topic,
        &state.call_options,
    )
    .await?;

    Ok(Json(content))
}
