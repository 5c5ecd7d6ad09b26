//! Axum route handlers for session-scoped analyze → generate flows.
//!
//! Each call moves the session into a busy state under the store lock,
//! releases the lock for the model call, then settles the outcome. A result
//! that arrives after the session was reset or deleted is dropped.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::analysis::analyzer::analyze_post;
use crate::analysis::handlers::{validate_reference, AnalyzeRequest};
use crate::errors::AppError;
use crate::generation::generator::generate_post;
use crate::generation::handlers::validate_topic;
use crate::session::state::Session;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SessionGenerateRequest {
    pub topic: String,
}

fn not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Session {id} not found"))
}

/// POST /api/v1/sessions
pub async fn handle_create_session(
    State(state): State<AppState>,
) -> (StatusCode, Json<Session>) {
    let session = state.sessions.create().await;
    info!("Created session {}", session.id);
    (StatusCode::CREATED, Json(session))
}

/// GET /api/v1/sessions/:id
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Session>, AppError> {
    state
        .sessions
        .get(id)
        .await
        .map(Json)
        .ok_or_else(|| not_found(id))
}

/// DELETE /api/v1/sessions/:id
pub async fn handle_delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if state.sessions.remove(id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}

/// POST /api/v1/sessions/:id/reset
pub async fn handle_reset_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Session>, AppError> {
    state
        .sessions
        .update(id, |session| {
            session.reset();
            session.clone()
        })
        .await
        .map(Json)
        .ok_or_else(|| not_found(id))
}

/// POST /api/v1/sessions/:id/analyze
///
/// IDLE → ANALYZING → ANALYSIS_COMPLETE (or ERROR).
pub async fn handle_session_analyze(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<Session>, AppError> {
    validate_reference(&request.reference_content)?;

    let ticket = state
        .sessions
        .update(id, |session| session.begin_analysis())
        .await
        .ok_or_else(|| not_found(id))??;

    let outcome = analyze_post(
        state.llm.as_ref(),
        &request.reference_content,
        &state.call_options,
    )
    .await;

    let settled = state
        .sessions
        .update(id, |session| {
            let applied = match &outcome {
                Ok(analysis) => session.complete_analysis(ticket, analysis.clone()),
                Err(_) => session.fail(ticket),
            };
            (applied, session.clone())
        })
        .await;

    match &settled {
        Some((true, session)) => info!("Session {id} is now {}", session.state().name()),
        Some((false, _)) => warn!("Session {id} was reset during analysis; result dropped"),
        None => warn!("Session {id} was deleted during analysis; result dropped"),
    }

    outcome?;
    settled
        .map(|(_, session)| Json(session))
        .ok_or_else(|| not_found(id))
}

/// POST /api/v1/sessions/:id/generate
///
/// ANALYSIS_COMPLETE | GENERATION_COMPLETE → GENERATING → GENERATION_COMPLETE
/// (or ERROR).
pub async fn handle_session_generate(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<SessionGenerateRequest>,
) -> Result<Json<Session>, AppError> {
    validate_topic(&request.topic)?;

    let (ticket, analysis) = state
        .sessions
        .update(id, |session| session.begin_generation())
        .await
        .ok_or_else(|| not_found(id))??;

    let outcome = generate_post(
        state.llm.as_ref(),
        &analysis,
        &request.topic,
        &state.call_options,
    )
    .await;

    let settled = state
        .sessions
        .update(id, |session| {
            let applied = match &outcome {
                Ok(content) => session.complete_generation(ticket, content.clone()),
                Err(_) => session.fail(ticket),
            };
            (applied, session.clone())
        })
        .await;

    match &settled {
        Some((true, session)) => info!("Session {id} is now {}", session.state().name()),
        Some((false, _)) => warn!("Session {id} was reset during generation; result dropped"),
        None => warn!("Session {id} was deleted during generation; result dropped"),
    }

    outcome?;
    settled
        .map(|(_, session)| Json(session))
        .ok_or_else(|| not_found(id))
}
