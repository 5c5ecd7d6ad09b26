use axum::Json;
use serde_json::{json, Value};

use crate::llm_client::gemini::MODEL;

/// GET /health
/// Returns a simple status object with service version and model id.
pub async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "mimic-api",
        "model": MODEL
    }))
}
