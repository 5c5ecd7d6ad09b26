use std::sync::Arc;

use chrono::Duration;

use crate::config::Config;
use crate::llm_client::parser::ValidationMode;
use crate::llm_client::{CallOptions, GenerativeModel};
use crate::session::store::SessionStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Provider handle, built once at startup. Tests swap in a scripted model.
    pub llm: Arc<dyn GenerativeModel>,
    pub call_options: CallOptions,
    pub sessions: SessionStore,
}

impl AppState {
    pub fn new(llm: Arc<dyn GenerativeModel>, config: &Config) -> Self {
        let validation = if config.strict_validation {
            ValidationMode::Strict
        } else {
            ValidationMode::Lenient
        };

        Self {
            llm,
            call_options: CallOptions {
                validation,
                ..CallOptions::default()
            },
            sessions: SessionStore::new(Duration::minutes(config.session_ttl_minutes)),
        }
    }
}
