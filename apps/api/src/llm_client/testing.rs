//! Test double for `GenerativeModel`: replays a fixed script of outcomes and
//! records every request it receives.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use super::{GenerationRequest, GenerationResponse, GenerativeModel, LlmError};

pub struct ScriptedModel {
    script: Mutex<VecDeque<Result<GenerationResponse, LlmError>>>,
    requests: Mutex<Vec<GenerationRequest>>,
}

impl ScriptedModel {
    pub fn new(script: Vec<Result<GenerationResponse, LlmError>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// A model that answers every call with the same text payload.
    pub fn replying(text: &str, times: usize) -> Self {
        Self::new(
            (0..times)
                .map(|_| Ok(GenerationResponse::from_text(text)))
                .collect(),
        )
    }

    pub fn overloaded() -> LlmError {
        LlmError::Api {
            status: 503,
            code: "UNAVAILABLE".to_string(),
            message: "The model is overloaded. Please try again later.".to_string(),
        }
    }

    pub fn invalid_key() -> LlmError {
        LlmError::Api {
            status: 400,
            code: "INVALID_ARGUMENT".to_string(),
            message: "API key not valid.".to_string(),
        }
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl GenerativeModel for ScriptedModel {
    async fn generate_content(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationResponse, LlmError> {
        self.requests.lock().unwrap().push(request.clone());
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| panic!("ScriptedModel called more times than scripted"))
    }
}
