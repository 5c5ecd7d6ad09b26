//! Session lifecycle: the analyze → generate flow as an explicit state machine.
//!
//! IDLE → ANALYZING → ANALYSIS_COMPLETE → GENERATING → GENERATION_COMPLETE,
//! with ERROR reachable from either busy state and RESET returning to IDLE
//! from anywhere. Only one call may be outstanding per session.

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::analysis::analyzer::ViralAnalysis;
use crate::generation::generator::GeneratedContent;

/// What a session shows after a failed call. The real error is only logged.
pub const GENERIC_FAILURE: &str = "Unable to process this request. Please try again.";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionState {
    Idle,
    Analyzing,
    AnalysisComplete {
        analysis: ViralAnalysis,
    },
    Generating {
        analysis: ViralAnalysis,
    },
    GenerationComplete {
        analysis: ViralAnalysis,
        content: GeneratedContent,
    },
    Error {
        message: String,
    },
}

impl SessionState {
    pub fn name(&self) -> &'static str {
        match self {
            SessionState::Idle => "IDLE",
            SessionState::Analyzing => "ANALYZING",
            SessionState::AnalysisComplete { .. } => "ANALYSIS_COMPLETE",
            SessionState::Generating { .. } => "GENERATING",
            SessionState::GenerationComplete { .. } => "GENERATION_COMPLETE",
            SessionState::Error { .. } => "ERROR",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot {action} while the session is {state}")]
pub struct TransitionError {
    pub action: &'static str,
    pub state: &'static str,
}

/// Proof that a call was started. Completing with a ticket from before the
/// latest begin or reset is a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: Uuid,
    #[serde(flatten)]
    state: SessionState,
    #[serde(skip)]
    epoch: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            state: SessionState::Idle,
            epoch: 0,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    fn set(&mut self, state: SessionState) {
        self.state = state;
        self.updated_at = Utc::now();
    }

    fn next_ticket(&mut self) -> Ticket {
        self.epoch += 1;
        Ticket(self.epoch)
    }

    fn refuse(&self, action: &'static str) -> TransitionError {
        TransitionError {
            action,
            state: self.state.name(),
        }
    }

    /// IDLE → ANALYZING.
    pub fn begin_analysis(&mut self) -> Result<Ticket, TransitionError> {
        match self.state {
            SessionState::Idle => {
                self.set(SessionState::Analyzing);
                Ok(self.next_ticket())
            }
            _ => Err(self.refuse("analyze")),
        }
    }

    /// ANALYZING → ANALYSIS_COMPLETE. Returns false for a stale ticket.
    pub fn complete_analysis(&mut self, ticket: Ticket, analysis: ViralAnalysis) -> bool {
        if ticket.0 != self.epoch || self.state != SessionState::Analyzing {
            return false;
        }
        self.set(SessionState::AnalysisComplete { analysis });
        true
    }

    /// ANALYSIS_COMPLETE | GENERATION_COMPLETE → GENERATING. Hands back the
    /// analysis to generate from.
    pub fn begin_generation(&mut self) -> Result<(Ticket, ViralAnalysis), TransitionError> {
        let analysis = match &self.state {
            SessionState::AnalysisComplete { analysis }
            | SessionState::GenerationComplete { analysis, .. } => analysis.clone(),
            _ => return Err(self.refuse("generate")),
        };
        self.set(SessionState::Generating {
            analysis: analysis.clone(),
        });
        Ok((self.next_ticket(), analysis))
    }

    /// GENERATING → GENERATION_COMPLETE, replacing any earlier content.
    /// Returns false for a stale ticket.
    pub fn complete_generation(&mut self, ticket: Ticket, content: GeneratedContent) -> bool {
        if ticket.0 != self.epoch {
            return false;
        }
        let analysis = match &mut self.state {
            SessionState::Generating { analysis } => std::mem::take(analysis),
            _ => return false,
        };
        self.set(SessionState::GenerationComplete { analysis, content });
        true
    }

    /// ANALYZING | GENERATING → ERROR. Returns false for a stale ticket.
    pub fn fail(&mut self, ticket: Ticket) -> bool {
        let busy = matches!(
            self.state,
            SessionState::Analyzing | SessionState::Generating { .. }
        );
        if ticket.0 != self.epoch || !busy {
            return false;
        }
        self.set(SessionState::Error {
            message: GENERIC_FAILURE.to_string(),
        });
        true
    }

    /// Any state → IDLE. Drops the analysis and generated content and
    /// invalidates outstanding tickets.
    pub fn reset(&mut self) {
        self.epoch += 1;
        self.set(SessionState::Idle);
    }
}
