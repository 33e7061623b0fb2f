//! Planner error types

use std::time::Duration;
use thiserror::Error;

/// Errors from a planner request
///
/// Every variant is reported once on the originating chat message; the core
/// never retries.
#[derive(Debug, Error)]
pub enum PlannerError {
    #[error("API error {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Timeout after {0:?}")]
    Timeout(Duration),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl PlannerError {
    /// Whether resubmitting the same request might succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            PlannerError::ApiError { status, .. } => *status >= 500 || *status == 429,
            PlannerError::Network(_) => true,
            PlannerError::Timeout(_) => true,
            PlannerError::InvalidResponse(_) => false,
            PlannerError::Json(_) => false,
        }
    }
}
