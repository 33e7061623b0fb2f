//! PlannerClient trait definition

use async_trait::async_trait;

use super::{PlanRequest, PlanResponse, PlannerError};

/// Remote itinerary planner
///
/// Each call is independent. Implementations report failure once; retrying
/// is left to the user resubmitting the form.
#[async_trait]
pub trait PlannerClient: Send + Sync {
    /// Request a day-by-day itinerary
    async fn plan(&self, request: &PlanRequest) -> Result<PlanResponse, PlannerError>;
}
