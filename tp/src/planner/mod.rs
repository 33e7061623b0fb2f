//! Remote planner integration
//!
//! Builds requests from the plan-input form, sends them through a
//! [`PlannerClient`], and applies the reply to the transcript and the
//! schedule store. The request is the only async step; applying its result
//! is a synchronous, all-or-nothing update.

use std::sync::Arc;

use tracing::debug;

pub mod client;
mod error;
mod flow;
mod form;
mod http;
mod types;

pub use client::PlannerClient;
pub use error::PlannerError;
pub use flow::{ERROR_MESSAGE, PendingPlan, SubmitError, begin, begin_follow_up, complete, open_itinerary, submit};
pub use form::{FormError, PlanForm, TRAVEL_TYPE_OPTIONS};
pub use http::HttpPlannerClient;
pub use types::{PlanRequest, PlanResponse};

use crate::config::PlannerConfig;

/// Create the HTTP planner client from config
pub fn create_client(config: &PlannerConfig) -> Result<Arc<dyn PlannerClient>, PlannerError> {
    debug!(base_url = %config.base_url, "create_client: called");
    Ok(Arc::new(HttpPlannerClient::from_config(config)?))
}
