//! Planner request/response wire types

use serde::{Deserialize, Serialize};

use crate::schedule::Day;

/// Body of `POST /v1/plan`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanRequest {
    /// Free-text request
    pub user_input: String,

    /// `"{start} ~ {end}"`
    pub date: String,

    pub region: String,

    /// Comma-joined tags, e.g. "관광,쇼핑"
    pub travel_type: String,

    pub transportation: String,

    pub companions: String,

    pub pace: String,
}

/// Planner reply
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanResponse {
    #[serde(default)]
    pub text: String,

    #[serde(default)]
    pub travel_schedule: Vec<Day>,
}
