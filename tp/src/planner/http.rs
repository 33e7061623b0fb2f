//! HTTP planner client
//!
//! POSTs the request as JSON to `{base_url}/v1/plan`.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};

use super::{PlanRequest, PlanResponse, PlannerClient, PlannerError};
use crate::config::PlannerConfig;

/// reqwest-backed planner client
pub struct HttpPlannerClient {
    base_url: String,
    http: Client,
    timeout: Duration,
}

impl HttpPlannerClient {
    pub fn from_config(config: &PlannerConfig) -> Result<Self, PlannerError> {
        debug!(?config, "from_config: called");
        let timeout = Duration::from_millis(config.timeout_ms);
        let http = Client::builder().timeout(timeout).build().map_err(PlannerError::Network)?;
        Ok(Self {
            base_url: config.base_url.clone(),
            http,
            timeout,
        })
    }

    /// Full URL of the plan endpoint
    pub fn endpoint(&self) -> String {
        format!("{}/v1/plan", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl PlannerClient for HttpPlannerClient {
    async fn plan(&self, request: &PlanRequest) -> Result<PlanResponse, PlannerError> {
        let url = self.endpoint();
        debug!(%url, region = %request.region, date = %request.date, "plan: called");

        let response = self.http.post(&url).json(request).send().await.map_err(|e| {
            if e.is_timeout() {
                PlannerError::Timeout(self.timeout)
            } else {
                PlannerError::Network(e)
            }
        })?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            warn!(status = status.as_u16(), "plan: planner returned error status");
            return Err(PlannerError::ApiError {
                status: status.as_u16(),
                message: body,
            });
        }

        let parsed: PlanResponse = serde_json::from_str(&body)?;
        debug!(days = parsed.travel_schedule.len(), "plan: parsed response");
        Ok(parsed)
    }
}
