//! Plan-input form state

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use super::PlanRequest;
use crate::calendar::DateRange;

/// Travel type tags offered by the form
pub const TRAVEL_TYPE_OPTIONS: [&str; 5] = ["관광", "문화시설", "축제 / 공연 / 행사", "쇼핑", "음식점"];

const DEFAULT_TRANSPORTATION: &str = "자가용";
const DEFAULT_TRAVEL_TYPE: &str = "관광";

/// Why a form cannot be submitted; the message is shown inline
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("여행 요청 내용을 입력해주세요")]
    MissingRequest,

    #[error("여행 기간을 선택해주세요")]
    MissingDates,

    #[error("여행 장소를 입력해주세요")]
    MissingRegion,
}

/// Trip preferences collected before calling the planner
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanForm {
    pub user_input: String,
    pub region: String,
    pub travel_type: Vec<String>,
    pub dates: DateRange,
    pub transportation: String,
    pub companions: String,
    pub pace: String,
}

impl Default for PlanForm {
    fn default() -> Self {
        Self {
            user_input: String::new(),
            region: String::new(),
            travel_type: vec![DEFAULT_TRAVEL_TYPE.to_string()],
            dates: DateRange::empty(),
            transportation: DEFAULT_TRANSPORTATION.to_string(),
            companions: String::new(),
            pace: String::new(),
        }
    }
}

impl PlanForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Back to defaults, date range included
    pub fn reset(&mut self) {
        debug!("PlanForm::reset: called");
        *self = Self::default();
    }

    /// Add or remove a travel type tag
    pub fn toggle_travel_type(&mut self, tag: &str) {
        if let Some(pos) = self.travel_type.iter().position(|t| t == tag) {
            self.travel_type.remove(pos);
        } else {
            self.travel_type.push(tag.to_string());
        }
    }

    /// Checks for a new plan, in the order the form reports them
    pub fn validate(&self) -> Result<(), FormError> {
        debug!(?self, "PlanForm::validate: called");
        self.validate_follow_up()?;
        if !self.dates.is_complete() {
            return Err(FormError::MissingDates);
        }
        if self.region.trim().is_empty() {
            return Err(FormError::MissingRegion);
        }
        Ok(())
    }

    /// A follow-up in an existing chat only needs the request text
    pub fn validate_follow_up(&self) -> Result<(), FormError> {
        if self.user_input.trim().is_empty() {
            return Err(FormError::MissingRequest);
        }
        Ok(())
    }

    pub fn to_request(&self) -> PlanRequest {
        PlanRequest {
            user_input: self.user_input.clone(),
            date: self.dates.to_planner_string(),
            region: self.region.clone(),
            travel_type: self.travel_type.join(","),
            transportation: self.transportation.clone(),
            companions: self.companions.clone(),
            pace: self.pace.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn filled() -> PlanForm {
        PlanForm {
            user_input: "바다가 보이는 곳".into(),
            region: "강릉".into(),
            dates: DateRange::new(
                NaiveDate::from_ymd_opt(2025, 6, 10).unwrap(),
                NaiveDate::from_ymd_opt(2025, 6, 11).unwrap(),
            ),
            ..Default::default()
        }
    }

    #[test]
    fn test_defaults() {
        let form = PlanForm::new();
        assert_eq!(form.transportation, "자가용");
        assert_eq!(form.travel_type, vec!["관광"]);
        assert!(form.dates.is_empty());
    }

    #[test]
    fn test_validation_order() {
        let mut form = PlanForm::new();
        assert_eq!(form.validate(), Err(FormError::MissingRequest));
        form.user_input = "  ".into();
        assert_eq!(form.validate(), Err(FormError::MissingRequest));
        form.user_input = "x".into();
        assert_eq!(form.validate(), Err(FormError::MissingDates));
        form.dates = DateRange::starting(NaiveDate::from_ymd_opt(2025, 6, 10).unwrap());
        assert_eq!(form.validate(), Err(FormError::MissingDates));
        form.dates = filled().dates;
        assert_eq!(form.validate(), Err(FormError::MissingRegion));
        assert_eq!(FormError::MissingRegion.to_string(), "여행 장소를 입력해주세요");
        assert!(filled().validate().is_ok());
    }

    #[test]
    fn test_to_request() {
        let mut form = filled();
        form.toggle_travel_type("쇼핑");
        form.companions = "커플".into();
        form.pace = "여유롭게".into();
        let req = form.to_request();
        assert_eq!(req.date, "2025-06-10 ~ 2025-06-11");
        assert_eq!(req.travel_type, "관광,쇼핑");
        assert_eq!(req.companions, "커플");

        form.toggle_travel_type("관광");
        assert_eq!(form.to_request().travel_type, "쇼핑");
    }

    #[test]
    fn test_reset_clears_dates() {
        let mut form = filled();
        form.reset();
        assert_eq!(form, PlanForm::default());
    }
}
