//! Day and Place wire types
//!
//! Field names match the planner service's JSON.

use serde::{Deserialize, Serialize};
use tracing::debug;

/// One itinerary stop
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    /// 1-based position within the day; derived from array position
    #[serde(default)]
    pub order: u32,

    /// Display name
    #[serde(default)]
    pub place: String,

    #[serde(default)]
    pub address: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub activity: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
}

impl Place {
    /// Create a place with just a name; order is assigned by the store
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            order: 0,
            place: name.into(),
            address: String::new(),
            description: String::new(),
            activity: String::new(),
            image: None,
            latitude: None,
            longitude: None,
        }
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = address.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_activity(mut self, activity: impl Into<String>) -> Self {
        self.activity = activity.into();
        self
    }

    pub fn with_image(mut self, url: impl Into<String>) -> Self {
        self.image = Some(url.into());
        self
    }

    pub fn with_coords(mut self, latitude: f64, longitude: f64) -> Self {
        self.latitude = Some(latitude);
        self.longitude = Some(longitude);
        self
    }

    /// Both coordinates, when the place can be put on a map
    pub fn coords(&self) -> Option<(f64, f64)> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lng)) => Some((lat, lng)),
            _ => None,
        }
    }
}

/// One calendar day of the trip
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Day {
    /// Label such as "1일차"
    pub day: String,

    /// ISO date string
    pub date: String,

    /// Visitation order
    #[serde(default)]
    pub plan: Vec<Place>,
}

impl Day {
    pub fn new(day: impl Into<String>, date: impl Into<String>, plan: Vec<Place>) -> Self {
        let day = Self {
            day: day.into(),
            date: date.into(),
            plan,
        };
        debug!(day = %day.day, places = day.plan.len(), "Day::new: called");
        day
    }

    /// Key used by the map collaborator
    pub fn key(&self) -> &str {
        if self.date.is_empty() { &self.day } else { &self.date }
    }

    /// Whether `plan[i].order == i + 1` for every place
    pub fn is_normalized(&self) -> bool {
        self.plan.iter().enumerate().all(|(i, p)| p.order as usize == i + 1)
    }

    pub(crate) fn renumber(&mut self) {
        for (i, place) in self.plan.iter_mut().enumerate() {
            place.order = i as u32 + 1;
        }
    }
}
