//! Read-only projections for the map collaborator

use tracing::debug;

use super::store::ScheduleStore;
use super::types::Place;

/// One marker on the map
#[derive(Debug, Clone, PartialEq)]
pub struct MapMarker {
    pub day_index: usize,
    pub day_key: String,
    pub order: u32,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub color: String,
}

impl ScheduleStore {
    /// Places grouped by day key, one entry per day in day order
    ///
    /// Keys are not unique: two days may share a date or an undated label.
    pub fn place_lists(&self) -> Vec<(String, Vec<Place>)> {
        debug!(days = self.len(), "ScheduleStore::place_lists: called");
        self.days()
            .iter()
            .map(|day| (day.key().to_string(), day.plan.clone()))
            .collect()
    }

    /// Markers for every place with coordinates, in visitation order
    pub fn markers(&self) -> Vec<MapMarker> {
        debug!(days = self.len(), "ScheduleStore::markers: called");
        self.days()
            .iter()
            .enumerate()
            .flat_map(|(day_index, day)| {
                let color = self.color_for_day(day_index).to_string();
                day.plan.iter().filter_map(move |place| {
                    let (latitude, longitude) = place.coords()?;
                    Some(MapMarker {
                        day_index,
                        day_key: day.key().to_string(),
                        order: place.order,
                        name: place.place.clone(),
                        latitude,
                        longitude,
                        color: color.clone(),
                    })
                })
            })
            .collect()
    }
}
