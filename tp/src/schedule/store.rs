//! ScheduleStore - sole owner of the itinerary
//!
//! All writes go through the operations below. Out-of-range indices are a
//! silent no-op: the call returns `false` and nothing changes.

use tracing::{debug, info};

use super::types::{Day, Place};

/// Display colors assigned to days by index
pub const DEFAULT_COLORS: [&str; 4] = ["#156bf0", "#f01562", "#15f062", "#f0d215"];

/// Authoritative in-memory itinerary plus per-day display colors
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleStore {
    days: Vec<Day>,
    colors: Vec<String>,
    /// Bumped on every effective mutation so readers can detect changes
    revision: u64,
}

impl Default for ScheduleStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ScheduleStore {
    /// Empty schedule with the default color palette
    pub fn new() -> Self {
        Self::with_colors(DEFAULT_COLORS.iter().map(|c| c.to_string()).collect())
    }

    /// Empty schedule with a custom palette; an empty palette falls back to
    /// the defaults
    pub fn with_colors(colors: Vec<String>) -> Self {
        debug!(?colors, "ScheduleStore::with_colors: called");
        let colors = if colors.is_empty() {
            DEFAULT_COLORS.iter().map(|c| c.to_string()).collect()
        } else {
            colors
        };
        Self {
            days: Vec::new(),
            colors,
            revision: 0,
        }
    }

    pub fn days(&self) -> &[Day] {
        &self.days
    }

    pub fn day(&self, index: usize) -> Option<&Day> {
        self.days.get(index)
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    /// Number of places in `day`, or 0 for an unknown day
    pub fn day_len(&self, day: usize) -> usize {
        self.days.get(day).map(|d| d.plan.len()).unwrap_or(0)
    }

    pub fn total_places(&self) -> usize {
        self.days.iter().map(|d| d.plan.len()).sum()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Owned copy for writing into the transcript or a backup
    pub fn snapshot(&self) -> Vec<Day> {
        self.days.clone()
    }

    pub fn colors(&self) -> &[String] {
        &self.colors
    }

    /// Color for a day index, cycling through the palette
    pub fn color_for_day(&self, day: usize) -> &str {
        &self.colors[day % self.colors.len()]
    }

    /// Replace the whole schedule, renumbering every day
    pub fn replace(&mut self, schedule: Vec<Day>) {
        debug!(days = schedule.len(), "ScheduleStore::replace: called");
        self.days = schedule;
        for day in &mut self.days {
            day.renumber();
        }
        self.bump();
        info!(days = self.days.len(), places = self.total_places(), "Schedule replaced");
    }

    pub fn clear(&mut self) {
        debug!("ScheduleStore::clear: called");
        self.days.clear();
        self.bump();
    }

    /// Delete one place; returns false if either index is out of bounds
    pub fn remove_place(&mut self, day: usize, place: usize) -> bool {
        debug!(day, place, "ScheduleStore::remove_place: called");
        let Some(target) = self.days.get_mut(day) else {
            debug!("ScheduleStore::remove_place: day out of range");
            return false;
        };
        if place >= target.plan.len() {
            debug!("ScheduleStore::remove_place: place out of range");
            return false;
        }
        let removed = target.plan.remove(place);
        target.renumber();
        self.bump();
        info!(day, place = %removed.place, "Place removed");
        true
    }

    /// Move one place, possibly across days
    ///
    /// `target_place` is clamped into `0..=len` of the target day. Within a
    /// single day, an insertion point after the source is shifted back by
    /// one to account for the removal, so dropping a place right after
    /// itself leaves it where it was.
    pub fn move_place(&mut self, source_day: usize, source_place: usize, target_day: usize, target_place: usize) -> bool {
        debug!(
            source_day,
            source_place, target_day, target_place, "ScheduleStore::move_place: called"
        );
        if source_day >= self.days.len() || target_day >= self.days.len() {
            debug!("ScheduleStore::move_place: day out of range");
            return false;
        }
        if source_place >= self.days[source_day].plan.len() {
            debug!("ScheduleStore::move_place: source place out of range");
            return false;
        }

        let mut insert_at = target_place.min(self.days[target_day].plan.len());
        if source_day == target_day && source_place < insert_at {
            insert_at -= 1;
        }

        let moved = self.days[source_day].plan.remove(source_place);
        let name = moved.place.clone();
        self.days[target_day].plan.insert(insert_at, moved);

        self.days[source_day].renumber();
        if target_day != source_day {
            self.days[target_day].renumber();
        }
        self.bump();
        info!(place = %name, source_day, target_day, position = insert_at + 1, "Place moved");
        true
    }

    /// Append a place to a day; returns false for an unknown day
    pub fn add_place(&mut self, day: usize, place: Place) -> bool {
        debug!(day, place = %place.place, "ScheduleStore::add_place: called");
        let Some(target) = self.days.get_mut(day) else {
            debug!("ScheduleStore::add_place: day out of range");
            return false;
        };
        target.plan.push(place);
        target.renumber();
        self.bump();
        true
    }

    /// Append a new empty day
    pub fn add_day(&mut self, day: Day) -> usize {
        debug!(label = %day.day, "ScheduleStore::add_day: called");
        self.days.push(day);
        if let Some(last) = self.days.last_mut() {
            last.renumber();
        }
        self.bump();
        self.days.len() - 1
    }

    /// Rebind a palette slot; returns false for an index outside the palette
    pub fn set_day_color(&mut self, color: impl Into<String>, day: usize) -> bool {
        let color = color.into();
        debug!(%color, day, "ScheduleStore::set_day_color: called");
        let Some(slot) = self.colors.get_mut(day) else {
            debug!("ScheduleStore::set_day_color: index out of range");
            return false;
        };
        *slot = color;
        self.bump();
        true
    }

    fn bump(&mut self) {
        self.revision += 1;
    }
}
