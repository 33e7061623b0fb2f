//! Itinerary model and the schedule store
//!
//! A schedule is an ordered list of [`Day`]s, each holding an ordered list of
//! [`Place`]s. The [`ScheduleStore`] is the only writer; every mutation
//! re-derives `order` so that `plan[i].order == i + 1` holds afterward.

mod map;
mod store;
mod types;

pub use map::MapMarker;
pub use store::{DEFAULT_COLORS, ScheduleStore};
pub use types::{Day, Place};
