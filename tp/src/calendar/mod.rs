//! Date range picker
//!
//! A self-contained calendar state machine producing a validated
//! `(start, end)` pair bounded by [`MAX_DAYS`]. The picker never owns the
//! selection: every interaction takes the current [`DateRange`] and returns
//! the next one, leaving storage to the caller.

mod month;
mod picker;
mod range;

pub use month::YearMonth;
pub use picker::{CalendarCell, DateRangePicker, MonthPanel, PanelNav, WEEKDAYS};
pub use range::{DateRange, MAX_DAYS, apply_click, format_range, parse_date, today_local};
