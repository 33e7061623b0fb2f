//! DateRange value and the day-click state machine

use chrono::{Datelike, Days, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Maximum trip length in days, counting both the first and the last day
pub const MAX_DAYS: u64 = 14;

const ISO_FORMAT: &str = "%Y-%m-%d";

/// Today's date on the local wall clock
///
/// "Is past" checks compare calendar days, so the local midnight boundary is
/// resolved once here and everything downstream works on `NaiveDate`.
pub fn today_local() -> NaiveDate {
    Local::now().date_naive()
}

/// Parse an ISO `YYYY-MM-DD` string; empty or malformed input is unset
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(s, ISO_FORMAT).ok()
}

/// A trip date range
///
/// When both ends are set, `start <= end` and the range spans fewer than
/// [`MAX_DAYS`] nights. A range with only `start` is "open".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    /// A range with nothing selected
    pub fn empty() -> Self {
        Self::default()
    }

    /// An open range starting at `start`
    pub fn starting(start: NaiveDate) -> Self {
        Self {
            start: Some(start),
            end: None,
        }
    }

    /// Build a range from two dates, dropping the end if it would break the
    /// range invariant
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
        }
        .normalized()
    }

    /// Build from ISO strings as stored by the plan-input form
    pub fn from_iso(start: &str, end: &str) -> Self {
        debug!(%start, %end, "DateRange::from_iso: called");
        Self {
            start: parse_date(start),
            end: parse_date(end),
        }
        .normalized()
    }

    fn normalized(self) -> Self {
        match (self.start, self.end) {
            (None, Some(_)) => Self::empty(),
            (Some(start), Some(end)) if end < start || nights_between(start, end) >= MAX_DAYS as i64 => {
                debug!(%start, %end, "DateRange::normalized: dropping invalid end");
                Self::starting(start)
            }
            _ => self,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.start.is_none()
    }

    /// Start chosen, end still pending
    pub fn is_open(&self) -> bool {
        self.start.is_some() && self.end.is_none()
    }

    pub fn is_complete(&self) -> bool {
        self.start.is_some() && self.end.is_some()
    }

    /// Nights between start and end, when both are set
    pub fn nights(&self) -> Option<i64> {
        match (self.start, self.end) {
            (Some(start), Some(end)) => Some(nights_between(start, end)),
            _ => None,
        }
    }

    /// Latest date that may still be picked as the end of an open range
    pub fn max_selectable(&self) -> Option<NaiveDate> {
        if !self.is_open() {
            return None;
        }
        self.start.and_then(|start| start.checked_add_days(Days::new(MAX_DAYS - 1)))
    }

    /// Whether the range invariant holds
    pub fn is_valid(&self) -> bool {
        match (self.start, self.end) {
            (Some(start), Some(end)) => start <= end && nights_between(start, end) < MAX_DAYS as i64,
            (None, Some(_)) => false,
            _ => true,
        }
    }

    /// ISO start date, or an empty string
    pub fn start_iso(&self) -> String {
        self.start.map(|d| d.format(ISO_FORMAT).to_string()).unwrap_or_default()
    }

    /// ISO end date, or an empty string
    pub fn end_iso(&self) -> String {
        self.end.map(|d| d.format(ISO_FORMAT).to_string()).unwrap_or_default()
    }

    /// The `"{start} ~ {end}"` form the planner service expects
    pub fn to_planner_string(&self) -> String {
        format!("{} ~ {}", self.start_iso(), self.end_iso())
    }
}

fn nights_between(start: NaiveDate, end: NaiveDate) -> i64 {
    end.signed_duration_since(start).num_days()
}

/// Apply a click on `clicked` to `range`
///
/// - Clicks before `today` are ignored.
/// - With no start, or with a complete range, a new open range begins.
/// - With an open range, an earlier date restarts the range; a later one
///   closes it, clamped to `start + (MAX_DAYS - 1)`.
pub fn apply_click(range: DateRange, clicked: NaiveDate, today: NaiveDate) -> DateRange {
    debug!(?range, %clicked, %today, "apply_click: called");
    if clicked < today {
        debug!("apply_click: date in the past, ignoring");
        return range;
    }

    match (range.start, range.end) {
        (Some(start), None) => {
            if clicked < start {
                debug!("apply_click: before start, restarting range");
                return DateRange::starting(clicked);
            }
            let nights = nights_between(start, clicked);
            let end = if nights >= MAX_DAYS as i64 {
                debug!(nights, "apply_click: range too long, clamping end");
                start.checked_add_days(Days::new(MAX_DAYS - 1)).unwrap_or(start)
            } else {
                clicked
            };
            DateRange {
                start: Some(start),
                end: Some(end),
            }
        }
        _ => {
            debug!("apply_click: starting new range");
            DateRange::starting(clicked)
        }
    }
}

fn month_day(date: NaiveDate) -> String {
    format!("{}월 {}일", date.month(), date.day())
}

/// Human-readable range text
///
/// `"6월 10일 → 6월 14일  (4박 5일)"` for a full range, `"6월 10일 선택됨"` for an
/// open one, and an empty string when nothing is selected.
pub fn format_range(range: &DateRange) -> String {
    match (range.start, range.end) {
        (Some(start), Some(end)) => {
            let nights = nights_between(start, end);
            format!("{} → {}  ({}박 {}일)", month_day(start), month_day(end), nights, nights + 1)
        }
        (Some(start), None) => format!("{} 선택됨", month_day(start)),
        _ => String::new(),
    }
}
