//! Month cursor and grid layout

use std::fmt;

use chrono::{Datelike, NaiveDate};
use tracing::debug;

/// A calendar month, used as the picker's view cursor
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    year: i32,
    /// 1-based month
    month: u32,
}

impl YearMonth {
    /// Returns `None` for a month outside `1..=12`
    pub fn new(year: i32, month: u32) -> Option<Self> {
        if (1..=12).contains(&month) {
            Some(Self { year, month })
        } else {
            None
        }
    }

    /// The month containing `date`
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// Shift by `delta` months, rolling the year as needed
    pub fn add_months(&self, delta: i32) -> Self {
        let index = self.year * 12 + (self.month as i32 - 1) + delta;
        Self {
            year: index.div_euclid(12),
            month: index.rem_euclid(12) as u32 + 1,
        }
    }

    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    /// Number of days, leap years included
    pub fn days_in_month(&self) -> u32 {
        let next = self.add_months(1).first_day();
        next.signed_duration_since(self.first_day()).num_days() as u32
    }

    /// Weekday of the 1st, Sunday = 0
    pub fn first_weekday(&self) -> u32 {
        self.first_day().weekday().num_days_from_sunday()
    }

    /// Sunday-first week rows flattened into cells
    ///
    /// Leading and trailing slots are `None` so the length is always a
    /// multiple of 7.
    pub fn cells(&self) -> Vec<Option<NaiveDate>> {
        debug!(%self, "YearMonth::cells: called");
        let mut cells: Vec<Option<NaiveDate>> = vec![None; self.first_weekday() as usize];
        cells.extend((1..=self.days_in_month()).map(|day| NaiveDate::from_ymd_opt(self.year, self.month, day)));
        while cells.len() % 7 != 0 {
            cells.push(None);
        }
        cells
    }

    /// Header label, e.g. `2025년 6월`
    pub fn label(&self) -> String {
        format!("{}년 {}월", self.year, self.month)
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}
