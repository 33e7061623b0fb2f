//! Two-month date range picker state
//!
//! Pure data for the popup: view cursor, hover preview and open/closed
//! state. No rendering logic here.

use chrono::{Datelike, NaiveDate, Weekday};
use tracing::{debug, info};

use super::month::YearMonth;
use super::range::{DateRange, MAX_DAYS, apply_click, format_range};

/// Weekday header, Sunday first
pub const WEEKDAYS: [&str; 7] = ["일", "월", "화", "수", "목", "금", "토"];

const PLACEHOLDER: &str = "여행 날짜를 선택하세요";

/// Navigation control shown in a panel header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelNav {
    /// Left panel: previous-month button
    Prev { enabled: bool },
    /// Right panel: next-month button
    Next,
}

/// One slot of a month grid
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CalendarCell {
    /// `None` for padding slots, which render invisible and take no input
    pub date: Option<NaiveDate>,
    pub is_start: bool,
    /// Actual end, or the hover preview end of an open range
    pub is_end: bool,
    /// Strictly between start and (preview) end
    pub in_range: bool,
    pub is_today: bool,
    pub is_past: bool,
    /// Beyond the maximum trip length from an open range's start
    pub out_of_range: bool,
    pub is_sunday: bool,
    pub is_saturday: bool,
}

impl CalendarCell {
    pub fn is_placeholder(&self) -> bool {
        self.date.is_none()
    }

    /// Whether clicking the cell should reach the picker
    pub fn is_selectable(&self) -> bool {
        self.date.is_some() && !self.is_past && !self.out_of_range
    }
}

/// One rendered month
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthPanel {
    pub month: YearMonth,
    pub label: String,
    pub nav: PanelNav,
    pub cells: Vec<CalendarCell>,
}

/// Popup state of the date range picker
#[derive(Debug, Clone)]
pub struct DateRangePicker {
    today: NaiveDate,
    view: YearMonth,
    hovered: Option<NaiveDate>,
    open: bool,
}

impl DateRangePicker {
    /// Create a picker whose left panel shows the month of `today`
    pub fn new(today: NaiveDate) -> Self {
        debug!(%today, "DateRangePicker::new: called");
        Self {
            today,
            view: YearMonth::of(today),
            hovered: None,
            open: false,
        }
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    /// Month shown in the left panel
    pub fn view(&self) -> YearMonth {
        self.view
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn toggle(&mut self) {
        self.open = !self.open;
        debug!(open = self.open, "DateRangePicker::toggle: called");
    }

    /// Close without confirming (outside click)
    pub fn close(&mut self) {
        debug!("DateRangePicker::close: called");
        self.open = false;
        self.hovered = None;
    }

    /// Whether the confirm button is active
    pub fn can_confirm(&self, range: &DateRange) -> bool {
        range.is_complete()
    }

    /// Close the popup if the range is complete; returns whether it closed
    pub fn confirm(&mut self, range: &DateRange) -> bool {
        debug!(?range, "DateRangePicker::confirm: called");
        if !self.can_confirm(range) {
            debug!("DateRangePicker::confirm: range incomplete, staying open");
            return false;
        }
        info!(range = %format_range(range), "Date range confirmed");
        self.close();
        true
    }

    pub fn confirm_label(&self, range: &DateRange) -> &'static str {
        if self.can_confirm(range) {
            "선택 완료"
        } else {
            "날짜를 선택해주세요"
        }
    }

    pub fn limit_note(&self) -> String {
        format!("최대 {}일 선택 가능", MAX_DAYS)
    }

    /// Text for the closed trigger
    pub fn trigger_text(&self, range: &DateRange) -> String {
        let text = format_range(range);
        if text.is_empty() { PLACEHOLDER.to_string() } else { text }
    }

    /// The left panel cannot go before the current real-world month
    pub fn can_go_prev(&self) -> bool {
        self.view > YearMonth::of(self.today)
    }

    /// Step the view back one month; returns false at the lower bound
    pub fn prev_month(&mut self) -> bool {
        if !self.can_go_prev() {
            debug!("DateRangePicker::prev_month: already at current month");
            return false;
        }
        self.view = self.view.add_months(-1);
        debug!(view = %self.view, "DateRangePicker::prev_month: moved");
        true
    }

    pub fn next_month(&mut self) {
        self.view = self.view.add_months(1);
        debug!(view = %self.view, "DateRangePicker::next_month: moved");
    }

    /// Handle a day click and return the next range
    pub fn click(&mut self, range: DateRange, date: NaiveDate) -> DateRange {
        let next = apply_click(range, date, self.today);
        if next.is_complete() {
            self.hovered = None;
        }
        next
    }

    /// Pointer entered a day cell
    ///
    /// Only recorded while the range is open and the date is still pickable.
    pub fn hover(&mut self, range: &DateRange, date: NaiveDate) {
        if !range.is_open() {
            return;
        }
        let beyond = range.max_selectable().is_some_and(|max| date > max);
        if beyond || date < self.today {
            debug!(%date, "DateRangePicker::hover: date not selectable");
            return;
        }
        self.hovered = Some(date);
    }

    /// Pointer left the calendar
    pub fn leave(&mut self) {
        self.hovered = None;
    }

    /// End used for shading: the hovered date for an open range, else the
    /// real end. Never written back into the range.
    pub fn preview_end(&self, range: &DateRange) -> Option<NaiveDate> {
        match (range.start, range.end) {
            (Some(start), None) => self.hovered.filter(|h| *h >= start),
            (_, end) => end,
        }
    }

    /// Both panels for the current view
    pub fn panels(&self, range: &DateRange) -> [MonthPanel; 2] {
        debug!(view = %self.view, ?range, "DateRangePicker::panels: called");
        [
            self.panel(self.view, range, PanelNav::Prev {
                enabled: self.can_go_prev(),
            }),
            self.panel(self.view.add_months(1), range, PanelNav::Next),
        ]
    }

    fn panel(&self, month: YearMonth, range: &DateRange, nav: PanelNav) -> MonthPanel {
        // Recomputed per render from the current start
        let max_selectable = range.max_selectable();
        let preview_end = self.preview_end(range);
        let cells = month
            .cells()
            .into_iter()
            .map(|slot| match slot {
                None => CalendarCell::default(),
                Some(date) => self.cell(date, range, preview_end, max_selectable),
            })
            .collect();
        MonthPanel {
            month,
            label: month.label(),
            nav,
            cells,
        }
    }

    fn cell(
        &self,
        date: NaiveDate,
        range: &DateRange,
        preview_end: Option<NaiveDate>,
        max_selectable: Option<NaiveDate>,
    ) -> CalendarCell {
        let weekday = date.weekday();
        CalendarCell {
            date: Some(date),
            is_start: range.start == Some(date),
            is_end: preview_end == Some(date),
            in_range: matches!((range.start, preview_end), (Some(s), Some(e)) if date > s && date < e),
            is_today: date == self.today,
            is_past: date < self.today,
            out_of_range: max_selectable.is_some_and(|max| date > max),
            is_sunday: weekday == Weekday::Sun,
            is_saturday: weekday == Weekday::Sat,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn find(panel: &MonthPanel, d: NaiveDate) -> CalendarCell {
        *panel.cells.iter().find(|c| c.date == Some(d)).unwrap()
    }

    #[test]
    fn test_click_flow_matches_scenario() {
        let mut picker = DateRangePicker::new(date(2025, 6, 10));
        let range = picker.click(DateRange::empty(), date(2025, 6, 10));
        assert!(range.is_open());
        let range = picker.click(range, date(2025, 6, 30));
        assert_eq!(range.end, Some(date(2025, 6, 23)));
        assert_eq!(picker.trigger_text(&range), "6월 10일 → 6월 23일  (13박 14일)");
    }

    #[test]
    fn test_prev_navigation_bounded_by_today() {
        let mut picker = DateRangePicker::new(date(2025, 6, 10));
        assert!(!picker.can_go_prev());
        assert!(!picker.prev_month());
        assert_eq!(picker.view(), YearMonth::new(2025, 6).unwrap());

        picker.next_month();
        picker.next_month();
        assert_eq!(picker.view(), YearMonth::new(2025, 8).unwrap());
        assert!(picker.prev_month());
        assert!(picker.prev_month());
        assert!(!picker.prev_month());
    }

    #[test]
    fn test_panels_show_two_consecutive_months() {
        let picker = DateRangePicker::new(date(2025, 12, 5));
        let [left, right] = picker.panels(&DateRange::empty());
        assert_eq!(left.label, "2025년 12월");
        assert_eq!(right.label, "2026년 1월");
        assert_eq!(left.nav, PanelNav::Prev { enabled: false });
        assert_eq!(right.nav, PanelNav::Next);
    }

    #[test]
    fn test_past_and_today_flags() {
        let picker = DateRangePicker::new(date(2025, 6, 10));
        let [left, _] = picker.panels(&DateRange::empty());
        let past = find(&left, date(2025, 6, 9));
        assert!(past.is_past);
        assert!(!past.is_selectable());
        let today = find(&left, date(2025, 6, 10));
        assert!(today.is_today);
        assert!(today.is_selectable());
    }

    #[test]
    fn test_out_of_range_cells_for_open_range() {
        let picker = DateRangePicker::new(date(2025, 6, 10));
        let open = DateRange::starting(date(2025, 6, 20));
        let [left, right] = picker.panels(&open);
        assert!(!find(&left, date(2025, 6, 30)).out_of_range);
        assert!(!find(&right, date(2025, 7, 3)).out_of_range);
        assert!(find(&right, date(2025, 7, 4)).out_of_range);
        assert!(!find(&right, date(2025, 7, 4)).is_selectable());

        // Completed range lifts the restriction
        let full = DateRange::new(date(2025, 6, 20), date(2025, 6, 22));
        let [_, right] = picker.panels(&full);
        assert!(!find(&right, date(2025, 7, 4)).out_of_range);
    }

    #[test]
    fn test_placeholder_cells() {
        let picker = DateRangePicker::new(date(2025, 2, 1));
        let [left, _] = picker.panels(&DateRange::empty());
        let placeholders = left.cells.iter().take_while(|c| c.is_placeholder()).count();
        assert_eq!(placeholders, 6);
        assert!(left.cells.iter().filter(|c| c.is_placeholder()).all(|c| !c.is_selectable()));
    }

    #[test]
    fn test_hover_preview_never_persists() {
        let mut picker = DateRangePicker::new(date(2025, 6, 10));
        let open = DateRange::starting(date(2025, 6, 12));
        picker.hover(&open, date(2025, 6, 15));
        assert_eq!(picker.preview_end(&open), Some(date(2025, 6, 15)));

        let [left, _] = picker.panels(&open);
        assert!(find(&left, date(2025, 6, 13)).in_range);
        assert!(find(&left, date(2025, 6, 15)).is_end);
        assert!(!find(&left, date(2025, 6, 15)).in_range);
        assert!(!find(&left, date(2025, 6, 12)).in_range);

        // The range itself is untouched
        assert_eq!(open.end, None);

        picker.leave();
        assert_eq!(picker.preview_end(&open), None);
    }

    #[test]
    fn test_hover_ignored_when_not_open_or_out_of_range() {
        let mut picker = DateRangePicker::new(date(2025, 6, 10));
        picker.hover(&DateRange::empty(), date(2025, 6, 15));
        assert_eq!(picker.preview_end(&DateRange::starting(date(2025, 6, 12))), None);

        let open = DateRange::starting(date(2025, 6, 12));
        picker.hover(&open, date(2025, 7, 1));
        assert_eq!(picker.preview_end(&open), None);

        // Earlier than start produces no preview
        picker.hover(&open, date(2025, 6, 11));
        assert_eq!(picker.preview_end(&open), None);
    }

    #[test]
    fn test_confirm_requires_complete_range() {
        let mut picker = DateRangePicker::new(date(2025, 6, 10));
        picker.toggle();
        assert!(picker.is_open());

        let open = DateRange::starting(date(2025, 6, 12));
        assert_eq!(picker.confirm_label(&open), "날짜를 선택해주세요");
        assert!(!picker.confirm(&open));
        assert!(picker.is_open());

        let full = DateRange::new(date(2025, 6, 12), date(2025, 6, 14));
        assert_eq!(picker.confirm_label(&full), "선택 완료");
        assert!(picker.confirm(&full));
        assert!(!picker.is_open());
    }

    #[test]
    fn test_trigger_placeholder() {
        let picker = DateRangePicker::new(date(2025, 6, 10));
        assert_eq!(picker.trigger_text(&DateRange::empty()), "여행 날짜를 선택하세요");
        assert_eq!(picker.trigger_text(&DateRange::starting(date(2025, 6, 12))), "6월 12일 선택됨");
        assert_eq!(picker.limit_note(), "최대 14일 선택 가능");
    }
}
