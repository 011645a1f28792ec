//! Dual-use range calendar picker.
//!
//! The picker is split into a reducer ([`RangePicker::reduce`]) that owns the
//! cursor, the committed selection and the hover preview, and a renderer
//! ([`RangePicker::render`]) that derives every day cell from that state.
//! Nothing is patched incrementally: two renders of the same state are equal.

use crate::format::DateFormatter;
use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::{collections::HashSet, fmt, sync::Arc};
use tracing::debug;

/// Month shown in the grid. Independent of the selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarCursor {
    first: NaiveDate,
}

impl CalendarCursor {
    pub fn containing(date: NaiveDate) -> Self {
        Self {
            first: date - chrono::Duration::days(i64::from(date.day0())),
        }
    }

    pub fn year(&self) -> i32 {
        self.first.year()
    }

    pub fn month(&self) -> u32 {
        self.first.month()
    }

    pub fn first_day(&self) -> NaiveDate {
        self.first
    }

    pub fn shift(self, direction: Direction) -> Self {
        let moved = match direction {
            Direction::Previous => self.first.checked_sub_months(Months::new(1)),
            Direction::Next => self.first.checked_add_months(Months::new(1)),
        };
        Self {
            first: moved.unwrap_or(self.first),
        }
    }

    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        let month = self.first.month();
        self.first.iter_days().take_while(move |day| day.month() == month)
    }

    /// Blank cells before day 1 in a Monday-first week.
    pub fn leading_blanks(&self) -> usize {
        let from_sunday = self.first.weekday().num_days_from_sunday();
        ((from_sunday + 6) % 7) as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Previous,
    Next,
}

/// Committed endpoints. `end` is only ever set together with an earlier or
/// equal `start`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateSelection {
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
}

impl DateSelection {
    pub fn start(&self) -> Option<NaiveDate> {
        self.start
    }

    pub fn end(&self) -> Option<NaiveDate> {
        self.end
    }

    pub fn is_empty(&self) -> bool {
        self.start.is_none()
    }

    /// Waiting for the second click.
    pub fn is_partial(&self) -> bool {
        self.start.is_some() && self.end.is_none()
    }

    pub fn click(&mut self, date: NaiveDate) {
        match (self.start, self.end) {
            (Some(start), None) if date < start => {
                self.start = Some(date);
                self.end = Some(start);
            }
            (Some(_), None) => self.end = Some(date),
            _ => {
                self.start = Some(date);
                self.end = None;
            }
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Finalized range; a lone start becomes a one-day range.
    pub fn range(&self) -> Option<DateRange> {
        self.start.map(|start| DateRange {
            start,
            end: self.end.unwrap_or(start),
        })
    }
}

/// Inclusive range handed to consumers on apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn single(date: NaiveDate) -> Self {
        Self {
            start: date,
            end: date,
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayClass {
    Today,
    SelectionStart,
    SelectionEnd,
    InRange,
    HoverInRange,
    HoverEnd,
    Plain,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayCell {
    pub date: NaiveDate,
    pub day: u32,
    pub class: DayClass,
    pub is_today: bool,
    pub hover_enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarView {
    pub picker: &'static str,
    pub visible: bool,
    pub year: i32,
    pub month: u32,
    pub month_label: String,
    pub leading_blanks: usize,
    pub cells: Vec<DayCell>,
    /// Hidden when `None`.
    pub status: Option<String>,
    pub label: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PickerEvent {
    Open,
    Close,
    Toggle,
    Navigate { direction: Direction },
    SelectDay { date: NaiveDate },
    Hover { date: NaiveDate },
    Leave,
    Cancel,
    Apply,
}

/// Element ids one picker instance needs on the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PickerConfig {
    pub id: &'static str,
    pub trigger: &'static str,
    pub container: &'static str,
    pub prev: &'static str,
    pub next: &'static str,
    pub month_label: &'static str,
    pub days: &'static str,
    pub apply: &'static str,
    pub cancel: &'static str,
    pub status: &'static str,
}

impl PickerConfig {
    pub const ANALYTICS: Self = Self {
        id: "analytics",
        trigger: "calendar-trigger",
        container: "datepicker-container",
        prev: "prev-month",
        next: "next-month",
        month_label: "current-month",
        days: "days-container",
        apply: "apply-button",
        cancel: "cancel-button",
        status: "range-text",
    };

    pub const REPORTS: Self = Self {
        id: "reports",
        trigger: "reports-calendar-trigger",
        container: "reports-datepicker-container",
        prev: "reports-prev-month",
        next: "reports-next-month",
        month_label: "reports-current-month",
        days: "reports-days-container",
        apply: "reports-apply-button",
        cancel: "reports-cancel-button",
        status: "reports-range-text",
    };

    pub fn element_ids(&self) -> [&'static str; 9] {
        [
            self.trigger,
            self.container,
            self.prev,
            self.next,
            self.month_label,
            self.days,
            self.apply,
            self.cancel,
            self.status,
        ]
    }

    /// Builds a picker only when every required element is present.
    pub fn bind<'a>(
        self,
        present: impl IntoIterator<Item = &'a str>,
        today: NaiveDate,
        formatter: Arc<dyn DateFormatter + Send + Sync>,
    ) -> Option<RangePicker> {
        let present: HashSet<&str> = present.into_iter().collect();
        let missing: Vec<&str> = self
            .element_ids()
            .into_iter()
            .filter(|id| !present.contains(id))
            .collect();
        if !missing.is_empty() {
            debug!(picker = self.id, ?missing, "picker markup absent; skipping");
            return None;
        }
        Some(RangePicker::new(self, today, formatter))
    }
}

pub struct RangePicker {
    config: PickerConfig,
    formatter: Arc<dyn DateFormatter + Send + Sync>,
    cursor: CalendarCursor,
    selection: DateSelection,
    hover: Option<NaiveDate>,
    visible: bool,
    label: Option<String>,
}

impl fmt::Debug for RangePicker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RangePicker")
            .field("id", &self.config.id)
            .field("cursor", &self.cursor)
            .field("selection", &self.selection)
            .field("hover", &self.hover)
            .field("visible", &self.visible)
            .finish()
    }
}

impl RangePicker {
    pub fn new(
        config: PickerConfig,
        today: NaiveDate,
        formatter: Arc<dyn DateFormatter + Send + Sync>,
    ) -> Self {
        Self {
            config,
            formatter,
            cursor: CalendarCursor::containing(today),
            selection: DateSelection::default(),
            hover: None,
            visible: false,
            label: None,
        }
    }

    pub fn config(&self) -> &PickerConfig {
        &self.config
    }

    pub fn cursor(&self) -> CalendarCursor {
        self.cursor
    }

    pub fn selection(&self) -> DateSelection {
        self.selection
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Text of the last applied range.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Seeds the trigger label without touching the selection, e.g. when a
    /// period tab changes the range.
    pub fn set_label(&mut self, label: impl Into<String>) {
        self.label = Some(label.into());
    }

    pub fn reduce(&mut self, event: PickerEvent, on_apply: impl FnOnce(DateRange)) {
        match event {
            PickerEvent::Open => self.open(),
            PickerEvent::Close => self.close(),
            PickerEvent::Toggle => self.toggle(),
            PickerEvent::Navigate { direction } => self.navigate(direction),
            PickerEvent::SelectDay { date } => self.select_day(date),
            PickerEvent::Hover { date } => self.hover(date),
            PickerEvent::Leave => self.leave(),
            PickerEvent::Cancel => self.cancel(),
            PickerEvent::Apply => self.apply(on_apply),
        }
    }

    pub fn open(&mut self) {
        self.visible = true;
    }

    pub fn close(&mut self) {
        self.visible = false;
        self.hover = None;
    }

    pub fn toggle(&mut self) {
        if self.visible {
            self.close();
        } else {
            self.open();
        }
    }

    pub fn navigate(&mut self, direction: Direction) {
        self.cursor = self.cursor.shift(direction);
    }

    pub fn select_day(&mut self, date: NaiveDate) {
        self.selection.click(date);
        self.hover = None;
    }

    pub fn hover(&mut self, date: NaiveDate) {
        if self.selection.is_partial() {
            self.hover = Some(date);
        }
    }

    pub fn leave(&mut self) {
        self.hover = None;
    }

    pub fn cancel(&mut self) {
        self.selection.clear();
        self.close();
    }

    /// Hands the range to `on_apply` when a start exists, then closes. The
    /// selection survives so reopening shows it again.
    pub fn apply(&mut self, on_apply: impl FnOnce(DateRange)) {
        if let Some(range) = self.selection.range() {
            let label = self.formatter.range(range.start, range.end);
            debug!(picker = self.config.id, %label, "range applied");
            self.label = Some(label);
            on_apply(range);
        }
        self.close();
    }

    pub fn render(&self, today: NaiveDate) -> CalendarView {
        let hover = self.hover.filter(|_| self.selection.is_partial());
        let hover_enabled = self.selection.is_partial();
        let cells = self
            .cursor
            .days()
            .map(|date| DayCell {
                date,
                day: date.day(),
                class: classify(date, today, &self.selection, hover),
                is_today: date == today,
                hover_enabled,
            })
            .collect();

        CalendarView {
            picker: self.config.id,
            visible: self.visible,
            year: self.cursor.year(),
            month: self.cursor.month(),
            month_label: self
                .formatter
                .month_label(self.cursor.year(), self.cursor.month()),
            leading_blanks: self.cursor.leading_blanks(),
            cells,
            status: self.status_text(),
            label: self.label.clone(),
        }
    }

    fn status_text(&self) -> Option<String> {
        match (self.selection.start(), self.selection.end()) {
            (Some(start), Some(end)) => Some(format!(
                "{} - {}",
                self.formatter.short(start),
                self.formatter.short(end)
            )),
            (Some(start), None) => Some(format!(
                "Начало: {} (выберите конечную дату)",
                self.formatter.short(start)
            )),
            _ => None,
        }
    }
}

fn classify(
    date: NaiveDate,
    today: NaiveDate,
    selection: &DateSelection,
    hover: Option<NaiveDate>,
) -> DayClass {
    let start = selection.start();
    let end = selection.end();

    if start == Some(date) {
        return DayClass::SelectionStart;
    }
    if end == Some(date) {
        return DayClass::SelectionEnd;
    }
    if let (Some(start), Some(hovered)) = (start, hover) {
        if hovered == date {
            return DayClass::HoverEnd;
        }
        let (low, high) = if hovered < start {
            (hovered, start)
        } else {
            (start, hovered)
        };
        if low < date && date < high {
            return DayClass::HoverInRange;
        }
    }
    if let (Some(start), Some(end)) = (start, end) {
        if start < date && date < end {
            return DayClass::InRange;
        }
    }
    if date == today {
        return DayClass::Today;
    }
    DayClass::Plain
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::RussianFormatter;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn picker(today: NaiveDate) -> RangePicker {
        RangePicker::new(PickerConfig::ANALYTICS, today, Arc::new(RussianFormatter))
    }

    fn class_of(view: &CalendarView, day: u32) -> DayClass {
        view.cells.iter().find(|cell| cell.day == day).unwrap().class
    }

    #[test]
    fn two_clicks_order_endpoints() {
        let today = date(2025, 3, 1);
        for (first, second) in [(5, 20), (20, 5), (1, 31), (31, 1)] {
            let mut picker = picker(today);
            picker.select_day(date(2025, 3, first));
            picker.select_day(date(2025, 3, second));
            let selection = picker.selection();
            assert_eq!(selection.start(), Some(date(2025, 3, first.min(second))));
            assert_eq!(selection.end(), Some(date(2025, 3, first.max(second))));
        }
    }

    #[test]
    fn third_click_starts_fresh_selection() {
        let mut picker = picker(date(2025, 3, 1));
        picker.select_day(date(2025, 3, 10));
        picker.select_day(date(2025, 3, 15));
        picker.select_day(date(2025, 3, 3));
        assert_eq!(picker.selection().start(), Some(date(2025, 3, 3)));
        assert_eq!(picker.selection().end(), None);
    }

    #[test]
    fn cancel_clears_any_state() {
        let mut picker = picker(date(2025, 3, 1));
        picker.open();
        picker.select_day(date(2025, 3, 10));
        picker.hover(date(2025, 3, 12));
        picker.cancel();
        assert!(picker.selection().is_empty());
        assert!(!picker.is_visible());

        picker.select_day(date(2025, 3, 10));
        picker.select_day(date(2025, 3, 11));
        picker.cancel();
        assert_eq!(picker.selection(), DateSelection::default());
    }

    #[test]
    fn apply_single_day_yields_equal_endpoints() {
        let mut picker = picker(date(2025, 3, 1));
        picker.open();
        picker.select_day(date(2025, 3, 12));
        let mut applied = Vec::new();
        picker.apply(|range| applied.push(range));
        assert_eq!(applied, vec![DateRange::single(date(2025, 3, 12))]);
        assert_eq!(picker.label(), Some("12 марта 2025 г."));
        assert!(!picker.is_visible());
    }

    #[test]
    fn apply_without_start_only_closes() {
        let mut picker = picker(date(2025, 3, 1));
        picker.open();
        let mut calls = 0;
        picker.apply(|_| calls += 1);
        assert_eq!(calls, 0);
        assert!(!picker.is_visible());
        assert_eq!(picker.label(), None);
    }

    #[test]
    fn apply_keeps_selection_for_reopen() {
        let mut picker = picker(date(2025, 3, 1));
        picker.select_day(date(2025, 3, 12));
        picker.select_day(date(2025, 3, 18));
        picker.apply(|_| {});
        picker.open();
        assert_eq!(
            picker.selection().range(),
            Some(DateRange {
                start: date(2025, 3, 12),
                end: date(2025, 3, 18)
            })
        );
        assert_eq!(picker.label(), Some("12 мар. - 18 мар. 2025 г."));
    }

    #[test]
    fn hover_then_leave_restores_render() {
        let today = date(2025, 3, 1);
        let mut picker = picker(today);
        picker.select_day(date(2025, 3, 10));
        let before = picker.render(today);

        picker.hover(date(2025, 3, 14));
        let preview = picker.render(today);
        assert_eq!(class_of(&preview, 10), DayClass::SelectionStart);
        assert_eq!(class_of(&preview, 12), DayClass::HoverInRange);
        assert_eq!(class_of(&preview, 14), DayClass::HoverEnd);
        assert_eq!(class_of(&preview, 15), DayClass::Plain);
        assert_eq!(picker.selection().end(), None);

        picker.leave();
        assert_eq!(picker.render(today), before);
    }

    #[test]
    fn hover_before_start_previews_backwards() {
        let today = date(2025, 3, 1);
        let mut picker = picker(today);
        picker.select_day(date(2025, 3, 10));
        picker.hover(date(2025, 3, 6));
        let view = picker.render(today);
        assert_eq!(class_of(&view, 6), DayClass::HoverEnd);
        assert_eq!(class_of(&view, 8), DayClass::HoverInRange);
        assert_eq!(class_of(&view, 11), DayClass::Plain);
    }

    #[test]
    fn hover_ignored_without_partial_selection() {
        let today = date(2025, 3, 1);
        let mut picker = picker(today);
        picker.hover(date(2025, 3, 6));
        assert!(picker.render(today).cells.iter().all(|cell| !cell.hover_enabled));

        picker.select_day(date(2025, 3, 2));
        picker.select_day(date(2025, 3, 4));
        let before = picker.render(today);
        picker.hover(date(2025, 3, 20));
        assert_eq!(picker.render(today), before);
    }

    #[test]
    fn committed_range_classification() {
        let today = date(2025, 3, 11);
        let mut picker = picker(today);
        picker.select_day(date(2025, 3, 18));
        picker.select_day(date(2025, 3, 12));
        let view = picker.render(today);
        assert_eq!(class_of(&view, 11), DayClass::Today);
        assert_eq!(class_of(&view, 12), DayClass::SelectionStart);
        assert_eq!(class_of(&view, 15), DayClass::InRange);
        assert_eq!(class_of(&view, 18), DayClass::SelectionEnd);
        assert_eq!(class_of(&view, 19), DayClass::Plain);
        assert!(view.cells.iter().all(|cell| !cell.hover_enabled));
        assert_eq!(view.status.as_deref(), Some("12 мар. 2025 - 18 мар. 2025"));
    }

    #[test]
    fn navigation_leaves_selection_alone() {
        let today = date(2025, 1, 15);
        let mut picker = picker(today);
        picker.select_day(date(2025, 1, 20));
        let selection = picker.selection();

        picker.navigate(Direction::Previous);
        let view = picker.render(today);
        assert_eq!((view.year, view.month), (2024, 12));
        assert_eq!(view.cells.len(), 31);
        assert_eq!(view.month_label, "декабрь 2024 г.");
        assert_eq!(picker.selection(), selection);

        picker.navigate(Direction::Next);
        picker.navigate(Direction::Next);
        let view = picker.render(today);
        assert_eq!((view.year, view.month), (2025, 2));
        assert_eq!(view.cells.len(), 28);
        assert_eq!(picker.selection(), selection);
    }

    #[test]
    fn leading_blanks_start_on_monday() {
        // 1 March 2025 is a Saturday, 1 September 2025 a Monday, 1 June 2025 a Sunday.
        assert_eq!(CalendarCursor::containing(date(2025, 3, 9)).leading_blanks(), 5);
        assert_eq!(CalendarCursor::containing(date(2025, 9, 30)).leading_blanks(), 0);
        assert_eq!(CalendarCursor::containing(date(2025, 6, 1)).leading_blanks(), 6);
    }

    #[test]
    fn leap_february_has_29_cells() {
        let cursor = CalendarCursor::containing(date(2024, 2, 10));
        assert_eq!(cursor.days().count(), 29);
    }

    #[test]
    fn status_hidden_when_empty() {
        let today = date(2025, 3, 1);
        let mut picker = picker(today);
        assert_eq!(picker.render(today).status, None);
        picker.select_day(date(2025, 3, 4));
        assert_eq!(
            picker.render(today).status.as_deref(),
            Some("Начало: 4 мар. 2025 (выберите конечную дату)")
        );
    }

    #[test]
    fn toggle_flips_visibility() {
        let mut picker = picker(date(2025, 3, 1));
        picker.toggle();
        assert!(picker.is_visible());
        picker.toggle();
        assert!(!picker.is_visible());
    }

    #[test]
    fn reduce_dispatches_apply_once() {
        let mut picker = picker(date(2025, 3, 1));
        picker.reduce(PickerEvent::SelectDay { date: date(2025, 3, 2) }, |_| {});
        let mut calls = 0;
        picker.reduce(PickerEvent::Apply, |_| calls += 1);
        assert_eq!(calls, 1);
        picker.reduce(PickerEvent::Cancel, |_| calls += 1);
        assert_eq!(calls, 1);
    }

    #[test]
    fn bind_requires_all_elements() {
        let today = date(2025, 3, 1);
        let config = PickerConfig::REPORTS;
        let all = config.element_ids();
        assert!(
            config
                .bind(all, today, Arc::new(RussianFormatter))
                .is_some()
        );
        assert!(
            config
                .bind(all[..8].iter().copied(), today, Arc::new(RussianFormatter))
                .is_none()
        );
    }

    #[test]
    fn event_payload_shape() {
        let event: PickerEvent =
            serde_json::from_str(r#"{"type":"select_day","date":"2025-03-12"}"#).unwrap();
        assert_eq!(event, PickerEvent::SelectDay { date: date(2025, 3, 12) });
        let event: PickerEvent =
            serde_json::from_str(r#"{"type":"navigate","direction":"next"}"#).unwrap();
        assert_eq!(event, PickerEvent::Navigate { direction: Direction::Next });
    }
}
