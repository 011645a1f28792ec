//! The dashboard coordinator.
//!
//! [`Dashboard`] is the only owner of the filter state, both range pickers
//! and the report table's paging. Everything that reads or changes them goes
//! through `&mut Dashboard`, so there is no ambient global state.

use crate::calendar::{CalendarView, DateRange, PickerConfig, PickerEvent, RangePicker};
use crate::catalog::{self, School};
use crate::format::DateFormatter;
use crate::models::{FilterState, Period, ReportPage, SchoolRow};
use crate::pagination::Paginator;
use crate::reports;
use crate::sample;
use chrono::{Datelike, Duration, NaiveDate};
use rand::Rng;
use std::{str::FromStr, sync::Arc};
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickerKind {
    Analytics,
    Reports,
}

impl PickerKind {
    pub fn config(self) -> PickerConfig {
        match self {
            PickerKind::Analytics => PickerConfig::ANALYTICS,
            PickerKind::Reports => PickerConfig::REPORTS,
        }
    }
}

impl FromStr for PickerKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "analytics" => Ok(PickerKind::Analytics),
            "reports" => Ok(PickerKind::Reports),
            other => Err(format!("unknown picker '{other}'")),
        }
    }
}

/// Range and label for a period tab, relative to `today`.
pub fn period_range(
    period: Period,
    today: NaiveDate,
    formatter: &dyn DateFormatter,
) -> (DateRange, String) {
    let range = match period {
        Period::Day => DateRange::single(today),
        Period::Yesterday => DateRange::single(today - Duration::days(1)),
        Period::Week => {
            let monday = today - Duration::days(i64::from(today.weekday().num_days_from_monday()));
            DateRange {
                start: monday,
                end: monday + Duration::days(6),
            }
        }
        Period::Month => {
            let first = today - Duration::days(i64::from(today.day0()));
            let last = first
                .iter_days()
                .take_while(|day| day.month() == first.month())
                .last()
                .unwrap_or(first);
            DateRange { start: first, end: last }
        }
    };
    let label = formatter.range(range.start, range.end);
    (range, label)
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct ReportRequest {
    pub page: Option<usize>,
    pub per_page: Option<usize>,
    pub search: Option<String>,
    pub period: Option<Period>,
}

pub struct Dashboard {
    filters: FilterState,
    formatter: Arc<dyn DateFormatter + Send + Sync>,
    analytics_picker: Option<RangePicker>,
    reports_picker: Option<RangePicker>,
    paginator: Paginator,
    search: String,
    report_rows: Option<Vec<SchoolRow>>,
}

impl Dashboard {
    pub fn new(
        mut filters: FilterState,
        today: NaiveDate,
        formatter: Arc<dyn DateFormatter + Send + Sync>,
        items_per_page: usize,
    ) -> Self {
        filters.city = catalog::validate_city(&filters.city).to_string();
        let sanitized: Vec<i64> = filters.selected_schools.iter().map(|id| i64::from(*id)).collect();
        filters.selected_schools = in_city(&filters.city, catalog::sanitize_ids(&sanitized));
        if filters.selected_schools.is_empty() {
            filters.selected_schools = all_ids(catalog::schools_for(&filters.city));
        }

        let mut dashboard = Self {
            filters,
            formatter,
            analytics_picker: None,
            reports_picker: None,
            paginator: Paginator::new(items_per_page),
            search: String::new(),
            report_rows: None,
        };
        // Period presets are relative to today; only picked ranges are kept.
        if !dashboard.filters.custom_range || dashboard.filters.date_range.is_none() {
            dashboard.set_period(dashboard.filters.period, today);
        }
        dashboard
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn formatter(&self) -> &dyn DateFormatter {
        self.formatter.as_ref()
    }

    pub fn is_mounted(&self, kind: PickerKind) -> bool {
        self.picker(kind).is_some()
    }

    /// Binds every picker whose markup is among `present_ids`. Pickers that
    /// are already bound keep their state.
    pub fn mount(&mut self, present_ids: &[&str], today: NaiveDate) {
        for kind in [PickerKind::Analytics, PickerKind::Reports] {
            if self.picker(kind).is_some() {
                continue;
            }
            let Some(mut picker) = kind.config().bind(
                present_ids.iter().copied(),
                today,
                Arc::clone(&self.formatter),
            ) else {
                continue;
            };
            let label = match kind {
                PickerKind::Analytics => self.filters.date_label.clone(),
                PickerKind::Reports => self.filters.reports_label.clone(),
            };
            if let Some(label) = label {
                picker.set_label(label);
            }
            info!(picker = picker.config().id, "picker mounted");
            *self.picker_slot(kind) = Some(picker);
        }
    }

    fn picker(&self, kind: PickerKind) -> Option<&RangePicker> {
        match kind {
            PickerKind::Analytics => self.analytics_picker.as_ref(),
            PickerKind::Reports => self.reports_picker.as_ref(),
        }
    }

    fn picker_slot(&mut self, kind: PickerKind) -> &mut Option<RangePicker> {
        match kind {
            PickerKind::Analytics => &mut self.analytics_picker,
            PickerKind::Reports => &mut self.reports_picker,
        }
    }

    /// Switches city and selects all of its schools. Unknown cities resolve
    /// to the default city.
    pub fn select_city(&mut self, city: &str) -> &'static str {
        let city = catalog::validate_city(city);
        self.filters.city = city.to_string();
        self.filters.selected_schools = all_ids(catalog::schools_for(city));
        self.report_rows = None;
        info!(city, schools = self.filters.selected_schools.len(), "city selected");
        city
    }

    /// Keeps only valid ids that belong to the current city.
    pub fn select_schools(&mut self, ids: &[i64]) -> &[u32] {
        self.filters.selected_schools = in_city(&self.filters.city, catalog::sanitize_ids(ids));
        self.report_rows = None;
        debug!(schools = ?self.filters.selected_schools, "schools selected");
        &self.filters.selected_schools
    }

    pub fn set_period(&mut self, period: Period, today: NaiveDate) {
        let (range, label) = period_range(period, today, self.formatter.as_ref());
        self.filters.period = period;
        self.filters.date_range = Some(range);
        self.filters.custom_range = false;
        if let Some(picker) = self.analytics_picker.as_mut() {
            picker.set_label(label.clone());
        }
        self.filters.date_label = Some(label);
        debug!(period = period.as_str(), "period set");
    }

    pub fn picker_view(&self, kind: PickerKind, today: NaiveDate) -> Option<CalendarView> {
        self.picker(kind).map(|picker| picker.render(today))
    }

    /// Runs one picker event and returns the re-rendered view. `None` when the
    /// picker is not mounted.
    pub fn picker_event(
        &mut self,
        kind: PickerKind,
        event: PickerEvent,
        today: NaiveDate,
    ) -> Option<CalendarView> {
        let (picker, range_slot, label_slot) = match kind {
            PickerKind::Analytics => (
                self.analytics_picker.as_mut()?,
                &mut self.filters.date_range,
                &mut self.filters.date_label,
            ),
            PickerKind::Reports => (
                self.reports_picker.as_mut()?,
                &mut self.filters.reports_range,
                &mut self.filters.reports_label,
            ),
        };

        let mut applied = false;
        picker.reduce(event, |range| {
            *range_slot = Some(range);
            applied = true;
        });
        if applied {
            *label_slot = picker.label().map(str::to_string);
            if kind == PickerKind::Analytics {
                self.filters.custom_range = true;
            }
            info!(picker = picker.config().id, label = ?label_slot, "date range applied");
            if kind == PickerKind::Reports {
                self.report_rows = None;
            }
        }
        Some(picker.render(today))
    }

    pub fn report_page(&mut self, request: ReportRequest, rng: &mut impl Rng) -> ReportPage {
        if let Some(period) = request.period {
            if period != self.filters.reports_period {
                self.filters.reports_period = period;
                self.report_rows = None;
            }
        }
        if let Some(per_page) = request.per_page {
            if per_page != self.paginator.items_per_page() {
                self.paginator.set_items_per_page(per_page);
            }
        }
        if let Some(search) = request.search {
            self.search = search;
        }

        let period = self.filters.reports_period;
        let selected = &self.filters.selected_schools;
        let rows = self.report_rows.get_or_insert_with(|| {
            let schools = catalog::schools_by_ids(selected);
            sample::scale_for_period(sample::school_rows(&schools, rng), period)
        });

        let filtered = reports::search(rows.clone(), &self.search);
        self.paginator.update_total(filtered.len());
        if let Some(page) = request.page {
            self.paginator.go_to(page);
        }

        let totals = reports::totals(&filtered);
        let page_rows = self
            .paginator
            .page_slice(&filtered)
            .iter()
            .cloned()
            .map(reports::row_view)
            .collect();

        ReportPage {
            period,
            date_label: self.filters.reports_label.clone(),
            rows: page_rows,
            attendance_badge: reports::attendance_badge(totals.attended.percentage),
            nutrition14_badge: reports::nutrition_badge(totals.nutrition14.percentage),
            nutrition511_badge: reports::nutrition_badge(totals.nutrition511.percentage),
            totals,
            page: self.paginator.info(),
        }
    }
}

fn all_ids(schools: &[School]) -> Vec<u32> {
    schools.iter().map(|school| school.id).collect()
}

fn in_city(city: &str, ids: Vec<u32>) -> Vec<u32> {
    let schools = catalog::schools_for(city);
    ids.into_iter()
        .filter(|id| schools.iter().any(|school| school.id == *id))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::Direction;
    use crate::format::RussianFormatter;
    use rand::{SeedableRng, rngs::StdRng};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn dashboard(today: NaiveDate) -> Dashboard {
        Dashboard::new(FilterState::default(), today, Arc::new(RussianFormatter), 10)
    }

    fn mount_all(dashboard: &mut Dashboard, today: NaiveDate) {
        let mut ids: Vec<&str> = PickerConfig::ANALYTICS.element_ids().to_vec();
        ids.extend(PickerConfig::REPORTS.element_ids());
        dashboard.mount(&ids, today);
    }

    #[test]
    fn new_dashboard_defaults_to_today() {
        let today = date(2025, 3, 12);
        let dashboard = dashboard(today);
        let filters = dashboard.filters();
        assert_eq!(filters.city, "Астана");
        assert_eq!(filters.selected_schools, vec![6, 7, 8, 9, 10]);
        assert_eq!(filters.date_range, Some(DateRange::single(today)));
        assert_eq!(filters.date_label.as_deref(), Some("12 марта 2025 г."));
    }

    #[test]
    fn period_presets() {
        // 12 March 2025 is a Wednesday.
        let today = date(2025, 3, 12);
        let fmt = RussianFormatter;
        let (week, label) = period_range(Period::Week, today, &fmt);
        assert_eq!(week, DateRange { start: date(2025, 3, 10), end: date(2025, 3, 16) });
        assert_eq!(label, "10 мар. - 16 мар. 2025 г.");

        let (month, _) = period_range(Period::Month, date(2024, 2, 10), &fmt);
        assert_eq!(month, DateRange { start: date(2024, 2, 1), end: date(2024, 2, 29) });

        let (yesterday, _) = period_range(Period::Yesterday, date(2025, 1, 1), &fmt);
        assert_eq!(yesterday, DateRange::single(date(2024, 12, 31)));

        let (sunday_week, _) = period_range(Period::Week, date(2025, 3, 16), &fmt);
        assert_eq!(sunday_week.start, date(2025, 3, 10));
    }

    #[test]
    fn city_selection_picks_all_schools() {
        let mut dashboard = dashboard(date(2025, 3, 12));
        assert_eq!(dashboard.select_city("Шымкент"), "Шымкент");
        assert_eq!(dashboard.filters().selected_schools, vec![11, 12, 13, 14]);
        assert_eq!(dashboard.select_city("Тараз"), "Астана");
    }

    #[test]
    fn unmounted_picker_is_absent() {
        let today = date(2025, 3, 12);
        let mut dashboard = dashboard(today);
        dashboard.mount(&["calendar-trigger"], today);
        assert!(!dashboard.is_mounted(PickerKind::Analytics));
        assert!(
            dashboard
                .picker_event(PickerKind::Analytics, PickerEvent::Open, today)
                .is_none()
        );
    }

    #[test]
    fn applying_pickers_updates_their_own_filters() {
        let today = date(2025, 3, 12);
        let mut dashboard = dashboard(today);
        mount_all(&mut dashboard, today);

        for event in [
            PickerEvent::Open,
            PickerEvent::SelectDay { date: date(2025, 3, 20) },
            PickerEvent::SelectDay { date: date(2025, 3, 3) },
            PickerEvent::Apply,
        ] {
            dashboard.picker_event(PickerKind::Reports, event, today);
        }
        let filters = dashboard.filters();
        assert_eq!(
            filters.reports_range,
            Some(DateRange { start: date(2025, 3, 3), end: date(2025, 3, 20) })
        );
        assert_eq!(filters.reports_label.as_deref(), Some("3 мар. - 20 мар. 2025 г."));
        assert_eq!(filters.date_range, Some(DateRange::single(today)));
    }

    #[test]
    fn cancel_does_not_touch_filters() {
        let today = date(2025, 3, 12);
        let mut dashboard = dashboard(today);
        mount_all(&mut dashboard, today);
        let before = dashboard.filters().clone();

        dashboard.picker_event(PickerKind::Analytics, PickerEvent::SelectDay { date: date(2025, 3, 1) }, today);
        let view = dashboard
            .picker_event(PickerKind::Analytics, PickerEvent::Cancel, today)
            .unwrap();
        assert_eq!(view.status, None);
        assert!(!view.visible);
        assert_eq!(dashboard.filters(), &before);
    }

    #[test]
    fn remount_keeps_picker_state() {
        let today = date(2025, 3, 12);
        let mut dashboard = dashboard(today);
        mount_all(&mut dashboard, today);
        dashboard.picker_event(
            PickerKind::Analytics,
            PickerEvent::Navigate { direction: Direction::Next },
            today,
        );
        mount_all(&mut dashboard, today);
        let view = dashboard.picker_view(PickerKind::Analytics, today).unwrap();
        assert_eq!(view.month, 4);
        assert_eq!(view.label.as_deref(), Some("12 марта 2025 г."));
    }

    #[test]
    fn report_pages_slice_filtered_rows() {
        let today = date(2025, 3, 12);
        let mut dashboard = dashboard(today);
        dashboard.select_city("Алматы");
        let mut rng = StdRng::seed_from_u64(11);

        let first = dashboard.report_page(ReportRequest::default(), &mut rng);
        assert_eq!(first.rows.len(), 10);
        assert_eq!(first.page.total_results, 10);

        let small = dashboard.report_page(
            ReportRequest { per_page: Some(25), search: Some("№1".to_string()), ..Default::default() },
            &mut rng,
        );
        // №15, №104, №125, №137, №156
        assert_eq!(small.page.total_results, 5);
        assert_eq!(small.page.current_page, 1);

        let again = dashboard.report_page(ReportRequest::default(), &mut rng);
        let ids: Vec<u32> = again.rows.iter().map(|view| view.row.id).collect();
        let small_ids: Vec<u32> = small.rows.iter().map(|view| view.row.id).collect();
        assert_eq!(ids, small_ids);
        assert_eq!(again.rows[0].row, small.rows[0].row);
    }

    #[test]
    fn report_period_scales_rows() {
        let today = date(2025, 3, 12);
        let mut dashboard = dashboard(today);
        let mut rng = StdRng::seed_from_u64(5);
        let day = dashboard.report_page(ReportRequest::default(), &mut rng);
        let month = dashboard.report_page(
            ReportRequest { period: Some(Period::Month), ..Default::default() },
            &mut rng,
        );
        assert_eq!(month.period, Period::Month);
        assert_eq!(day.rows.len(), month.rows.len());
        assert!(month.totals.system.total_students > day.totals.system.total_students / 2);
    }

    #[test]
    fn school_selection_stays_within_city() {
        let mut dashboard = dashboard(date(2025, 3, 12));
        // 6 and 7 are in Астана, 11 is in Шымкент, 999 is unknown.
        assert_eq!(dashboard.select_schools(&[7, 11, 6, 999]), &[7, 6]);
        dashboard.select_city("Шымкент");
        assert_eq!(dashboard.select_schools(&[7, 11]), &[11]);
    }

    #[test]
    fn stale_preset_range_is_recomputed_on_start() {
        let last_week = date(2025, 3, 5);
        let stored = dashboard(last_week).filters().clone();
        assert!(!stored.custom_range);

        let today = date(2025, 3, 12);
        let restored = Dashboard::new(stored, today, Arc::new(RussianFormatter), 10);
        assert_eq!(restored.filters().date_range, Some(DateRange::single(today)));
        assert_eq!(restored.filters().date_label.as_deref(), Some("12 марта 2025 г."));
    }

    #[test]
    fn picked_range_survives_restart() {
        let picked_on = date(2025, 3, 5);
        let mut dashboard = dashboard(picked_on);
        mount_all(&mut dashboard, picked_on);
        for event in [
            PickerEvent::SelectDay { date: date(2025, 2, 10) },
            PickerEvent::SelectDay { date: date(2025, 2, 14) },
            PickerEvent::Apply,
        ] {
            dashboard.picker_event(PickerKind::Analytics, event, picked_on);
        }
        let stored = dashboard.filters().clone();
        assert!(stored.custom_range);

        let restored = Dashboard::new(stored, date(2025, 3, 12), Arc::new(RussianFormatter), 10);
        let expected = DateRange { start: date(2025, 2, 10), end: date(2025, 2, 14) };
        assert_eq!(restored.filters().date_range, Some(expected));

        let mut restored = restored;
        restored.set_period(Period::Week, date(2025, 3, 12));
        assert!(!restored.filters().custom_range);
    }
}
