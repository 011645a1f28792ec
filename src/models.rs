use crate::calendar::DateRange;
use crate::catalog::DEFAULT_CITY;
use crate::pagination::PageInfo;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Period {
    #[default]
    #[serde(alias = "today")]
    Day,
    Yesterday,
    Week,
    Month,
}

impl Period {
    pub fn as_str(self) -> &'static str {
        match self {
            Period::Day => "day",
            Period::Yesterday => "yesterday",
            Period::Week => "week",
            Period::Month => "month",
        }
    }

    /// Scale applied to generated chart volumes.
    pub fn chart_multiplier(self) -> f64 {
        match self {
            Period::Day | Period::Yesterday => 1.0,
            Period::Week => 7.0,
            Period::Month => 30.0,
        }
    }

    /// Scale applied to report rows.
    pub fn report_multiplier(self) -> f64 {
        match self {
            Period::Day => 1.0,
            Period::Yesterday => 0.95,
            Period::Week => 1.1,
            Period::Month => 1.3,
        }
    }
}

/// Everything the dashboard filters on. Persisted between runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterState {
    pub city: String,
    pub selected_schools: Vec<u32>,
    pub period: Period,
    pub date_range: Option<DateRange>,
    pub date_label: Option<String>,
    /// Set when `date_range` came from the picker rather than a period tab.
    pub custom_range: bool,
    pub reports_period: Period,
    pub reports_range: Option<DateRange>,
    pub reports_label: Option<String>,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            city: DEFAULT_CITY.to_string(),
            selected_schools: Vec::new(),
            period: Period::Day,
            date_range: None,
            date_label: None,
            custom_range: false,
            reports_period: Period::Day,
            reports_range: None,
            reports_label: None,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CityRequest {
    pub city: String,
}

#[derive(Debug, Deserialize)]
pub struct SchoolsRequest {
    pub school_ids: Vec<i64>,
}

#[derive(Debug, Deserialize)]
pub struct PeriodRequest {
    pub period: Period,
}

#[derive(Debug, Default, Deserialize)]
pub struct ReportsQuery {
    pub page: Option<usize>,
    pub per_page: Option<usize>,
    pub search: Option<String>,
    pub period: Option<Period>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SavingsQuery {
    pub year: Option<i32>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PieSlice {
    pub name: String,
    pub value: u64,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarSeries {
    pub categories: Vec<String>,
    pub positive_label: String,
    pub positive: Vec<u64>,
    pub negative_label: String,
    pub negative: Vec<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSection {
    pub pie: Vec<PieSlice>,
    pub bar: BarSeries,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub total: u64,
    pub attended: u64,
    pub nutrition: u64,
    pub nutrition14: u64,
    pub nutrition511: u64,
    pub savings: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartData {
    pub attendance: ChartSection,
    pub nutrition: ChartSection,
    pub library: ChartSection,
    pub summary: Summary,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlySavings {
    pub year: i32,
    pub years: Vec<i32>,
    pub labels: Vec<&'static str>,
    pub values: Vec<u64>,
    pub total: u64,
}

#[derive(Debug, Serialize)]
pub struct AnalyticsResponse {
    pub city: String,
    pub period: Period,
    pub date_range: Option<DateRange>,
    pub date_label: Option<String>,
    pub source: &'static str,
    pub data: ChartData,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Enrollment {
    pub students14: u64,
    pub students511: u64,
    pub total_students: u64,
    pub staff: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Attendance {
    pub students14: u64,
    pub students511: u64,
    pub staff: u64,
    pub percentage: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Nutrition {
    pub received: u64,
    pub not_received: u64,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchoolRow {
    pub id: u32,
    pub name: String,
    pub system: Enrollment,
    pub attended: Attendance,
    pub nutrition14: Nutrition,
    pub nutrition511: Nutrition,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Badge {
    Green,
    Yellow,
    Red,
}

#[derive(Debug, Clone, Serialize)]
pub struct RowView {
    #[serde(flatten)]
    pub row: SchoolRow,
    pub attendance_badge: Badge,
    pub nutrition14_badge: Badge,
    pub nutrition511_badge: Badge,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Totals {
    pub system: Enrollment,
    pub attended: Attendance,
    pub nutrition14: Nutrition,
    pub nutrition511: Nutrition,
}

#[derive(Debug, Serialize)]
pub struct ReportPage {
    pub period: Period,
    pub date_label: Option<String>,
    pub rows: Vec<RowView>,
    pub totals: Totals,
    pub attendance_badge: Badge,
    pub nutrition14_badge: Badge,
    pub nutrition511_badge: Badge,
    pub page: PageInfo,
}
