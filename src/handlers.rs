use crate::api_client::AnalyticsQuery;
use crate::calendar::{CalendarView, PickerEvent};
use crate::catalog::{self, CITIES, City};
use crate::errors::AppError;
use crate::filters::{Dashboard, PickerKind, ReportRequest};
use crate::models::{
    AnalyticsResponse, ChartData, CityRequest, FilterState, MonthlySavings, PageQuery,
    PeriodRequest, ReportPage, ReportsQuery, SavingsQuery, SchoolsRequest,
};
use crate::pagination::ITEMS_PER_PAGE_OPTIONS;
use crate::sample;
use crate::state::AppState;
use crate::storage::persist_filters;
use crate::ui::{element_ids, render_page};
use axum::{
    Json,
    extract::{Path, Query, State},
    response::Html,
};
use chrono::{Local, NaiveDate};
use tracing::info;

pub async fn index(State(state): State<AppState>, Query(query): Query<PageQuery>) -> Html<String> {
    let page = catalog::validate_page(query.page.as_deref().unwrap_or("home"));
    let today = today();
    let mut dashboard = state.dashboard.lock().await;
    dashboard.mount(&element_ids(page), today);
    Html(render_page(page, &dashboard, today))
}

pub async fn get_cities() -> Json<&'static [City]> {
    Json(&CITIES[..])
}

pub async fn get_filters(State(state): State<AppState>) -> Json<FilterState> {
    let dashboard = state.dashboard.lock().await;
    Json(dashboard.filters().clone())
}

pub async fn set_city(
    State(state): State<AppState>,
    Json(payload): Json<CityRequest>,
) -> Result<Json<FilterState>, AppError> {
    let mut dashboard = state.dashboard.lock().await;
    dashboard.select_city(&payload.city);
    persist_filters(&state.data_path, dashboard.filters()).await?;
    Ok(Json(dashboard.filters().clone()))
}

pub async fn set_schools(
    State(state): State<AppState>,
    Json(payload): Json<SchoolsRequest>,
) -> Result<Json<FilterState>, AppError> {
    let mut dashboard = state.dashboard.lock().await;
    dashboard.select_schools(&payload.school_ids);
    persist_filters(&state.data_path, dashboard.filters()).await?;
    Ok(Json(dashboard.filters().clone()))
}

pub async fn set_period(
    State(state): State<AppState>,
    Json(payload): Json<PeriodRequest>,
) -> Result<Json<FilterState>, AppError> {
    let mut dashboard = state.dashboard.lock().await;
    dashboard.set_period(payload.period, today());
    persist_filters(&state.data_path, dashboard.filters()).await?;
    Ok(Json(dashboard.filters().clone()))
}

pub async fn get_picker(
    State(state): State<AppState>,
    Path(which): Path<String>,
) -> Result<Json<CalendarView>, AppError> {
    let kind = parse_picker(&which)?;
    let dashboard = state.dashboard.lock().await;
    dashboard
        .picker_view(kind, today())
        .map(Json)
        .ok_or_else(|| not_mounted(&which))
}

pub async fn picker_event(
    State(state): State<AppState>,
    Path(which): Path<String>,
    Json(event): Json<PickerEvent>,
) -> Result<Json<CalendarView>, AppError> {
    let kind = parse_picker(&which)?;
    let mut dashboard = state.dashboard.lock().await;
    let before = dashboard.filters().clone();
    let view = dashboard
        .picker_event(kind, event, today())
        .ok_or_else(|| not_mounted(&which))?;
    persist_if_changed(&state, &dashboard, &before).await?;
    Ok(Json(view))
}

pub async fn get_analytics(State(state): State<AppState>) -> Result<Json<AnalyticsResponse>, AppError> {
    let filters = state.dashboard.lock().await.filters().clone();

    let (source, data) = match &state.api {
        Some(api) => {
            let query = AnalyticsQuery::from_filters(&filters);
            let data: ChartData = api.get_json("/analytics", &query.params()).await?;
            ("upstream", data)
        }
        None => ("sample", sample_charts(&filters)),
    };

    Ok(Json(AnalyticsResponse {
        city: filters.city,
        period: filters.period,
        date_range: filters.date_range,
        date_label: filters.date_label,
        source,
        data,
    }))
}

pub async fn get_reports(
    State(state): State<AppState>,
    Query(query): Query<ReportsQuery>,
) -> Result<Json<ReportPage>, AppError> {
    if let Some(per_page) = query.per_page {
        if !ITEMS_PER_PAGE_OPTIONS.contains(&per_page) {
            return Err(AppError::bad_request(format!(
                "per_page must be one of {ITEMS_PER_PAGE_OPTIONS:?}"
            )));
        }
    }

    let request = ReportRequest {
        page: query.page,
        per_page: query.per_page,
        search: query.search,
        period: query.period,
    };
    let mut dashboard = state.dashboard.lock().await;
    let before = dashboard.filters().clone();
    let page = build_report_page(&mut dashboard, request);
    persist_if_changed(&state, &dashboard, &before).await?;
    info!(
        page = page.page.current_page,
        rows = page.rows.len(),
        total = page.page.total_results,
        "report page served"
    );
    Ok(Json(page))
}

pub async fn get_savings(Query(query): Query<SavingsQuery>) -> Json<MonthlySavings> {
    Json(sample::monthly_savings(query.year.unwrap_or(sample::LATEST_SAVINGS_YEAR)))
}

/// Must be called with the dashboard lock held.
async fn persist_if_changed(
    state: &AppState,
    dashboard: &Dashboard,
    before: &FilterState,
) -> Result<(), AppError> {
    if dashboard.filters() != before {
        persist_filters(&state.data_path, dashboard.filters()).await?;
    }
    Ok(())
}

fn build_report_page(dashboard: &mut Dashboard, request: ReportRequest) -> ReportPage {
    dashboard.report_page(request, &mut rand::thread_rng())
}

fn sample_charts(filters: &FilterState) -> ChartData {
    sample::chart_data(&filters.city, filters.period, &mut rand::thread_rng())
}

fn parse_picker(which: &str) -> Result<PickerKind, AppError> {
    which.parse().map_err(AppError::bad_request)
}

fn not_mounted(which: &str) -> AppError {
    AppError::not_found(format!("picker '{which}' is not on any loaded page"))
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}
