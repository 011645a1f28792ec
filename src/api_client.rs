//! JSON-over-HTTP client for an optional analytics backend.

use crate::calendar::DateRange;
use crate::models::{FilterState, Period};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;
use tracing::{error, warn};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{message}")]
    Status { status: StatusCode, message: String },
    #[error("request to {endpoint} timed out")]
    Timeout { endpoint: String },
    #[error("network error: {0}")]
    Network(String),
    #[error("invalid response body: {0}")]
    Decode(String),
}

impl ApiError {
    /// Text shown to dashboard users.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Status { status, message } => match status.as_u16() {
                400 => "Неверные параметры запроса".to_string(),
                401 => "Требуется авторизация".to_string(),
                403 => "Доступ запрещён".to_string(),
                404 => "Данные не найдены".to_string(),
                500 => "Ошибка сервера. Попробуйте позже".to_string(),
                _ if !message.is_empty() => message.clone(),
                _ => "Произошла ошибка".to_string(),
            },
            ApiError::Timeout { .. } => "Превышено время ожидания".to_string(),
            ApiError::Network(_) => "Ошибка сети. Проверьте подключение".to_string(),
            ApiError::Decode(_) => "Произошла неизвестная ошибка".to_string(),
        }
    }

    fn is_retryable(&self) -> bool {
        matches!(self, ApiError::Timeout { .. } | ApiError::Network(_))
    }
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    retry_attempts: u32,
    backoff: Duration,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration, retry_attempts: u32) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| ApiError::Network(err.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            retry_attempts,
            backoff: Duration::from_secs(1),
        })
    }

    /// Base delay between retries; attempt `n` waits `n` times this long.
    pub fn with_backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }

    pub async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let mut attempt = 0;
        loop {
            match self.get_once(endpoint, query).await {
                Ok(value) => return Ok(value),
                Err(err) if err.is_retryable() && attempt < self.retry_attempts => {
                    attempt += 1;
                    warn!(endpoint, attempt, "retrying request: {err}");
                    tokio::time::sleep(self.backoff * attempt).await;
                }
                Err(err) => {
                    error!(endpoint, "api request failed: {err}");
                    return Err(err);
                }
            }
        }
    }

    async fn get_once<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let url = format!("{}{}", self.base_url, endpoint);
        let response = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|err| classify(endpoint, err))?;

        let status = response.status();
        if !status.is_success() {
            let body: Option<serde_json::Value> = response.json().await.ok();
            let message = body
                .as_ref()
                .and_then(|value| value.get("message"))
                .and_then(|value| value.as_str())
                .map(str::to_string)
                .unwrap_or_else(|| format!("HTTP {}", status.as_u16()));
            return Err(ApiError::Status { status, message });
        }

        response
            .json()
            .await
            .map_err(|err| ApiError::Decode(err.to_string()))
    }
}

fn classify(endpoint: &str, err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        ApiError::Timeout {
            endpoint: endpoint.to_string(),
        }
    } else {
        ApiError::Network(err.to_string())
    }
}

/// Query parameters for the analytics endpoints.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnalyticsQuery {
    pub city: Option<String>,
    pub school_ids: Vec<u32>,
    pub period: Option<Period>,
    pub range: Option<DateRange>,
}

impl AnalyticsQuery {
    pub fn from_filters(filters: &FilterState) -> Self {
        Self {
            city: Some(filters.city.clone()),
            school_ids: filters.selected_schools.clone(),
            period: Some(filters.period),
            range: filters.date_range,
        }
    }

    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(city) = &self.city {
            params.push(("city", city.clone()));
        }
        if !self.school_ids.is_empty() {
            let ids: Vec<String> = self.school_ids.iter().map(u32::to_string).collect();
            params.push(("schoolIds", ids.join(",")));
        }
        if let Some(period) = self.period {
            params.push(("period", period.as_str().to_string()));
        }
        if let Some(range) = self.range {
            params.push(("startDate", range.start.to_string()));
            params.push(("endDate", range.end.to_string()));
        }
        params
    }
}
