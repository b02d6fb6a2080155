// Royalty backend REST repository implementation
use crate::application::royalty_repository::{AdvanceKind, ChartSource, RoyaltyRepository, Session};
use crate::domain::period::Period;
use crate::domain::royalty::{
    number_from_value, AdvanceOverview, AdvanceTypeSplit, Category, DashboardMetrics, TrendPoint,
};
use crate::infrastructure::config::{prepare_path, BackendSettings, EndpointsConfig};
use crate::infrastructure::error::BackendError;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header;
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;

const CATEGORY_ENVELOPES: [&str; 2] = ["categories", "data"];
const TREND_ENVELOPES: [&str; 2] = ["trend", "data"];
const TREND_PERIOD_FIELDS: [&str; 4] = ["day", "date", "label", "period"];
const TREND_VALUE_FIELDS: [&str; 3] = ["amount", "totalUSD", "value"];

#[derive(Debug, Clone)]
pub struct BackendRepository {
    client: reqwest::Client,
    base_url: String,
    endpoints: EndpointsConfig,
}

impl BackendRepository {
    pub fn new(settings: BackendSettings) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            endpoints: settings.endpoints,
        })
    }

    fn build_url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn get_json(&self, session: &Session, path: &str) -> Result<Value, BackendError> {
        let url = self.build_url(path);
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .header(header::COOKIE, format!("authToken={}", session.token()))
            .header(header::AUTHORIZATION, format!("Bearer {}", session.token()))
            .header(header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|source| BackendError::Transport {
                path: path.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BackendError::Status {
                path: path.to_string(),
                status,
                message: backend_message(&body),
            });
        }

        response
            .json::<Value>()
            .await
            .map_err(|source| BackendError::Transport {
                path: path.to_string(),
                source,
            })
    }
}

#[async_trait]
impl RoyaltyRepository for BackendRepository {
    async fn fetch_categories(
        &self,
        session: &Session,
        source: ChartSource,
        year: i32,
    ) -> Result<Vec<Category>> {
        let template = match source {
            ChartSource::StreamPerTrack => &self.endpoints.stream_per_track,
            ChartSource::TrackRevPerDsp => &self.endpoints.track_rev_per_dsp,
        };
        let mut vars = HashMap::new();
        vars.insert("year".to_string(), year.to_string());
        let path = prepare_path(template, &vars);

        let body = self.get_json(session, &path).await?;
        let categories = normalize_categories(body).map_err(|reason| BackendError::Shape {
            path: path.clone(),
            reason,
        })?;

        tracing::debug!("Fetched {} categories from {}", categories.len(), path);
        Ok(categories)
    }

    async fn fetch_dashboard_metrics(&self, session: &Session) -> Result<DashboardMetrics> {
        let path = &self.endpoints.dashboard;
        let body = self.get_json(session, path).await?;
        let metrics = normalize_dashboard(body).map_err(|source| BackendError::Decode {
            path: path.clone(),
            source,
        })?;
        Ok(metrics)
    }

    async fn fetch_expense_trend(&self, session: &Session) -> Result<Vec<TrendPoint>> {
        let path = &self.endpoints.expense_trend;
        let body = self.get_json(session, path).await?;
        Ok(normalize_trend(body))
    }

    async fn fetch_advance_trend(
        &self,
        session: &Session,
        kind: AdvanceKind,
    ) -> Result<Vec<TrendPoint>> {
        let mut vars = HashMap::new();
        vars.insert("kind".to_string(), kind.as_path().to_string());
        let path = prepare_path(&self.endpoints.advance_trend, &vars);

        let body = self.get_json(session, &path).await?;
        Ok(normalize_trend(body))
    }

    async fn fetch_advance_overview(&self, session: &Session) -> Result<AdvanceOverview> {
        let path = &self.endpoints.advance_overview;
        let body = self.get_json(session, path).await?;
        let overview = serde_json::from_value(unwrap_data(body, "totalAdvanceUSD")).map_err(
            |source| BackendError::Decode {
                path: path.clone(),
                source,
            },
        )?;
        Ok(overview)
    }

    async fn fetch_advance_type_split(&self, session: &Session) -> Result<AdvanceTypeSplit> {
        let path = &self.endpoints.advance_type_split;
        let body = self.get_json(session, path).await?;
        let split = serde_json::from_value(unwrap_data(body, "marketting")).map_err(|source| {
            BackendError::Decode {
                path: path.clone(),
                source,
            }
        })?;
        Ok(split)
    }
}

/// Error bodies look like `{"message": "..."}`; anything else is passed through
fn backend_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string())
}

/// Accepts a bare array or an object wrapping one under any of `envelopes`
fn unwrap_list(body: Value, envelopes: &[&str]) -> Option<Vec<Value>> {
    match body {
        Value::Array(items) => Some(items),
        Value::Object(mut map) => envelopes
            .iter()
            .find_map(|key| match map.remove(*key) {
                Some(Value::Array(items)) => Some(items),
                _ => None,
            }),
        _ => None,
    }
}

/// Decodes each category on its own so one malformed entry does not sink the chart
pub fn normalize_categories(body: Value) -> Result<Vec<Category>, String> {
    let items = unwrap_list(body, &CATEGORY_ENVELOPES)
        .ok_or_else(|| "expected a list of categories".to_string())?;

    Ok(items
        .into_iter()
        .enumerate()
        .filter_map(|(idx, item)| match serde_json::from_value::<Category>(item) {
            Ok(category) => Some(category),
            Err(e) => {
                tracing::warn!("Skipping malformed category at index {}: {}", idx, e);
                None
            }
        })
        .collect())
}

/// Unwraps `{"data": {...}}` unless the object already carries `marker`
fn unwrap_data(body: Value, marker: &str) -> Value {
    match body {
        Value::Object(mut map) if !map.contains_key(marker) && map.contains_key("data") => {
            map.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    }
}

pub fn normalize_dashboard(body: Value) -> Result<DashboardMetrics, serde_json::Error> {
    serde_json::from_value(unwrap_data(body, "totalRevenue"))
}

/// Normalizes `{amount, day}` expense items and `{totalUSD, date}` advance items
pub fn normalize_trend(body: Value) -> Vec<TrendPoint> {
    let Some(items) = unwrap_list(body, &TREND_ENVELOPES) else {
        tracing::warn!("Trend response is not a list, treating as empty");
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|item| {
            let period = TREND_PERIOD_FIELDS
                .iter()
                .find_map(|field| item.get(*field))
                .and_then(|v| serde_json::from_value::<Period>(v.clone()).ok());
            let Some(period) = period else {
                tracing::warn!("Skipping trend item without a period: {}", item);
                return None;
            };
            let value = TREND_VALUE_FIELDS
                .iter()
                .find_map(|field| item.get(*field).and_then(number_from_value))
                .unwrap_or(0.0);
            Some(TrendPoint::new(period, value))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn category_json() -> Value {
        json!({"name": "Track A", "periods": [{"period": "Jan", "breakdowns": [{"dimension": "Spotify", "streams": 3}]}]})
    }

    #[test]
    fn test_category_envelopes() {
        for body in [
            json!({"categories": [category_json()]}),
            json!({"data": [category_json()]}),
            json!([category_json()]),
        ] {
            let categories = normalize_categories(body).unwrap();
            assert_eq!(categories.len(), 1);
            assert_eq!(categories[0].name, "Track A");
        }

        assert!(normalize_categories(json!({"message": "ok"})).is_err());
        assert!(normalize_categories(json!("nope")).is_err());
    }

    #[test]
    fn test_malformed_category_is_skipped() {
        let body = json!([
            {"periods": []},
            {"name": "Bad periods", "periods": "Jan"},
            {"name": "Bad period", "periods": [{"period": null, "breakdowns": []}]},
            category_json()
        ]);
        let categories = normalize_categories(body).unwrap();
        assert_eq!(categories.len(), 1);
        assert_eq!(categories[0].name, "Track A");
    }

    #[test]
    fn test_trend_shapes() {
        let expenses = normalize_trend(json!({"trend": [
            {"amount": 25.5, "day": "2024-05-02"},
            {"day": "2024-05-03"},
            {"amount": 4}
        ]}));
        assert_eq!(expenses.len(), 2);
        assert_eq!(expenses[0].value, 25.5);
        assert_eq!(expenses[1].value, 0.0);

        let advances = normalize_trend(json!([{"totalUSD": 300, "date": "2024-04"}]));
        assert_eq!(advances[0].value, 300.0);
        assert_eq!(advances[0].period.label(), "2024-04");

        assert!(normalize_trend(json!({"trend": null})).is_empty());
    }

    #[test]
    fn test_trend_accepts_numeric_strings() {
        let expenses = normalize_trend(json!({"trend": [
            {"amount": "25.5", "day": "2024-05-02"},
            {"amount": " 4 ", "day": "2024-05-03"},
            {"amount": "n/a", "day": "2024-05-04"}
        ]}));
        let values: Vec<f64> = expenses.iter().map(|p| p.value).collect();
        assert_eq!(values, vec![25.5, 4.0, 0.0]);
    }

    #[test]
    fn test_advance_payload_envelopes() {
        let overview = json!({"totalAdvanceUSD": 1200, "totalRepaidUSD": 200, "outstandingUSD": 1000, "totalAdvanceSources": 3});
        let direct: AdvanceOverview = serde_json::from_value(unwrap_data(overview.clone(), "totalAdvanceUSD")).unwrap();
        let wrapped: AdvanceOverview =
            serde_json::from_value(unwrap_data(json!({"data": overview}), "totalAdvanceUSD")).unwrap();
        assert_eq!(direct, wrapped);
        assert_eq!(direct.total_advance_sources, 3.0);

        let split: AdvanceTypeSplit = serde_json::from_value(unwrap_data(
            json!({"data": {"marketting": {"totalUSD": "75"}}}),
            "marketting",
        ))
        .unwrap();
        assert_eq!(split.marketing.and_then(|s| s.total_usd), Some(75.0));
        assert!(split.personal.is_none());
    }

    #[test]
    fn test_dashboard_envelope() {
        let raw = json!({
            "totalRevenue": 10.5,
            "totalStreams": 900,
            "topTrack": null,
            "revenueByMonth": [{"label": "Jan", "revenue": 10.5}],
            "streamsByMonth": []
        });
        let direct = normalize_dashboard(raw.clone()).unwrap();
        let wrapped = normalize_dashboard(json!({"message": "ok", "data": raw})).unwrap();

        assert_eq!(direct, wrapped);
        assert_eq!(direct.total_streams, 900.0);
        assert_eq!(direct.revenue_by_month[0].streams, None);
    }

    #[test]
    fn test_backend_message() {
        assert_eq!(backend_message(r#"{"message": "Unauthorized"}"#), "Unauthorized");
        assert_eq!(backend_message(" upstream timeout "), "upstream timeout");
    }

    #[test]
    fn test_build_url_joins_slashes() {
        let repository = BackendRepository::new(BackendSettings {
            base_url: "https://api.example.com/".to_string(),
            timeout_secs: 5,
            endpoints: EndpointsConfig {
                stream_per_track: String::new(),
                track_rev_per_dsp: String::new(),
                dashboard: String::new(),
                expense_trend: String::new(),
                advance_trend: String::new(),
                advance_overview: String::new(),
                advance_type_split: String::new(),
            },
        })
        .unwrap();
        assert_eq!(
            repository.build_url("/royalties/dashboard"),
            "https://api.example.com/royalties/dashboard"
        );
    }
}
