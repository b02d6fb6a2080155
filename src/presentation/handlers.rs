// HTTP request handlers
use crate::application::chart_service::ChartQuery;
use crate::application::royalty_repository::{ChartSource, Session};
use crate::domain::royalty::ViewMode;
use crate::domain::series::{toggle_series_selection, SeriesSelection};
use crate::infrastructure::http_response::{accepts_brotli, json_response};
use crate::presentation::app_state::AppState;
use crate::presentation::error::ApiError;
use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct ChartParams {
    pub year: Option<i32>,
    pub mode: Option<ViewMode>,
    /// Comma separated series names; present but empty means "nothing selected"
    pub series: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ModeParams {
    pub mode: Option<ViewMode>,
}

#[derive(Debug, Deserialize)]
pub struct YearParams {
    pub year: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct ToggleRequest {
    #[serde(default)]
    pub current: SeriesSelection,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct ToggleAllRequest {
    #[serde(default)]
    pub current: SeriesSelection,
}

#[derive(Debug, Serialize)]
pub struct SelectionResponse {
    pub selected: SeriesSelection,
}

fn parse_series(raw: &str) -> SeriesSelection {
    raw.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

async fn respond<T: Serialize>(headers: &HeaderMap, data: &T) -> Response {
    match json_response(StatusCode::OK, data, accepts_brotli(headers)).await {
        Ok(response) => response,
        Err(status) => status.into_response(),
    }
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Multi-series chart for one category endpoint
pub async fn get_chart(
    Path(source): Path<ChartSource>,
    Query(params): Query<ChartParams>,
    session: Session,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Result<Response, ApiError> {
    let query = ChartQuery {
        source,
        year: state.year_or_default(params.year),
        mode: params.mode.unwrap_or_default(),
        series: params.series.as_deref().map(parse_series),
    };

    let view = state.chart_service.chart(&session, query).await?;
    Ok(respond(&headers, &view).await)
}

/// Adds or removes one series from the client's selection
pub async fn toggle_selection(Json(request): Json<ToggleRequest>) -> Result<Json<SelectionResponse>, ApiError> {
    if request.name.trim().is_empty() {
        return Err(ApiError::BadRequest("Series name is required".to_string()));
    }
    Ok(Json(SelectionResponse {
        selected: toggle_series_selection(&request.current, &request.name),
    }))
}

/// Select-all checkbox for a chart's series table
pub async fn toggle_all_selection(
    Path(source): Path<ChartSource>,
    Query(params): Query<YearParams>,
    session: Session,
    State(state): State<Arc<AppState>>,
    Json(request): Json<ToggleAllRequest>,
) -> Result<Json<SelectionResponse>, ApiError> {
    let year = state.year_or_default(params.year);
    let selected = state
        .chart_service
        .toggle_all(&session, source, year, &request.current)
        .await?;
    Ok(Json(SelectionResponse { selected }))
}

/// Overview dashboard cards
pub async fn get_dashboard(
    Query(params): Query<ModeParams>,
    session: Session,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Response {
    let dashboard = state
        .dashboard_service
        .get_dashboard(&session, params.mode.unwrap_or_default())
        .await;
    respond(&headers, &dashboard).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_series() {
        let parsed = parse_series(" Track A ,Track B,,");
        assert_eq!(parsed.len(), 2);
        assert!(parsed.contains("Track A"));
        assert!(parsed.contains("Track B"));
        assert!(parse_series("").is_empty());
    }

    #[tokio::test]
    async fn test_toggle_selection() {
        let request = ToggleRequest {
            current: ["A".to_string()].into_iter().collect(),
            name: "B".to_string(),
        };
        let Json(response) = toggle_selection(Json(request)).await.unwrap();
        assert_eq!(response.selected.len(), 2);

        let empty = ToggleRequest {
            current: SeriesSelection::new(),
            name: "  ".to_string(),
        };
        assert!(matches!(
            toggle_selection(Json(empty)).await,
            Err(ApiError::BadRequest(_))
        ));
    }
}
