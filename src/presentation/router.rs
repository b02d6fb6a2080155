// Route table for the chart service
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    get_chart, get_dashboard, health_check, toggle_all_selection, toggle_selection,
};
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Responses are compressed in the JSON response builder, so no CompressionLayer
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(health_check))
        .route("/dashboard", get(get_dashboard))
        .route("/charts/selection/toggle", post(toggle_selection))
        .route("/charts/:source", get(get_chart))
        .route("/charts/:source/selection/toggle-all", post(toggle_all_selection))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::chart_service::ChartService;
    use crate::application::dashboard_service::DashboardService;
    use crate::application::mock_repository::MockRepository;
    use crate::domain::royalty::Category;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn tracks() -> Vec<Category> {
        serde_json::from_value(json!([
            {"name": "Track A", "periods": [{"period": "Jan", "breakdowns": [{"dimension": "Spotify", "streams": 10}]}]},
            {"name": "Track B", "periods": [{"period": "Feb", "breakdowns": [{"dimension": "Apple", "streams": 5}]}]}
        ]))
        .unwrap()
    }

    fn app(responses: Vec<anyhow::Result<Vec<Category>>>) -> Router {
        let repository = Arc::new(MockRepository::with_categories(responses));
        router(Arc::new(AppState {
            chart_service: ChartService::new(repository.clone(), 2, 8),
            dashboard_service: DashboardService::new(repository),
            default_year: Some(2024),
        }))
    }

    fn get(uri: &str, token: Option<&str>) -> Request<Body> {
        let mut request = Request::builder().uri(uri);
        if let Some(token) = token {
            request = request.header(header::COOKIE, format!("authToken={}", token));
        }
        request.body(Body::empty()).unwrap()
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_empty_series_param_differs_from_omitted() {
        let app = app(vec![Ok(tracks()), Ok(tracks())]);

        let response = app
            .clone()
            .oneshot(get("/charts/stream-per-track?series=", Some("t")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let explicit = json_body(response).await;
        assert_eq!(explicit["selected"], json!([]));
        assert_eq!(explicit["rows"][0], json!({"x": "Jan"}));

        let response = app
            .oneshot(get("/charts/stream-per-track", Some("t")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let defaulted = json_body(response).await;
        assert_eq!(defaulted["selected"], json!(["Track A", "Track B"]));
        assert_eq!(defaulted["year"], 2024);
    }

    #[tokio::test]
    async fn test_missing_session_is_unauthorized() {
        let app = app(vec![Ok(tracks())]);

        for uri in ["/charts/stream-per-track", "/dashboard"] {
            let response = app.clone().oneshot(get(uri, None)).await.unwrap();
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
            assert!(json_body(response).await["message"].is_string());
        }

        let response = app.oneshot(get("/healthz", None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_unknown_chart_source_is_rejected() {
        let response = app(Vec::new())
            .oneshot(get("/charts/album-totals", Some("t")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
