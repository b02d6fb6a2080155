// Application state for HTTP handlers
use crate::application::chart_service::ChartService;
use crate::application::dashboard_service::DashboardService;
use chrono::Datelike;

#[derive(Clone)]
pub struct AppState {
    pub chart_service: ChartService,
    pub dashboard_service: DashboardService,
    pub default_year: Option<i32>,
}

impl AppState {
    pub fn year_or_default(&self, year: Option<i32>) -> i32 {
        year.or(self.default_year)
            .unwrap_or_else(|| chrono::Utc::now().year())
    }
}
