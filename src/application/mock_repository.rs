// In-memory repository for service tests
use crate::application::royalty_repository::{AdvanceKind, ChartSource, RoyaltyRepository, Session};
use crate::domain::royalty::{AdvanceOverview, AdvanceTypeSplit, Category, DashboardMetrics, TrendPoint};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

#[derive(Default)]
pub struct MockRepository {
    /// Popped once per fetch_categories call; an empty queue fails the call
    pub categories: Mutex<VecDeque<anyhow::Result<Vec<Category>>>>,
    pub metrics: Option<DashboardMetrics>,
    pub expense_trend: Option<Vec<TrendPoint>>,
    pub marketing_trend: Option<Vec<TrendPoint>>,
    pub personal_trend: Option<Vec<TrendPoint>>,
    pub advance_overview: Option<AdvanceOverview>,
    pub advance_type_split: Option<AdvanceTypeSplit>,
}

impl MockRepository {
    pub fn with_categories(responses: Vec<anyhow::Result<Vec<Category>>>) -> Self {
        Self {
            categories: Mutex::new(responses.into()),
            ..Self::default()
        }
    }
}

#[async_trait]
impl RoyaltyRepository for MockRepository {
    async fn fetch_categories(
        &self,
        _session: &Session,
        _source: ChartSource,
        _year: i32,
    ) -> anyhow::Result<Vec<Category>> {
        self.categories
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(anyhow::anyhow!("no response queued")))
    }

    async fn fetch_dashboard_metrics(&self, _session: &Session) -> anyhow::Result<DashboardMetrics> {
        self.metrics
            .clone()
            .ok_or_else(|| anyhow::anyhow!("metrics unavailable"))
    }

    async fn fetch_expense_trend(&self, _session: &Session) -> anyhow::Result<Vec<TrendPoint>> {
        self.expense_trend
            .clone()
            .ok_or_else(|| anyhow::anyhow!("expense trend unavailable"))
    }

    async fn fetch_advance_trend(
        &self,
        _session: &Session,
        kind: AdvanceKind,
    ) -> anyhow::Result<Vec<TrendPoint>> {
        match kind {
            AdvanceKind::Marketing => self.marketing_trend.clone(),
            AdvanceKind::Personal => self.personal_trend.clone(),
        }
        .ok_or_else(|| anyhow::anyhow!("advance trend unavailable"))
    }

    async fn fetch_advance_overview(&self, _session: &Session) -> anyhow::Result<AdvanceOverview> {
        self.advance_overview
            .clone()
            .ok_or_else(|| anyhow::anyhow!("advance overview unavailable"))
    }

    async fn fetch_advance_type_split(&self, _session: &Session) -> anyhow::Result<AdvanceTypeSplit> {
        self.advance_type_split
            .clone()
            .ok_or_else(|| anyhow::anyhow!("advance type split unavailable"))
    }
}
