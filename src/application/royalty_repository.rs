// Repository trait for royalty backend access
use crate::domain::royalty::{AdvanceOverview, AdvanceTypeSplit, Category, DashboardMetrics, TrendPoint};
use async_trait::async_trait;
use serde::Deserialize;
use std::fmt;

/// Request-scoped credentials forwarded to the backend
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    token: String,
}

impl Session {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session").field("token", &"<redacted>").finish()
    }
}

/// Category-style chart endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChartSource {
    StreamPerTrack,
    TrackRevPerDsp,
}

impl ChartSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChartSource::StreamPerTrack => "stream-per-track",
            ChartSource::TrackRevPerDsp => "track-rev-per-dsp",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvanceKind {
    Marketing,
    Personal,
}

impl AdvanceKind {
    /// Path segment as the backend spells it
    pub fn as_path(&self) -> &'static str {
        match self {
            AdvanceKind::Marketing => "marketting",
            AdvanceKind::Personal => "personal",
        }
    }
}

#[async_trait]
pub trait RoyaltyRepository: Send + Sync {
    /// Per-category period data for a chart, for one calendar year
    async fn fetch_categories(
        &self,
        session: &Session,
        source: ChartSource,
        year: i32,
    ) -> anyhow::Result<Vec<Category>>;

    /// Headline royalty metrics and monthly revenue/streams
    async fn fetch_dashboard_metrics(&self, session: &Session) -> anyhow::Result<DashboardMetrics>;

    async fn fetch_expense_trend(&self, session: &Session) -> anyhow::Result<Vec<TrendPoint>>;

    async fn fetch_advance_trend(
        &self,
        session: &Session,
        kind: AdvanceKind,
    ) -> anyhow::Result<Vec<TrendPoint>>;

    async fn fetch_advance_overview(&self, session: &Session) -> anyhow::Result<AdvanceOverview>;

    /// Marketing vs personal advance totals
    async fn fetch_advance_type_split(&self, session: &Session) -> anyhow::Result<AdvanceTypeSplit>;
}
