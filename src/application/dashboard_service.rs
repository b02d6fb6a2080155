// Dashboard service - Use case for building the overview dashboard
use crate::application::royalty_repository::{AdvanceKind, RoyaltyRepository, Session};
use crate::domain::dashboard::{advance_type_slices, ChartKind, Dashboard, TrendCard};
use crate::domain::royalty::ViewMode;
use crate::domain::series::{single_series_rows, trend_rows};
use std::sync::Arc;

#[derive(Clone)]
pub struct DashboardService {
    repository: Arc<dyn RoyaltyRepository>,
}

impl DashboardService {
    pub fn new(repository: Arc<dyn RoyaltyRepository>) -> Self {
        Self { repository }
    }

    /// Fetches every card concurrently. A card whose endpoint fails is left
    /// out; the dashboard itself never fails. Revenue and streams by month are
    /// both returned; `mode` is echoed back for the client toggle.
    pub async fn get_dashboard(&self, session: &Session, mode: ViewMode) -> Dashboard {
        let (metrics, expenses, marketing, personal, overview, type_split) = tokio::join!(
            self.repository.fetch_dashboard_metrics(session),
            self.repository.fetch_expense_trend(session),
            self.repository.fetch_advance_trend(session, AdvanceKind::Marketing),
            self.repository.fetch_advance_trend(session, AdvanceKind::Personal),
            self.repository.fetch_advance_overview(session),
            self.repository.fetch_advance_type_split(session),
        );

        let mut dashboard = Dashboard::new(mode);

        match metrics {
            Ok(metrics) => {
                dashboard.total_revenue = Some(metrics.total_revenue);
                dashboard.total_streams = Some(metrics.total_streams);
                dashboard.top_track = metrics.top_track;

                dashboard.cards.push(TrendCard::new(
                    "royalty-revenue",
                    "Revenue by month",
                    ChartKind::Bar,
                    single_series_rows(&metrics.revenue_by_month, ViewMode::Revenue),
                ));
                dashboard.cards.push(TrendCard::new(
                    "royalty-streams",
                    "Streams by month",
                    ChartKind::Line,
                    single_series_rows(&metrics.streams_by_month, ViewMode::Streams),
                ));
            }
            Err(e) => tracing::error!("Error fetching royalty metrics: {:#}", e),
        }

        let trends = [
            ("expense-trend", "Expenses", ChartKind::Bar, expenses),
            ("advance-marketing", "Marketing advances", ChartKind::Line, marketing),
            ("advance-personal", "Personal advances", ChartKind::Line, personal),
        ];
        for (id, title, kind, points) in trends {
            match points {
                Ok(points) => dashboard
                    .cards
                    .push(TrendCard::new(id, title, kind, trend_rows(&points))),
                Err(e) => tracing::error!("Error fetching {}: {:#}", id, e),
            }
        }

        match type_split {
            Ok(split) => dashboard.cards.push(TrendCard::donut(
                "advance-types",
                "Advance types",
                advance_type_slices(&split),
            )),
            Err(e) => tracing::error!("Error fetching advance-types: {:#}", e),
        }

        match overview {
            Ok(overview) => dashboard.advance = Some(overview),
            Err(e) => tracing::error!("Error fetching advance overview: {:#}", e),
        }

        dashboard
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::mock_repository::MockRepository;
    use crate::domain::period::Period;
    use crate::domain::royalty::{
        AdvanceOverview, AdvanceShare, AdvanceTypeSplit, DashboardMetrics, MonthlyMetric, TrendPoint,
    };

    fn metrics() -> DashboardMetrics {
        DashboardMetrics {
            total_revenue: 120.0,
            total_streams: 4000.0,
            top_track: None,
            revenue_by_month: vec![MonthlyMetric {
                label: "Jan".into(),
                revenue: Some(120.0),
                streams: None,
            }],
            streams_by_month: vec![MonthlyMetric {
                label: "Jan".into(),
                revenue: None,
                streams: None,
            }],
        }
    }

    #[tokio::test]
    async fn test_dashboard_carries_both_royalty_cards() {
        let repository = MockRepository {
            metrics: Some(metrics()),
            expense_trend: Some(vec![TrendPoint::new(Period::parse("2024-01-03"), 40.0)]),
            marketing_trend: Some(Vec::new()),
            personal_trend: Some(Vec::new()),
            ..MockRepository::default()
        };
        let service = DashboardService::new(Arc::new(repository));
        let session = Session::new("t");

        for mode in [ViewMode::Revenue, ViewMode::Streams] {
            let dashboard = service.get_dashboard(&session, mode).await;
            assert_eq!(dashboard.mode, mode);
            assert_eq!(dashboard.total_revenue, Some(120.0));

            let ids: Vec<&str> = dashboard.cards.iter().map(|c| c.id.as_str()).collect();
            assert_eq!(
                ids,
                vec![
                    "royalty-revenue",
                    "royalty-streams",
                    "expense-trend",
                    "advance-marketing",
                    "advance-personal"
                ]
            );
            assert_eq!(dashboard.cards[0].rows[0].v, 120.0);
            assert_eq!(dashboard.cards[1].rows[0].v, 0.0);
            assert_eq!(dashboard.cards[2].rows[0].v, 40.0);
        }
    }

    #[tokio::test]
    async fn test_advance_kpis_and_type_donut() {
        let repository = MockRepository {
            advance_overview: Some(AdvanceOverview {
                total_advance_usd: 1500.0,
                total_repaid_usd: 500.0,
                outstanding_usd: 1000.0,
                total_advance_sources: 4.0,
            }),
            advance_type_split: Some(AdvanceTypeSplit {
                marketing: Some(AdvanceShare {
                    total_usd: Some(1200.0),
                    percentage: Some(80.0),
                }),
                personal: Some(AdvanceShare::default()),
            }),
            ..MockRepository::default()
        };
        let service = DashboardService::new(Arc::new(repository));

        let dashboard = service.get_dashboard(&Session::new("t"), ViewMode::Streams).await;
        let advance = dashboard.advance.unwrap();
        assert_eq!(advance.total_advance_sources, 4.0);
        assert_eq!(advance.total_repaid_usd, 500.0);

        assert_eq!(dashboard.cards.len(), 1);
        let donut = &dashboard.cards[0];
        assert_eq!(donut.kind, ChartKind::Donut);
        assert!(donut.rows.is_empty());
        let values: Vec<(&str, f64)> = donut.slices.iter().map(|s| (s.name.as_str(), s.value)).collect();
        assert_eq!(values, vec![("Marketing", 1200.0), ("Personal", 0.0)]);
    }

    #[tokio::test]
    async fn test_failed_cards_are_omitted() {
        let repository = MockRepository {
            personal_trend: Some(Vec::new()),
            ..MockRepository::default()
        };
        let service = DashboardService::new(Arc::new(repository));

        let dashboard = service.get_dashboard(&Session::new("t"), ViewMode::Streams).await;
        assert!(dashboard.total_revenue.is_none());
        assert!(dashboard.advance.is_none());
        assert_eq!(dashboard.cards.len(), 1);
        assert_eq!(dashboard.cards[0].id, "advance-personal");
    }
}
