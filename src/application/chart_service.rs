// Chart service - Use case for building multi-series royalty charts
use crate::application::response_cache::{CacheKey, ResponseCache};
use crate::application::royalty_repository::{ChartSource, RoyaltyRepository, Session};
use crate::domain::royalty::{Category, ViewMode};
use crate::domain::series::{
    build_chart_rows, category_totals, dsp_shares, retain_known_series, select_default_series,
    series_color, toggle_all_series, ChartSeries, DspShare, SeriesSelection,
};
use anyhow::Context;
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct ChartQuery {
    pub source: ChartSource,
    pub year: i32,
    pub mode: ViewMode,
    /// `None` falls back to the default selection
    pub series: Option<SeriesSelection>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesLegend {
    pub name: String,
    pub color: &'static str,
    pub total: f64,
    pub selected: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartView {
    pub source: &'static str,
    pub year: i32,
    pub mode: ViewMode,
    #[serde(flatten)]
    pub chart: ChartSeries,
    pub selected: SeriesSelection,
    pub series: Vec<SeriesLegend>,
    /// Share of each DSP across every category, not just the selected ones
    pub dsp_summary: Vec<DspShare>,
    /// Set when the backend failed and the last good response was used
    pub stale: bool,
}

#[derive(Clone)]
pub struct ChartService {
    repository: Arc<dyn RoyaltyRepository>,
    cache: Arc<ResponseCache>,
    default_series: usize,
}

impl ChartService {
    pub fn new(
        repository: Arc<dyn RoyaltyRepository>,
        default_series: usize,
        cache_slots: usize,
    ) -> Self {
        Self {
            repository,
            cache: Arc::new(ResponseCache::new(cache_slots)),
            default_series,
        }
    }

    pub async fn chart(&self, session: &Session, query: ChartQuery) -> anyhow::Result<ChartView> {
        let key = CacheKey::new(session, query.source, query.year);
        let (categories, stale) = self.load(session, key).await?;

        let selected = match &query.series {
            Some(requested) => retain_known_series(requested, &categories),
            None => select_default_series(&categories, self.default_series),
        };

        let chart = build_chart_rows(&categories, &selected, query.mode);
        let series = category_totals(&categories, query.mode)
            .into_iter()
            .map(|t| SeriesLegend {
                color: series_color(&t.name),
                selected: selected.contains(&t.name),
                name: t.name,
                total: t.total,
            })
            .collect();
        let dsp_summary = dsp_shares(&categories, query.mode);

        tracing::debug!(
            "Built {} chart for {}: {} rows, {} series selected",
            query.source.as_str(),
            query.year,
            chart.rows.len(),
            selected.len()
        );

        Ok(ChartView {
            source: query.source.as_str(),
            year: query.year,
            mode: query.mode,
            chart,
            selected,
            series,
            dsp_summary,
            stale,
        })
    }

    /// Select-all checkbox: resolves against the current category list
    pub async fn toggle_all(
        &self,
        session: &Session,
        source: ChartSource,
        year: i32,
        current: &SeriesSelection,
    ) -> anyhow::Result<SeriesSelection> {
        let key = CacheKey::new(session, source, year);
        let (categories, _) = self.load(session, key).await?;
        Ok(toggle_all_series(current, &categories))
    }

    async fn load(
        &self,
        session: &Session,
        key: CacheKey,
    ) -> anyhow::Result<(Arc<Vec<Category>>, bool)> {
        let ticket = self.cache.issue_ticket();

        match self
            .repository
            .fetch_categories(session, key.source(), key.year())
            .await
        {
            Ok(categories) => {
                let categories = Arc::new(categories);
                if !self.cache.store(key, ticket, categories.clone()) {
                    tracing::debug!("Newer response already cached, keeping it");
                }
                Ok((categories, false))
            }
            Err(e) => match self.cache.latest(&key) {
                Some(categories) => {
                    tracing::warn!(
                        "Fetching {} for {} failed, serving last good response: {:#}",
                        key.source().as_str(),
                        key.year(),
                        e
                    );
                    Ok((categories, true))
                }
                None => Err(e).with_context(|| {
                    format!("Failed to load {} chart for {}", key.source().as_str(), key.year())
                }),
            },
        }
    }
}
