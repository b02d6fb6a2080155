// Royalty domain models
use super::period::{Period, PeriodKey};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// Which numeric field of a breakdown drives chart values
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Streams,
    Revenue,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Breakdown {
    #[serde(default)]
    pub dimension: String,
    #[serde(default, deserialize_with = "lenient_number")]
    pub streams: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub revenue: Option<f64>,
}

impl Breakdown {
    /// Missing fields contribute zero
    pub fn value(&self, mode: ViewMode) -> f64 {
        match mode {
            ViewMode::Streams => self.streams,
            ViewMode::Revenue => self.revenue,
        }
        .unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodRecord {
    pub period: Period,
    #[serde(default)]
    pub breakdowns: Vec<Breakdown>,
}

impl PeriodRecord {
    pub fn total(&self, mode: ViewMode) -> f64 {
        self.breakdowns.iter().map(|b| b.value(mode)).sum()
    }
}

/// One selectable series: a track, a DSP, or whatever the endpoint groups by
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    #[serde(default)]
    pub periods: Vec<PeriodRecord>,
}

impl Category {
    /// Sum of the mode field per period. Records repeating a period are merged.
    pub fn totals_by_period(&self, mode: ViewMode) -> BTreeMap<&PeriodKey, f64> {
        let mut totals = BTreeMap::new();
        for record in &self.periods {
            *totals.entry(record.period.key()).or_insert(0.0) += record.total(mode);
        }
        totals
    }

    pub fn total(&self, mode: ViewMode) -> f64 {
        self.periods.iter().map(|p| p.total(mode)).sum()
    }
}

/// Monthly point from the royalty dashboard endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyMetric {
    pub label: String,
    #[serde(default, deserialize_with = "lenient_number")]
    pub revenue: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub streams: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopTrack {
    pub isrc: String,
    pub title: String,
    pub artist: String,
    #[serde(default)]
    pub total_revenue: f64,
    #[serde(default)]
    pub total_streams: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardMetrics {
    #[serde(default)]
    pub total_revenue: f64,
    #[serde(default)]
    pub total_streams: f64,
    #[serde(default)]
    pub top_track: Option<TopTrack>,
    #[serde(default)]
    pub revenue_by_month: Vec<MonthlyMetric>,
    #[serde(default)]
    pub streams_by_month: Vec<MonthlyMetric>,
}

/// Single value per period, normalized from the expense and advance trend endpoints
#[derive(Debug, Clone, PartialEq)]
pub struct TrendPoint {
    pub period: Period,
    pub value: f64,
}

impl TrendPoint {
    pub fn new(period: Period, value: f64) -> Self {
        Self { period, value }
    }
}

/// Headline figures from the advance overview endpoint
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdvanceOverview {
    #[serde(rename = "totalAdvanceUSD", default, deserialize_with = "lenient_or_zero")]
    pub total_advance_usd: f64,
    #[serde(rename = "totalRepaidUSD", default, deserialize_with = "lenient_or_zero")]
    pub total_repaid_usd: f64,
    #[serde(rename = "outstandingUSD", default, deserialize_with = "lenient_or_zero")]
    pub outstanding_usd: f64,
    #[serde(rename = "totalAdvanceSources", default, deserialize_with = "lenient_or_zero")]
    pub total_advance_sources: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdvanceShare {
    #[serde(rename = "totalUSD", default, deserialize_with = "lenient_number")]
    pub total_usd: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub percentage: Option<f64>,
}

/// Marketing vs personal advance totals. The backend spells the first key
/// `marketting`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdvanceTypeSplit {
    #[serde(rename = "marketting", default)]
    pub marketing: Option<AdvanceShare>,
    #[serde(default)]
    pub personal: Option<AdvanceShare>,
}

/// Numbers and numeric strings produce a value; everything else is absent.
pub fn number_from_value(value: &serde_json::Value) -> Option<f64> {
    match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
        _ => None,
    }
}

/// Accepts numbers, numeric strings, null or anything else; only the first two
/// produce a value.
pub fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(number_from_value))
}

fn lenient_or_zero<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_number(deserializer)?.unwrap_or(0.0))
}
