// Series aggregation - reshapes per-category period data into chart rows
use super::period::PeriodKey;
use super::royalty::{Category, MonthlyMetric, TrendPoint, ViewMode};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashSet};

pub type SeriesSelection = BTreeSet<String>;

const AXIS_KEY: &str = "x";

const PALETTE: [&str; 7] = [
    "#7B00D4", "#00AA39", "#F59E0B", "#EF4444", "#3B82F6", "#14B8A6", "#8B5CF6",
];

/// One row per period: the axis label plus one value per selected series.
/// `None` means the series has no record for that period.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartRow {
    pub x: String,
    #[serde(flatten)]
    pub values: BTreeMap<String, Option<f64>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSeries {
    pub period_labels: Vec<String>,
    pub rows: Vec<ChartRow>,
}

impl ChartSeries {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Single-series row used by the dashboard trend cards
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendRow {
    pub x: String,
    pub v: f64,
}

/// One DSP's share of the chart's combined streams or revenue
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DspShare {
    pub dsp: String,
    pub value: f64,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesTotal {
    pub name: String,
    pub total: f64,
}

/// Categories with duplicate names removed; the first occurrence wins.
fn distinct_categories(categories: &[Category]) -> impl Iterator<Item = &Category> {
    let mut seen = HashSet::new();
    categories.iter().filter(move |c| {
        let fresh = seen.insert(c.name.as_str());
        if !fresh {
            tracing::warn!("Skipping duplicate category {}", c.name);
        }
        fresh
    })
}

/// Union of every period in every category, ordered naturally. Each period
/// keeps the label it was first seen with.
fn period_axis(categories: &[Category]) -> BTreeMap<&PeriodKey, &str> {
    let mut axis = BTreeMap::new();
    for record in categories.iter().flat_map(|c| &c.periods) {
        axis.entry(record.period.key())
            .or_insert_with(|| record.period.label());
    }
    axis
}

pub fn build_chart_rows(
    categories: &[Category],
    selected: &SeriesSelection,
    mode: ViewMode,
) -> ChartSeries {
    let axis = period_axis(categories);

    let series: Vec<(&str, BTreeMap<&PeriodKey, f64>)> = distinct_categories(categories)
        .filter(|c| selected.contains(&c.name))
        .filter(|c| {
            // "x" is the axis key of every row
            let collides = c.name == AXIS_KEY;
            if collides {
                tracing::warn!("Dropping series named {:?}, it collides with the row axis", c.name);
            }
            !collides
        })
        .map(|c| (c.name.as_str(), c.totals_by_period(mode)))
        .collect();

    let rows = axis
        .iter()
        .map(|(key, label)| ChartRow {
            x: label.to_string(),
            values: series
                .iter()
                .map(|(name, totals)| (name.to_string(), totals.get(key).copied()))
                .collect(),
        })
        .collect();

    ChartSeries {
        period_labels: axis.values().map(|label| label.to_string()).collect(),
        rows,
    }
}

pub fn toggle_series_selection(current: &SeriesSelection, name: &str) -> SeriesSelection {
    let mut next = current.clone();
    if !next.remove(name) {
        next.insert(name.to_string());
    }
    next
}

/// First `count` categories in source order, no ranking by magnitude
pub fn select_default_series(categories: &[Category], count: usize) -> SeriesSelection {
    distinct_categories(categories)
        .take(count)
        .map(|c| c.name.clone())
        .collect()
}

/// Clears the selection when every category is already selected, otherwise
/// selects all of them.
pub fn toggle_all_series(current: &SeriesSelection, categories: &[Category]) -> SeriesSelection {
    let all_selected = !categories.is_empty() && categories.iter().all(|c| current.contains(&c.name));
    if all_selected {
        SeriesSelection::new()
    } else {
        categories.iter().map(|c| c.name.clone()).collect()
    }
}

/// Drops names that no longer exist upstream
pub fn retain_known_series(current: &SeriesSelection, categories: &[Category]) -> SeriesSelection {
    let known: HashSet<&str> = categories.iter().map(|c| c.name.as_str()).collect();
    current
        .iter()
        .filter(|name| known.contains(name.as_str()))
        .cloned()
        .collect()
}

/// Stable colour for a series name: 31-multiplier hash over UTF-16 code units
pub fn series_color(name: &str) -> &'static str {
    let hash = name
        .encode_utf16()
        .fold(0i32, |hash, unit| hash.wrapping_mul(31).wrapping_add(unit as i32));
    PALETTE[((hash as i64).abs() % PALETTE.len() as i64) as usize]
}

pub fn category_totals(categories: &[Category], mode: ViewMode) -> Vec<SeriesTotal> {
    distinct_categories(categories)
        .map(|c| SeriesTotal {
            name: c.name.clone(),
            total: c.total(mode),
        })
        .collect()
}

/// Per-DSP totals across every category, in first-seen order. Breakdowns
/// without a dimension are left out.
pub fn dsp_shares(categories: &[Category], mode: ViewMode) -> Vec<DspShare> {
    let mut totals: Vec<(&str, f64)> = Vec::new();
    let breakdowns = distinct_categories(categories)
        .flat_map(|c| &c.periods)
        .flat_map(|p| &p.breakdowns)
        .filter(|b| !b.dimension.is_empty());
    for breakdown in breakdowns {
        let value = breakdown.value(mode);
        match totals.iter_mut().find(|(dsp, _)| *dsp == breakdown.dimension) {
            Some((_, total)) => *total += value,
            None => totals.push((breakdown.dimension.as_str(), value)),
        }
    }

    let grand_total: f64 = totals.iter().map(|(_, v)| v).sum();
    totals
        .into_iter()
        .map(|(dsp, value)| DspShare {
            dsp: dsp.to_string(),
            value,
            percentage: if grand_total > 0.0 {
                value / grand_total * 100.0
            } else {
                0.0
            },
        })
        .collect()
}

/// Dashboard revenue/streams by month; missing values plot as 0
pub fn single_series_rows(points: &[MonthlyMetric], mode: ViewMode) -> Vec<TrendRow> {
    points
        .iter()
        .map(|m| TrendRow {
            x: m.label.clone(),
            v: match mode {
                ViewMode::Streams => m.streams,
                ViewMode::Revenue => m.revenue,
            }
            .unwrap_or(0.0),
        })
        .collect()
}

/// Trend points sorted by period, repeated periods summed
pub fn trend_rows(points: &[TrendPoint]) -> Vec<TrendRow> {
    let mut buckets: BTreeMap<&PeriodKey, (&str, f64)> = BTreeMap::new();
    for point in points {
        buckets
            .entry(point.period.key())
            .or_insert((point.period.label(), 0.0))
            .1 += point.value;
    }
    buckets
        .into_values()
        .map(|(label, v)| TrendRow {
            x: label.to_string(),
            v,
        })
        .collect()
}
