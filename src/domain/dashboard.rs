// Dashboard domain model
use super::royalty::{AdvanceOverview, AdvanceShare, AdvanceTypeSplit, TopTrack, ViewMode};
use super::series::TrendRow;
use serde::Serialize;

const BRAND_PURPLE: &str = "#7B00D4";
const BRAND_GREEN: &str = "#00AA39";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ChartKind {
    Line,
    Bar,
    Donut,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DonutSlice {
    pub name: String,
    pub value: f64,
    pub color: &'static str,
}

/// A dashboard card. Line and bar cards carry `rows`; donut cards carry `slices`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendCard {
    pub id: String,
    pub title: String,
    pub kind: ChartKind,
    pub rows: Vec<TrendRow>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub slices: Vec<DonutSlice>,
}

impl TrendCard {
    pub fn new(id: &str, title: &str, kind: ChartKind, rows: Vec<TrendRow>) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            kind,
            rows,
            slices: Vec::new(),
        }
    }

    pub fn donut(id: &str, title: &str, slices: Vec<DonutSlice>) -> Self {
        Self {
            slices,
            ..Self::new(id, title, ChartKind::Donut, Vec::new())
        }
    }
}

/// Marketing and personal slices, in that order; a missing total reads as 0
pub fn advance_type_slices(split: &AdvanceTypeSplit) -> Vec<DonutSlice> {
    let total = |share: &Option<AdvanceShare>| share.as_ref().and_then(|s| s.total_usd).unwrap_or(0.0);
    vec![
        DonutSlice {
            name: "Marketing".to_string(),
            value: total(&split.marketing),
            color: BRAND_PURPLE,
        },
        DonutSlice {
            name: "Personal".to_string(),
            value: total(&split.personal),
            color: BRAND_GREEN,
        },
    ]
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub mode: ViewMode,
    pub total_revenue: Option<f64>,
    pub total_streams: Option<f64>,
    pub top_track: Option<TopTrack>,
    pub advance: Option<AdvanceOverview>,
    pub cards: Vec<TrendCard>,
}

impl Dashboard {
    pub fn new(mode: ViewMode) -> Self {
        Self {
            mode,
            total_revenue: None,
            total_streams: None,
            top_track: None,
            advance: None,
            cards: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_advance_type_slices() {
        let split = AdvanceTypeSplit {
            marketing: Some(AdvanceShare {
                total_usd: Some(900.0),
                percentage: Some(60.0),
            }),
            personal: None,
        };
        let slices = advance_type_slices(&split);
        assert_eq!(
            serde_json::to_value(&slices).unwrap(),
            json!([
                {"name": "Marketing", "value": 900.0, "color": "#7B00D4"},
                {"name": "Personal", "value": 0.0, "color": "#00AA39"}
            ])
        );
    }

    #[test]
    fn test_donut_card_shape() {
        let slices = advance_type_slices(&AdvanceTypeSplit::default());
        let card = TrendCard::donut("advance-types", "Advance types", slices);
        let value = serde_json::to_value(&card).unwrap();
        assert_eq!(value["kind"], "donut");
        assert_eq!(value["slices"][1]["value"], 0.0);

        let line = TrendCard::new("expense-trend", "Expenses", ChartKind::Bar, Vec::new());
        assert!(serde_json::to_value(&line).unwrap().get("slices").is_none());
    }
}
