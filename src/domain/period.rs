// Period domain model - calendar buckets with a natural order
use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;

const MONTHS: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

/// Sort key of a period. Variants order before one another in declaration
/// order, so calendar buckets always precede free-form labels.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PeriodKey {
    /// Month of an unspecified year, 1..=12
    Month(u8),
    YearMonth(i32, u8),
    Day(NaiveDate),
    /// Plain integer bucket index as sent by the backend
    Ordinal(i64),
    Other(String),
}

/// A period as received from the backend: the parsed key plus the text it
/// arrived with, which is what the chart axis displays.
#[derive(Debug, Clone)]
pub struct Period {
    key: PeriodKey,
    label: String,
}

impl Period {
    pub fn parse(text: &str) -> Self {
        let trimmed = text.trim();
        let key = Self::parse_key(trimmed);
        Self {
            key,
            label: trimmed.to_string(),
        }
    }

    pub fn from_ordinal(value: i64) -> Self {
        Self {
            key: PeriodKey::Ordinal(value),
            label: value.to_string(),
        }
    }

    pub fn key(&self) -> &PeriodKey {
        &self.key
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    fn parse_key(text: &str) -> PeriodKey {
        if let Some(month) = Self::month_from_name(text) {
            return PeriodKey::Month(month);
        }
        if let Ok(value) = text.parse::<i64>() {
            return PeriodKey::Ordinal(value);
        }
        if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
            return PeriodKey::Day(date);
        }
        if let Ok(time) = DateTime::parse_from_rfc3339(text) {
            return PeriodKey::Day(time.date_naive());
        }
        if let Some((year, month)) = Self::year_month(text) {
            return PeriodKey::YearMonth(year, month);
        }
        PeriodKey::Other(text.to_string())
    }

    /// Accepts full month names and their three-letter abbreviations, plus "sept"
    fn month_from_name(text: &str) -> Option<u8> {
        let lower = text.to_ascii_lowercase();
        if lower.len() < 3 {
            return None;
        }
        MONTHS
            .iter()
            .position(|name| {
                *name == lower || name[..3] == lower || (lower == "sept" && *name == "september")
            })
            .map(|idx| idx as u8 + 1)
    }

    fn year_month(text: &str) -> Option<(i32, u8)> {
        let (year, month) = text.split_once('-')?;
        if year.len() != 4 || month.is_empty() || month.len() > 2 {
            return None;
        }
        let year = year.parse::<i32>().ok()?;
        let month = month.parse::<u8>().ok()?;
        (1..=12).contains(&month).then_some((year, month))
    }
}

impl PartialEq for Period {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for Period {}

impl PartialOrd for Period {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Period {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key.cmp(&other.key)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawPeriod {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl<'de> Deserialize<'de> for Period {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match RawPeriod::deserialize(deserializer)? {
            RawPeriod::Integer(value) => Period::from_ordinal(value),
            RawPeriod::Float(value) if value.fract() == 0.0 => Period::from_ordinal(value as i64),
            RawPeriod::Float(value) => Period::parse(&value.to_string()),
            RawPeriod::Text(text) => Period::parse(&text),
        })
    }
}

impl Serialize for Period {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.label)
    }
}
