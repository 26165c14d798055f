use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One row of pandemic statistics as normalized from the backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Observation {
    pub id: Option<i64>,
    pub total_cases: u64,
    pub total_deaths: u64,
    pub new_cases: u64,
    pub new_deaths: u64,
    pub id_pandemic: Option<i64>,
    pub id_location: Option<i64>,
    pub id_calendar: Option<i64>,
    /// Some backend variants embed the date directly on the record.
    pub date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalendarEntry {
    pub id: i64,
    pub date_value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Pandemic {
    pub id: i64,
    pub name: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Location {
    pub id: i64,
    pub country: Option<String>,
    pub continent: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatTotals {
    pub total_cases: u64,
    pub total_deaths: u64,
    pub new_cases: u64,
    pub new_deaths: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelinePoint {
    pub date: String,
    pub total_cases: u64,
    pub total_deaths: u64,
    pub new_cases: u64,
    pub new_deaths: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TimelineStats {
    #[serde(flatten)]
    pub totals: StatTotals,
    pub timeline: Vec<TimelinePoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub date: String,
    #[serde(default)]
    pub new_cases: f64,
    #[serde(default)]
    pub new_deaths: f64,
    #[serde(default)]
    pub total_cases: f64,
    #[serde(default)]
    pub total_deaths: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Timeframe {
    #[default]
    All,
    Early,
    Peak,
    Decline,
}

impl Timeframe {
    pub fn as_str(self) -> &'static str {
        match self {
            Timeframe::All => "all",
            Timeframe::Early => "early",
            Timeframe::Peak => "peak",
            Timeframe::Decline => "decline",
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Timeframe {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Timeframe::All),
            "early" => Ok(Timeframe::Early),
            "peak" => Ok(Timeframe::Peak),
            "decline" => Ok(Timeframe::Decline),
            other => Err(format!(
                "timeframe must be one of 'all', 'early', 'peak', 'decline', got '{other}'"
            )),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct DashboardQuery {
    pub pandemic: i64,
    /// Location id; absent, empty or `global` selects every location.
    pub location: Option<String>,
    pub timeframe: Option<String>,
}

impl DashboardQuery {
    pub fn selection(self) -> Result<Selection, String> {
        let timeframe = match self.timeframe.as_deref() {
            None | Some("") => Timeframe::All,
            Some(raw) => raw.parse()?,
        };
        let location = match self.location.as_deref().map(str::trim) {
            None | Some("") | Some("global") => None,
            Some(raw) => Some(
                raw.parse::<i64>()
                    .map_err(|_| format!("location must be a numeric id or 'global', got '{raw}'"))?,
            ),
        };
        Ok(Selection {
            pandemic_id: self.pandemic,
            location,
            timeframe,
        })
    }
}

/// A pandemic, an optional location (global when absent) and a timeframe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub pandemic_id: i64,
    pub location: Option<i64>,
    pub timeframe: Timeframe,
}

#[derive(Debug, Deserialize)]
pub struct PredictionQuery {
    pub country: i64,
}

/// Everything the dashboard page shows for one selection.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    pub pandemic_id: i64,
    pub location: Option<i64>,
    pub timeframe: Timeframe,
    /// Aggregates over the whole selection.
    pub summary: StatTotals,
    /// Latest non-zero values of the timeframe slice.
    pub statistics: StatTotals,
    pub timeline: Vec<TimelinePoint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewObservation {
    pub total_cases: u64,
    pub total_deaths: u64,
    pub new_cases: u64,
    pub new_deaths: u64,
    pub id_pandemic: i64,
    pub id_location: i64,
    pub id_calendar: i64,
}

impl<'de> Deserialize<'de> for NewObservation {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        crate::normalize::new_observation(&value).map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewLocation {
    #[serde(alias = "nom")]
    pub country: String,
    #[serde(default)]
    pub continent: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPandemic {
    #[serde(default, alias = "nom", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCalendarEntry {
    #[serde(alias = "date_value", alias = "date")]
    pub date_value: chrono::NaiveDate,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn admin_bodies_accept_form_shapes() {
        let entry: NewCalendarEntry = serde_json::from_value(json!({"date": "2020-03-01"})).unwrap();
        assert_eq!(entry.date_value.to_string(), "2020-03-01");
        assert_eq!(
            serde_json::to_value(&entry).unwrap(),
            json!({"dateValue": "2020-03-01"})
        );

        let pandemic: NewPandemic = serde_json::from_value(json!({"type": "Viral"})).unwrap();
        assert_eq!(pandemic.name, None);
        assert_eq!(pandemic.kind.as_deref(), Some("Viral"));
        assert_eq!(serde_json::to_value(&pandemic).unwrap(), json!({"type": "Viral"}));

        let named: NewPandemic = serde_json::from_value(json!({"nom": "Grippe"})).unwrap();
        assert_eq!(named.name.as_deref(), Some("Grippe"));
    }
}
