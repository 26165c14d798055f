use crate::models::{StatTotals, Timeframe, TimelinePoint};
use crate::service::Snapshot;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Downloadable copy of what the dashboard shows for a selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportDocument {
    pub pandemic_id: i64,
    /// Location id, or `global`.
    pub location: String,
    pub timeframe: Timeframe,
    pub statistics: StatTotals,
    /// The whole timeline, not only the timeframe slice.
    pub timeline: Vec<TimelinePoint>,
}

impl ExportDocument {
    pub fn from_snapshot(snapshot: &Snapshot) -> Self {
        let selection = snapshot.selection;
        Self {
            pandemic_id: selection.pandemic_id,
            location: selection
                .location
                .map(|id| id.to_string())
                .unwrap_or_else(|| "global".to_string()),
            timeframe: selection.timeframe,
            statistics: snapshot.view().statistics,
            timeline: snapshot.stats.timeline.clone(),
        }
    }

    pub fn to_json(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec_pretty(self)
    }
}

pub fn file_name(pandemic_id: i64, timeframe: Timeframe, date: NaiveDate) -> String {
    format!(
        "pandemic-data-{pandemic_id}-{timeframe}-{}.json",
        date.format("%Y-%m-%d")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Selection, TimelineStats};

    fn snapshot() -> Snapshot {
        let timeline: Vec<TimelinePoint> = (1..=8)
            .map(|day| TimelinePoint {
                date: format!("2020-02-{day:02}"),
                total_cases: day * 100,
                total_deaths: day,
                new_cases: if day == 8 { 0 } else { 10 + day },
                new_deaths: 1,
            })
            .collect();
        Snapshot {
            selection: Selection {
                pandemic_id: 3,
                location: Some(12),
                timeframe: Timeframe::Peak,
            },
            stats: TimelineStats {
                totals: StatTotals::default(),
                timeline,
            },
            error: None,
        }
    }

    #[test]
    fn file_name_follows_download_pattern() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
        assert_eq!(
            file_name(7, Timeframe::Decline, date),
            "pandemic-data-7-decline-2026-10-16.json"
        );
    }

    #[test]
    fn exported_statistics_survive_reparsing() {
        let snapshot = snapshot();
        let document = ExportDocument::from_snapshot(&snapshot);
        let bytes = document.to_json().unwrap();
        let parsed: ExportDocument = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(parsed.statistics, snapshot.view().statistics);
        assert_eq!(parsed, document);
    }

    #[test]
    fn document_carries_full_timeline_and_selection() {
        let document = ExportDocument::from_snapshot(&snapshot());
        assert_eq!(document.location, "12");
        assert_eq!(document.timeline.len(), 8);

        // peak of 8 points is days 4 and 5
        assert_eq!(document.statistics.total_cases, 500);
        assert_eq!(document.statistics.new_cases, 15);

        let value = serde_json::to_value(&document).unwrap();
        assert_eq!(value["timeframe"], "peak");
        assert_eq!(value["statistics"]["total_cases"], 500);
    }
}
