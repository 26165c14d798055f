//! Static reference data about historical pandemics, bundled with the binary.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

const BUNDLED: &str = include_str!("../data/catalog.json");

#[derive(Debug, Deserialize)]
pub struct Catalog {
    pandemics: Vec<PandemicSummary>,
    details: HashMap<String, PandemicHistory>,
    stats: HashMap<String, StatsSheet>,
    regions: HashMap<String, Vec<RegionPandemic>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PandemicSummary {
    pub id: String,
    pub name: String,
    pub scientific_name: String,
    pub start_year: i32,
    pub end_year: i32,
    #[serde(rename = "type")]
    pub kind: String,
    pub agent: String,
    pub total_cases: String,
    pub total_deaths: String,
    pub mortality_rate: String,
    pub transmission_route: Vec<String>,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PandemicHistory {
    pub origin: Origin,
    pub timeline: Vec<HistoricalEvent>,
    pub control_measures: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Origin {
    pub location: String,
    pub date: String,
    pub details: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoricalEvent {
    pub date: String,
    pub event: String,
}

/// Summary and history served together.
#[derive(Debug, Serialize)]
pub struct PandemicDetail<'a> {
    #[serde(flatten)]
    pub summary: &'a PandemicSummary,
    #[serde(flatten)]
    pub history: &'a PandemicHistory,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsSheet {
    pub global: Figures,
    pub regions: Vec<RegionFigures>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub demographics: Option<Demographics>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Figures {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_cases: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_deaths: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mortality_rate: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub r0: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub peak_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub peak_cases: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vaccination_rate: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegionFigures {
    pub name: String,
    #[serde(flatten)]
    pub figures: Figures,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Demographics {
    pub age_groups: Vec<AgeGroup>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub comorbidities: Vec<Comorbidity>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgeGroup {
    pub group: String,
    pub mortality_rate: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comorbidity {
    pub condition: String,
    pub risk_increase: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionPandemic {
    pub id: String,
    pub name: String,
    pub period: String,
    pub total_cases: String,
    pub total_deaths: String,
    pub mortality_rate: String,
}

impl Catalog {
    pub fn bundled() -> Result<Self, serde_json::Error> {
        serde_json::from_str(BUNDLED)
    }

    pub fn pandemics(&self) -> &[PandemicSummary] {
        &self.pandemics
    }

    pub fn pandemic(&self, id: &str) -> Option<PandemicDetail<'_>> {
        let summary = self.pandemics.iter().find(|pandemic| pandemic.id == id)?;
        let history = self.details.get(id)?;
        Some(PandemicDetail { summary, history })
    }

    pub fn stats(&self, id: &str) -> Option<&StatsSheet> {
        self.stats.get(id)
    }

    /// Region names are matched case-insensitively.
    pub fn region(&self, region: &str) -> Option<&[RegionPandemic]> {
        self.regions
            .get(&region.trim().to_lowercase())
            .map(Vec::as_slice)
    }
}
