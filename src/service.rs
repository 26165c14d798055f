//! Read paths behind the dashboard.
//!
//! Reads never fail towards the caller: a failed fetch is logged and replaced
//! by an empty or all-zero result. The dashboard snapshot additionally keeps
//! the failure message so the page can show it.

use crate::client::BackendClient;
use crate::errors::ClientError;
use crate::models::{
    DashboardView, Location, Pandemic, Prediction, Selection, TimelinePoint, TimelineStats,
};
use crate::predict::PredictClient;
use crate::stats::{
    current_statistics, resolve_global_stats, resolve_location_stats, select_timeframe,
};
use tracing::{error, info};

#[derive(Clone)]
pub struct DashboardService {
    backend: BackendClient,
    predict: PredictClient,
}

/// Aggregated data for one selection, before timeframe slicing.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub selection: Selection,
    pub stats: TimelineStats,
    pub error: Option<String>,
}

impl DashboardService {
    pub fn new(backend: BackendClient, predict: PredictClient) -> Self {
        Self { backend, predict }
    }

    pub fn backend(&self) -> &BackendClient {
        &self.backend
    }

    pub async fn pandemics(&self) -> Vec<Pandemic> {
        self.backend.pandemics().await.unwrap_or_else(|err| {
            error!("failed to fetch pandemics: {err}");
            Vec::new()
        })
    }

    pub async fn locations(&self) -> Vec<Location> {
        self.backend.locations().await.unwrap_or_else(|err| {
            error!("failed to fetch locations: {err}");
            Vec::new()
        })
    }

    pub async fn predictions(&self, country: i64) -> Vec<Prediction> {
        self.predict.predictions(country).await.unwrap_or_else(|err| {
            error!(country, "failed to fetch predictions: {err}");
            Vec::new()
        })
    }

    pub async fn snapshot(&self, selection: Selection) -> Snapshot {
        match self.timeline_stats(selection).await {
            Ok(stats) => {
                info!(
                    pandemic = selection.pandemic_id,
                    location = ?selection.location,
                    points = stats.timeline.len(),
                    "aggregated timeline"
                );
                Snapshot {
                    selection,
                    stats,
                    error: None,
                }
            }
            Err(err) => {
                error!(
                    pandemic = selection.pandemic_id,
                    location = ?selection.location,
                    "failed to load statistics: {err}"
                );
                let scope = if selection.location.is_some() {
                    "location"
                } else {
                    "global"
                };
                Snapshot {
                    selection,
                    stats: TimelineStats::default(),
                    error: Some(format!("failed to load {scope} statistics")),
                }
            }
        }
    }

    /// Observations and calendar are fetched concurrently, then joined.
    async fn timeline_stats(&self, selection: Selection) -> Result<TimelineStats, ClientError> {
        let (observations, calendar) =
            tokio::join!(self.backend.observations(), self.backend.calendar());
        let (observations, calendar) = (observations?, calendar?);

        Ok(match selection.location {
            Some(location_id) => resolve_location_stats(
                &observations,
                &calendar,
                location_id,
                selection.pandemic_id,
            ),
            None => resolve_global_stats(&observations, &calendar, selection.pandemic_id),
        })
    }
}

impl Snapshot {
    /// The timeline narrowed to the selected timeframe.
    pub fn visible_timeline(&self) -> &[TimelinePoint] {
        select_timeframe(&self.stats.timeline, self.selection.timeframe)
    }

    pub fn view(&self) -> DashboardView {
        let visible = self.visible_timeline();
        DashboardView {
            pandemic_id: self.selection.pandemic_id,
            location: self.selection.location,
            timeframe: self.selection.timeframe,
            summary: self.stats.totals,
            statistics: current_statistics(visible),
            timeline: visible.to_vec(),
            error: self.error.clone(),
        }
    }
}
