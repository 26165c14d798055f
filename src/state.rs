use crate::catalog::Catalog;
use crate::client::BackendClient;
use crate::config::Config;
use crate::errors::InitError;
use crate::predict::PredictClient;
use crate::service::DashboardService;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub service: DashboardService,
    pub catalog: Arc<Catalog>,
}

impl AppState {
    pub fn new(service: DashboardService, catalog: Catalog) -> Self {
        Self {
            service,
            catalog: Arc::new(catalog),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, InitError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        let service = DashboardService::new(
            BackendClient::new(http.clone(), config),
            PredictClient::new(http, config.predict_url.clone()),
        );
        Ok(Self::new(service, Catalog::bundled()?))
    }
}
