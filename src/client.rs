//! HTTP client for the pandemic REST backend.

use crate::config::Config;
use crate::errors::ClientError;
use crate::models::{
    CalendarEntry, Location, NewCalendarEntry, NewLocation, NewObservation, NewPandemic,
    Observation, Pandemic,
};
use crate::normalize;
use axum::body::Bytes;
use reqwest::{Client, RequestBuilder, Response};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

const DATA: &str = "data";
const LOCATION: &str = "location";
const CALENDAR: &str = "calendar";

#[derive(Clone)]
pub struct BackendClient {
    http: Client,
    base_url: String,
    pandemic_resource: String,
}

/// Raw export file as returned by the backend.
pub struct ExportFile {
    pub content_type: Option<String>,
    pub body: Bytes,
}

impl BackendClient {
    pub fn new(http: Client, config: &Config) -> Self {
        Self {
            http,
            base_url: config.backend_url.clone(),
            pandemic_resource: config.pandemic_resource.clone(),
        }
    }

    pub async fn pandemics(&self) -> Result<Vec<Pandemic>, ClientError> {
        self.fetch_collection(&self.pandemic_resource, normalize::pandemic)
            .await
    }

    pub async fn locations(&self) -> Result<Vec<Location>, ClientError> {
        self.fetch_collection(LOCATION, normalize::location).await
    }

    pub async fn calendar(&self) -> Result<Vec<CalendarEntry>, ClientError> {
        self.fetch_collection(CALENDAR, normalize::calendar_entry)
            .await
    }

    pub async fn observations(&self) -> Result<Vec<Observation>, ClientError> {
        self.fetch_collection(DATA, normalize::observation).await
    }

    pub async fn create_observation(&self, body: &NewObservation) -> Result<Value, ClientError> {
        self.write(self.http.post(self.url(DATA)), DATA, body).await
    }

    pub async fn update_observation(
        &self,
        id: i64,
        body: &NewObservation,
    ) -> Result<Value, ClientError> {
        let path = format!("{DATA}/{id}");
        self.write(self.http.put(self.url(&path)), &path, body).await
    }

    pub async fn delete_observation(&self, id: i64) -> Result<(), ClientError> {
        self.delete(&format!("{DATA}/{id}")).await
    }

    pub async fn create_location(&self, body: &NewLocation) -> Result<Value, ClientError> {
        self.write(self.http.post(self.url(LOCATION)), LOCATION, body)
            .await
    }

    pub async fn update_location(&self, id: i64, body: &NewLocation) -> Result<Value, ClientError> {
        let path = format!("{LOCATION}/{id}");
        self.write(self.http.put(self.url(&path)), &path, body).await
    }

    pub async fn delete_location(&self, id: i64) -> Result<(), ClientError> {
        self.delete(&format!("{LOCATION}/{id}")).await
    }

    pub async fn create_pandemic(&self, body: &NewPandemic) -> Result<Value, ClientError> {
        let path = self.pandemic_resource.as_str();
        self.write(self.http.post(self.url(path)), path, body).await
    }

    pub async fn update_pandemic(&self, id: i64, body: &NewPandemic) -> Result<Value, ClientError> {
        let path = format!("{}/{id}", self.pandemic_resource);
        self.write(self.http.put(self.url(&path)), &path, body).await
    }

    pub async fn delete_pandemic(&self, id: i64) -> Result<(), ClientError> {
        self.delete(&format!("{}/{id}", self.pandemic_resource))
            .await
    }

    pub async fn create_calendar_entry(
        &self,
        body: &NewCalendarEntry,
    ) -> Result<Value, ClientError> {
        self.write(self.http.post(self.url(CALENDAR)), CALENDAR, body)
            .await
    }

    pub async fn export_pandemic(&self, id: i64) -> Result<ExportFile, ClientError> {
        let url = self.url(&format!("{}/{id}/export", self.pandemic_resource));
        let response = send(self.http.get(&url), &url).await?;
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let body = response
            .bytes()
            .await
            .map_err(|source| ClientError::Http { url, source })?;
        Ok(ExportFile { content_type, body })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn fetch_collection<T>(
        &self,
        path: &str,
        map: impl Fn(&Value) -> Option<T>,
    ) -> Result<Vec<T>, ClientError> {
        let url = self.url(path);
        let payload = read_json(send(self.http.get(&url), &url).await?, &url).await?;
        let items = normalize::collection(payload).ok_or_else(|| ClientError::Shape {
            url: url.clone(),
            detail: "expected a collection of records".to_string(),
        })?;
        let records = normalize::all(&items, map);
        if records.len() < items.len() {
            warn!(
                %url,
                skipped = items.len() - records.len(),
                "dropped unreadable records"
            );
        }
        debug!(%url, count = records.len(), "fetched collection");
        Ok(records)
    }

    async fn write(
        &self,
        request: RequestBuilder,
        path: &str,
        body: &impl Serialize,
    ) -> Result<Value, ClientError> {
        let url = self.url(path);
        let response = send(request.json(body), &url).await?;
        read_json(response, &url).await
    }

    async fn delete(&self, path: &str) -> Result<(), ClientError> {
        let url = self.url(path);
        send(self.http.delete(&url), &url).await?;
        Ok(())
    }
}

pub(crate) async fn send(request: RequestBuilder, url: &str) -> Result<Response, ClientError> {
    request
        .send()
        .await
        .and_then(Response::error_for_status)
        .map_err(|source| ClientError::Http {
            url: url.to_string(),
            source,
        })
}

/// Empty bodies read as `null`.
pub(crate) async fn read_json(response: Response, url: &str) -> Result<Value, ClientError> {
    let body = response.bytes().await.map_err(|source| ClientError::Http {
        url: url.to_string(),
        source,
    })?;
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    serde_json::from_slice(&body).map_err(|source| ClientError::Decode {
        url: url.to_string(),
        source,
    })
}
