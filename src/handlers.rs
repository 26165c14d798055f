use crate::catalog::{PandemicDetail, PandemicSummary, RegionPandemic, StatsSheet};
use crate::errors::AppError;
use crate::export::{file_name, ExportDocument};
use crate::models::{
    DashboardQuery, DashboardView, Location, NewCalendarEntry, NewLocation, NewObservation,
    NewPandemic, Pandemic, Prediction, PredictionQuery,
};
use crate::state::AppState;
use crate::ui::render_index;
use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde_json::Value;
use tracing::info;

pub async fn index(State(state): State<AppState>) -> Html<String> {
    let (pandemics, locations) =
        tokio::join!(state.service.pandemics(), state.service.locations());
    Html(render_index(&pandemics, &locations))
}

pub async fn list_pandemics(State(state): State<AppState>) -> Json<Vec<Pandemic>> {
    Json(state.service.pandemics().await)
}

pub async fn list_locations(State(state): State<AppState>) -> Json<Vec<Location>> {
    Json(state.service.locations().await)
}

pub async fn get_dashboard(
    State(state): State<AppState>,
    query: Result<Query<DashboardQuery>, QueryRejection>,
) -> Result<Json<DashboardView>, AppError> {
    let Query(query) = query.map_err(query_error)?;
    let selection = query.selection().map_err(AppError::bad_request)?;
    let snapshot = state.service.snapshot(selection).await;
    Ok(Json(snapshot.view()))
}

pub async fn export_dashboard(
    State(state): State<AppState>,
    query: Result<Query<DashboardQuery>, QueryRejection>,
) -> Result<Response, AppError> {
    let Query(query) = query.map_err(query_error)?;
    let selection = query.selection().map_err(AppError::bad_request)?;
    let snapshot = state.service.snapshot(selection).await;
    let payload = ExportDocument::from_snapshot(&snapshot)
        .to_json()
        .map_err(AppError::internal)?;
    let name = file_name(
        selection.pandemic_id,
        selection.timeframe,
        Utc::now().date_naive(),
    );

    Ok((
        [
            (header::CONTENT_TYPE, "application/json".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{name}\""),
            ),
        ],
        payload,
    )
        .into_response())
}

pub async fn get_predictions(
    State(state): State<AppState>,
    query: Result<Query<PredictionQuery>, QueryRejection>,
) -> Result<Json<Vec<Prediction>>, AppError> {
    let Query(query) = query.map_err(query_error)?;
    Ok(Json(state.service.predictions(query.country).await))
}

fn query_error(rejection: QueryRejection) -> AppError {
    AppError::bad_request(rejection.body_text())
}

pub async fn backend_export(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Response, AppError> {
    let file = state.service.backend().export_pandemic(id).await?;
    let content_type = file
        .content_type
        .unwrap_or_else(|| "application/octet-stream".to_string());
    Ok(([(header::CONTENT_TYPE, content_type)], file.body).into_response())
}

pub async fn create_observation(
    State(state): State<AppState>,
    Json(body): Json<NewObservation>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let created = state.service.backend().create_observation(&body).await?;
    info!(pandemic = body.id_pandemic, location = body.id_location, "created observation");
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update_observation(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<NewObservation>,
) -> Result<Json<Value>, AppError> {
    let updated = state.service.backend().update_observation(id, &body).await?;
    info!(id, "updated observation");
    Ok(Json(updated))
}

pub async fn delete_observation(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    state.service.backend().delete_observation(id).await?;
    info!(id, "deleted observation");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn create_location(
    State(state): State<AppState>,
    Json(body): Json<NewLocation>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let created = state.service.backend().create_location(&body).await?;
    info!(country = %body.country, "created location");
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update_location(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<NewLocation>,
) -> Result<Json<Value>, AppError> {
    let updated = state.service.backend().update_location(id, &body).await?;
    info!(id, "updated location");
    Ok(Json(updated))
}

pub async fn delete_location(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    state.service.backend().delete_location(id).await?;
    info!(id, "deleted location");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn create_pandemic(
    State(state): State<AppState>,
    Json(body): Json<NewPandemic>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let created = state.service.backend().create_pandemic(&body).await?;
    info!(name = ?body.name, kind = ?body.kind, "created pandemic");
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update_pandemic(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<NewPandemic>,
) -> Result<Json<Value>, AppError> {
    let updated = state.service.backend().update_pandemic(id, &body).await?;
    info!(id, "updated pandemic");
    Ok(Json(updated))
}

pub async fn delete_pandemic(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    state.service.backend().delete_pandemic(id).await?;
    info!(id, "deleted pandemic");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn create_calendar_entry(
    State(state): State<AppState>,
    Json(body): Json<NewCalendarEntry>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let created = state.service.backend().create_calendar_entry(&body).await?;
    info!(date = %body.date_value, "created calendar entry");
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn catalog_pandemics(State(state): State<AppState>) -> Json<Vec<PandemicSummary>> {
    Json(state.catalog.pandemics().to_vec())
}

pub async fn catalog_pandemic(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let detail: PandemicDetail<'_> = state
        .catalog
        .pandemic(&id)
        .ok_or_else(|| AppError::not_found(format!("pandemic '{id}' not found")))?;
    Ok(Json(detail).into_response())
}

pub async fn catalog_stats(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<StatsSheet>, AppError> {
    state
        .catalog
        .stats(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::not_found(format!("statistics for '{id}' not found")))
}

pub async fn catalog_region(
    State(state): State<AppState>,
    Path(region): Path<String>,
) -> Result<Json<Vec<RegionPandemic>>, AppError> {
    state
        .catalog
        .region(&region)
        .map(|pandemics| Json(pandemics.to_vec()))
        .ok_or_else(|| AppError::not_found(format!("region '{region}' not found")))
}
