use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{get, post, put},
    Router,
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/api/pandemics", get(handlers::list_pandemics))
        .route("/api/pandemics/:id/export", get(handlers::backend_export))
        .route("/api/locations", get(handlers::list_locations))
        .route("/api/dashboard", get(handlers::get_dashboard))
        .route("/api/export", get(handlers::export_dashboard))
        .route("/api/predictions", get(handlers::get_predictions))
        .nest("/api/admin", admin_routes())
        .nest("/api/catalog", catalog_routes())
        .with_state(state)
}

fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/data", post(handlers::create_observation))
        .route(
            "/data/:id",
            put(handlers::update_observation).delete(handlers::delete_observation),
        )
        .route("/locations", post(handlers::create_location))
        .route(
            "/locations/:id",
            put(handlers::update_location).delete(handlers::delete_location),
        )
        .route("/pandemics", post(handlers::create_pandemic))
        .route(
            "/pandemics/:id",
            put(handlers::update_pandemic).delete(handlers::delete_pandemic),
        )
        .route("/calendar", post(handlers::create_calendar_entry))
}

fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/pandemics", get(handlers::catalog_pandemics))
        .route("/pandemics/:id", get(handlers::catalog_pandemic))
        .route("/pandemics/:id/stats", get(handlers::catalog_stats))
        .route("/regions/:region/pandemics", get(handlers::catalog_region))
}
