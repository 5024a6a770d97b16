pub mod config;
pub mod db;
pub mod errors;
pub mod models;
pub mod routes;
pub mod services;

use axum::routing::get;
use axum::Router;
use sqlx::PgPool;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Shared application state passed to all Axum handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: config::AppConfig,
}

/// Build the full API router.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api = Router::new()
        .route("/accidents", get(routes::incidents::list_all))
        .route("/accidents/filtered", get(routes::incidents::list_filtered))
        .route("/statistics", get(routes::dashboard::statistics))
        .route("/dashboard/stats", get(routes::dashboard::stats))
        .route("/charts/monthly", get(routes::dashboard::monthly))
        .route("/charts/sectors", get(routes::dashboard::sectors))
        .route("/charts/locations", get(routes::dashboard::locations))
        .route("/heatmap/bodyparts", get(routes::dashboard::body_parts))
        .route("/safety-record", get(routes::safety::safety_record))
        .route("/next-actions", get(routes::safety::next_actions));

    Router::new()
        .route("/health/live", get(routes::health::live))
        .route("/health/ready", get(routes::health::ready))
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
