//! Incident routes: full list and filtered, paginated search.

use axum::{extract::State, Json};
use axum_extra::extract::Query;

use crate::errors::{ApiResponse, AppError};
use crate::models::filters::{DashboardFilters, SearchQuery};
use crate::models::incident::Incident;
use crate::models::pagination::{Pagination, PaginationQuery};
use crate::services::filter::FilterSpec;
use crate::services::incidents as incident_service;
use crate::AppState;

/// GET /api/accidents: every incident, newest first.
pub async fn list_all(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<Incident>>>, AppError> {
    let incidents = incident_service::list_all(&state.db).await?;
    Ok(ApiResponse::success(incidents))
}

/// GET /api/accidents/filtered: filtered page with optional free-text search.
pub async fn list_filtered(
    State(state): State<AppState>,
    Query(filters): Query<DashboardFilters>,
    Query(pagination): Query<PaginationQuery>,
    Query(search): Query<SearchQuery>,
) -> Result<Json<ApiResponse<Vec<Incident>>>, AppError> {
    let pagination = Pagination::parse(&pagination)?;
    let spec = FilterSpec::from_dashboard(&filters)?;
    let incidents =
        incident_service::list_filtered(&state.db, spec, search.search.as_deref(), &pagination)
            .await?;
    Ok(ApiResponse::success(incidents))
}
