//! Dashboard routes: summary, breakdowns and chart series.

use axum::{extract::State, Json};
use axum_extra::extract::Query;

use crate::errors::{ApiResponse, AppError};
use crate::models::filters::{DashboardFilters, LocationQuery, MonthRangeQuery};
use crate::services::aggregation::{self, ChartSeries, Statistics};
use crate::services::charts::{self, BodyPartHeatmap};
use crate::services::dashboard::{self, DashboardSummary};
use crate::services::filter::FilterSpec;
use crate::AppState;

/// GET /api/dashboard/stats: headline figures under the request filters.
pub async fn stats(
    State(state): State<AppState>,
    Query(filters): Query<DashboardFilters>,
) -> Result<Json<ApiResponse<DashboardSummary>>, AppError> {
    let spec = FilterSpec::from_dashboard(&filters)?;
    let summary = dashboard::get_summary(&state.db, &spec, filters.country.len()).await?;
    Ok(ApiResponse::success(summary))
}

/// GET /api/statistics: every grouped breakdown.
pub async fn statistics(
    State(state): State<AppState>,
    Query(filters): Query<DashboardFilters>,
) -> Result<Json<ApiResponse<Statistics>>, AppError> {
    let spec = FilterSpec::from_dashboard(&filters)?;
    let statistics = aggregation::statistics(&state.db, &spec).await?;
    Ok(ApiResponse::success(statistics))
}

/// GET /api/charts/monthly: incidents per month, optionally capped by `range`.
pub async fn monthly(
    State(state): State<AppState>,
    Query(filters): Query<DashboardFilters>,
    Query(range): Query<MonthRangeQuery>,
) -> Result<Json<ApiResponse<ChartSeries>>, AppError> {
    let limit = range.limit()?;
    let spec = FilterSpec::from_dashboard(&filters)?;
    let series = charts::monthly(&state.db, &spec, limit).await?;
    Ok(ApiResponse::success(series))
}

/// GET /api/charts/sectors: Mining / Metals / Others.
pub async fn sectors(
    State(state): State<AppState>,
    Query(filters): Query<DashboardFilters>,
) -> Result<Json<ApiResponse<ChartSeries>>, AppError> {
    let spec = FilterSpec::from_dashboard(&filters)?;
    let series = charts::sectors(&state.db, &spec).await?;
    Ok(ApiResponse::success(series))
}

/// GET /api/charts/locations: busiest regions, optionally for one country.
pub async fn locations(
    State(state): State<AppState>,
    Query(filters): Query<DashboardFilters>,
    Query(location): Query<LocationQuery>,
) -> Result<Json<ApiResponse<ChartSeries>>, AppError> {
    let spec = FilterSpec::from_dashboard(&filters)?;
    let series = charts::locations(&state.db, spec, location.filter_country.as_deref()).await?;
    Ok(ApiResponse::success(series))
}

/// GET /api/heatmap/bodyparts: body-part counts without the `Unspecified` sentinel.
pub async fn body_parts(
    State(state): State<AppState>,
    Query(filters): Query<DashboardFilters>,
) -> Result<Json<ApiResponse<BodyPartHeatmap>>, AppError> {
    let spec = FilterSpec::from_dashboard(&filters)?;
    let heatmap = charts::body_part_heatmap(&state.db, spec).await?;
    Ok(ApiResponse::success(heatmap))
}
