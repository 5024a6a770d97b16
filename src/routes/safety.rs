//! Derived safety metrics: record streak and recommended actions.

use axum::{extract::State, Json};

use crate::errors::{ApiResponse, AppError};
use crate::services::actions::{self, RecommendedAction};
use crate::services::safety_record::{self, SafetyRecord};
use crate::AppState;

/// GET /api/safety-record: longest gap between severe incidents.
pub async fn safety_record(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<SafetyRecord>>, AppError> {
    let record = safety_record::get_record(&state.db, &state.config.analytics).await?;
    Ok(ApiResponse::success(record))
}

/// GET /api/next-actions: exactly three recommended actions.
pub async fn next_actions(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<RecommendedAction>>>, AppError> {
    let actions = actions::next_actions(&state.db, &state.config.analytics).await?;
    Ok(ApiResponse::success(actions))
}
