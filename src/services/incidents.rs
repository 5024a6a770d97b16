//! Incident listing: full table and filtered, searchable pages.

use sqlx::PgPool;

use crate::errors::AppError;
use crate::models::incident::{Incident, INCIDENT_COLUMNS, SEARCH_COLUMNS};
use crate::models::pagination::Pagination;
use crate::services::filter::FilterSpec;

/// Every incident, newest first.
pub async fn list_all(pool: &PgPool) -> Result<Vec<Incident>, AppError> {
    let sql = format!(
        "SELECT {INCIDENT_COLUMNS} FROM incidents ORDER BY incident_date DESC, id DESC"
    );
    let rows = sqlx::query_as::<_, Incident>(&sql).fetch_all(pool).await?;
    Ok(rows)
}

/// One page of incidents under `spec`, optionally narrowed by a free-text search.
pub async fn list_filtered(
    pool: &PgPool,
    spec: FilterSpec,
    search: Option<&str>,
    pagination: &Pagination,
) -> Result<Vec<Incident>, AppError> {
    let spec = spec.search(search, &SEARCH_COLUMNS);
    let sql = format!(
        "SELECT {INCIDENT_COLUMNS} FROM incidents \
         WHERE {} \
         ORDER BY incident_date DESC, id DESC \
         LIMIT {} OFFSET {}",
        spec.where_clause(),
        pagination.limit(),
        pagination.offset()
    );

    let rows = sqlx::query_as_with::<_, Incident, _>(&sql, spec.arguments()?)
        .fetch_all(pool)
        .await?;
    tracing::debug!(
        page = pagination.current_page(),
        returned = rows.len(),
        params = spec.params().len(),
        "Listed filtered incidents"
    );
    Ok(rows)
}
