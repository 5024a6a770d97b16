//! Dashboard summary aggregation queries.

use chrono::NaiveDateTime;
use serde::Serialize;
use sqlx::PgPool;

use crate::errors::AppError;
use crate::services::aggregation::{self, CategoryCount};
use crate::services::filter::FilterSpec;

pub const GENDER_FEMALE: &str = "Female";
pub const GENDER_MALE: &str = "Male";

/// Headline figures for the filtered dashboard.
#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total: i64,
    pub women: GenderShare,
    pub men: GenderShare,
    /// Number of countries selected in the request filter, 0 when unfiltered.
    pub countries_count: usize,
    pub date_range: DateRange,
}

/// Count and percentage (one decimal) of one gender.
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct GenderShare {
    pub count: i64,
    pub percent: f64,
}

impl GenderShare {
    pub fn of(gender: &str, counts: &[CategoryCount], total: i64) -> Self {
        let count = counts
            .iter()
            .find(|bucket| bucket.label == gender)
            .map_or(0, |bucket| bucket.count);
        let percent = if total > 0 {
            (count as f64 / total as f64 * 1000.0).round() / 10.0
        } else {
            0.0
        };
        Self { count, percent }
    }
}

/// Earliest and latest incident under the filter.
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct DateRange {
    pub start: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,
}

/// Intermediate row for the date range query.
#[derive(Debug, sqlx::FromRow)]
struct DateRangeRow {
    first_date: Option<NaiveDateTime>,
    last_date: Option<NaiveDateTime>,
}

/// Fetch the summary with independent queries run concurrently.
pub async fn get_summary(
    pool: &PgPool,
    spec: &FilterSpec,
    selected_countries: usize,
) -> Result<DashboardSummary, AppError> {
    let (total, gender_counts, date_range) = tokio::try_join!(
        fetch_total(pool, spec),
        aggregation::by_gender(pool, spec),
        fetch_date_range(pool, spec),
    )?;

    Ok(DashboardSummary {
        total,
        women: GenderShare::of(GENDER_FEMALE, &gender_counts, total),
        men: GenderShare::of(GENDER_MALE, &gender_counts, total),
        countries_count: selected_countries,
        date_range,
    })
}

/// Count incidents matching the filter.
pub async fn fetch_total(pool: &PgPool, spec: &FilterSpec) -> Result<i64, AppError> {
    let sql = format!(
        "SELECT COUNT(*) FROM incidents WHERE {}",
        spec.where_clause()
    );
    let total = sqlx::query_scalar_with::<_, i64, _>(&sql, spec.arguments()?)
        .fetch_one(pool)
        .await?;
    Ok(total)
}

async fn fetch_date_range(pool: &PgPool, spec: &FilterSpec) -> Result<DateRange, AppError> {
    let sql = format!(
        "SELECT MIN(incident_date) AS first_date, MAX(incident_date) AS last_date \
         FROM incidents WHERE {}",
        spec.where_clause()
    );
    let row = sqlx::query_as_with::<_, DateRangeRow, _>(&sql, spec.arguments()?)
        .fetch_one(pool)
        .await?;
    Ok(DateRange {
        start: row.first_date,
        end: row.last_date,
    })
}
