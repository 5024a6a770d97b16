//! Longest gap between severe incidents and days since the last one.
//!
//! "Now" is the latest incident date in the whole table, never the wall
//! clock: the dataset is closed and historical.

use chrono::NaiveDate;
use serde::Serialize;
use sqlx::PgPool;

use crate::config::AnalyticsConfig;
use crate::errors::AppError;

/// Safety-record summary. Zeroed when fewer than two severe dates exist.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SafetyRecord {
    pub record_days: i64,
    pub record_start_date: Option<NaiveDate>,
    pub record_end_date: Option<NaiveDate>,
    pub current_days_since_last: i64,
    #[serde(rename = "lastSevereAccidentDate")]
    pub last_severe_date: Option<NaiveDate>,
}

/// Compute the record from ascending, distinct severe-incident dates.
///
/// The longest gap is the first adjacent pair reaching the maximum; later
/// pairs of equal length do not replace it.
pub fn analyze(severe_dates: &[NaiveDate], latest_date: Option<NaiveDate>) -> SafetyRecord {
    let (Some(first), Some(&last)) = (severe_dates.first(), severe_dates.last()) else {
        return SafetyRecord::default();
    };
    if severe_dates.len() < 2 {
        return SafetyRecord::default();
    }

    let mut record_days = 0;
    let mut record = (*first, *first);
    for pair in severe_dates.windows(2) {
        let gap = (pair[1] - pair[0]).num_days();
        if gap > record_days {
            record_days = gap;
            record = (pair[0], pair[1]);
        }
    }

    let now = latest_date.unwrap_or(last);
    SafetyRecord {
        record_days,
        record_start_date: Some(record.0),
        record_end_date: Some(record.1),
        current_days_since_last: (now - last).num_days(),
        last_severe_date: Some(last),
    }
}

/// Load severe dates and the global latest date, then analyze them.
pub async fn get_record(pool: &PgPool, config: &AnalyticsConfig) -> Result<SafetyRecord, AppError> {
    let severe_dates = sqlx::query_scalar::<_, NaiveDate>(
        r#"
        SELECT DISTINCT incident_date::date AS day
        FROM incidents
        WHERE split_part(severity, ' ', 1) = ANY($1)
           OR split_part(potential_severity, ' ', 1) = ANY($1)
        ORDER BY day
        "#,
    )
    .bind(config.severe_codes())
    .fetch_all(pool)
    .await?;

    let latest_date =
        sqlx::query_scalar::<_, Option<NaiveDate>>("SELECT MAX(incident_date)::date FROM incidents")
            .fetch_one(pool)
            .await?;

    let record = analyze(&severe_dates, latest_date);
    tracing::debug!(
        severe_days = severe_dates.len(),
        record_days = record.record_days,
        "Computed safety record"
    );
    Ok(record)
}
