//! Chart series for the dashboard widgets.

use serde::Serialize;
use sqlx::PgPool;

use crate::errors::AppError;
use crate::models::incident::{Column, UNSPECIFIED_BODY_PART};
use crate::services::aggregation::{self, month_label, ChartSeries, SectorBreakdown};
use crate::services::filter::FilterSpec;

/// Regions shown in the location chart.
const LOCATION_CHART_SIZE: i64 = 6;

/// Monthly incident series labelled `Mon/YYYY`.
pub async fn monthly(
    pool: &PgPool,
    spec: &FilterSpec,
    limit: Option<i64>,
) -> Result<ChartSeries, AppError> {
    let rows = aggregation::by_month(pool, spec, limit).await?;
    Ok(rows
        .into_iter()
        .map(|mut bucket| {
            bucket.label = month_label(&bucket.label);
            bucket
        })
        .collect())
}

/// Mining / Metals / Others series.
pub async fn sectors(pool: &PgPool, spec: &FilterSpec) -> Result<ChartSeries, AppError> {
    let rows = aggregation::by_sector(pool, spec).await?;
    Ok(SectorBreakdown::fold(&rows).to_series())
}

/// Busiest regions, optionally restricted to one country (`"all"` means any).
pub async fn locations(
    pool: &PgPool,
    spec: FilterSpec,
    country: Option<&str>,
) -> Result<ChartSeries, AppError> {
    let spec = spec.equals(Column::Country, country);
    let rows = aggregation::by_region(pool, &spec, Some(LOCATION_CHART_SIZE)).await?;
    Ok(rows.into_iter().collect())
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct BodyPartCount {
    pub part: String,
    pub count: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BodyPartHeatmap {
    pub body_parts: Vec<BodyPartCount>,
}

/// Body-part counts with the `Unspecified` sentinel excluded.
pub async fn body_part_heatmap(
    pool: &PgPool,
    spec: FilterSpec,
) -> Result<BodyPartHeatmap, AppError> {
    let spec = spec.not_equal(Column::BodyPart, UNSPECIFIED_BODY_PART);
    let rows = aggregation::by_body_part(pool, &spec, None).await?;
    Ok(BodyPartHeatmap {
        body_parts: rows
            .into_iter()
            .map(|bucket| BodyPartCount {
                part: bucket.label,
                count: bucket.count,
            })
            .collect(),
    })
}
