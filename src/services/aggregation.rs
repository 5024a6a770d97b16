//! Group-by/count projections over the filtered incident table.

use serde::Serialize;
use sqlx::{FromRow, PgPool};

use crate::errors::AppError;
use crate::models::incident::Column;
use crate::services::filter::FilterSpec;

/// Month abbreviations used in chart labels, indexed by month number - 1.
pub const MONTH_ABBREVIATIONS: [&str; 12] = [
    "Jan", "Fev", "Mar", "Abr", "Mai", "Jun", "Jul", "Ago", "Set", "Out", "Nov", "Dez",
];

pub const SECTOR_MINING: &str = "Mining";
pub const SECTOR_METALS: &str = "Metals";
pub const SECTOR_OTHERS: &str = "Others";

/// Locations listed in the statistics breakdown.
const TOP_LOCATIONS: i64 = 10;

/// One grouped bucket.
#[derive(Debug, Clone, Serialize, FromRow, PartialEq, Eq)]
pub struct CategoryCount {
    pub label: String,
    pub count: i64,
}

impl CategoryCount {
    pub fn new(label: impl Into<String>, count: i64) -> Self {
        Self {
            label: label.into(),
            count,
        }
    }
}

/// Incident count for a (region, country) pair.
#[derive(Debug, Clone, Serialize, FromRow, PartialEq, Eq)]
pub struct LocationCount {
    pub region: String,
    pub country: String,
    pub count: i64,
}

/// Parallel label/value arrays consumed by the chart widgets.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub data: Vec<i64>,
}

impl FromIterator<CategoryCount> for ChartSeries {
    fn from_iter<I: IntoIterator<Item = CategoryCount>>(iter: I) -> Self {
        let mut series = Self::default();
        for bucket in iter {
            series.labels.push(bucket.label);
            series.data.push(bucket.count);
        }
        series
    }
}

/// Incident counts folded into the two named sectors plus everything else.
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct SectorBreakdown {
    #[serde(rename = "Mining")]
    pub mining: i64,
    #[serde(rename = "Metals")]
    pub metals: i64,
    #[serde(rename = "Others")]
    pub others: i64,
}

impl SectorBreakdown {
    /// Fold grouped sector counts; unknown sectors are summed into `others`.
    pub fn fold(rows: &[CategoryCount]) -> Self {
        rows.iter().fold(Self::default(), |mut acc, row| {
            match row.label.as_str() {
                SECTOR_MINING => acc.mining += row.count,
                SECTOR_METALS => acc.metals += row.count,
                _ => acc.others += row.count,
            }
            acc
        })
    }

    /// All three buckets, zero counts included.
    pub fn to_series(&self) -> ChartSeries {
        [
            CategoryCount::new(SECTOR_MINING, self.mining),
            CategoryCount::new(SECTOR_METALS, self.metals),
            CategoryCount::new(SECTOR_OTHERS, self.others),
        ]
        .into_iter()
        .collect()
    }
}

/// Render a `YYYY-MM` key as `Mon/YYYY`.
///
/// Unknown month numbers are kept as-is; keys without a dash are returned unchanged.
pub fn month_label(key: &str) -> String {
    let Some((year, month)) = key.split_once('-') else {
        return key.to_string();
    };
    let name = month
        .parse::<usize>()
        .ok()
        .and_then(|m| m.checked_sub(1))
        .and_then(|i| MONTH_ABBREVIATIONS.get(i))
        .copied()
        .unwrap_or(month);
    format!("{name}/{year}")
}

/// Ordering applied to grouped results.
#[derive(Debug, Clone, Copy)]
enum Order {
    CountDesc,
    LabelAsc,
}

/// Run `SELECT <group> AS label, COUNT(*) ... GROUP BY label` under `spec`.
async fn grouped_counts(
    pool: &PgPool,
    spec: &FilterSpec,
    group_expr: &str,
    order: Order,
    limit: Option<i64>,
) -> Result<Vec<CategoryCount>, AppError> {
    let order_by = match order {
        Order::CountDesc => "count DESC, label ASC",
        Order::LabelAsc => "label ASC",
    };
    let mut sql = format!(
        "SELECT {group_expr} AS label, COUNT(*) AS count \
         FROM incidents WHERE {} \
         GROUP BY label ORDER BY {order_by}",
        spec.where_clause()
    );
    if let Some(limit) = limit {
        sql.push_str(&format!(" LIMIT {limit}"));
    }

    let rows = sqlx::query_as_with::<_, CategoryCount, _>(&sql, spec.arguments()?)
        .fetch_all(pool)
        .await?;
    tracing::debug!(group = group_expr, buckets = rows.len(), "Grouped incident counts");
    Ok(rows)
}

pub async fn by_gender(pool: &PgPool, spec: &FilterSpec) -> Result<Vec<CategoryCount>, AppError> {
    grouped_counts(pool, spec, Column::Gender.as_sql(), Order::LabelAsc, None).await
}

pub async fn by_country(pool: &PgPool, spec: &FilterSpec) -> Result<Vec<CategoryCount>, AppError> {
    grouped_counts(pool, spec, Column::Country.as_sql(), Order::CountDesc, None).await
}

pub async fn by_sector(pool: &PgPool, spec: &FilterSpec) -> Result<Vec<CategoryCount>, AppError> {
    grouped_counts(pool, spec, Column::Sector.as_sql(), Order::CountDesc, None).await
}

/// Counts per `YYYY-MM` bucket in chronological order, optionally capped to the first `limit`.
pub async fn by_month(
    pool: &PgPool,
    spec: &FilterSpec,
    limit: Option<i64>,
) -> Result<Vec<CategoryCount>, AppError> {
    let month_expr = format!("to_char({}, 'YYYY-MM')", Column::Date.as_sql());
    grouped_counts(pool, spec, &month_expr, Order::LabelAsc, limit).await
}

pub async fn by_region(
    pool: &PgPool,
    spec: &FilterSpec,
    limit: Option<i64>,
) -> Result<Vec<CategoryCount>, AppError> {
    grouped_counts(pool, spec, Column::Region.as_sql(), Order::CountDesc, limit).await
}

pub async fn by_body_part(
    pool: &PgPool,
    spec: &FilterSpec,
    limit: Option<i64>,
) -> Result<Vec<CategoryCount>, AppError> {
    grouped_counts(pool, spec, Column::BodyPart.as_sql(), Order::CountDesc, limit).await
}

/// Busiest (region, country) pairs.
pub async fn by_location(
    pool: &PgPool,
    spec: &FilterSpec,
    limit: i64,
) -> Result<Vec<LocationCount>, AppError> {
    let sql = format!(
        "SELECT region, country, COUNT(*) AS count \
         FROM incidents WHERE {} \
         GROUP BY region, country \
         ORDER BY count DESC, region ASC \
         LIMIT {limit}",
        spec.where_clause()
    );
    let rows = sqlx::query_as_with::<_, LocationCount, _>(&sql, spec.arguments()?)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// Every breakdown of the statistics page.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    pub gender: Vec<CategoryCount>,
    pub countries: Vec<CategoryCount>,
    pub sectors: Vec<CategoryCount>,
    pub months: Vec<CategoryCount>,
    pub locations: Vec<LocationCount>,
    pub body_parts: Vec<CategoryCount>,
}

/// Fetch all breakdowns concurrently under the same filter.
pub async fn statistics(pool: &PgPool, spec: &FilterSpec) -> Result<Statistics, AppError> {
    let (gender, countries, sectors, months, locations, body_parts) = tokio::try_join!(
        by_gender(pool, spec),
        by_country(pool, spec),
        by_sector(pool, spec),
        by_month(pool, spec, None),
        by_location(pool, spec, TOP_LOCATIONS),
        by_body_part(pool, spec, None),
    )?;

    Ok(Statistics {
        gender,
        countries,
        sectors,
        months,
        locations,
        body_parts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sectors_fold_unknown_values_into_others() {
        let rows = vec![
            CategoryCount::new("Mining", 5),
            CategoryCount::new("Metals", 3),
            CategoryCount::new("Construction", 2),
            CategoryCount::new("Logistics", 1),
        ];
        let breakdown = SectorBreakdown::fold(&rows);
        assert_eq!(
            breakdown,
            SectorBreakdown {
                mining: 5,
                metals: 3,
                others: 3
            }
        );
        assert_eq!(
            serde_json::to_value(breakdown).unwrap(),
            serde_json::json!({"Mining": 5, "Metals": 3, "Others": 3})
        );
    }

    #[test]
    fn sector_series_always_has_three_buckets() {
        let series = SectorBreakdown::fold(&[CategoryCount::new("Metals", 4)]).to_series();
        assert_eq!(series.labels, vec!["Mining", "Metals", "Others"]);
        assert_eq!(series.data, vec![0, 4, 0]);

        let empty = SectorBreakdown::fold(&[]).to_series();
        assert_eq!(empty.data, vec![0, 0, 0]);
    }

    #[test]
    fn literal_others_row_lands_in_others() {
        let rows = vec![
            CategoryCount::new("Others", 7),
            CategoryCount::new("Energy", 1),
        ];
        assert_eq!(SectorBreakdown::fold(&rows).others, 8);
    }

    #[test]
    fn month_labels() {
        assert_eq!(month_label("2016-01"), "Jan/2016");
        assert_eq!(month_label("2017-12"), "Dez/2017");
        assert_eq!(month_label("2016-02"), "Fev/2016");
        assert_eq!(month_label("2016-13"), "13/2016");
        assert_eq!(month_label("garbage"), "garbage");
    }

    #[test]
    fn series_preserves_order() {
        let series: ChartSeries = vec![
            CategoryCount::new("São Paulo", 12),
            CategoryCount::new("Texas", 9),
        ]
        .into_iter()
        .collect();
        assert_eq!(series.labels, vec!["São Paulo", "Texas"]);
        assert_eq!(series.data, vec![12, 9]);
    }
}
