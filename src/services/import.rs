//! CSV import of incident records into the `incidents` table.
//!
//! Rows repeating another row in every column except `id` are dropped (first
//! occurrence wins). A missing body part is derived from the description.

use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::Deserialize;
use sqlx::PgPool;

use crate::models::incident::Incident;
use crate::services::body_part;

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid date '{value}' on record {id}")]
    InvalidDate { id: i64, value: String },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// One CSV row in the canonical column layout.
#[derive(Debug, Clone, Deserialize)]
struct CsvRecord {
    id: i64,
    date: String,
    country: String,
    region: String,
    sector: String,
    severity: String,
    potential_severity: String,
    gender: String,
    worker_type: String,
    critical_risk: String,
    description: String,
    #[serde(default)]
    body_part: Option<String>,
}

/// Counts from reading one CSV file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub read: usize,
    pub duplicates: usize,
}

fn parse_date(id: i64, raw: &str) -> Result<NaiveDateTime, ImportError> {
    let raw = raw.trim();
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(dt);
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map(|d| d.and_time(NaiveTime::MIN))
        .map_err(|_| ImportError::InvalidDate {
            id,
            value: raw.to_string(),
        })
}

/// Parse, deduplicate and classify incidents from CSV data.
pub fn read_incidents<R: Read>(reader: R) -> Result<(Vec<Incident>, ImportReport), ImportError> {
    let mut csv = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut seen = HashSet::new();
    let mut incidents = Vec::new();
    let mut report = ImportReport::default();

    for record in csv.deserialize::<CsvRecord>() {
        let record = record?;
        report.read += 1;

        let date = parse_date(record.id, &record.date)?;
        let body_part = match record.body_part.filter(|b| !b.is_empty()) {
            Some(part) => part,
            None => body_part::classify(&record.description).to_string(),
        };
        let incident = Incident {
            id: record.id,
            date,
            country: record.country,
            region: record.region,
            sector: record.sector,
            severity: record.severity,
            potential_severity: record.potential_severity,
            gender: record.gender,
            worker_type: record.worker_type,
            critical_risk: record.critical_risk,
            description: record.description,
            body_part,
        };

        let key = (
            incident.date,
            incident.country.clone(),
            incident.region.clone(),
            incident.sector.clone(),
            incident.severity.clone(),
            incident.potential_severity.clone(),
            incident.gender.clone(),
            incident.worker_type.clone(),
            incident.critical_risk.clone(),
            incident.description.clone(),
        );
        if seen.insert(key) {
            incidents.push(incident);
        } else {
            report.duplicates += 1;
        }
    }

    Ok((incidents, report))
}

/// Read a CSV file from disk.
pub fn read_file(path: &Path) -> Result<(Vec<Incident>, ImportReport), ImportError> {
    let file = std::fs::File::open(path).map_err(csv::Error::from)?;
    read_incidents(file)
}

/// Insert incidents in one transaction.
///
/// Existing rows are kept and nothing is inserted unless the table is empty
/// or `replace` is set, in which case the table is cleared first.
pub async fn load(
    pool: &PgPool,
    incidents: &[Incident],
    replace: bool,
) -> Result<usize, ImportError> {
    let mut tx = pool.begin().await?;

    let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM incidents")
        .fetch_one(&mut *tx)
        .await?;
    if existing > 0 && !replace {
        tracing::info!(existing, "Incident table already populated, skipping import");
        return Ok(0);
    }
    if replace {
        sqlx::query("DELETE FROM incidents").execute(&mut *tx).await?;
    }

    for incident in incidents {
        sqlx::query(
            r#"
            INSERT INTO incidents (
                id, incident_date, country, region, sector, severity,
                potential_severity, gender, worker_type, critical_risk,
                description, body_part
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(incident.id)
        .bind(incident.date)
        .bind(&incident.country)
        .bind(&incident.region)
        .bind(&incident.sector)
        .bind(&incident.severity)
        .bind(&incident.potential_severity)
        .bind(&incident.gender)
        .bind(&incident.worker_type)
        .bind(&incident.critical_risk)
        .bind(&incident.description)
        .bind(&incident.body_part)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(incidents.len())
}
