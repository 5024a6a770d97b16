//! Incident record model and the fixed table schema it maps to.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Body-part value recorded when the affected region is unknown.
pub const UNSPECIFIED_BODY_PART: &str = "Unspecified";

/// Columns of the `incidents` table that filters and aggregations may reference.
///
/// Column names only ever reach SQL through this enum, never from request input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Date,
    Country,
    Region,
    Sector,
    Severity,
    Gender,
    CriticalRisk,
    Description,
    BodyPart,
}

impl Column {
    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Date => "incident_date",
            Self::Country => "country",
            Self::Region => "region",
            Self::Sector => "sector",
            Self::Severity => "severity",
            Self::Gender => "gender",
            Self::CriticalRisk => "critical_risk",
            Self::Description => "description",
            Self::BodyPart => "body_part",
        }
    }
}

/// Textual columns searched by the free-text filter on the incident list.
pub const SEARCH_COLUMNS: [Column; 6] = [
    Column::Country,
    Column::Region,
    Column::Description,
    Column::Severity,
    Column::CriticalRisk,
    Column::Sector,
];

/// Projection shared by every query returning full incident rows.
pub const INCIDENT_COLUMNS: &str = "id, incident_date AS date, country, region, sector, \
     severity, potential_severity, gender, worker_type, critical_risk, description, body_part";

/// One accident as exposed to the rendering layer.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct Incident {
    pub id: i64,
    pub date: NaiveDateTime,
    pub country: String,
    #[serde(rename = "local")]
    pub region: String,
    pub sector: String,
    #[serde(rename = "accidentLevel")]
    pub severity: String,
    #[serde(rename = "potentialLevel")]
    pub potential_severity: String,
    pub gender: String,
    #[serde(rename = "employeeType")]
    pub worker_type: String,
    #[serde(rename = "criticalRisk")]
    pub critical_risk: String,
    pub description: String,
    #[serde(rename = "bodyPart")]
    pub body_part: String,
}
