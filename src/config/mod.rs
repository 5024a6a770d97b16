use std::env;

use chrono::NaiveDate;

use crate::models::severity::SeverityLevel;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub database_max_connections: u32,
    pub host: String,
    pub port: u16,
    pub frontend_url: String,
    pub analytics: AnalyticsConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, env::VarError> {
        Ok(Self {
            database_url: env::var("DATABASE_URL")?,
            database_max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .unwrap_or(10),
            host: env::var("BACKEND_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("BACKEND_PORT")
                .unwrap_or_else(|_| "5001".to_string())
                .parse()
                .unwrap_or(5001),
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5001".to_string()),
            analytics: AnalyticsConfig::from_env(),
        })
    }
}

/// Dataset-specific reference points for the derived metrics.
///
/// The incident table is a closed historical dataset, so "now" is never the
/// wall clock: the recommender anchors deadlines on `action_reference_date`
/// and only looks at incidents on or after `recent_period_start`.
#[derive(Debug, Clone)]
pub struct AnalyticsConfig {
    pub recent_period_start: NaiveDate,
    pub action_reference_date: NaiveDate,
    /// Lowest severity rank counted as severe.
    pub severe_threshold: SeverityLevel,
    /// Minimum incidents in the recent period for a location to be ranked.
    pub hotspot_min_incidents: i64,
    pub urgent_severe_count: i64,
    pub high_severe_count: i64,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            recent_period_start: NaiveDate::from_ymd_opt(2017, 1, 1).unwrap_or_default(),
            action_reference_date: NaiveDate::from_ymd_opt(2017, 7, 15).unwrap_or_default(),
            severe_threshold: SeverityLevel::IV,
            hotspot_min_incidents: 3,
            urgent_severe_count: 5,
            high_severe_count: 3,
        }
    }
}

impl AnalyticsConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            recent_period_start: env_date("RECENT_PERIOD_START")
                .unwrap_or(defaults.recent_period_start),
            action_reference_date: env_date("ACTION_REFERENCE_DATE")
                .unwrap_or(defaults.action_reference_date),
            severe_threshold: env::var("SEVERE_THRESHOLD")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.severe_threshold),
            ..defaults
        }
    }

    /// Roman codes of every severity rank at or above the threshold.
    pub fn severe_codes(&self) -> Vec<String> {
        SeverityLevel::ALL
            .iter()
            .filter(|level| **level >= self.severe_threshold)
            .map(|level| level.code().to_string())
            .collect()
    }
}

fn env_date(key: &str) -> Option<NaiveDate> {
    env::var(key)
        .ok()
        .and_then(|v| NaiveDate::parse_from_str(v.trim(), "%Y-%m-%d").ok())
}
