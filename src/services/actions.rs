//! Rule-based recommended actions over the recent period.
//!
//! The recommender ignores request filters. It looks only at incidents on or
//! after [`AnalyticsConfig::recent_period_start`] and dates every deadline
//! from [`AnalyticsConfig::action_reference_date`].

use std::cmp::Reverse;

use chrono::{Days, NaiveDateTime, NaiveTime};
use serde::Serialize;
use sqlx::{FromRow, PgPool};

use crate::config::AnalyticsConfig;
use crate::errors::AppError;
use crate::models::filters::DateBounds;
use crate::models::incident::{Column, UNSPECIFIED_BODY_PART};
use crate::services::aggregation::{self, CategoryCount};
use crate::services::filter::{FilterSpec, FilterValue};

/// Number of actions always returned.
pub const ACTION_COUNT: usize = 3;

const DEADLINE_FORMAT: &str = "%d/%m/%Y";

/// Country name to display code. Unlisted countries fall back to [`DEFAULT_COUNTRY_CODE`].
const COUNTRY_CODES: &[(&str, &str)] = &[
    ("Brazil", "BR"),
    ("Brasil", "BR"),
    ("USA", "US"),
    ("EUA", "US"),
    ("Canada", "CA"),
    ("Canadá", "CA"),
];
const DEFAULT_COUNTRY_CODE: &str = "BR";

/// Body part to suggested protective equipment.
const PPE_SUGGESTIONS: &[(&str, &str)] = &[
    ("Hands", "reinforced protective gloves"),
    ("Feet", "non-slip safety footwear"),
    ("Eyes", "safety goggles and face shields"),
    ("Head", "helmets and head protection"),
    ("Torso", "protective vests"),
];
const DEFAULT_PPE: &str = "appropriate PPE";

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Urgent,
    High,
    Medium,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum ActionStatus {
    InProgress,
    Planned,
}

/// One recommended action card.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct RecommendedAction {
    pub priority: Priority,
    pub status: ActionStatus,
    pub title: String,
    pub location: String,
    pub responsible: String,
    pub deadline: String,
    pub description: String,
}

/// Incident totals for one (region, country) pair in the recent period.
#[derive(Debug, Clone, FromRow, PartialEq, Eq)]
pub struct LocationRisk {
    pub region: String,
    pub country: String,
    pub total: i64,
    pub severe: i64,
}

pub fn country_code(country: &str) -> &'static str {
    COUNTRY_CODES
        .iter()
        .find(|(name, _)| *name == country)
        .map_or(DEFAULT_COUNTRY_CODE, |(_, code)| code)
}

pub fn ppe_suggestion(body_part: &str) -> &'static str {
    PPE_SUGGESTIONS
        .iter()
        .find(|(part, _)| *part == body_part)
        .map_or(DEFAULT_PPE, |(_, ppe)| ppe)
}

/// Pick the riskiest location: most severe incidents, then most incidents.
///
/// Locations with fewer than `min_incidents` are not candidates. Remaining
/// ties resolve by region name so the choice is deterministic.
pub fn top_location(locations: &[LocationRisk], min_incidents: i64) -> Option<&LocationRisk> {
    locations
        .iter()
        .filter(|loc| loc.total >= min_incidents)
        .min_by_key(|loc| (Reverse(loc.severe), Reverse(loc.total), loc.region.as_str()))
}

/// Apply the action rules to pre-aggregated recent-period data.
pub fn recommend(
    locations: &[LocationRisk],
    top_body_part: Option<&CategoryCount>,
    config: &AnalyticsConfig,
) -> Vec<RecommendedAction> {
    let deadline = |days: u64| {
        config
            .action_reference_date
            .checked_add_days(Days::new(days))
            .unwrap_or(config.action_reference_date)
            .format(DEADLINE_FORMAT)
            .to_string()
    };

    let mut actions = Vec::with_capacity(ACTION_COUNT);

    if let Some(loc) = top_location(locations, config.hotspot_min_incidents) {
        let location = format!("{} ({})", loc.region, country_code(&loc.country));
        if loc.severe >= config.urgent_severe_count {
            actions.push(RecommendedAction {
                priority: Priority::Urgent,
                status: ActionStatus::InProgress,
                title: "Full safety audit".to_string(),
                location,
                responsible: "Safety Coordinator".to_string(),
                deadline: deadline(2),
                description: format!("{} severe accidents recorded at this location", loc.severe),
            });
        } else if loc.severe >= config.high_severe_count {
            actions.push(RecommendedAction {
                priority: Priority::High,
                status: ActionStatus::Planned,
                title: "Safety protocol reinforcement".to_string(),
                location,
                responsible: "Operations Supervisor".to_string(),
                deadline: deadline(5),
                description: format!("Area with {} recent severe accidents", loc.severe),
            });
        }
    }

    if actions.len() < ACTION_COUNT {
        if let Some(part) = top_body_part {
            let name = part.label.to_lowercase();
            actions.push(RecommendedAction {
                priority: Priority::Medium,
                status: ActionStatus::Planned,
                title: format!("PPE review: {name}"),
                location: "Production sectors".to_string(),
                responsible: "Equipment Manager".to_string(),
                deadline: deadline(10),
                description: format!(
                    "{} accidents affected {name}. Suggested: {}",
                    part.count,
                    ppe_suggestion(&part.label)
                ),
            });
        }
    }

    while actions.len() < ACTION_COUNT {
        actions.push(RecommendedAction {
            priority: Priority::Medium,
            status: ActionStatus::Planned,
            title: "Preventive equipment maintenance".to_string(),
            location: "All units".to_string(),
            responsible: "Maintenance Team".to_string(),
            deadline: deadline(14),
            description: "Regular inspection of equipment and facilities".to_string(),
        });
    }

    actions.truncate(ACTION_COUNT);
    actions
}

/// The unfiltered recent-period slice.
fn recent_period(config: &AnalyticsConfig) -> FilterSpec {
    let start: NaiveDateTime = config.recent_period_start.and_time(NaiveTime::MIN);
    FilterSpec::new().date_range(DateBounds {
        start: Some(start),
        end: None,
    })
}

async fn fetch_location_risk(
    pool: &PgPool,
    config: &AnalyticsConfig,
) -> Result<Vec<LocationRisk>, AppError> {
    let mut spec = recent_period(config);
    let severe = spec.bind(FilterValue::TextList(config.severe_codes()));
    let sql = format!(
        "SELECT region, country, COUNT(*) AS total, \
                COALESCE(SUM(CASE WHEN split_part(severity, ' ', 1) = ANY({severe}) \
                                    OR split_part(potential_severity, ' ', 1) = ANY({severe}) \
                             THEN 1 ELSE 0 END), 0) AS severe \
         FROM incidents WHERE {} \
         GROUP BY region, country",
        spec.where_clause()
    );
    let rows = sqlx::query_as_with::<_, LocationRisk, _>(&sql, spec.arguments()?)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

async fn fetch_top_body_part(
    pool: &PgPool,
    config: &AnalyticsConfig,
) -> Result<Option<CategoryCount>, AppError> {
    let spec = recent_period(config).not_equal(Column::BodyPart, UNSPECIFIED_BODY_PART);
    let rows = aggregation::by_body_part(pool, &spec, Some(1)).await?;
    Ok(rows.into_iter().next())
}

/// Build exactly [`ACTION_COUNT`] recommended actions.
pub async fn next_actions(
    pool: &PgPool,
    config: &AnalyticsConfig,
) -> Result<Vec<RecommendedAction>, AppError> {
    let (locations, top_body_part) = tokio::try_join!(
        fetch_location_risk(pool, config),
        fetch_top_body_part(pool, config),
    )?;

    let actions = recommend(&locations, top_body_part.as_ref(), config);
    tracing::info!(
        locations = locations.len(),
        first_priority = ?actions.first().map(|a| a.priority),
        "Generated recommended actions"
    );
    Ok(actions)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn loc(region: &str, country: &str, total: i64, severe: i64) -> LocationRisk {
        LocationRisk {
            region: region.to_string(),
            country: country.to_string(),
            total,
            severe,
        }
    }

    #[test]
    fn urgent_audit_for_five_severe_incidents() {
        let config = AnalyticsConfig::default();
        let locations = vec![loc("Texas", "USA", 9, 6), loc("Bahia", "Brazil", 12, 2)];
        let actions = recommend(&locations, None, &config);

        assert_eq!(actions.len(), 3);
        assert_eq!(actions[0].priority, Priority::Urgent);
        assert_eq!(actions[0].status, ActionStatus::InProgress);
        assert_eq!(actions[0].location, "Texas (US)");
        assert_eq!(actions[0].deadline, "17/07/2017");
        assert_eq!(
            actions[0].description,
            "6 severe accidents recorded at this location"
        );
    }

    #[test]
    fn high_priority_for_three_severe_incidents() {
        let config = AnalyticsConfig::default();
        let locations = vec![loc("Quebec", "Canada", 4, 3)];
        let actions = recommend(&locations, None, &config);

        assert_eq!(actions[0].priority, Priority::High);
        assert_eq!(actions[0].status, ActionStatus::Planned);
        assert_eq!(actions[0].location, "Quebec (CA)");
        assert_eq!(actions[0].deadline, "20/07/2017");
    }

    #[test]
    fn no_location_action_below_three_severe() {
        let config = AnalyticsConfig::default();
        let locations = vec![loc("Goiás", "Brazil", 20, 2)];
        let actions = recommend(&locations, None, &config);
        assert!(actions.iter().all(|a| a.priority == Priority::Medium));
    }

    #[test]
    fn locations_below_minimum_are_not_candidates() {
        let locations = vec![loc("Nevada", "USA", 2, 2), loc("Arizona", "USA", 3, 1)];
        let top = top_location(&locations, 3).unwrap();
        assert_eq!(top.region, "Arizona");
        assert!(top_location(&locations[..1], 3).is_none());
    }

    #[test]
    fn ranking_uses_severe_then_total() {
        let locations = vec![
            loc("Florida", "USA", 10, 4),
            loc("Colorado", "USA", 14, 4),
            loc("São Paulo", "Brazil", 30, 3),
        ];
        assert_eq!(top_location(&locations, 3).unwrap().region, "Colorado");
    }

    #[test]
    fn unknown_country_falls_back_to_default_code() {
        assert_eq!(country_code("Chile"), "BR");
        assert_eq!(country_code("USA"), "US");
        assert_eq!(country_code("Canadá"), "CA");
    }

    #[test]
    fn body_part_action_uses_ppe_lookup() {
        let config = AnalyticsConfig::default();
        let hands = CategoryCount::new("Hands", 42);
        let actions = recommend(&[], Some(&hands), &config);

        assert_eq!(actions[0].title, "PPE review: hands");
        assert_eq!(actions[0].deadline, "25/07/2017");
        assert_eq!(
            actions[0].description,
            "42 accidents affected hands. Suggested: reinforced protective gloves"
        );
        assert_eq!(ppe_suggestion("Left Knee"), "appropriate PPE");
    }

    #[test]
    fn filler_repeats_to_guarantee_three_actions() {
        let config = AnalyticsConfig::default();
        let actions = recommend(&[], None, &config);

        assert_eq!(actions.len(), ACTION_COUNT);
        assert_eq!(actions[0], actions[1]);
        assert_eq!(actions[1], actions[2]);
        assert_eq!(actions[0].title, "Preventive equipment maintenance");
        assert_eq!(actions[0].deadline, "29/07/2017");
    }

    #[test]
    fn order_is_location_then_body_part_then_filler() {
        let config = AnalyticsConfig::default();
        let locations = vec![loc("Minas Gerais", "Brazil", 15, 7)];
        let feet = CategoryCount::new("Feet", 11);
        let actions = recommend(&locations, Some(&feet), &config);

        let titles: Vec<&str> = actions.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(
            titles,
            vec![
                "Full safety audit",
                "PPE review: feet",
                "Preventive equipment maintenance"
            ]
        );
    }

    #[test]
    fn serializes_priority_and_status_labels() {
        let config = AnalyticsConfig::default();
        let actions = recommend(&[loc("Texas", "USA", 9, 6)], None, &config);
        let json = serde_json::to_value(&actions[0]).unwrap();
        assert_eq!(json["priority"], "urgent");
        assert_eq!(json["status"], "in-progress");
        assert_eq!(json["responsible"], "Safety Coordinator");
    }

    #[test]
    fn deadlines_follow_configured_reference_date() {
        let config = AnalyticsConfig {
            action_reference_date: NaiveDate::from_ymd_opt(2020, 12, 30).unwrap(),
            ..AnalyticsConfig::default()
        };
        let actions = recommend(&[], None, &config);
        assert_eq!(actions[0].deadline, "13/01/2021");
    }
}
