//! Request-level filter parameters shared by the dashboard endpoints.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::Deserialize;

use crate::errors::AppError;

/// Sentinel meaning "no constraint" for single-value parameters.
pub const ALL: &str = "all";

/// Last instant of a day at Postgres `timestamp` precision.
fn end_of_day() -> NaiveTime {
    NaiveTime::from_hms_micro_opt(23, 59, 59, 999_999).unwrap_or(NaiveTime::MIN)
}

/// Filters the rendering layer sends with every dashboard request.
///
/// `gender` and `country` are repeatable query keys.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardFilters {
    #[serde(default)]
    pub gender: Vec<String>,
    #[serde(default)]
    pub country: Vec<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// Inclusive date bounds parsed from [`DashboardFilters`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateBounds {
    pub start: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,
}

impl DashboardFilters {
    /// Parse the date bounds. Blank values mean "unbounded".
    ///
    /// A date-only start is that day's midnight; a date-only end covers the
    /// whole day up to its last microsecond.
    pub fn date_bounds(&self) -> Result<DateBounds, AppError> {
        Ok(DateBounds {
            start: parse_bound("startDate", self.start_date.as_deref(), NaiveTime::MIN)?,
            end: parse_bound("endDate", self.end_date.as_deref(), end_of_day())?,
        })
    }
}

/// Extra parameters of the incident list endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchQuery {
    pub search: Option<String>,
}

/// Parameters of the monthly chart.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MonthRangeQuery {
    pub range: Option<String>,
}

impl MonthRangeQuery {
    /// Number of leading months to keep. `None` means every month.
    pub fn limit(&self) -> Result<Option<i64>, AppError> {
        let raw = match self.range.as_deref().map(str::trim) {
            None | Some("") => return Ok(None),
            Some(v) if v.eq_ignore_ascii_case(ALL) => return Ok(None),
            Some(v) => v,
        };
        match raw.parse::<i64>() {
            Ok(n) if n >= 1 => Ok(Some(n)),
            _ => Err(AppError::InvalidArgument(format!(
                "range must be 'all' or a positive integer, got '{raw}'"
            ))),
        }
    }
}

/// Parameters of the location chart.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationQuery {
    pub filter_country: Option<String>,
}

/// Parse a date or date-time bound; date-only values take `day_time`.
fn parse_bound(
    name: &str,
    raw: Option<&str>,
    day_time: NaiveTime,
) -> Result<Option<NaiveDateTime>, AppError> {
    let Some(raw) = raw.map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(None);
    };
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        return Ok(Some(dt));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map(|d| Some(d.and_time(day_time)))
        .map_err(|e| {
            AppError::InvalidArgument(format!(
                "Invalid {name} '{raw}': {e}. Expected format: YYYY-MM-DD"
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn midnight(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    #[test]
    fn date_bounds_accept_dates_and_datetimes() {
        let filters = DashboardFilters {
            start_date: Some("2016-02-01".into()),
            end_date: Some("2016-06-30T23:59:59".into()),
            ..Default::default()
        };
        let bounds = filters.date_bounds().unwrap();
        assert_eq!(bounds.start, Some(midnight(2016, 2, 1)));
        assert_eq!(
            bounds.end,
            Some(
                NaiveDate::from_ymd_opt(2016, 6, 30)
                    .unwrap()
                    .and_hms_opt(23, 59, 59)
                    .unwrap()
            )
        );
    }

    #[test]
    fn date_only_end_covers_the_whole_day() {
        let filters = DashboardFilters {
            start_date: Some("2016-06-30".into()),
            end_date: Some("2016-06-30".into()),
            ..Default::default()
        };
        let bounds = filters.date_bounds().unwrap();
        let afternoon = NaiveDate::from_ymd_opt(2016, 6, 30)
            .unwrap()
            .and_hms_opt(15, 30, 0)
            .unwrap();
        assert_eq!(bounds.start, Some(midnight(2016, 6, 30)));
        assert!(bounds.end.unwrap() >= afternoon);
        assert!(bounds.end.unwrap() < midnight(2016, 7, 1));
    }

    #[test]
    fn blank_bounds_are_unbounded() {
        let filters = DashboardFilters {
            start_date: Some(" ".into()),
            ..Default::default()
        };
        assert_eq!(filters.date_bounds().unwrap(), DateBounds::default());
    }

    #[test]
    fn malformed_date_is_invalid_argument() {
        let filters = DashboardFilters {
            end_date: Some("31/12/2016".into()),
            ..Default::default()
        };
        assert!(filters.date_bounds().unwrap_err().is_invalid_argument());
    }

    #[test]
    fn month_range_sentinel_and_numbers() {
        let q = |v: Option<&str>| MonthRangeQuery {
            range: v.map(String::from),
        };
        assert_eq!(q(None).limit().unwrap(), None);
        assert_eq!(q(Some("all")).limit().unwrap(), None);
        assert_eq!(q(Some("6")).limit().unwrap(), Some(6));
        assert!(q(Some("six")).limit().is_err());
        assert!(q(Some("-1")).limit().is_err());
        assert!(q(Some("0")).limit().is_err());
    }
}
