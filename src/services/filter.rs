//! Per-request WHERE-clause builder with positional `$N` parameters.
//!
//! A [`FilterSpec`] is created for one request, extended through chained
//! calls and read by the queries of that request. Every caller-supplied value
//! is bound through a placeholder; only column names from [`Column`] and
//! fixed operators are ever written into the predicate text.

use chrono::NaiveDateTime;
use sqlx::postgres::PgArguments;
use sqlx::Arguments;

use crate::errors::AppError;
use crate::models::filters::{DashboardFilters, DateBounds, ALL};
use crate::models::incident::Column;

/// Predicate used when no clause was added.
pub const TAUTOLOGY: &str = "1=1";

/// A value bound to one placeholder.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    Text(String),
    Timestamp(NaiveDateTime),
    TextList(Vec<String>),
}

/// Accumulated predicate clauses and their positional parameters.
///
/// Placeholders are numbered `$1, $2, ...` in allocation order, one per bound
/// value, so `params()[i]` always binds to `$(i + 1)`.
#[derive(Debug, Clone, Default)]
pub struct FilterSpec {
    clauses: Vec<String>,
    params: Vec<FilterValue>,
}

impl FilterSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// The gender, country and date-range filters every dashboard query applies.
    pub fn from_dashboard(filters: &DashboardFilters) -> Result<Self, AppError> {
        let bounds = filters.date_bounds()?;
        Ok(Self::new()
            .any_of(Column::Gender, &filters.gender)
            .any_of(Column::Country, &filters.country)
            .date_range(bounds))
    }

    /// Allocate the next placeholder for `value` and return its text (`$N`).
    ///
    /// Also used for parameters that appear outside the WHERE clause, such as
    /// projection expressions, so their numbering stays consistent.
    pub fn bind(&mut self, value: FilterValue) -> String {
        self.params.push(value);
        format!("${}", self.params.len())
    }

    /// `column IN ($a, $b, ...)`, one placeholder per value in the given order.
    /// No clause when `values` is empty.
    #[must_use]
    pub fn any_of(mut self, column: Column, values: &[String]) -> Self {
        if values.is_empty() {
            return self;
        }
        let placeholders: Vec<String> = values
            .iter()
            .map(|v| self.bind(FilterValue::Text(v.clone())))
            .collect();
        self.clauses
            .push(format!("{} IN ({})", column.as_sql(), placeholders.join(", ")));
        self
    }

    /// Inclusive lower and upper date bounds, each independently optional.
    #[must_use]
    pub fn date_range(mut self, bounds: DateBounds) -> Self {
        let column = Column::Date.as_sql();
        if let Some(start) = bounds.start {
            let p = self.bind(FilterValue::Timestamp(start));
            self.clauses.push(format!("{column} >= {p}"));
        }
        if let Some(end) = bounds.end {
            let p = self.bind(FilterValue::Timestamp(end));
            self.clauses.push(format!("{column} <= {p}"));
        }
        self
    }

    /// `column = $N` unless the value is absent, blank, or the `all` sentinel.
    #[must_use]
    pub fn equals(mut self, column: Column, value: Option<&str>) -> Self {
        match value {
            Some(v) if !v.is_empty() && v != ALL => {
                let p = self.bind(FilterValue::Text(v.to_string()));
                self.clauses.push(format!("{} = {p}", column.as_sql()));
            }
            _ => {}
        }
        self
    }

    /// `column <> $N`, used to exclude sentinel categories.
    #[must_use]
    pub fn not_equal(mut self, column: Column, value: &str) -> Self {
        let p = self.bind(FilterValue::Text(value.to_string()));
        self.clauses.push(format!("{} <> {p}", column.as_sql()));
        self
    }

    /// Case-insensitive substring match across `columns`.
    ///
    /// The pattern `%query%` is bound once and every OR branch references the
    /// same placeholder.
    #[must_use]
    pub fn search(mut self, query: Option<&str>, columns: &[Column]) -> Self {
        let Some(query) = query.map(str::trim).filter(|q| !q.is_empty()) else {
            return self;
        };
        if columns.is_empty() {
            return self;
        }
        let p = self.bind(FilterValue::Text(format!("%{query}%")));
        let branches: Vec<String> = columns
            .iter()
            .map(|c| format!("{} ILIKE {p}", c.as_sql()))
            .collect();
        self.clauses.push(format!("({})", branches.join(" OR ")));
        self
    }

    /// AND-join of every clause, or [`TAUTOLOGY`] when there are none.
    pub fn where_clause(&self) -> String {
        if self.clauses.is_empty() {
            TAUTOLOGY.to_string()
        } else {
            self.clauses.join(" AND ")
        }
    }

    /// Bound values in placeholder order.
    pub fn params(&self) -> &[FilterValue] {
        &self.params
    }

    /// Positional arguments ready for `sqlx::query_*_with`.
    pub fn arguments(&self) -> Result<PgArguments, AppError> {
        let mut args = PgArguments::default();
        for value in &self.params {
            let added = match value {
                FilterValue::Text(v) => args.add(v.clone()),
                FilterValue::Timestamp(v) => args.add(*v),
                FilterValue::TextList(v) => args.add(v.clone()),
            };
            added.map_err(|e| AppError::Internal(format!("Failed to encode filter value: {e}")))?;
        }
        Ok(args)
    }
}
