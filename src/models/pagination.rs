//! Pagination primitives for the incident list endpoint.

use serde::Deserialize;

use crate::errors::AppError;

/// Raw pagination query parameters, validated by [`Pagination::parse`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationQuery {
    pub page: Option<String>,
    pub per_page: Option<String>,
}

/// Validated page window. LIMIT/OFFSET are derived from these integers only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    page: i64,
    per_page: i64,
}

impl Pagination {
    /// Maximum items per page.
    const MAX_PER_PAGE: i64 = 100;

    /// Default items per page.
    const DEFAULT_PER_PAGE: i64 = 10;

    /// Validate raw query values. Malformed or non-positive integers are
    /// rejected, as is a page whose offset does not fit in an `i64`.
    pub fn parse(query: &PaginationQuery) -> Result<Self, AppError> {
        let page = parse_positive("page", query.page.as_deref())?.unwrap_or(1);
        let per_page = parse_positive("perPage", query.per_page.as_deref())?
            .unwrap_or(Self::DEFAULT_PER_PAGE)
            .min(Self::MAX_PER_PAGE);
        if (page - 1).checked_mul(per_page).is_none() {
            return Err(AppError::InvalidArgument(format!(
                "page {page} is out of range for perPage {per_page}"
            )));
        }
        Ok(Self { page, per_page })
    }

    pub fn new(page: i64, per_page: i64) -> Self {
        Self {
            page: page.max(1),
            per_page: per_page.clamp(1, Self::MAX_PER_PAGE),
        }
    }

    pub fn limit(&self) -> i64 {
        self.per_page
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.per_page)
    }

    pub fn current_page(&self) -> i64 {
        self.page
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(1, Self::DEFAULT_PER_PAGE)
    }
}

fn parse_positive(name: &str, raw: Option<&str>) -> Result<Option<i64>, AppError> {
    let Some(raw) = raw.map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(None);
    };
    let value: i64 = raw
        .parse()
        .map_err(|_| AppError::InvalidArgument(format!("{name} must be an integer, got '{raw}'")))?;
    if value < 1 {
        return Err(AppError::InvalidArgument(format!(
            "{name} must be at least 1, got {value}"
        )));
    }
    Ok(Some(value))
}
