use crate::common::error::{AppError, ServiceResult};
use crate::models::pagination::Pagination;
use std::str::FromStr;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub const fn as_sql(self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

impl FromStr for SortDirection {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            _ => Err(AppError::FiltersInvalidValue("orderBy")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Filter {
    /// Sort on the creation timestamp.
    OrderBy(SortDirection),
    Limit(u64),
    /// Page size.
    Paginate(u64),
    /// `false` drops the requesting participant from list participants.
    Founder(bool),
}

impl Filter {
    pub const fn key(&self) -> &'static str {
        match self {
            Filter::OrderBy(_) => "orderBy",
            Filter::Limit(_) => "limit",
            Filter::Paginate(_) => "paginate",
            Filter::Founder(_) => "founder",
        }
    }
}

/// Ordered set of list filters. Order matters: everything after a
/// `paginate` entry is ignored when the query is built.
#[derive(Debug, Default, Clone)]
pub struct Filters {
    entries: Vec<Filter>,
    page: Option<u64>,
}

/// What actually gets rendered onto a query once [`Filters`] are folded.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FilterPlan {
    pub order: Option<SortDirection>,
    pub limit: Option<u64>,
    pub pagination: Option<Pagination>,
}

impl Filters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn order_by(mut self, direction: SortDirection) -> Self {
        self.entries.push(Filter::OrderBy(direction));
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.entries.push(Filter::Limit(limit));
        self
    }

    pub fn paginate(mut self, per_page: u64) -> Self {
        self.entries.push(Filter::Paginate(per_page));
        self
    }

    /// Page picked by `paginate`, 1-based. Position-independent.
    pub fn page(mut self, page: u64) -> Self {
        self.page = Some(page);
        self
    }

    pub fn founder(mut self, founder: bool) -> Self {
        self.entries.push(Filter::Founder(founder));
        self
    }

    /// Parses `(key, value)` pairs as they would arrive from a query string.
    /// Unknown keys are ignored.
    pub fn from_pairs<I, K, V>(pairs: I) -> ServiceResult<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut filters = Filters::new();
        for (key, value) in pairs {
            let key = key.as_ref();
            let value = value.as_ref().trim();
            filters = match key {
                "orderBy" => filters.order_by(value.parse()?),
                "limit" => filters.limit(parse_count(value, "limit")?),
                "paginate" => filters.paginate(parse_count(value, "paginate")?),
                "page" => filters.page(parse_count(value, "page")?),
                "founder" => filters.founder(parse_flag(value)?),
                _ => {
                    debug!(key, "Ignoring unrecognized filter");
                    filters
                }
            };
        }
        Ok(filters)
    }

    pub fn entries(&self) -> &[Filter] {
        &self.entries
    }

    /// The last `founder` entry, wherever it sits.
    pub fn founder_flag(&self) -> Option<bool> {
        self.entries.iter().rev().find_map(|filter| match filter {
            Filter::Founder(founder) => Some(*founder),
            _ => None,
        })
    }

    pub fn includes_founder(&self) -> bool {
        self.founder_flag().unwrap_or(true)
    }

    pub fn plan(&self) -> FilterPlan {
        let mut plan = FilterPlan::default();
        for (i, filter) in self.entries.iter().enumerate() {
            match *filter {
                Filter::OrderBy(direction) => plan.order = Some(direction),
                Filter::Limit(limit) => plan.limit = Some(limit),
                Filter::Founder(_) => {}
                Filter::Paginate(per_page) => {
                    plan.limit = None;
                    plan.pagination = Some(Pagination::new(per_page, self.page.unwrap_or(1)));

                    let skipped: Vec<&'static str> = self.entries[i + 1..]
                        .iter()
                        .filter(|filter| !matches!(filter, Filter::Founder(_)))
                        .map(Filter::key)
                        .collect();
                    if !skipped.is_empty() {
                        warn!(?skipped, "Filters placed after paginate are not applied");
                    }
                    break;
                }
            }
        }
        plan
    }
}

/// Upper bound for `paginate` and `page`, keeping the page offset inside `u64`.
const MAX_PAGE_COUNT: u64 = u32::MAX as u64;

fn parse_count(value: &str, key: &'static str) -> ServiceResult<u64> {
    match u64::from_str(value) {
        Ok(0) if key != "limit" => Err(AppError::FiltersInvalidValue(key)),
        Ok(count) if key != "limit" && count > MAX_PAGE_COUNT => {
            Err(AppError::FiltersInvalidValue(key))
        }
        Ok(count) => Ok(count),
        Err(_) => Err(AppError::FiltersInvalidValue(key)),
    }
}

fn parse_flag(value: &str) -> ServiceResult<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" => Ok(true),
        "0" | "false" => Ok(false),
        _ => Err(AppError::FiltersInvalidValue("founder")),
    }
}
