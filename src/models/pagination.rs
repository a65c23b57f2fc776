use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub per_page: u64,
    /// 1-based.
    pub page: u64,
}

impl Pagination {
    pub fn new(per_page: u64, page: u64) -> Self {
        Self {
            per_page: per_page.max(1),
            page: page.max(1),
        }
    }

    /// Saturates instead of overflowing; a page that far out is simply empty.
    pub fn offset(&self) -> u64 {
        (self.page - 1).saturating_mul(self.per_page)
    }

    pub fn page_info(&self, total: u64) -> PageInfo {
        PageInfo {
            current_page: self.page,
            per_page: self.per_page,
            total,
            last_page: total.div_ceil(self.per_page).max(1),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageInfo {
    pub current_page: u64,
    pub per_page: u64,
    pub total: u64,
    pub last_page: u64,
}

/// Result of a list query. `page` is only set when the filters asked for pagination.
#[derive(Debug, Serialize)]
pub struct Listing<T> {
    pub items: Vec<T>,
    pub page: Option<PageInfo>,
}

impl<T> Listing<T> {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }
}
