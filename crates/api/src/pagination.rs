// =============================================================================
// Fazenda API - Pagination
// =============================================================================

use serde::{Deserialize, Serialize};

use crate::error::ApiError;

pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const MAX_PAGE_SIZE: u32 = 100;

/// `?page=&page_size=` query parameters.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PageParams {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

fn default_page() -> u32 {
    1
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

impl Default for PageParams {
    fn default() -> Self {
        Self {
            page: default_page(),
            page_size: default_page_size(),
        }
    }
}

impl PageParams {
    pub fn validate(self) -> Result<Self, ApiError> {
        if self.page < 1 {
            return Err(ApiError::Validation("page deve ser maior ou igual a 1".into()));
        }
        if !(1..=MAX_PAGE_SIZE).contains(&self.page_size) {
            return Err(ApiError::Validation(format!(
                "page_size deve estar entre 1 e {MAX_PAGE_SIZE}"
            )));
        }
        Ok(self)
    }

    pub fn limit(&self) -> i64 {
        i64::from(self.page_size)
    }

    pub fn offset(&self) -> i64 {
        (i64::from(self.page) - 1) * i64::from(self.page_size)
    }

    /// Total implied by the fetched row count alone. Only a short first page
    /// can answer without a `COUNT(*)`.
    pub fn total_from_page(&self, fetched: usize) -> Option<i64> {
        if self.page == 1 && fetched < self.page_size as usize {
            Some(fetched as i64)
        } else {
            None
        }
    }
}

/// One page of rows plus the total matching count.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: i64,
}

/// Paginated response envelope.
#[derive(Debug, Serialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub page: u32,
    pub page_size: u32,
    pub total_pages: i64,
}

impl<T> Paginated<T> {
    pub fn new(items: Vec<T>, total: i64, params: PageParams) -> Self {
        Self {
            items,
            total,
            page: params.page,
            page_size: params.page_size,
            total_pages: total_pages(total, params.page_size),
        }
    }
}

pub fn total_pages(total: i64, page_size: u32) -> i64 {
    if total <= 0 || page_size == 0 {
        return 0;
    }
    let size = i64::from(page_size);
    (total + size - 1) / size
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(page: u32, page_size: u32) -> PageParams {
        PageParams { page, page_size }
    }

    #[test]
    fn defaults_match_first_page_of_ten() {
        let p: PageParams = serde_json::from_str("{}").unwrap();
        assert_eq!(p.page, 1);
        assert_eq!(p.page_size, 10);
        assert_eq!(p.offset(), 0);
    }

    #[test]
    fn offset_skips_previous_pages() {
        assert_eq!(params(3, 25).offset(), 50);
        assert_eq!(params(3, 25).limit(), 25);
    }

    #[test]
    fn validate_bounds() {
        assert!(params(0, 10).validate().is_err());
        assert!(params(1, 0).validate().is_err());
        assert!(params(1, 101).validate().is_err());
        assert!(params(1, 100).validate().is_ok());
    }

    #[test]
    fn total_pages_rounds_up() {
        assert_eq!(total_pages(0, 10), 0);
        assert_eq!(total_pages(1, 10), 1);
        assert_eq!(total_pages(10, 10), 1);
        assert_eq!(total_pages(11, 10), 2);
        assert_eq!(total_pages(2, 1), 2);
    }

    #[test]
    fn short_first_page_is_the_total() {
        assert_eq!(params(1, 10).total_from_page(3), Some(3));
        assert_eq!(params(1, 10).total_from_page(0), Some(0));
        assert_eq!(params(1, 10).total_from_page(10), None);
        assert_eq!(params(2, 10).total_from_page(3), None);
    }

    #[test]
    fn envelope_carries_request_params() {
        let page = Paginated::new(vec![1, 2], 2, params(2, 1));
        assert_eq!(page.page, 2);
        assert_eq!(page.page_size, 1);
        assert_eq!(page.total_pages, 2);
    }
}
