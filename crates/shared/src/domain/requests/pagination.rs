use serde::{Deserialize, Serialize};
use utoipa::IntoParams;

pub const DEFAULT_PAGE_SIZE: i64 = 12;
pub const MAX_PAGE_SIZE: i64 = 100;
/// Highest page whose offset still fits in an `i64` at the largest page size.
pub const MAX_PAGE: i64 = i64::MAX / MAX_PAGE_SIZE;

/// Zero-based page selection shared by every listing endpoint.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageRequest {
    #[serde(default)]
    #[param(example = 0)]
    pub page: i64,

    #[serde(default = "default_size")]
    #[param(example = 12)]
    pub size: i64,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 0,
            size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageRequest {
    pub fn new(page: i64, size: i64) -> Self {
        Self { page, size }.normalized()
    }

    pub fn normalized(self) -> Self {
        Self {
            page: self.page.clamp(0, MAX_PAGE),
            size: self.size.clamp(1, MAX_PAGE_SIZE),
        }
    }

    pub fn limit(&self) -> i64 {
        self.size
    }

    pub fn offset(&self) -> i64 {
        self.page.saturating_mul(self.size)
    }
}

fn default_size() -> i64 {
    DEFAULT_PAGE_SIZE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalization_clamps_out_of_range_values() {
        let page = PageRequest::new(-3, 0);
        assert_eq!((page.page, page.size), (0, 1));

        let page = PageRequest::new(2, 1_000);
        assert_eq!((page.page, page.size), (2, MAX_PAGE_SIZE));
        assert_eq!(page.offset(), 200);
    }

    #[test]
    fn huge_page_numbers_do_not_overflow_the_offset() {
        let page = PageRequest::new(i64::MAX, MAX_PAGE_SIZE);
        assert_eq!(page.page, MAX_PAGE);
        assert_eq!(page.offset(), MAX_PAGE * MAX_PAGE_SIZE);

        let raw = PageRequest {
            page: i64::MAX,
            size: 12,
        };
        assert_eq!(raw.offset(), i64::MAX);
    }
}
