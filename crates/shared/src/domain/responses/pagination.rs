use crate::domain::requests::PageRequest;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: i64,
    pub page_size: i64,
    pub total_items: i64,
    pub total_pages: i64,
}

impl Pagination {
    pub fn new(page: &PageRequest, total_items: i64) -> Self {
        let total_pages = if total_items == 0 {
            0
        } else {
            (total_items + page.size - 1) / page.size
        };

        Self {
            page: page.page,
            page_size: page.size,
            total_items,
            total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_pages_rounds_up() {
        let page = PageRequest::new(0, 12);
        assert_eq!(Pagination::new(&page, 25).total_pages, 3);
        assert_eq!(Pagination::new(&page, 24).total_pages, 2);
        assert_eq!(Pagination::new(&page, 0).total_pages, 0);
    }
}
