use crate::domain::requests::{PageRequest, pagination::DEFAULT_PAGE_SIZE};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ProductSort {
    PriceAsc,
    PriceDesc,
    NameAsc,
    NameDesc,
    #[default]
    Newest,
    Oldest,
}

impl ProductSort {
    /// Unknown or missing keys fall back to newest first.
    pub fn parse(value: Option<&str>) -> Self {
        value
            .and_then(|v| v.parse().ok())
            .unwrap_or_default()
    }

    pub fn order_by(&self) -> &'static str {
        match self {
            ProductSort::PriceAsc => "p.price ASC, p.product_id ASC",
            ProductSort::PriceDesc => "p.price DESC, p.product_id DESC",
            ProductSort::NameAsc => "LOWER(p.name) ASC, p.product_id ASC",
            ProductSort::NameDesc => "LOWER(p.name) DESC, p.product_id DESC",
            ProductSort::Newest => "p.created_at DESC, p.product_id DESC",
            ProductSort::Oldest => "p.created_at ASC, p.product_id ASC",
        }
    }
}

impl FromStr for ProductSort {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "price_asc" => Ok(ProductSort::PriceAsc),
            "price_desc" => Ok(ProductSort::PriceDesc),
            "name_asc" => Ok(ProductSort::NameAsc),
            "name_desc" => Ok(ProductSort::NameDesc),
            "newest" => Ok(ProductSort::Newest),
            "oldest" => Ok(ProductSort::Oldest),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query, rename_all = "camelCase")]
pub struct FindAllProducts {
    /// Case-insensitive match against name and description.
    #[serde(default)]
    pub search: Option<String>,

    #[serde(default)]
    pub category_id: Option<i64>,

    /// One of price_asc, price_desc, name_asc, name_desc, newest, oldest.
    #[serde(default)]
    pub sort: Option<String>,

    #[serde(default)]
    pub page: i64,

    #[serde(default = "default_size")]
    pub size: i64,
}

impl FindAllProducts {
    pub fn page_request(&self) -> PageRequest {
        PageRequest::new(self.page, self.size)
    }

    pub fn sort_key(&self) -> ProductSort {
        ProductSort::parse(self.sort.as_deref())
    }

    /// Trimmed, lowercased search text; `None` when blank.
    pub fn search_term(&self) -> Option<String> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase)
    }
}

fn default_size() -> i64 {
    DEFAULT_PAGE_SIZE
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    #[validate(length(min = 1, max = 150, message = "Product name must be between 1 and 150 characters"))]
    #[schema(example = "Mechanical keyboard")]
    pub name: String,

    #[schema(value_type = String, example = "450000.00")]
    pub price: Decimal,

    #[schema(example = "Hot-swappable, brown switches")]
    pub description: Option<String>,

    #[serde(default)]
    #[schema(example = 10)]
    pub stock_quantity: i32,

    #[schema(example = 1)]
    pub category_id: Option<i64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductRequest {
    #[validate(length(min = 1, max = 150, message = "Product name must be between 1 and 150 characters"))]
    pub name: Option<String>,

    #[schema(value_type = Option<String>)]
    pub price: Option<Decimal>,

    pub description: Option<String>,

    pub stock_quantity: Option<i32>,

    pub category_id: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStockRequest {
    #[validate(range(min = 0, message = "Stock quantity cannot be negative"))]
    pub stock_quantity: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_keys_parse_with_newest_fallback() {
        assert_eq!(ProductSort::parse(Some("price_asc")), ProductSort::PriceAsc);
        assert_eq!(ProductSort::parse(Some("NAME_DESC")), ProductSort::NameDesc);
        assert_eq!(ProductSort::parse(Some("oldest")), ProductSort::Oldest);
        assert_eq!(ProductSort::parse(Some("cheapest")), ProductSort::Newest);
        assert_eq!(ProductSort::parse(None), ProductSort::Newest);
    }

    #[test]
    fn blank_search_is_ignored() {
        let query = FindAllProducts {
            search: Some("   ".into()),
            ..Default::default()
        };
        assert_eq!(query.search_term(), None);

        let query = FindAllProducts {
            search: Some("  KeyBoard ".into()),
            ..Default::default()
        };
        assert_eq!(query.search_term().as_deref(), Some("keyboard"));
    }
}
