use crate::model::Product;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductResponse {
    pub product_id: i64,
    pub shop_id: i64,
    pub category_id: Option<i64>,
    pub name: String,
    pub description: Option<String>,
    #[schema(value_type = String, example = "450000.00")]
    pub price: Decimal,
    pub stock_quantity: i32,
    #[schema(value_type = String)]
    pub created_at: DateTime<Utc>,
    #[schema(value_type = String)]
    pub updated_at: DateTime<Utc>,
}

impl From<Product> for ProductResponse {
    fn from(value: Product) -> Self {
        ProductResponse {
            product_id: value.product_id,
            shop_id: value.shop_id,
            category_id: value.category_id,
            name: value.name,
            description: value.description,
            price: value.price,
            stock_quantity: value.stock_quantity,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}
