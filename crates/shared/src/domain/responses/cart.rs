use crate::model::CartLine;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CartItemResponse {
    pub product_id: i64,
    pub product_name: String,
    #[schema(value_type = String)]
    pub price: Decimal,
    pub quantity: i32,
    #[schema(value_type = String)]
    pub subtotal: Decimal,
}

impl From<&CartLine> for CartItemResponse {
    fn from(line: &CartLine) -> Self {
        CartItemResponse {
            product_id: line.product_id,
            product_name: line.product_name.clone(),
            price: line.price,
            quantity: line.quantity,
            subtotal: line.subtotal(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CartResponse {
    pub cart_id: i64,
    pub items: Vec<CartItemResponse>,
    pub total_items: i64,
    #[schema(value_type = String)]
    pub total_price: Decimal,
}

impl CartResponse {
    pub fn new(cart_id: i64, lines: &[CartLine]) -> Self {
        let items: Vec<CartItemResponse> = lines.iter().map(CartItemResponse::from).collect();
        let total_items = lines.iter().map(|l| i64::from(l.quantity)).sum();
        let total_price = items.iter().map(|i| i.subtotal).sum();

        Self {
            cart_id,
            items,
            total_items,
            total_price,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CartCountResponse {
    pub count: i64,
}
