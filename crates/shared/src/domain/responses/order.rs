use crate::model::{Order, OrderItem};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemResponse {
    pub product_id: i64,
    pub product_name: String,
    pub quantity: i32,
    #[schema(value_type = String)]
    pub price_snapshot: Decimal,
    #[schema(value_type = String)]
    pub subtotal: Decimal,
}

impl From<OrderItem> for OrderItemResponse {
    fn from(value: OrderItem) -> Self {
        OrderItemResponse {
            subtotal: value.price_snapshot * Decimal::from(value.quantity),
            product_id: value.product_id,
            product_name: value.product_name,
            quantity: value.quantity,
            price_snapshot: value.price_snapshot,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    pub order_id: i64,
    #[schema(value_type = String)]
    pub order_date: DateTime<Utc>,
    #[schema(value_type = String)]
    pub order_cost: Decimal,
    pub items: Vec<OrderItemResponse>,
}

impl OrderResponse {
    pub fn new(order: Order, items: Vec<OrderItem>) -> Self {
        Self {
            order_id: order.order_id,
            order_date: order.order_date,
            order_cost: order.order_cost,
            items: items.into_iter().map(OrderItemResponse::from).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutResponse {
    pub order_id: i64,
    #[schema(example = "SUCCESS")]
    pub status: String,
    #[schema(value_type = String)]
    pub total: Decimal,
}
