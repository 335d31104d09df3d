use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Order {
    pub order_id: i64,
    pub user_id: i64,
    pub order_date: DateTime<Utc>,
    pub order_cost: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct OrderItem {
    pub order_id: i64,
    pub product_id: i64,
    pub product_name: String,
    pub quantity: i32,
    pub price_snapshot: Decimal,
}

#[derive(Debug, Clone)]
pub struct NewOrderLine {
    pub product_id: i64,
    pub quantity: i32,
    pub unit_price: Decimal,
}

/// Everything checkout needs to persist in one transaction.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub user_id: i64,
    pub cart_id: i64,
    pub total: Decimal,
    pub lines: Vec<NewOrderLine>,
}
