use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Shop {
    pub shop_id: i64,
    pub owner_id: i64,
    pub name: String,
    pub average_rating: Option<Decimal>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Category {
    pub category_id: i64,
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Province {
    pub province_id: i64,
    pub province_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct District {
    pub district_id: i64,
    pub district_name: String,
    pub province_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Ward {
    pub ward_id: i64,
    pub ward_name: String,
    pub district_id: i64,
}
