use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ResetToken {
    pub reset_token_id: i64,
    pub user_id: i64,
    pub token: String,
    pub expired_date: DateTime<Utc>,
}
