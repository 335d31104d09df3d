use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate)]
pub struct SimpleEmailRequest {
    #[validate(email(message = "Invalid email format"))]
    pub to: String,

    #[validate(length(min = 1, message = "Subject is required"))]
    pub subject: String,

    #[validate(length(min = 1, message = "Message is required"))]
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate)]
pub struct RecipientEmailRequest {
    #[validate(email(message = "Invalid email format"))]
    pub to: String,

    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct OrderConfirmationEmailRequest {
    #[validate(email(message = "Invalid email format"))]
    pub to: String,

    #[validate(range(min = 1))]
    pub order_id: i64,

    #[schema(value_type = String, example = "1234500.00")]
    pub total: Decimal,
}
