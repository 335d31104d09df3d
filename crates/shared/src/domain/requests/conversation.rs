use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate)]
pub struct SendMessageRequest {
    #[validate(length(max = 5000, message = "Message content is too long"))]
    #[schema(example = "Is this still available?")]
    pub content: String,
}
