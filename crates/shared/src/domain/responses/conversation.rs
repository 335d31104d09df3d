use crate::model::Message;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConversationResponse {
    pub conversation_id: i64,
    pub other_user_id: i64,
    pub other_username: String,
    #[schema(value_type = String)]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MessageResponse {
    pub message_id: i64,
    pub conversation_id: i64,
    pub sender_id: i64,
    pub content: String,
    #[schema(value_type = String)]
    pub created_at: DateTime<Utc>,
}

impl From<Message> for MessageResponse {
    fn from(value: Message) -> Self {
        MessageResponse {
            message_id: value.message_id,
            conversation_id: value.conversation_id,
            sender_id: value.sender_id,
            content: value.content,
            created_at: value.created_at,
        }
    }
}
