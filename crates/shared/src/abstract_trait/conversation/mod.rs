use crate::{
    domain::{
        Requester,
        requests::SendMessageRequest,
        responses::{ApiResponse, ConversationResponse, MessageResponse},
    },
    errors::{RepositoryError, ServiceError},
    model::{Conversation, ConversationSummary, Message},
};
use async_trait::async_trait;
use std::sync::Arc;

pub type DynConversationRepository = Arc<dyn ConversationRepositoryTrait + Send + Sync>;
pub type DynMessageRepository = Arc<dyn MessageRepositoryTrait + Send + Sync>;
pub type DynConversationService = Arc<dyn ConversationServiceTrait + Send + Sync>;

#[async_trait]
pub trait ConversationRepositoryTrait {
    async fn find_by_id(&self, conversation_id: i64)
    -> Result<Option<Conversation>, RepositoryError>;
    /// Exact match on `(user1_id, user2_id)`; callers try both orders.
    async fn find_by_participants(
        &self,
        user1_id: i64,
        user2_id: i64,
    ) -> Result<Option<Conversation>, RepositoryError>;
    /// Fails with `RepositoryError::AlreadyExists` if the unordered pair is taken.
    async fn create_conversation(
        &self,
        user1_id: i64,
        user2_id: i64,
    ) -> Result<Conversation, RepositoryError>;
    async fn find_summaries_by_user(
        &self,
        user_id: i64,
    ) -> Result<Vec<ConversationSummary>, RepositoryError>;
}

#[async_trait]
pub trait MessageRepositoryTrait {
    async fn create_message(
        &self,
        conversation_id: i64,
        sender_id: i64,
        content: &str,
    ) -> Result<Message, RepositoryError>;
    /// Oldest first.
    async fn find_by_conversation(
        &self,
        conversation_id: i64,
    ) -> Result<Vec<Message>, RepositoryError>;
}

#[async_trait]
pub trait ConversationServiceTrait {
    async fn find_or_create(
        &self,
        user_a: i64,
        user_b: i64,
    ) -> Result<Conversation, ServiceError>;
    async fn my_conversations(
        &self,
        requester: &Requester,
    ) -> Result<ApiResponse<Vec<ConversationResponse>>, ServiceError>;
    async fn messages(
        &self,
        requester: &Requester,
        conversation_id: i64,
    ) -> Result<ApiResponse<Vec<MessageResponse>>, ServiceError>;
    async fn send_message(
        &self,
        requester: &Requester,
        other_user_id: i64,
        req: &SendMessageRequest,
    ) -> Result<ApiResponse<MessageResponse>, ServiceError>;
}
