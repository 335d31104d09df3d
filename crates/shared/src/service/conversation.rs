use crate::{
    abstract_trait::{
        ConversationServiceTrait, DynConversationRepository, DynMessageRepository,
        DynUserQueryRepository,
    },
    domain::{
        Capability, Requester,
        requests::SendMessageRequest,
        responses::{ApiResponse, ConversationResponse, MessageResponse},
    },
    errors::{RepositoryError, ServiceError},
    model::Conversation,
    utils::{Method, ServiceTracer},
};
use async_trait::async_trait;
use opentelemetry::KeyValue;
use prometheus_client::registry::Registry;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};
use validator::Validate;

#[derive(Clone)]
pub struct ConversationService {
    conversation: DynConversationRepository,
    message: DynMessageRepository,
    user_query: DynUserQueryRepository,
    tracer: ServiceTracer,
}

impl ConversationService {
    pub async fn new(
        conversation: DynConversationRepository,
        message: DynMessageRepository,
        user_query: DynUserQueryRepository,
        registry: &Arc<Mutex<Registry>>,
    ) -> Self {
        let tracer =
            ServiceTracer::registered("conversation-service", "conversation_service", registry)
                .await;

        Self {
            conversation,
            message,
            user_query,
            tracer,
        }
    }

    async fn lookup_pair(&self, a: i64, b: i64) -> Result<Option<Conversation>, ServiceError> {
        if let Some(found) = self.conversation.find_by_participants(a, b).await? {
            return Ok(Some(found));
        }
        Ok(self.conversation.find_by_participants(b, a).await?)
    }

    async fn resolve_pair(&self, user_a: i64, user_b: i64) -> Result<Conversation, ServiceError> {
        if user_a == user_b {
            return Err(ServiceError::validation("Cannot send message to yourself"));
        }

        if let Some(existing) = self.lookup_pair(user_a, user_b).await? {
            return Ok(existing);
        }

        match self.conversation.create_conversation(user_a, user_b).await {
            Ok(created) => Ok(created),
            Err(RepositoryError::AlreadyExists(_)) => {
                warn!("⚠️ Lost conversation create race for ({user_a}, {user_b}), re-reading");
                self.lookup_pair(user_a, user_b).await?.ok_or_else(|| {
                    ServiceError::Internal("Conversation vanished after conflict".into())
                })
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn list(
        &self,
        requester: &Requester,
    ) -> Result<ApiResponse<Vec<ConversationResponse>>, ServiceError> {
        requester.require(Capability::Authenticated)?;

        let summaries = self
            .conversation
            .find_summaries_by_user(requester.user_id)
            .await?;

        let data = summaries
            .into_iter()
            .map(|s| ConversationResponse {
                conversation_id: s.conversation_id,
                other_user_id: s.other_user_id,
                other_username: s.other_username,
                created_at: s.created_at,
            })
            .collect();

        Ok(ApiResponse::success("Conversations retrieved successfully", data))
    }

    async fn history(
        &self,
        requester: &Requester,
        conversation_id: i64,
    ) -> Result<ApiResponse<Vec<MessageResponse>>, ServiceError> {
        requester.require(Capability::Authenticated)?;

        let conversation = self
            .conversation
            .find_by_id(conversation_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Conversation not found"))?;

        if !conversation.involves(requester.user_id) {
            return Err(ServiceError::Forbidden(
                "You are not a participant in this conversation".into(),
            ));
        }

        let messages = self.message.find_by_conversation(conversation_id).await?;

        Ok(ApiResponse::success(
            "Messages retrieved successfully",
            messages.into_iter().map(MessageResponse::from).collect(),
        ))
    }

    async fn send(
        &self,
        requester: &Requester,
        other_user_id: i64,
        req: &SendMessageRequest,
    ) -> Result<ApiResponse<MessageResponse>, ServiceError> {
        requester.require(Capability::Authenticated)?;

        let content = req.content.trim();
        if content.is_empty() {
            return Err(ServiceError::validation("Message content cannot be empty"));
        }
        req.validate()?;

        if other_user_id == requester.user_id {
            return Err(ServiceError::validation("Cannot send message to yourself"));
        }

        if self.user_query.find_by_id(other_user_id).await?.is_none() {
            return Err(ServiceError::not_found(format!(
                "User not found with id: {other_user_id}"
            )));
        }

        let conversation = self.resolve_pair(requester.user_id, other_user_id).await?;

        let message = self
            .message
            .create_message(conversation.conversation_id, requester.user_id, content)
            .await?;

        info!(
            "💬 User {} sent message {} in conversation {}",
            requester.user_id, message.message_id, conversation.conversation_id
        );

        Ok(ApiResponse::success(
            "Message sent successfully",
            MessageResponse::from(message),
        ))
    }
}

#[async_trait]
impl ConversationServiceTrait for ConversationService {
    async fn find_or_create(&self, user_a: i64, user_b: i64) -> Result<Conversation, ServiceError> {
        let ctx = self.tracer.start(
            "find_or_create_conversation",
            Method::Post,
            vec![
                KeyValue::new("user.a", user_a),
                KeyValue::new("user.b", user_b),
            ],
        );
        let result = self.resolve_pair(user_a, user_b).await;
        self.tracer.finish(ctx, result).await
    }

    async fn my_conversations(
        &self,
        requester: &Requester,
    ) -> Result<ApiResponse<Vec<ConversationResponse>>, ServiceError> {
        let ctx = self.tracer.start(
            "my_conversations",
            Method::Get,
            vec![KeyValue::new("user.id", requester.user_id)],
        );
        let result = self.list(requester).await;
        self.tracer.finish(ctx, result).await
    }

    async fn messages(
        &self,
        requester: &Requester,
        conversation_id: i64,
    ) -> Result<ApiResponse<Vec<MessageResponse>>, ServiceError> {
        let ctx = self.tracer.start(
            "conversation_messages",
            Method::Get,
            vec![
                KeyValue::new("user.id", requester.user_id),
                KeyValue::new("conversation.id", conversation_id),
            ],
        );
        let result = self.history(requester, conversation_id).await;
        self.tracer.finish(ctx, result).await
    }

    async fn send_message(
        &self,
        requester: &Requester,
        other_user_id: i64,
        req: &SendMessageRequest,
    ) -> Result<ApiResponse<MessageResponse>, ServiceError> {
        let ctx = self.tracer.start(
            "send_message",
            Method::Post,
            vec![
                KeyValue::new("user.id", requester.user_id),
                KeyValue::new("recipient.id", other_user_id),
            ],
        );
        let result = self.send(requester, other_user_id, req).await;
        self.tracer.finish(ctx, result).await
    }
}
