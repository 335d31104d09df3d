use crate::{
    abstract_trait::{ConversationRepositoryTrait, MessageRepositoryTrait},
    config::ConnectionPool,
    errors::RepositoryError,
    model::{Conversation, ConversationSummary, Message},
};
use async_trait::async_trait;
use tracing::{error, info};

pub struct ConversationRepository {
    db: ConnectionPool,
}

impl ConversationRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ConversationRepositoryTrait for ConversationRepository {
    async fn find_by_id(
        &self,
        conversation_id: i64,
    ) -> Result<Option<Conversation>, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        sqlx::query_as::<_, Conversation>(
            r#"
            SELECT conversation_id, user1_id, user2_id, created_at
            FROM conversations
            WHERE conversation_id = $1
            "#,
        )
        .bind(conversation_id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(RepositoryError::from)
    }

    async fn find_by_participants(
        &self,
        user1_id: i64,
        user2_id: i64,
    ) -> Result<Option<Conversation>, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        sqlx::query_as::<_, Conversation>(
            r#"
            SELECT conversation_id, user1_id, user2_id, created_at
            FROM conversations
            WHERE user1_id = $1 AND user2_id = $2
            "#,
        )
        .bind(user1_id)
        .bind(user2_id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(RepositoryError::from)
    }

    async fn create_conversation(
        &self,
        user1_id: i64,
        user2_id: i64,
    ) -> Result<Conversation, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let created = sqlx::query_as::<_, Conversation>(
            r#"
            INSERT INTO conversations (user1_id, user2_id)
            VALUES ($1, $2)
            RETURNING conversation_id, user1_id, user2_id, created_at
            "#,
        )
        .bind(user1_id)
        .bind(user2_id)
        .fetch_one(&mut *conn)
        .await
        .map_err(|e| {
            error!(
                "❌ Failed to create conversation between {user1_id} and {user2_id}: {:?}",
                e
            );
            RepositoryError::from(e)
        })?;

        info!(
            "💬 Opened conversation {} between {user1_id} and {user2_id}",
            created.conversation_id
        );
        Ok(created)
    }

    async fn find_summaries_by_user(
        &self,
        user_id: i64,
    ) -> Result<Vec<ConversationSummary>, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        sqlx::query_as::<_, ConversationSummary>(
            r#"
            SELECT c.conversation_id,
                   u.user_id AS other_user_id,
                   u.username AS other_username,
                   c.created_at
            FROM conversations c
            JOIN users u
              ON u.user_id = CASE WHEN c.user1_id = $1 THEN c.user2_id ELSE c.user1_id END
            WHERE c.user1_id = $1 OR c.user2_id = $1
            ORDER BY c.created_at DESC, c.conversation_id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| {
            error!("❌ Failed to list conversations for user {user_id}: {:?}", e);
            RepositoryError::from(e)
        })
    }
}

pub struct MessageRepository {
    db: ConnectionPool,
}

impl MessageRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl MessageRepositoryTrait for MessageRepository {
    async fn create_message(
        &self,
        conversation_id: i64,
        sender_id: i64,
        content: &str,
    ) -> Result<Message, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        sqlx::query_as::<_, Message>(
            r#"
            INSERT INTO messages (conversation_id, sender_id, content)
            VALUES ($1, $2, $3)
            RETURNING message_id, conversation_id, sender_id, content, created_at
            "#,
        )
        .bind(conversation_id)
        .bind(sender_id)
        .bind(content)
        .fetch_one(&mut *conn)
        .await
        .map_err(|e| {
            error!(
                "❌ Failed to store message in conversation {conversation_id}: {:?}",
                e
            );
            RepositoryError::from(e)
        })
    }

    async fn find_by_conversation(
        &self,
        conversation_id: i64,
    ) -> Result<Vec<Message>, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        sqlx::query_as::<_, Message>(
            r#"
            SELECT message_id, conversation_id, sender_id, content, created_at
            FROM messages
            WHERE conversation_id = $1
            ORDER BY created_at ASC, message_id ASC
            "#,
        )
        .bind(conversation_id)
        .fetch_all(&mut *conn)
        .await
        .map_err(RepositoryError::from)
    }
}
