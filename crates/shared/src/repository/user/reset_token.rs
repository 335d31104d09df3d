use crate::{
    abstract_trait::ResetTokenRepositoryTrait, config::ConnectionPool, errors::RepositoryError,
    model::ResetToken as ResetTokenModel,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::{error, info};

pub struct ResetTokenRepository {
    db: ConnectionPool,
}

impl ResetTokenRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ResetTokenRepositoryTrait for ResetTokenRepository {
    async fn upsert_token(
        &self,
        user_id: i64,
        token: &str,
        expired_date: DateTime<Utc>,
    ) -> Result<ResetTokenModel, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let saved = sqlx::query_as::<_, ResetTokenModel>(
            r#"
            INSERT INTO reset_tokens (user_id, token, expired_date)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id)
            DO UPDATE SET token = EXCLUDED.token, expired_date = EXCLUDED.expired_date
            RETURNING reset_token_id, user_id, token, expired_date
            "#,
        )
        .bind(user_id)
        .bind(token)
        .bind(expired_date)
        .fetch_one(&mut *conn)
        .await
        .map_err(|e| {
            error!("❌ Failed to store reset token for user {user_id}: {:?}", e);
            RepositoryError::from(e)
        })?;

        info!("✅ Stored reset token for user {user_id}");
        Ok(saved)
    }

    async fn find_by_token(&self, token: &str) -> Result<Option<ResetTokenModel>, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(|e| {
            error!("❌ Failed to acquire DB connection: {:?}", e);
            RepositoryError::from(e)
        })?;

        sqlx::query_as::<_, ResetTokenModel>(
            r#"
            SELECT reset_token_id, user_id, token, expired_date
            FROM reset_tokens
            WHERE token = $1
            "#,
        )
        .bind(token)
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| {
            error!("❌ Query failed for reset token lookup: {:?}", e);
            RepositoryError::from(e)
        })
    }

    async fn delete_by_user(&self, user_id: i64) -> Result<(), RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        sqlx::query("DELETE FROM reset_tokens WHERE user_id = $1")
            .bind(user_id)
            .execute(&mut *conn)
            .await
            .map_err(RepositoryError::from)?;

        Ok(())
    }
}
