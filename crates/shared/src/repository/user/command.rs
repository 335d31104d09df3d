use crate::{
    abstract_trait::UserCommandRepositoryTrait,
    config::ConnectionPool,
    errors::RepositoryError,
    model::{NewUser, User as UserModel},
};
use async_trait::async_trait;
use tracing::{error, info};

pub struct UserCommandRepository {
    db: ConnectionPool,
}

impl UserCommandRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserCommandRepositoryTrait for UserCommandRepository {
    async fn create_user(&self, user: &NewUser) -> Result<UserModel, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let created = sqlx::query_as::<_, UserModel>(
            r#"
            INSERT INTO users (username, full_name, email, password, role)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING user_id, username, full_name, email, password, role, created_at
            "#,
        )
        .bind(&user.username)
        .bind(&user.full_name)
        .bind(&user.email)
        .bind(&user.password)
        .bind(user.role)
        .fetch_one(&mut *conn)
        .await
        .map_err(|e| {
            error!("❌ Failed to create user '{}': {:?}", user.username, e);
            RepositoryError::from(e)
        })?;

        info!("✅ Created user {} ({})", created.user_id, created.username);
        Ok(created)
    }

    async fn update_password(&self, user_id: i64, password: &str) -> Result<(), RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let result = sqlx::query("UPDATE users SET password = $2 WHERE user_id = $1")
            .bind(user_id)
            .bind(password)
            .execute(&mut *conn)
            .await
            .map_err(RepositoryError::from)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        info!("🔑 Updated password for user {user_id}");
        Ok(())
    }
}
