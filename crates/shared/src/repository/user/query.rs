use crate::{
    abstract_trait::UserQueryRepositoryTrait, config::ConnectionPool,
    domain::requests::PageRequest, errors::RepositoryError, model::User as UserModel,
    repository::product::like_pattern,
};
use async_trait::async_trait;
use tracing::{error, info};

const USER_COLUMNS: &str = "user_id, username, full_name, email, password, role, created_at";

#[derive(Clone)]
pub struct UserQueryRepository {
    db: ConnectionPool,
}

impl UserQueryRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }

    async fn find_one(&self, column: &str, value: &str) -> Result<Option<UserModel>, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(|e| {
            error!("❌ Failed to acquire DB connection: {:?}", e);
            RepositoryError::from(e)
        })?;

        sqlx::query_as::<_, UserModel>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE {column} = $1"
        ))
        .bind(value)
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| {
            error!("❌ Failed to fetch user by {column}: {:?}", e);
            RepositoryError::from(e)
        })
    }
}

#[async_trait]
impl UserQueryRepositoryTrait for UserQueryRepository {
    async fn find_by_id(&self, user_id: i64) -> Result<Option<UserModel>, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        sqlx::query_as::<_, UserModel>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE user_id = $1"
        ))
        .bind(user_id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(RepositoryError::from)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<UserModel>, RepositoryError> {
        self.find_one("username", username).await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserModel>, RepositoryError> {
        self.find_one("email", email).await
    }

    async fn find_all(
        &self,
        search: Option<&str>,
        page: &PageRequest,
    ) -> Result<(Vec<UserModel>, i64), RepositoryError> {
        info!("🔍 Listing users with search: {:?}", search);

        let pattern = search
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| like_pattern(&s.to_lowercase()));

        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let filter = "WHERE ($1::TEXT IS NULL OR LOWER(username) LIKE $1 \
                      OR LOWER(email) LIKE $1 OR LOWER(full_name) LIKE $1)";

        let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM users {filter}"))
            .bind(pattern.as_deref())
            .fetch_one(&mut *conn)
            .await
            .map_err(RepositoryError::from)?;

        let users = sqlx::query_as::<_, UserModel>(&format!(
            "SELECT {USER_COLUMNS} FROM users {filter} ORDER BY user_id LIMIT $2 OFFSET $3"
        ))
        .bind(pattern.as_deref())
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| {
            error!("❌ Failed to list users: {:?}", e);
            RepositoryError::from(e)
        })?;

        Ok((users, total))
    }
}
