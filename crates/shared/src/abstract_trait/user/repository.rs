use crate::{
    domain::requests::PageRequest,
    errors::RepositoryError,
    model::{NewUser, ResetToken, User},
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;

pub type DynUserQueryRepository = Arc<dyn UserQueryRepositoryTrait + Send + Sync>;
pub type DynUserCommandRepository = Arc<dyn UserCommandRepositoryTrait + Send + Sync>;
pub type DynResetTokenRepository = Arc<dyn ResetTokenRepositoryTrait + Send + Sync>;

#[async_trait]
pub trait UserQueryRepositoryTrait {
    async fn find_by_id(&self, user_id: i64) -> Result<Option<User>, RepositoryError>;
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepositoryError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError>;
    async fn find_all(
        &self,
        search: Option<&str>,
        page: &PageRequest,
    ) -> Result<(Vec<User>, i64), RepositoryError>;
}

#[async_trait]
pub trait UserCommandRepositoryTrait {
    async fn create_user(&self, user: &NewUser) -> Result<User, RepositoryError>;
    async fn update_password(&self, user_id: i64, password: &str) -> Result<(), RepositoryError>;
}

#[async_trait]
pub trait ResetTokenRepositoryTrait {
    /// One live token per user; issuing a new one replaces the old.
    async fn upsert_token(
        &self,
        user_id: i64,
        token: &str,
        expired_date: DateTime<Utc>,
    ) -> Result<ResetToken, RepositoryError>;
    async fn find_by_token(&self, token: &str) -> Result<Option<ResetToken>, RepositoryError>;
    async fn delete_by_user(&self, user_id: i64) -> Result<(), RepositoryError>;
}
