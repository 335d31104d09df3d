use crate::errors::ServiceError;
use async_trait::async_trait;
use std::sync::Arc;

pub type DynHashing = Arc<dyn HashingTrait + Send + Sync>;

/// Password hashing seam. `compare_password` returns
/// `ServiceError::InvalidCredentials` on a mismatch.
#[async_trait]
pub trait HashingTrait {
    async fn hash_password(&self, password: &str) -> Result<String, ServiceError>;
    async fn compare_password(
        &self,
        hashed_password: &str,
        password: &str,
    ) -> Result<(), ServiceError>;
}
