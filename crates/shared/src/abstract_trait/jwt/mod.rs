use crate::{domain::Requester, errors::ServiceError, model::User};
use std::sync::Arc;

pub type DynJwtService = Arc<dyn JwtServiceTrait + Send + Sync>;

pub trait JwtServiceTrait: Send + Sync + std::fmt::Debug {
    fn generate_token(&self, user: &User) -> Result<String, ServiceError>;
    /// Fails with `ServiceError::TokenExpired` once `exp` has passed.
    fn verify_token(&self, token: &str) -> Result<Requester, ServiceError>;
}
