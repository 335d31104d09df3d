use crate::{
    domain::{
        requests::{ForgotPasswordRequest, LoginRequest, RegisterRequest, ResetPasswordRequest},
        responses::{ApiResponse, AuthResponse},
    },
    errors::ServiceError,
};
use async_trait::async_trait;
use std::sync::Arc;

pub type DynAuthService = Arc<dyn AuthServiceTrait + Send + Sync>;

#[async_trait]
pub trait AuthServiceTrait {
    async fn register(&self, req: &RegisterRequest)
    -> Result<ApiResponse<AuthResponse>, ServiceError>;
    async fn login(&self, req: &LoginRequest) -> Result<ApiResponse<AuthResponse>, ServiceError>;
    async fn forgot_password(
        &self,
        req: &ForgotPasswordRequest,
    ) -> Result<ApiResponse<()>, ServiceError>;
    async fn reset_password(
        &self,
        req: &ResetPasswordRequest,
    ) -> Result<ApiResponse<()>, ServiceError>;
}
