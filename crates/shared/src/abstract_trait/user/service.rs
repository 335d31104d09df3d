use crate::{
    domain::{
        Requester,
        requests::{ChangePasswordRequest, FindAllUsers},
        responses::{ApiResponse, ApiResponsePagination, UserProfileResponse},
    },
    errors::ServiceError,
};
use async_trait::async_trait;
use std::sync::Arc;

pub type DynUserService = Arc<dyn UserServiceTrait + Send + Sync>;

#[async_trait]
pub trait UserServiceTrait {
    async fn me(&self, requester: &Requester)
    -> Result<ApiResponse<UserProfileResponse>, ServiceError>;
    async fn change_password(
        &self,
        requester: &Requester,
        req: &ChangePasswordRequest,
    ) -> Result<ApiResponse<()>, ServiceError>;
    async fn find_all(
        &self,
        requester: &Requester,
        req: &FindAllUsers,
    ) -> Result<ApiResponsePagination<Vec<UserProfileResponse>>, ServiceError>;
}
