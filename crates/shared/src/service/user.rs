use crate::{
    abstract_trait::{
        DynHashing, DynUserCommandRepository, DynUserQueryRepository, UserServiceTrait,
    },
    domain::{
        Capability, Requester,
        requests::{ChangePasswordRequest, FindAllUsers},
        responses::{ApiResponse, ApiResponsePagination, Pagination, UserProfileResponse},
    },
    errors::ServiceError,
    utils::{Method, ServiceTracer},
};
use async_trait::async_trait;
use opentelemetry::KeyValue;
use prometheus_client::registry::Registry;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;
use validator::Validate;

#[derive(Clone)]
pub struct UserService {
    query: DynUserQueryRepository,
    command: DynUserCommandRepository,
    hash: DynHashing,
    tracer: ServiceTracer,
}

impl UserService {
    pub async fn new(
        query: DynUserQueryRepository,
        command: DynUserCommandRepository,
        hash: DynHashing,
        registry: &Arc<Mutex<Registry>>,
    ) -> Self {
        let tracer = ServiceTracer::registered("user-service", "user_service", registry).await;

        Self {
            query,
            command,
            hash,
            tracer,
        }
    }

    async fn profile(
        &self,
        requester: &Requester,
    ) -> Result<ApiResponse<UserProfileResponse>, ServiceError> {
        requester.require(Capability::Authenticated)?;

        let user = self
            .query
            .find_by_id(requester.user_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("User not found"))?;

        Ok(ApiResponse::success(
            "Profile retrieved successfully",
            UserProfileResponse::from(user),
        ))
    }

    async fn update_password(
        &self,
        requester: &Requester,
        req: &ChangePasswordRequest,
    ) -> Result<ApiResponse<()>, ServiceError> {
        requester.require(Capability::Authenticated)?;
        req.validate()?;

        if req.current_password == req.new_password {
            return Err(ServiceError::validation(
                "New password must be different from the current password",
            ));
        }

        let user = self
            .query
            .find_by_id(requester.user_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("User not found"))?;

        self.hash
            .compare_password(&user.password, &req.current_password)
            .await?;

        let hashed = self.hash.hash_password(&req.new_password).await?;
        self.command.update_password(user.user_id, &hashed).await?;

        info!("🔑 User {} changed their password", user.user_id);
        Ok(ApiResponse::success("Password changed successfully", ()))
    }

    async fn list(
        &self,
        requester: &Requester,
        req: &FindAllUsers,
    ) -> Result<ApiResponsePagination<Vec<UserProfileResponse>>, ServiceError> {
        requester.require(Capability::Admin)?;

        let page = req.page_request();
        let (users, total) = self.query.find_all(req.search.as_deref(), &page).await?;

        Ok(ApiResponsePagination::success(
            "Users retrieved successfully",
            users.into_iter().map(UserProfileResponse::from).collect(),
            Pagination::new(&page, total),
        ))
    }
}

#[async_trait]
impl UserServiceTrait for UserService {
    async fn me(
        &self,
        requester: &Requester,
    ) -> Result<ApiResponse<UserProfileResponse>, ServiceError> {
        let ctx = self.tracer.start(
            "get_profile",
            Method::Get,
            vec![KeyValue::new("user.id", requester.user_id)],
        );
        let result = self.profile(requester).await;
        self.tracer.finish(ctx, result).await
    }

    async fn change_password(
        &self,
        requester: &Requester,
        req: &ChangePasswordRequest,
    ) -> Result<ApiResponse<()>, ServiceError> {
        let ctx = self.tracer.start(
            "change_password",
            Method::Put,
            vec![KeyValue::new("user.id", requester.user_id)],
        );
        let result = self.update_password(requester, req).await;
        self.tracer.finish(ctx, result).await
    }

    async fn find_all(
        &self,
        requester: &Requester,
        req: &FindAllUsers,
    ) -> Result<ApiResponsePagination<Vec<UserProfileResponse>>, ServiceError> {
        let ctx = self.tracer.start(
            "find_all_users",
            Method::Get,
            vec![
                KeyValue::new("component", "user"),
                KeyValue::new("page", req.page),
            ],
        );
        let result = self.list(requester, req).await;
        self.tracer.finish(ctx, result).await
    }
}
