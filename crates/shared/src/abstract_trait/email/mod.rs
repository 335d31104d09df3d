use crate::{
    domain::{
        Requester,
        requests::{OrderConfirmationEmailRequest, RecipientEmailRequest, SimpleEmailRequest},
        responses::ApiResponse,
    },
    errors::ServiceError,
    utils::EmailTemplateData,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub type DynEmailService = Arc<dyn EmailServiceTrait>;
pub type DynEmailToolService = Arc<dyn EmailToolServiceTrait + Send + Sync>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmailRequest {
    pub to: String,
    pub subject: String,
    pub data: EmailTemplateData,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EmailServiceTrait: Send + Sync {
    async fn send(&self, req: &EmailRequest) -> Result<(), ServiceError>;
    async fn test_connection(&self) -> Result<bool, ServiceError>;
}

/// Synchronous delivery of each email kind, for operators checking SMTP setup.
#[async_trait]
pub trait EmailToolServiceTrait {
    async fn send_simple(
        &self,
        requester: &Requester,
        req: &SimpleEmailRequest,
    ) -> Result<ApiResponse<()>, ServiceError>;
    async fn send_welcome(
        &self,
        requester: &Requester,
        req: &RecipientEmailRequest,
    ) -> Result<ApiResponse<()>, ServiceError>;
    async fn send_password_reset(
        &self,
        requester: &Requester,
        req: &RecipientEmailRequest,
    ) -> Result<ApiResponse<()>, ServiceError>;
    async fn send_order_confirmation(
        &self,
        requester: &Requester,
        req: &OrderConfirmationEmailRequest,
    ) -> Result<ApiResponse<()>, ServiceError>;
    async fn test_connection(&self, requester: &Requester)
    -> Result<ApiResponse<bool>, ServiceError>;
}
