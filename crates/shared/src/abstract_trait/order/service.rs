use crate::{
    domain::{
        Requester,
        responses::{ApiResponse, CheckoutResponse, OrderResponse},
    },
    errors::ServiceError,
};
use async_trait::async_trait;
use std::sync::Arc;

pub type DynOrderQueryService = Arc<dyn OrderQueryServiceTrait + Send + Sync>;
pub type DynOrderCommandService = Arc<dyn OrderCommandServiceTrait + Send + Sync>;

#[async_trait]
pub trait OrderQueryServiceTrait {
    async fn find_my_orders(
        &self,
        requester: &Requester,
    ) -> Result<ApiResponse<Vec<OrderResponse>>, ServiceError>;
    async fn find_by_id(
        &self,
        requester: &Requester,
        order_id: i64,
    ) -> Result<ApiResponse<OrderResponse>, ServiceError>;
}

#[async_trait]
pub trait OrderCommandServiceTrait {
    async fn checkout(
        &self,
        requester: &Requester,
    ) -> Result<ApiResponse<CheckoutResponse>, ServiceError>;
    async fn cancel_order(
        &self,
        requester: &Requester,
        order_id: i64,
    ) -> Result<ApiResponse<()>, ServiceError>;
}
