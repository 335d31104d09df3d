use crate::{
    abstract_trait::{DynOrderQueryRepository, OrderQueryServiceTrait},
    domain::{
        Capability, Requester,
        responses::{ApiResponse, OrderResponse},
    },
    errors::ServiceError,
    model::Order,
    service::order::order_not_found,
    utils::{Method, ServiceTracer},
};
use async_trait::async_trait;
use opentelemetry::KeyValue;
use prometheus_client::registry::Registry;
use std::sync::Arc;
use tokio::sync::Mutex;

pub struct OrderQueryService {
    query: DynOrderQueryRepository,
    tracer: ServiceTracer,
}

impl OrderQueryService {
    pub async fn new(query: DynOrderQueryRepository, registry: &Arc<Mutex<Registry>>) -> Self {
        let tracer =
            ServiceTracer::registered("order-query-service", "order_query_service", registry)
                .await;
        Self { query, tracer }
    }

    async fn with_items(&self, order: Order) -> Result<OrderResponse, ServiceError> {
        let items = self.query.find_items(order.order_id).await?;
        Ok(OrderResponse::new(order, items))
    }

    async fn history(
        &self,
        requester: &Requester,
    ) -> Result<ApiResponse<Vec<OrderResponse>>, ServiceError> {
        requester.require(Capability::Authenticated)?;

        let orders = self.query.find_by_user(requester.user_id).await?;

        let mut responses = Vec::with_capacity(orders.len());
        for order in orders {
            responses.push(self.with_items(order).await?);
        }

        Ok(ApiResponse::success("Orders retrieved successfully", responses))
    }

    async fn detail(
        &self,
        requester: &Requester,
        order_id: i64,
    ) -> Result<ApiResponse<OrderResponse>, ServiceError> {
        requester.require(Capability::Authenticated)?;

        let order = self
            .query
            .find_by_id(order_id)
            .await?
            .ok_or_else(|| order_not_found(order_id))?;

        requester.require_owner(order.user_id, "You don't have permission to view this order")?;

        let response = self.with_items(order).await?;
        Ok(ApiResponse::success("Order retrieved successfully", response))
    }
}

#[async_trait]
impl OrderQueryServiceTrait for OrderQueryService {
    async fn find_my_orders(
        &self,
        requester: &Requester,
    ) -> Result<ApiResponse<Vec<OrderResponse>>, ServiceError> {
        let ctx = self.tracer.start(
            "find_my_orders",
            Method::Get,
            vec![KeyValue::new("user.id", requester.user_id)],
        );
        let result = self.history(requester).await;
        self.tracer.finish(ctx, result).await
    }

    async fn find_by_id(
        &self,
        requester: &Requester,
        order_id: i64,
    ) -> Result<ApiResponse<OrderResponse>, ServiceError> {
        let ctx = self.tracer.start(
            "find_order",
            Method::Get,
            vec![
                KeyValue::new("user.id", requester.user_id),
                KeyValue::new("order.id", order_id),
            ],
        );
        let result = self.detail(requester, order_id).await;
        self.tracer.finish(ctx, result).await
    }
}
