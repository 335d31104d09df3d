mod command;
mod query;

use std::sync::Arc;

pub use self::command::{OrderCommandService, OrderCommandServiceDeps};
pub use self::query::OrderQueryService;

use crate::{
    abstract_trait::{
        DynCartRepository, DynOrderCommandRepository, DynOrderCommandService,
        DynOrderQueryRepository, DynOrderQueryService,
    },
    service::Notifier,
};
use chrono::Duration;
use prometheus_client::registry::Registry;
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct OrderService {
    pub query: DynOrderQueryService,
    pub command: DynOrderCommandService,
}

pub struct OrderServiceDeps {
    pub query: DynOrderQueryRepository,
    pub command: DynOrderCommandRepository,
    pub cart: DynCartRepository,
    pub notifier: Notifier,
    pub cancel_window: Duration,
    pub registry: Arc<Mutex<Registry>>,
}

impl OrderService {
    pub async fn new(deps: OrderServiceDeps) -> Self {
        let OrderServiceDeps {
            query,
            command,
            cart,
            notifier,
            cancel_window,
            registry,
        } = deps;

        let query_service =
            Arc::new(OrderQueryService::new(query.clone(), &registry).await) as DynOrderQueryService;

        let command_service = Arc::new(
            OrderCommandService::new(OrderCommandServiceDeps {
                query,
                command,
                cart,
                notifier,
                cancel_window,
                registry,
            })
            .await,
        ) as DynOrderCommandService;

        Self {
            query: query_service,
            command: command_service,
        }
    }
}

pub(crate) fn order_not_found(order_id: i64) -> crate::errors::ServiceError {
    crate::errors::ServiceError::not_found(format!("Order not found with id: {order_id}"))
}
