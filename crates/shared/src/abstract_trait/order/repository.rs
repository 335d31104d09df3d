use crate::{
    errors::RepositoryError,
    model::{NewOrder, Order, OrderItem},
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;

pub type DynOrderQueryRepository = Arc<dyn OrderQueryRepositoryTrait + Send + Sync>;
pub type DynOrderCommandRepository = Arc<dyn OrderCommandRepositoryTrait + Send + Sync>;

#[async_trait]
pub trait OrderQueryRepositoryTrait {
    async fn find_by_id(&self, order_id: i64) -> Result<Option<Order>, RepositoryError>;
    /// Newest first.
    async fn find_by_user(&self, user_id: i64) -> Result<Vec<Order>, RepositoryError>;
    async fn find_items(&self, order_id: i64) -> Result<Vec<OrderItem>, RepositoryError>;
}

#[async_trait]
pub trait OrderCommandRepositoryTrait {
    /// Atomically inserts the order and its lines, decrements stock for every
    /// line and takes the ordered quantities out of the cart. Cart lines that
    /// were not part of the order are kept. A line whose product no longer has
    /// enough stock aborts everything with `RepositoryError::InsufficientStock`.
    async fn place_order(&self, order: &NewOrder) -> Result<Order, RepositoryError>;

    /// Atomically returns every line's quantity to stock and deletes the order.
    /// An order placed before `placed_after` is left untouched and reported as
    /// `RepositoryError::Conflict`.
    async fn cancel_order(
        &self,
        order_id: i64,
        placed_after: DateTime<Utc>,
    ) -> Result<Vec<OrderItem>, RepositoryError>;
}
