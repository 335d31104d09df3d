use crate::{
    domain::{
        Requester,
        requests::{AddCartItemRequest, UpdateCartItemRequest},
        responses::{ApiResponse, CartCountResponse, CartResponse},
    },
    errors::{RepositoryError, ServiceError},
    model::{Cart, CartItem, CartLine},
};
use async_trait::async_trait;
use std::sync::Arc;

pub type DynCartRepository = Arc<dyn CartRepositoryTrait + Send + Sync>;
pub type DynCartService = Arc<dyn CartServiceTrait + Send + Sync>;

#[async_trait]
pub trait CartRepositoryTrait {
    async fn find_by_user(&self, user_id: i64) -> Result<Option<Cart>, RepositoryError>;
    async fn get_or_create(&self, user_id: i64) -> Result<Cart, RepositoryError>;
    /// Lines joined with current product data, ordered by product id.
    async fn find_lines(&self, cart_id: i64) -> Result<Vec<CartLine>, RepositoryError>;
    async fn find_item(
        &self,
        cart_id: i64,
        product_id: i64,
    ) -> Result<Option<CartItem>, RepositoryError>;
    async fn upsert_item(
        &self,
        cart_id: i64,
        product_id: i64,
        quantity: i32,
    ) -> Result<CartItem, RepositoryError>;
    /// Returns `false` when no such line existed.
    async fn delete_item(&self, cart_id: i64, product_id: i64) -> Result<bool, RepositoryError>;
    async fn clear(&self, cart_id: i64) -> Result<u64, RepositoryError>;
    async fn count_items(&self, cart_id: i64) -> Result<i64, RepositoryError>;
}

#[async_trait]
pub trait CartServiceTrait {
    async fn get_cart(&self, requester: &Requester)
    -> Result<ApiResponse<CartResponse>, ServiceError>;
    async fn add_item(
        &self,
        requester: &Requester,
        req: &AddCartItemRequest,
    ) -> Result<ApiResponse<CartResponse>, ServiceError>;
    async fn update_item(
        &self,
        requester: &Requester,
        product_id: i64,
        req: &UpdateCartItemRequest,
    ) -> Result<ApiResponse<CartResponse>, ServiceError>;
    async fn remove_item(
        &self,
        requester: &Requester,
        product_id: i64,
    ) -> Result<ApiResponse<CartResponse>, ServiceError>;
    async fn clear_cart(&self, requester: &Requester) -> Result<ApiResponse<()>, ServiceError>;
    async fn count_items(
        &self,
        requester: &Requester,
    ) -> Result<ApiResponse<CartCountResponse>, ServiceError>;
}
