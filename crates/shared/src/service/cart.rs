use crate::{
    abstract_trait::{CartServiceTrait, DynCartRepository, DynProductQueryRepository},
    domain::{
        Capability, Requester,
        requests::{AddCartItemRequest, UpdateCartItemRequest},
        responses::{ApiResponse, CartCountResponse, CartResponse},
    },
    errors::ServiceError,
    model::Cart,
    service::product::product_not_found,
    utils::{Method, ServiceTracer},
};
use async_trait::async_trait;
use opentelemetry::KeyValue;
use prometheus_client::registry::Registry;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;

pub const MAX_QUANTITY_PER_ITEM: i32 = 999;

#[derive(Clone)]
pub struct CartService {
    cart: DynCartRepository,
    product_query: DynProductQueryRepository,
    tracer: ServiceTracer,
}

impl CartService {
    pub async fn new(
        cart: DynCartRepository,
        product_query: DynProductQueryRepository,
        registry: &Arc<Mutex<Registry>>,
    ) -> Self {
        let tracer = ServiceTracer::registered("cart-service", "cart_service", registry).await;

        Self {
            cart,
            product_query,
            tracer,
        }
    }

    fn check_quantity(quantity: i32) -> Result<(), ServiceError> {
        if quantity <= 0 {
            return Err(ServiceError::validation("Quantity must be at least 1"));
        }
        if quantity > MAX_QUANTITY_PER_ITEM {
            return Err(ServiceError::validation(format!(
                "Quantity cannot exceed {MAX_QUANTITY_PER_ITEM}"
            )));
        }
        Ok(())
    }

    fn check_stock(available: i32, requested: i32) -> Result<(), ServiceError> {
        if requested > available {
            return Err(ServiceError::InsufficientStock(format!(
                "Insufficient stock. Available: {available}, Requested: {requested}"
            )));
        }
        Ok(())
    }

    async fn snapshot(&self, cart: &Cart) -> Result<CartResponse, ServiceError> {
        let lines = self.cart.find_lines(cart.cart_id).await?;
        Ok(CartResponse::new(cart.cart_id, &lines))
    }

    async fn existing_cart(&self, requester: &Requester) -> Result<Cart, ServiceError> {
        self.cart
            .find_by_user(requester.user_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Cart not found"))
    }

    async fn load(&self, requester: &Requester) -> Result<ApiResponse<CartResponse>, ServiceError> {
        requester.require(Capability::Authenticated)?;

        let cart = self.cart.get_or_create(requester.user_id).await?;
        let response = self.snapshot(&cart).await?;

        Ok(ApiResponse::success("Cart retrieved successfully", response))
    }

    async fn add(
        &self,
        requester: &Requester,
        req: &AddCartItemRequest,
    ) -> Result<ApiResponse<CartResponse>, ServiceError> {
        requester.require(Capability::Authenticated)?;
        Self::check_quantity(req.quantity)?;

        let product = self
            .product_query
            .find_by_id(req.product_id)
            .await?
            .ok_or_else(|| product_not_found(req.product_id))?;

        let cart = self.cart.get_or_create(requester.user_id).await?;

        let existing = self
            .cart
            .find_item(cart.cart_id, product.product_id)
            .await?
            .map(|item| item.quantity)
            .unwrap_or(0);

        let quantity = existing + req.quantity;
        if quantity > MAX_QUANTITY_PER_ITEM {
            return Err(ServiceError::validation(format!(
                "Total quantity cannot exceed {MAX_QUANTITY_PER_ITEM}"
            )));
        }
        Self::check_stock(product.stock_quantity, quantity)?;

        self.cart
            .upsert_item(cart.cart_id, product.product_id, quantity)
            .await?;

        info!(
            "🛒 User {} now has {quantity} x product {} in cart",
            requester.user_id, product.product_id
        );

        let response = self.snapshot(&cart).await?;
        Ok(ApiResponse::success("Item added to cart", response))
    }

    async fn update(
        &self,
        requester: &Requester,
        product_id: i64,
        req: &UpdateCartItemRequest,
    ) -> Result<ApiResponse<CartResponse>, ServiceError> {
        requester.require(Capability::Authenticated)?;
        Self::check_quantity(req.quantity)?;

        let cart = self.existing_cart(requester).await?;

        if self.cart.find_item(cart.cart_id, product_id).await?.is_none() {
            return Err(ServiceError::not_found("Cart item not found"));
        }

        let product = self
            .product_query
            .find_by_id(product_id)
            .await?
            .ok_or_else(|| product_not_found(product_id))?;

        Self::check_stock(product.stock_quantity, req.quantity)?;

        self.cart
            .upsert_item(cart.cart_id, product_id, req.quantity)
            .await?;

        let response = self.snapshot(&cart).await?;
        Ok(ApiResponse::success("Cart item updated", response))
    }

    async fn remove(
        &self,
        requester: &Requester,
        product_id: i64,
    ) -> Result<ApiResponse<CartResponse>, ServiceError> {
        requester.require(Capability::Authenticated)?;

        let cart = self.existing_cart(requester).await?;

        if !self.cart.delete_item(cart.cart_id, product_id).await? {
            return Err(ServiceError::not_found("Cart item not found"));
        }

        let response = self.snapshot(&cart).await?;
        Ok(ApiResponse::success("Item removed from cart", response))
    }

    async fn clear(&self, requester: &Requester) -> Result<ApiResponse<()>, ServiceError> {
        requester.require(Capability::Authenticated)?;

        let cart = self.existing_cart(requester).await?;
        let removed = self.cart.clear(cart.cart_id).await?;

        info!("🧹 User {} cleared {removed} cart line(s)", requester.user_id);
        Ok(ApiResponse::success("Cart cleared", ()))
    }

    async fn count(
        &self,
        requester: &Requester,
    ) -> Result<ApiResponse<CartCountResponse>, ServiceError> {
        requester.require(Capability::Authenticated)?;

        let count = match self.cart.find_by_user(requester.user_id).await? {
            Some(cart) => self.cart.count_items(cart.cart_id).await?,
            None => 0,
        };

        Ok(ApiResponse::success(
            "Cart item count retrieved",
            CartCountResponse { count },
        ))
    }
}

#[async_trait]
impl CartServiceTrait for CartService {
    async fn get_cart(
        &self,
        requester: &Requester,
    ) -> Result<ApiResponse<CartResponse>, ServiceError> {
        let ctx = self.tracer.start(
            "get_cart",
            Method::Get,
            vec![KeyValue::new("user.id", requester.user_id)],
        );
        let result = self.load(requester).await;
        self.tracer.finish(ctx, result).await
    }

    async fn add_item(
        &self,
        requester: &Requester,
        req: &AddCartItemRequest,
    ) -> Result<ApiResponse<CartResponse>, ServiceError> {
        let ctx = self.tracer.start(
            "add_cart_item",
            Method::Post,
            vec![
                KeyValue::new("user.id", requester.user_id),
                KeyValue::new("product.id", req.product_id),
                KeyValue::new("quantity", i64::from(req.quantity)),
            ],
        );
        let result = self.add(requester, req).await;
        self.tracer.finish(ctx, result).await
    }

    async fn update_item(
        &self,
        requester: &Requester,
        product_id: i64,
        req: &UpdateCartItemRequest,
    ) -> Result<ApiResponse<CartResponse>, ServiceError> {
        let ctx = self.tracer.start(
            "update_cart_item",
            Method::Put,
            vec![
                KeyValue::new("user.id", requester.user_id),
                KeyValue::new("product.id", product_id),
            ],
        );
        let result = self.update(requester, product_id, req).await;
        self.tracer.finish(ctx, result).await
    }

    async fn remove_item(
        &self,
        requester: &Requester,
        product_id: i64,
    ) -> Result<ApiResponse<CartResponse>, ServiceError> {
        let ctx = self.tracer.start(
            "remove_cart_item",
            Method::Delete,
            vec![
                KeyValue::new("user.id", requester.user_id),
                KeyValue::new("product.id", product_id),
            ],
        );
        let result = self.remove(requester, product_id).await;
        self.tracer.finish(ctx, result).await
    }

    async fn clear_cart(&self, requester: &Requester) -> Result<ApiResponse<()>, ServiceError> {
        let ctx = self.tracer.start(
            "clear_cart",
            Method::Delete,
            vec![KeyValue::new("user.id", requester.user_id)],
        );
        let result = self.clear(requester).await;
        self.tracer.finish(ctx, result).await
    }

    async fn count_items(
        &self,
        requester: &Requester,
    ) -> Result<ApiResponse<CartCountResponse>, ServiceError> {
        let ctx = self.tracer.start(
            "count_cart_items",
            Method::Get,
            vec![KeyValue::new("user.id", requester.user_id)],
        );
        let result = self.count(requester).await;
        self.tracer.finish(ctx, result).await
    }
}
