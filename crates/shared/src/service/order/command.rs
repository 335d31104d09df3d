use crate::{
    abstract_trait::{
        DynCartRepository, DynOrderCommandRepository, DynOrderQueryRepository,
        OrderCommandServiceTrait,
    },
    domain::{
        Capability, Requester,
        responses::{ApiResponse, CheckoutResponse},
    },
    errors::{RepositoryError, ServiceError},
    model::{CartLine, NewOrder, NewOrderLine},
    service::{Notification, Notifier, order::order_not_found},
    utils::{Method, ServiceTracer},
};
use async_trait::async_trait;
use chrono::{Duration, Utc};
use opentelemetry::KeyValue;
use prometheus_client::registry::Registry;
use rust_decimal::Decimal;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};

pub struct OrderCommandService {
    query: DynOrderQueryRepository,
    command: DynOrderCommandRepository,
    cart: DynCartRepository,
    notifier: Notifier,
    cancel_window: Duration,
    tracer: ServiceTracer,
}

pub struct OrderCommandServiceDeps {
    pub query: DynOrderQueryRepository,
    pub command: DynOrderCommandRepository,
    pub cart: DynCartRepository,
    pub notifier: Notifier,
    pub cancel_window: Duration,
    pub registry: Arc<Mutex<Registry>>,
}

impl OrderCommandService {
    pub async fn new(deps: OrderCommandServiceDeps) -> Self {
        let OrderCommandServiceDeps {
            query,
            command,
            cart,
            notifier,
            cancel_window,
            registry,
        } = deps;

        let tracer =
            ServiceTracer::registered("order-command-service", "order_command_service", &registry)
                .await;

        Self {
            query,
            command,
            cart,
            notifier,
            cancel_window,
            tracer,
        }
    }

    /// Checks every line against current stock and prices the order.
    fn price_lines(lines: &[CartLine]) -> Result<(Decimal, Vec<NewOrderLine>), ServiceError> {
        let mut total = Decimal::ZERO;
        let mut order_lines = Vec::with_capacity(lines.len());

        for line in lines {
            if line.quantity <= 0 {
                return Err(ServiceError::validation(format!(
                    "Invalid quantity for product '{}'",
                    line.product_name
                )));
            }
            if line.quantity > line.stock_quantity {
                return Err(ServiceError::InsufficientStock(format!(
                    "Insufficient stock for product '{}'. Available: {}, Requested: {}",
                    line.product_name, line.stock_quantity, line.quantity
                )));
            }

            total += line.subtotal();
            order_lines.push(NewOrderLine {
                product_id: line.product_id,
                quantity: line.quantity,
                unit_price: line.price,
            });
        }

        Ok((total, order_lines))
    }

    fn window_label(&self) -> String {
        let minutes = self.cancel_window.num_minutes();
        match minutes {
            60 => "1 hour".to_string(),
            m if m > 0 && m % 60 == 0 => format!("{} hours", m / 60),
            1 => "1 minute".to_string(),
            m => format!("{m} minutes"),
        }
    }

    async fn place(
        &self,
        requester: &Requester,
    ) -> Result<ApiResponse<CheckoutResponse>, ServiceError> {
        requester.require(Capability::Authenticated)?;

        let cart = self
            .cart
            .find_by_user(requester.user_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Cart not found"))?;

        let lines = self.cart.find_lines(cart.cart_id).await?;
        if lines.is_empty() {
            return Err(ServiceError::EmptyCart);
        }

        let (total, order_lines) = Self::price_lines(&lines)?;

        let order = self
            .command
            .place_order(&NewOrder {
                user_id: requester.user_id,
                cart_id: cart.cart_id,
                total,
                lines: order_lines,
            })
            .await
            .map_err(|e| match e {
                RepositoryError::InsufficientStock { product_id } => {
                    let name = lines
                        .iter()
                        .find(|l| l.product_id == product_id)
                        .map(|l| l.product_name.as_str())
                        .unwrap_or("unknown");
                    warn!("⚠️ Stock for product {product_id} ran out during checkout");
                    ServiceError::InsufficientStock(format!(
                        "Insufficient stock for product '{name}'"
                    ))
                }
                other => ServiceError::Repo(other),
            })?;

        info!(
            "🧾 Order {} placed by user {} for {}",
            order.order_id, requester.user_id, order.order_cost
        );

        self.notifier.dispatch(Notification::OrderConfirmation {
            to: requester.email.clone(),
            name: requester.username.clone(),
            order_id: order.order_id,
            total: order.order_cost,
        });

        Ok(ApiResponse::success(
            "Order placed successfully",
            CheckoutResponse {
                order_id: order.order_id,
                status: "SUCCESS".to_string(),
                total: order.order_cost,
            },
        ))
    }

    async fn cancel(
        &self,
        requester: &Requester,
        order_id: i64,
    ) -> Result<ApiResponse<()>, ServiceError> {
        requester.require(Capability::Authenticated)?;

        let order = self
            .query
            .find_by_id(order_id)
            .await?
            .ok_or_else(|| order_not_found(order_id))?;

        requester.require_owner(order.user_id, "You don't have permission to cancel this order")?;

        let placed_after = Utc::now() - self.cancel_window;
        let window_closed = || {
            ServiceError::Conflict(format!(
                "Order can only be cancelled within {} of placement",
                self.window_label()
            ))
        };

        if order.order_date < placed_after {
            return Err(window_closed());
        }

        // The repository re-checks the window under the row lock.
        let restored = self
            .command
            .cancel_order(order_id, placed_after)
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound => order_not_found(order_id),
                RepositoryError::Conflict(_) => window_closed(),
                other => ServiceError::Repo(other),
            })?;

        info!(
            "↩️ Order {order_id} cancelled, {} line(s) returned to stock",
            restored.len()
        );

        Ok(ApiResponse::success("Order cancelled successfully", ()))
    }
}

#[async_trait]
impl OrderCommandServiceTrait for OrderCommandService {
    async fn checkout(
        &self,
        requester: &Requester,
    ) -> Result<ApiResponse<CheckoutResponse>, ServiceError> {
        let ctx = self.tracer.start(
            "checkout",
            Method::Post,
            vec![
                KeyValue::new("component", "order"),
                KeyValue::new("user.id", requester.user_id),
            ],
        );
        let result = self.place(requester).await;
        self.tracer.finish(ctx, result).await
    }

    async fn cancel_order(
        &self,
        requester: &Requester,
        order_id: i64,
    ) -> Result<ApiResponse<()>, ServiceError> {
        let ctx = self.tracer.start(
            "cancel_order",
            Method::Post,
            vec![
                KeyValue::new("user.id", requester.user_id),
                KeyValue::new("order.id", order_id),
            ],
        );
        let result = self.cancel(requester, order_id).await;
        self.tracer.finish(ctx, result).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn line(product_id: i64, name: &str, price: Decimal, quantity: i32, stock: i32) -> CartLine {
        CartLine {
            cart_id: 1,
            product_id,
            quantity,
            product_name: name.into(),
            price,
            stock_quantity: stock,
        }
    }

    #[test]
    fn prices_lines_with_exact_decimals() {
        let lines = [
            line(1, "P", dec!(10.00), 3, 5),
            line(2, "Q", dec!(5.00), 2, 2),
        ];

        let (total, order_lines) = OrderCommandService::price_lines(&lines).unwrap();

        assert_eq!(total, dec!(40.00));
        assert_eq!(order_lines.len(), 2);
        assert_eq!(order_lines[0].unit_price, dec!(10.00));
    }

    #[test]
    fn rejects_line_above_stock_with_detail() {
        let lines = [line(7, "R", dec!(1.10), 2, 1)];

        match OrderCommandService::price_lines(&lines) {
            Err(ServiceError::InsufficientStock(msg)) => assert_eq!(
                msg,
                "Insufficient stock for product 'R'. Available: 1, Requested: 2"
            ),
            other => panic!("unexpected: {other:?}"),
        }
    }
}
