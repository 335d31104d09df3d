use crate::{
    abstract_trait::OrderCommandRepositoryTrait,
    config::ConnectionPool,
    errors::RepositoryError,
    model::{NewOrder, Order as OrderModel, OrderItem as OrderItemModel},
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::{error, info, warn};

pub struct OrderCommandRepository {
    db: ConnectionPool,
}

impl OrderCommandRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl OrderCommandRepositoryTrait for OrderCommandRepository {
    async fn place_order(&self, order: &NewOrder) -> Result<OrderModel, RepositoryError> {
        let mut tx = self.db.begin().await.map_err(|e| {
            error!("❌ Failed to begin checkout transaction: {:?}", e);
            RepositoryError::from(e)
        })?;

        let created = sqlx::query_as::<_, OrderModel>(
            r#"
            INSERT INTO orders (user_id, order_date, order_cost)
            VALUES ($1, NOW(), $2)
            RETURNING order_id, user_id, order_date, order_cost
            "#,
        )
        .bind(order.user_id)
        .bind(order.total)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            error!("❌ Failed to insert order for user {}: {:?}", order.user_id, e);
            RepositoryError::from(e)
        })?;

        for line in &order.lines {
            let decremented = sqlx::query(
                r#"
                UPDATE products
                SET stock_quantity = stock_quantity - $1,
                    updated_at = NOW()
                WHERE product_id = $2 AND stock_quantity >= $1
                "#,
            )
            .bind(line.quantity)
            .bind(line.product_id)
            .execute(&mut *tx)
            .await
            .map_err(RepositoryError::from)?;

            if decremented.rows_affected() == 0 {
                warn!(
                    "⚠️ Stock for product {} dropped below {} during checkout, rolling back",
                    line.product_id, line.quantity
                );
                tx.rollback().await.map_err(RepositoryError::from)?;
                return Err(RepositoryError::InsufficientStock {
                    product_id: line.product_id,
                });
            }

            sqlx::query(
                r#"
                INSERT INTO order_items (order_id, product_id, quantity, price_snapshot)
                VALUES ($1, $2, $3, $4)
                "#,
            )
            .bind(created.order_id)
            .bind(line.product_id)
            .bind(line.quantity)
            .bind(line.unit_price)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                error!(
                    "❌ Failed to insert order item for product {}: {:?}",
                    line.product_id, e
                );
                RepositoryError::from(e)
            })?;
        }

        for line in &order.lines {
            sqlx::query(
                "DELETE FROM cart_items WHERE cart_id = $1 AND product_id = $2 AND quantity <= $3",
            )
            .bind(order.cart_id)
            .bind(line.product_id)
            .bind(line.quantity)
            .execute(&mut *tx)
            .await
            .map_err(RepositoryError::from)?;

            // Quantity added to the line after it was read stays in the cart.
            sqlx::query(
                r#"
                UPDATE cart_items
                SET quantity = quantity - $3
                WHERE cart_id = $1 AND product_id = $2 AND quantity > $3
                "#,
            )
            .bind(order.cart_id)
            .bind(line.product_id)
            .bind(line.quantity)
            .execute(&mut *tx)
            .await
            .map_err(RepositoryError::from)?;
        }

        tx.commit().await.map_err(|e| {
            error!("❌ Failed to commit checkout transaction: {:?}", e);
            RepositoryError::from(e)
        })?;

        info!(
            "✅ Placed order {} for user {} with {} line(s)",
            created.order_id,
            created.user_id,
            order.lines.len()
        );
        Ok(created)
    }

    async fn cancel_order(
        &self,
        order_id: i64,
        placed_after: DateTime<Utc>,
    ) -> Result<Vec<OrderItemModel>, RepositoryError> {
        let mut tx = self.db.begin().await.map_err(RepositoryError::from)?;

        let order_date = sqlx::query_scalar::<_, DateTime<Utc>>(
            "SELECT order_date FROM orders WHERE order_id = $1 FOR UPDATE",
        )
        .bind(order_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(RepositoryError::from)?
        .ok_or(RepositoryError::NotFound)?;

        if order_date < placed_after {
            warn!("⚠️ Order {order_id} placed at {order_date} is past its cancellation window");
            return Err(RepositoryError::Conflict(format!(
                "Order {order_id} is past its cancellation window"
            )));
        }

        let items = sqlx::query_as::<_, OrderItemModel>(
            r#"
            SELECT oi.order_id, oi.product_id, p.name AS product_name,
                   oi.quantity, oi.price_snapshot
            FROM order_items oi
            JOIN products p ON p.product_id = oi.product_id
            WHERE oi.order_id = $1
            ORDER BY oi.product_id
            "#,
        )
        .bind(order_id)
        .fetch_all(&mut *tx)
        .await
        .map_err(RepositoryError::from)?;

        for item in &items {
            sqlx::query(
                r#"
                UPDATE products
                SET stock_quantity = stock_quantity + $1,
                    updated_at = NOW()
                WHERE product_id = $2
                "#,
            )
            .bind(item.quantity)
            .bind(item.product_id)
            .execute(&mut *tx)
            .await
            .map_err(RepositoryError::from)?;
        }

        sqlx::query("DELETE FROM orders WHERE order_id = $1")
            .bind(order_id)
            .execute(&mut *tx)
            .await
            .map_err(RepositoryError::from)?;

        tx.commit().await.map_err(|e| {
            error!("❌ Failed to commit cancellation of order {order_id}: {:?}", e);
            RepositoryError::from(e)
        })?;

        info!(
            "✅ Cancelled order {order_id}, restored stock for {} product(s)",
            items.len()
        );
        Ok(items)
    }
}
