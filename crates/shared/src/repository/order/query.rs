use crate::{
    abstract_trait::OrderQueryRepositoryTrait,
    config::ConnectionPool,
    errors::RepositoryError,
    model::{Order as OrderModel, OrderItem as OrderItemModel},
};
use async_trait::async_trait;
use tracing::{error, info};

#[derive(Clone)]
pub struct OrderQueryRepository {
    db: ConnectionPool,
}

impl OrderQueryRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl OrderQueryRepositoryTrait for OrderQueryRepository {
    async fn find_by_id(&self, order_id: i64) -> Result<Option<OrderModel>, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(|e| {
            error!("❌ Failed to acquire DB connection: {:?}", e);
            RepositoryError::from(e)
        })?;

        sqlx::query_as::<_, OrderModel>(
            r#"
            SELECT order_id, user_id, order_date, order_cost
            FROM orders
            WHERE order_id = $1
            "#,
        )
        .bind(order_id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| {
            error!("❌ Failed to fetch order {order_id}: {:?}", e);
            RepositoryError::from(e)
        })
    }

    async fn find_by_user(&self, user_id: i64) -> Result<Vec<OrderModel>, RepositoryError> {
        info!("🔍 Fetching orders for user {user_id}");

        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        sqlx::query_as::<_, OrderModel>(
            r#"
            SELECT order_id, user_id, order_date, order_cost
            FROM orders
            WHERE user_id = $1
            ORDER BY order_date DESC, order_id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| {
            error!("❌ Failed to fetch orders for user {user_id}: {:?}", e);
            RepositoryError::from(e)
        })
    }

    async fn find_items(&self, order_id: i64) -> Result<Vec<OrderItemModel>, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        sqlx::query_as::<_, OrderItemModel>(
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
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| {
            error!("❌ Failed to fetch items for order {order_id}: {:?}", e);
            RepositoryError::from(e)
        })
    }
}
