use crate::{
    abstract_trait::CartRepositoryTrait,
    config::ConnectionPool,
    errors::RepositoryError,
    model::{Cart, CartItem, CartLine},
};
use async_trait::async_trait;
use tracing::{error, info};

pub struct CartRepository {
    db: ConnectionPool,
}

impl CartRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CartRepositoryTrait for CartRepository {
    async fn find_by_user(&self, user_id: i64) -> Result<Option<Cart>, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        sqlx::query_as::<_, Cart>("SELECT cart_id, user_id, created_at FROM carts WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(&mut *conn)
            .await
            .map_err(RepositoryError::from)
    }

    async fn get_or_create(&self, user_id: i64) -> Result<Cart, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(|e| {
            error!("❌ Failed to acquire DB connection: {:?}", e);
            RepositoryError::from(e)
        })?;

        // The no-op update makes RETURNING yield the existing row on conflict.
        sqlx::query_as::<_, Cart>(
            r#"
            INSERT INTO carts (user_id)
            VALUES ($1)
            ON CONFLICT (user_id) DO UPDATE SET user_id = EXCLUDED.user_id
            RETURNING cart_id, user_id, created_at
            "#,
        )
        .bind(user_id)
        .fetch_one(&mut *conn)
        .await
        .map_err(|e| {
            error!("❌ Failed to get or create cart for user {user_id}: {:?}", e);
            RepositoryError::from(e)
        })
    }

    async fn find_lines(&self, cart_id: i64) -> Result<Vec<CartLine>, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        sqlx::query_as::<_, CartLine>(
            r#"
            SELECT ci.cart_id, ci.product_id, ci.quantity,
                   p.name AS product_name, p.price, p.stock_quantity
            FROM cart_items ci
            JOIN products p ON p.product_id = ci.product_id
            WHERE ci.cart_id = $1
            ORDER BY ci.product_id
            "#,
        )
        .bind(cart_id)
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| {
            error!("❌ Failed to load lines for cart {cart_id}: {:?}", e);
            RepositoryError::from(e)
        })
    }

    async fn find_item(
        &self,
        cart_id: i64,
        product_id: i64,
    ) -> Result<Option<CartItem>, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        sqlx::query_as::<_, CartItem>(
            "SELECT cart_id, product_id, quantity FROM cart_items WHERE cart_id = $1 AND product_id = $2",
        )
        .bind(cart_id)
        .bind(product_id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(RepositoryError::from)
    }

    async fn upsert_item(
        &self,
        cart_id: i64,
        product_id: i64,
        quantity: i32,
    ) -> Result<CartItem, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let item = sqlx::query_as::<_, CartItem>(
            r#"
            INSERT INTO cart_items (cart_id, product_id, quantity)
            VALUES ($1, $2, $3)
            ON CONFLICT (cart_id, product_id) DO UPDATE SET quantity = EXCLUDED.quantity
            RETURNING cart_id, product_id, quantity
            "#,
        )
        .bind(cart_id)
        .bind(product_id)
        .bind(quantity)
        .fetch_one(&mut *conn)
        .await
        .map_err(|e| {
            error!(
                "❌ Failed to store cart line ({cart_id}, {product_id}): {:?}",
                e
            );
            RepositoryError::from(e)
        })?;

        info!("🛒 Cart {cart_id}: product {product_id} set to {quantity}");
        Ok(item)
    }

    async fn delete_item(&self, cart_id: i64, product_id: i64) -> Result<bool, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let result = sqlx::query("DELETE FROM cart_items WHERE cart_id = $1 AND product_id = $2")
            .bind(cart_id)
            .bind(product_id)
            .execute(&mut *conn)
            .await
            .map_err(RepositoryError::from)?;

        Ok(result.rows_affected() > 0)
    }

    async fn clear(&self, cart_id: i64) -> Result<u64, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let result = sqlx::query("DELETE FROM cart_items WHERE cart_id = $1")
            .bind(cart_id)
            .execute(&mut *conn)
            .await
            .map_err(RepositoryError::from)?;

        info!("🧹 Cleared {} line(s) from cart {cart_id}", result.rows_affected());
        Ok(result.rows_affected())
    }

    async fn count_items(&self, cart_id: i64) -> Result<i64, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        sqlx::query_scalar::<_, i64>(
            "SELECT COALESCE(SUM(quantity), 0)::BIGINT FROM cart_items WHERE cart_id = $1",
        )
        .bind(cart_id)
        .fetch_one(&mut *conn)
        .await
        .map_err(RepositoryError::from)
    }
}
