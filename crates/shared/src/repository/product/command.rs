use crate::{
    abstract_trait::ProductCommandRepositoryTrait,
    config::ConnectionPool,
    errors::RepositoryError,
    model::{NewProduct, Product as ProductModel, ProductChanges},
};
use async_trait::async_trait;
use tracing::{error, info};

const RETURNING: &str = "RETURNING product_id, shop_id, category_id, name, description, \
     price, stock_quantity, created_at, updated_at";

pub struct ProductCommandRepository {
    db: ConnectionPool,
}

impl ProductCommandRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProductCommandRepositoryTrait for ProductCommandRepository {
    async fn create_product(&self, product: &NewProduct) -> Result<ProductModel, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let created = sqlx::query_as::<_, ProductModel>(&format!(
            r#"
            INSERT INTO products (shop_id, category_id, name, description, price, stock_quantity)
            VALUES ($1, $2, $3, $4, $5, $6)
            {RETURNING}
            "#
        ))
        .bind(product.shop_id)
        .bind(product.category_id)
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price)
        .bind(product.stock_quantity)
        .fetch_one(&mut *conn)
        .await
        .map_err(|e| {
            error!("❌ Failed to create product '{}': {:?}", product.name, e);
            RepositoryError::from(e)
        })?;

        info!(
            "✅ Created product {} in shop {}",
            created.product_id, created.shop_id
        );
        Ok(created)
    }

    async fn update_product(
        &self,
        product_id: i64,
        changes: &ProductChanges,
    ) -> Result<ProductModel, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let updated = sqlx::query_as::<_, ProductModel>(&format!(
            r#"
            UPDATE products
            SET name = COALESCE($2, name),
                description = COALESCE($3, description),
                price = COALESCE($4, price),
                stock_quantity = COALESCE($5, stock_quantity),
                category_id = COALESCE($6, category_id),
                updated_at = NOW()
            WHERE product_id = $1
            {RETURNING}
            "#
        ))
        .bind(product_id)
        .bind(changes.name.as_deref())
        .bind(changes.description.as_deref())
        .bind(changes.price)
        .bind(changes.stock_quantity)
        .bind(changes.category_id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| {
            error!("❌ Failed to update product {product_id}: {:?}", e);
            RepositoryError::from(e)
        })?
        .ok_or(RepositoryError::NotFound)?;

        info!("✅ Updated product {}", updated.product_id);
        Ok(updated)
    }

    async fn update_stock(
        &self,
        product_id: i64,
        stock_quantity: i32,
    ) -> Result<ProductModel, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let updated = sqlx::query_as::<_, ProductModel>(&format!(
            r#"
            UPDATE products
            SET stock_quantity = $2, updated_at = NOW()
            WHERE product_id = $1
            {RETURNING}
            "#
        ))
        .bind(product_id)
        .bind(stock_quantity)
        .fetch_optional(&mut *conn)
        .await
        .map_err(RepositoryError::from)?
        .ok_or(RepositoryError::NotFound)?;

        info!("✅ Stock of product {product_id} set to {stock_quantity}");
        Ok(updated)
    }

    async fn delete_product(&self, product_id: i64) -> Result<(), RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let result = sqlx::query("DELETE FROM products WHERE product_id = $1")
            .bind(product_id)
            .execute(&mut *conn)
            .await
            .map_err(|e| {
                error!("❌ Failed to delete product {product_id}: {:?}", e);
                RepositoryError::from(e)
            })?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        info!("🗑️ Deleted product {product_id}");
        Ok(())
    }
}
