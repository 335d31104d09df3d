use super::like_pattern;
use crate::{
    abstract_trait::ProductQueryRepositoryTrait,
    config::ConnectionPool,
    domain::requests::{FindAllProducts, PageRequest},
    errors::RepositoryError,
    model::Product as ProductModel,
};
use async_trait::async_trait;
use tracing::{error, info};

const PRODUCT_COLUMNS: &str = "p.product_id, p.shop_id, p.category_id, p.name, p.description, \
     p.price, p.stock_quantity, p.created_at, p.updated_at";

const SEARCH_FILTER: &str = r#"
    WHERE ($1::TEXT IS NULL
           OR LOWER(p.name) LIKE $1
           OR LOWER(COALESCE(p.description, '')) LIKE $1)
      AND ($2::BIGINT IS NULL OR p.category_id = $2)
"#;

#[derive(Clone)]
pub struct ProductQueryRepository {
    db: ConnectionPool,
}

impl ProductQueryRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProductQueryRepositoryTrait for ProductQueryRepository {
    async fn search(
        &self,
        req: &FindAllProducts,
    ) -> Result<(Vec<ProductModel>, i64), RepositoryError> {
        let page = req.page_request();
        let sort = req.sort_key();
        let pattern = req.search_term().map(|term| like_pattern(&term));

        info!(
            "🔍 Searching products: search={:?} category={:?} sort={:?} page={} size={}",
            pattern, req.category_id, sort, page.page, page.size
        );

        let mut conn = self.db.acquire().await.map_err(|e| {
            error!("❌ Failed to acquire DB connection: {:?}", e);
            RepositoryError::from(e)
        })?;

        let total: i64 =
            sqlx::query_scalar(&format!("SELECT COUNT(*) FROM products p {SEARCH_FILTER}"))
                .bind(pattern.as_deref())
                .bind(req.category_id)
                .fetch_one(&mut *conn)
                .await
                .map_err(|e| {
                    error!("❌ Failed to count products: {:?}", e);
                    RepositoryError::from(e)
                })?;

        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM products p {SEARCH_FILTER} ORDER BY {} LIMIT $3 OFFSET $4",
            sort.order_by()
        );

        let products = sqlx::query_as::<_, ProductModel>(&sql)
            .bind(pattern.as_deref())
            .bind(req.category_id)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&mut *conn)
            .await
            .map_err(|e| {
                error!("❌ Failed to search products: {:?}", e);
                RepositoryError::from(e)
            })?;

        Ok((products, total))
    }

    async fn find_by_id(&self, product_id: i64) -> Result<Option<ProductModel>, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        sqlx::query_as::<_, ProductModel>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products p WHERE p.product_id = $1"
        ))
        .bind(product_id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| {
            error!("❌ Failed to fetch product {product_id}: {:?}", e);
            RepositoryError::from(e)
        })
    }

    async fn find_by_shop(
        &self,
        shop_id: i64,
        page: &PageRequest,
    ) -> Result<(Vec<ProductModel>, i64), RepositoryError> {
        info!("🔍 Fetching products for shop {shop_id}");

        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE shop_id = $1")
            .bind(shop_id)
            .fetch_one(&mut *conn)
            .await
            .map_err(RepositoryError::from)?;

        let products = sqlx::query_as::<_, ProductModel>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products p WHERE p.shop_id = $1 \
             ORDER BY p.created_at DESC, p.product_id DESC LIMIT $2 OFFSET $3"
        ))
        .bind(shop_id)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| {
            error!("❌ Failed to fetch products for shop {shop_id}: {:?}", e);
            RepositoryError::from(e)
        })?;

        Ok((products, total))
    }
}
