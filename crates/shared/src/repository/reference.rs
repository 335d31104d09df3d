use crate::{
    abstract_trait::{CategoryRepositoryTrait, GeoRepositoryTrait, ShopRepositoryTrait},
    config::ConnectionPool,
    errors::RepositoryError,
    model::{Category, District, Province, Shop, Ward},
};
use async_trait::async_trait;
use tracing::{error, info};

pub struct ShopRepository {
    db: ConnectionPool,
}

impl ShopRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ShopRepositoryTrait for ShopRepository {
    async fn find_by_id(&self, shop_id: i64) -> Result<Option<Shop>, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        sqlx::query_as::<_, Shop>(
            "SELECT shop_id, owner_id, name, average_rating, created_at FROM shops WHERE shop_id = $1",
        )
        .bind(shop_id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(RepositoryError::from)
    }

    async fn find_by_owner(&self, owner_id: i64) -> Result<Option<Shop>, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        sqlx::query_as::<_, Shop>(
            "SELECT shop_id, owner_id, name, average_rating, created_at FROM shops WHERE owner_id = $1",
        )
        .bind(owner_id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(RepositoryError::from)
    }

    async fn get_or_create(&self, owner_id: i64, name: &str) -> Result<Shop, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        // Existing shop keeps its name; the update only exists to make RETURNING fire.
        let shop = sqlx::query_as::<_, Shop>(
            r#"
            INSERT INTO shops (owner_id, name)
            VALUES ($1, $2)
            ON CONFLICT (owner_id) DO UPDATE SET owner_id = EXCLUDED.owner_id
            RETURNING shop_id, owner_id, name, average_rating, created_at
            "#,
        )
        .bind(owner_id)
        .bind(name)
        .fetch_one(&mut *conn)
        .await
        .map_err(|e| {
            error!("❌ Failed to get or create shop for user {owner_id}: {:?}", e);
            RepositoryError::from(e)
        })?;

        info!("🏪 Shop {} resolved for owner {owner_id}", shop.shop_id);
        Ok(shop)
    }
}

pub struct CategoryRepository {
    db: ConnectionPool,
}

impl CategoryRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CategoryRepositoryTrait for CategoryRepository {
    async fn find_all(&self) -> Result<Vec<Category>, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        sqlx::query_as::<_, Category>(
            "SELECT category_id, name, description FROM categories ORDER BY name",
        )
        .fetch_all(&mut *conn)
        .await
        .map_err(RepositoryError::from)
    }

    async fn find_by_id(&self, category_id: i64) -> Result<Option<Category>, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        sqlx::query_as::<_, Category>(
            "SELECT category_id, name, description FROM categories WHERE category_id = $1",
        )
        .bind(category_id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(RepositoryError::from)
    }
}

pub struct GeoRepository {
    db: ConnectionPool,
}

impl GeoRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl GeoRepositoryTrait for GeoRepository {
    async fn find_provinces(&self) -> Result<Vec<Province>, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        sqlx::query_as::<_, Province>(
            "SELECT province_id, province_name FROM provinces ORDER BY province_name",
        )
        .fetch_all(&mut *conn)
        .await
        .map_err(RepositoryError::from)
    }

    async fn find_province(&self, province_id: i64) -> Result<Option<Province>, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        sqlx::query_as::<_, Province>(
            "SELECT province_id, province_name FROM provinces WHERE province_id = $1",
        )
        .bind(province_id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(RepositoryError::from)
    }

    async fn find_districts(&self, province_id: i64) -> Result<Vec<District>, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        sqlx::query_as::<_, District>(
            r#"
            SELECT district_id, district_name, province_id
            FROM districts
            WHERE province_id = $1
            ORDER BY district_name
            "#,
        )
        .bind(province_id)
        .fetch_all(&mut *conn)
        .await
        .map_err(RepositoryError::from)
    }

    async fn find_district(&self, district_id: i64) -> Result<Option<District>, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        sqlx::query_as::<_, District>(
            "SELECT district_id, district_name, province_id FROM districts WHERE district_id = $1",
        )
        .bind(district_id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(RepositoryError::from)
    }

    async fn find_wards(&self, district_id: i64) -> Result<Vec<Ward>, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        sqlx::query_as::<_, Ward>(
            r#"
            SELECT ward_id, ward_name, district_id
            FROM wards
            WHERE district_id = $1
            ORDER BY ward_name
            "#,
        )
        .bind(district_id)
        .fetch_all(&mut *conn)
        .await
        .map_err(RepositoryError::from)
    }
}
