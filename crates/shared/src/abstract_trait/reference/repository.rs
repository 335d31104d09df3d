use crate::{
    errors::RepositoryError,
    model::{Category, District, Province, Shop, Ward},
};
use async_trait::async_trait;
use std::sync::Arc;

pub type DynShopRepository = Arc<dyn ShopRepositoryTrait + Send + Sync>;
pub type DynCategoryRepository = Arc<dyn CategoryRepositoryTrait + Send + Sync>;
pub type DynGeoRepository = Arc<dyn GeoRepositoryTrait + Send + Sync>;

#[async_trait]
pub trait ShopRepositoryTrait {
    async fn find_by_id(&self, shop_id: i64) -> Result<Option<Shop>, RepositoryError>;
    async fn find_by_owner(&self, owner_id: i64) -> Result<Option<Shop>, RepositoryError>;
    /// Returns the owner's existing shop when one is already there.
    async fn get_or_create(&self, owner_id: i64, name: &str) -> Result<Shop, RepositoryError>;
}

#[async_trait]
pub trait CategoryRepositoryTrait {
    async fn find_all(&self) -> Result<Vec<Category>, RepositoryError>;
    async fn find_by_id(&self, category_id: i64) -> Result<Option<Category>, RepositoryError>;
}

#[async_trait]
pub trait GeoRepositoryTrait {
    async fn find_provinces(&self) -> Result<Vec<Province>, RepositoryError>;
    async fn find_province(&self, province_id: i64) -> Result<Option<Province>, RepositoryError>;
    async fn find_districts(&self, province_id: i64) -> Result<Vec<District>, RepositoryError>;
    async fn find_district(&self, district_id: i64) -> Result<Option<District>, RepositoryError>;
    async fn find_wards(&self, district_id: i64) -> Result<Vec<Ward>, RepositoryError>;
}
