use crate::{
    domain::requests::{FindAllProducts, PageRequest},
    errors::RepositoryError,
    model::{NewProduct, Product, ProductChanges},
};
use async_trait::async_trait;
use std::sync::Arc;

pub type DynProductQueryRepository = Arc<dyn ProductQueryRepositoryTrait + Send + Sync>;
pub type DynProductCommandRepository = Arc<dyn ProductCommandRepositoryTrait + Send + Sync>;

#[async_trait]
pub trait ProductQueryRepositoryTrait {
    async fn search(&self, req: &FindAllProducts) -> Result<(Vec<Product>, i64), RepositoryError>;
    async fn find_by_id(&self, product_id: i64) -> Result<Option<Product>, RepositoryError>;
    async fn find_by_shop(
        &self,
        shop_id: i64,
        page: &PageRequest,
    ) -> Result<(Vec<Product>, i64), RepositoryError>;
}

#[async_trait]
pub trait ProductCommandRepositoryTrait {
    async fn create_product(&self, product: &NewProduct) -> Result<Product, RepositoryError>;
    /// Writes only the columns set in `changes`, leaving the rest (stock in
    /// particular) as currently stored.
    async fn update_product(
        &self,
        product_id: i64,
        changes: &ProductChanges,
    ) -> Result<Product, RepositoryError>;
    async fn update_stock(
        &self,
        product_id: i64,
        stock_quantity: i32,
    ) -> Result<Product, RepositoryError>;
    async fn delete_product(&self, product_id: i64) -> Result<(), RepositoryError>;
}
