use crate::{
    domain::{
        Requester,
        requests::{
            CreateProductRequest, FindAllProducts, PageRequest, UpdateProductRequest,
            UpdateStockRequest,
        },
        responses::{ApiResponse, ApiResponsePagination, ProductResponse},
    },
    errors::ServiceError,
};
use async_trait::async_trait;
use std::sync::Arc;

pub type DynProductQueryService = Arc<dyn ProductQueryServiceTrait + Send + Sync>;
pub type DynProductCommandService = Arc<dyn ProductCommandServiceTrait + Send + Sync>;

#[async_trait]
pub trait ProductQueryServiceTrait {
    async fn search(
        &self,
        req: &FindAllProducts,
    ) -> Result<ApiResponsePagination<Vec<ProductResponse>>, ServiceError>;
    async fn find_by_id(&self, product_id: i64)
    -> Result<ApiResponse<ProductResponse>, ServiceError>;
    async fn find_by_shop(
        &self,
        shop_id: i64,
        page: &PageRequest,
    ) -> Result<ApiResponsePagination<Vec<ProductResponse>>, ServiceError>;
}

#[async_trait]
pub trait ProductCommandServiceTrait {
    async fn create(
        &self,
        requester: &Requester,
        req: &CreateProductRequest,
    ) -> Result<ApiResponse<ProductResponse>, ServiceError>;
    async fn update(
        &self,
        requester: &Requester,
        product_id: i64,
        req: &UpdateProductRequest,
    ) -> Result<ApiResponse<ProductResponse>, ServiceError>;
    async fn update_stock(
        &self,
        requester: &Requester,
        product_id: i64,
        req: &UpdateStockRequest,
    ) -> Result<ApiResponse<ProductResponse>, ServiceError>;
    async fn delete(
        &self,
        requester: &Requester,
        product_id: i64,
    ) -> Result<ApiResponse<()>, ServiceError>;
}
