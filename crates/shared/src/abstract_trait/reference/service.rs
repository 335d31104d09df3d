use crate::{
    domain::responses::{
        ApiResponse, CategoryResponse, DistrictResponse, ProvinceResponse, ShopResponse,
        WardResponse,
    },
    errors::ServiceError,
};
use async_trait::async_trait;
use std::sync::Arc;

pub type DynReferenceService = Arc<dyn ReferenceServiceTrait + Send + Sync>;

#[async_trait]
pub trait ReferenceServiceTrait {
    async fn categories(&self) -> Result<ApiResponse<Vec<CategoryResponse>>, ServiceError>;
    async fn category(&self, category_id: i64)
    -> Result<ApiResponse<CategoryResponse>, ServiceError>;
    async fn shop(&self, shop_id: i64) -> Result<ApiResponse<ShopResponse>, ServiceError>;
    async fn provinces(&self) -> Result<ApiResponse<Vec<ProvinceResponse>>, ServiceError>;
    async fn districts(
        &self,
        province_id: i64,
    ) -> Result<ApiResponse<Vec<DistrictResponse>>, ServiceError>;
    async fn wards(&self, district_id: i64)
    -> Result<ApiResponse<Vec<WardResponse>>, ServiceError>;
}
