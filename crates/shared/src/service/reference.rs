use crate::{
    abstract_trait::{
        DynCategoryRepository, DynGeoRepository, DynShopRepository, ReferenceServiceTrait,
    },
    domain::responses::{
        ApiResponse, CategoryResponse, DistrictResponse, ProvinceResponse, ShopResponse,
        WardResponse,
    },
    errors::ServiceError,
    utils::{Method, ServiceTracer},
};
use async_trait::async_trait;
use opentelemetry::KeyValue;
use prometheus_client::registry::Registry;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Read-only lookups for categories, shops and the province/district/ward tree.
#[derive(Clone)]
pub struct ReferenceService {
    shop: DynShopRepository,
    category: DynCategoryRepository,
    geo: DynGeoRepository,
    tracer: ServiceTracer,
}

impl ReferenceService {
    pub async fn new(
        shop: DynShopRepository,
        category: DynCategoryRepository,
        geo: DynGeoRepository,
        registry: &Arc<Mutex<Registry>>,
    ) -> Self {
        let tracer =
            ServiceTracer::registered("reference-service", "reference_service", registry).await;

        Self {
            shop,
            category,
            geo,
            tracer,
        }
    }

    async fn all_categories(&self) -> Result<ApiResponse<Vec<CategoryResponse>>, ServiceError> {
        let categories = self.category.find_all().await?;
        Ok(ApiResponse::success(
            "Categories retrieved successfully",
            categories.into_iter().map(CategoryResponse::from).collect(),
        ))
    }

    async fn one_category(
        &self,
        category_id: i64,
    ) -> Result<ApiResponse<CategoryResponse>, ServiceError> {
        let category = self
            .category
            .find_by_id(category_id)
            .await?
            .ok_or_else(|| {
                ServiceError::not_found(format!("Category not found with id: {category_id}"))
            })?;

        Ok(ApiResponse::success(
            "Category retrieved successfully",
            CategoryResponse::from(category),
        ))
    }

    async fn one_shop(&self, shop_id: i64) -> Result<ApiResponse<ShopResponse>, ServiceError> {
        let shop = self
            .shop
            .find_by_id(shop_id)
            .await?
            .ok_or_else(|| ServiceError::not_found(format!("Shop not found with id: {shop_id}")))?;

        Ok(ApiResponse::success(
            "Shop retrieved successfully",
            ShopResponse::from(shop),
        ))
    }

    async fn all_provinces(&self) -> Result<ApiResponse<Vec<ProvinceResponse>>, ServiceError> {
        let provinces = self.geo.find_provinces().await?;
        Ok(ApiResponse::success(
            "Provinces retrieved successfully",
            provinces.into_iter().map(ProvinceResponse::from).collect(),
        ))
    }

    async fn province_districts(
        &self,
        province_id: i64,
    ) -> Result<ApiResponse<Vec<DistrictResponse>>, ServiceError> {
        if self.geo.find_province(province_id).await?.is_none() {
            return Err(ServiceError::not_found(format!(
                "Province not found with id: {province_id}"
            )));
        }

        let districts = self.geo.find_districts(province_id).await?;
        Ok(ApiResponse::success(
            "Districts retrieved successfully",
            districts.into_iter().map(DistrictResponse::from).collect(),
        ))
    }

    async fn district_wards(
        &self,
        district_id: i64,
    ) -> Result<ApiResponse<Vec<WardResponse>>, ServiceError> {
        if self.geo.find_district(district_id).await?.is_none() {
            return Err(ServiceError::not_found(format!(
                "District not found with id: {district_id}"
            )));
        }

        let wards = self.geo.find_wards(district_id).await?;
        Ok(ApiResponse::success(
            "Wards retrieved successfully",
            wards.into_iter().map(WardResponse::from).collect(),
        ))
    }
}

#[async_trait]
impl ReferenceServiceTrait for ReferenceService {
    async fn categories(&self) -> Result<ApiResponse<Vec<CategoryResponse>>, ServiceError> {
        let ctx = self.tracer.start("list_categories", Method::Get, vec![]);
        let result = self.all_categories().await;
        self.tracer.finish(ctx, result).await
    }

    async fn category(
        &self,
        category_id: i64,
    ) -> Result<ApiResponse<CategoryResponse>, ServiceError> {
        let ctx = self.tracer.start(
            "find_category",
            Method::Get,
            vec![KeyValue::new("category.id", category_id)],
        );
        let result = self.one_category(category_id).await;
        self.tracer.finish(ctx, result).await
    }

    async fn shop(&self, shop_id: i64) -> Result<ApiResponse<ShopResponse>, ServiceError> {
        let ctx = self.tracer.start(
            "find_shop",
            Method::Get,
            vec![KeyValue::new("shop.id", shop_id)],
        );
        let result = self.one_shop(shop_id).await;
        self.tracer.finish(ctx, result).await
    }

    async fn provinces(&self) -> Result<ApiResponse<Vec<ProvinceResponse>>, ServiceError> {
        let ctx = self.tracer.start("list_provinces", Method::Get, vec![]);
        let result = self.all_provinces().await;
        self.tracer.finish(ctx, result).await
    }

    async fn districts(
        &self,
        province_id: i64,
    ) -> Result<ApiResponse<Vec<DistrictResponse>>, ServiceError> {
        let ctx = self.tracer.start(
            "list_districts",
            Method::Get,
            vec![KeyValue::new("province.id", province_id)],
        );
        let result = self.province_districts(province_id).await;
        self.tracer.finish(ctx, result).await
    }

    async fn wards(&self, district_id: i64) -> Result<ApiResponse<Vec<WardResponse>>, ServiceError> {
        let ctx = self.tracer.start(
            "list_wards",
            Method::Get,
            vec![KeyValue::new("district.id", district_id)],
        );
        let result = self.district_wards(district_id).await;
        self.tracer.finish(ctx, result).await
    }
}
