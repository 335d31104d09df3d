use crate::{
    abstract_trait::{DynProductQueryRepository, DynShopRepository, ProductQueryServiceTrait},
    domain::{
        requests::{FindAllProducts, PageRequest},
        responses::{ApiResponse, ApiResponsePagination, Pagination, ProductResponse},
    },
    errors::ServiceError,
    service::product::product_not_found,
    utils::{Method, ServiceTracer},
};
use async_trait::async_trait;
use opentelemetry::KeyValue;
use prometheus_client::registry::Registry;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;

pub struct ProductQueryService {
    query: DynProductQueryRepository,
    shop: DynShopRepository,
    tracer: ServiceTracer,
}

impl ProductQueryService {
    pub async fn new(
        query: DynProductQueryRepository,
        shop: DynShopRepository,
        registry: &Arc<Mutex<Registry>>,
    ) -> Self {
        let tracer =
            ServiceTracer::registered("product-query-service", "product_query_service", registry)
                .await;

        Self {
            query,
            shop,
            tracer,
        }
    }

    async fn list(
        &self,
        req: &FindAllProducts,
    ) -> Result<ApiResponsePagination<Vec<ProductResponse>>, ServiceError> {
        let page = req.page_request();
        let (products, total) = self.query.search(req).await?;

        info!("🔍 Product search matched {total} item(s)");

        Ok(ApiResponsePagination::success(
            "Products retrieved successfully",
            products.into_iter().map(ProductResponse::from).collect(),
            Pagination::new(&page, total),
        ))
    }

    async fn detail(&self, product_id: i64) -> Result<ApiResponse<ProductResponse>, ServiceError> {
        let product = self
            .query
            .find_by_id(product_id)
            .await?
            .ok_or_else(|| product_not_found(product_id))?;

        Ok(ApiResponse::success(
            "Product retrieved successfully",
            ProductResponse::from(product),
        ))
    }

    async fn shop_listing(
        &self,
        shop_id: i64,
        page: &PageRequest,
    ) -> Result<ApiResponsePagination<Vec<ProductResponse>>, ServiceError> {
        if self.shop.find_by_id(shop_id).await?.is_none() {
            return Err(ServiceError::not_found(format!(
                "Shop not found with id: {shop_id}"
            )));
        }

        let page = page.normalized();
        let (products, total) = self.query.find_by_shop(shop_id, &page).await?;

        Ok(ApiResponsePagination::success(
            "Shop products retrieved successfully",
            products.into_iter().map(ProductResponse::from).collect(),
            Pagination::new(&page, total),
        ))
    }
}

#[async_trait]
impl ProductQueryServiceTrait for ProductQueryService {
    async fn search(
        &self,
        req: &FindAllProducts,
    ) -> Result<ApiResponsePagination<Vec<ProductResponse>>, ServiceError> {
        let ctx = self.tracer.start(
            "search_products",
            Method::Get,
            vec![
                KeyValue::new("component", "product"),
                KeyValue::new("search", req.search.clone().unwrap_or_default()),
                KeyValue::new("page", req.page),
            ],
        );
        let result = self.list(req).await;
        self.tracer.finish(ctx, result).await
    }

    async fn find_by_id(
        &self,
        product_id: i64,
    ) -> Result<ApiResponse<ProductResponse>, ServiceError> {
        let ctx = self.tracer.start(
            "find_product",
            Method::Get,
            vec![KeyValue::new("product.id", product_id)],
        );
        let result = self.detail(product_id).await;
        self.tracer.finish(ctx, result).await
    }

    async fn find_by_shop(
        &self,
        shop_id: i64,
        page: &PageRequest,
    ) -> Result<ApiResponsePagination<Vec<ProductResponse>>, ServiceError> {
        let ctx = self.tracer.start(
            "find_shop_products",
            Method::Get,
            vec![KeyValue::new("shop.id", shop_id)],
        );
        let result = self.shop_listing(shop_id, page).await;
        self.tracer.finish(ctx, result).await
    }
}
