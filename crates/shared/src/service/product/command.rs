use crate::{
    abstract_trait::{
        DynCategoryRepository, DynProductCommandRepository, DynProductQueryRepository,
        DynShopRepository, DynUserQueryRepository, ProductCommandServiceTrait,
    },
    domain::{
        Capability, Requester,
        requests::{CreateProductRequest, UpdateProductRequest, UpdateStockRequest},
        responses::{ApiResponse, ProductResponse},
    },
    errors::{RepositoryError, ServiceError},
    model::{NewProduct, Product, ProductChanges},
    service::product::{check_price, check_stock, product_not_found},
    utils::{Method, ServiceTracer},
};
use async_trait::async_trait;
use opentelemetry::KeyValue;
use prometheus_client::registry::Registry;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;
use validator::Validate;

const UPDATE_DENIED: &str = "You don't have permission to update this product";
const DELETE_DENIED: &str = "You don't have permission to delete this product";

pub struct ProductCommandService {
    query: DynProductQueryRepository,
    command: DynProductCommandRepository,
    shop: DynShopRepository,
    category: DynCategoryRepository,
    user_query: DynUserQueryRepository,
    tracer: ServiceTracer,
}

pub struct ProductCommandServiceDeps {
    pub query: DynProductQueryRepository,
    pub command: DynProductCommandRepository,
    pub shop: DynShopRepository,
    pub category: DynCategoryRepository,
    pub user_query: DynUserQueryRepository,
    pub registry: Arc<Mutex<Registry>>,
}

impl ProductCommandService {
    pub async fn new(deps: ProductCommandServiceDeps) -> Self {
        let ProductCommandServiceDeps {
            query,
            command,
            shop,
            category,
            user_query,
            registry,
        } = deps;

        let tracer = ServiceTracer::registered(
            "product-command-service",
            "product_command_service",
            &registry,
        )
        .await;

        Self {
            query,
            command,
            shop,
            category,
            user_query,
            tracer,
        }
    }

    async fn check_category(&self, category_id: Option<i64>) -> Result<(), ServiceError> {
        if let Some(id) = category_id
            && self.category.find_by_id(id).await?.is_none()
        {
            return Err(ServiceError::not_found(format!(
                "Category not found with id: {id}"
            )));
        }
        Ok(())
    }

    /// Loads the product and fails unless the requester owns its shop.
    async fn owned_product(
        &self,
        requester: &Requester,
        product_id: i64,
        denied: &str,
    ) -> Result<Product, ServiceError> {
        requester.require(Capability::Authenticated)?;

        let product = self
            .query
            .find_by_id(product_id)
            .await?
            .ok_or_else(|| product_not_found(product_id))?;

        let shop = self
            .shop
            .find_by_id(product.shop_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Shop not found"))?;

        requester.require_owner(shop.owner_id, denied)?;
        Ok(product)
    }

    async fn create_product(
        &self,
        requester: &Requester,
        req: &CreateProductRequest,
    ) -> Result<ApiResponse<ProductResponse>, ServiceError> {
        requester.require(Capability::Authenticated)?;
        req.validate()?;
        check_price(req.price)?;
        check_stock(req.stock_quantity)?;
        self.check_category(req.category_id).await?;

        let owner = self
            .user_query
            .find_by_id(requester.user_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("User not found"))?;

        let shop = self
            .shop
            .get_or_create(owner.user_id, &format!("{}'s Shop", owner.full_name))
            .await?;

        let product = self
            .command
            .create_product(&NewProduct {
                shop_id: shop.shop_id,
                category_id: req.category_id,
                name: req.name.trim().to_string(),
                description: req.description.clone(),
                price: req.price,
                stock_quantity: req.stock_quantity,
            })
            .await?;

        info!(
            "📦 Product {} created in shop {}",
            product.product_id, shop.shop_id
        );

        Ok(ApiResponse::success(
            "Product created successfully",
            ProductResponse::from(product),
        ))
    }

    async fn update_product(
        &self,
        requester: &Requester,
        product_id: i64,
        req: &UpdateProductRequest,
    ) -> Result<ApiResponse<ProductResponse>, ServiceError> {
        self.owned_product(requester, product_id, UPDATE_DENIED).await?;
        req.validate()?;

        let mut changes = ProductChanges::default();
        if let Some(name) = &req.name {
            let name = name.trim();
            if name.is_empty() {
                return Err(ServiceError::validation("Product name cannot be blank"));
            }
            changes.name = Some(name.to_string());
        }
        if let Some(price) = req.price {
            check_price(price)?;
            changes.price = Some(price);
        }
        if let Some(stock) = req.stock_quantity {
            check_stock(stock)?;
            changes.stock_quantity = Some(stock);
        }
        if req.category_id.is_some() {
            self.check_category(req.category_id).await?;
            changes.category_id = req.category_id;
        }
        changes.description = req.description.clone();

        let updated = self
            .command
            .update_product(product_id, &changes)
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound => product_not_found(product_id),
                other => ServiceError::Repo(other),
            })?;

        Ok(ApiResponse::success(
            "Product updated successfully",
            ProductResponse::from(updated),
        ))
    }

    async fn set_stock(
        &self,
        requester: &Requester,
        product_id: i64,
        req: &UpdateStockRequest,
    ) -> Result<ApiResponse<ProductResponse>, ServiceError> {
        self.owned_product(requester, product_id, UPDATE_DENIED).await?;
        check_stock(req.stock_quantity)?;

        let updated = self
            .command
            .update_stock(product_id, req.stock_quantity)
            .await?;

        Ok(ApiResponse::success(
            "Stock updated successfully",
            ProductResponse::from(updated),
        ))
    }

    async fn remove_product(
        &self,
        requester: &Requester,
        product_id: i64,
    ) -> Result<ApiResponse<()>, ServiceError> {
        self.owned_product(requester, product_id, DELETE_DENIED).await?;

        self.command
            .delete_product(product_id)
            .await
            .map_err(|e| match e {
                RepositoryError::ForeignKey(_) => ServiceError::Conflict(
                    "Product is referenced by existing orders and cannot be deleted".into(),
                ),
                other => ServiceError::Repo(other),
            })?;

        info!("🗑️ Product {product_id} deleted");
        Ok(ApiResponse::success("Product deleted successfully", ()))
    }
}

#[async_trait]
impl ProductCommandServiceTrait for ProductCommandService {
    async fn create(
        &self,
        requester: &Requester,
        req: &CreateProductRequest,
    ) -> Result<ApiResponse<ProductResponse>, ServiceError> {
        let ctx = self.tracer.start(
            "create_product",
            Method::Post,
            vec![
                KeyValue::new("component", "product"),
                KeyValue::new("user.id", requester.user_id),
                KeyValue::new("product.name", req.name.clone()),
            ],
        );
        let result = self.create_product(requester, req).await;
        self.tracer.finish(ctx, result).await
    }

    async fn update(
        &self,
        requester: &Requester,
        product_id: i64,
        req: &UpdateProductRequest,
    ) -> Result<ApiResponse<ProductResponse>, ServiceError> {
        let ctx = self.tracer.start(
            "update_product",
            Method::Put,
            vec![
                KeyValue::new("user.id", requester.user_id),
                KeyValue::new("product.id", product_id),
            ],
        );
        let result = self.update_product(requester, product_id, req).await;
        self.tracer.finish(ctx, result).await
    }

    async fn update_stock(
        &self,
        requester: &Requester,
        product_id: i64,
        req: &UpdateStockRequest,
    ) -> Result<ApiResponse<ProductResponse>, ServiceError> {
        let ctx = self.tracer.start(
            "update_stock",
            Method::Patch,
            vec![
                KeyValue::new("product.id", product_id),
                KeyValue::new("product.stock", i64::from(req.stock_quantity)),
            ],
        );
        let result = self.set_stock(requester, product_id, req).await;
        self.tracer.finish(ctx, result).await
    }

    async fn delete(
        &self,
        requester: &Requester,
        product_id: i64,
    ) -> Result<ApiResponse<()>, ServiceError> {
        let ctx = self.tracer.start(
            "delete_product",
            Method::Delete,
            vec![
                KeyValue::new("user.id", requester.user_id),
                KeyValue::new("product.id", product_id),
            ],
        );
        let result = self.remove_product(requester, product_id).await;
        self.tracer.finish(ctx, result).await
    }
}
