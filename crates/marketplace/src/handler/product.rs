use crate::middleware::{jwt::auth_middleware, validate::SimpleValidatedJson};
use axum::{
    Extension, Json,
    extract::{Path, Query},
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, patch, post, put},
};
use shared::{
    abstract_trait::{DynProductCommandService, DynProductQueryService},
    domain::{
        Requester,
        requests::{
            CreateProductRequest, FindAllProducts, UpdateProductRequest, UpdateStockRequest,
        },
        responses::{ApiResponse, ApiResponsePagination, ProductResponse},
    },
    errors::HttpError,
    state::AppState,
};
use std::sync::Arc;
use utoipa_axum::router::OpenApiRouter;

#[utoipa::path(
    get,
    path = "/api/products",
    tag = "Product",
    params(FindAllProducts),
    responses(
        (status = 200, description = "Matching products", body = ApiResponsePagination<Vec<ProductResponse>>),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn get_products(
    Extension(service): Extension<DynProductQueryService>,
    Query(params): Query<FindAllProducts>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.search(&params).await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    get,
    path = "/api/products/{id}",
    tag = "Product",
    params(("id" = i64, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Product details", body = ApiResponse<ProductResponse>),
        (status = 404, description = "Product not found")
    )
)]
pub async fn get_product(
    Extension(service): Extension<DynProductQueryService>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.find_by_id(id).await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    post,
    path = "/api/products",
    tag = "Product",
    security(("bearer_auth" = [])),
    request_body = CreateProductRequest,
    responses(
        (status = 201, description = "Product created", body = ApiResponse<ProductResponse>),
        (status = 400, description = "Validation failed"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Category not found")
    )
)]
pub async fn create_product(
    Extension(service): Extension<DynProductCommandService>,
    Extension(requester): Extension<Requester>,
    SimpleValidatedJson(body): SimpleValidatedJson<CreateProductRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.create(&requester, &body).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

#[utoipa::path(
    put,
    path = "/api/products/{id}",
    tag = "Product",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Product ID")),
    request_body = UpdateProductRequest,
    responses(
        (status = 200, description = "Product updated", body = ApiResponse<ProductResponse>),
        (status = 400, description = "Validation failed"),
        (status = 403, description = "Not the owner of this product"),
        (status = 404, description = "Product not found")
    )
)]
pub async fn update_product(
    Extension(service): Extension<DynProductCommandService>,
    Extension(requester): Extension<Requester>,
    Path(id): Path<i64>,
    SimpleValidatedJson(body): SimpleValidatedJson<UpdateProductRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.update(&requester, id, &body).await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    patch,
    path = "/api/products/{id}/stock",
    tag = "Product",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Product ID")),
    request_body = UpdateStockRequest,
    responses(
        (status = 200, description = "Stock updated", body = ApiResponse<ProductResponse>),
        (status = 400, description = "Validation failed"),
        (status = 403, description = "Not the owner of this product"),
        (status = 404, description = "Product not found")
    )
)]
pub async fn update_product_stock(
    Extension(service): Extension<DynProductCommandService>,
    Extension(requester): Extension<Requester>,
    Path(id): Path<i64>,
    SimpleValidatedJson(body): SimpleValidatedJson<UpdateStockRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.update_stock(&requester, id, &body).await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    delete,
    path = "/api/products/{id}",
    tag = "Product",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Product deleted"),
        (status = 403, description = "Not the owner of this product"),
        (status = 404, description = "Product not found"),
        (status = 409, description = "Product is referenced by existing orders")
    )
)]
pub async fn delete_product(
    Extension(service): Extension<DynProductCommandService>,
    Extension(requester): Extension<Requester>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.delete(&requester, id).await?;
    Ok((StatusCode::OK, Json(response)))
}

pub fn product_routes(app_state: Arc<AppState>) -> OpenApiRouter {
    let public_routes = OpenApiRouter::new()
        .route("/api/products", get(get_products))
        .route("/api/products/{id}", get(get_product))
        .layer(Extension(app_state.di_container.product_service.query.clone()));

    let private_routes = OpenApiRouter::new()
        .route("/api/products", post(create_product))
        .route(
            "/api/products/{id}",
            put(update_product).delete(delete_product),
        )
        .route("/api/products/{id}/stock", patch(update_product_stock))
        .route_layer(middleware::from_fn(auth_middleware))
        .layer(Extension(app_state.di_container.product_service.command.clone()))
        .layer(Extension(app_state.jwt_config.clone()));

    public_routes.merge(private_routes)
}
