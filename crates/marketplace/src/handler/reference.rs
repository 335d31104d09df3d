use axum::{
    Extension, Json,
    extract::{Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use shared::{
    abstract_trait::{DynProductQueryService, DynReferenceService},
    domain::{
        requests::PageRequest,
        responses::{
            ApiResponse, ApiResponsePagination, CategoryResponse, DistrictResponse,
            ProductResponse, ProvinceResponse, ShopResponse, WardResponse,
        },
    },
    errors::HttpError,
    state::AppState,
};
use std::sync::Arc;
use utoipa_axum::router::OpenApiRouter;

#[utoipa::path(
    get,
    path = "/api/categories",
    tag = "Reference",
    responses((status = 200, description = "All categories", body = ApiResponse<Vec<CategoryResponse>>))
)]
pub async fn get_categories(
    Extension(service): Extension<DynReferenceService>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.categories().await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    get,
    path = "/api/categories/{id}",
    tag = "Reference",
    params(("id" = i64, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Category", body = ApiResponse<CategoryResponse>),
        (status = 404, description = "Category not found")
    )
)]
pub async fn get_category(
    Extension(service): Extension<DynReferenceService>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.category(id).await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    get,
    path = "/api/shops/{id}",
    tag = "Reference",
    params(("id" = i64, Path, description = "Shop ID")),
    responses(
        (status = 200, description = "Shop", body = ApiResponse<ShopResponse>),
        (status = 404, description = "Shop not found")
    )
)]
pub async fn get_shop(
    Extension(service): Extension<DynReferenceService>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.shop(id).await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    get,
    path = "/api/shops/{id}/products",
    tag = "Reference",
    params(("id" = i64, Path, description = "Shop ID"), PageRequest),
    responses(
        (status = 200, description = "The shop's products, newest first", body = ApiResponsePagination<Vec<ProductResponse>>),
        (status = 404, description = "Shop not found")
    )
)]
pub async fn get_shop_products(
    Extension(service): Extension<DynProductQueryService>,
    Path(id): Path<i64>,
    Query(page): Query<PageRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.find_by_shop(id, &page.normalized()).await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    get,
    path = "/api/provinces",
    tag = "Reference",
    responses((status = 200, description = "All provinces", body = ApiResponse<Vec<ProvinceResponse>>))
)]
pub async fn get_provinces(
    Extension(service): Extension<DynReferenceService>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.provinces().await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    get,
    path = "/api/provinces/{id}/districts",
    tag = "Reference",
    params(("id" = i64, Path, description = "Province ID")),
    responses(
        (status = 200, description = "Districts of the province", body = ApiResponse<Vec<DistrictResponse>>),
        (status = 404, description = "Province not found")
    )
)]
pub async fn get_districts(
    Extension(service): Extension<DynReferenceService>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.districts(id).await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    get,
    path = "/api/districts/{id}/wards",
    tag = "Reference",
    params(("id" = i64, Path, description = "District ID")),
    responses(
        (status = 200, description = "Wards of the district", body = ApiResponse<Vec<WardResponse>>),
        (status = 404, description = "District not found")
    )
)]
pub async fn get_wards(
    Extension(service): Extension<DynReferenceService>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.wards(id).await?;
    Ok((StatusCode::OK, Json(response)))
}

pub fn reference_routes(app_state: Arc<AppState>) -> OpenApiRouter {
    OpenApiRouter::new()
        .route("/api/categories", get(get_categories))
        .route("/api/categories/{id}", get(get_category))
        .route("/api/shops/{id}", get(get_shop))
        .route("/api/shops/{id}/products", get(get_shop_products))
        .route("/api/provinces", get(get_provinces))
        .route("/api/provinces/{id}/districts", get(get_districts))
        .route("/api/districts/{id}/wards", get(get_wards))
        .layer(Extension(app_state.di_container.reference_service.clone()))
        .layer(Extension(app_state.di_container.product_service.query.clone()))
}
