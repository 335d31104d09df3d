use crate::middleware::{jwt::auth_middleware, validate::SimpleValidatedJson};
use axum::{
    Extension, Json,
    extract::Path,
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, post, put},
};
use shared::{
    abstract_trait::DynCartService,
    domain::{
        Requester,
        requests::{AddCartItemRequest, UpdateCartItemRequest},
        responses::{ApiResponse, CartCountResponse, CartResponse},
    },
    errors::HttpError,
    state::AppState,
};
use std::sync::Arc;
use utoipa_axum::router::OpenApiRouter;

#[utoipa::path(
    get,
    path = "/api/cart",
    tag = "Cart",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current cart", body = ApiResponse<CartResponse>),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn get_cart(
    Extension(service): Extension<DynCartService>,
    Extension(requester): Extension<Requester>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.get_cart(&requester).await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    get,
    path = "/api/cart/count",
    tag = "Cart",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Total quantity in the cart", body = ApiResponse<CartCountResponse>),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn count_cart_items(
    Extension(service): Extension<DynCartService>,
    Extension(requester): Extension<Requester>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.count_items(&requester).await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    post,
    path = "/api/cart/items",
    tag = "Cart",
    security(("bearer_auth" = [])),
    request_body = AddCartItemRequest,
    responses(
        (status = 200, description = "Item added", body = ApiResponse<CartResponse>),
        (status = 400, description = "Invalid quantity or insufficient stock"),
        (status = 404, description = "Product not found")
    )
)]
pub async fn add_cart_item(
    Extension(service): Extension<DynCartService>,
    Extension(requester): Extension<Requester>,
    SimpleValidatedJson(body): SimpleValidatedJson<AddCartItemRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.add_item(&requester, &body).await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    put,
    path = "/api/cart/items/{productId}",
    tag = "Cart",
    security(("bearer_auth" = [])),
    params(("productId" = i64, Path, description = "Product ID")),
    request_body = UpdateCartItemRequest,
    responses(
        (status = 200, description = "Quantity updated", body = ApiResponse<CartResponse>),
        (status = 400, description = "Invalid quantity or insufficient stock"),
        (status = 404, description = "Cart item not found")
    )
)]
pub async fn update_cart_item(
    Extension(service): Extension<DynCartService>,
    Extension(requester): Extension<Requester>,
    Path(product_id): Path<i64>,
    SimpleValidatedJson(body): SimpleValidatedJson<UpdateCartItemRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.update_item(&requester, product_id, &body).await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    delete,
    path = "/api/cart/items/{productId}",
    tag = "Cart",
    security(("bearer_auth" = [])),
    params(("productId" = i64, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Item removed", body = ApiResponse<CartResponse>),
        (status = 404, description = "Cart item not found")
    )
)]
pub async fn remove_cart_item(
    Extension(service): Extension<DynCartService>,
    Extension(requester): Extension<Requester>,
    Path(product_id): Path<i64>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.remove_item(&requester, product_id).await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    delete,
    path = "/api/cart",
    tag = "Cart",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Cart cleared"),
        (status = 404, description = "Cart not found")
    )
)]
pub async fn clear_cart(
    Extension(service): Extension<DynCartService>,
    Extension(requester): Extension<Requester>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.clear_cart(&requester).await?;
    Ok((StatusCode::OK, Json(response)))
}

pub fn cart_routes(app_state: Arc<AppState>) -> OpenApiRouter {
    OpenApiRouter::new()
        .route("/api/cart", get(get_cart).delete(clear_cart))
        .route("/api/cart/count", get(count_cart_items))
        .route("/api/cart/items", post(add_cart_item))
        .route(
            "/api/cart/items/{productId}",
            put(update_cart_item).delete(remove_cart_item),
        )
        .route_layer(middleware::from_fn(auth_middleware))
        .layer(Extension(app_state.di_container.cart_service.clone()))
        .layer(Extension(app_state.jwt_config.clone()))
}
