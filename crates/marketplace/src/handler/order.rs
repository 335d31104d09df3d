use crate::middleware::jwt::auth_middleware;
use axum::{
    Extension, Json,
    extract::Path,
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, post},
};
use shared::{
    abstract_trait::{DynOrderCommandService, DynOrderQueryService},
    domain::{
        Requester,
        responses::{ApiResponse, CheckoutResponse, OrderResponse},
    },
    errors::HttpError,
    state::AppState,
};
use std::sync::Arc;
use utoipa_axum::router::OpenApiRouter;

#[utoipa::path(
    post,
    path = "/api/orders/checkout",
    tag = "Order",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Order placed", body = ApiResponse<CheckoutResponse>),
        (status = 400, description = "Empty cart or insufficient stock"),
        (status = 404, description = "Cart not found")
    )
)]
pub async fn checkout(
    Extension(service): Extension<DynOrderCommandService>,
    Extension(requester): Extension<Requester>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.checkout(&requester).await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    get,
    path = "/api/orders",
    tag = "Order",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Order history, newest first", body = ApiResponse<Vec<OrderResponse>>),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn get_my_orders(
    Extension(service): Extension<DynOrderQueryService>,
    Extension(requester): Extension<Requester>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.find_my_orders(&requester).await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    get,
    path = "/api/orders/{id}",
    tag = "Order",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Order details", body = ApiResponse<OrderResponse>),
        (status = 403, description = "Not your order"),
        (status = 404, description = "Order not found")
    )
)]
pub async fn get_order(
    Extension(service): Extension<DynOrderQueryService>,
    Extension(requester): Extension<Requester>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.find_by_id(&requester, id).await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    post,
    path = "/api/orders/{id}/cancel",
    tag = "Order",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Order cancelled and stock restored"),
        (status = 403, description = "Not your order"),
        (status = 404, description = "Order not found"),
        (status = 409, description = "Cancellation window has passed")
    )
)]
pub async fn cancel_order(
    Extension(service): Extension<DynOrderCommandService>,
    Extension(requester): Extension<Requester>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.cancel_order(&requester, id).await?;
    Ok((StatusCode::OK, Json(response)))
}

pub fn order_routes(app_state: Arc<AppState>) -> OpenApiRouter {
    OpenApiRouter::new()
        .route("/api/orders", get(get_my_orders))
        .route("/api/orders/checkout", post(checkout))
        .route("/api/orders/{id}", get(get_order))
        .route("/api/orders/{id}/cancel", post(cancel_order))
        .route_layer(middleware::from_fn(auth_middleware))
        .layer(Extension(app_state.di_container.order_service.query.clone()))
        .layer(Extension(app_state.di_container.order_service.command.clone()))
        .layer(Extension(app_state.jwt_config.clone()))
}
