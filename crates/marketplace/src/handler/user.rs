use crate::middleware::{jwt::auth_middleware, validate::SimpleValidatedJson};
use axum::{
    Extension, Json,
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, put},
};
use shared::{
    abstract_trait::DynUserService,
    domain::{
        Requester,
        requests::ChangePasswordRequest,
        responses::{ApiResponse, UserProfileResponse},
    },
    errors::HttpError,
    state::AppState,
};
use std::sync::Arc;
use utoipa_axum::router::OpenApiRouter;

#[utoipa::path(
    get,
    path = "/api/users/me",
    tag = "User",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current user profile", body = ApiResponse<UserProfileResponse>),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn get_me_handler(
    Extension(service): Extension<DynUserService>,
    Extension(requester): Extension<Requester>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.me(&requester).await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    put,
    path = "/api/users/me/password",
    tag = "User",
    security(("bearer_auth" = [])),
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "Password changed"),
        (status = 400, description = "Validation failed"),
        (status = 401, description = "Current password is wrong")
    )
)]
pub async fn change_password_handler(
    Extension(service): Extension<DynUserService>,
    Extension(requester): Extension<Requester>,
    SimpleValidatedJson(body): SimpleValidatedJson<ChangePasswordRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.change_password(&requester, &body).await?;
    Ok((StatusCode::OK, Json(response)))
}

pub fn user_routes(app_state: Arc<AppState>) -> OpenApiRouter {
    OpenApiRouter::new()
        .route("/api/users/me", get(get_me_handler))
        .route("/api/users/me/password", put(change_password_handler))
        .route_layer(middleware::from_fn(auth_middleware))
        .layer(Extension(app_state.di_container.user_service.clone()))
        .layer(Extension(app_state.jwt_config.clone()))
}
