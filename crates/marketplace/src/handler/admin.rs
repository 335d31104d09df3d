use crate::middleware::{jwt::auth_middleware, role::admin_middleware, validate::SimpleValidatedJson};
use axum::{
    Extension, Json,
    extract::Query,
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, post},
};
use shared::{
    abstract_trait::{DynEmailToolService, DynUserService},
    domain::{
        Requester,
        requests::{
            FindAllUsers, OrderConfirmationEmailRequest, RecipientEmailRequest,
            SimpleEmailRequest,
        },
        responses::{ApiResponsePagination, UserProfileResponse},
    },
    errors::HttpError,
    state::AppState,
};
use std::sync::Arc;
use utoipa_axum::router::OpenApiRouter;

#[utoipa::path(
    get,
    path = "/api/admin/users",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(FindAllUsers),
    responses(
        (status = 200, description = "Registered users", body = ApiResponsePagination<Vec<UserProfileResponse>>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Administrator role required")
    )
)]
pub async fn get_users(
    Extension(service): Extension<DynUserService>,
    Extension(requester): Extension<Requester>,
    Query(params): Query<FindAllUsers>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.find_all(&requester, &params).await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    post,
    path = "/api/test/email/simple",
    tag = "Admin",
    security(("bearer_auth" = [])),
    request_body = SimpleEmailRequest,
    responses(
        (status = 200, description = "Email delivered"),
        (status = 403, description = "Administrator role required"),
        (status = 500, description = "SMTP delivery failed")
    )
)]
pub async fn send_simple_email(
    Extension(service): Extension<DynEmailToolService>,
    Extension(requester): Extension<Requester>,
    SimpleValidatedJson(body): SimpleValidatedJson<SimpleEmailRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.send_simple(&requester, &body).await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    post,
    path = "/api/test/email/welcome",
    tag = "Admin",
    security(("bearer_auth" = [])),
    request_body = RecipientEmailRequest,
    responses(
        (status = 200, description = "Email delivered"),
        (status = 403, description = "Administrator role required")
    )
)]
pub async fn send_welcome_email(
    Extension(service): Extension<DynEmailToolService>,
    Extension(requester): Extension<Requester>,
    SimpleValidatedJson(body): SimpleValidatedJson<RecipientEmailRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.send_welcome(&requester, &body).await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    post,
    path = "/api/test/email/reset-password",
    tag = "Admin",
    security(("bearer_auth" = [])),
    request_body = RecipientEmailRequest,
    responses(
        (status = 200, description = "Email delivered"),
        (status = 403, description = "Administrator role required")
    )
)]
pub async fn send_reset_password_email(
    Extension(service): Extension<DynEmailToolService>,
    Extension(requester): Extension<Requester>,
    SimpleValidatedJson(body): SimpleValidatedJson<RecipientEmailRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.send_password_reset(&requester, &body).await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    post,
    path = "/api/test/email/order-confirmation",
    tag = "Admin",
    security(("bearer_auth" = [])),
    request_body = OrderConfirmationEmailRequest,
    responses(
        (status = 200, description = "Email delivered"),
        (status = 403, description = "Administrator role required")
    )
)]
pub async fn send_order_confirmation_email(
    Extension(service): Extension<DynEmailToolService>,
    Extension(requester): Extension<Requester>,
    SimpleValidatedJson(body): SimpleValidatedJson<OrderConfirmationEmailRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.send_order_confirmation(&requester, &body).await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    get,
    path = "/api/test/email/test-connection",
    tag = "Admin",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Whether the SMTP server accepted the connection"),
        (status = 403, description = "Administrator role required")
    )
)]
pub async fn test_email_connection(
    Extension(service): Extension<DynEmailToolService>,
    Extension(requester): Extension<Requester>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.test_connection(&requester).await?;
    Ok((StatusCode::OK, Json(response)))
}

pub fn admin_routes(app_state: Arc<AppState>) -> OpenApiRouter {
    OpenApiRouter::new()
        .route("/api/admin/users", get(get_users))
        .route("/api/test/email/simple", post(send_simple_email))
        .route("/api/test/email/welcome", post(send_welcome_email))
        .route(
            "/api/test/email/reset-password",
            post(send_reset_password_email),
        )
        .route(
            "/api/test/email/order-confirmation",
            post(send_order_confirmation_email),
        )
        .route(
            "/api/test/email/test-connection",
            get(test_email_connection),
        )
        .route_layer(middleware::from_fn(admin_middleware))
        .route_layer(middleware::from_fn(auth_middleware))
        .layer(Extension(app_state.di_container.user_service.clone()))
        .layer(Extension(app_state.di_container.email_tool_service.clone()))
        .layer(Extension(app_state.jwt_config.clone()))
}
