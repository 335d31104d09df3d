use crate::middleware::{jwt::auth_middleware, validate::SimpleValidatedJson};
use axum::{
    Extension, Json,
    extract::Path,
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::get,
};
use shared::{
    abstract_trait::DynConversationService,
    domain::{
        Requester,
        requests::SendMessageRequest,
        responses::{ApiResponse, ConversationResponse, MessageResponse},
    },
    errors::HttpError,
    state::AppState,
};
use std::sync::Arc;
use utoipa_axum::router::OpenApiRouter;

#[utoipa::path(
    get,
    path = "/api/conversations",
    tag = "Conversation",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Conversations, most recent first", body = ApiResponse<Vec<ConversationResponse>>),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn get_my_conversations(
    Extension(service): Extension<DynConversationService>,
    Extension(requester): Extension<Requester>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.my_conversations(&requester).await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    get,
    path = "/api/conversations/{id}/messages",
    tag = "Conversation",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Conversation ID")),
    responses(
        (status = 200, description = "Messages, oldest first", body = ApiResponse<Vec<MessageResponse>>),
        (status = 403, description = "Not a participant"),
        (status = 404, description = "Conversation not found")
    )
)]
pub async fn get_messages(
    Extension(service): Extension<DynConversationService>,
    Extension(requester): Extension<Requester>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.messages(&requester, id).await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    post,
    path = "/api/conversations/{otherUserId}/messages",
    tag = "Conversation",
    security(("bearer_auth" = [])),
    params(("otherUserId" = i64, Path, description = "Recipient user ID")),
    request_body = SendMessageRequest,
    responses(
        (status = 200, description = "Message sent", body = ApiResponse<MessageResponse>),
        (status = 400, description = "Empty message or messaging yourself"),
        (status = 404, description = "Recipient not found")
    )
)]
pub async fn send_message(
    Extension(service): Extension<DynConversationService>,
    Extension(requester): Extension<Requester>,
    Path(other_user_id): Path<i64>,
    SimpleValidatedJson(body): SimpleValidatedJson<SendMessageRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.send_message(&requester, other_user_id, &body).await?;
    Ok((StatusCode::OK, Json(response)))
}

pub fn conversation_routes(app_state: Arc<AppState>) -> OpenApiRouter {
    OpenApiRouter::new()
        .route("/api/conversations", get(get_my_conversations))
        .route(
            "/api/conversations/{id}/messages",
            get(get_messages).post(send_message),
        )
        .route_layer(middleware::from_fn(auth_middleware))
        .layer(Extension(app_state.di_container.conversation_service.clone()))
        .layer(Extension(app_state.jwt_config.clone()))
}
