use axum::{
    Extension, body::Body, http::Request, middleware::Next, response::IntoResponse,
};
use shared::{
    domain::{Capability, Requester},
    errors::HttpError,
};
use tracing::warn;

/// Route-level guard for admin prefixes. Must run after `auth_middleware`.
pub async fn admin_middleware(
    Extension(requester): Extension<Requester>,
    req: Request<Body>,
    next: Next,
) -> Result<impl IntoResponse, HttpError> {
    if let Err(e) = requester.require(Capability::Admin) {
        warn!("⛔ {} tried to reach {}", requester.username, req.uri().path());
        return Err(e.into());
    }

    Ok(next.run(req).await)
}
