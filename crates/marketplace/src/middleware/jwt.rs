use axum::{
    Extension,
    body::Body,
    http::{Request, header},
    middleware::Next,
    response::IntoResponse,
};
use axum_extra::extract::cookie::CookieJar;
use shared::{
    abstract_trait::DynJwtService,
    errors::{HttpError, ServiceError},
};
use tracing::debug;

/// Reads the bearer token from the `token` cookie or the `Authorization`
/// header and stores the resulting `Requester` as a request extension.
pub async fn auth_middleware(
    cookie_jar: CookieJar,
    Extension(jwt): Extension<DynJwtService>,
    mut req: Request<Body>,
    next: Next,
) -> Result<impl IntoResponse, HttpError> {
    let token = cookie_jar
        .get("token")
        .map(|cookie| cookie.value().to_string())
        .or_else(|| {
            req.headers()
                .get(header::AUTHORIZATION)
                .and_then(|auth_header| auth_header.to_str().ok())
                .and_then(|auth_value| auth_value.strip_prefix("Bearer ").map(str::to_owned))
        })
        .ok_or_else(|| {
            HttpError::Unauthorized("You are not logged in, please provide token".to_string())
        })?;

    let requester = jwt.verify_token(&token).map_err(|e| match e {
        ServiceError::TokenExpired => HttpError::TokenExpired,
        _ => HttpError::Unauthorized("Invalid token".to_string()),
    })?;

    debug!("🔐 Authenticated {} ({})", requester.username, requester.role);

    req.extensions_mut().insert(requester);

    Ok(next.run(req).await)
}
