use crate::errors::{error::ErrorResponse, repository::RepositoryError, service::ServiceError};
use axum::{
    Json,
    http::{HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde_json::Value;
use tracing::error;

pub const TOKEN_EXPIRED_HEADER: HeaderName = HeaderName::from_static("x-token-expired");

const INTERNAL_MESSAGE: &str = "An unexpected error occurred. Please try again later.";

#[derive(Debug)]
pub enum HttpError {
    Validation {
        message: String,
        details: Option<Value>,
    },
    BadRequest {
        error: &'static str,
        message: String,
    },
    Unauthorized(String),
    TokenExpired,
    Forbidden(String),
    NotFound(String),
    Conflict(String),
    Internal(String),
}

impl From<ServiceError> for HttpError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Validation(errors) => HttpError::Validation {
                message: errors.join("; "),
                details: None,
            },
            ServiceError::NotFound(msg) => HttpError::NotFound(msg),
            ServiceError::InsufficientStock(msg) => HttpError::BadRequest {
                error: "Insufficient Stock",
                message: msg,
            },
            ServiceError::Forbidden(msg) => HttpError::Forbidden(msg),
            ServiceError::EmptyCart => HttpError::BadRequest {
                error: "Empty Cart",
                message: "Cannot checkout with empty cart".into(),
            },
            ServiceError::InvalidCredentials => {
                HttpError::Unauthorized("Invalid username/email or password".into())
            }
            ServiceError::Conflict(msg) => HttpError::Conflict(msg),
            ServiceError::Jwt(_) => HttpError::Unauthorized("Invalid token".into()),
            ServiceError::TokenExpired => HttpError::TokenExpired,

            ServiceError::Repo(repo_err) => match repo_err {
                RepositoryError::NotFound => HttpError::NotFound("Resource not found".into()),
                RepositoryError::Conflict(msg) => HttpError::Conflict(msg),
                RepositoryError::AlreadyExists(_) => {
                    HttpError::Conflict("Resource already exists".into())
                }
                RepositoryError::ForeignKey(_) => {
                    HttpError::Conflict("Resource is referenced by other records".into())
                }
                RepositoryError::InsufficientStock { product_id } => HttpError::BadRequest {
                    error: "Insufficient Stock",
                    message: format!("Insufficient stock for product id: {product_id}"),
                },
                RepositoryError::Sqlx(e) => HttpError::Internal(format!("Database error: {e}")),
            },

            ServiceError::Bcrypt(e) => HttpError::Internal(format!("Bcrypt error: {e}")),
            ServiceError::Internal(msg) => HttpError::Internal(msg),
        }
    }
}

impl HttpError {
    pub fn status(&self) -> StatusCode {
        match self {
            HttpError::Validation { .. } | HttpError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            HttpError::Unauthorized(_) | HttpError::TokenExpired => StatusCode::UNAUTHORIZED,
            HttpError::Forbidden(_) => StatusCode::FORBIDDEN,
            HttpError::NotFound(_) => StatusCode::NOT_FOUND,
            HttpError::Conflict(_) => StatusCode::CONFLICT,
            HttpError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let status = self.status();
        let expired = matches!(self, HttpError::TokenExpired);

        let body = match self {
            HttpError::Validation { message, details } => {
                let body = ErrorResponse::new(status.as_u16(), "Validation Failed", message);
                match details {
                    Some(details) => body.with_details(details),
                    None => body,
                }
            }
            HttpError::BadRequest { error, message } => {
                ErrorResponse::new(status.as_u16(), error, message)
            }
            HttpError::Unauthorized(msg) => ErrorResponse::new(status.as_u16(), "Unauthorized", msg),
            HttpError::TokenExpired => {
                ErrorResponse::new(status.as_u16(), "Unauthorized", "Token has expired")
            }
            HttpError::Forbidden(msg) => ErrorResponse::new(status.as_u16(), "Forbidden", msg),
            HttpError::NotFound(msg) => ErrorResponse::new(status.as_u16(), "Not Found", msg),
            HttpError::Conflict(msg) => ErrorResponse::new(status.as_u16(), "Conflict", msg),
            HttpError::Internal(msg) => {
                error!("❌ Unhandled internal error: {msg}");
                ErrorResponse::new(status.as_u16(), "Internal Server Error", INTERNAL_MESSAGE)
            }
        };

        let mut response = (status, Json(body)).into_response();
        if expired {
            response
                .headers_mut()
                .insert(TOKEN_EXPIRED_HEADER, HeaderValue::from_static("true"));
        }
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_service_taxonomy_to_status_codes() {
        let cases = [
            (ServiceError::validation("bad"), StatusCode::BAD_REQUEST),
            (ServiceError::not_found("missing"), StatusCode::NOT_FOUND),
            (
                ServiceError::InsufficientStock("low".into()),
                StatusCode::BAD_REQUEST,
            ),
            (ServiceError::Forbidden("no".into()), StatusCode::FORBIDDEN),
            (ServiceError::EmptyCart, StatusCode::BAD_REQUEST),
            (ServiceError::InvalidCredentials, StatusCode::UNAUTHORIZED),
            (ServiceError::Conflict("late".into()), StatusCode::CONFLICT),
            (
                ServiceError::Internal("boom".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(HttpError::from(err).status(), expected);
        }
    }

    #[test]
    fn lost_stock_race_is_reported_as_insufficient_stock() {
        let err = ServiceError::Repo(RepositoryError::InsufficientStock { product_id: 9 });
        match HttpError::from(err) {
            HttpError::BadRequest { error, message } => {
                assert_eq!(error, "Insufficient Stock");
                assert!(message.contains('9'));
            }
            other => panic!("unexpected mapping: {other:?}"),
        }
    }

    #[test]
    fn expired_token_sets_header() {
        let response = HttpError::TokenExpired.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            response.headers().get(TOKEN_EXPIRED_HEADER).unwrap(),
            "true"
        );
    }
}
