use crate::errors::repository::RepositoryError;
use bcrypt::BcryptError;
use jsonwebtoken::errors::Error as JwtError;
use thiserror::Error;
use validator::ValidationErrors;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Repository error: {0}")]
    Repo(#[from] RepositoryError),

    #[error("Validation failed: {0:?}")]
    Validation(Vec<String>),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    InsufficientStock(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Cannot checkout with empty cart")]
    EmptyCart,

    #[error("Invalid username/email or password")]
    InvalidCredentials,

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Bcrypt error: {0}")]
    Bcrypt(#[from] BcryptError),

    #[error("JWT error: {0}")]
    Jwt(#[from] JwtError),

    #[error("Token has expired")]
    TokenExpired,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<ValidationErrors> for ServiceError {
    fn from(errors: ValidationErrors) -> Self {
        let mut messages: Vec<String> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| match &e.message {
                    Some(msg) => msg.to_string(),
                    None => format!("{field} is invalid"),
                })
            })
            .collect();
        messages.sort();
        ServiceError::Validation(messages)
    }
}

impl ServiceError {
    pub fn validation(message: impl Into<String>) -> Self {
        ServiceError::Validation(vec![message.into()])
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ServiceError::NotFound(message.into())
    }

    /// Short label used in error bodies and span events.
    pub fn kind(&self) -> &'static str {
        match self {
            ServiceError::Validation(_) => "validation",
            ServiceError::NotFound(_) | ServiceError::Repo(RepositoryError::NotFound) => {
                "not_found"
            }
            ServiceError::InsufficientStock(_)
            | ServiceError::Repo(RepositoryError::InsufficientStock { .. }) => {
                "insufficient_stock"
            }
            ServiceError::Forbidden(_) => "forbidden",
            ServiceError::EmptyCart => "empty_cart",
            ServiceError::InvalidCredentials
            | ServiceError::Jwt(_)
            | ServiceError::TokenExpired => "unauthorized",
            ServiceError::Conflict(_)
            | ServiceError::Repo(RepositoryError::Conflict(_))
            | ServiceError::Repo(RepositoryError::AlreadyExists(_))
            | ServiceError::Repo(RepositoryError::ForeignKey(_)) => "conflict",
            _ => "internal",
        }
    }
}
