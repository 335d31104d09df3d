mod error;
mod http;
mod repository;
mod service;

pub use self::error::ErrorResponse;
pub use self::http::{HttpError, TOKEN_EXPIRED_HEADER};
pub use self::repository::RepositoryError;
pub use self::service::ServiceError;
