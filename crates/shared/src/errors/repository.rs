use sqlx::Error as SqlxError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Database error: {0}")]
    Sqlx(#[source] SqlxError),

    #[error("Not found")]
    NotFound,

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Already exists: {0}")]
    AlreadyExists(String),

    #[error("Foreign key violation: {0}")]
    ForeignKey(String),

    #[error("Insufficient stock for product {product_id}")]
    InsufficientStock { product_id: i64 },
}

impl From<SqlxError> for RepositoryError {
    fn from(err: SqlxError) -> Self {
        if let SqlxError::Database(db_err) = &err {
            let constraint = db_err.constraint().unwrap_or("unknown").to_string();

            if db_err.is_unique_violation() {
                return RepositoryError::AlreadyExists(constraint);
            }
            if db_err.is_foreign_key_violation() {
                return RepositoryError::ForeignKey(constraint);
            }
        }

        RepositoryError::Sqlx(err)
    }
}
