mod command;
mod query;

use std::sync::Arc;

use self::command::ProductCommandRepository;
use self::query::ProductQueryRepository;

use crate::{
    abstract_trait::{DynProductCommandRepository, DynProductQueryRepository},
    config::ConnectionPool,
};

#[derive(Clone)]
pub struct ProductRepository {
    pub query: DynProductQueryRepository,
    pub command: DynProductCommandRepository,
}

impl ProductRepository {
    pub fn new(pool: ConnectionPool) -> Self {
        let query =
            Arc::new(ProductQueryRepository::new(pool.clone())) as DynProductQueryRepository;

        let command = Arc::new(ProductCommandRepository::new(pool)) as DynProductCommandRepository;

        Self { query, command }
    }
}

/// `%term%` with LIKE metacharacters in `term` escaped.
pub(crate) fn like_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

#[cfg(test)]
mod tests {
    use super::like_pattern;

    #[test]
    fn escapes_like_wildcards() {
        assert_eq!(like_pattern("phone"), "%phone%");
        assert_eq!(like_pattern("50%_off"), "%50\\%\\_off%");
    }
}
