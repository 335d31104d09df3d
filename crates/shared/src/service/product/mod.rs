mod command;
mod query;

use std::sync::Arc;

pub use self::command::{ProductCommandService, ProductCommandServiceDeps};
pub use self::query::ProductQueryService;

use crate::{
    abstract_trait::{
        DynCategoryRepository, DynProductCommandRepository, DynProductCommandService,
        DynProductQueryRepository, DynProductQueryService, DynShopRepository,
        DynUserQueryRepository,
    },
    errors::ServiceError,
};
use prometheus_client::registry::Registry;
use rust_decimal::Decimal;
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct ProductService {
    pub query: DynProductQueryService,
    pub command: DynProductCommandService,
}

pub struct ProductServiceDeps {
    pub query: DynProductQueryRepository,
    pub command: DynProductCommandRepository,
    pub shop: DynShopRepository,
    pub category: DynCategoryRepository,
    pub user_query: DynUserQueryRepository,
    pub registry: Arc<Mutex<Registry>>,
}

impl ProductService {
    pub async fn new(deps: ProductServiceDeps) -> Self {
        let ProductServiceDeps {
            query,
            command,
            shop,
            category,
            user_query,
            registry,
        } = deps;

        let query_service = Arc::new(
            ProductQueryService::new(query.clone(), shop.clone(), &registry).await,
        ) as DynProductQueryService;

        let command_service = Arc::new(
            ProductCommandService::new(ProductCommandServiceDeps {
                query,
                command,
                shop,
                category,
                user_query,
                registry,
            })
            .await,
        ) as DynProductCommandService;

        Self {
            query: query_service,
            command: command_service,
        }
    }
}

/// Largest value a `NUMERIC(12, 2)` price column holds.
pub const MAX_PRICE: Decimal = Decimal::from_parts(3_567_587_327, 232, 0, false, 2);

pub(crate) fn check_price(price: Decimal) -> Result<(), ServiceError> {
    if price <= Decimal::ZERO {
        return Err(ServiceError::validation("Price must be greater than 0"));
    }
    if price.normalize().scale() > 2 {
        return Err(ServiceError::validation(
            "Price cannot have more than 2 decimal places",
        ));
    }
    if price > MAX_PRICE {
        return Err(ServiceError::validation(format!(
            "Price cannot exceed {MAX_PRICE}"
        )));
    }
    Ok(())
}

pub(crate) fn check_stock(stock_quantity: i32) -> Result<(), ServiceError> {
    if stock_quantity < 0 {
        return Err(ServiceError::validation("Stock quantity cannot be negative"));
    }
    Ok(())
}

pub(crate) fn product_not_found(product_id: i64) -> ServiceError {
    ServiceError::not_found(format!("Product not found with id: {product_id}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn prices_must_fit_the_money_column() {
        assert_eq!(MAX_PRICE, dec!(9999999999.99));

        assert!(check_price(dec!(0.01)).is_ok());
        assert!(check_price(dec!(12.50)).is_ok());
        assert!(check_price(dec!(12.500)).is_ok());
        assert!(check_price(MAX_PRICE).is_ok());

        for bad in [dec!(0), dec!(-1), dec!(0.001), dec!(19.999), dec!(10000000000)] {
            assert!(
                matches!(check_price(bad), Err(ServiceError::Validation(_))),
                "{bad} should be rejected"
            );
        }
    }
}
