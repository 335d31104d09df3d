mod cart;
mod conversation;
mod order;
mod product;
mod reference;
mod user;

use std::sync::Arc;

pub use self::cart::CartRepository;
pub use self::conversation::{ConversationRepository, MessageRepository};
pub use self::order::OrderRepository;
pub use self::product::ProductRepository;
pub use self::reference::{CategoryRepository, GeoRepository, ShopRepository};
pub use self::user::UserRepository;

use crate::{
    abstract_trait::{
        DynCartRepository, DynCategoryRepository, DynConversationRepository, DynGeoRepository,
        DynMessageRepository, DynShopRepository,
    },
    config::ConnectionPool,
};

/// Every repository the services need, behind trait objects so a test store
/// can stand in for Postgres.
#[derive(Clone)]
pub struct Repositories {
    pub user: UserRepository,
    pub product: ProductRepository,
    pub order: OrderRepository,
    pub cart: DynCartRepository,
    pub shop: DynShopRepository,
    pub category: DynCategoryRepository,
    pub geo: DynGeoRepository,
    pub conversation: DynConversationRepository,
    pub message: DynMessageRepository,
}

impl Repositories {
    pub fn from_pool(pool: ConnectionPool) -> Self {
        Self {
            user: UserRepository::new(pool.clone()),
            product: ProductRepository::new(pool.clone()),
            order: OrderRepository::new(pool.clone()),
            cart: Arc::new(CartRepository::new(pool.clone())) as DynCartRepository,
            shop: Arc::new(ShopRepository::new(pool.clone())) as DynShopRepository,
            category: Arc::new(CategoryRepository::new(pool.clone())) as DynCategoryRepository,
            geo: Arc::new(GeoRepository::new(pool.clone())) as DynGeoRepository,
            conversation: Arc::new(ConversationRepository::new(pool.clone()))
                as DynConversationRepository,
            message: Arc::new(MessageRepository::new(pool)) as DynMessageRepository,
        }
    }
}
