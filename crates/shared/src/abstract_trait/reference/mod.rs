mod repository;
mod service;

pub use self::repository::{
    CategoryRepositoryTrait, DynCategoryRepository, DynGeoRepository, DynShopRepository,
    GeoRepositoryTrait, ShopRepositoryTrait,
};
pub use self::service::{DynReferenceService, ReferenceServiceTrait};
