mod auth;
mod cart;
mod conversation;
mod email;
mod hashing;
mod jwt;
mod order;
mod product;
mod reference;
mod user;

pub use self::auth::{AuthServiceTrait, DynAuthService};
pub use self::cart::{CartRepositoryTrait, CartServiceTrait, DynCartRepository, DynCartService};
pub use self::conversation::{
    ConversationRepositoryTrait, ConversationServiceTrait, DynConversationRepository,
    DynConversationService, DynMessageRepository, MessageRepositoryTrait,
};
pub use self::email::{
    DynEmailService, DynEmailToolService, EmailRequest, EmailServiceTrait, EmailToolServiceTrait,
};
pub use self::hashing::{DynHashing, HashingTrait};
pub use self::jwt::{DynJwtService, JwtServiceTrait};
pub use self::order::{
    DynOrderCommandRepository, DynOrderCommandService, DynOrderQueryRepository,
    DynOrderQueryService, OrderCommandRepositoryTrait, OrderCommandServiceTrait,
    OrderQueryRepositoryTrait, OrderQueryServiceTrait,
};
pub use self::product::{
    DynProductCommandRepository, DynProductCommandService, DynProductQueryRepository,
    DynProductQueryService, ProductCommandRepositoryTrait, ProductCommandServiceTrait,
    ProductQueryRepositoryTrait, ProductQueryServiceTrait,
};
pub use self::reference::{
    CategoryRepositoryTrait, DynCategoryRepository, DynGeoRepository, DynReferenceService,
    DynShopRepository, GeoRepositoryTrait, ReferenceServiceTrait, ShopRepositoryTrait,
};
pub use self::user::{
    DynResetTokenRepository, DynUserCommandRepository, DynUserQueryRepository, DynUserService,
    ResetTokenRepositoryTrait, UserCommandRepositoryTrait, UserQueryRepositoryTrait,
    UserServiceTrait,
};

#[cfg(test)]
pub use self::email::MockEmailServiceTrait;
