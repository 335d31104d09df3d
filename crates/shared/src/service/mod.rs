mod auth;
mod cart;
mod conversation;
mod email;
mod email_tool;
mod notification;
mod order;
mod product;
mod reference;
mod user;

pub use self::auth::{AuthService, AuthServiceDeps, RESET_TOKEN_LENGTH, RESET_TOKEN_TTL_MINUTES};
pub use self::cart::{CartService, MAX_QUANTITY_PER_ITEM};
pub use self::conversation::ConversationService;
pub use self::email::EmailService;
pub use self::email_tool::EmailToolService;
pub use self::notification::{Notification, Notifier};
pub use self::order::{OrderService, OrderServiceDeps};
pub use self::product::{ProductService, ProductServiceDeps};
pub use self::reference::ReferenceService;
pub use self::user::UserService;
