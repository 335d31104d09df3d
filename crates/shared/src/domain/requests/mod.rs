mod auth;
mod cart;
mod conversation;
mod email;
mod pagination;
mod product;
mod user;

pub use self::auth::{
    ChangePasswordRequest, ForgotPasswordRequest, LoginRequest, RegisterRequest,
    ResetPasswordRequest,
};
pub use self::cart::{AddCartItemRequest, UpdateCartItemRequest};
pub use self::conversation::SendMessageRequest;
pub use self::email::{OrderConfirmationEmailRequest, RecipientEmailRequest, SimpleEmailRequest};
pub use self::pagination::PageRequest;
pub use self::product::{
    CreateProductRequest, FindAllProducts, ProductSort, UpdateProductRequest, UpdateStockRequest,
};
pub use self::user::FindAllUsers;
