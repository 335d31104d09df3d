mod api;
mod auth;
mod cart;
mod conversation;
mod order;
mod pagination;
mod product;
mod reference;
mod user;

pub use self::api::{ApiResponse, ApiResponsePagination};
pub use self::auth::AuthResponse;
pub use self::cart::{CartCountResponse, CartItemResponse, CartResponse};
pub use self::conversation::{ConversationResponse, MessageResponse};
pub use self::order::{CheckoutResponse, OrderItemResponse, OrderResponse};
pub use self::pagination::Pagination;
pub use self::product::ProductResponse;
pub use self::reference::{
    CategoryResponse, DistrictResponse, ProvinceResponse, ShopResponse, WardResponse,
};
pub use self::user::UserProfileResponse;
