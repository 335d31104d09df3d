mod cart;
mod conversation;
mod order;
mod product;
mod reference;
mod reset_token;
mod user;

pub use self::cart::{Cart, CartItem, CartLine};
pub use self::conversation::{Conversation, ConversationSummary, Message};
pub use self::order::{NewOrder, NewOrderLine, Order, OrderItem};
pub use self::product::{NewProduct, Product, ProductChanges};
pub use self::reference::{Category, District, Province, Shop, Ward};
pub use self::reset_token::ResetToken;
pub use self::user::{NewUser, Role, User};
