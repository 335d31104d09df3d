pub mod requester;
pub mod requests;
pub mod responses;

pub use self::requester::{Capability, Requester};
