//! In-memory stand-ins for Postgres and SMTP, used by service and HTTP tests.

mod email;
mod store;

pub use self::email::OutboxEmailService;
pub use self::store::InMemoryStore;
