use crate::{errors::ServiceError, model::Role};
use serde::{Deserialize, Serialize};

/// What an operation demands of the caller before it touches any data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    Authenticated,
    Admin,
}

/// The authenticated identity a service operation runs on behalf of.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requester {
    pub user_id: i64,
    pub username: String,
    pub email: String,
    pub role: Role,
}

impl Requester {
    pub fn new(user_id: i64, username: impl Into<String>, email: impl Into<String>, role: Role) -> Self {
        Self {
            user_id,
            username: username.into(),
            email: email.into(),
            role,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn require(&self, capability: Capability) -> Result<(), ServiceError> {
        match capability {
            Capability::Authenticated if self.user_id > 0 => Ok(()),
            Capability::Authenticated => Err(ServiceError::Forbidden(
                "Authentication required".to_string(),
            )),
            Capability::Admin if self.is_admin() => Ok(()),
            Capability::Admin => Err(ServiceError::Forbidden(
                "Administrator role required".to_string(),
            )),
        }
    }

    /// Fails unless the requester is `owner_id`.
    pub fn require_owner(&self, owner_id: i64, message: &str) -> Result<(), ServiceError> {
        if self.user_id == owner_id {
            Ok(())
        } else {
            Err(ServiceError::Forbidden(message.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_capability_needs_admin_role() {
        let user = Requester::new(1, "alice", "alice@example.com", Role::User);
        let admin = Requester::new(2, "root", "root@example.com", Role::Admin);

        assert!(user.require(Capability::Authenticated).is_ok());
        assert!(matches!(
            user.require(Capability::Admin),
            Err(ServiceError::Forbidden(_))
        ));
        assert!(admin.require(Capability::Admin).is_ok());
    }

    #[test]
    fn ownership_is_checked_by_user_id() {
        let user = Requester::new(5, "bob", "bob@example.com", Role::User);
        assert!(user.require_owner(5, "nope").is_ok());
        assert!(user.require_owner(6, "nope").is_err());
    }
}
