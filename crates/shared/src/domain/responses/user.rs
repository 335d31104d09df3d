use crate::model::{Role, User};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserProfileResponse {
    pub user_id: i64,
    pub username: String,
    pub full_name: String,
    pub email: String,
    pub role: Role,
}

impl From<User> for UserProfileResponse {
    fn from(value: User) -> Self {
        UserProfileResponse {
            user_id: value.user_id,
            username: value.username,
            full_name: value.full_name,
            email: value.email,
            role: value.role,
        }
    }
}
