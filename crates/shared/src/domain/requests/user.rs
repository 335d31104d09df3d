use crate::domain::requests::PageRequest;
use serde::{Deserialize, Serialize};
use utoipa::IntoParams;

#[derive(Debug, Clone, Serialize, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct FindAllUsers {
    #[serde(default)]
    pub search: Option<String>,

    #[serde(default)]
    pub page: i64,

    #[serde(default = "default_size")]
    pub size: i64,
}

impl FindAllUsers {
    pub fn page_request(&self) -> PageRequest {
        PageRequest::new(self.page, self.size)
    }
}

fn default_size() -> i64 {
    20
}
