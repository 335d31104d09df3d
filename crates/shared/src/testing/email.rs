use crate::{
    abstract_trait::{EmailRequest, EmailServiceTrait},
    errors::ServiceError,
};
use async_trait::async_trait;
use std::sync::{Mutex, PoisonError};

/// Records every email instead of sending it. Can be switched to fail.
#[derive(Default)]
pub struct OutboxEmailService {
    sent: Mutex<Vec<EmailRequest>>,
    failing: bool,
}

impl OutboxEmailService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            sent: Mutex::default(),
            failing: true,
        }
    }

    pub fn sent(&self) -> Vec<EmailRequest> {
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl EmailServiceTrait for OutboxEmailService {
    async fn send(&self, req: &EmailRequest) -> Result<(), ServiceError> {
        if self.failing {
            return Err(ServiceError::Internal("SMTP unavailable".into()));
        }
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(req.clone());
        Ok(())
    }

    async fn test_connection(&self) -> Result<bool, ServiceError> {
        Ok(!self.failing)
    }
}
