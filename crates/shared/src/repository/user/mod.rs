mod command;
mod query;
mod reset_token;

use std::sync::Arc;

use self::command::UserCommandRepository;
use self::query::UserQueryRepository;
use self::reset_token::ResetTokenRepository;

use crate::{
    abstract_trait::{DynResetTokenRepository, DynUserCommandRepository, DynUserQueryRepository},
    config::ConnectionPool,
};

#[derive(Clone)]
pub struct UserRepository {
    pub query: DynUserQueryRepository,
    pub command: DynUserCommandRepository,
    pub reset_token: DynResetTokenRepository,
}

impl UserRepository {
    pub fn new(pool: ConnectionPool) -> Self {
        let query = Arc::new(UserQueryRepository::new(pool.clone())) as DynUserQueryRepository;
        let command =
            Arc::new(UserCommandRepository::new(pool.clone())) as DynUserCommandRepository;
        let reset_token = Arc::new(ResetTokenRepository::new(pool)) as DynResetTokenRepository;

        Self {
            query,
            command,
            reset_token,
        }
    }
}
