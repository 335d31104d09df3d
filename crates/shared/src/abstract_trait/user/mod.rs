mod repository;
mod service;

pub use self::repository::{
    DynResetTokenRepository, DynUserCommandRepository, DynUserQueryRepository,
    ResetTokenRepositoryTrait, UserCommandRepositoryTrait, UserQueryRepositoryTrait,
};
pub use self::service::{DynUserService, UserServiceTrait};
