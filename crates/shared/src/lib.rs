pub mod abstract_trait;
pub mod config;
pub mod di;
pub mod domain;
pub mod errors;
pub mod model;
pub mod repository;
pub mod service;
pub mod state;
pub mod utils;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;
