//! Infrastructure layer: storage adapters, the transactional service, config.

pub mod config;
pub mod repository;
pub mod service;

pub use config::{Config, StoreConfig};
pub use repository::{DemoRepository, DemoTransaction, RepositoryError, TxMode};
pub use service::DemoService;
