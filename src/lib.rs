pub mod auth;
pub mod config;
pub mod dto;
pub mod errors;
pub mod models;
pub mod persist;
pub mod screens;
pub mod storage;

pub use auth::AuthStore;
pub use config::AuthConfig;
pub use errors::{ConfigError, SignupError, StorageError};
pub use models::{Session, User};
pub use storage::{FileStore, KeyValueStore, MemoryStore};
