//! Durable key-value storage used to remember the signed-in session.
//!
//! Every call is independent: there is no transaction spanning keys and
//! no ordering guarantee beyond what a single backend provides. Callers
//! that need ordering go through [`crate::persist::Persister`].

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use crate::errors::StorageError;
use async_trait::async_trait;

pub const USERNAME_KEY: &str = "username";
pub const EMAIL_KEY: &str = "email";
pub const PASSWORD_KEY: &str = "password";
/// Only written when the user collection is persisted
pub const USERS_KEY: &str = "users";

pub const SESSION_KEYS: [&str; 3] = [USERNAME_KEY, EMAIL_KEY, PASSWORD_KEY];

pub type StorageResult<T> = Result<T, StorageError>;

/// String-keyed, string-valued async storage
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> StorageResult<Option<String>>;

    async fn set(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Removing a missing key is not an error
    async fn remove(&self, key: &str) -> StorageResult<()>;
}
