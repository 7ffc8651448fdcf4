use thiserror::Error;

/// Why a signup was refused by the store.
///
/// The username check runs first, so a request colliding on both fields
/// reports `UsernameTaken`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SignupError {
    #[error("Username already exists")]
    UsernameTaken,
    #[error("Email already exists")]
    EmailTaken,
}

impl SignupError {
    /// Stable machine-readable tag for the failure
    pub fn reason(&self) -> &'static str {
        match self {
            SignupError::UsernameTaken => "username_taken",
            SignupError::EmailTaken => "email_taken",
        }
    }
}

/// Failures raised by a key-value backend.
///
/// These never reach the result of a store operation: the persistence
/// writer logs them and moves on.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("storage data is not valid JSON: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {name}: expected a boolean")]
    InvalidFlag { name: &'static str, value: String },
    #[error("invalid value {value:?} for {name}: expected a number of milliseconds")]
    InvalidDuration { name: &'static str, value: String },
}
